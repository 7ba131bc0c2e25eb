//! HTTP implementation of the backend session exchange.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::traits::SessionExchange;
use crate::types::{ExchangeRequest, ExchangeResponse};

const SESSION_EXCHANGE_PATH: &str = "/auth/session";

#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("network error: {0}")]
    Network(String),

    /// The backend rejected the exchange. Not retried automatically.
    #[error("exchange rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("malformed exchange response: {0}")]
    Decode(String),
}

/// Error body shape the CRM API uses for rejections.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Session exchange over the CRM HTTP API.
pub struct HttpSessionExchange {
    client: reqwest::Client,
    api_url: String,
}

impl HttpSessionExchange {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
        }
    }
}

#[async_trait]
impl SessionExchange for HttpSessionExchange {
    async fn exchange(
        &self,
        transport_token: &str,
        request: &ExchangeRequest,
    ) -> Result<ExchangeResponse, ExchangeError> {
        let url = format!("{}{}", self.api_url, SESSION_EXCHANGE_PATH);

        let resp = self
            .client
            .post(&url)
            .bearer_auth(transport_token)
            .json(request)
            .send()
            .await
            .map_err(|e| ExchangeError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ErrorBody>(&text) {
                Ok(body) => body.message,
                Err(_) => text,
            };
            tracing::debug!(status = status.as_u16(), %message, "session exchange rejected");
            return Err(ExchangeError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        resp.json::<ExchangeResponse>()
            .await
            .map_err(|e| ExchangeError::Decode(e.to_string()))
    }
}
