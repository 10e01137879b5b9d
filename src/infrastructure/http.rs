//! # HTTP gateway client
//!
//! Wraps a `reqwest::Client` with the gateway's base URL. Each call sends the
//! payload as a JSON body with `PUT` and maps failures onto the crate's error
//! taxonomy:
//!
//! - connection failures and timeouts become `OrderError::Transport`;
//! - non-2xx responses become `OrderError::RemoteRejection` carrying the body;
//! - a 2xx response wrapped in a `resultado` object is unwrapped, and a
//!   `descripcionError` inside it is treated as a rejection.
//!
//! Retries are NOT built in.

use crate::domain::ports::{GatewayClient, Payload};
use crate::error::{OrderError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

const RESULT_ENVELOPE: &str = "resultado";
const ERROR_DESCRIPTION: &str = "descripcionError";

/// Configuration for the HTTP gateway client.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the gateway API, without a trailing slash.
    pub base_url: String,
    /// Request timeout in seconds (default: 30).
    pub timeout_secs: u64,
}

impl GatewayConfig {
    /// Create a new configuration with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpGatewayClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGatewayClient {
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| OrderError::Transport {
                endpoint: config.base_url.clone(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl GatewayClient for HttpGatewayClient {
    async fn put(&self, endpoint: &str, payload: &Payload) -> Result<Payload> {
        let url = format!("{}{}", self.base_url, endpoint);
        tracing::debug!(%url, "sending gateway request");

        let resp = self
            .client
            .put(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| OrderError::Transport {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| OrderError::Transport {
            endpoint: endpoint.to_string(),
            reason: format!("failed to read response body: {e}"),
        })?;

        if !status.is_success() {
            return Err(OrderError::RemoteRejection {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                message: body,
            });
        }

        let mut response: Payload = serde_json::from_str(&body).map_err(|e| {
            OrderError::MalformedResponse(format!("{endpoint} returned invalid JSON: {e}"))
        })?;

        if let Some(Value::Object(inner)) = response.remove(RESULT_ENVELOPE) {
            response = inner;
        }

        if let Some(description) = response.get(ERROR_DESCRIPTION).and_then(Value::as_str)
            && !description.is_empty()
        {
            return Err(OrderError::RemoteRejection {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                message: description.to_string(),
            });
        }

        Ok(response)
    }
}
