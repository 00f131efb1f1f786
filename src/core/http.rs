//! Outbound JSON transport
//!
//! Thin POST-JSON capability used by the messaging channel. Kept behind a
//! trait so channels can be driven by a recording transport in tests.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use async_trait::async_trait;
use log::debug;
use std::time::Duration;

use crate::core::error::TransportError;

/// Default timeout for outbound requests in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// POST a JSON payload and return the response body
#[async_trait]
pub trait JsonTransport: Send + Sync {
    /// Sends `payload` to `url` with the extra `headers`.
    ///
    /// Non-2xx statuses fail with `TransportError::Status`, using
    /// `error_context` as the message prefix.
    async fn post_json(
        &self,
        url: &str,
        payload: &serde_json::Value,
        headers: &[(String, String)],
        error_context: &str,
    ) -> Result<String, TransportError>;
}

/// reqwest-backed transport
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
            .user_agent("license-buddy/1.0")
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl JsonTransport for HttpTransport {
    async fn post_json(
        &self,
        url: &str,
        payload: &serde_json::Value,
        headers: &[(String, String)],
        error_context: &str,
    ) -> Result<String, TransportError> {
        let mut request = self.client.post(url).json(payload);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("POST {url} -> {status}");

        if !status.is_success() {
            return Err(TransportError::Status {
                context: error_context.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}
