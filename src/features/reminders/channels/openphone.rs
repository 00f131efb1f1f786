//! OpenPhone messaging channel
//!
//! Sends one SMS per (payload, recipient) pair, payload-major and strictly
//! sequential. A failed send is recorded and the loop moves on; nothing is
//! retried.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use async_trait::async_trait;
use log::{info, warn};
use serde_json::json;
use std::sync::Arc;

use super::{DeliveryChannel, DeliveryError, DeliveryResult, OPENPHONE_CHANNEL};
use crate::core::config::OpenPhoneConfig;
use crate::core::error::DispatchError;
use crate::core::http::JsonTransport;
use crate::features::reminders::composer::ReminderPayload;

const MISSING_CONFIGURATION: &str = "Missing OpenPhone configuration";
const ERROR_CONTEXT: &str = "OpenPhone API request failed";

pub struct OpenPhoneChannel {
    transport: Arc<dyn JsonTransport>,
}

impl OpenPhoneChannel {
    pub fn new(transport: Arc<dyn JsonTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl DeliveryChannel for OpenPhoneChannel {
    type Config = OpenPhoneConfig;

    fn name(&self) -> &'static str {
        OPENPHONE_CHANNEL
    }

    async fn send(
        &self,
        payloads: &[ReminderPayload],
        config: &OpenPhoneConfig,
    ) -> Result<DeliveryResult, DispatchError> {
        let recipients = &config.to_numbers;
        let total_attempts = payloads.len() * recipients.len().max(1);

        if config.api_key.is_empty() || config.from_number.is_empty() || recipients.is_empty() {
            return Ok(DeliveryResult::skipped(
                OPENPHONE_CHANNEL,
                total_attempts,
                MISSING_CONFIGURATION,
            ));
        }

        let headers = request_headers(config);

        let mut sent = 0;
        let mut errors = Vec::new();

        for payload in payloads {
            for recipient in recipients {
                let body = json!({
                    "to": recipient,
                    "from": config.from_number,
                    "text": payload.message,
                });
                match self
                    .transport
                    .post_json(&config.endpoint, &body, &headers, ERROR_CONTEXT)
                    .await
                {
                    Ok(_) => sent += 1,
                    Err(e) => {
                        let license = &payload.license.license;
                        warn!(
                            "OpenPhone send failed for license {} to {recipient}: {e}",
                            license.license_number
                        );
                        errors.push(DeliveryError {
                            license_id: license_reference(payload),
                            recipient: Some(recipient.clone()),
                            message: e.to_string(),
                        });
                    }
                }
            }
        }

        info!(
            "OpenPhone delivery finished: {sent}/{total_attempts} sent, {} failed",
            errors.len()
        );

        Ok(DeliveryResult {
            channel: OPENPHONE_CHANNEL.to_string(),
            sent,
            skipped: total_attempts - sent,
            reason: None,
            errors: Some(errors),
            outbox_directory: None,
        })
    }
}

/// Bearer auth plus configured extras; a configured Authorization wins
fn request_headers(config: &OpenPhoneConfig) -> Vec<(String, String)> {
    let overrides_auth = config
        .headers
        .iter()
        .any(|(name, _)| name.eq_ignore_ascii_case("authorization"));
    let mut headers = Vec::with_capacity(config.headers.len() + 1);
    if !overrides_auth {
        headers.push((
            "Authorization".to_string(),
            format!("Bearer {}", config.api_key),
        ));
    }
    headers.extend(config.headers.iter().cloned());
    headers
}

/// License id, falling back to the license number
fn license_reference(payload: &ReminderPayload) -> Option<String> {
    let license = &payload.license.license;
    [&license.id, &license.license_number]
        .into_iter()
        .find(|value| !value.is_empty())
        .cloned()
}
