//! Delivery channels
//!
//! Every channel takes the composed payloads plus its own configuration and
//! reports one [`DeliveryResult`]. Missing configuration is a skip with a
//! `reason`, never an error.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

pub mod email;
pub mod openphone;

pub use email::EmailDraftChannel;
pub use openphone::OpenPhoneChannel;

use async_trait::async_trait;
use serde::Serialize;

use super::composer::ReminderPayload;
use crate::core::error::DispatchError;

pub const OPENPHONE_CHANNEL: &str = "openphone";
pub const EMAIL_CHANNEL: &str = "email";
pub const NO_CHANNEL: &str = "none";

/// Outcome of one channel invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryResult {
    pub channel: String,
    pub sent: usize,
    pub skipped: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<DeliveryError>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outbox_directory: Option<String>,
}

impl DeliveryResult {
    /// A result where nothing was attempted
    pub fn skipped(channel: &str, skipped: usize, reason: &str) -> Self {
        Self {
            channel: channel.to_string(),
            sent: 0,
            skipped,
            reason: Some(reason.to_string()),
            errors: None,
            outbox_directory: None,
        }
    }
}

/// A single failed delivery attempt
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryError {
    pub license_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    pub message: String,
}

#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    /// Per-invocation channel configuration
    type Config: Send + Sync;

    fn name(&self) -> &'static str;

    async fn send(
        &self,
        payloads: &[ReminderPayload],
        config: &Self::Config,
    ) -> Result<DeliveryResult, DispatchError>;
}
