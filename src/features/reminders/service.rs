//! Reminder service
//!
//! Coordinates a dispatch: pull expiring licenses from the catalog, compose
//! payloads, then hand them to each selected channel (messaging first, then
//! email drafts).
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use log::{debug, info};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use super::channels::{
    DeliveryChannel, DeliveryResult, EmailDraftChannel, OpenPhoneChannel, NO_CHANNEL,
};
use super::composer::{compose, ReminderPayload};
use super::selection::{ChannelSelection, OpenPhoneOverride};
use crate::core::config::{Config, OpenPhoneConfig};
use crate::core::error::{DispatchError, SourceError};
use crate::core::http::JsonTransport;
use crate::features::licenses::LicenseCatalog;

const NO_CHANNELS_SELECTED: &str = "No channels selected";

/// Defaults applied when a request does not override them
#[derive(Debug, Clone)]
pub struct ReminderSettings {
    pub openphone: OpenPhoneConfig,
    pub email_sender: String,
    pub email_recipients: Vec<String>,
    pub outbox_dir: PathBuf,
    pub default_lookahead_days: i64,
}

impl ReminderSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            openphone: config.openphone.clone(),
            email_sender: config.email_sender.clone(),
            email_recipients: config.email_recipients.clone(),
            outbox_dir: config.outbox_dir.clone(),
            default_lookahead_days: config.reminder_lookahead_days,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchOutcome {
    /// Number of composed reminders
    pub reminders: usize,
    pub results: Vec<DeliveryResult>,
}

pub struct ReminderService {
    catalog: Arc<LicenseCatalog>,
    openphone: OpenPhoneChannel,
    email: EmailDraftChannel,
    openphone_defaults: OpenPhoneConfig,
    default_email_recipients: Vec<String>,
    default_lookahead_days: i64,
}

impl ReminderService {
    pub fn new(
        catalog: Arc<LicenseCatalog>,
        transport: Arc<dyn JsonTransport>,
        settings: ReminderSettings,
    ) -> Self {
        Self {
            catalog,
            openphone: OpenPhoneChannel::new(transport),
            email: EmailDraftChannel::new(settings.outbox_dir, settings.email_sender),
            openphone_defaults: settings.openphone,
            default_email_recipients: settings.email_recipients,
            default_lookahead_days: settings.default_lookahead_days,
        }
    }

    /// Compose reminders for licenses expiring within `within_days` without
    /// sending anything
    pub async fn prepare_reminder_payloads(
        &self,
        within_days: i64,
    ) -> Result<Vec<ReminderPayload>, SourceError> {
        let expiring = self.catalog.get_expiring_licenses(within_days).await?;
        debug!(
            "{} licenses expiring within {within_days} days",
            expiring.len()
        );
        Ok(compose(&expiring))
    }

    /// Send through OpenPhone with `overrides` applied to the defaults
    pub async fn send_openphone_messages(
        &self,
        payloads: &[ReminderPayload],
        overrides: &OpenPhoneOverride,
    ) -> Result<DeliveryResult, DispatchError> {
        let config = overrides.apply(&self.openphone_defaults);
        debug!(
            "Sending {} reminders via {} to {} recipient(s)",
            payloads.len(),
            self.openphone.name(),
            config.to_numbers.len()
        );
        self.openphone.send(payloads, &config).await
    }

    /// Write drafts for `recipients`, or the default recipients when `None`
    pub async fn write_email_drafts(
        &self,
        payloads: &[ReminderPayload],
        recipients: Option<&[String]>,
    ) -> Result<DeliveryResult, DispatchError> {
        let recipients = recipients
            .map(<[String]>::to_vec)
            .unwrap_or_else(|| self.default_email_recipients.clone());
        debug!(
            "Sending {} reminders via {} to {} recipient(s)",
            payloads.len(),
            self.email.name(),
            recipients.len()
        );
        self.email.send(payloads, &recipients).await
    }

    pub async fn dispatch_reminders(
        &self,
        within_days: Option<i64>,
        selection: &ChannelSelection,
    ) -> Result<DispatchOutcome, DispatchError> {
        let within_days = within_days.unwrap_or(self.default_lookahead_days);
        let payloads = self.prepare_reminder_payloads(within_days).await?;
        let mut results = Vec::new();

        if let Some(overrides) = &selection.openphone {
            results.push(self.send_openphone_messages(&payloads, overrides).await?);
        }

        if let Some(email) = &selection.email {
            results.push(
                self.write_email_drafts(&payloads, email.recipients.as_deref())
                    .await?,
            );
        }

        if results.is_empty() {
            results.push(DeliveryResult::skipped(
                NO_CHANNEL,
                payloads.len(),
                NO_CHANNELS_SELECTED,
            ));
        }

        info!(
            "Dispatched {} reminders across {} channel(s)",
            payloads.len(),
            results.len()
        );

        Ok(DispatchOutcome {
            reminders: payloads.len(),
            results,
        })
    }
}
