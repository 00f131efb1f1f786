//! Email draft channel
//!
//! Writes one plain-text draft per reminder into a shared outbox directory.
//! Unlike messaging, a failed write aborts the remaining drafts.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{DeliveryChannel, DeliveryResult, EMAIL_CHANNEL};
use crate::core::error::DispatchError;
use crate::core::file_utils::sanitize_filename;
use crate::features::reminders::composer::ReminderPayload;

pub const DEFAULT_SENDER: &str = "notifications@example.com";
const MISSING_RECIPIENTS: &str = "Missing recipients";

type MillisClock = Arc<dyn Fn() -> i64 + Send + Sync>;

pub struct EmailDraftChannel {
    outbox_dir: PathBuf,
    sender: String,
    now_millis: MillisClock,
}

impl EmailDraftChannel {
    pub fn new(outbox_dir: impl Into<PathBuf>, sender: impl Into<String>) -> Self {
        Self {
            outbox_dir: outbox_dir.into(),
            sender: sender.into(),
            now_millis: Arc::new(|| Utc::now().timestamp_millis()),
        }
    }

    /// Replace the clock that stamps draft filenames
    pub fn with_clock<F>(mut self, now_millis: F) -> Self
    where
        F: Fn() -> i64 + Send + Sync + 'static,
    {
        self.now_millis = Arc::new(now_millis);
        self
    }

    fn render(&self, payload: &ReminderPayload, recipients: &[String]) -> String {
        let sender = if self.sender.is_empty() {
            DEFAULT_SENDER
        } else {
            self.sender.as_str()
        };
        [
            format!("From: {sender}"),
            format!("To: {}", recipients.join(", ")),
            format!("Subject: {}", payload.subject),
            String::new(),
            payload.message.clone(),
        ]
        .join("\n")
    }
}

/// `{unixMillis}_{sequence}_{sanitizedLicenseNumber}.txt`
pub fn draft_filename(timestamp_millis: i64, sequence: usize, license_number: &str) -> String {
    let label = if license_number.is_empty() {
        "license"
    } else {
        license_number
    };
    format!(
        "{timestamp_millis}_{sequence}_{}.txt",
        sanitize_filename(label)
    )
}

#[async_trait]
impl DeliveryChannel for EmailDraftChannel {
    type Config = Vec<String>;

    fn name(&self) -> &'static str {
        EMAIL_CHANNEL
    }

    async fn send(
        &self,
        payloads: &[ReminderPayload],
        recipients: &Vec<String>,
    ) -> Result<DeliveryResult, DispatchError> {
        if recipients.is_empty() {
            return Ok(DeliveryResult::skipped(
                EMAIL_CHANNEL,
                payloads.len(),
                MISSING_RECIPIENTS,
            ));
        }

        let outbox_error = |path: &Path| {
            let path = path.to_path_buf();
            move |source| DispatchError::Outbox { path, source }
        };

        tokio::fs::create_dir_all(&self.outbox_dir)
            .await
            .map_err(outbox_error(&self.outbox_dir))?;

        for (index, payload) in payloads.iter().enumerate() {
            let filename = draft_filename(
                (self.now_millis)(),
                index + 1,
                &payload.license.license.license_number,
            );
            let path = self.outbox_dir.join(filename);
            tokio::fs::write(&path, self.render(payload, recipients))
                .await
                .map_err(outbox_error(&path))?;
            debug!("Wrote email draft {}", path.display());
        }

        info!(
            "Wrote {} email drafts to {}",
            payloads.len(),
            self.outbox_dir.display()
        );

        Ok(DeliveryResult {
            channel: EMAIL_CHANNEL.to_string(),
            sent: payloads.len(),
            skipped: 0,
            reason: None,
            errors: Some(Vec::new()),
            outbox_directory: Some(self.outbox_dir.display().to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::licenses::{EnrichedLicense, License};

    fn payload(number: &str) -> ReminderPayload {
        ReminderPayload {
            license: EnrichedLicense {
                license: License {
                    id: "abc123".to_string(),
                    firm_name: "Oasis Engineering LLC".to_string(),
                    license_number: number.to_string(),
                    state: "FL".to_string(),
                    status: "Active".to_string(),
                    expiration_date: None,
                    ceu_required: 0.0,
                    ceu_completed: 0.0,
                    holder_name: None,
                    verification_url: None,
                },
                days_until_expiration: None,
                is_expired: false,
                is_expiring_soon: false,
                ceu_remaining: None,
            },
            message: "Test reminder".to_string(),
            subject: "Reminder Subject".to_string(),
        }
    }

    #[test]
    fn test_draft_filename() {
        assert_eq!(draft_filename(1700, 1, "PE/0001"), "1700_1_PE_0001.txt");
        assert_eq!(draft_filename(1700, 2, ""), "1700_2_license.txt");
    }

    #[tokio::test]
    async fn test_writes_one_draft_per_payload() {
        let dir = tempfile::tempdir().unwrap();
        let outbox = dir.path().join("outbox");
        let channel = EmailDraftChannel::new(&outbox, "compliance@example.com");
        let recipients = vec!["team@example.com".to_string(), "ops@example.com".to_string()];

        let result = channel
            .send(&[payload("PE-0001"), payload("PE 0002")], &recipients)
            .await
            .unwrap();
        assert_eq!(result.sent, 2);
        assert_eq!(result.skipped, 0);
        assert_eq!(result.errors, Some(vec![]));
        assert_eq!(
            result.outbox_directory.as_deref(),
            Some(outbox.display().to_string().as_str())
        );

        let mut names: Vec<String> = std::fs::read_dir(&outbox)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names.len(), 2);
        assert!(names.iter().any(|n| n.ends_with("_1_PE-0001.txt")));
        assert!(names.iter().any(|n| n.ends_with("_2_PE_0002.txt")));

        let first = names.iter().find(|n| n.ends_with("_1_PE-0001.txt")).unwrap();
        let content = std::fs::read_to_string(outbox.join(first)).unwrap();
        assert_eq!(
            content,
            "From: compliance@example.com\n\
             To: team@example.com, ops@example.com\n\
             Subject: Reminder Subject\n\
             \n\
             Test reminder"
        );
    }

    #[tokio::test]
    async fn test_default_sender() {
        let dir = tempfile::tempdir().unwrap();
        let channel = EmailDraftChannel::new(dir.path(), "");
        channel
            .send(&[payload("PE-1")], &vec!["a@example.com".to_string()])
            .await
            .unwrap();
        let entry = std::fs::read_dir(dir.path()).unwrap().next().unwrap().unwrap();
        let content = std::fs::read_to_string(entry.path()).unwrap();
        assert!(content.starts_with("From: notifications@example.com\n"));
    }

    #[tokio::test]
    async fn test_missing_recipients_skips() {
        let dir = tempfile::tempdir().unwrap();
        let outbox = dir.path().join("never-created");
        let channel = EmailDraftChannel::new(&outbox, "");

        let result = channel
            .send(&[payload("PE-1"), payload("PE-2")], &Vec::new())
            .await
            .unwrap();
        assert_eq!(result.sent, 0);
        assert_eq!(result.skipped, 2);
        assert_eq!(result.reason.as_deref(), Some("Missing recipients"));
        assert!(!outbox.exists());
    }

    #[tokio::test]
    async fn test_unwritable_outbox_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("outbox");
        std::fs::write(&blocker, "not a directory").unwrap();
        let channel = EmailDraftChannel::new(&blocker, "");

        let err = channel
            .send(&[payload("PE-1")], &vec!["a@example.com".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::Outbox { .. }));
    }

    #[tokio::test]
    async fn test_failed_write_stops_remaining_drafts() {
        let dir = tempfile::tempdir().unwrap();
        let outbox = dir.path().to_path_buf();
        // a directory squatting on the second draft's filename
        let blocked = outbox.join(draft_filename(1700, 2, "PE-2"));
        std::fs::create_dir(&blocked).unwrap();
        let channel = EmailDraftChannel::new(&outbox, "").with_clock(|| 1700);

        let err = channel
            .send(
                &[payload("PE-1"), payload("PE-2"), payload("PE-3")],
                &vec!["a@example.com".to_string()],
            )
            .await
            .unwrap_err();
        match err {
            DispatchError::Outbox { path, .. } => assert_eq!(path, blocked),
            other => panic!("expected an outbox error, got {other:?}"),
        }

        assert!(outbox.join("1700_1_PE-1.txt").is_file());
        assert!(!outbox.join("1700_3_PE-3.txt").exists());
        assert_eq!(std::fs::read_dir(&outbox).unwrap().count(), 2);
    }
}
