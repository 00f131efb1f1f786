//! Periodic reminder dispatch
//!
//! Dispatches once immediately, then on every interval tick. Failures are
//! logged and the loop keeps going.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use log::{error, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::selection::ChannelSelection;
use super::service::ReminderService;

pub struct ReminderScheduler {
    service: Arc<ReminderService>,
    look_ahead_days: i64,
    interval: Duration,
    channels: ChannelSelection,
}

impl ReminderScheduler {
    /// `interval_minutes` is clamped to at least one minute
    pub fn new(
        service: Arc<ReminderService>,
        look_ahead_days: i64,
        interval_minutes: u64,
        channels: ChannelSelection,
    ) -> Self {
        Self {
            service,
            look_ahead_days,
            interval: Duration::from_secs(interval_minutes.max(1) * 60),
            channels,
        }
    }

    /// Replace the tick interval
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// One dispatch pass; errors are logged, never returned
    pub async fn run_once(&self) {
        match self
            .service
            .dispatch_reminders(Some(self.look_ahead_days), &self.channels)
            .await
        {
            Ok(outcome) => {
                let summary: Vec<String> = outcome
                    .results
                    .iter()
                    .map(|r| format!("{}: {} sent, {} skipped", r.channel, r.sent, r.skipped))
                    .collect();
                info!(
                    "[ReminderScheduler] Dispatch complete: {} reminders ({})",
                    outcome.reminders,
                    summary.join("; ")
                );
            }
            Err(e) => error!("[ReminderScheduler] Dispatch failed: {e}"),
        }
    }

    /// Loop forever; the first tick completes immediately
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.run_once().await;
        }
    }

    pub fn spawn(self) -> SchedulerHandle {
        info!(
            "[ReminderScheduler] Started, dispatching every {}s",
            self.interval.as_secs()
        );
        SchedulerHandle {
            task: tokio::spawn(self.run()),
        }
    }
}

/// Handle to a running scheduler loop
pub struct SchedulerHandle {
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    pub fn stop(&self) {
        self.task.abort();
        info!("[ReminderScheduler] Stopped");
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::OpenPhoneConfig;
    use crate::core::error::TransportError;
    use crate::core::http::JsonTransport;
    use crate::features::licenses::LicenseCatalog;
    use crate::features::reminders::selection::OpenPhoneOverride;
    use crate::features::reminders::service::ReminderSettings;
    use crate::features::sources::InMemorySource;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingTransport {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl JsonTransport for CountingTransport {
        async fn post_json(
            &self,
            _url: &str,
            _payload: &serde_json::Value,
            _headers: &[(String, String)],
            _error_context: &str,
        ) -> Result<String, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("{}".to_string())
        }
    }

    fn scheduler(transport: Arc<CountingTransport>) -> ReminderScheduler {
        let source = Arc::new(InMemorySource::from_json(vec![json!({
            "id": "abc123", "firmName": "Oasis Engineering LLC",
            "licenseNumber": "PE-0001", "state": "FL", "expirationDate": "2024-01-10",
        })]));
        let catalog = Arc::new(
            LicenseCatalog::new(source, 30).with_clock(|| NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
        );
        let settings = ReminderSettings {
            openphone: OpenPhoneConfig {
                api_key: "key".to_string(),
                from_number: "+15550000".to_string(),
                to_numbers: vec!["+15550001".to_string()],
                ..Default::default()
            },
            email_sender: String::new(),
            email_recipients: Vec::new(),
            outbox_dir: std::env::temp_dir(),
            default_lookahead_days: 30,
        };
        let service = Arc::new(ReminderService::new(catalog, transport, settings));
        let channels = ChannelSelection {
            openphone: Some(OpenPhoneOverride::default()),
            email: None,
        };
        ReminderScheduler::new(service, 30, 0, channels)
    }

    #[test]
    fn test_interval_is_at_least_one_minute() {
        let scheduler = scheduler(Arc::default());
        assert_eq!(scheduler.interval(), Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_runs_immediately_and_stops() {
        let transport = Arc::new(CountingTransport::default());
        let handle = scheduler(transport.clone())
            .with_interval(Duration::from_secs(3600))
            .spawn();

        for _ in 0..50 {
            if transport.calls.load(Ordering::SeqCst) > 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);

        handle.stop();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(handle.is_finished());
    }
}
