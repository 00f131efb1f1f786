use anyhow::{Context, Result};
use dotenvy::dotenv;
use log::{info, warn};
use std::sync::Arc;

use license_buddy::api::{self, AppState};
use license_buddy::core::{Config, HttpTransport};
use license_buddy::features::licenses::LicenseCatalog;
use license_buddy::features::reminders::{
    ChannelSelection, ReminderScheduler, ReminderService, ReminderSettings,
};
use license_buddy::features::sources::build_source;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting License Buddy...");

    let source = build_source(&config).context("Failed to configure license data source")?;
    let catalog = Arc::new(LicenseCatalog::new(source, config.reminder_lookahead_days));
    let transport = Arc::new(HttpTransport::new()?);
    let reminders = Arc::new(ReminderService::new(
        catalog.clone(),
        transport,
        ReminderSettings::from_config(&config),
    ));

    let scheduler = if config.enable_scheduler {
        let channels = ChannelSelection::from_config(&config);
        if channels.is_empty() {
            warn!("Scheduler enabled but no reminder channels are configured");
        }
        Some(
            ReminderScheduler::new(
                reminders.clone(),
                config.reminder_lookahead_days,
                config.scheduler_interval_minutes,
                channels,
            )
            .spawn(),
        )
    } else {
        info!("Reminder scheduler disabled");
        None
    };

    let app = api::app(AppState::new(catalog, reminders));
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;

    info!("License Buddy API listening on port {}", config.port);

    let served = axum::serve(listener, app).await;

    if let Some(handle) = scheduler {
        handle.stop();
    }
    served.context("HTTP server failed")
}
