// Core layer - configuration, errors, transport, file helpers
pub mod core;

// Features layer - sources, license catalog, reminders
pub mod features;

// HTTP layer - axum routes over the features
pub mod api;

// Re-export core config for convenience
pub use crate::core::Config;

pub use features::{
    // Licenses
    CeuSummary, EnrichedLicense, License, LicenseCatalog,
    // Reminders
    ChannelSelection, DeliveryResult, DispatchOutcome, ReminderPayload, ReminderScheduler,
    ReminderService, ReminderSettings, SchedulerHandle,
    // Sources
    build_source, AirtableSource, CsvSource, InMemorySource, LicenseSource, RawRecord,
};
