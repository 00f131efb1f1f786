//! # Features
//!
//! - `sources`: raw license records from CSV, Airtable or memory
//! - `licenses`: normalization, insights and the catalog views
//! - `reminders`: composition, delivery channels, dispatch and scheduling

pub mod licenses;
pub mod reminders;
pub mod sources;

// Licenses
pub use licenses::{CeuSummary, EnrichedLicense, License, LicenseCatalog};

// Reminders
pub use reminders::{
    ChannelSelection, DeliveryResult, DispatchOutcome, ReminderPayload, ReminderScheduler,
    ReminderService, ReminderSettings, SchedulerHandle,
};

// Sources
pub use sources::{build_source, AirtableSource, CsvSource, InMemorySource, LicenseSource, RawRecord};
