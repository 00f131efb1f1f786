//! # Feature: License Catalog
//!
//! Canonical license model, record normalization, expiration/CEU insights
//! and the catalog views served by the API and used by reminders.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod catalog;
pub mod insights;
pub mod model;
pub mod normalizer;

pub use catalog::LicenseCatalog;
pub use insights::enrich;
pub use model::{CeuSummary, EnrichedLicense, License};
pub use normalizer::normalize;
