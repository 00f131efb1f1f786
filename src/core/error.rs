//! # Error Types
//!
//! Typed errors for the license pipeline. Configuration gaps and per-recipient
//! delivery failures are not errors; they are reported inside a
//! `DeliveryResult`. Everything here propagates to the API boundary.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use std::path::PathBuf;
use thiserror::Error;

/// Failure to fetch raw license records from a data source
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Airtable provider requires apiKey, baseId, and tableName")]
    MissingAirtableConfig,

    #[error("invalid Airtable base URL: {0}")]
    InvalidUrl(String),

    #[error("Airtable API request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Airtable request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid Airtable response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failure of a single outbound JSON POST
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{context} (status {status}): {body}")]
    Status {
        context: String,
        status: u16,
        body: String,
    },

    #[error("{0}")]
    Http(#[from] reqwest::Error),
}

/// Failure that aborts a whole reminder dispatch
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("failed to write email draft {path}: {source}")]
    Outbox {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
