//! In-memory license source for embedding and fixtures
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use async_trait::async_trait;

use super::{LicenseSource, RawRecord};
use crate::core::error::SourceError;

/// Serves a fixed list of raw records on every fetch
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    records: Vec<RawRecord>,
}

impl InMemorySource {
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self { records }
    }

    /// Build a source from JSON objects; non-object values are ignored
    pub fn from_json(values: Vec<serde_json::Value>) -> Self {
        let records = values
            .into_iter()
            .filter_map(|value| match value {
                serde_json::Value::Object(map) => Some(RawRecord::Json(map)),
                _ => None,
            })
            .collect();
        Self { records }
    }
}

#[async_trait]
impl LicenseSource for InMemorySource {
    async fn get_licenses(&self) -> Result<Vec<RawRecord>, SourceError> {
        Ok(self.records.clone())
    }
}
