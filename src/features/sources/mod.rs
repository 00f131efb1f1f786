//! # Feature: License Data Sources
//!
//! Swappable backends that supply raw license records. Each source returns
//! records in its own schema as a [`RawRecord`]; the normalizer turns them
//! into canonical licenses before they enter the catalog.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod airtable;
pub mod csv;
pub mod memory;

pub use airtable::AirtableSource;
pub use csv::CsvSource;
pub use memory::InMemorySource;

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

use crate::core::config::{Config, DataSourceKind};
use crate::core::error::SourceError;

/// One raw record, tagged by the schema it came from
#[derive(Debug, Clone, PartialEq)]
pub enum RawRecord {
    /// A delimited-text row keyed by header name
    Delimited(HashMap<String, String>),
    /// A remote table record: record id plus its field map
    Table { id: String, fields: Map<String, Value> },
    /// A free-form JSON object
    Json(Map<String, Value>),
}

/// Borrowed view of a single raw field value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Json(&'a Value),
}

impl RawRecord {
    /// Look up a field by its source key
    pub fn field(&self, key: &str) -> Option<FieldValue<'_>> {
        match self {
            RawRecord::Delimited(row) => row.get(key).map(|v| FieldValue::Text(v.as_str())),
            RawRecord::Table { id, fields } => match fields.get(key) {
                Some(value) => Some(FieldValue::Json(value)),
                None if key == "id" => Some(FieldValue::Text(id.as_str())),
                None => None,
            },
            RawRecord::Json(map) => map.get(key).map(FieldValue::Json),
        }
    }
}

/// Capability to fetch every raw license record
#[async_trait]
pub trait LicenseSource: Send + Sync {
    async fn get_licenses(&self) -> Result<Vec<RawRecord>, SourceError>;
}

/// Build the data source selected by configuration
pub fn build_source(config: &Config) -> Result<Arc<dyn LicenseSource>, SourceError> {
    match config.data_source {
        DataSourceKind::Airtable => Ok(Arc::new(AirtableSource::new(config.airtable.clone())?)),
        DataSourceKind::Csv => Ok(Arc::new(CsvSource::new(config.csv_path.clone()))),
    }
}
