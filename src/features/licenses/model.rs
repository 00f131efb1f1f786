//! License data model
//!
//! Canonical license entity, its enriched view, and the per-jurisdiction CEU
//! summary. JSON output uses camelCase keys, and absent optional text fields
//! serialize as `""` for compatibility with existing dashboard clients.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

/// Canonical license entity produced by the normalizer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct License {
    /// Source id, or a 12-char SHA-1 prefix of firm/number/state
    pub id: String,
    pub firm_name: String,
    pub license_number: String,
    /// Jurisdiction code (e.g. "FL")
    pub state: String,
    pub status: String,
    #[serde(serialize_with = "serialize_date")]
    pub expiration_date: Option<NaiveDate>,
    #[serde(serialize_with = "serialize_number")]
    pub ceu_required: f64,
    #[serde(serialize_with = "serialize_number")]
    pub ceu_completed: f64,
    #[serde(serialize_with = "serialize_text")]
    pub holder_name: Option<String>,
    #[serde(serialize_with = "serialize_text")]
    pub verification_url: Option<String>,
}

/// A license plus insights computed against a reference date
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedLicense {
    #[serde(flatten)]
    pub license: License,
    pub days_until_expiration: Option<i64>,
    pub is_expired: bool,
    pub is_expiring_soon: bool,
    /// `None` when the license carries no CEU requirement
    #[serde(serialize_with = "serialize_optional_number")]
    pub ceu_remaining: Option<f64>,
}

/// CEU totals for one jurisdiction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CeuSummary {
    pub state: String,
    #[serde(serialize_with = "serialize_number")]
    pub required: f64,
    #[serde(serialize_with = "serialize_number")]
    pub completed: f64,
    #[serde(serialize_with = "serialize_number")]
    pub remaining: f64,
}

/// Render a number without a trailing `.0` when it is whole
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

fn serialize_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

fn serialize_optional_number<S: Serializer>(
    value: &Option<f64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => serialize_number(v, serializer),
        None => serializer.serialize_none(),
    }
}

fn serialize_date<S: Serializer>(
    value: &Option<NaiveDate>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(date) => serializer.collect_str(&date.format("%Y-%m-%d")),
        None => serializer.serialize_str(""),
    }
}

fn serialize_text<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(value.as_deref().unwrap_or(""))
}
