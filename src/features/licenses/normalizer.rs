//! Record normalizer
//!
//! Maps a [`RawRecord`] from any source onto the canonical [`License`].
//! Each target field has an ordered alias list; the first alias holding a
//! truthy value (not null, `""`, `0` or `false`) wins. Never fails: bad
//! numbers become 0 and bad dates become absent.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use log::debug;
use regex::Regex;
use serde_json::Value;
use sha1::{Digest, Sha1};
use std::sync::OnceLock;

use super::model::License;
use crate::features::sources::{FieldValue, RawRecord};

/// Length of a derived license id
pub const DERIVED_ID_LEN: usize = 12;

const ID: &[&str] = &["id"];
const FIRM_NAME: &[&str] = &["firm_name", "firmName"];
const LICENSE_NUMBER: &[&str] = &["license_number", "licenseNumber"];
const STATE: &[&str] = &["state"];
const STATUS: &[&str] = &["status"];
const EXPIRATION_DATE: &[&str] = &["expiration_date", "expirationDate"];
const CEU_REQUIRED: &[&str] = &["ceu_required", "ceuRequired"];
const CEU_COMPLETED: &[&str] = &["ceu_completed", "ceuCompleted"];
const HOLDER_NAME: &[&str] = &["holder_name", "holderName"];
const VERIFICATION_URL: &[&str] = &["verification_url", "verificationUrl"];

/// Normalize one raw record into a canonical license
pub fn normalize(raw: &RawRecord) -> License {
    let firm_name = text_field(raw, FIRM_NAME);
    let license_number = text_field(raw, LICENSE_NUMBER);
    let state = text_field(raw, STATE);

    let id = first_truthy(raw, ID)
        .map(value_to_text)
        .unwrap_or_else(|| derive_id(&firm_name, &license_number, &state));

    let expiration_date = first_truthy(raw, EXPIRATION_DATE).and_then(|value| {
        let parsed = parse_date(value);
        if parsed.is_none() {
            debug!("Ignoring unparseable expiration date {value:?} for license {id}");
        }
        parsed
    });

    License {
        status: text_field(raw, STATUS),
        expiration_date,
        ceu_required: first_truthy(raw, CEU_REQUIRED).map_or(0.0, parse_number),
        ceu_completed: first_truthy(raw, CEU_COMPLETED).map_or(0.0, parse_number),
        holder_name: optional_text(raw, HOLDER_NAME),
        verification_url: optional_text(raw, VERIFICATION_URL),
        id,
        firm_name,
        license_number,
        state,
    }
}

/// Deterministic id: SHA-1 over the non-empty parts joined by `-`, first 12 hex chars
pub fn derive_id(firm_name: &str, license_number: &str, state: &str) -> String {
    let seed = [firm_name, license_number, state]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("-");
    let mut digest = hex::encode(Sha1::digest(seed.as_bytes()));
    digest.truncate(DERIVED_ID_LEN);
    digest
}

fn first_truthy<'a>(raw: &'a RawRecord, aliases: &[&str]) -> Option<FieldValue<'a>> {
    aliases
        .iter()
        .filter_map(|key| raw.field(key))
        .find(is_truthy)
}

fn is_truthy(value: &FieldValue<'_>) -> bool {
    match value {
        FieldValue::Text(s) => !s.is_empty(),
        FieldValue::Json(Value::Null) => false,
        FieldValue::Json(Value::Bool(b)) => *b,
        FieldValue::Json(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        FieldValue::Json(Value::String(s)) => !s.is_empty(),
        FieldValue::Json(_) => true,
    }
}

fn value_to_text(value: FieldValue<'_>) -> String {
    match value {
        FieldValue::Text(s) => s.to_string(),
        FieldValue::Json(Value::String(s)) => s.clone(),
        FieldValue::Json(other) => other.to_string(),
    }
}

fn text_field(raw: &RawRecord, aliases: &[&str]) -> String {
    first_truthy(raw, aliases)
        .map(value_to_text)
        .unwrap_or_default()
}

fn optional_text(raw: &RawRecord, aliases: &[&str]) -> Option<String> {
    first_truthy(raw, aliases).map(value_to_text)
}

fn numeric_prefix() -> Option<&'static Regex> {
    static NUMERIC_PREFIX: OnceLock<Option<Regex>> = OnceLock::new();
    NUMERIC_PREFIX
        .get_or_init(|| Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").ok())
        .as_ref()
}

/// Parse the longest leading float; anything else is 0
pub fn parse_number_text(text: &str) -> f64 {
    let text = text.trim_start();
    numeric_prefix()
        .and_then(|re| re.find(text))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

fn parse_number(value: FieldValue<'_>) -> f64 {
    match value {
        FieldValue::Text(s) => parse_number_text(s),
        FieldValue::Json(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        FieldValue::Json(Value::String(s)) => parse_number_text(s),
        FieldValue::Json(_) => 0.0,
    }
}

/// Parse a calendar date from the formats sources commonly emit
pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Some(timestamp.with_timezone(&Utc).date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(text, format) {
            return Some(timestamp.date());
        }
    }
    ["%Y/%m/%d", "%m/%d/%Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

fn parse_date(value: FieldValue<'_>) -> Option<NaiveDate> {
    match value {
        FieldValue::Text(s) => parse_date_text(s),
        FieldValue::Json(Value::String(s)) => parse_date_text(s),
        FieldValue::Json(Value::Number(n)) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map(|timestamp| timestamp.date_naive()),
        FieldValue::Json(_) => None,
    }
}
