//! # Routes
//!
//! License views and reminder endpoints. Handlers delegate to the catalog
//! and reminder service; request parsing stays lenient (empty body is `{}`,
//! day counts accept numbers or numeric strings).

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;

use super::error::ApiError;
use super::state::AppState;
use crate::core::config::DEFAULT_LOOKAHEAD_DAYS;
use crate::features::reminders::{ChannelSelection, DispatchOutcome};

const LOAD_LICENSES: &str = "Failed to load licenses";
const LOAD_EXPIRING: &str = "Failed to load expiring licenses";
const LOAD_EXPIRED: &str = "Failed to load expired licenses";
const SUMMARIZE_CEU: &str = "Failed to summarize CEU progress";
const PREPARE_REMINDERS: &str = "Failed to prepare reminders";
const DISPATCH_REMINDERS: &str = "Failed to dispatch reminders";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/licenses", get(list_licenses))
        .route("/licenses/expiring", get(expiring_licenses))
        .route("/licenses/expired", get(expired_licenses))
        .route("/licenses/ceu-summary", get(ceu_summary))
        .route("/reminders/preview", post(preview_reminders))
        .route("/reminders/dispatch", post(dispatch_reminders))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn list_licenses(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let licenses = state
        .catalog
        .list_licenses()
        .await
        .map_err(|e| ApiError::new(LOAD_LICENSES, e))?;
    Ok(Json(json!({ "licenses": licenses })))
}

async fn expiring_licenses(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    let days = params
        .get("days")
        .filter(|value| !value.is_empty())
        .and_then(|value| parse_leading_int(value))
        .unwrap_or(DEFAULT_LOOKAHEAD_DAYS);

    let licenses = state
        .catalog
        .get_expiring_licenses(days)
        .await
        .map_err(|e| ApiError::new(LOAD_EXPIRING, e))?;
    Ok(Json(json!({ "licenses": licenses, "days": days })))
}

async fn expired_licenses(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let licenses = state
        .catalog
        .get_expired_licenses()
        .await
        .map_err(|e| ApiError::new(LOAD_EXPIRED, e))?;
    Ok(Json(json!({ "licenses": licenses })))
}

async fn ceu_summary(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let summary = state
        .catalog
        .summarize_ceu_progress()
        .await
        .map_err(|e| ApiError::new(SUMMARIZE_CEU, e))?;
    Ok(Json(json!({ "summary": summary })))
}

async fn preview_reminders(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let body = parse_body(&body).map_err(|e| ApiError::new(PREPARE_REMINDERS, e))?;
    let within_days = body
        .get("withinDays")
        .filter(|value| is_present(value))
        .and_then(within_days)
        .unwrap_or(DEFAULT_LOOKAHEAD_DAYS);

    let payloads = state
        .reminders
        .prepare_reminder_payloads(within_days)
        .await
        .map_err(|e| ApiError::new(PREPARE_REMINDERS, e))?;
    Ok(Json(json!({ "reminders": payloads.len(), "payloads": payloads })))
}

async fn dispatch_reminders(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<DispatchOutcome>, ApiError> {
    let body = parse_body(&body).map_err(|e| ApiError::new(DISPATCH_REMINDERS, e))?;
    let within_days = body.get("withinDays").and_then(within_days);
    let selection = body
        .get("channels")
        .map(ChannelSelection::from_request)
        .unwrap_or_default();

    let outcome = state
        .reminders
        .dispatch_reminders(within_days, &selection)
        .await
        .map_err(|e| ApiError::new(DISPATCH_REMINDERS, e))?;
    Ok(Json(outcome))
}

/// Empty or `null` bodies read as an empty object
fn parse_body(bytes: &[u8]) -> Result<Value, serde_json::Error> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(json!({}));
    }
    let value: Value = serde_json::from_slice(bytes)?;
    Ok(if value.is_null() { json!({}) } else { value })
}

/// Day count from a JSON number or a numeric string
fn within_days(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => parse_leading_int(s),
        _ => None,
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Base-10 integer prefix of `text`, e.g. `"45 days"` is 45
pub fn parse_leading_int(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, text.strip_prefix('+').unwrap_or(text)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}
