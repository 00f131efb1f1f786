//! # Configuration
//!
//! Service configuration read once at startup from the process environment
//! (after `.env` has been loaded by the binary) and passed into each
//! component constructor.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::core::file_utils::resolve_path;

pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_LOOKAHEAD_DAYS: i64 = 30;
pub const DEFAULT_SCHEDULER_INTERVAL_MINUTES: u64 = 1440;
pub const DEFAULT_OPENPHONE_ENDPOINT: &str = "https://api.openphone.com/v1/messages";
pub const DEFAULT_AIRTABLE_TABLE: &str = "Licenses";

/// Which backend supplies raw license records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSourceKind {
    Csv,
    Airtable,
}

/// OpenPhone messaging credentials and default recipients
#[derive(Debug, Clone, PartialEq)]
pub struct OpenPhoneConfig {
    pub api_key: String,
    pub from_number: String,
    pub to_numbers: Vec<String>,
    pub endpoint: String,
    /// Extra headers sent with every message request
    pub headers: Vec<(String, String)>,
}

impl Default for OpenPhoneConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            from_number: String::new(),
            to_numbers: Vec::new(),
            endpoint: DEFAULT_OPENPHONE_ENDPOINT.to_string(),
            headers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AirtableConfig {
    pub api_key: String,
    pub base_id: String,
    pub table_name: String,
    pub view: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_source: DataSourceKind,
    pub csv_path: PathBuf,
    pub reminder_lookahead_days: i64,
    pub enable_scheduler: bool,
    pub scheduler_interval_minutes: u64,
    pub email_sender: String,
    pub email_recipients: Vec<String>,
    pub outbox_dir: PathBuf,
    pub openphone: OpenPhoneConfig,
    pub airtable: AirtableConfig,
    pub log_level: String,
}

impl Config {
    /// Build the configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string());
        let get_or = |key: &str, default: &str| {
            get(key)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let port = parse_number(&get_or("PORT", &DEFAULT_PORT.to_string()), "PORT")?;

        let data_source = match get_or("DATA_SOURCE", "csv").to_lowercase().as_str() {
            "airtable" => DataSourceKind::Airtable,
            _ => DataSourceKind::Csv,
        };

        let csv_path = resolve_path(get_or("CSV_PATH", "schemas/licenses.csv"));
        let outbox_dir = resolve_path(get_or("OUTBOX_DIR", "outbox"));

        let reminder_lookahead_days = parse_number(
            &get_or("REMINDER_LOOKAHEAD_DAYS", &DEFAULT_LOOKAHEAD_DAYS.to_string()),
            "REMINDER_LOOKAHEAD_DAYS",
        )?;
        let scheduler_interval_minutes = parse_number(
            &get_or(
                "SCHEDULER_INTERVAL_MINUTES",
                &DEFAULT_SCHEDULER_INTERVAL_MINUTES.to_string(),
            ),
            "SCHEDULER_INTERVAL_MINUTES",
        )?;

        let enable_scheduler = parse_bool(get("ENABLE_SCHEDULER").as_deref(), false);

        let openphone = OpenPhoneConfig {
            api_key: get_or("OPENPHONE_API_KEY", ""),
            from_number: get_or("OPENPHONE_FROM_NUMBER", ""),
            to_numbers: split_list(&get_or("OPENPHONE_TO_NUMBERS", "")),
            endpoint: get_or("OPENPHONE_ENDPOINT", DEFAULT_OPENPHONE_ENDPOINT),
            headers: Vec::new(),
        };

        let airtable = AirtableConfig {
            api_key: get_or("AIRTABLE_API_KEY", ""),
            base_id: get_or("AIRTABLE_BASE_ID", ""),
            table_name: get_or("AIRTABLE_TABLE", DEFAULT_AIRTABLE_TABLE),
            view: get("AIRTABLE_VIEW").filter(|v| !v.is_empty()),
        };

        Ok(Config {
            port,
            data_source,
            csv_path,
            reminder_lookahead_days,
            enable_scheduler,
            scheduler_interval_minutes,
            email_sender: get_or("EMAIL_SENDER", ""),
            email_recipients: split_list(&get_or("EMAIL_RECIPIENTS", "")),
            outbox_dir,
            openphone,
            airtable,
            log_level: get_or("LOG_LEVEL", "info"),
        })
    }
}

fn parse_number<T>(value: &str, key: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse::<T>()
        .with_context(|| format!("{key} must be a number, got '{value}'"))
}

/// Parse a boolean flag, falling back to `default` for unknown values
pub fn parse_bool(value: Option<&str>, default: bool) -> bool {
    let Some(value) = value else {
        return default;
    };
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => true,
        "0" | "false" | "no" | "n" | "off" => false,
        _ => default,
    }
}

/// Split a comma-separated list, trimming entries and dropping empties
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
