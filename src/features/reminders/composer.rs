//! Reminder composer
//!
//! Turns expiring licenses into subject + body payloads. Pure.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use serde::Serialize;

use crate::features::licenses::model::format_number;
use crate::features::licenses::EnrichedLicense;

/// One composed reminder for one license
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReminderPayload {
    pub license: EnrichedLicense,
    pub message: String,
    pub subject: String,
}

/// Compose one payload per license, preserving order
pub fn compose(licenses: &[EnrichedLicense]) -> Vec<ReminderPayload> {
    licenses
        .iter()
        .map(|license| ReminderPayload {
            message: compose_message(license),
            subject: compose_subject(license),
            license: license.clone(),
        })
        .collect()
}

pub fn compose_subject(enriched: &EnrichedLicense) -> String {
    let license = &enriched.license;
    format!(
        "License renewal reminder: {} ({})",
        license.firm_name, license.state
    )
}

pub fn compose_message(enriched: &EnrichedLicense) -> String {
    let license = &enriched.license;
    let due = license
        .expiration_date
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "Unknown date".to_string());
    let status = if license.status.is_empty() {
        "Unknown"
    } else {
        license.status.as_str()
    };

    let mut lines = vec![
        format!(
            "License {} ({}) for {} is due on {due}.",
            license.license_number, license.state, license.firm_name
        ),
        format!("Status: {status}."),
        match enriched.ceu_remaining {
            Some(remaining) => format!("CEUs remaining: {}", format_number(remaining)),
            None => "CEUs remaining: not tracked".to_string(),
        },
    ];
    if let Some(url) = license.verification_url.as_deref().filter(|u| !u.is_empty()) {
        lines.push(format!("Verification URL: {url}"));
    }
    lines.join("\n")
}
