//! License catalog
//!
//! Fetches raw records, normalizes and enriches them, and exposes the sorted
//! catalog plus its filtered views. Every read hits the source again; there
//! is no cache.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use chrono::{NaiveDate, Utc};
use log::debug;
use std::cmp::Ordering;
use std::sync::Arc;

use super::insights::enrich;
use super::model::{CeuSummary, EnrichedLicense};
use super::normalizer::normalize;
use crate::core::error::SourceError;
use crate::features::sources::LicenseSource;

/// Jurisdiction label for licenses without a state
pub const UNKNOWN_STATE: &str = "Unknown";

type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

pub struct LicenseCatalog {
    source: Arc<dyn LicenseSource>,
    reminder_window_days: i64,
    today: Clock,
}

impl LicenseCatalog {
    pub fn new(source: Arc<dyn LicenseSource>, reminder_window_days: i64) -> Self {
        Self {
            source,
            reminder_window_days,
            today: Arc::new(|| Utc::now().date_naive()),
        }
    }

    /// Replace the clock used as the enrichment reference date
    pub fn with_clock<F>(mut self, today: F) -> Self
    where
        F: Fn() -> NaiveDate + Send + Sync + 'static,
    {
        self.today = Arc::new(today);
        self
    }

    /// Every license, enriched and sorted by expiration date
    pub async fn list_licenses(&self) -> Result<Vec<EnrichedLicense>, SourceError> {
        let records = self.source.get_licenses().await?;
        let today = (self.today)();

        let mut licenses: Vec<EnrichedLicense> = records
            .iter()
            .map(|raw| enrich(normalize(raw), today, self.reminder_window_days))
            .collect();
        licenses.sort_by(compare_by_expiration);

        debug!("Catalog loaded {} licenses (today {today})", licenses.len());
        Ok(licenses)
    }

    /// Licenses expiring between today and `within_days` out, inclusive
    pub async fn get_expiring_licenses(
        &self,
        within_days: i64,
    ) -> Result<Vec<EnrichedLicense>, SourceError> {
        let licenses = self.list_licenses().await?;
        Ok(licenses
            .into_iter()
            .filter(|license| {
                license
                    .days_until_expiration
                    .is_some_and(|days| (0..=within_days).contains(&days))
            })
            .collect())
    }

    pub async fn get_expired_licenses(&self) -> Result<Vec<EnrichedLicense>, SourceError> {
        let licenses = self.list_licenses().await?;
        Ok(licenses.into_iter().filter(|l| l.is_expired).collect())
    }

    /// CEU totals per state, in order of first appearance
    pub async fn summarize_ceu_progress(&self) -> Result<Vec<CeuSummary>, SourceError> {
        let licenses = self.list_licenses().await?;
        Ok(summarize(&licenses))
    }
}

/// Dated licenses ascending; undated last, ordered by firm name
fn compare_by_expiration(a: &EnrichedLicense, b: &EnrichedLicense) -> Ordering {
    match (a.license.expiration_date, b.license.expiration_date) {
        (Some(left), Some(right)) => left.cmp(&right),
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (None, None) => compare_firm_names(&a.license.firm_name, &b.license.firm_name),
    }
}

/// Case-insensitive, with the exact text breaking ties
fn compare_firm_names(left: &str, right: &str) -> Ordering {
    left.to_lowercase()
        .cmp(&right.to_lowercase())
        .then_with(|| left.cmp(right))
}

fn summarize(licenses: &[EnrichedLicense]) -> Vec<CeuSummary> {
    let mut summary: Vec<CeuSummary> = Vec::new();

    for enriched in licenses {
        let license = &enriched.license;
        let state = if license.state.is_empty() {
            UNKNOWN_STATE
        } else {
            license.state.as_str()
        };

        let index = match summary.iter().position(|entry| entry.state == state) {
            Some(index) => index,
            None => {
                summary.push(CeuSummary {
                    state: state.to_string(),
                    required: 0.0,
                    completed: 0.0,
                    remaining: 0.0,
                });
                summary.len() - 1
            }
        };
        summary[index].required += license.ceu_required;
        summary[index].completed += license.ceu_completed;
    }

    for entry in &mut summary {
        entry.remaining = (entry.required - entry.completed).max(0.0);
    }
    summary
}
