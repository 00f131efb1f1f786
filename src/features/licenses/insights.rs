//! Insight calculator
//!
//! Derives expiration and CEU progress fields relative to a caller-supplied
//! reference date. Reads no clock.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use chrono::NaiveDate;

use super::model::{EnrichedLicense, License};

/// Enrich a license against `reference_date`.
///
/// A license expiring exactly `reminder_window_days` out is still expiring
/// soon; one expiring today (0 days) is not expired.
pub fn enrich(
    license: License,
    reference_date: NaiveDate,
    reminder_window_days: i64,
) -> EnrichedLicense {
    let days_until_expiration = license
        .expiration_date
        .map(|expiration| (expiration - reference_date).num_days());

    let is_expired = days_until_expiration.is_some_and(|days| days < 0);
    let is_expiring_soon =
        !is_expired && days_until_expiration.is_some_and(|days| days <= reminder_window_days);

    let ceu_remaining = if license.ceu_required != 0.0 {
        Some((license.ceu_required - license.ceu_completed).max(0.0))
    } else {
        None
    };

    EnrichedLicense {
        license,
        days_until_expiration,
        is_expired,
        is_expiring_soon,
        ceu_remaining,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn license(expiration: Option<NaiveDate>, required: f64, completed: f64) -> License {
        License {
            id: "1".to_string(),
            firm_name: "Test Firm".to_string(),
            license_number: "LIC-1".to_string(),
            state: "FL".to_string(),
            status: "Active".to_string(),
            expiration_date: expiration,
            ceu_required: required,
            ceu_completed: completed,
            holder_name: None,
            verification_url: None,
        }
    }

    #[test]
    fn test_enrich_days_and_ceu() {
        let enriched = enrich(
            license(Some(date(2024, 1, 31)), 18.0, 10.0),
            date(2024, 1, 1),
            60,
        );
        assert_eq!(enriched.days_until_expiration, Some(30));
        assert!(!enriched.is_expired);
        assert!(enriched.is_expiring_soon);
        assert_eq!(enriched.ceu_remaining, Some(8.0));
    }

    #[test]
    fn test_window_boundary_is_inclusive() {
        let today = date(2024, 1, 1);
        let at_edge = enrich(license(Some(date(2024, 1, 31)), 0.0, 0.0), today, 30);
        assert!(at_edge.is_expiring_soon);

        let past_edge = enrich(license(Some(date(2024, 2, 1)), 0.0, 0.0), today, 30);
        assert_eq!(past_edge.days_until_expiration, Some(31));
        assert!(!past_edge.is_expiring_soon);
    }

    #[test]
    fn test_expiry_boundary_is_strict() {
        let today = date(2024, 1, 1);
        let yesterday = enrich(license(Some(date(2023, 12, 31)), 0.0, 0.0), today, 30);
        assert_eq!(yesterday.days_until_expiration, Some(-1));
        assert!(yesterday.is_expired);
        assert!(!yesterday.is_expiring_soon);

        let due_today = enrich(license(Some(today), 0.0, 0.0), today, 30);
        assert_eq!(due_today.days_until_expiration, Some(0));
        assert!(!due_today.is_expired);
        assert!(due_today.is_expiring_soon);
    }

    #[test]
    fn test_missing_expiration() {
        let enriched = enrich(license(None, 10.0, 2.0), date(2024, 1, 1), 30);
        assert_eq!(enriched.days_until_expiration, None);
        assert!(!enriched.is_expired);
        assert!(!enriched.is_expiring_soon);
    }

    #[test]
    fn test_zero_ceu_requirement_is_untracked() {
        for completed in [0.0, 5.0] {
            let enriched = enrich(license(None, 0.0, completed), date(2024, 1, 1), 30);
            assert_eq!(enriched.ceu_remaining, None);
        }
    }

    #[test]
    fn test_ceu_remaining_never_negative() {
        for (required, completed, remaining) in [(18.0, 10.0, 8.0), (15.0, 15.0, 0.0), (12.0, 20.0, 0.0)] {
            let enriched = enrich(license(None, required, completed), date(2024, 1, 1), 30);
            assert_eq!(enriched.ceu_remaining, Some(remaining));
        }
    }
}
