//! Tests for OpenPhone delivery over the real HTTP transport.
//!
//! A mocked messages endpoint checks the request body and headers, and a
//! failing recipient must not stop the remaining sends.

use std::sync::Arc;

use chrono::NaiveDate;
use license_buddy::core::{HttpTransport, OpenPhoneConfig};
use license_buddy::features::licenses::LicenseCatalog;
use license_buddy::features::reminders::{
    ChannelSelection, OpenPhoneOverride, ReminderService, ReminderSettings,
};
use license_buddy::features::sources::InMemorySource;
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn service(server: &MockServer, to_numbers: &[&str]) -> ReminderService {
    let source = Arc::new(InMemorySource::from_json(vec![json!({
        "id": "abc123",
        "firmName": "Oasis Engineering LLC",
        "licenseNumber": "PE-0001",
        "state": "FL",
        "status": "Active",
        "expirationDate": "2024-01-21",
        "ceuRequired": 12,
        "ceuCompleted": 7,
    })]));
    let catalog = Arc::new(
        LicenseCatalog::new(source, 30).with_clock(|| NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
    );
    let settings = ReminderSettings {
        openphone: OpenPhoneConfig {
            api_key: "op-key".to_string(),
            from_number: "+15550000".to_string(),
            to_numbers: to_numbers.iter().map(|n| n.to_string()).collect(),
            endpoint: format!("{}/v1/messages", server.uri()),
            headers: vec![("X-Client".to_string(), "license-buddy".to_string())],
        },
        email_sender: String::new(),
        email_recipients: Vec::new(),
        outbox_dir: std::env::temp_dir(),
        default_lookahead_days: 30,
    };
    ReminderService::new(catalog, Arc::new(HttpTransport::new().unwrap()), settings)
}

fn openphone_only() -> ChannelSelection {
    ChannelSelection {
        openphone: Some(OpenPhoneOverride::default()),
        email: None,
    }
}

#[tokio::test]
async fn posts_one_message_per_recipient() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("authorization", "Bearer op-key"))
        .and(header("x-client", "license-buddy"))
        .and(body_partial_json(json!({ "from": "+15550000" })))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({ "data": {} })))
        .expect(2)
        .mount(&server)
        .await;

    let outcome = service(&server, &["+15550001", "+15550002"])
        .dispatch_reminders(None, &openphone_only())
        .await
        .unwrap();

    assert_eq!(outcome.reminders, 1);
    let result = &outcome.results[0];
    assert_eq!(result.channel, "openphone");
    assert_eq!(result.sent, 2);
    assert_eq!(result.skipped, 0);
    assert_eq!(result.errors, Some(vec![]));
}

#[tokio::test]
async fn message_body_matches_composed_reminder() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(body_json(json!({
            "to": "+15550001",
            "from": "+15550000",
            "text": "License PE-0001 (FL) for Oasis Engineering LLC is due on 2024-01-21.\n\
                     Status: Active.\n\
                     CEUs remaining: 5",
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = service(&server, &["+15550001"])
        .dispatch_reminders(Some(30), &openphone_only())
        .await
        .unwrap();
    assert_eq!(outcome.results[0].sent, 1);
}

#[tokio::test]
async fn failed_recipient_is_recorded_and_others_still_sent() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(body_partial_json(json!({ "to": "+15550002" })))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid number"))
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let outcome = service(&server, &["+15550001", "+15550002", "+15550003"])
        .dispatch_reminders(None, &openphone_only())
        .await
        .unwrap();

    let result = &outcome.results[0];
    assert_eq!(result.sent, 2);
    assert_eq!(result.skipped, 1);
    let errors = result.errors.as_ref().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].license_id.as_deref(), Some("abc123"));
    assert_eq!(errors[0].recipient.as_deref(), Some("+15550002"));
    assert_eq!(
        errors[0].message,
        "OpenPhone API request failed (status 400): invalid number"
    );
}

#[tokio::test]
async fn request_override_replaces_recipients() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(body_partial_json(json!({ "to": "+15559999" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let selection = ChannelSelection::from_request(&json!({ "openphone": "+15559999" }));
    let outcome = service(&server, &["+15550001"])
        .dispatch_reminders(None, &selection)
        .await
        .unwrap();
    assert_eq!(outcome.results[0].sent, 1);
}
