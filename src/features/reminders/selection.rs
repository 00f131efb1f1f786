//! Channel selection
//!
//! Normalizes the loose `channels` request object into a typed selection.
//! Each channel is either absent (not selected) or carries the overrides to
//! apply on top of the service defaults.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use serde_json::Value;

use crate::core::config::{Config, OpenPhoneConfig};

/// Per-field OpenPhone overrides; `None` keeps the configured default
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpenPhoneOverride {
    pub api_key: Option<String>,
    pub from_number: Option<String>,
    pub to_numbers: Option<Vec<String>>,
    pub endpoint: Option<String>,
    pub headers: Option<Vec<(String, String)>>,
}

impl OpenPhoneOverride {
    /// Overlay onto `defaults`, normalizing the recipient list
    pub fn apply(&self, defaults: &OpenPhoneConfig) -> OpenPhoneConfig {
        let pick = |value: &Option<String>, default: &String| {
            value.clone().unwrap_or_else(|| default.clone())
        };
        let to_numbers = self
            .to_numbers
            .clone()
            .unwrap_or_else(|| defaults.to_numbers.clone());

        OpenPhoneConfig {
            api_key: pick(&self.api_key, &defaults.api_key),
            from_number: pick(&self.from_number, &defaults.from_number),
            to_numbers: normalize_recipient_list(&to_numbers),
            endpoint: pick(&self.endpoint, &defaults.endpoint),
            headers: self
                .headers
                .clone()
                .unwrap_or_else(|| defaults.headers.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmailSelection {
    /// `None` uses the default recipients
    pub recipients: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelSelection {
    pub openphone: Option<OpenPhoneOverride>,
    pub email: Option<EmailSelection>,
}

impl ChannelSelection {
    pub fn is_empty(&self) -> bool {
        self.openphone.is_none() && self.email.is_none()
    }

    /// Parse the `channels` value of a dispatch request
    pub fn from_request(channels: &Value) -> Self {
        let Some(map) = channels.as_object() else {
            return Self::default();
        };

        let openphone = [map.get("openphone"), map.get("openPhone")]
            .into_iter()
            .flatten()
            .find(|value| is_truthy(value))
            .map(parse_openphone);

        let email = map
            .get("email")
            .filter(|value| is_truthy(value))
            .map(parse_email);

        Self { openphone, email }
    }

    /// Selection used by the scheduler: OpenPhone when an API key or
    /// recipients are configured, email when recipients are configured
    pub fn from_config(config: &Config) -> Self {
        let openphone_configured =
            !config.openphone.api_key.is_empty() || !config.openphone.to_numbers.is_empty();

        Self {
            openphone: openphone_configured.then(OpenPhoneOverride::default),
            email: (!config.email_recipients.is_empty()).then(|| EmailSelection {
                recipients: Some(config.email_recipients.clone()),
            }),
        }
    }
}

fn parse_openphone(value: &Value) -> OpenPhoneOverride {
    match value {
        Value::String(_) | Value::Array(_) => OpenPhoneOverride {
            to_numbers: Some(normalize_recipients(value)),
            ..Default::default()
        },
        Value::Object(map) => {
            let text = |key: &str| {
                map.get(key).and_then(|v| match v {
                    Value::Null => None,
                    Value::String(s) => Some(s.clone()),
                    other => Some(other.to_string()),
                })
            };
            OpenPhoneOverride {
                api_key: text("apiKey"),
                from_number: text("fromNumber"),
                to_numbers: map
                    .get("toNumbers")
                    .filter(|v| !v.is_null())
                    .map(normalize_recipients),
                endpoint: text("endpoint"),
                headers: map.get("headers").and_then(Value::as_object).map(|headers| {
                    headers
                        .iter()
                        .filter_map(|(name, value)| match value {
                            Value::String(s) => Some((name.clone(), s.clone())),
                            Value::Null => None,
                            other => Some((name.clone(), other.to_string())),
                        })
                        .collect()
                }),
            }
        }
        _ => OpenPhoneOverride::default(),
    }
}

fn parse_email(value: &Value) -> EmailSelection {
    let recipients = match value {
        Value::String(_) | Value::Array(_) => Some(normalize_recipients(value)),
        Value::Object(map) => map
            .get("recipients")
            .filter(|v| is_truthy(v))
            .map(normalize_recipients),
        _ => None,
    };
    EmailSelection { recipients }
}

/// Comma-separated string or array into a trimmed, non-empty list
pub fn normalize_recipients(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.trim().to_string(),
                Value::Null => String::new(),
                other => other.to_string(),
            })
            .filter(|item| !item.is_empty())
            .collect(),
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect(),
        Value::Null => Vec::new(),
        other => vec![other.to_string()],
    }
}

fn normalize_recipient_list(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
