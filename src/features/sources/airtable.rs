//! Airtable license source
//!
//! Pages through `GET /v0/{baseId}/{table}` following the `offset` cursor
//! until the API stops returning one.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;

use super::{LicenseSource, RawRecord};
use crate::core::config::AirtableConfig;
use crate::core::error::SourceError;

pub const AIRTABLE_API_BASE: &str = "https://api.airtable.com";

/// Default timeout for Airtable page requests in seconds
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct AirtablePage {
    #[serde(default)]
    records: Vec<AirtableRecord>,
    #[serde(default)]
    offset: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AirtableRecord {
    id: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

pub struct AirtableSource {
    client: reqwest::Client,
    config: AirtableConfig,
    base_url: String,
}

impl AirtableSource {
    /// Create a source against the public Airtable API
    pub fn new(config: AirtableConfig) -> Result<Self, SourceError> {
        if config.api_key.is_empty() || config.base_id.is_empty() || config.table_name.is_empty()
        {
            return Err(SourceError::MissingAirtableConfig);
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            config,
            base_url: AIRTABLE_API_BASE.to_string(),
        })
    }

    /// Point the source at a different API host
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn table_url(&self) -> Result<reqwest::Url, SourceError> {
        let invalid = || SourceError::InvalidUrl(self.base_url.clone());
        let mut url = reqwest::Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(["v0", self.config.base_id.as_str(), self.config.table_name.as_str()]);
        Ok(url)
    }

    async fn fetch_page(&self, offset: Option<&str>) -> Result<AirtablePage, SourceError> {
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(view) = self.config.view.as_deref() {
            query.push(("view", view));
        }
        if let Some(offset) = offset {
            query.push(("offset", offset));
        }

        let response = self
            .client
            .get(self.table_url()?)
            .query(&query)
            .bearer_auth(&self.config.api_key)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        if body.trim().is_empty() {
            return Ok(AirtablePage {
                records: Vec::new(),
                offset: None,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl LicenseSource for AirtableSource {
    async fn get_licenses(&self) -> Result<Vec<RawRecord>, SourceError> {
        let mut results = Vec::new();
        let mut offset: Option<String> = None;

        loop {
            let page = self.fetch_page(offset.as_deref()).await?;
            debug!(
                "Fetched {} Airtable records from {}",
                page.records.len(),
                self.config.table_name
            );
            results.extend(page.records.into_iter().map(|record| RawRecord::Table {
                id: record.id,
                fields: record.fields,
            }));

            match page.offset.filter(|o| !o.is_empty()) {
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        Ok(results)
    }
}
