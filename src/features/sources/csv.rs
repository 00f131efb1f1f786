//! CSV license source
//!
//! Reads a header-first, comma-delimited file. Cells may be wrapped in double
//! quotes; a doubled quote inside a quoted cell is a literal quote.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;
use std::path::PathBuf;

use super::{LicenseSource, RawRecord};
use crate::core::error::SourceError;
use crate::core::file_utils::resolve_path;

pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: resolve_path(path.into()),
        }
    }
}

#[async_trait]
impl LicenseSource for CsvSource {
    async fn get_licenses(&self) -> Result<Vec<RawRecord>, SourceError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                path: self.path.clone(),
                source,
            })?;

        let rows = parse_csv(&content);
        debug!("Read {} rows from {}", rows.len(), self.path.display());
        Ok(rows.into_iter().map(RawRecord::Delimited).collect())
    }
}

/// Parse CSV text into header-keyed rows, skipping blank lines
pub fn parse_csv(content: &str) -> Vec<HashMap<String, String>> {
    let mut lines = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty());

    let Some(header_line) = lines.next() else {
        return Vec::new();
    };
    let headers = split_csv_line(header_line);

    lines
        .filter_map(|line| {
            let cells = split_csv_line(line);
            if cells.iter().all(|cell| cell.is_empty()) {
                return None;
            }
            let row = headers
                .iter()
                .enumerate()
                .map(|(index, header)| {
                    (header.clone(), cells.get(index).cloned().unwrap_or_default())
                })
                .collect();
            Some(row)
        })
        .collect()
}

/// Split one CSV line into trimmed cells
pub fn split_csv_line(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                cells.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    cells.push(current.trim().to_string());
    cells
}
