//! File utility functions for the email outbox and CSV data files
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use std::path::{Path, PathBuf};

/// Maximum length of the sanitized component of a draft filename
pub const MAX_FILENAME_COMPONENT: usize = 50;

/// Sanitize a value for use inside a filename.
///
/// Every character outside `[A-Za-z0-9_-]` becomes `_`. Truncates to 50
/// characters.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(MAX_FILENAME_COMPONENT)
        .collect()
}

/// Resolve a possibly relative path against the current working directory.
pub fn resolve_path(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}
