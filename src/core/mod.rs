//! # Core Module
//!
//! Configuration, error types, outbound transport and file helpers shared by
//! every feature.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod config;
pub mod error;
pub mod file_utils;
pub mod http;

// Re-export commonly used items
pub use config::{AirtableConfig, Config, DataSourceKind, OpenPhoneConfig};
pub use error::{DispatchError, SourceError, TransportError};
pub use http::{HttpTransport, JsonTransport};
