//! # API Error
//!
//! Every handler failure becomes a 500 with the route's message and the
//! underlying error text.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
#[error("{message}: {error}")]
pub struct ApiError {
    /// Route-specific summary, e.g. "Failed to load licenses"
    pub message: &'static str,
    pub error: String,
}

impl ApiError {
    pub fn new(message: &'static str, error: impl std::fmt::Display) -> Self {
        Self {
            message,
            error: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("{self}");
        let body = json!({
            "message": self.message,
            "error": self.error,
        });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_renders_500_with_message_and_error() {
        let response = ApiError::new("Failed to load licenses", "disk on fire").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            json!({ "message": "Failed to load licenses", "error": "disk on fire" })
        );
    }
}
