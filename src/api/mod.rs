//! # HTTP API
//!
//! | Method | Path | Body |
//! |---|---|---|
//! | GET | `/health` | `{status}` |
//! | GET | `/licenses` | `{licenses}` |
//! | GET | `/licenses/expiring?days=N` | `{licenses, days}` |
//! | GET | `/licenses/expired` | `{licenses}` |
//! | GET | `/licenses/ceu-summary` | `{summary}` |
//! | POST | `/reminders/preview` | `{reminders, payloads}` |
//! | POST | `/reminders/dispatch` | `{reminders, results}` |
//!
//! Every response allows any origin. `OPTIONS` on any path answers the
//! preflight with 204; anything else unmatched is a JSON 404.

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

use axum::extract::Request;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::middleware::{from_fn, Next};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::json;
use tower_http::set_header::SetResponseHeaderLayer;

/// Assemble the application router
pub fn app(state: AppState) -> Router {
    routes::router()
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
        .layer(from_fn(preflight))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .with_state(state)
}

async fn preflight(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return (
            StatusCode::NO_CONTENT,
            [
                (ACCESS_CONTROL_ALLOW_METHODS, "GET,POST,OPTIONS"),
                (ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
            ],
        )
            .into_response();
    }
    next.run(request).await
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "message": "Not Found" })))
}
