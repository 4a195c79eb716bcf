//! Service banner and diagnostics endpoints
//!
//! - `/` - fixed message confirming the API is up
//! - `/test` - database diagnostics for operators
//!
//! Diagnostics always answer 200. Every fault (no database handle, failed
//! listing) is reported as a status string in the body instead of an error
//! status, so the endpoint stays usable while the database is down.

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

use crate::routes::response::json_response;
use crate::server::AppState;
use crate::types::truncate_chars;

/// Collections listed in diagnostics at most
const MAX_LISTED_COLLECTIONS: usize = 10;

/// Characters of a listing error shown in diagnostics
const DIAGNOSTIC_ERROR_CHARS: usize = 50;

#[derive(Serialize)]
pub struct RootResponse {
    pub message: &'static str,
}

/// Handle GET /
pub fn root() -> Response<Full<Bytes>> {
    json_response(
        StatusCode::OK,
        &RootResponse {
            message: "Matching Tiles API running",
        },
    )
}

/// Diagnostics report for GET /test
#[derive(Debug, Serialize)]
pub struct DiagnosticsResponse {
    /// Always "✅ Running" when the service answers
    pub backend: &'static str,
    /// Database state, including a short error when listing fails
    pub database: String,
    /// Whether DATABASE_URL is configured (never its value)
    pub database_url: &'static str,
    /// Whether DATABASE_NAME is configured (never its value)
    pub database_name: &'static str,
    /// "Connected" when a database handle exists
    pub connection_status: &'static str,
    /// Up to ten collection names
    pub collections: Vec<String>,
}

fn presence(value: &Option<String>) -> &'static str {
    if value.is_some() {
        "✅ Set"
    } else {
        "❌ Not Set"
    }
}

/// Build the diagnostics report; never fails
pub async fn build_diagnostics(state: &AppState) -> DiagnosticsResponse {
    let mut response = DiagnosticsResponse {
        backend: "✅ Running",
        database: "⚠️  Available but not initialized".to_string(),
        database_url: presence(&state.args.database_url),
        database_name: presence(&state.args.database_name),
        connection_status: "Not Connected",
        collections: Vec::new(),
    };

    let Some(ref store) = state.store else {
        return response;
    };

    response.database = "✅ Available".to_string();
    response.connection_status = "Connected";

    match store.list_collection_names().await {
        Ok(mut names) => {
            names.truncate(MAX_LISTED_COLLECTIONS);
            response.collections = names;
            response.database = "✅ Connected & Working".to_string();
        }
        Err(e) => {
            warn!("Diagnostics: listing collections failed: {}", e);
            response.database = format!(
                "⚠️  Connected but Error: {}",
                truncate_chars(&e.cause(), DIAGNOSTIC_ERROR_CHARS)
            );
        }
    }

    response
}

/// Handle GET /test
pub async fn diagnostics(state: Arc<AppState>) -> Response<Full<Bytes>> {
    json_response(StatusCode::OK, &build_diagnostics(&state).await)
}
