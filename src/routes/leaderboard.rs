//! Leaderboard API
//!
//! ## Endpoints
//!
//! - `GET /api/leaderboard` - top 20 scores, best first
//! - `POST /api/leaderboard` - submit `{name, time_ms, moves}`, returns `{id}`

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Body;
use hyper::{Request, Response, StatusCode};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::leaderboard::{self, ScoreSubmission};
use crate::routes::response::{detail_response, json_response};
use crate::server::AppState;
use crate::types::TileboardError;

/// Response for POST /api/leaderboard
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: String,
}

fn storage_error_response(err: &TileboardError) -> Response<Full<Bytes>> {
    error!("Leaderboard storage error: {}", err);
    detail_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
}

/// Handle GET /api/leaderboard
pub async fn handle_list_scores(state: Arc<AppState>) -> Response<Full<Bytes>> {
    let Some(ref store) = state.store else {
        return storage_error_response(&TileboardError::DatabaseUnavailable);
    };

    match leaderboard::top_scores(store.as_ref()).await {
        Ok(entries) => json_response(StatusCode::OK, &entries),
        Err(e) => storage_error_response(&e),
    }
}

/// Handle POST /api/leaderboard
pub async fn handle_submit_score<B>(req: Request<B>, state: Arc<AppState>) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    let body = match req.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!("Score submission body error: {}", e);
            return detail_response(
                StatusCode::BAD_REQUEST,
                &format!("Failed to read request body: {}", e),
            );
        }
    };

    let submission = match ScoreSubmission::from_json(&body) {
        Ok(s) => s,
        Err(errors) => {
            warn!("Rejected score submission: {}", errors);
            return json_response(StatusCode::UNPROCESSABLE_ENTITY, &errors);
        }
    };

    let Some(ref store) = state.store else {
        return storage_error_response(&TileboardError::DatabaseUnavailable);
    };

    match leaderboard::submit_score(store.as_ref(), submission).await {
        Ok(id) => {
            info!(id = %id, "Score recorded");
            json_response(StatusCode::CREATED, &CreatedResponse { id })
        }
        Err(e) => storage_error_response(&e),
    }
}
