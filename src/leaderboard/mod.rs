//! Leaderboard service
//!
//! Ranking happens in the service rather than in the database, so the public
//! ordering does not depend on which [`DocumentStore`] backs it. Reads
//! over-fetch a bounded window and rank it in memory.

pub mod ranking;
pub mod submission;

pub use ranking::{rank, LeaderboardEntry, DEFAULT_NAME};
pub use submission::{FieldError, ScoreSubmission, ValidationErrors};

use bson::doc;
use tracing::debug;

use crate::db::schemas::{ScoreDoc, LEADERBOARD_COLLECTION};
use crate::db::DocumentStore;
use crate::types::Result;

/// Raw documents read per leaderboard request
pub const FETCH_LIMIT: i64 = 50;

/// Entries exposed publicly
pub const TOP_N: usize = 20;

/// Best scores, ranked by time then moves
pub async fn top_scores(store: &dyn DocumentStore) -> Result<Vec<LeaderboardEntry>> {
    let docs = store
        .get_documents(LEADERBOARD_COLLECTION, doc! {}, FETCH_LIMIT)
        .await?;
    debug!(fetched = docs.len(), "Ranking leaderboard documents");
    Ok(rank(docs, TOP_N))
}

/// Persist a validated submission, returning the new entry's id
pub async fn submit_score(store: &dyn DocumentStore, submission: ScoreSubmission) -> Result<String> {
    let score = ScoreDoc::new(submission.name, submission.time_ms, submission.moves);
    store
        .create_document(LEADERBOARD_COLLECTION, score.to_document()?)
        .await
}
