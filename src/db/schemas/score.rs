//! Score document schema
//!
//! One finished game: who played, how long it took, how many moves.

use bson::{oid::ObjectId, Document};
use serde::{Deserialize, Serialize};

use crate::db::schemas::Metadata;
use crate::types::{Result, TileboardError};

/// Collection name for leaderboard scores
pub const LEADERBOARD_COLLECTION: &str = "leaderboard";

/// Score document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ScoreDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata
    #[serde(default)]
    pub metadata: Metadata,

    /// Display name
    pub name: String,

    /// Elapsed time in milliseconds
    pub time_ms: i64,

    /// Move count
    pub moves: i64,
}

impl ScoreDoc {
    /// Create a new score document stamped with the current time
    pub fn new(name: String, time_ms: i64, moves: i64) -> Self {
        Self {
            _id: None,
            metadata: Metadata::new(),
            name,
            time_ms,
            moves,
        }
    }

    /// Encode for insertion
    pub fn to_document(&self) -> Result<Document> {
        bson::to_document(self)
            .map_err(|e| TileboardError::Database(format!("Failed to encode score: {}", e)))
    }
}
