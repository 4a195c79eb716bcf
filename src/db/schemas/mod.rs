//! Database schemas for Tileboard

mod metadata;
mod score;

pub use metadata::Metadata;
pub use score::{ScoreDoc, LEADERBOARD_COLLECTION};
