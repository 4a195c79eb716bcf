//! Tileboard - leaderboard backend for the Matching Tiles game
//!
//! Players submit finished games (name, elapsed time, move count) and fetch
//! the best scores, ranked by time with moves as the tie-breaker.
//!
//! ## Endpoints
//!
//! - `GET /` - banner message
//! - `GET /test` - database diagnostics
//! - `GET /api/leaderboard` - top 20 scores
//! - `POST /api/leaderboard` - submit a score
//!
//! Scores live in a MongoDB `leaderboard` collection. Without a configured
//! database the service still starts; data endpoints fail and diagnostics
//! report why.

pub mod config;
pub mod db;
pub mod leaderboard;
pub mod routes;
pub mod server;
pub mod types;

#[cfg(test)]
mod testing;

pub use config::Args;
pub use server::{run, AppState};
pub use types::{Result, TileboardError};
