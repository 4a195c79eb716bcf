//! HTTP routes for Tileboard

pub mod health;
pub mod leaderboard;
pub mod response;

pub use health::{diagnostics, root};
pub use leaderboard::{handle_list_scores, handle_submit_score};
pub use response::{json_response, method_not_allowed_response, not_found_response};
