//! HTTP server for Tileboard

pub mod cors;
pub mod http;

pub use http::{handle_request, run, serve, AppState};
