//! Shared error and result types

use thiserror::Error;

/// Errors raised by the storage layer and server plumbing
#[derive(Debug, Error)]
pub enum TileboardError {
    /// The storage backend rejected or failed an operation
    #[error("Database error: {0}")]
    Database(String),

    /// No database handle exists (degraded mode)
    #[error("Database not available. Check DATABASE_URL and DATABASE_NAME environment variables")]
    DatabaseUnavailable,

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TileboardError {
    /// Underlying message without the category prefix
    pub fn cause(&self) -> String {
        match self {
            Self::Database(msg) | Self::Config(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TileboardError>;

/// Cut `message` down to at most `max_chars` characters.
pub fn truncate_chars(message: &str, max_chars: usize) -> &str {
    match message.char_indices().nth(max_chars) {
        Some((idx, _)) => &message[..idx],
        None => message,
    }
}
