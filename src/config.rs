//! Configuration for Tileboard
//!
//! CLI arguments and environment variable handling using clap.
//! Every flag falls back to an environment variable, so a `.env` file or the
//! hosting platform's environment is enough to run the service.

use clap::Parser;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::types::{Result, TileboardError};

/// Tileboard - leaderboard API for the Matching Tiles game
#[derive(Parser, Debug, Clone)]
#[command(name = "tileboard")]
#[command(about = "Leaderboard backend for the Matching Tiles game")]
pub struct Args {
    /// MongoDB connection string
    /// The service runs without a database (degraded mode) if unset
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// MongoDB database name
    #[arg(long, env = "DATABASE_NAME")]
    pub database_name: Option<String>,

    /// Address to bind
    #[arg(long, env = "HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value = "8000")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, env = "LOG_JSON", default_value = "false")]
    pub log_json: bool,
}

impl Args {
    /// Socket address the HTTP server binds to
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Connection string and database name, when both are configured
    pub fn database_config(&self) -> Option<(&str, &str)> {
        match (&self.database_url, &self.database_name) {
            (Some(url), Some(name)) => Some((url.as_str(), name.as_str())),
            _ => None,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if matches!(self.database_url.as_deref(), Some(url) if url.trim().is_empty()) {
            return Err(TileboardError::Config(
                "DATABASE_URL is set but empty".to_string(),
            ));
        }
        if matches!(self.database_name.as_deref(), Some(name) if name.trim().is_empty()) {
            return Err(TileboardError::Config(
                "DATABASE_NAME is set but empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn test_args() -> Args {
    Args {
        database_url: None,
        database_name: None,
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        log_level: "info".to_string(),
        log_json: false,
    }
}
