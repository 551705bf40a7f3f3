//! Error types for Jhund

use crate::config::ConfigError;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Jhund error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// No agent with this id in the swarm
    #[error("Unknown agent: {0}")]
    UnknownAgent(usize),
}
