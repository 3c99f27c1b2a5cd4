//! Errors raised at the TNFT service boundaries
//!
//! Enrichment failures never surface here; they are reduced to defaults
//! inside the pipeline. These are the failures of the primary record store,
//! of startup, and of caller-supplied input.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Ledger mirror query failed
    #[cfg(feature = "sqlx")]
    #[error("Ledger store error: {0}")]
    Database(#[from] sqlx::Error),

    /// Database directory could not be prepared
    #[error("Filesystem error: {0}")]
    Io(#[from] std::io::Error),

    /// Bad TOML file, env value or CLI flag
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller-supplied filter that cannot be interpreted
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Collaborator (HTTP client, directory) could not serve the call
    #[error("Unavailable: {0}")]
    Unavailable(String),
}
