//! Error types for archtex operations.
//!
//! The transformation engine itself is total: indexing, resolution and
//! rendering never fail. Errors only arise at the edges, when an input file
//! or configuration is read from disk or configuration is parsed from JSON.

use thiserror::Error;

/// Errors from reading input files and loading configuration.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parsing error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
