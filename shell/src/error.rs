//! Error types for the shell layer

use thiserror::Error;
use zpaceway_core::engine::EngineError;

/// Failure reading the user's chosen file. The caller must pick a file again.
#[derive(Error, Debug)]
pub enum ReadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("read aborted")]
    Aborted,

    #[error("invalid ZIP: {0}")]
    Archive(String),

    #[error("ZIP archive contains no files")]
    EmptyArchive,
}

/// Failure obtaining the engine implementation.
///
/// Kept apart from [`EngineError`], which covers a running engine.
#[derive(Error, Debug)]
pub enum AcquireError {
    #[error("no engine named {name:?} (available: {available})")]
    NotRegistered { name: String, available: String },

    #[error("engine unavailable: {0}")]
    Unavailable(String),
}

/// Any failure surfaced by the application controller.
#[derive(Error, Debug)]
pub enum ShellError {
    #[error("could not read ROM: {0}")]
    Read(#[from] ReadError),

    #[error("could not acquire engine: {0}")]
    Acquire(#[from] AcquireError),

    /// Engine errors pass through without added context.
    #[error(transparent)]
    Emulation(#[from] EngineError),
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("could not parse {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}
