//! Error types for SmartCheck.
//!
//! Library crates use [`SmartCheckError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.
//!
//! The inference pipeline itself is total and never produces these errors;
//! they arise only at the boundary (config loading, input parsing, answer
//! validation).

use std::path::PathBuf;

/// Top-level error type for all fallible SmartCheck operations.
#[derive(Debug, thiserror::Error)]
pub enum SmartCheckError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Malformed JSON/TOML input.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Well-formed input with the wrong shape (e.g. a list answer for a yes/no question).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SmartCheckError>;

impl SmartCheckError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
