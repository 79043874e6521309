//! Error types for docboard.
//!
//! Library crates use [`DocboardError`] via `thiserror`.
//! App crates (cli/tui) wrap this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all docboard operations.
///
/// The first four variants are the fatal, dataset-level failure states of
/// the pipeline. Row-level derivation misses are not errors — they null
/// the affected field and the row survives.
#[derive(Debug, thiserror::Error)]
pub enum DocboardError {
    /// Source unreachable or non-success HTTP status.
    #[error("fetch error for {url}: {message}")]
    Fetch { url: String, message: String },

    /// Payload retrieved but not decodable under the detected encoding.
    #[error("decode error for {url}: {encoding}: {message}")]
    Decode {
        url: String,
        encoding: String,
        message: String,
    },

    /// Decoded text is not valid tabular CSV.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Required columns missing from the header row.
    #[error("schema error: missing columns {missing:?}; columns present: {found:?}")]
    Schema {
        missing: Vec<String>,
        found: Vec<String>,
    },

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DocboardError>;

impl DocboardError {
    /// Create a fetch error carrying the attempted URL.
    pub fn fetch(url: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            message: msg.into(),
        }
    }

    /// Create a decode error carrying the attempted URL and encoding name.
    pub fn decode(
        url: impl Into<String>,
        encoding: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        Self::Decode {
            url: url.into(),
            encoding: encoding.into(),
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
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
