//! Error types for copyscan.
//!
//! Library crates use [`CopyscanError`] via `thiserror`.
//! App crates wrap this with `color-eyre` (cli) or map variants onto HTTP
//! statuses in one place (server).

use std::path::PathBuf;

/// Top-level error type for all copyscan operations.
#[derive(Debug, thiserror::Error)]
pub enum CopyscanError {
    /// Request validation error (missing text/file, empty input).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// File extension not recognized by the document extractor.
    #[error("unsupported file type: {name}")]
    UnsupportedFormat { name: String },

    /// Corrupt or empty document content.
    #[error("extraction error: {message}")]
    Extraction { message: String },

    /// Network/HTTP error during search lookup or page fetch.
    ///
    /// Always absorbed inside the pipeline stages (the item simply produces
    /// no result); never surfaced as a per-request error.
    #[error("network error: {0}")]
    Network(String),

    /// Semantic-annotation service failure, surfaced verbatim to the caller.
    /// `status` is the upstream HTTP status when one was received.
    #[error("annotation API error: {message}")]
    UpstreamApi {
        status: Option<u16>,
        message: String,
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

    /// Any fault outside the per-item boundaries of the pipeline.
    /// Reported to callers as a generic message; the detail is logged.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, CopyscanError>;

impl CopyscanError {
    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Create an unsupported-format error carrying the offending file name.
    pub fn unsupported_format(name: impl Into<String>) -> Self {
        Self::UnsupportedFormat { name: name.into() }
    }

    /// Create an extraction error from any displayable message.
    pub fn extraction(msg: impl Into<String>) -> Self {
        Self::Extraction {
            message: msg.into(),
        }
    }

    /// Create an upstream-API error from an HTTP status and response body.
    pub fn upstream(status: u16, body: impl Into<String>) -> Self {
        Self::UpstreamApi {
            status: Some(status),
            message: format!("HTTP {status}: {}", body.into()),
        }
    }

    /// Create an upstream-API error for a transport-level failure.
    pub fn upstream_transport(msg: impl Into<String>) -> Self {
        Self::UpstreamApi {
            status: None,
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

    /// Create an internal error from any displayable message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
