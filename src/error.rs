//! Unified error handling for the newsgraph crate
//!
//! - [`ErrorCategory`] - Classification of errors for handling strategies
//! - [`Error`] - Unified error enum wrapping all domain-specific errors
//!
//! Data sparsity is never an error: missing word counts, sections or
//! keywords simply contribute nothing, and an empty corpus produces an
//! empty graph. Errors are reserved for input that cannot be read.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub use crate::archive::ArchiveError;

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Source data that could not be parsed
    Input,
    /// Reading or writing local files
    Storage,
    /// Talking to the remote archive
    Network,
    /// Configuration and validation errors
    Config,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Storage => "storage",
            Self::Network => "network",
            Self::Config => "config",
            Self::Other => "other",
        }
    }
}

/// Unified error type for the newsgraph crate
#[derive(Error, Debug)]
pub enum Error {
    /// A source file exists but its contents cannot be parsed
    #[error("Malformed input {path}: {reason}")]
    MalformedInput { path: PathBuf, reason: String },

    /// A persisted graph exists but cannot be used as the keyword allow-list
    #[error("Unusable graph {path}: {reason}")]
    AllowList { path: PathBuf, reason: String },

    /// I/O errors
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Archive download errors
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an I/O error bound to a path
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a malformed-input error bound to a path
    pub fn malformed(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::MalformedInput {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether the pipeline can skip past this error and continue
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::MalformedInput { .. } => true,
            Self::Archive(e) => e.is_recoverable(),
            Self::AllowList { .. }
            | Self::Io { .. }
            | Self::Json(_)
            | Self::Config(_)
            | Self::Other(_) => false,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MalformedInput { .. } => ErrorCategory::Input,
            Self::AllowList { .. } | Self::Io { .. } | Self::Json(_) => ErrorCategory::Storage,
            Self::Archive(_) => ErrorCategory::Network,
            Self::Config(_) => ErrorCategory::Config,
            Self::Other(_) => ErrorCategory::Other,
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
