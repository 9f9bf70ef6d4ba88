//! Shared error types for the lint pass

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for modlint operations
#[derive(Debug, Error)]
pub enum Error {
    /// Manifest file is absent or not a well-formed top-level mapping
    /// literal. Fatal for the whole check pass on that module.
    #[error("failed to load manifest {path}: {message}")]
    ManifestParse { path: PathBuf, message: String },

    /// A single structured-data file failed to parse. Non-fatal: the file
    /// degrades to an empty record set.
    #[error("malformed document {path}: {message}")]
    MalformedDocument { path: PathBuf, message: String },

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Pattern errors
    #[error(transparent)]
    Pattern(#[from] glob::PatternError),
}

impl Error {
    /// Create a manifest load error with path context
    pub fn manifest_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ManifestParse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a malformed-document error with path context
    pub fn malformed_document(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::MalformedDocument {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether the error aborts the whole pass for the current module
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ManifestParse { .. } | Self::Config(_))
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;
