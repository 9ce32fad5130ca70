//! Error types for content loading.
//!
//! [`LoaderError`] covers failures that stop a whole run: unreadable
//! configuration, a missing content directory, bad exclusion globs. Problems
//! with individual documents are not errors at this level; they are collected
//! as [`DocumentFailure`](crate::DocumentFailure)s in the load outcome.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a load.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// An exclusion glob in the configuration failed to compile.
    #[error("invalid exclude pattern: {0}")]
    GlobError(#[from] globset::Error),

    /// The built-in or registered collection set is inconsistent.
    #[error("schema error: {0}")]
    SchemaError(#[from] content_schema_core::SchemaError),

    /// The worker pool could not be started.
    #[error("thread pool error: {0}")]
    ThreadPoolError(#[from] rayon::ThreadPoolBuildError),

    /// The configured content directory does not exist.
    #[error("content directory not found: {}", .0.display())]
    MissingContentDir(PathBuf),

    /// A collection named in the configuration is not registered.
    #[error("unknown collection: {0}")]
    UnknownCollection(String),
}

/// Convenience alias for results with [`LoaderError`].
pub type Result<T> = std::result::Result<T, LoaderError>;
