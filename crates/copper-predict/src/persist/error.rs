//! Persistence errors.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::ModelStructureError;

/// Failure reading a native model resource.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed model JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported schema version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
    #[error("unknown model type {0:?}")]
    UnknownModelType(String),
    #[error("invalid model: {0}")]
    Structure(#[from] ModelStructureError),
}

/// Failure writing a native model resource.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize model: {0}")]
    Json(#[from] serde_json::Error),
}
