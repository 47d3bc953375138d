use std::path::PathBuf;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;
use thiserror::Error;

/// Why a dataset could not be loaded.
///
/// Every variant names the dataset and keeps the underlying error as its
/// source; nothing is retried or recovered.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("dataset '{name}' not found at {location}")]
    NotFound { name: String, location: String },

    #[error("reading dataset '{name}' from {path}")]
    Io {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("dataset '{name}' is not valid parquet")]
    Parse {
        name: String,
        #[source]
        source: ParquetError,
    },

    #[error("dataset '{name}' could not be decoded into a table")]
    Arrow {
        name: String,
        #[source]
        source: ArrowError,
    },
}

impl LoadError {
    /// The dataset the failure belongs to.
    pub fn dataset(&self) -> &str {
        match self {
            LoadError::NotFound { name, .. }
            | LoadError::Io { name, .. }
            | LoadError::Parse { name, .. }
            | LoadError::Arrow { name, .. } => name,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadError::NotFound { .. })
    }
}
