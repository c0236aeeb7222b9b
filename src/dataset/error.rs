use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading the restaurant dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Dataset file is missing.
    #[error("restaurant dataset not found at path: {path}")]
    NotFound { path: PathBuf },

    /// Dataset file could not be read.
    #[error("failed to read restaurant dataset: {0}")]
    Io(#[from] std::io::Error),

    /// CSV structure could not be parsed at all.
    #[error("failed to parse restaurant dataset: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header row.
    #[error("restaurant dataset is missing column '{column}'")]
    MissingColumn { column: &'static str },
}
