use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while opening or writing the vector index file.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Index file is missing.
    #[error("vector index not found at path: {path}")]
    NotFound { path: PathBuf },

    /// Index file could not be read or mapped.
    #[error("failed to read vector index: {0}")]
    Io(#[from] std::io::Error),

    /// The file does not start with the expected magic bytes.
    #[error("vector index has invalid magic bytes (not a FOODIDX1 file)")]
    InvalidMagic,

    /// Header declares zero dimension or an impossible layout.
    #[error("vector index header is invalid: {reason}")]
    InvalidHeader { reason: String },

    /// File body is shorter than the header promises.
    #[error("vector index is truncated: expected {expected} bytes of vectors, found {actual}")]
    Truncated { expected: usize, actual: usize },
}
