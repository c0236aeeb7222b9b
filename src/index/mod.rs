//! Flat inner-product vector index.
//!
//! The index file is built offline, next to the restaurant CSV, with one
//! L2-normalized embedding row per restaurant in dataset row order. Inner
//! product over normalized vectors is cosine similarity, so an exact flat
//! scan reproduces what the original approximate index returned for a corpus
//! of a few thousand rows.
//!
//! File layout (little-endian): 8-byte magic `FOODIDX1`, `u32` dimension,
//! `u32` row count, then `rows * dim` f32 values.
//!
//! A missing or corrupt file does not take the service down: the index opens
//! in an unavailable mode whose searches return nothing.

mod error;

#[cfg(test)]
mod tests;

pub use error::IndexError;

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use memmap2::Mmap;
use tracing::{error, info, warn};

/// Magic bytes at the start of every index file.
pub const INDEX_MAGIC: &[u8; 8] = b"FOODIDX1";

/// Header size in bytes: magic + dim + rows.
const HEADER_LEN: usize = 16;

enum IndexBackend {
    Flat { mmap: Mmap, dim: usize, rows: usize },
    Unavailable,
}

/// Read-only vector index over the restaurant embedding matrix.
pub struct VectorIndex {
    backend: IndexBackend,
}

impl std::fmt::Debug for VectorIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.backend {
            IndexBackend::Flat { dim, rows, .. } => f
                .debug_struct("VectorIndex")
                .field("dim", dim)
                .field("rows", rows)
                .finish(),
            IndexBackend::Unavailable => f
                .debug_struct("VectorIndex")
                .field("backend", &"Unavailable")
                .finish(),
        }
    }
}

impl VectorIndex {
    /// Opens an index file, validating the header against the body length.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, IndexError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(IndexError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let file = File::open(path)?;
        // SAFETY: the mapping is read-only and the file is treated as
        // immutable for process lifetime.
        let mmap = unsafe { Mmap::map(&file)? };

        if mmap.len() < HEADER_LEN || &mmap[..8] != INDEX_MAGIC {
            return Err(IndexError::InvalidMagic);
        }

        let dim = u32::from_le_bytes(mmap[8..12].try_into().expect("4 bytes")) as usize;
        let rows = u32::from_le_bytes(mmap[12..16].try_into().expect("4 bytes")) as usize;

        if dim == 0 {
            return Err(IndexError::InvalidHeader {
                reason: "dimension is zero".to_string(),
            });
        }

        let expected = rows
            .checked_mul(dim)
            .and_then(|n| n.checked_mul(std::mem::size_of::<f32>()))
            .ok_or_else(|| IndexError::InvalidHeader {
                reason: format!("rows * dim overflows ({rows} x {dim})"),
            })?;
        let actual = mmap.len() - HEADER_LEN;
        if actual < expected {
            return Err(IndexError::Truncated { expected, actual });
        }

        info!(path = %path.display(), rows, dim, "Vector index loaded");

        Ok(Self {
            backend: IndexBackend::Flat { mmap, dim, rows },
        })
    }

    /// Opens an index, degrading to an unavailable backend on any failure.
    ///
    /// Search on an unavailable index returns an empty result set.
    pub fn open_or_unavailable<P: AsRef<Path>>(path: P) -> Self {
        match Self::open(path.as_ref()) {
            Ok(index) => index,
            Err(e) => {
                error!(
                    path = %path.as_ref().display(),
                    error = %e,
                    "Vector index unavailable; searches will return no results"
                );
                Self::unavailable()
            }
        }
    }

    /// An index with no backing data. Searches return nothing.
    pub fn unavailable() -> Self {
        Self {
            backend: IndexBackend::Unavailable,
        }
    }

    /// Searches for the `k` nearest rows by inner product.
    ///
    /// The query must be L2-normalized; similarities then lie in [-1, 1].
    /// Results are ordered by descending similarity. `k` is clamped to the
    /// row count.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<(f32, usize)> {
        let IndexBackend::Flat { mmap, dim, rows } = &self.backend else {
            return Vec::new();
        };
        let (dim, rows) = (*dim, *rows);

        if query.len() != dim {
            warn!(
                expected = dim,
                actual = query.len(),
                "Query vector dimension mismatch; returning no results"
            );
            return Vec::new();
        }
        if k == 0 || rows == 0 {
            return Vec::new();
        }

        let vectors: &[f32] = bytemuck::cast_slice(&mmap[HEADER_LEN..HEADER_LEN + rows * dim * 4]);

        let mut scored: Vec<(f32, usize)> = vectors
            .chunks_exact(dim)
            .enumerate()
            .map(|(row, vector)| (dot(query, vector), row))
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k.min(rows));
        scored
    }

    /// Number of vectors in the index (0 when unavailable).
    pub fn len(&self) -> usize {
        match &self.backend {
            IndexBackend::Flat { rows, .. } => *rows,
            IndexBackend::Unavailable => 0,
        }
    }

    /// Returns `true` if the index holds no vectors.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Vector dimension (`None` when unavailable).
    pub fn dim(&self) -> Option<usize> {
        match &self.backend {
            IndexBackend::Flat { dim, .. } => Some(*dim),
            IndexBackend::Unavailable => None,
        }
    }

    /// Returns `true` if the index file loaded successfully.
    pub fn is_available(&self) -> bool {
        matches!(self.backend, IndexBackend::Flat { .. })
    }

    /// Writes an index file. Used by the offline build and by tests.
    pub fn write<P: AsRef<Path>>(
        path: P,
        dim: usize,
        vectors: &[Vec<f32>],
    ) -> Result<(), IndexError> {
        if dim == 0 {
            return Err(IndexError::InvalidHeader {
                reason: "dimension is zero".to_string(),
            });
        }
        for (row, vector) in vectors.iter().enumerate() {
            if vector.len() != dim {
                return Err(IndexError::InvalidHeader {
                    reason: format!(
                        "row {row} has dimension {} (expected {dim})",
                        vector.len()
                    ),
                });
            }
        }

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;

        file.write_all(INDEX_MAGIC)?;
        file.write_all(&(dim as u32).to_le_bytes())?;
        file.write_all(&(vectors.len() as u32).to_le_bytes())?;
        for vector in vectors {
            file.write_all(bytemuck::cast_slice(vector))?;
        }
        file.flush()?;
        Ok(())
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
