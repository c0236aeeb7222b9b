//! Query embedding.
//!
//! [`minilm`] wraps the sentence encoder that produced the review corpus
//! embeddings; queries must go through the same model version.

/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
/// MiniLM sentence embedder.
pub mod minilm;

pub use error::EmbeddingError;
pub use minilm::{MINILM_EMBEDDING_DIM, MINILM_MAX_SEQ_LEN, MiniLmConfig, MiniLmEmbedder};
