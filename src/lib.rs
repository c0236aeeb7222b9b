//! Foodie library crate (used by the server binary and integration tests).
//!
//! Semantic restaurant search: a free-text craving plus an optional
//! neighborhood filter goes through query embedding, vector retrieval over a
//! prebuilt review-embedding index, zipcode filtering, and an LLM re-ranking
//! pass that degrades gracefully when the model is unavailable.
//!
//! # Public API Surface
//!
//! ## Core Types
//! - [`Config`], [`ConfigError`] - Server configuration
//! - [`Restaurant`] - Immutable dataset record, row-aligned with the index
//! - [`Recommendation`] - Per-request ranked result
//! - [`RankingPipeline`] - Retrieval and ranking orchestration
//!
//! ## Retrieval
//! - [`MiniLmEmbedder`], [`MiniLmConfig`] - Query embedding (stub mode for
//!   tests)
//! - [`VectorIndex`] - Flat inner-product index over the review embeddings
//! - [`geo`] - Neighborhood ↔ zipcode reference data
//!
//! ## Re-ranking
//! - [`MistralReranker`], [`MistralConfig`] - Best-effort LLM re-ranking
//!   with deterministic fallback
//!
//! ## HTTP
//! - [`gateway::create_router`], [`AppState`] - Axum router and handler
//!   state

pub mod config;
pub mod dataset;
pub mod embedding;
pub mod gateway;
pub mod geo;
pub mod index;
pub mod llm;
pub mod search;

pub use config::{Config, ConfigError};
pub use dataset::{DatasetError, Restaurant, load_restaurants};
pub use embedding::{
    EmbeddingError, MINILM_EMBEDDING_DIM, MINILM_MAX_SEQ_LEN, MiniLmConfig, MiniLmEmbedder,
};
pub use gateway::{AppState, GatewayError, create_router};
pub use index::{INDEX_MAGIC, IndexError, VectorIndex};
pub use llm::{
    LlmCandidate, MistralConfig, MistralReranker, RankAssignment, RerankError,
    extract_json_object,
};
pub use search::{
    DEFAULT_TOP_K, OVERSAMPLE_FACTOR, RankingPipeline, Recommendation, SearchError,
    rescale_similarity,
};
