use thiserror::Error;

use crate::embedding::EmbeddingError;

/// Internal pipeline errors.
///
/// Callers of [`RankingPipeline::rank`](super::RankingPipeline::rank) never
/// see these; the pipeline catches them and degrades to an empty result.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),
}
