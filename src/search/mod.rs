//! Retrieval and ranking pipeline.
//!
//! Orchestrates one search request: neighborhood filter resolution, query
//! embedding, vector search with oversampling, dedup and bounds checks,
//! score rescaling, and the LLM re-ranking pass. Every internal failure is
//! caught and logged; callers always get a list, possibly empty.

mod error;
mod types;


pub use error::SearchError;
pub use types::Recommendation;

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::dataset::Restaurant;
use crate::embedding::MiniLmEmbedder;
use crate::geo;
use crate::index::VectorIndex;
use crate::llm::{LlmCandidate, MistralReranker};

/// Default number of results per request.
pub const DEFAULT_TOP_K: usize = 20;

/// Oversampling multiplier applied when a neighborhood filter is active, so
/// post-filtering still yields enough candidates.
pub const OVERSAMPLE_FACTOR: usize = 5;

/// Owns the read-only collaborators of the search path.
///
/// Constructed once at startup and shared across requests; nothing here is
/// mutated after construction, so the hot path takes no locks.
pub struct RankingPipeline {
    restaurants: Arc<Vec<Restaurant>>,
    index: Arc<VectorIndex>,
    embedder: Arc<MiniLmEmbedder>,
    reranker: Arc<MistralReranker>,
}

impl std::fmt::Debug for RankingPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RankingPipeline")
            .field("restaurants", &self.restaurants.len())
            .field("index", &self.index)
            .field("embedder", &self.embedder)
            .field("reranker_enabled", &self.reranker.is_enabled())
            .finish()
    }
}

impl RankingPipeline {
    pub fn new(
        restaurants: Arc<Vec<Restaurant>>,
        index: Arc<VectorIndex>,
        embedder: Arc<MiniLmEmbedder>,
        reranker: Arc<MistralReranker>,
    ) -> Self {
        if index.is_available() && restaurants.len() != index.len() {
            // Row alignment between dataset and index is load-bearing.
            error!(
                restaurants = restaurants.len(),
                index_rows = index.len(),
                "Dataset and vector index row counts differ; results will be unreliable"
            );
        }
        Self {
            restaurants,
            index,
            embedder,
            reranker,
        }
    }

    pub fn restaurants(&self) -> &[Restaurant] {
        &self.restaurants
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    pub fn embedder(&self) -> &MiniLmEmbedder {
        &self.embedder
    }

    pub fn reranker(&self) -> &MistralReranker {
        &self.reranker
    }

    /// Ranks restaurants for `query`, optionally filtered to `neighborhood`.
    ///
    /// An empty result means "no matches or internal failure"; the failure
    /// is logged here, never propagated.
    pub async fn rank(
        &self,
        query: &str,
        neighborhood: Option<&str>,
        top_k: usize,
    ) -> Vec<Recommendation> {
        match self.rank_inner(query, neighborhood, top_k).await {
            Ok(recommendations) => recommendations,
            Err(e) => {
                error!(query, error = %e, "Search pipeline failed, returning no results");
                Vec::new()
            }
        }
    }

    async fn rank_inner(
        &self,
        query: &str,
        neighborhood: Option<&str>,
        top_k: usize,
    ) -> Result<Vec<Recommendation>, SearchError> {
        if top_k == 0 {
            return Ok(Vec::new());
        }

        let filter = self.resolve_filter(neighborhood);
        if let Some(allowed) = &filter {
            if allowed.is_empty() {
                info!(?neighborhood, "No restaurants in neighborhood filter");
                return Ok(Vec::new());
            }
        }

        let query_vector = self.embedder.embed(query)?;

        // Oversample when filtering so post-hoc discards still leave enough
        // candidates; bounded by the index row count. Saturating: `top_k`
        // comes straight from the request and can be arbitrarily large.
        let search_k = if filter.is_some() {
            top_k.saturating_mul(OVERSAMPLE_FACTOR).min(self.index.len())
        } else {
            top_k
        };

        let hits = self.index.search(&query_vector, search_k);
        debug!(query, hits = hits.len(), search_k, "Vector search complete");

        let mut seen = HashSet::new();
        let mut recommendations = Vec::new();
        for (similarity, row) in hits {
            if row >= self.restaurants.len() {
                continue;
            }
            if let Some(allowed) = &filter {
                if !allowed.contains(&row) {
                    continue;
                }
            }
            // The index can return the same row twice for degenerate
            // duplicate documents.
            if !seen.insert(row) {
                continue;
            }

            recommendations.push(Recommendation::from_restaurant(
                &self.restaurants[row],
                rescale_similarity(similarity),
            ));

            if recommendations.len() >= top_k {
                break;
            }
        }

        // Stable sort keeps index-search order among equal scores.
        recommendations.sort_by(|a, b| {
            b.match_score
                .partial_cmp(&a.match_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(self.apply_reranking(query, recommendations, top_k).await)
    }

    /// Resolves a neighborhood name to the set of matching restaurant rows.
    ///
    /// `None` means unrestricted. An unknown neighborhood yields an empty
    /// set, which the caller short-circuits to an empty result.
    fn resolve_filter(&self, neighborhood: Option<&str>) -> Option<HashSet<usize>> {
        let zipcodes = geo::zipcodes_for(neighborhood)?;
        let numeric: HashSet<u32> = zipcodes.iter().filter_map(|z| geo::parse_zipcode(z)).collect();

        Some(
            self.restaurants
                .iter()
                .filter(|r| r.zipcode.is_some_and(|z| numeric.contains(&z)))
                .map(|r| r.row)
                .collect(),
        )
    }

    /// Hands the candidate set to the re-ranker and merges its ordering back
    /// onto the full records, joined by candidate position.
    async fn apply_reranking(
        &self,
        query: &str,
        recommendations: Vec<Recommendation>,
        top_k: usize,
    ) -> Vec<Recommendation> {
        if recommendations.is_empty() {
            return recommendations;
        }

        let candidates: Vec<LlmCandidate> = recommendations
            .iter()
            .map(|r| LlmCandidate {
                name: r.name.clone(),
                address: r.address.clone(),
                cuisine_type: r.cuisine_type.clone(),
                rating: r.rating,
                review_clean: r.review_clean.clone(),
            })
            .collect();

        let order = self.reranker.rerank(query, &candidates, top_k).await;

        let mut slots: Vec<Option<Recommendation>> =
            recommendations.into_iter().map(Some).collect();

        order
            .into_iter()
            .filter_map(|assignment| {
                let mut recommendation = slots.get_mut(assignment.candidate)?.take()?;
                recommendation.llm_rank = Some(assignment.rank);
                recommendation.llm_comment = Some(assignment.comment);
                Some(recommendation)
            })
            .collect()
    }
}

/// Rescales a raw inner-product similarity from [-1, 1] to [0, 1], clamped.
pub fn rescale_similarity(similarity: f32) -> f32 {
    ((similarity + 1.0) / 2.0).clamp(0.0, 1.0)
}
