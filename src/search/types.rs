use serde::Serialize;

use crate::dataset::Restaurant;

/// One ranked search result, created fresh per request.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    pub name: String,
    pub address: String,
    pub cuisine_type: String,
    pub rating: Option<f32>,
    /// Similarity rescaled to [0, 1].
    pub match_score: f32,
    pub zipcode: Option<u32>,
    pub review_clean: Option<String>,
    pub link: Option<String>,
    /// Neighborhood derived from the restaurant's own zipcode, independent
    /// of any request filter.
    pub neighborhood: Option<&'static str>,
    /// 1-based rank assigned by the re-ranker (or its fallback).
    pub llm_rank: Option<u32>,
    /// Re-ranker justification; empty string on the fallback path.
    pub llm_comment: Option<String>,
}

impl Recommendation {
    pub(crate) fn from_restaurant(restaurant: &Restaurant, match_score: f32) -> Self {
        Self {
            name: restaurant.name.clone(),
            address: restaurant.address.clone(),
            cuisine_type: restaurant.cuisine_type.clone(),
            rating: restaurant.rating,
            match_score,
            zipcode: restaurant.zipcode,
            review_clean: restaurant.review_clean.clone(),
            link: restaurant.link.clone(),
            neighborhood: crate::geo::neighborhood_for_zipcode(restaurant.zipcode),
            llm_rank: None,
            llm_comment: None,
        }
    }
}
