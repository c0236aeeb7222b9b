use std::sync::Arc;

use crate::search::RankingPipeline;

/// Shared handler state: the pipeline and its read-only collaborators.
#[derive(Clone, Debug)]
pub struct AppState {
    pub pipeline: Arc<RankingPipeline>,
}

impl AppState {
    pub fn new(pipeline: Arc<RankingPipeline>) -> Self {
        Self { pipeline }
    }
}
