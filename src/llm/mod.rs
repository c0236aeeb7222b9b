//! LLM re-ranking of retrieved candidates.
//!
//! Best-effort enrichment layer: the model is asked to reorder the candidate
//! set and attach a short justification per candidate. Every failure mode --
//! no credential, transport error, timeout, non-JSON output, missing keys --
//! degrades to the similarity order with sequential ranks and empty comments.
//! Nothing in this module returns an error to its caller.

pub mod config;
mod error;
mod extract;


pub use config::{DEFAULT_ENDPOINT, DEFAULT_MODEL, MistralConfig};
pub use error::RerankError;
pub use extract::extract_json_object;

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

/// Narrow projection of a candidate sent to the model.
///
/// Candidate identity is carried by position in the slice, which equals the
/// position in the pipeline's candidate list; nothing is joined back by name.
#[derive(Debug, Clone)]
pub struct LlmCandidate {
    pub name: String,
    pub address: String,
    pub cuisine_type: String,
    pub rating: Option<f32>,
    pub review_clean: Option<String>,
}

/// One slot in the final ordering produced by [`MistralReranker::rerank`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankAssignment {
    /// 0-based position into the candidate slice passed to `rerank`.
    pub candidate: usize,
    /// 1-based final rank.
    pub rank: u32,
    /// Model justification; empty on any fallback path.
    pub comment: String,
}

#[derive(Debug, Deserialize)]
struct RankingResponse {
    ranking: Vec<i64>,
    #[serde(default)]
    comments: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

/// Chat-completions backed re-ranker.
#[derive(Debug, Clone)]
pub struct MistralReranker {
    client: reqwest::Client,
    config: MistralConfig,
}

impl MistralReranker {
    pub fn new(config: MistralConfig) -> Self {
        let client = match reqwest::Client::builder().timeout(config.timeout).build() {
            Ok(client) => client,
            Err(e) => {
                warn!(error = %e, "HTTP client build failed, using default client without timeout");
                reqwest::Client::default()
            }
        };
        Self { client, config }
    }

    /// A reranker with no credential; always takes the fallback path.
    pub fn disabled() -> Self {
        Self::new(MistralConfig::disabled())
    }

    /// Returns `true` if a credential is configured.
    pub fn is_enabled(&self) -> bool {
        self.config.is_enabled()
    }

    /// Reorders `candidates` for `query`, truncated to `top_k`.
    ///
    /// Always returns a valid ordering; on any failure the result is the
    /// identity order with rank = 1-based position and an empty comment.
    pub async fn rerank(
        &self,
        query: &str,
        candidates: &[LlmCandidate],
        top_k: usize,
    ) -> Vec<RankAssignment> {
        if candidates.is_empty() {
            return Vec::new();
        }

        let Some(api_key) = self.config.api_key.clone() else {
            debug!("No LLM credential configured, skipping re-ranking");
            return fallback_order(candidates.len(), top_k);
        };

        match self.request_ranking(&api_key, query, candidates).await {
            Ok(response) => {
                debug!(
                    ranked = response.ranking.len(),
                    comments = response.comments.len(),
                    "LLM ranking received"
                );
                build_order(&response.ranking, &response.comments, candidates.len(), top_k)
            }
            Err(e) => {
                warn!(error = %e, "LLM re-ranking failed, falling back to similarity order");
                fallback_order(candidates.len(), top_k)
            }
        }
    }

    async fn request_ranking(
        &self,
        api_key: &str,
        query: &str,
        candidates: &[LlmCandidate],
    ) -> Result<RankingResponse, RerankError> {
        let prompt = build_prompt(query, candidates);

        let body = json!({
            "model": self.config.model,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
        });

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RerankError::BadStatus {
                status: status.as_u16(),
            });
        }

        let chat: ChatResponse = response.json().await?;
        let content = chat
            .choices
            .first()
            .map(|c| c.message.content.trim())
            .filter(|c| !c.is_empty())
            .ok_or(RerankError::EmptyResponse)?;

        let raw = extract_json_object(content).ok_or_else(|| RerankError::InvalidJson {
            reason: "no JSON object found in response".to_string(),
        })?;

        serde_json::from_str(raw).map_err(|e| RerankError::InvalidJson {
            reason: e.to_string(),
        })
    }
}

/// Builds the ranking prompt: a numbered candidate list plus the JSON
/// contract the model must follow.
fn build_prompt(query: &str, candidates: &[LlmCandidate]) -> String {
    let listing = candidates
        .iter()
        .enumerate()
        .map(|(i, c)| {
            format!(
                "{}. {} - {} cuisine\n   Address: {}\n   Review: {}\n   Rating: {}",
                i + 1,
                c.name,
                c.cuisine_type,
                c.address,
                c.review_clean.as_deref().unwrap_or("No review available"),
                c.rating
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| "N/A".to_string()),
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        r#"You are a New York food expert. The user is looking for: "{query}"

Here is the recommended restaurant list:

{listing}

Please rank these restaurants based on the user's needs. Consider:
1. Whether the cuisine matches the user's requirements
2. Restaurant ratings and review quality
3. Overall match quality

Please respond in JSON format with:
- ranking: List of ranked restaurant numbers (e.g.: [2, 1, 3])
- comments: Brief comments for each restaurant (explaining user preference), format as {{"restaurant_number": "comment"}}

Example:
{{
    "ranking": [2, 1, 3],
    "comments": {{
        "2": "Perfectly matches your needs, excellent ratings",
        "1": "Great alternative choice",
        "3": "Good but slightly lower ranking"
    }}
}}

Respond ONLY with JSON, no other text."#
    )
}

/// Builds the final ordering from a validated model response.
///
/// Walks the model's 1-based `ranking` first, skipping out-of-range and
/// duplicate numbers, then appends any candidates the model omitted in their
/// original order with empty comments. Truncated to `top_k`.
fn build_order(
    ranking: &[i64],
    comments: &HashMap<String, String>,
    candidates: usize,
    top_k: usize,
) -> Vec<RankAssignment> {
    let mut order = Vec::with_capacity(candidates);
    let mut assigned = vec![false; candidates];

    for &number in ranking {
        if number < 1 || number as usize > candidates {
            continue;
        }
        let idx = (number - 1) as usize;
        if assigned[idx] {
            continue;
        }
        assigned[idx] = true;
        order.push(RankAssignment {
            candidate: idx,
            rank: order.len() as u32 + 1,
            comment: comments.get(&number.to_string()).cloned().unwrap_or_default(),
        });
    }

    for (idx, done) in assigned.iter().enumerate() {
        if !done {
            order.push(RankAssignment {
                candidate: idx,
                rank: order.len() as u32 + 1,
                comment: String::new(),
            });
        }
    }

    order.truncate(top_k);
    order
}

/// Identity ordering used by every fallback path.
fn fallback_order(candidates: usize, top_k: usize) -> Vec<RankAssignment> {
    (0..candidates.min(top_k))
        .map(|idx| RankAssignment {
            candidate: idx,
            rank: idx as u32 + 1,
            comment: String::new(),
        })
        .collect()
}
