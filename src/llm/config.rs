use std::time::Duration;

/// Default chat-completions endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.mistral.ai/v1/chat/completions";

/// Default model used for re-ranking.
pub const DEFAULT_MODEL: &str = "mistral-large-latest";

/// Configuration for [`MistralReranker`](super::MistralReranker).
#[derive(Debug, Clone)]
pub struct MistralConfig {
    /// API credential. `None` disables re-ranking entirely.
    pub api_key: Option<String>,
    /// Model name sent with each request.
    pub model: String,
    /// Chat-completions endpoint URL.
    pub endpoint: String,
    /// Client-side request timeout; a slow provider must not stall a search
    /// indefinitely.
    pub timeout: Duration,
    /// Sampling temperature.
    pub temperature: f32,
    /// Completion token budget.
    pub max_tokens: u32,
}

impl Default for MistralConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(30),
            temperature: 0.7,
            max_tokens: 1000,
        }
    }
}

impl MistralConfig {
    /// Env var holding the API credential.
    pub const ENV_API_KEY: &'static str = "MISTRAL_API_KEY";
    /// Env var overriding the model name.
    pub const ENV_MODEL: &'static str = "FOODIE_LLM_MODEL";
    /// Env var overriding the endpoint URL.
    pub const ENV_ENDPOINT: &'static str = "FOODIE_LLM_ENDPOINT";

    /// Loads config from environment variables. A missing credential is not
    /// an error; it just disables re-ranking.
    pub fn from_env() -> Self {
        let get = |name: &str| {
            std::env::var(name)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let defaults = Self::default();
        Self {
            api_key: get(Self::ENV_API_KEY),
            model: get(Self::ENV_MODEL).unwrap_or(defaults.model),
            endpoint: get(Self::ENV_ENDPOINT).unwrap_or(defaults.endpoint),
            ..defaults
        }
    }

    /// Config with no credential; every rerank call takes the fallback path.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Returns `true` if a credential is configured.
    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}
