//! Configuration for the annotation client.
//!
//! Loaded from environment variables at startup. The API key is the only
//! required value; everything else defaults to the Zhipu GLM
//! `OpenAI`-compatible endpoint the app was built against.

use std::fmt;
use std::time::Duration;

use crate::error::AnnotatorError;

/// Default base URL of the completion API.
pub const DEFAULT_API_URL: &str = "https://open.bigmodel.cn/api/paas/v4";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "glm-4-flash-250414";

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Default cap on generated tokens.
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Default request deadline in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Which wire format the completion API speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// `OpenAI`-compatible chat completions (`OpenAI`, Zhipu GLM, `DeepSeek`, Ollama).
    OpenAi,
    /// Anthropic Messages API.
    Anthropic,
}

impl BackendType {
    /// Parse a backend name as accepted in `LLM_BACKEND`.
    pub fn parse(name: &str) -> Result<Self, AnnotatorError> {
        match name.to_lowercase().as_str() {
            "openai" | "glm" | "zhipu" | "deepseek" | "ollama" => Ok(Self::OpenAi),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            other => Err(AnnotatorError::Config(format!(
                "unknown backend type: {other}"
            ))),
        }
    }
}

/// Complete annotation client configuration.
#[derive(Clone)]
pub struct AnnotatorConfig {
    /// Wire format of the API.
    pub backend_type: BackendType,
    /// Base API URL without a trailing slash (e.g. `https://api.openai.com/v1`).
    pub api_url: String,
    /// Bearer credential. Never logged.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Maximum tokens the model may generate.
    pub max_tokens: u32,
    /// Deadline for a single annotation call.
    pub timeout: Duration,
}

impl AnnotatorConfig {
    /// Build a config with default model parameters.
    pub fn new(backend_type: BackendType, api_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            backend_type,
            api_url: api_url.trim_end_matches('/').to_owned(),
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Required variables:
    /// - `LLM_API_KEY` -- API key (falls back to `API_KEY`)
    ///
    /// Optional variables:
    /// - `LLM_BACKEND` -- `openai` (default) or `anthropic`
    /// - `LLM_API_URL` -- base API URL (default [`DEFAULT_API_URL`])
    /// - `LLM_MODEL` -- model name (default [`DEFAULT_MODEL`])
    /// - `ANNOTATION_TIMEOUT_MS` -- request deadline (default 30000)
    pub fn from_env() -> Result<Self, AnnotatorError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AnnotatorError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("LLM_API_KEY")
            .or_else(|| lookup("API_KEY"))
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                AnnotatorError::Config("missing required env var LLM_API_KEY".to_owned())
            })?;

        let backend_type = match lookup("LLM_BACKEND") {
            Some(name) => BackendType::parse(&name)?,
            None => BackendType::OpenAi,
        };

        let api_url = lookup("LLM_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_owned());
        let model = lookup("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_owned());

        let timeout_ms: u64 = lookup("ANNOTATION_TIMEOUT_MS")
            .unwrap_or_else(|| DEFAULT_TIMEOUT_MS.to_string())
            .parse()
            .map_err(|e| AnnotatorError::Config(format!("invalid ANNOTATION_TIMEOUT_MS: {e}")))?;
        if timeout_ms == 0 {
            return Err(AnnotatorError::Config(
                "ANNOTATION_TIMEOUT_MS must be at least 1".to_owned(),
            ));
        }

        let mut config = Self::new(backend_type, &api_url, &api_key, &model);
        config.timeout = Duration::from_millis(timeout_ms);
        Ok(config)
    }
}

impl fmt::Debug for AnnotatorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotatorConfig")
            .field("backend_type", &self.backend_type)
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}
