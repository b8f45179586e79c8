//! OpenAI embedding provider for Policy Navigator

#![warn(missing_docs)]
#![warn(clippy::all)]

use async_openai::{
    config::OpenAIConfig, error::OpenAIError, types::CreateEmbeddingRequestArgs, Client,
};
use async_trait::async_trait;
use navigator_core::config::{get_env_parsed, get_env_or, get_required_env};
use navigator_core::{EmbeddingProvider, NavigatorError, Result};
use std::time::Duration;

/// Provider name reported in errors and logs
pub const PROVIDER_NAME: &str = "openai";

/// Embedding model used when none is configured
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-large";

/// Explicit settings for [`OpenAIEmbeddingProvider`]
#[derive(Clone)]
pub struct OpenAIEmbeddingConfig {
    /// API key sent as bearer token
    pub api_key: String,
    /// Embedding model identifier
    pub model: String,
    /// Override for the API base URL (proxies, Azure-compatible gateways)
    pub api_base: Option<String>,
    /// HTTP request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for OpenAIEmbeddingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIEmbeddingConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl OpenAIEmbeddingConfig {
    /// Config with the default model and a 30 second timeout
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            api_base: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Use a different embedding model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Send requests to a different base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    /// Set the HTTP request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read `OPENAI_API_KEY` (required), `NAVIGATOR_EMBEDDING_MODEL`,
    /// `OPENAI_API_BASE` and `NAVIGATOR_REQUEST_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self> {
        let mut config = Self::new(get_required_env("OPENAI_API_KEY")?)
            .with_model(get_env_or("NAVIGATOR_EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL))
            .with_timeout(Duration::from_secs(get_env_parsed(
                "NAVIGATOR_REQUEST_TIMEOUT_SECS",
                30u64,
            )));
        if let Ok(base) = std::env::var("OPENAI_API_BASE") {
            config = config.with_api_base(base);
        }
        Ok(config)
    }

    /// Check the settings before any request is made
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(NavigatorError::config("OpenAI API key cannot be empty"));
        }
        validate_model_name(&self.model)?;
        if let Some(base) = &self.api_base {
            if !base.starts_with("http://") && !base.starts_with("https://") {
                return Err(NavigatorError::config(format!(
                    "Invalid API base '{}'. Must start with http:// or https://",
                    base
                )));
            }
        }
        if self.timeout.is_zero() {
            return Err(NavigatorError::config("HTTP timeout must be non-zero"));
        }
        Ok(())
    }
}

/// Validate model name (basic sanitization)
pub fn validate_model_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(NavigatorError::config("Model name cannot be empty"));
    }

    if name.len() > 256 {
        return Err(NavigatorError::config(
            "Model name is too long (max 256 characters)",
        ));
    }

    if name.chars().any(char::is_control) {
        return Err(NavigatorError::config("Model name contains invalid characters"));
    }

    Ok(())
}

/// Embeds query text with the OpenAI embeddings endpoint
pub struct OpenAIEmbeddingProvider {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAIEmbeddingProvider {
    /// Create a provider from explicit settings
    pub fn new(config: OpenAIEmbeddingConfig) -> Result<Self> {
        config.validate()?;

        let mut openai_config = OpenAIConfig::new().with_api_key(config.api_key.clone());
        if let Some(base) = &config.api_base {
            openai_config = openai_config.with_api_base(base.clone());
        }

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| NavigatorError::config(format!("Failed to create HTTP client: {}", e)))?;

        tracing::debug!("Initializing OpenAI embedding client for {}", config.model);

        Ok(Self {
            client: Client::with_config(openai_config).with_http_client(http_client),
            model: config.model,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAIEmbeddingProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn embed(&self, text: &str) -> Result<Vec<f64>> {
        let start_time = std::time::Instant::now();

        let request = CreateEmbeddingRequestArgs::default()
            .model(self.model.clone())
            .input(vec![text.to_string()])
            .build()
            .map_err(map_openai_error)?;

        let response = self
            .client
            .embeddings()
            .create(request)
            .await
            .map_err(map_openai_error)?;

        let embedding = response
            .data
            .into_iter()
            .next()
            .map(|e| e.embedding)
            .ok_or_else(|| NavigatorError::provider(PROVIDER_NAME, "No embedding returned"))?;

        tracing::debug!(
            "Embedded query with {} ({} dims) in {} ms",
            self.model,
            embedding.len(),
            start_time.elapsed().as_millis()
        );

        Ok(embedding.into_iter().map(f64::from).collect())
    }
}

/// Convert an SDK error, marking retryable failures as transient
fn map_openai_error(err: OpenAIError) -> NavigatorError {
    let transient = match &err {
        OpenAIError::Reqwest(e) => {
            e.is_timeout()
                || e.is_connect()
                || e.is_request()
                || e.status().is_some_and(|s| is_transient_status(s.as_u16()))
        }
        OpenAIError::ApiError(api) => is_transient_api_error(api.r#type.as_deref(), &api.message),
        // Gateway 5xx pages (HTML from a proxy or load balancer) surface here
        // because the SDK drops the status when the body is not an error object
        OpenAIError::JSONDeserialize(_) => true,
        _ => false,
    };

    if transient {
        tracing::warn!("Transient OpenAI error: {}", err);
        NavigatorError::provider_transient(PROVIDER_NAME, err.to_string())
    } else {
        NavigatorError::provider(PROVIDER_NAME, err.to_string())
    }
}

fn is_transient_status(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

fn is_transient_api_error(kind: Option<&str>, message: &str) -> bool {
    let kind_transient = matches!(
        kind,
        Some("rate_limit_exceeded" | "requests" | "tokens" | "server_error" | "service_unavailable")
    );
    let message = message.to_lowercase();
    kind_transient
        || message.contains("rate limit")
        || message.contains("overloaded")
        || message.contains("try again")
}
