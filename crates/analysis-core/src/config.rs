//! Pipeline configuration

use crate::backoff::RetryPolicy;
use std::time::Duration;

pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_BATCH_SIZE: usize = 3;
pub const DEFAULT_REMOTE_API_NAME: &str = "analyze_legal_clause";

/// Two-phase call/poll model service
#[derive(Debug, Clone)]
pub struct RemoteModelConfig {
    /// Base URL of the hosted app, e.g. `https://user-space.hf.space`
    pub base_url: String,
    /// Endpoint name under `/gradio_api/call/`
    pub api_name: String,
    pub token: Option<String>,
    pub retry: RetryPolicy,
}

impl RemoteModelConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_name: DEFAULT_REMOTE_API_NAME.to_string(),
            token: None,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_api_name(mut self, api_name: impl Into<String>) -> Self {
        self.api_name = api_name.into();
        self
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn call_url(&self) -> String {
        format!("{}/gradio_api/call/{}", self.base_url, self.api_name)
    }

    pub fn result_url(&self, event_id: &str) -> String {
        format!("{}/{}", self.call_url(), event_id)
    }
}

/// Single-shot text generation endpoint
#[derive(Debug, Clone)]
pub struct InferenceApiConfig {
    pub url: String,
    pub token: Option<String>,
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub retry: RetryPolicy,
}

impl InferenceApiConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: None,
            max_new_tokens: 512,
            temperature: 0.3,
            // Auth failures here are not worth retrying
            retry: RetryPolicy::default().with_auth_retries(0, Duration::ZERO),
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// Everything needed to build an orchestrator and dispatcher
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Bound on every outbound provider call, independent of backoff
    pub provider_timeout: Duration,
    /// Clauses analyzed concurrently per batch
    pub batch_size: usize,
    pub remote_model: Option<RemoteModelConfig>,
    pub inference_api: Option<InferenceApiConfig>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
            batch_size: DEFAULT_BATCH_SIZE,
            remote_model: None,
            inference_api: None,
        }
    }
}

impl PipelineConfig {
    /// Local analysis only, no outbound calls
    pub fn offline() -> Self {
        Self::default()
    }

    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_remote_model(mut self, config: RemoteModelConfig) -> Self {
        self.remote_model = Some(config);
        self
    }

    pub fn with_inference_api(mut self, config: InferenceApiConfig) -> Self {
        self.inference_api = Some(config);
        self
    }
}
