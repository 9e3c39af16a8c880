//! Translation pipeline configuration

use std::time::Duration;

pub const DEFAULT_PRIMARY_URL: &str = "https://api-inference.huggingface.co/models";
pub const DEFAULT_SECONDARY_URL: &str = "https://api.mymemory.translated.net";

/// Object keys whose values are identifiers or enum labels and are never translated
pub const PASSTHROUGH_KEYS: &[&str] = &[
    "clauseId",
    "id",
    "riskLevel",
    "sessionId",
    "contractId",
    "severity",
    "overallSeverity",
    "contractType",
];

#[derive(Debug, Clone)]
pub struct TranslationConfig {
    /// Base URL of the model inference API hosting opus-mt models
    pub primary_url: Option<String>,
    pub primary_token: Option<String>,
    /// Base URL of the general-purpose translation API
    pub secondary_url: Option<String>,
    /// Array elements translated concurrently
    pub batch_size: usize,
    /// Pause between array batches
    pub batch_delay: Duration,
    /// Pause before the single retry of a failed provider call
    pub retry_delay: Duration,
    pub request_timeout: Duration,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            primary_url: Some(DEFAULT_PRIMARY_URL.to_string()),
            primary_token: None,
            secondary_url: Some(DEFAULT_SECONDARY_URL.to_string()),
            batch_size: 2,
            batch_delay: Duration::from_millis(500),
            retry_delay: Duration::from_secs(1),
            request_timeout: Duration::from_secs(15),
        }
    }
}

impl TranslationConfig {
    /// No outbound providers; every translation returns its input
    pub fn disabled() -> Self {
        Self {
            primary_url: None,
            secondary_url: None,
            ..Self::default()
        }
    }

    pub fn with_primary(mut self, url: impl Into<String>, token: Option<String>) -> Self {
        self.primary_url = Some(url.into());
        self.primary_token = token;
        self
    }

    pub fn with_secondary(mut self, url: impl Into<String>) -> Self {
        self.secondary_url = Some(url.into());
        self
    }

    pub fn with_batch(mut self, batch_size: usize, batch_delay: Duration) -> Self {
        self.batch_size = batch_size.max(1);
        self.batch_delay = batch_delay;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }
}
