//! Structural translation over JSON values
//!
//! Strings are translated, arrays are translated in small batches with a
//! pause between batches, objects are walked field by field and every other
//! value is returned as is. Identifier fields listed in
//! [`PASSTHROUGH_KEYS`](crate::config::PASSTHROUGH_KEYS) are never touched.
//!
//! Each string goes to the first provider that supports the language pair.
//! A failed call is retried once after a fixed delay; if the retry fails too
//! the next provider is tried. When no provider succeeds the original text is
//! kept, so translation itself never fails.

use crate::config::{TranslationConfig, PASSTHROUGH_KEYS};
use crate::error::TranslateError;
use crate::language::Language;
use crate::providers::{GeneralApiProvider, OpusMtProvider, TranslationProvider};
use futures::future::{join_all, BoxFuture, FutureExt};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct TranslationPipeline {
    providers: Vec<Arc<dyn TranslationProvider>>,
    batch_size: usize,
    batch_delay: Duration,
    retry_delay: Duration,
}

impl TranslationPipeline {
    pub fn new(batch_size: usize, batch_delay: Duration, retry_delay: Duration) -> Self {
        Self {
            providers: Vec::new(),
            batch_size: batch_size.max(1),
            batch_delay,
            retry_delay,
        }
    }

    /// Append a provider; providers are tried in insertion order
    pub fn with_provider(mut self, provider: Arc<dyn TranslationProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn from_config(config: &TranslationConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let mut pipeline = Self::new(config.batch_size, config.batch_delay, config.retry_delay);

        if let Some(url) = &config.primary_url {
            pipeline = pipeline.with_provider(Arc::new(OpusMtProvider::new(
                client.clone(),
                url.clone(),
                config.primary_token.clone(),
            )));
        }
        if let Some(url) = &config.secondary_url {
            pipeline = pipeline.with_provider(Arc::new(GeneralApiProvider::new(client, url.clone())));
        }

        info!(providers = ?pipeline.provider_names(), "Translation pipeline configured");
        pipeline
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Translate every string inside `input` from `source` to `target`
    pub async fn translate(&self, input: &Value, target: Language, source: Language) -> Value {
        if target == source {
            return input.clone();
        }
        self.translate_value(input, source, target).await
    }

    pub async fn translate_text(&self, text: &str, target: Language, source: Language) -> String {
        if target == source {
            return text.to_string();
        }
        self.translate_string(text, source, target).await
    }

    fn translate_value<'a>(
        &'a self,
        value: &'a Value,
        from: Language,
        to: Language,
    ) -> BoxFuture<'a, Value> {
        async move {
            match value {
                Value::String(text) => Value::String(self.translate_string(text, from, to).await),
                Value::Array(items) => Value::Array(self.translate_array(items, from, to).await),
                Value::Object(fields) => {
                    let mut translated = Map::with_capacity(fields.len());
                    for (key, field) in fields {
                        let field = if PASSTHROUGH_KEYS.contains(&key.as_str()) {
                            field.clone()
                        } else {
                            self.translate_value(field, from, to).await
                        };
                        translated.insert(key.clone(), field);
                    }
                    Value::Object(translated)
                }
                other => other.clone(),
            }
        }
        .boxed()
    }

    async fn translate_array(&self, items: &[Value], from: Language, to: Language) -> Vec<Value> {
        let mut translated = Vec::with_capacity(items.len());

        for (index, batch) in items.chunks(self.batch_size).enumerate() {
            if index > 0 && !self.batch_delay.is_zero() {
                tokio::time::sleep(self.batch_delay).await;
            }
            let results =
                join_all(batch.iter().map(|item| self.translate_value(item, from, to))).await;
            translated.extend(results);
        }

        translated
    }

    async fn translate_string(&self, text: &str, from: Language, to: Language) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }

        for provider in &self.providers {
            if !provider.supports(from, to) {
                debug!(provider = provider.name(), %from, %to, "Language pair not supported, skipping");
                continue;
            }

            match self.call_with_retry(provider.as_ref(), text, from, to).await {
                Ok(translated) => return translated,
                Err(err) => {
                    warn!(
                        provider = provider.name(),
                        %from,
                        %to,
                        error = %err,
                        "Translation provider failed, falling over"
                    );
                }
            }
        }

        warn!(%from, %to, "No translation provider succeeded, keeping original text");
        text.to_string()
    }

    async fn call_with_retry(
        &self,
        provider: &dyn TranslationProvider,
        text: &str,
        from: Language,
        to: Language,
    ) -> Result<String, TranslateError> {
        match provider.translate(text, from, to).await {
            Ok(translated) => Ok(translated),
            Err(err) => {
                warn!(
                    provider = provider.name(),
                    error = %err,
                    "Translation failed, retrying in {:?}",
                    self.retry_delay
                );
                tokio::time::sleep(self.retry_delay).await;
                provider.translate(text, from, to).await
            }
        }
    }
}
