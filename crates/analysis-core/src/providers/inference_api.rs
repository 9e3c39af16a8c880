//! Text-generation inference endpoint
//!
//! A single POST with a prompt; the response is `[{"generated_text": ...}]`.
//! The analysis is the first `{...}` span of the generated text. A span that
//! parses as JSON in an unknown shape is malformed; text with no JSON span is
//! treated as prose.

use super::{truncate, AnalysisProvider, ProviderResult};
use crate::config::InferenceApiConfig;
use crate::error::ProviderError;
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use risk_engine::analysis_from_json;
use serde::Deserialize;
use serde_json::{json, Value};

lazy_static! {
    /// Outermost brace-delimited span, across lines
    static ref JSON_OBJECT: Regex = Regex::new(r"\{[\s\S]*\}").unwrap();
}

/// Marker after which the model writes its answer
const ANSWER_MARKER: &str = "ANALYSIS:";

#[derive(Debug, Deserialize)]
struct Generation {
    generated_text: String,
}

pub struct InferenceApi {
    client: Client,
    config: InferenceApiConfig,
}

impl InferenceApi {
    pub fn new(client: Client, config: InferenceApiConfig) -> Self {
        Self { client, config }
    }
}

/// Prompt asking for the five base fields as JSON
pub fn build_prompt(clause_text: &str) -> String {
    format!(
        "You are an expert legal analyst. Analyze the following contract clause and \
         identify potential issues.\n\n\
         CLAUSE TO ANALYZE:\n{clause_text}\n\n\
         Respond with a JSON object in exactly this format:\n\
         {{\n  \"ambiguities\": [\"List specific ambiguous terms or phrases\"],\n  \
         \"risks\": [\"List potential legal risks or unfavorable terms\"],\n  \
         \"recommendations\": [\"List specific actionable recommendations\"],\n  \
         \"missingElements\": [\"List any missing standard legal protections\"],\n  \
         \"references\": [\"List relevant legal standards or precedents\"]\n}}\n\n\
         {ANSWER_MARKER}"
    )
}

/// Interpret generated text
pub fn interpret_generation(generated: &str) -> ProviderResult {
    let answer = match generated.rfind(ANSWER_MARKER) {
        Some(pos) => &generated[pos + ANSWER_MARKER.len()..],
        None => generated,
    }
    .trim();

    if let Some(found) = JSON_OBJECT.find(answer) {
        if let Ok(value) = serde_json::from_str::<Value>(found.as_str()) {
            return match analysis_from_json(&value) {
                Some(analysis) => ProviderResult::Structured(analysis),
                None => ProviderError::Malformed(format!(
                    "unrecognized JSON shape: {}",
                    truncate(found.as_str(), 200)
                ))
                .into(),
            };
        }
    }

    if answer.is_empty() {
        return ProviderError::Malformed("empty generation".to_string()).into();
    }

    ProviderResult::FreeText(answer.to_string())
}

#[async_trait]
impl AnalysisProvider for InferenceApi {
    fn name(&self) -> &'static str {
        "inference_api"
    }

    async fn analyze(&self, clause_text: &str) -> ProviderResult {
        let Some(token) = &self.config.token else {
            return ProviderError::NotConfigured("inference API token").into();
        };

        let body = json!({
            "inputs": build_prompt(clause_text),
            "parameters": {
                "max_new_tokens": self.config.max_new_tokens,
                "temperature": self.config.temperature,
                "return_full_text": false,
            }
        });

        let response = match self
            .client
            .post(&self.config.url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => return ProviderError::from(err).into(),
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return ProviderError::from_status(status.as_u16(), truncate(&body, 500)).into();
        }

        let generations: Vec<Generation> = match response.json().await {
            Ok(generations) => generations,
            Err(err) => {
                return ProviderError::Malformed(format!("unexpected response shape: {}", err))
                    .into()
            }
        };

        match generations.first() {
            Some(generation) => interpret_generation(&generation.generated_text),
            None => ProviderError::Malformed("no generations returned".to_string()).into(),
        }
    }
}
