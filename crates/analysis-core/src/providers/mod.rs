//! Analysis provider tiers
//!
//! Every tier implements [`AnalysisProvider`] and reports its outcome as a
//! [`ProviderResult`]. Turning that result into an [`Analysis`] happens in one
//! place, [`ProviderResult::into_analysis`].

pub mod inference_api;
pub mod local;
pub mod remote_model;

pub use inference_api::InferenceApi;
pub use local::LocalFallbackAnalyzer;
pub use remote_model::RemoteModelService;

use crate::error::ProviderError;
use async_trait::async_trait;
use risk_engine::{analysis_from_free_text, analysis_from_json};
use serde_json::Value;
use shared_types::Analysis;

/// Outcome of one provider call
#[derive(Debug)]
pub enum ProviderResult {
    /// The provider returned the canonical shape
    Structured(Analysis),
    /// The provider returned prose that still has to be mined for findings
    FreeText(String),
    Failure(ProviderError),
}

impl ProviderResult {
    /// Classify a raw payload. JSON objects (or strings holding one) in a
    /// known shape are structured. Strings that are not JSON at all are free
    /// text. Anything else, including JSON in an unknown shape, is malformed.
    pub fn from_payload(payload: &Value) -> Self {
        if let Some(analysis) = analysis_from_json(payload) {
            return ProviderResult::Structured(analysis);
        }

        match payload {
            Value::String(text) if is_embedded_json(text) => {
                ProviderResult::Failure(ProviderError::Malformed(format!(
                    "unrecognized JSON shape: {}",
                    truncate(text, 200)
                )))
            }
            Value::String(text) if !text.trim().is_empty() => {
                ProviderResult::FreeText(text.clone())
            }
            other => ProviderResult::Failure(ProviderError::Malformed(format!(
                "unexpected payload: {}",
                truncate(&other.to_string(), 200)
            ))),
        }
    }

    /// Normalize into an [`Analysis`] for `clause_text`
    pub fn into_analysis(self, clause_text: &str) -> Result<Analysis, ProviderError> {
        match self {
            ProviderResult::Structured(analysis) => Ok(analysis),
            ProviderResult::FreeText(text) => Ok(analysis_from_free_text(&text, clause_text)),
            ProviderResult::Failure(err) => Err(err),
        }
    }
}

impl From<ProviderError> for ProviderResult {
    fn from(err: ProviderError) -> Self {
        ProviderResult::Failure(err)
    }
}

#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Short name used in log fields
    fn name(&self) -> &'static str;

    async fn analyze(&self, clause_text: &str) -> ProviderResult;
}

/// True when `text` is itself a JSON object or array
pub(crate) fn is_embedded_json(text: &str) -> bool {
    matches!(
        serde_json::from_str::<Value>(text.trim()),
        Ok(Value::Object(_) | Value::Array(_))
    )
}

pub(crate) fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_payload_classification() {
        let structured = ProviderResult::from_payload(&json!({
            "ambiguities": [], "risks": ["r"], "recommendations": []
        }));
        assert!(matches!(structured, ProviderResult::Structured(_)));

        let prose = ProviderResult::from_payload(&json!("This clause carries some risk."));
        assert!(matches!(prose, ProviderResult::FreeText(_)));

        let malformed = ProviderResult::from_payload(&json!(42));
        match malformed {
            ProviderResult::Failure(err) => assert_eq!(err.kind(), ErrorKind::Malformed),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_error_object_in_string_is_malformed() {
        let reply = ProviderResult::from_payload(&json!(
            "{\"error\":\"Please provide a clause to analyze\"}"
        ));
        match reply {
            ProviderResult::Failure(err) => assert_eq!(err.kind(), ErrorKind::Malformed),
            other => panic!("expected failure, got {:?}", other),
        }

        let list = ProviderResult::from_payload(&json!("[1, 2, 3]"));
        assert!(matches!(list, ProviderResult::Failure(_)));

        let object = ProviderResult::from_payload(&json!({ "error": "busy" }));
        assert!(matches!(object, ProviderResult::Failure(_)));

        // Prose that merely mentions braces stays free text
        let prose = ProviderResult::from_payload(&json!("Replace {party} with a defined term."));
        assert!(matches!(prose, ProviderResult::FreeText(_)));
    }

    #[test]
    fn test_free_text_is_normalized() {
        let analysis = ProviderResult::FreeText("We recommend a fixed notice period here.".into())
            .into_analysis("Either party may terminate.")
            .unwrap();

        assert!(analysis
            .recommendations
            .iter()
            .any(|r| r == "We recommend a fixed notice period here"));
    }
}
