use super::{AnalysisProvider, ProviderResult};
use async_trait::async_trait;
use risk_engine::LocalAnalyzer;
use shared_types::Analysis;

/// Rule-based tier. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFallbackAnalyzer {
    analyzer: LocalAnalyzer,
}

impl LocalFallbackAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn analysis(&self, clause_text: &str) -> Analysis {
        self.analyzer.analyze(clause_text)
    }
}

#[async_trait]
impl AnalysisProvider for LocalFallbackAnalyzer {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn analyze(&self, clause_text: &str) -> ProviderResult {
        ProviderResult::Structured(self.analysis(clause_text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_always_structured() {
        let provider = LocalFallbackAnalyzer::new();
        for text in ["", "x", "The parties shall act in good faith."] {
            match provider.analyze(text).await {
                ProviderResult::Structured(analysis) => {
                    assert!(!analysis.ambiguities.is_empty());
                    assert!(!analysis.references.is_empty());
                }
                other => panic!("expected structured result, got {:?}", other),
            }
        }
    }
}
