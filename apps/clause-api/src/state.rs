//! Shared application state

use analysis_core::{build_pipeline, AnalysisOrchestrator, PipelineConfig, StreamDispatcher};
use clause_segmenter::TextSegmenter;
use risk_engine::RiskAggregator;
use std::sync::Arc;
use translate_core::{TranslationConfig, TranslationPipeline};

use crate::extract::{PlainTextExtractor, TextExtractor};
use crate::store::{ContractStore, InMemoryStore};

pub struct AppState {
    pub segmenter: TextSegmenter,
    pub orchestrator: Arc<AnalysisOrchestrator>,
    pub dispatcher: StreamDispatcher,
    pub aggregator: RiskAggregator,
    pub translator: TranslationPipeline,
    pub store: Arc<dyn ContractStore>,
    pub extractor: Arc<dyn TextExtractor>,
}

impl AppState {
    pub fn new(pipeline: &PipelineConfig, translation: &TranslationConfig) -> Self {
        let (orchestrator, dispatcher) = build_pipeline(pipeline);

        Self {
            segmenter: TextSegmenter::default(),
            orchestrator,
            dispatcher,
            aggregator: RiskAggregator::new(),
            translator: TranslationPipeline::from_config(translation),
            store: Arc::new(InMemoryStore::new()),
            extractor: Arc::new(PlainTextExtractor),
        }
    }
}
