//! Resilient clause analysis pipeline
//!
//! - [`AnalysisOrchestrator`] walks the provider tiers with retry and backoff
//!   and falls back to local rules, so analysis never fails
//! - [`StreamDispatcher`] drives per-clause analysis in sequential batches
//!   and streams results incrementally
//! - [`AnalysisContext`] carries request-scoped identifiers and counters

pub mod backoff;
pub mod config;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod orchestrator;
pub mod providers;

pub use backoff::RetryPolicy;
pub use config::{InferenceApiConfig, PipelineConfig, RemoteModelConfig};
pub use context::{AnalysisContext, ContextMetrics};
pub use dispatcher::{ClauseAnalyzer, DispatchEvent, StreamDispatcher};
pub use error::{AnalysisError, ErrorKind, ProviderError};
pub use orchestrator::AnalysisOrchestrator;
pub use providers::{AnalysisProvider, ProviderResult};

use std::sync::Arc;

/// Build the orchestrator and dispatcher described by `config`
pub fn build_pipeline(config: &PipelineConfig) -> (Arc<AnalysisOrchestrator>, StreamDispatcher) {
    let orchestrator = Arc::new(AnalysisOrchestrator::from_config(config));
    let dispatcher = StreamDispatcher::new(orchestrator.clone(), config.batch_size);
    (orchestrator, dispatcher)
}
