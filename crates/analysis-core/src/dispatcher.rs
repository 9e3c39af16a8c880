//! Batched streaming dispatch of clause analyses
//!
//! Clauses are split into batches of `batch_size`. Batches run strictly one
//! after another; the clauses of a batch run concurrently, each in its own
//! task so a panic stays contained to its clause. A batch's results are
//! emitted in clause order before the next batch starts, and the stream ends
//! with [`DispatchEvent::End`].

use crate::context::AnalysisContext;
use crate::error::AnalysisError;
use crate::orchestrator::AnalysisOrchestrator;
use async_trait::async_trait;
use futures::stream::{self, Stream};
use shared_types::{Analysis, Clause, ClauseResult};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, warn};

/// Per-clause analysis as seen by the dispatcher
#[async_trait]
pub trait ClauseAnalyzer: Send + Sync + 'static {
    async fn analyze_clause(
        &self,
        ctx: &AnalysisContext,
        clause: &Clause,
    ) -> Result<Analysis, AnalysisError>;
}

#[async_trait]
impl ClauseAnalyzer for AnalysisOrchestrator {
    async fn analyze_clause(
        &self,
        ctx: &AnalysisContext,
        clause: &Clause,
    ) -> Result<Analysis, AnalysisError> {
        Ok(AnalysisOrchestrator::analyze_clause(self, ctx, clause).await)
    }
}

/// One item of the dispatch stream
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchEvent {
    Result(ClauseResult),
    End,
}

#[derive(Clone)]
pub struct StreamDispatcher {
    analyzer: Arc<dyn ClauseAnalyzer>,
    batch_size: usize,
}

struct DispatchState {
    analyzer: Arc<dyn ClauseAnalyzer>,
    ctx: Arc<AnalysisContext>,
    batches: VecDeque<Vec<Clause>>,
    ready: VecDeque<ClauseResult>,
    finished: bool,
}

impl StreamDispatcher {
    pub fn new(analyzer: Arc<dyn ClauseAnalyzer>, batch_size: usize) -> Self {
        Self {
            analyzer,
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Analyze `clauses`, yielding one result per clause and then `End`
    pub fn process(
        &self,
        ctx: Arc<AnalysisContext>,
        clauses: Vec<Clause>,
    ) -> impl Stream<Item = DispatchEvent> + Send + 'static {
        let batches: VecDeque<Vec<Clause>> = clauses
            .chunks(self.batch_size)
            .map(|chunk| chunk.to_vec())
            .collect();

        debug!(
            request_id = %ctx.request_id(),
            clauses = clauses.len(),
            batches = batches.len(),
            "Dispatching clause analyses"
        );

        let state = DispatchState {
            analyzer: self.analyzer.clone(),
            ctx,
            batches,
            ready: VecDeque::new(),
            finished: false,
        };

        stream::unfold(state, |mut state| async move {
            loop {
                if let Some(result) = state.ready.pop_front() {
                    return Some((DispatchEvent::Result(result), state));
                }

                if state.finished {
                    return None;
                }

                match state.batches.pop_front() {
                    Some(batch) => {
                        state.ready = run_batch(&state.analyzer, &state.ctx, batch).await.into();
                    }
                    None => {
                        state.finished = true;
                        state.ctx.log_summary();
                        return Some((DispatchEvent::End, state));
                    }
                }
            }
        })
    }
}

/// Run one batch concurrently and collect results in clause order
async fn run_batch(
    analyzer: &Arc<dyn ClauseAnalyzer>,
    ctx: &Arc<AnalysisContext>,
    batch: Vec<Clause>,
) -> Vec<ClauseResult> {
    let ids: Vec<String> = batch.iter().map(|clause| clause.id.clone()).collect();

    // Spawned tasks keep running if the stream is dropped mid-batch
    let handles: Vec<_> = batch
        .into_iter()
        .map(|clause| {
            let analyzer = analyzer.clone();
            let ctx = ctx.clone();
            tokio::spawn(async move { analyzer.analyze_clause(&ctx, &clause).await })
        })
        .collect();

    let outcomes = futures::future::join_all(handles).await;

    ids.into_iter()
        .zip(outcomes)
        .map(|(clause_id, outcome)| {
            let outcome = outcome.map_err(AnalysisError::from).and_then(|result| result);
            match outcome {
                Ok(analysis) => {
                    ctx.record_completed();
                    ClauseResult::Analyzed {
                        analysis: analysis.with_clause_id(clause_id.clone()),
                        clause_id,
                    }
                }
                Err(err) => {
                    warn!(
                        request_id = %ctx.request_id(),
                        clause_id = %clause_id,
                        error = %err,
                        "Clause analysis failed"
                    );
                    ctx.record_failed();
                    ClauseResult::Failed {
                        clause_id,
                        error: err.to_string(),
                    }
                }
            }
        })
        .collect()
}
