//! Request-scoped analysis context
//!
//! One context is created per document-processing request and shared by
//! every clause analysis of that request. It carries the request id used in
//! log fields and counts what the pipeline did, logging a summary when the
//! stream ends.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::info;

#[derive(Debug)]
pub struct AnalysisContext {
    request_id: String,
    started: Instant,
    provider_attempts: AtomicUsize,
    retries: AtomicUsize,
    fallovers: AtomicUsize,
    local_fallbacks: AtomicUsize,
    completed_clauses: AtomicUsize,
    failed_clauses: AtomicUsize,
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextMetrics {
    pub provider_attempts: usize,
    pub retries: usize,
    pub fallovers: usize,
    pub local_fallbacks: usize,
    pub completed_clauses: usize,
    pub failed_clauses: usize,
}

impl Default for AnalysisContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisContext {
    pub fn new() -> Self {
        Self::with_request_id(uuid::Uuid::new_v4().to_string())
    }

    pub fn with_request_id(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            started: Instant::now(),
            provider_attempts: AtomicUsize::new(0),
            retries: AtomicUsize::new(0),
            fallovers: AtomicUsize::new(0),
            local_fallbacks: AtomicUsize::new(0),
            completed_clauses: AtomicUsize::new(0),
            failed_clauses: AtomicUsize::new(0),
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn record_attempt(&self) {
        self.provider_attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_retry(&self) {
        self.retries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallover(&self) {
        self.fallovers.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_local_fallback(&self) {
        self.local_fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_completed(&self) {
        self.completed_clauses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failed(&self) {
        self.failed_clauses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn metrics(&self) -> ContextMetrics {
        ContextMetrics {
            provider_attempts: self.provider_attempts.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
            fallovers: self.fallovers.load(Ordering::Relaxed),
            local_fallbacks: self.local_fallbacks.load(Ordering::Relaxed),
            completed_clauses: self.completed_clauses.load(Ordering::Relaxed),
            failed_clauses: self.failed_clauses.load(Ordering::Relaxed),
        }
    }

    /// Log the request summary. Called once when the stream ends.
    pub fn log_summary(&self) {
        let metrics = self.metrics();
        info!(
            request_id = %self.request_id,
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            completed = metrics.completed_clauses,
            failed = metrics.failed_clauses,
            attempts = metrics.provider_attempts,
            retries = metrics.retries,
            fallovers = metrics.fallovers,
            local_fallbacks = metrics.local_fallbacks,
            "Analysis request finished"
        );
    }
}
