//! Multi-tier analysis with retry and guaranteed fallback
//!
//! Each clause walks the configured provider tiers in order (normally the
//! remote model service, then the inference API). A tier is retried according
//! to its [`RetryPolicy`] and abandoned once the policy gives up. When every
//! tier has been abandoned the rule-based [`LocalFallbackAnalyzer`] answers, so
//! [`AnalysisOrchestrator::analyze`] has no failure case.

use crate::backoff::RetryPolicy;
use crate::config::PipelineConfig;
use crate::context::AnalysisContext;
use crate::error::ProviderError;
use crate::providers::{
    AnalysisProvider, InferenceApi, LocalFallbackAnalyzer, ProviderResult, RemoteModelService,
};
use shared_types::{Analysis, Clause};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// One provider together with its retry policy
#[derive(Clone)]
pub struct ProviderTier {
    provider: Arc<dyn AnalysisProvider>,
    policy: RetryPolicy,
}

impl ProviderTier {
    pub fn new(provider: Arc<dyn AnalysisProvider>, policy: RetryPolicy) -> Self {
        Self { provider, policy }
    }

    pub fn name(&self) -> &'static str {
        self.provider.name()
    }
}

#[derive(Clone)]
pub struct AnalysisOrchestrator {
    tiers: Vec<ProviderTier>,
    local: LocalFallbackAnalyzer,
    provider_timeout: Duration,
}

impl AnalysisOrchestrator {
    pub fn new(provider_timeout: Duration) -> Self {
        Self {
            tiers: Vec::new(),
            local: LocalFallbackAnalyzer::new(),
            provider_timeout,
        }
    }

    /// Append a tier; tiers are tried in insertion order
    pub fn with_tier(mut self, provider: Arc<dyn AnalysisProvider>, policy: RetryPolicy) -> Self {
        self.tiers.push(ProviderTier::new(provider, policy));
        self
    }

    /// Build the standard tiers from configuration
    pub fn from_config(config: &PipelineConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.provider_timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let mut orchestrator = Self::new(config.provider_timeout);

        if let Some(remote) = &config.remote_model {
            orchestrator = orchestrator.with_tier(
                Arc::new(RemoteModelService::new(client.clone(), remote.clone())),
                remote.retry.clone(),
            );
        }

        if let Some(inference) = &config.inference_api {
            orchestrator = orchestrator.with_tier(
                Arc::new(InferenceApi::new(client, inference.clone())),
                inference.retry.clone(),
            );
        }

        info!(
            tiers = ?orchestrator.tier_names(),
            timeout_ms = config.provider_timeout.as_millis() as u64,
            "Analysis orchestrator configured"
        );

        orchestrator
    }

    pub fn tier_names(&self) -> Vec<&'static str> {
        self.tiers.iter().map(ProviderTier::name).collect()
    }

    /// Analyze clause text. Always returns a well-formed analysis.
    pub async fn analyze(&self, ctx: &AnalysisContext, clause_text: &str) -> Analysis {
        for tier in &self.tiers {
            if let Some(analysis) = self.run_tier(ctx, tier, clause_text).await {
                return analysis;
            }
            ctx.record_fallover();
        }

        debug!(request_id = %ctx.request_id(), "Using local fallback analysis");
        ctx.record_local_fallback();
        self.local.analysis(clause_text)
    }

    /// Analyze a clause and tag the result with its id
    pub async fn analyze_clause(&self, ctx: &AnalysisContext, clause: &Clause) -> Analysis {
        self.analyze(ctx, &clause.text)
            .await
            .with_clause_id(clause.id.clone())
    }

    async fn call(&self, provider: &dyn AnalysisProvider, clause_text: &str) -> ProviderResult {
        match tokio::time::timeout(self.provider_timeout, provider.analyze(clause_text)).await {
            Ok(result) => result,
            Err(_) => ProviderError::Timeout(self.provider_timeout).into(),
        }
    }

    /// Run one tier to success or until its policy gives up. Each pass of
    /// the loop is one re-invocation of the same tier with the retry budget
    /// carried in `RetryState`.
    async fn run_tier(
        &self,
        ctx: &AnalysisContext,
        tier: &ProviderTier,
        clause_text: &str,
    ) -> Option<Analysis> {
        let mut retry = tier.policy.start();
        let mut attempt: u32 = 1;

        loop {
            ctx.record_attempt();
            let result = self.call(tier.provider.as_ref(), clause_text).await;

            let err = match result.into_analysis(clause_text) {
                Ok(analysis) => {
                    debug!(
                        request_id = %ctx.request_id(),
                        provider = tier.name(),
                        attempt,
                        "Provider returned analysis"
                    );
                    return Some(analysis);
                }
                Err(err) => err,
            };

            let kind = err.kind();
            match retry.next_delay(kind) {
                Some(delay) => {
                    warn!(
                        request_id = %ctx.request_id(),
                        provider = tier.name(),
                        attempt,
                        kind = ?kind,
                        error = %err,
                        "Provider call failed, retrying in {:?}",
                        delay
                    );
                    ctx.record_retry();
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                None => {
                    warn!(
                        request_id = %ctx.request_id(),
                        provider = tier.name(),
                        attempt,
                        kind = ?kind,
                        error = %err,
                        "Provider abandoned, falling over to next tier"
                    );
                    return None;
                }
            }
        }
    }
}
