//! API handlers for the clause server
//!
//! - Contract upload and segmentation
//! - Streaming per-clause analysis (server-sent events)
//! - Single clause re-analysis and ad hoc analysis
//! - Document summary
//! - Translation of analysis content

use std::collections::HashMap;
use std::sync::Arc;

use analysis_core::{AnalysisContext, DispatchEvent};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, Sse},
    Json,
};
use clause_segmenter::SegmentOutcome;
use futures::stream::{Stream, StreamExt};
use risk_engine::RiskAggregator;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_types::{Analysis, AnalyzedClause, Clause, ClauseResult, SummaryInsights};
use tracing::{debug, info, warn};
use translate_core::Language;

use crate::error::ApiError;
use crate::session::SessionId;
use crate::state::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub timestamp: String,
}

/// Handler: GET /health
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "clause-api",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[derive(Deserialize)]
pub struct CreateContractRequest {
    pub text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractResponse {
    pub success: bool,
    pub contract_id: String,
    pub strategy: SegmentOutcome,
    pub clause_count: usize,
    pub clauses: Vec<Clause>,
}

/// Handler: POST /api/contracts
pub async fn handle_create_contract(
    State(state): State<Arc<AppState>>,
    session: SessionId,
    Json(req): Json<CreateContractRequest>,
) -> Result<(StatusCode, Json<ContractResponse>), ApiError> {
    segment_and_store(&state, &session, &req.text).await
}

/// Handler: POST /api/contracts/raw
pub async fn handle_upload_contract(
    State(state): State<Arc<AppState>>,
    session: SessionId,
    body: Bytes,
) -> Result<(StatusCode, Json<ContractResponse>), ApiError> {
    let text = state.extractor.extract(&body)?;
    segment_and_store(&state, &session, &text).await
}

async fn segment_and_store(
    state: &AppState,
    session: &SessionId,
    text: &str,
) -> Result<(StatusCode, Json<ContractResponse>), ApiError> {
    let segmentation = state.segmenter.segment_detailed(text);

    if segmentation.is_rejected() {
        let sentinel = segmentation
            .clauses
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::InvalidRequest("No content".to_string()))?;
        info!(sentinel = %sentinel.id, "Upload rejected by segmenter");
        return Err(ApiError::NoContent(sentinel));
    }

    let contract_id = uuid::Uuid::new_v4().to_string();
    state
        .store
        .save_clauses(session.as_str(), &contract_id, &segmentation.clauses)
        .await?;

    info!(
        contract_id = %contract_id,
        clauses = segmentation.clauses.len(),
        outcome = ?segmentation.outcome,
        "Contract segmented"
    );

    Ok((
        StatusCode::CREATED,
        Json(ContractResponse {
            success: true,
            contract_id,
            strategy: segmentation.outcome,
            clause_count: segmentation.clauses.len(),
            clauses: segmentation.clauses,
        }),
    ))
}

async fn load_contract(
    state: &AppState,
    session: &SessionId,
    contract_id: &str,
) -> Result<Vec<Clause>, ApiError> {
    state
        .store
        .load_clauses(session.as_str(), contract_id)
        .await?
        .ok_or_else(|| ApiError::ContractNotFound(contract_id.to_string()))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClauseListResponse {
    pub success: bool,
    pub contract_id: String,
    pub clauses: Vec<Clause>,
}

/// Handler: GET /api/contracts/:id/clauses
pub async fn handle_get_clauses(
    State(state): State<Arc<AppState>>,
    session: SessionId,
    Path(contract_id): Path<String>,
) -> Result<Json<ClauseListResponse>, ApiError> {
    let clauses = load_contract(&state, &session, &contract_id).await?;
    Ok(Json(ClauseListResponse {
        success: true,
        contract_id,
        clauses,
    }))
}

/// Handler: GET /api/contracts/:id/analyze/stream
///
/// One `data:` frame per clause result in document order, then
/// `event: end` / `data: done`. Each analysis is stored as it is emitted.
pub async fn handle_analyze_stream(
    State(state): State<Arc<AppState>>,
    session: SessionId,
    Path(contract_id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, ApiError> {
    let clauses = load_contract(&state, &session, &contract_id).await?;

    let ctx = Arc::new(AnalysisContext::new());
    info!(
        request_id = %ctx.request_id(),
        contract_id = %contract_id,
        clauses = clauses.len(),
        batch_size = state.dispatcher.batch_size(),
        "Starting streaming analysis"
    );

    let store = state.store.clone();
    let events = state
        .dispatcher
        .process(ctx, clauses)
        .then(move |event| {
            let store = store.clone();
            let session = session.clone();
            let contract_id = contract_id.clone();

            async move {
                match event {
                    DispatchEvent::Result(result) => {
                        if let Some(analysis) = result.analysis() {
                            if let Err(err) = store
                                .save_analysis(session.as_str(), &contract_id, analysis)
                                .await
                            {
                                warn!(clause_id = %result.clause_id(), error = %err, "Failed to store analysis");
                            }
                        }
                        Event::default().json_data(&result)
                    }
                    DispatchEvent::End => Ok(Event::default().event("end").data("done")),
                }
            }
        });

    Ok(Sse::new(events))
}

/// Handler: POST /api/contracts/:id/clauses/:clause_id/analyze
pub async fn handle_reanalyze_clause(
    State(state): State<Arc<AppState>>,
    session: SessionId,
    Path((contract_id, clause_id)): Path<(String, String)>,
) -> Result<Json<ClauseResult>, ApiError> {
    let clauses = load_contract(&state, &session, &contract_id).await?;
    let clause = clauses
        .iter()
        .find(|clause| clause.id == clause_id)
        .ok_or_else(|| ApiError::ClauseNotFound(clause_id.clone()))?;

    let ctx = AnalysisContext::new();
    let analysis = state.orchestrator.analyze_clause(&ctx, clause).await;
    state
        .store
        .save_analysis(session.as_str(), &contract_id, &analysis)
        .await?;

    debug!(clause_id = %clause_id, metrics = ?ctx.metrics(), "Clause re-analyzed");

    Ok(Json(ClauseResult::Analyzed {
        clause_id,
        analysis,
    }))
}

/// Handler: GET /api/contracts/:id/clauses/:clause_id/analysis
pub async fn handle_get_analysis(
    State(state): State<Arc<AppState>>,
    session: SessionId,
    Path((contract_id, clause_id)): Path<(String, String)>,
) -> Result<Json<Analysis>, ApiError> {
    load_contract(&state, &session, &contract_id).await?;
    state
        .store
        .load_analysis(session.as_str(), &contract_id, &clause_id)
        .await?
        .map(Json)
        .ok_or(ApiError::ClauseNotFound(clause_id))
}

/// Handler: GET /api/contracts/:id/summary
pub async fn handle_summary(
    State(state): State<Arc<AppState>>,
    session: SessionId,
    Path(contract_id): Path<String>,
) -> Result<Json<SummaryInsights>, ApiError> {
    let clauses = load_contract(&state, &session, &contract_id).await?;
    let analyses = state
        .store
        .load_analyses(session.as_str(), &contract_id)
        .await?;

    if analyses.is_empty() {
        return Ok(Json(RiskAggregator::pending()));
    }

    let titles: HashMap<&str, &Option<String>> = clauses
        .iter()
        .map(|clause| (clause.id.as_str(), &clause.title))
        .collect();

    let analyzed: Vec<AnalyzedClause> = analyses
        .into_iter()
        .map(|analysis| AnalyzedClause {
            clause_id: analysis.clause_id.clone(),
            clause_title: titles
                .get(analysis.clause_id.as_str())
                .and_then(|title| (*title).clone()),
            analysis,
        })
        .collect();

    Ok(Json(state.aggregator.aggregate(&analyzed)))
}

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub clause: String,
}

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub analysis: Analysis,
}

/// Handler: POST /api/analyze
pub async fn handle_analyze(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    if req.clause.trim().is_empty() {
        return Err(ApiError::InvalidRequest(
            "Clause text is required".to_string(),
        ));
    }

    let ctx = AnalysisContext::new();
    let analysis = state.orchestrator.analyze(&ctx, &req.clause).await;

    Ok(Json(AnalyzeResponse {
        success: true,
        analysis,
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    pub content: Value,
    pub target_lang: Language,
    #[serde(default)]
    pub source_lang: Language,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateResponse {
    pub success: bool,
    pub content: Value,
    pub target_lang: Language,
    pub source_lang: Language,
}

/// Handler: POST /api/translate
pub async fn handle_translate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TranslateRequest>,
) -> Json<TranslateResponse> {
    info!(from = %req.source_lang, to = %req.target_lang, "Translation request");

    let content = state
        .translator
        .translate(&req.content, req.target_lang, req.source_lang)
        .await;

    Json(TranslateResponse {
        success: true,
        content,
        target_lang: req.target_lang,
        source_lang: req.source_lang,
    })
}
