//! Rule-based clause risk analysis
//!
//! Synchronous and free of I/O. Provides the deterministic [`LocalAnalyzer`]
//! that backs the analysis pipeline, normalization of provider payloads into
//! [`Analysis`], and the document-level [`RiskAggregator`].

pub mod aggregate;
pub mod local;
pub mod normalize;
pub mod patterns;

pub use aggregate::{risk_score, severity_weight, RiskAggregator};
pub use local::{
    contract_type_recommendation, detect_contract_type, risk_level_from_severities,
    severity_from_scores, LocalAnalyzer, DEFAULT_REFERENCES,
};
pub use normalize::{analysis_from_free_text, analysis_from_json, parse_risk_level, parse_severity};
pub use shared_types::{Analysis, AnalyzedClause, SummaryInsights};
