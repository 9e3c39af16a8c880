pub mod types;

pub use types::{
    Analysis, AnalyzedClause, Clause, ClauseResult, ContractType, PlainEnglishExplanation,
    ProblematicClause, RiskLevel, Severity, SummaryInsights, UnfairClause, SENTINEL_PREFIX,
};
