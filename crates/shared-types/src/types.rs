/// Risk classification attached to clauses and analyses
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

/// Four-tier severity reported alongside the three-tier [`RiskLevel`].
/// `Critical` folds into `RiskLevel::High`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }

    pub fn risk_level(&self) -> RiskLevel {
        match self {
            Severity::Low => RiskLevel::Low,
            Severity::Medium => RiskLevel::Medium,
            Severity::High | Severity::Critical => RiskLevel::High,
        }
    }
}

impl From<RiskLevel> for Severity {
    fn from(level: RiskLevel) -> Self {
        match level {
            RiskLevel::Low => Severity::Low,
            RiskLevel::Medium => Severity::Medium,
            RiskLevel::High => Severity::High,
        }
    }
}

/// Kind of agreement a clause appears to belong to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ContractType {
    #[serde(rename = "Employment Agreement")]
    Employment,
    #[serde(rename = "Service Agreement")]
    Service,
    #[serde(rename = "Non-Disclosure Agreement")]
    NonDisclosure,
    #[default]
    #[serde(rename = "General Contract")]
    General,
}

impl ContractType {
    pub fn label(&self) -> &'static str {
        match self {
            ContractType::Employment => "Employment Agreement",
            ContractType::Service => "Service Agreement",
            ContractType::NonDisclosure => "Non-Disclosure Agreement",
            ContractType::General => "General Contract",
        }
    }

    /// Parse a label such as "Service Agreement", "employment" or "NDA"
    pub fn from_label(label: &str) -> Option<Self> {
        let lower = label.trim().to_ascii_lowercase();
        let kind = match lower.as_str() {
            "employment agreement" | "employment" => ContractType::Employment,
            "service agreement" | "service" | "services" => ContractType::Service,
            "non-disclosure agreement" | "non-disclosure" | "nda" => ContractType::NonDisclosure,
            "general contract" | "general" => ContractType::General,
            _ => return None,
        };
        Some(kind)
    }
}

/// Findings restated for a reader without legal training
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlainEnglishExplanation {
    #[serde(default)]
    pub what_this_means: Vec<String>,
    #[serde(default)]
    pub why_it_matters: String,
    #[serde(default)]
    pub next_steps: String,
}

/// A segmented, titled span of contract text
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clause {
    pub id: String, // Unique within a document, e.g. "clause-3"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<RiskLevel>,
}

/// Prefix shared by all sentinel clause ids ("error-short", "error-empty")
pub const SENTINEL_PREFIX: &str = "error-";

impl Clause {
    pub fn new(id: impl Into<String>, title: Option<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title,
            text: text.into(),
            risk_level: None,
        }
    }

    /// True for the placeholder clause emitted when segmentation finds no content
    pub fn is_sentinel(&self) -> bool {
        self.id.starts_with(SENTINEL_PREFIX)
    }
}

/// Structured findings for one clause.
///
/// The base lists are plain `Vec`s so they are always present when serialized,
/// whichever provider produced the result. Optional lists default to empty
/// when a payload omits them.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    #[serde(default)]
    pub clause_id: String,
    #[serde(default)]
    pub ambiguities: Vec<String>,
    #[serde(default)]
    pub risks: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub missing_elements: Vec<String>,
    #[serde(default)]
    pub references: Vec<String>,
    #[serde(default)]
    pub citations: Vec<String>,
    #[serde(default)]
    pub problematic_text: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<RiskLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_type: Option<ContractType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plain_english_explanation: Option<PlainEnglishExplanation>,
}

impl Analysis {
    pub fn with_clause_id(mut self, clause_id: impl Into<String>) -> Self {
        self.clause_id = clause_id.into();
        self
    }

    /// Explicit severity, else the one implied by `risk_level`
    pub fn effective_severity(&self) -> Option<Severity> {
        self.severity.or_else(|| self.risk_level.map(Severity::from))
    }

    /// Number of ambiguity and risk findings combined
    pub fn concern_count(&self) -> usize {
        self.ambiguities.len() + self.risks.len()
    }
}

/// Aggregator input: one clause's analysis together with its title
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedClause {
    pub clause_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clause_title: Option<String>,
    pub analysis: Analysis,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnfairClause {
    pub clause_id: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblematicClause {
    pub clause_id: String,
    pub title: String,
    pub issues: Vec<String>,
    pub citations: Vec<String>,
}

/// Document-level roll-up of every clause analysis, recomputed wholesale
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryInsights {
    pub overall_risk: String,
    pub risk_score: u8, // 1..=10
    pub overall_severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_type: Option<ContractType>,
    pub ambiguous_terms: Vec<String>,
    pub unfair_clauses: Vec<UnfairClause>,
    pub missing_clauses: Vec<String>,
    pub key_findings: Vec<String>,
    pub actionable_suggestions: Vec<String>,
    pub problematic_clauses: Vec<ProblematicClause>,
}

/// One item of the analysis stream: either an analysis or a per-clause error
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum ClauseResult {
    Analyzed {
        #[serde(rename = "clauseId")]
        clause_id: String,
        analysis: Analysis,
    },
    Failed {
        #[serde(rename = "clauseId")]
        clause_id: String,
        error: String,
    },
}

impl ClauseResult {
    pub fn clause_id(&self) -> &str {
        match self {
            ClauseResult::Analyzed { clause_id, .. } | ClauseResult::Failed { clause_id, .. } => {
                clause_id
            }
        }
    }

    pub fn analysis(&self) -> Option<&Analysis> {
        match self {
            ClauseResult::Analyzed { analysis, .. } => Some(analysis),
            ClauseResult::Failed { .. } => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ClauseResult::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_analysis_missing_optional_fields_default_to_empty() {
        let json = r#"{"ambiguities": ["a"], "risks": [], "recommendations": ["r"]}"#;
        let analysis: Analysis = serde_json::from_str(json).unwrap();

        assert_eq!(analysis.ambiguities, vec!["a".to_string()]);
        assert!(analysis.missing_elements.is_empty());
        assert!(analysis.references.is_empty());
        assert!(analysis.risk_level.is_none());
    }

    #[test]
    fn test_analysis_serializes_base_fields_even_when_empty() {
        let value = serde_json::to_value(Analysis::default().with_clause_id("clause-1")).unwrap();

        assert_eq!(value["clauseId"], "clause-1");
        assert!(value["ambiguities"].is_array());
        assert!(value["risks"].is_array());
        assert!(value["recommendations"].is_array());
        assert!(value["missingElements"].is_array());
    }

    #[test]
    fn test_clause_result_wire_shape() {
        let ok = ClauseResult::Analyzed {
            clause_id: "clause-1".to_string(),
            analysis: Analysis::default(),
        };
        let failed = ClauseResult::Failed {
            clause_id: "clause-2".to_string(),
            error: "boom".to_string(),
        };

        let ok_json = serde_json::to_value(&ok).unwrap();
        let failed_json = serde_json::to_value(&failed).unwrap();

        assert_eq!(ok_json["clauseId"], "clause-1");
        assert!(ok_json.get("analysis").is_some());
        assert_eq!(failed_json["clauseId"], "clause-2");
        assert_eq!(failed_json["error"], "boom");

        let parsed: ClauseResult = serde_json::from_value(failed_json).unwrap();
        assert!(parsed.is_error());
        assert_eq!(parsed.clause_id(), "clause-2");
    }

    #[test]
    fn test_sentinel_detection() {
        let sentinel = Clause::new("error-short", None, "too short");
        let normal = Clause::new("clause-1", Some("Terms".into()), "text");

        assert!(sentinel.is_sentinel());
        assert!(!normal.is_sentinel());
    }

    #[test]
    fn test_severity_wire_shape_and_folding() {
        assert_eq!(serde_json::to_string(&Severity::Critical).unwrap(), "\"CRITICAL\"");
        assert_eq!(Severity::Critical.risk_level(), RiskLevel::High);
        assert!(Severity::Critical > Severity::High);

        let analysis = Analysis {
            risk_level: Some(RiskLevel::Medium),
            ..Default::default()
        };
        assert_eq!(analysis.effective_severity(), Some(Severity::Medium));
    }

    #[test]
    fn test_contract_type_labels() {
        assert_eq!(
            serde_json::to_string(&ContractType::NonDisclosure).unwrap(),
            "\"Non-Disclosure Agreement\""
        );
        assert_eq!(ContractType::from_label("NDA"), Some(ContractType::NonDisclosure));
        assert_eq!(
            ContractType::from_label("Employment Agreement"),
            Some(ContractType::Employment)
        );
        assert_eq!(ContractType::from_label("lease"), None);
    }

    #[test]
    fn test_optional_enrichments_are_omitted_when_absent() {
        let value = serde_json::to_value(Analysis::default()).unwrap();
        assert!(value.get("severity").is_none());
        assert!(value.get("contractType").is_none());
        assert!(value.get("plainEnglishExplanation").is_none());
    }

    #[test]
    fn test_risk_level_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&RiskLevel::High).unwrap(), "\"high\"");
        assert_eq!(RiskLevel::Medium.as_str(), "medium");
    }
}
