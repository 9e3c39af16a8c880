//! Document-level roll-up of clause analyses into [`SummaryInsights`]

use crate::patterns::{contains_any, push_unique};
use shared_types::{
    AnalyzedClause, ContractType, ProblematicClause, Severity, SummaryInsights, UnfairClause,
};
use tracing::debug;

/// A clause with more risks than this is high-risk
pub const HIGH_RISK_THRESHOLD: usize = 2;

pub const MAX_AMBIGUOUS_TERMS: usize = 8;
pub const MAX_UNFAIR_CLAUSES: usize = 5;
pub const MAX_MISSING_CLAUSES: usize = 6;
pub const MAX_SUGGESTIONS: usize = 8;
pub const MAX_PROBLEMATIC_CLAUSES: usize = 5;
pub const MAX_KEY_FINDINGS: usize = 6;
pub const MAX_SUPPORTING_ITEMS: usize = 3;

pub const PENDING_OVERALL_RISK: &str =
    "Analysis pending. Clause analyses will appear here once processing completes.";

/// Severity weights for risk descriptions, highest first
const SEVERITY_WEIGHTS: &[(&[&str], f64)] = &[
    (&["liability", "damages", "breach"], 3.0),
    (&["termination", "penalty", "dispute"], 2.5),
    (&["confidential", "ip", "property"], 2.0),
];

const DEFAULT_SEVERITY_WEIGHT: f64 = 1.0;

/// Recommendations starting with one of these are listed first
const PRIORITY_VERBS: &[&str] = &["define", "specify", "add", "clarify"];

/// Weight of one risk description
pub fn severity_weight(risk: &str) -> f64 {
    let lower = risk.to_lowercase();
    SEVERITY_WEIGHTS
        .iter()
        .find(|(keywords, _)| contains_any(&lower, keywords))
        .map(|(_, weight)| *weight)
        .unwrap_or(DEFAULT_SEVERITY_WEIGHT)
}

fn is_high_risk(clause: &AnalyzedClause) -> bool {
    clause.analysis.risks.len() > HIGH_RISK_THRESHOLD
}

/// Everything the score and the findings are computed from
#[derive(Debug, Default)]
struct Tally {
    ambiguities: Vec<String>,
    risks: Vec<String>,
    recommendations: Vec<String>,
    missing: Vec<String>,
    references: Vec<String>,
    ambiguity_occurrences: usize,
    high_risk_clauses: usize,
    clause_count: usize,
    severity: Severity,
    contract_types: Vec<(ContractType, usize)>,
}

impl Tally {
    fn from_clauses(clauses: &[AnalyzedClause]) -> Self {
        let mut tally = Tally {
            clause_count: clauses.len(),
            ..Default::default()
        };

        for clause in clauses {
            let analysis = &clause.analysis;
            tally.ambiguity_occurrences += analysis.ambiguities.len();
            if is_high_risk(clause) {
                tally.high_risk_clauses += 1;
            }
            if let Some(severity) = analysis.effective_severity() {
                tally.severity = tally.severity.max(severity);
            }
            match analysis.contract_type {
                Some(ContractType::General) | None => {}
                Some(kind) => match tally.contract_types.iter_mut().find(|(k, _)| *k == kind) {
                    Some((_, count)) => *count += 1,
                    None => tally.contract_types.push((kind, 1)),
                },
            }

            for item in &analysis.ambiguities {
                push_unique(&mut tally.ambiguities, item.as_str());
            }
            for item in &analysis.risks {
                push_unique(&mut tally.risks, item.as_str());
            }
            for item in &analysis.recommendations {
                push_unique(&mut tally.recommendations, item.as_str());
            }
            for item in &analysis.missing_elements {
                push_unique(&mut tally.missing, item.as_str());
            }
            for item in &analysis.references {
                push_unique(&mut tally.references, item.as_str());
            }
        }

        tally
    }

    /// Most frequent specific agreement type; ties go to the earliest clause
    fn contract_type(&self) -> Option<ContractType> {
        let mut best: Option<(ContractType, usize)> = None;
        for &(kind, count) in &self.contract_types {
            if best.map_or(true, |(_, top)| count > top) {
                best = Some((kind, count));
            }
        }
        best.map(|(kind, _)| kind)
    }

    fn score(&self) -> u8 {
        if self.clause_count == 0 {
            return 1;
        }

        let avg_weight = if self.risks.is_empty() {
            0.0
        } else {
            self.risks.iter().map(|r| severity_weight(r)).sum::<f64>() / self.risks.len() as f64
        };
        let complexity = (self.clause_count as f64 / 10.0).min(1.0);
        let ambiguity = (self.ambiguity_occurrences as f64 / 15.0).min(1.0);
        let high_risk = (self.high_risk_clauses as f64 / self.clause_count as f64).min(0.5);

        let raw = avg_weight * 1.5 + complexity * 2.0 + ambiguity * 2.0 + high_risk * 3.0;
        raw.round().clamp(1.0, 10.0) as u8
    }
}

/// Risk score in `1..=10` for a set of clause analyses
pub fn risk_score(clauses: &[AnalyzedClause]) -> u8 {
    Tally::from_clauses(clauses).score()
}

fn overall_risk_sentence(score: u8, distinct_risks: usize, high_risk_clauses: usize) -> String {
    match score {
        0..=3 => format!(
            "Low risk: {} potential issue(s) identified, none requiring urgent attention ({} high-risk clause(s)).",
            distinct_risks, high_risk_clauses
        ),
        4..=6 => format!(
            "Moderate risk: {} distinct risk(s) identified across the contract, including {} high-risk clause(s). Review recommended before signing.",
            distinct_risks, high_risk_clauses
        ),
        7..=8 => format!(
            "Significant risk: {} distinct risk(s) found and {} clause(s) flagged as high-risk. Negotiate changes before signing.",
            distinct_risks, high_risk_clauses
        ),
        _ => format!(
            "Critical risk: {} distinct risk(s) and {} high-risk clause(s). Do not sign without legal review.",
            distinct_risks, high_risk_clauses
        ),
    }
}

fn prioritized_suggestions(recommendations: &[String]) -> Vec<String> {
    let (mut first, rest): (Vec<String>, Vec<String>) =
        recommendations.iter().cloned().partition(|r| {
            let lower = r.to_lowercase();
            PRIORITY_VERBS.iter().any(|verb| lower.starts_with(verb))
        });

    first.extend(rest);
    first.truncate(MAX_SUGGESTIONS);
    first
}

/// Pure aggregation over clause analyses
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskAggregator;

impl RiskAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Placeholder reported before any clause has been analyzed
    pub fn pending() -> SummaryInsights {
        SummaryInsights {
            overall_risk: PENDING_OVERALL_RISK.to_string(),
            risk_score: 1,
            overall_severity: Severity::Low,
            contract_type: None,
            ambiguous_terms: Vec::new(),
            unfair_clauses: Vec::new(),
            missing_clauses: Vec::new(),
            key_findings: Vec::new(),
            actionable_suggestions: Vec::new(),
            problematic_clauses: Vec::new(),
        }
    }

    pub fn aggregate(&self, clauses: &[AnalyzedClause]) -> SummaryInsights {
        if clauses.is_empty() {
            return Self::pending();
        }

        let tally = Tally::from_clauses(clauses);
        let score = tally.score();

        debug!(
            clauses = tally.clause_count,
            distinct_risks = tally.risks.len(),
            high_risk = tally.high_risk_clauses,
            score,
            "Aggregated clause analyses"
        );

        let high_risk: Vec<&AnalyzedClause> = clauses.iter().filter(|c| is_high_risk(c)).collect();

        let unfair_clauses = high_risk
            .iter()
            .take(MAX_UNFAIR_CLAUSES)
            .map(|clause| UnfairClause {
                clause_id: clause.clause_id.clone(),
                description: format!(
                    "{} contains {} significant risks: {}",
                    clause_label(clause),
                    clause.analysis.risks.len(),
                    clause
                        .analysis
                        .risks
                        .iter()
                        .take(MAX_SUPPORTING_ITEMS)
                        .cloned()
                        .collect::<Vec<_>>()
                        .join("; ")
                ),
            })
            .collect();

        let problematic_clauses = high_risk
            .iter()
            .take(MAX_PROBLEMATIC_CLAUSES)
            .map(|clause| {
                let analysis = &clause.analysis;
                let issues = if analysis.problematic_text.is_empty() {
                    &analysis.risks
                } else {
                    &analysis.problematic_text
                };
                let citations = if analysis.citations.is_empty() {
                    &analysis.references
                } else {
                    &analysis.citations
                };

                ProblematicClause {
                    clause_id: clause.clause_id.clone(),
                    title: clause_label(clause),
                    issues: issues.iter().take(MAX_SUPPORTING_ITEMS).cloned().collect(),
                    citations: citations.iter().take(MAX_SUPPORTING_ITEMS).cloned().collect(),
                }
            })
            .collect();

        let mut ambiguous_terms = tally.ambiguities.clone();
        ambiguous_terms.truncate(MAX_AMBIGUOUS_TERMS);

        let mut missing_clauses = tally.missing.clone();
        missing_clauses.truncate(MAX_MISSING_CLAUSES);

        SummaryInsights {
            overall_risk: overall_risk_sentence(score, tally.risks.len(), tally.high_risk_clauses),
            risk_score: score,
            overall_severity: tally.severity,
            contract_type: tally.contract_type(),
            ambiguous_terms,
            unfair_clauses,
            missing_clauses,
            key_findings: key_findings(&tally, score),
            actionable_suggestions: prioritized_suggestions(&tally.recommendations),
            problematic_clauses,
        }
    }
}

fn clause_label(clause: &AnalyzedClause) -> String {
    clause
        .clause_title
        .clone()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| clause.clause_id.clone())
}

fn key_findings(tally: &Tally, score: u8) -> Vec<String> {
    let mut findings = Vec::new();

    if tally.risks.len() > 8 {
        findings.push(format!(
            "The contract contains {} distinct risk factors that warrant careful review",
            tally.risks.len()
        ));
    }
    if tally.severity >= Severity::High {
        findings.push(format!(
            "{} RISK: Immediate legal review strongly recommended",
            tally.severity.as_str()
        ));
    }
    if let Some(kind) = tally.contract_type() {
        findings.push(format!(
            "Detected as {}: specialized analysis applied",
            kind.label()
        ));
    }
    if tally.ambiguity_occurrences > 10 {
        findings.push(format!(
            "{} ambiguous terms could lead to interpretation disputes",
            tally.ambiguity_occurrences
        ));
    }
    if tally.missing.len() > 5 {
        findings.push(format!(
            "{} standard protections appear to be missing",
            tally.missing.len()
        ));
    }
    if tally.high_risk_clauses > 0 {
        findings.push(format!(
            "{} of {} clauses are high-risk and should be renegotiated",
            tally.high_risk_clauses, tally.clause_count
        ));
    }
    if score >= 7 {
        findings.push(format!(
            "Overall risk score of {}/10 calls for legal review before signing",
            score
        ));
    }
    if !tally.references.is_empty() && findings.len() < MAX_KEY_FINDINGS {
        findings.push(format!(
            "Findings are supported by {} legal reference(s)",
            tally.references.len()
        ));
    }
    if findings.is_empty() {
        findings.push("No major red flags were detected across the analyzed clauses".to_string());
    }

    findings.truncate(MAX_KEY_FINDINGS);
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shared_types::{Analysis, RiskLevel};

    fn clause(id: &str, risks: &[&str], ambiguities: &[&str]) -> AnalyzedClause {
        AnalyzedClause {
            clause_id: id.to_string(),
            clause_title: Some(format!("Title {}", id)),
            analysis: Analysis {
                clause_id: id.to_string(),
                risks: risks.iter().map(|s| s.to_string()).collect(),
                ambiguities: ambiguities.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_empty_input_is_pending() {
        let summary = RiskAggregator::new().aggregate(&[]);
        assert_eq!(summary, RiskAggregator::pending());
        assert_eq!(summary.risk_score, 1);
    }

    #[test]
    fn test_severity_weights() {
        assert_eq!(severity_weight("Unlimited liability exposure"), 3.0);
        assert_eq!(severity_weight("Early termination penalty"), 2.5);
        assert_eq!(severity_weight("IP ownership unclear"), 2.0);
        assert_eq!(severity_weight("Shipping schedule is vague"), 1.0);
    }

    #[test]
    fn test_score_arithmetic() {
        // avg weight 3 -> 4.5, complexity 0.1 -> 0.2, ambiguity 0, high-risk 0
        let clauses = vec![clause("clause-1", &["Liability is uncapped"], &[])];
        assert_eq!(risk_score(&clauses), 5);
    }

    #[test]
    fn test_score_with_high_risk_clauses() {
        let risky = ["Liability is uncapped", "Damages unlimited", "Breach undefined"];
        let clauses: Vec<_> = (1..=10)
            .map(|i| {
                let id = format!("clause-{}", i);
                if i <= 5 {
                    clause(&id, &risky, &["vague", "unclear"])
                } else {
                    clause(&id, &[], &["vague", "unclear"])
                }
            })
            .collect();

        // 4.5 + 2.0 + min(20/15,1)*2 = 2.0 + 0.5*3 = 1.5 -> 10
        assert_eq!(risk_score(&clauses), 10);
    }

    #[test]
    fn test_sets_deduplicate_across_clauses() {
        let clauses = vec![
            clause("clause-1", &["Shared risk"], &["Term X"]),
            clause("clause-2", &["Shared risk"], &["Term X", "Term Y"]),
        ];
        let summary = RiskAggregator::new().aggregate(&clauses);
        assert_eq!(summary.ambiguous_terms, vec!["Term X", "Term Y"]);
    }

    #[test]
    fn test_high_risk_clauses_collected() {
        let clauses = vec![
            clause("clause-1", &["a", "b", "c"], &[]),
            clause("clause-2", &["a", "b"], &[]),
        ];
        let summary = RiskAggregator::new().aggregate(&clauses);

        assert_eq!(summary.unfair_clauses.len(), 1);
        assert_eq!(summary.unfair_clauses[0].clause_id, "clause-1");
        assert_eq!(summary.problematic_clauses[0].title, "Title clause-1");
        assert_eq!(summary.problematic_clauses[0].issues, vec!["a", "b", "c"]);
        assert!(summary
            .key_findings
            .iter()
            .any(|f| f.starts_with("1 of 2 clauses")));
    }

    #[test]
    fn test_suggestions_prioritized() {
        let mut c = clause("clause-1", &[], &[]);
        c.analysis.recommendations = vec![
            "Consult counsel".to_string(),
            "Define the term".to_string(),
            "Review annually".to_string(),
            "Specify the deadline".to_string(),
        ];
        let summary = RiskAggregator::new().aggregate(&[c]);

        assert_eq!(
            summary.actionable_suggestions,
            vec![
                "Define the term",
                "Specify the deadline",
                "Consult counsel",
                "Review annually"
            ]
        );
    }

    #[test]
    fn test_overall_risk_brackets() {
        assert!(overall_risk_sentence(2, 1, 0).starts_with("Low risk"));
        assert!(overall_risk_sentence(5, 4, 1).starts_with("Moderate risk"));
        assert!(overall_risk_sentence(8, 9, 2).starts_with("Significant risk"));
        assert!(overall_risk_sentence(9, 12, 4).starts_with("Critical risk"));
    }

    #[test]
    fn test_critical_clause_sets_document_severity() {
        let mut calm = clause("clause-1", &[], &[]);
        calm.analysis.risk_level = Some(RiskLevel::Medium);
        let mut critical = clause("clause-2", &["Liability is uncapped"], &[]);
        critical.analysis.severity = Some(Severity::Critical);
        critical.analysis.risk_level = Some(RiskLevel::High);

        let summary = RiskAggregator::new().aggregate(&[calm.clone(), critical]);
        assert_eq!(summary.overall_severity, Severity::Critical);
        assert!(summary
            .key_findings
            .iter()
            .any(|f| f == "CRITICAL RISK: Immediate legal review strongly recommended"));

        let summary = RiskAggregator::new().aggregate(&[calm]);
        assert_eq!(summary.overall_severity, Severity::Medium);
        assert!(!summary.key_findings.iter().any(|f| f.contains("RISK:")));
    }

    #[test]
    fn test_document_contract_type() {
        let typed = |id: &str, kind: ContractType| {
            let mut c = clause(id, &[], &[]);
            c.analysis.contract_type = Some(kind);
            c
        };
        let clauses = vec![
            typed("clause-1", ContractType::General),
            typed("clause-2", ContractType::NonDisclosure),
            typed("clause-3", ContractType::Service),
            typed("clause-4", ContractType::Service),
        ];

        let summary = RiskAggregator::new().aggregate(&clauses);
        assert_eq!(summary.contract_type, Some(ContractType::Service));
        assert!(summary
            .key_findings
            .iter()
            .any(|f| f == "Detected as Service Agreement: specialized analysis applied"));

        let tie = vec![
            typed("clause-1", ContractType::NonDisclosure),
            typed("clause-2", ContractType::Employment),
        ];
        assert_eq!(
            RiskAggregator::new().aggregate(&tie).contract_type,
            Some(ContractType::NonDisclosure)
        );

        let general = vec![typed("clause-1", ContractType::General)];
        assert_eq!(RiskAggregator::new().aggregate(&general).contract_type, None);
    }

    #[test]
    fn test_quiet_contract_has_a_finding() {
        let summary = RiskAggregator::new().aggregate(&[clause("clause-1", &[], &[])]);
        assert_eq!(summary.risk_score, 1);
        assert_eq!(summary.key_findings.len(), 1);
    }
}
