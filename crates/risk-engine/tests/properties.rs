use proptest::prelude::*;
use risk_engine::{
    analysis_from_free_text, risk_score, Analysis, AnalyzedClause, LocalAnalyzer, RiskAggregator,
    DEFAULT_REFERENCES,
};

fn analyzed_clause() -> impl Strategy<Value = AnalyzedClause> {
    (
        prop::collection::vec("[a-z ]{0,30}", 0..6),
        prop::collection::vec("[a-z ]{0,30}", 0..6),
        prop::collection::vec("[a-z ]{0,30}", 0..4),
    )
        .prop_map(|(risks, ambiguities, recommendations)| AnalyzedClause {
            clause_id: "clause".to_string(),
            clause_title: None,
            analysis: Analysis {
                risks,
                ambiguities,
                recommendations,
                ..Default::default()
            },
        })
}

proptest! {
    #[test]
    fn local_analysis_always_has_base_fields(text in "\\PC{0,400}") {
        let analysis = LocalAnalyzer::new().analyze(&text);
        prop_assert!(!analysis.ambiguities.is_empty());
        prop_assert!(!analysis.risks.is_empty());
        prop_assert!(!analysis.recommendations.is_empty());
        for reference in DEFAULT_REFERENCES {
            prop_assert!(analysis.references.iter().any(|r| r == reference));
        }
    }

    #[test]
    fn local_severity_agrees_with_risk_level(text in "\\PC{0,400}") {
        let analysis = LocalAnalyzer::new().analyze(&text);
        let severity = analysis.severity.unwrap();
        prop_assert_eq!(Some(severity.risk_level()), analysis.risk_level);
        prop_assert!(analysis.contract_type.is_some());
    }

    #[test]
    fn risk_score_in_range(clauses in prop::collection::vec(analyzed_clause(), 1..25)) {
        let score = risk_score(&clauses);
        prop_assert!((1..=10).contains(&score));
    }

    #[test]
    fn summary_lists_are_bounded(clauses in prop::collection::vec(analyzed_clause(), 0..25)) {
        let summary = RiskAggregator::new().aggregate(&clauses);
        prop_assert!((1..=10).contains(&summary.risk_score));
        prop_assert!(summary.ambiguous_terms.len() <= 8);
        prop_assert!(summary.unfair_clauses.len() <= 5);
        prop_assert!(summary.missing_clauses.len() <= 6);
        prop_assert!(summary.actionable_suggestions.len() <= 8);
        prop_assert!(summary.problematic_clauses.len() <= 5);
        prop_assert!(summary.key_findings.len() <= 6);
    }

    #[test]
    fn free_text_never_panics(prose in "\\PC{0,300}", clause in "\\PC{0,200}") {
        let analysis = analysis_from_free_text(&prose, &clause);
        prop_assert!(analysis.risks.len() <= 5);
    }
}
