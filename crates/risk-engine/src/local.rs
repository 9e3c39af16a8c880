//! Deterministic rule-based clause analysis
//!
//! The last tier of the analysis pipeline. It performs no I/O and cannot
//! fail: every phrase family that matches contributes findings, and an
//! unremarkable clause still receives the generic defaults so the five base
//! lists are never empty.

use crate::patterns::*;
use lazy_static::lazy_static;
use regex::Regex;
use shared_types::{Analysis, ContractType, PlainEnglishExplanation, RiskLevel, Severity};
use tracing::debug;

pub const MAX_AMBIGUITIES: usize = 5;
pub const MAX_RISKS: usize = 5;
pub const MAX_RECOMMENDATIONS: usize = 5;
pub const MAX_MISSING_ELEMENTS: usize = 4;
pub const MAX_DETECTED_REFERENCES: usize = 3;
pub const MAX_PROBLEMATIC_SNIPPETS: usize = 3;

/// References attached to every locally produced analysis
pub const DEFAULT_REFERENCES: &[&str] = &[
    "Restatement (Second) of Contracts",
    "Uniform Commercial Code (UCC)",
];

pub const DEFAULT_AMBIGUITY: &str =
    "Contract language could benefit from more specific definitions";
pub const DEFAULT_RISK: &str =
    "Standard legal review recommended to identify potential liabilities";
pub const DEFAULT_RECOMMENDATION: &str =
    "Consider engaging qualified legal counsel for comprehensive review";

pub const WHY_IT_MATTERS: &str = "Legal language can hide important risks and obligations. \
     This analysis helps you understand what you're agreeing to in simple terms.";
pub const NEXT_STEPS: &str = "Consider consulting with a qualified attorney for complex agreements, \
     high-value transactions, or when critical risks are identified.";

/// How a phrase family is recognized
enum Trigger {
    /// Any keyword of the family
    Any(&'static [&'static str]),
    /// At least one keyword from each group
    All(&'static [&'static [&'static str]]),
}

impl Trigger {
    fn matches(&self, text_lower: &str) -> bool {
        match self {
            Trigger::Any(keywords) => contains_any(text_lower, keywords),
            Trigger::All(groups) => contains_all_groups(text_lower, groups),
        }
    }

    /// Keyword used to locate a snippet in the original text
    fn anchor(&self, text_lower: &str) -> Option<&'static str> {
        match self {
            Trigger::Any(keywords) => first_match(text_lower, keywords),
            Trigger::All(groups) => groups.first().and_then(|g| first_match(text_lower, g)),
        }
    }
}

/// Findings contributed by one phrase family
struct PhraseRule {
    trigger: Trigger,
    ambiguity: Option<&'static str>,
    risk: Option<&'static str>,
    recommendation: Option<&'static str>,
    missing: Option<&'static str>,
    reference: Option<&'static str>,
    citation: Option<&'static str>,
}

const NO_FINDINGS: PhraseRule = PhraseRule {
    trigger: Trigger::Any(&[]),
    ambiguity: None,
    risk: None,
    recommendation: None,
    missing: None,
    reference: None,
    citation: None,
};

const PHRASE_RULES: &[PhraseRule] = &[
    PhraseRule {
        trigger: Trigger::Any(REASONABLE_KEYWORDS),
        ambiguity: Some("Term 'reasonable' is subjective and may lead to disputes over interpretation"),
        recommendation: Some("Define specific criteria, timeframes, or benchmarks for what constitutes 'reasonable'"),
        ..NO_FINDINGS
    },
    PhraseRule {
        trigger: Trigger::Any(BEST_EFFORTS_KEYWORDS),
        ambiguity: Some("'Best efforts' standard lacks clear definition and enforcement criteria"),
        recommendation: Some("Replace with 'commercially reasonable efforts' or define specific performance metrics"),
        citation: Some("Bloor Italian Gifts Ltd. v. Dixon (reasonable vs. best efforts)"),
        ..NO_FINDINGS
    },
    PhraseRule {
        trigger: Trigger::All(&[MATERIAL_KEYWORDS, MATERIAL_CONTEXT_KEYWORDS]),
        ambiguity: Some("Definition of 'material' is not specified and subject to interpretation"),
        recommendation: Some("Define materiality thresholds with specific examples or percentage/dollar amounts"),
        ..NO_FINDINGS
    },
    PhraseRule {
        trigger: Trigger::Any(CONFIDENTIALITY_KEYWORDS),
        risk: Some("Scope of confidentiality obligations may be overly broad or insufficiently defined"),
        recommendation: Some("Clearly define categories of confidential information with specific exclusions"),
        missing: Some("Confidentiality carve-outs for publicly available information"),
        ..NO_FINDINGS
    },
    PhraseRule {
        trigger: Trigger::Any(TERMINATION_KEYWORDS),
        risk: Some("Termination conditions and procedures may create enforcement difficulties"),
        recommendation: Some("Specify exact termination procedures, notice requirements, and cure periods"),
        missing: Some("Post-termination obligations and survival clauses"),
        ..NO_FINDINGS
    },
    PhraseRule {
        trigger: Trigger::Any(LIABILITY_KEYWORDS),
        risk: Some("Liability exposure may be inadequately limited or undefined"),
        recommendation: Some("Add comprehensive liability limitation and damages cap clauses"),
        reference: Some("Uniform Commercial Code provisions on consequential damages"),
        ..NO_FINDINGS
    },
    PhraseRule {
        trigger: Trigger::Any(FORCE_MAJEURE_KEYWORDS),
        ambiguity: Some("Force majeure events may not cover modern risks (e.g., cyber attacks, pandemics)"),
        recommendation: Some("Update force majeure clause to include contemporary risk factors"),
        ..NO_FINDINGS
    },
    PhraseRule {
        trigger: Trigger::Any(IP_KEYWORDS),
        risk: Some("Intellectual property ownership and licensing terms may be unclear"),
        missing: Some("IP indemnification and warranty provisions"),
        reference: Some("Copyright Act and Patent Act provisions"),
        ..NO_FINDINGS
    },
    PhraseRule {
        trigger: Trigger::Any(PAYMENT_KEYWORDS),
        ambiguity: Some("Payment terms, schedules, and late payment consequences unclear"),
        recommendation: Some("Specify exact payment amounts, due dates, and late payment penalties"),
        ..NO_FINDINGS
    },
    PhraseRule {
        trigger: Trigger::Any(DISPUTE_KEYWORDS),
        recommendation: Some("Ensure dispute resolution mechanism is enforceable in relevant jurisdictions"),
        missing: Some("Choice of law and venue provisions"),
        ..NO_FINDINGS
    },
    PhraseRule {
        trigger: Trigger::Any(OFFSHORE_KEYWORDS),
        risk: Some("Offshore jurisdiction may limit legal protections and enforcement options"),
        recommendation: Some("Consider requiring disputes be resolved in more favorable jurisdiction"),
        ..NO_FINDINGS
    },
    PhraseRule {
        trigger: Trigger::All(&[IRREVOCABLE_KEYWORDS, ASSIGNMENT_KEYWORDS]),
        risk: Some("Irrevocable assignment clauses provide no recourse for the assigning party"),
        recommendation: Some("Add limitations on scope and duration of assignments"),
        ..NO_FINDINGS
    },
    PhraseRule {
        trigger: Trigger::Any(PERPETUITY_KEYWORDS),
        risk: Some("Overly broad temporal and geographic scope may be unenforceable"),
        recommendation: Some("Limit scope to reasonable time periods and jurisdictions"),
        ..NO_FINDINGS
    },
    PhraseRule {
        trigger: Trigger::Any(AUTOMATIC_APPROVAL_KEYWORDS),
        ambiguity: Some("Automatic approval mechanisms may not provide adequate oversight"),
        recommendation: Some("Require explicit approval for important decisions"),
        ..NO_FINDINGS
    },
    PhraseRule {
        trigger: Trigger::All(&[WAIVER_KEYWORDS, OVERSIGHT_KEYWORDS]),
        risk: Some("Waiver of audit/oversight rights eliminates important protections"),
        recommendation: Some("Preserve essential audit and oversight rights"),
        ..NO_FINDINGS
    },
    PhraseRule {
        trigger: Trigger::Any(LIQUIDATED_DAMAGES_KEYWORDS),
        ambiguity: Some("Liquidated damages may be challenged if deemed punitive rather than compensatory"),
        recommendation: Some("Ensure liquidated damages reflect reasonable estimate of actual damages"),
        reference: Some("Restatement (Second) of Contracts § 356"),
        ..NO_FINDINGS
    },
    PhraseRule {
        trigger: Trigger::All(&[CLASS_ACTION_KEYWORDS, WAIVER_KEYWORDS]),
        risk: Some("Class action waivers may be unenforceable in certain jurisdictions"),
        recommendation: Some("Check enforceability under applicable state and federal law"),
        citation: Some("AT&T Mobility LLC v. Concepcion, 563 U.S. 333 (2011)"),
        ..NO_FINDINGS
    },
];

/// Standard protections reported missing when a clause never mentions them
const STANDARD_CLAUSES: &[(&[&str], &str)] = &[
    (GOVERNING_LAW_KEYWORDS, "Governing law clause"),
    (DISPUTE_RESOLUTION_KEYWORDS, "Dispute resolution mechanism"),
    (AMENDMENT_KEYWORDS, "Contract amendment procedures"),
    (INTEGRATION_KEYWORDS, "Integration/entire agreement clause"),
    (SEVERABILITY_KEYWORDS, "Severability clause"),
];

/// Vague terms, the interpretive risk each carries, and a plain restatement
const AMBIGUOUS_TERMS: &[(&str, u8, &str)] = &[
    (
        "reasonable",
        2,
        "The word \"reasonable\" means different things to different people",
    ),
    (
        "material",
        2,
        "What counts as \"material\" should be clearly defined with numbers or examples",
    ),
    (
        "best efforts",
        3,
        "\"Best efforts\" could mean unlimited obligation - very risky for you",
    ),
    (
        "timely",
        2,
        "Always use specific dates instead of vague terms like \"timely\"",
    ),
    (
        "professional manner",
        1,
        "Describe exactly what \"professional\" means in this specific context",
    ),
];

/// A high-risk construction and its severity (1..=4)
struct HighRiskPattern {
    regex: Regex,
    severity: u8,
    name: &'static str,
    plain: &'static str,
}

impl HighRiskPattern {
    fn new(pattern: &str, severity: u8, name: &'static str, plain: &'static str) -> Self {
        Self {
            regex: Regex::new(pattern).unwrap(),
            severity,
            name,
            plain,
        }
    }
}

lazy_static! {
    static ref HIGH_RISK_PATTERNS: Vec<HighRiskPattern> = vec![
        HighRiskPattern::new(
            r"(?i)unlimited liability|any and all damages|no limitation.*liability|liable.*all.*damages",
            4,
            "Unlimited liability exposure",
            "This could bankrupt you - always limit your liability exposure",
        ),
        HighRiskPattern::new(
            r"(?i)irrevocably.*assign|irrevocable.*assignment",
            3,
            "Irrevocable assignment",
            "Once you sign this, you can never get these rights back",
        ),
        HighRiskPattern::new(
            r"(?i)perpetuity|throughout.*universe|\bforever\b",
            3,
            "Unlimited duration",
            "Forever is too long - courts may not enforce overly broad terms",
        ),
        HighRiskPattern::new(
            r"(?i)cayman.*law|cayman islands",
            3,
            "Offshore jurisdiction",
            "Resolving disputes offshore may be difficult, expensive, and risky",
        ),
        HighRiskPattern::new(
            r"(?i)class action.*waiver|waiving.*class action",
            2,
            "Class action waiver",
            "You cannot join with others to sue - this may limit your legal options",
        ),
        HighRiskPattern::new(
            r"(?i)waiver.*audit|waiving.*audit",
            3,
            "Audit rights waiver",
            "You are giving up the right to check if they are following the rules",
        ),
    ];
}

/// Guess the kind of agreement from its vocabulary
pub fn detect_contract_type(text_lower: &str) -> ContractType {
    if contains_any(text_lower, EMPLOYMENT_KEYWORDS) {
        ContractType::Employment
    } else if contains_any(text_lower, SERVICE_KEYWORDS) {
        ContractType::Service
    } else if contains_any(text_lower, NON_DISCLOSURE_KEYWORDS) {
        ContractType::NonDisclosure
    } else {
        ContractType::General
    }
}

/// Review advice specific to a kind of agreement
pub fn contract_type_recommendation(kind: ContractType) -> Option<&'static str> {
    match kind {
        ContractType::Employment => Some(
            "Confirm compensation, benefits and termination terms comply with applicable employment law",
        ),
        ContractType::Service => Some(
            "Tie payment to defined deliverables and acceptance criteria in a statement of work",
        ),
        ContractType::NonDisclosure => Some(
            "Limit the confidentiality period and list the disclosures that remain permitted",
        ),
        ContractType::General => None,
    }
}

/// Four-tier severity, adding `Critical` above the risk level thresholds
pub fn severity_from_scores(severities: &[u8]) -> Severity {
    if severities.is_empty() {
        return Severity::Low;
    }

    let max = severities.iter().copied().max().unwrap_or(0);
    let avg = severities.iter().map(|&s| s as f64).sum::<f64>() / severities.len() as f64;

    if max >= 4 || avg >= 3.0 {
        Severity::Critical
    } else {
        risk_level_from_severities(severities).into()
    }
}

/// Derive a risk level from the severities of everything that matched
pub fn risk_level_from_severities(severities: &[u8]) -> RiskLevel {
    if severities.is_empty() {
        return RiskLevel::Low;
    }

    let max = severities.iter().copied().max().unwrap_or(0);
    let avg = severities.iter().map(|&s| s as f64).sum::<f64>() / severities.len() as f64;

    if max >= 3 || avg >= 2.5 {
        RiskLevel::High
    } else if max >= 2 || avg >= 1.5 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Rule-based analyzer used when no remote provider produced a result
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalAnalyzer;

impl LocalAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Analyze a clause. Always returns the base lists populated.
    pub fn analyze(&self, clause_text: &str) -> Analysis {
        let mut findings = self.detect(clause_text);

        if findings.ambiguities.is_empty() {
            findings.ambiguities.push(DEFAULT_AMBIGUITY.to_string());
        }
        if findings.risks.is_empty() {
            findings.risks.push(DEFAULT_RISK.to_string());
        }
        if findings.recommendations.is_empty() {
            findings.recommendations.push(DEFAULT_RECOMMENDATION.to_string());
        }

        findings.references.truncate(MAX_DETECTED_REFERENCES);
        for reference in DEFAULT_REFERENCES {
            push_unique(&mut findings.references, *reference);
        }

        findings
    }

    /// Rule matches only, without defaults. Used to enrich provider output.
    pub fn detect(&self, clause_text: &str) -> Analysis {
        let text_lower = clause_text.to_lowercase();
        let mut analysis = Analysis::default();
        let mut severities: Vec<u8> = Vec::new();
        let mut plain_english: Vec<String> = Vec::new();

        for (term, weight, plain) in AMBIGUOUS_TERMS {
            if text_lower.contains(term) {
                severities.push(*weight);
                plain_english.push(plain.to_string());
            }
        }

        for pattern in HIGH_RISK_PATTERNS.iter() {
            if let Some(found) = pattern.regex.find(clause_text) {
                debug!(
                    pattern = pattern.name,
                    severity = pattern.severity,
                    "High-risk construction matched"
                );
                severities.push(pattern.severity);
                plain_english.push(pattern.plain.to_string());
                if analysis.problematic_text.len() < MAX_PROBLEMATIC_SNIPPETS {
                    push_unique(
                        &mut analysis.problematic_text,
                        snippet_for_range(clause_text, found.start(), found.end()),
                    );
                }
            }
        }

        for rule in PHRASE_RULES {
            if !rule.trigger.matches(&text_lower) {
                continue;
            }

            if let Some(text) = rule.ambiguity {
                push_unique(&mut analysis.ambiguities, text);
            }
            if let Some(text) = rule.risk {
                push_unique(&mut analysis.risks, text);
            }
            if let Some(text) = rule.recommendation {
                push_unique(&mut analysis.recommendations, text);
            }
            if let Some(text) = rule.missing {
                push_unique(&mut analysis.missing_elements, text);
            }
            if let Some(text) = rule.reference {
                push_unique(&mut analysis.references, text);
            }
            if let Some(text) = rule.citation {
                push_unique(&mut analysis.citations, text);
            }

            if analysis.problematic_text.len() < MAX_PROBLEMATIC_SNIPPETS && rule.risk.is_some() {
                if let Some(snippet) = rule
                    .trigger
                    .anchor(&text_lower)
                    .and_then(|kw| extract_snippet(clause_text, kw))
                {
                    push_unique(&mut analysis.problematic_text, snippet);
                }
            }
        }

        for (keywords, label) in STANDARD_CLAUSES {
            if !contains_any(&text_lower, keywords) {
                push_unique(&mut analysis.missing_elements, *label);
            }
        }

        let contract_type = detect_contract_type(&text_lower);
        if let Some(advice) = contract_type_recommendation(contract_type) {
            // Kept inside the cap so the type-specific advice survives truncation
            let at = analysis.recommendations.len().min(MAX_RECOMMENDATIONS - 1);
            if !analysis.recommendations.iter().any(|r| r == advice) {
                analysis.recommendations.insert(at, advice.to_string());
            }
        }

        analysis.ambiguities.truncate(MAX_AMBIGUITIES);
        analysis.risks.truncate(MAX_RISKS);
        analysis.recommendations.truncate(MAX_RECOMMENDATIONS);
        analysis.missing_elements.truncate(MAX_MISSING_ELEMENTS);
        analysis.risk_level = Some(risk_level_from_severities(&severities));
        analysis.severity = Some(severity_from_scores(&severities));
        analysis.contract_type = Some(contract_type);
        analysis.plain_english_explanation = Some(PlainEnglishExplanation {
            what_this_means: plain_english,
            why_it_matters: WHY_IT_MATTERS.to_string(),
            next_steps: NEXT_STEPS.to_string(),
        });

        analysis
    }
}
