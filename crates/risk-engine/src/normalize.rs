//! Conversion of provider payloads into the canonical [`Analysis`] shape
//!
//! Providers answer in one of three forms:
//!
//! - the flat shape (`ambiguities`, `risks`, `recommendations`, ...)
//! - the enhanced shape (`detailedAnalysis.{ambiguities,risks}` holding
//!   objects with an `issue`, `recommendations.{immediate,general}`,
//!   `legalReferences`)
//! - free prose, handled by [`analysis_from_free_text`]

use crate::local::{LocalAnalyzer, MAX_AMBIGUITIES, MAX_RECOMMENDATIONS, MAX_RISKS};
use crate::patterns::{
    push_unique, AMBIGUITY_SENTENCE_KEYWORDS, RECOMMENDATION_SENTENCE_KEYWORDS,
    RISK_SENTENCE_KEYWORDS,
};
use serde_json::Value;
use shared_types::{Analysis, ContractType, PlainEnglishExplanation, RiskLevel, Severity};

/// Sentences at most this long are ignored by free-text extraction
pub const MIN_SENTENCE_CHARS: usize = 20;

/// Sentences kept per category by free-text extraction
pub const MAX_SENTENCES_PER_CATEGORY: usize = 3;

pub const FREE_TEXT_MISSING_ELEMENTS: &[&str] = &[
    "Governing law clause may be missing",
    "Dispute resolution mechanism should be specified",
];

pub const FREE_TEXT_REFERENCES: &[&str] = &["Contract law fundamentals", "Industry standard practices"];

const BASE_FIELDS: &[&str] = &["ambiguities", "risks", "recommendations"];

/// Normalize a structured payload.
///
/// Strings holding JSON are parsed first. Returns `None` when the payload has
/// none of the expected fields, so the caller can treat it as malformed or as
/// free text.
pub fn analysis_from_json(payload: &Value) -> Option<Analysis> {
    match payload {
        Value::String(raw) => {
            let parsed: Value = serde_json::from_str(raw.trim()).ok()?;
            match parsed {
                Value::Object(_) => analysis_from_json(&parsed),
                _ => None,
            }
        }
        Value::Object(map) => {
            if map.contains_key("detailedAnalysis") {
                Some(from_enhanced(payload))
            } else if BASE_FIELDS.iter().any(|field| map.contains_key(*field)) {
                Some(from_flat(payload))
            } else {
                None
            }
        }
        _ => None,
    }
}

fn from_flat(payload: &Value) -> Analysis {
    Analysis {
        clause_id: String::new(),
        ambiguities: string_list(&payload["ambiguities"]),
        risks: string_list(&payload["risks"]),
        recommendations: string_list(&payload["recommendations"]),
        missing_elements: string_list(&payload["missingElements"]),
        references: string_list(&payload["references"]),
        citations: string_list(&payload["citations"]),
        problematic_text: string_list(&payload["problematicText"]),
        risk_level: payload["riskLevel"].as_str().and_then(parse_risk_level),
        severity: payload["severity"]
            .as_str()
            .or_else(|| payload["riskLevel"].as_str())
            .and_then(parse_severity),
        contract_type: payload["contractType"].as_str().and_then(ContractType::from_label),
        plain_english_explanation: plain_english(&payload["plainEnglishExplanation"]),
    }
}

fn from_enhanced(payload: &Value) -> Analysis {
    let detailed = &payload["detailedAnalysis"];

    let mut recommendations = string_list(&payload["recommendations"]["immediate"]);
    for item in string_list(&payload["recommendations"]["general"]) {
        push_unique(&mut recommendations, item);
    }
    // Per-finding recommendations are folded in after the explicit ones
    for finding in array_items(&detailed["ambiguities"]).chain(array_items(&detailed["risks"])) {
        if let Some(text) = finding["recommendation"].as_str() {
            push_unique(&mut recommendations, text);
        }
    }

    let references = if payload.get("legalReferences").is_some() {
        string_list(&payload["legalReferences"])
    } else {
        string_list(&payload["references"])
    };

    let severity_label = payload["riskLevel"]
        .as_str()
        .or_else(|| payload["severity"].as_str())
        .or_else(|| payload["summary"]["overallSeverity"].as_str())
        .or_else(|| payload["summary"]["severity"].as_str());

    let contract_type = payload["summary"]["contractType"]
        .as_str()
        .or_else(|| payload["contractType"].as_str())
        .and_then(ContractType::from_label);

    Analysis {
        clause_id: String::new(),
        ambiguities: string_list(&detailed["ambiguities"]),
        risks: string_list(&detailed["risks"]),
        recommendations,
        missing_elements: string_list(&payload["missingElements"]),
        references,
        citations: string_list(&payload["citations"]),
        problematic_text: string_list(&payload["problematicText"]),
        risk_level: severity_label.and_then(parse_risk_level),
        severity: severity_label.and_then(parse_severity),
        contract_type,
        plain_english_explanation: plain_english(&payload["plainEnglishExplanation"]),
    }
}

/// `plainEnglishExplanation` as an object, or a bare list of statements
fn plain_english(value: &Value) -> Option<PlainEnglishExplanation> {
    match value {
        Value::Object(_) => Some(PlainEnglishExplanation {
            what_this_means: string_list(&value["whatThisMeans"]),
            why_it_matters: value["whyItMatters"].as_str().unwrap_or_default().to_string(),
            next_steps: value["nextSteps"].as_str().unwrap_or_default().to_string(),
        }),
        Value::Array(_) => Some(PlainEnglishExplanation {
            what_this_means: string_list(value),
            ..Default::default()
        }),
        _ => None,
    }
}

fn array_items(value: &Value) -> impl Iterator<Item = &Value> {
    value.as_array().into_iter().flatten()
}

/// Collect a list of findings. Strings are kept as-is; objects contribute
/// their `issue` (or `description`, `text`) field. Anything else is skipped.
fn string_list(value: &Value) -> Vec<String> {
    array_items(value)
        .filter_map(|item| match item {
            Value::String(text) => Some(text.trim().to_string()),
            Value::Object(_) => ["issue", "description", "text"]
                .iter()
                .find_map(|key| item[*key].as_str())
                .map(|text| text.trim().to_string()),
            _ => None,
        })
        .filter(|text| !text.is_empty())
        .collect()
}

/// Parse a risk level label; "critical" collapses into high
pub fn parse_risk_level(label: &str) -> Option<RiskLevel> {
    parse_severity(label).map(|severity| severity.risk_level())
}

/// Parse a severity label, keeping the critical tier
pub fn parse_severity(label: &str) -> Option<Severity> {
    match label.trim().to_ascii_lowercase().as_str() {
        "low" => Some(Severity::Low),
        "medium" | "moderate" => Some(Severity::Medium),
        "high" => Some(Severity::High),
        "critical" => Some(Severity::Critical),
        _ => None,
    }
}

/// Build an analysis from model prose, enriched by local rules on the clause
pub fn analysis_from_free_text(free_text: &str, clause_text: &str) -> Analysis {
    let local = LocalAnalyzer::new().detect(clause_text);

    let mut ambiguities = local.ambiguities;
    let mut risks = local.risks;
    let mut recommendations = local.recommendations;

    for sentence in extract_sentences(free_text, AMBIGUITY_SENTENCE_KEYWORDS) {
        push_unique(&mut ambiguities, sentence);
    }
    for sentence in extract_sentences(free_text, RISK_SENTENCE_KEYWORDS) {
        push_unique(&mut risks, sentence);
    }
    for sentence in extract_sentences(free_text, RECOMMENDATION_SENTENCE_KEYWORDS) {
        push_unique(&mut recommendations, sentence);
    }

    ambiguities.truncate(MAX_AMBIGUITIES);
    risks.truncate(MAX_RISKS);
    recommendations.truncate(MAX_RECOMMENDATIONS);

    Analysis {
        clause_id: String::new(),
        ambiguities,
        risks,
        recommendations,
        missing_elements: FREE_TEXT_MISSING_ELEMENTS.iter().map(|s| s.to_string()).collect(),
        references: FREE_TEXT_REFERENCES.iter().map(|s| s.to_string()).collect(),
        citations: local.citations,
        problematic_text: local.problematic_text,
        risk_level: local.risk_level,
        severity: local.severity,
        contract_type: local.contract_type,
        plain_english_explanation: local.plain_english_explanation,
    }
}

/// Sentences (split on '.') containing any of the keywords
fn extract_sentences(text: &str, keywords: &[&str]) -> Vec<String> {
    text.split('.')
        .map(str::trim)
        .filter(|sentence| sentence.chars().count() > MIN_SENTENCE_CHARS)
        .filter(|sentence| {
            let lower = sentence.to_lowercase();
            keywords.iter().any(|kw| lower.contains(kw))
        })
        .take(MAX_SENTENCES_PER_CATEGORY)
        .map(str::to_string)
        .collect()
}
