//! Legal phrase families and text matching helpers

/// Subjective standards that invite disputes
pub const REASONABLE_KEYWORDS: &[&str] = &["reasonable"];

pub const BEST_EFFORTS_KEYWORDS: &[&str] = &["best efforts", "best endeavors", "best endeavours"];

pub const MATERIAL_KEYWORDS: &[&str] = &["material"];

/// Context that makes "material" a threshold question
pub const MATERIAL_CONTEXT_KEYWORDS: &[&str] = &["breach", "change"];

pub const CONFIDENTIALITY_KEYWORDS: &[&str] = &["confidential"];

pub const TERMINATION_KEYWORDS: &[&str] = &["terminate", "termination"];

pub const LIABILITY_KEYWORDS: &[&str] = &["liability", "damages"];

pub const FORCE_MAJEURE_KEYWORDS: &[&str] = &["force majeure", "act of god"];

/// "ip" is matched as a whole word only
pub const IP_KEYWORDS: &[&str] = &["intellectual property", "ip"];

pub const PAYMENT_KEYWORDS: &[&str] = &["payment", "fee"];

pub const DISPUTE_KEYWORDS: &[&str] = &["dispute", "arbitration"];

pub const OFFSHORE_KEYWORDS: &[&str] = &["cayman", "offshore"];

pub const IRREVOCABLE_KEYWORDS: &[&str] = &["irrevocably", "irrevocable"];

pub const ASSIGNMENT_KEYWORDS: &[&str] = &["assign"];

pub const PERPETUITY_KEYWORDS: &[&str] = &["perpetuity", "throughout the universe"];

pub const AUTOMATIC_APPROVAL_KEYWORDS: &[&str] = &["deemed granted", "deemed approved", "automatically"];

pub const WAIVER_KEYWORDS: &[&str] = &["waiver", "waive", "waiving"];

pub const OVERSIGHT_KEYWORDS: &[&str] = &["audit", "oversight"];

pub const LIQUIDATED_DAMAGES_KEYWORDS: &[&str] = &["liquidated damages"];

pub const CLASS_ACTION_KEYWORDS: &[&str] = &["class action"];

/// Standard protections every contract is expected to carry somewhere
pub const GOVERNING_LAW_KEYWORDS: &[&str] = &["governing law", "applicable law", "governed by"];
pub const DISPUTE_RESOLUTION_KEYWORDS: &[&str] = &["dispute", "arbitration", "litigation"];
pub const AMENDMENT_KEYWORDS: &[&str] = &["amendment", "modification", "amend"];
pub const INTEGRATION_KEYWORDS: &[&str] = &["entire agreement", "integration"];
pub const SEVERABILITY_KEYWORDS: &[&str] = &["severability", "severable"];

/// Vocabulary that marks the kind of agreement, checked in this order
pub const EMPLOYMENT_KEYWORDS: &[&str] = &["employment", "employee", "employer", "salary", "benefits"];
pub const SERVICE_KEYWORDS: &[&str] = &["service", "contractor", "deliverable", "statement of work"];
pub const NON_DISCLOSURE_KEYWORDS: &[&str] = &["confidential", "non-disclosure", "proprietary"];

/// Keywords used to pick sentences out of free-text model output
pub const AMBIGUITY_SENTENCE_KEYWORDS: &[&str] = &["ambiguous", "unclear", "vague", "indefinite"];
pub const RISK_SENTENCE_KEYWORDS: &[&str] = &["risk", "liability", "danger", "concern", "problem"];
pub const RECOMMENDATION_SENTENCE_KEYWORDS: &[&str] =
    &["recommend", "suggest", "should", "must", "need"];

/// Keywords shorter than this are matched as whole words
const WHOLE_WORD_MAX_LEN: usize = 2;

/// Characters of context kept on each side of a snippet match
const SNIPPET_CONTEXT_CHARS: usize = 50;

/// Check for a keyword in already-lowercased text
pub fn contains_keyword(text_lower: &str, keyword: &str) -> bool {
    if keyword.len() > WHOLE_WORD_MAX_LEN {
        return text_lower.contains(keyword);
    }

    text_lower.match_indices(keyword).any(|(start, matched)| {
        let before = text_lower[..start].chars().next_back();
        let after = text_lower[start + matched.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

/// Check whether any keyword of a family occurs in already-lowercased text
pub fn contains_any(text_lower: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| contains_keyword(text_lower, kw))
}

/// First keyword of a family found in already-lowercased text
pub fn first_match<'a>(text_lower: &str, keywords: &[&'a str]) -> Option<&'a str> {
    keywords
        .iter()
        .copied()
        .find(|kw| contains_keyword(text_lower, kw))
}

/// Check if text contains keywords from every group
pub fn contains_all_groups(text_lower: &str, keyword_groups: &[&[&str]]) -> bool {
    keyword_groups
        .iter()
        .all(|group| contains_any(text_lower, group))
}

/// Extract a snippet around the first case-insensitive occurrence of `keyword`
pub fn extract_snippet(text: &str, keyword: &str) -> Option<String> {
    let text_lower = text.to_lowercase();
    let keyword_lower = keyword.to_lowercase();

    // Lowercasing may change byte lengths outside ASCII; map through char offsets
    let char_pos = text_lower
        .find(&keyword_lower)
        .map(|byte_pos| text_lower[..byte_pos].chars().count())?;
    let keyword_chars = keyword_lower.chars().count();

    Some(snippet_around(text, char_pos, keyword_chars))
}

/// Snippet around a byte range of `text`, such as a regex match
pub fn snippet_for_range(text: &str, start: usize, end: usize) -> String {
    let char_start = text[..start].chars().count();
    let char_len = text[start..end].chars().count();
    snippet_around(text, char_start, char_len)
}

fn snippet_around(text: &str, char_start: usize, char_len: usize) -> String {
    let total = text.chars().count();
    let to = (char_start + char_len + SNIPPET_CONTEXT_CHARS).min(total);
    let from = char_start.saturating_sub(SNIPPET_CONTEXT_CHARS).min(to);

    let snippet: String = text.chars().skip(from).take(to - from).collect();
    let snippet = snippet.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut out = String::new();
    if from > 0 {
        out.push_str("...");
    }
    out.push_str(&snippet);
    if to < total {
        out.push_str("...");
    }
    out
}

/// Push a value unless an identical one is already present
pub fn push_unique(list: &mut Vec<String>, value: impl Into<String>) {
    let value = value.into();
    if !list.contains(&value) {
        list.push(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_short_keywords_need_word_boundaries() {
        assert!(contains_keyword("all ip created hereunder", "ip"));
        assert!(contains_keyword("ownership of ip.", "ip"));
        assert!(!contains_keyword("the relationship ends", "ip"));
        assert!(!contains_keyword("shipping costs", "ip"));
    }

    #[test]
    fn test_long_keywords_match_substrings() {
        assert!(contains_keyword("termination fees apply", "fee"));
        assert!(contains_keyword("either party may terminate", "terminate"));
    }

    #[test]
    fn test_contains_all_groups() {
        let text = "tenant waives audit rights";
        assert!(contains_all_groups(text, &[WAIVER_KEYWORDS, OVERSIGHT_KEYWORDS]));
        assert!(!contains_all_groups(text, &[WAIVER_KEYWORDS, CLASS_ACTION_KEYWORDS]));
    }

    #[test]
    fn test_snippet_has_ellipses_when_trimmed() {
        let text = format!("{} best efforts {}", "x".repeat(80), "y".repeat(80));
        let snippet = extract_snippet(&text, "BEST EFFORTS").unwrap();

        assert!(snippet.starts_with("..."));
        assert!(snippet.ends_with("..."));
        assert!(snippet.contains("best efforts"));
    }

    #[test]
    fn test_snippet_of_short_text_is_whole_text() {
        assert_eq!(
            extract_snippet("Fees are   due monthly.", "fees"),
            Some("Fees are due monthly.".to_string())
        );
        assert_eq!(extract_snippet("nothing here", "fees"), None);
    }

    #[test]
    fn test_snippet_is_safe_on_multibyte_text() {
        let text = "Die Vertragsstrafe für Verzögerungen beträgt 5 %, liquidated damages gelten.";
        let snippet = extract_snippet(text, "liquidated damages").unwrap();
        assert!(snippet.contains("liquidated damages"));
    }

    #[test]
    fn test_push_unique() {
        let mut list = vec!["a".to_string()];
        push_unique(&mut list, "a");
        push_unique(&mut list, "b");
        assert_eq!(list, vec!["a", "b"]);
    }
}
