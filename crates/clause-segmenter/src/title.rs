//! Title extraction for accepted clauses
//!
//! Marker stripping is deliberately narrow: only the `Section`/`Article`/
//! `Clause` keyword and one ordinal token are removed. An ALL-CAPS title such
//! as `DEFINITIONS` must come out whole, never as `EFINITIONS`.

use lazy_static::lazy_static;
use regex::Regex;

/// Titles shorter than this fall back to the opening words of the body
pub const MIN_TITLE_CHARS: usize = 5;

/// Titles longer than this are cut down to their opening words
pub const MAX_TITLE_CHARS: usize = 80;

/// Number of words used for a fallback title
pub const FALLBACK_TITLE_WORDS: usize = 8;

lazy_static! {
    static ref SECTION_KEYWORD: Regex =
        Regex::new(r"(?i)^(?:section|article|clause)\s+").unwrap();

    /// Ordinal following a section keyword: "4", "4.2", "IV", "iv", "B"
    static ref KEYWORD_ORDINAL: Regex =
        Regex::new(r"^(?:\d+(?:\.\d+)*\.?|[IVXLC]+\b[.):]?|[ivxlc]+\b[.):]?|[A-Za-z]\b[.):]?)")
            .unwrap();

    /// Ordinal opening a bare heading: "1.", "2)", "1.1", "IV.", "(b)", "C."
    static ref BARE_ORDINAL: Regex = Regex::new(
        r"^(?:\(?\d+(?:\.\d+)+\.?|\(?\d+[.)]|\(?[IVXLC]+[.)]|\(?[A-Za-z][.)])(?:\s+|$)"
    )
    .unwrap();

    static ref LEADING_SEPARATORS: Regex = Regex::new(r"^[\s.:)\-–—]+").unwrap();
}

/// Extract a display title from a heading, falling back to the body text
pub fn extract_title(heading: &str, body: &str) -> String {
    let first_line = heading
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("");

    let stripped = strip_marker(first_line);
    let candidate = stripped.trim_end_matches([':', '.', ' ']).trim();

    if !is_plausible(candidate) {
        return title_from_words(body);
    }

    if candidate.chars().count() > MAX_TITLE_CHARS {
        return title_from_words(candidate);
    }

    candidate.to_string()
}

/// Remove a leading section keyword and/or ordinal marker, nothing more
pub fn strip_marker(line: &str) -> &str {
    let line = line.trim();

    let rest = if let Some(keyword) = SECTION_KEYWORD.find(line) {
        let after_keyword = &line[keyword.end()..];
        match KEYWORD_ORDINAL.find(after_keyword) {
            Some(ordinal) => &after_keyword[ordinal.end()..],
            None => after_keyword,
        }
    } else if let Some(ordinal) = BARE_ORDINAL.find(line) {
        &line[ordinal.end()..]
    } else {
        return line;
    };

    match LEADING_SEPARATORS.find(rest) {
        Some(separators) => &rest[separators.end()..],
        None => rest,
    }
}

fn is_plausible(title: &str) -> bool {
    if title.chars().count() < MIN_TITLE_CHARS {
        return false;
    }

    match title.chars().next() {
        Some(first) => first.is_uppercase() || first.is_numeric() || first == '"',
        None => false,
    }
}

/// First few words of a text, with an ellipsis when truncated
pub fn title_from_words(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();

    if words.is_empty() {
        return "Untitled Clause".to_string();
    }

    let mut title = words
        .iter()
        .take(FALLBACK_TITLE_WORDS)
        .copied()
        .collect::<Vec<_>>()
        .join(" ");

    if words.len() > FALLBACK_TITLE_WORDS {
        title.push_str("...");
    }

    title
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_numbered_heading_keeps_full_title() {
        assert_eq!(extract_title("1. DEFINITIONS", ""), "DEFINITIONS");
        assert_eq!(extract_title("2. PAYMENT TERMS", ""), "PAYMENT TERMS");
        assert_eq!(extract_title("12) Governing Law", ""), "Governing Law");
    }

    #[test]
    fn test_all_caps_heading_is_never_truncated() {
        assert_eq!(extract_title("CONFIDENTIALITY", ""), "CONFIDENTIALITY");
        assert_eq!(extract_title("INDEMNIFICATION", ""), "INDEMNIFICATION");
        assert_eq!(extract_title("DEFINITIONS", ""), "DEFINITIONS");
    }

    #[test]
    fn test_section_keyword_and_ordinal_removed() {
        assert_eq!(extract_title("Section 4.2: Scope of Work", ""), "Scope of Work");
        assert_eq!(extract_title("ARTICLE IV - PAYMENT", ""), "PAYMENT");
        assert_eq!(extract_title("Article I Introduction", ""), "Introduction");
        assert_eq!(extract_title("Clause B. Warranties", ""), "Warranties");
    }

    #[test]
    fn test_roman_and_letter_markers() {
        assert_eq!(extract_title("IV. Representations", ""), "Representations");
        assert_eq!(extract_title("(b) Assignment Rights", ""), "Assignment Rights");
        assert_eq!(extract_title("C. Limitation of Liability", ""), "Limitation of Liability");
    }

    #[test]
    fn test_words_starting_with_roman_letters_are_kept() {
        assert_eq!(extract_title("CIVIL PROCEDURE", ""), "CIVIL PROCEDURE");
        assert_eq!(extract_title("Section 3 Civil Remedies", ""), "Civil Remedies");
    }

    #[test]
    fn test_short_title_falls_back_to_body() {
        let body = "The Client shall pay the fees set out in Schedule B within thirty days.";
        assert_eq!(
            extract_title("Section 2: FEES", body),
            "The Client shall pay the fees set out..."
        );
    }

    #[test]
    fn test_lowercase_artifact_falls_back_to_body() {
        let body = "Either party may terminate this Agreement.";
        assert_eq!(extract_title("3. efinitions", body), body);
    }

    #[test]
    fn test_long_inline_heading_is_shortened() {
        let heading = "1. The Contractor shall perform the services described in Schedule A with due care and skill at all times";
        assert_eq!(
            extract_title(heading, ""),
            "The Contractor shall perform the services described in..."
        );
    }

    #[test]
    fn test_empty_everything() {
        assert_eq!(extract_title("", ""), "Untitled Clause");
    }
}
