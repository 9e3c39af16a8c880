//! Validity heuristic for candidate clauses
//!
//! Structure detection happily matches page headers, table fragments and
//! binary residue that survived normalization. A candidate only counts as a
//! clause when it reads like prose.

/// Minimum clause length in characters
pub const MIN_CLAUSE_CHARS: usize = 20;

/// Minimum number of alphabetic words of three or more letters
pub const MIN_ALPHABETIC_WORDS: usize = 5;

/// Minimum share of readable characters
pub const MIN_READABLE_RATIO: f64 = 0.7;

/// At least one of these must appear for text to count as a sentence
pub const FUNCTION_WORDS: &[&str] = &[
    "the", "a", "an", "in", "of", "to", "for", "with", "by", "on", "at", "shall", "will", "may",
    "must",
];

const READABLE_PUNCTUATION: &str = ".,;:'\"()[]-!?$%&/@#*+=§–—‘’“”";

/// Why a candidate clause was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    TooShort,
    TooFewWords,
    Unreadable,
    NoFunctionWords,
}

/// Check a candidate clause, returning the first failed criterion
pub fn check_clause(text: &str) -> Result<(), InvalidReason> {
    let trimmed = text.trim();
    let total_chars = trimmed.chars().count();

    if total_chars < MIN_CLAUSE_CHARS {
        return Err(InvalidReason::TooShort);
    }

    if alphabetic_word_count(trimmed) < MIN_ALPHABETIC_WORDS {
        return Err(InvalidReason::TooFewWords);
    }

    if readable_ratio(trimmed) < MIN_READABLE_RATIO {
        return Err(InvalidReason::Unreadable);
    }

    if !has_function_word(trimmed) {
        return Err(InvalidReason::NoFunctionWords);
    }

    Ok(())
}

pub fn is_valid_clause(text: &str) -> bool {
    check_clause(text).is_ok()
}

/// Words made only of letters (after trimming punctuation) with 3+ letters
fn alphabetic_word_count(text: &str) -> usize {
    text.split_whitespace()
        .map(|token| token.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|word| word.chars().count() >= 3 && word.chars().all(|c| c.is_alphabetic()))
        .count()
}

fn readable_ratio(text: &str) -> f64 {
    let total = text.chars().count();
    if total == 0 {
        return 0.0;
    }

    let readable = text
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || READABLE_PUNCTUATION.contains(*c))
        .count();

    readable as f64 / total as f64
}

fn has_function_word(text: &str) -> bool {
    text.split_whitespace()
        .map(|token| {
            token
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .any(|word| FUNCTION_WORDS.contains(&word.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_ordinary_clause() {
        let text = "The Supplier shall deliver the goods to the Buyer within ten days.";
        assert!(is_valid_clause(text));
    }

    #[test]
    fn test_rejects_short_text() {
        assert_eq!(check_clause("Page 3 of 12"), Err(InvalidReason::TooShort));
    }

    #[test]
    fn test_rejects_numeric_table_rows() {
        let text = "12.50  13.75  14.00  15.25  16.50  17.75  18.00";
        assert_eq!(check_clause(text), Err(InvalidReason::TooFewWords));
    }

    #[test]
    fn test_rejects_binary_residue() {
        let text = "obj stream endobj xref trailer ¤¤¤¤¤¤¤¤¤¤¤¤¤¤¤¤¤¤¤¤¤¤¤¤¤¤¤¤¤¤¤¤";
        assert_eq!(check_clause(text), Err(InvalidReason::Unreadable));
    }

    #[test]
    fn test_rejects_text_without_function_words() {
        let text = "CONFIDENTIAL DRAFT PRIVILEGED COMMUNICATION ATTORNEY WORK PRODUCT";
        assert_eq!(check_clause(text), Err(InvalidReason::NoFunctionWords));
    }

    #[test]
    fn test_function_words_ignore_punctuation_and_case() {
        assert!(has_function_word("Notices SHALL, be given"));
        assert!(!has_function_word("Notices given promptly"));
    }
}
