//! Text normalization applied before any heading detection
//!
//! Extracted contract text routinely carries residue from the file-format
//! layer: NUL bytes, byte-order marks, replacement characters, form feeds at
//! page breaks and long runs of empty lines. Everything downstream assumes
//! `\n` line endings and at most one blank line between blocks.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Spaces or tabs left dangling at the end of a line
    static ref TRAILING_WHITESPACE: Regex = Regex::new(r"[ \t]+\n").unwrap();

    /// Three or more newlines (two or more blank lines)
    static ref EXCESS_BLANK_LINES: Regex = Regex::new(r"\n{3,}").unwrap();
}

/// Normalize raw extracted text
pub fn normalize(text: &str) -> String {
    let unified = text.replace("\r\n", "\n");

    let printable: String = unified
        .chars()
        .filter_map(|c| match c {
            '\r' | '\u{000C}' => Some('\n'), // form feed marks a page break
            '\t' => Some(' '),
            '\n' => Some('\n'),
            '\u{FEFF}' | '\u{FFFD}' | '\u{200B}' | '\u{00AD}' => None,
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect();

    let trimmed = TRAILING_WHITESPACE.replace_all(&printable, "\n");
    let collapsed = EXCESS_BLANK_LINES.replace_all(&trimmed, "\n\n");

    collapsed.trim().to_string()
}

/// Count words made of at least two ASCII or Unicode letters
pub fn recognizable_word_count(text: &str) -> usize {
    text.split_whitespace()
        .filter(|token| token.chars().filter(|c| c.is_alphabetic()).count() >= 2)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strips_control_characters() {
        let text = "Payment\u{0000} terms\u{0007} apply\u{FFFD}.";
        assert_eq!(normalize(text), "Payment terms apply.");
    }

    #[test]
    fn test_collapses_blank_line_runs() {
        let text = "First block\n\n\n\n\nSecond block\n   \n \n\nThird block";
        assert_eq!(normalize(text), "First block\n\nSecond block\n\nThird block");
    }

    #[test]
    fn test_unifies_line_endings() {
        let text = "Line one\r\nLine two\rLine three\u{000C}Line four";
        assert_eq!(normalize(text), "Line one\nLine two\nLine three\nLine four");
    }

    #[test]
    fn test_tabs_become_spaces() {
        assert_eq!(normalize("1.\tDEFINITIONS"), "1. DEFINITIONS");
    }

    #[test]
    fn test_keeps_non_ascii_letters() {
        assert_eq!(normalize("Cláusula de rescisión"), "Cláusula de rescisión");
    }

    #[test]
    fn test_recognizable_words() {
        assert_eq!(recognizable_word_count("a an the 12 %% ok"), 3);
        assert_eq!(recognizable_word_count(""), 0);
    }
}
