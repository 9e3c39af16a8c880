//! Heading detection strategies
//!
//! Each strategy recognizes one heading style and splits the document at
//! every heading of that style. Strategies are tried in [`CASCADE`] order;
//! the segmenter keeps the first one that yields enough valid clauses.

use lazy_static::lazy_static;
use regex::{Match, Regex};
use serde::Serialize;

lazy_static! {
    /// "Section 4", "ARTICLE IV", "Clause 2.1:", "Section B."
    static ref SECTION_MARKER_HEADING: Regex = Regex::new(
        r"(?mi)^[ \t]*(?:section|article|clause)[ \t]+(?:\d+(?:\.\d+)*|[ivxlc]+|[a-z])\b[^\n]*$"
    )
    .unwrap();

    /// "1. DEFINITIONS" (top level only; "1.1 Scope" is part of the body)
    static ref NUMBERED_HEADING: Regex =
        Regex::new(r"(?m)^[ \t]*\d{1,3}[.)][ \t]+\S[^\n]*$").unwrap();

    /// "IV. PAYMENT", "II) Term"
    static ref ROMAN_HEADING: Regex =
        Regex::new(r"(?m)^[ \t]*[IVXLC]{1,7}[.)][ \t]+\S[^\n]*$").unwrap();

    /// "A. Scope", "(B) Fees"
    static ref LETTERED_HEADING: Regex =
        Regex::new(r"(?m)^[ \t]*\(?[A-Z][.)][ \t]+\S[^\n]*$").unwrap();

    /// A line of capitals standing alone: "LIMITATION OF LIABILITY"
    static ref ALL_CAPS_HEADING: Regex =
        Regex::new(r"(?m)^[ \t]*[A-Z][A-Z0-9 &,'/\-]{3,78}[.:]?[ \t]*$").unwrap();
}

/// Minimum letters an ALL-CAPS line needs to count as a heading
const MIN_ALL_CAPS_LETTERS: usize = 4;

/// Heading styles, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingStrategy {
    SectionMarker,
    Numbered,
    RomanNumeral,
    Lettered,
    AllCaps,
}

/// The order in which strategies are attempted
pub const CASCADE: [HeadingStrategy; 5] = [
    HeadingStrategy::SectionMarker,
    HeadingStrategy::Numbered,
    HeadingStrategy::RomanNumeral,
    HeadingStrategy::Lettered,
    HeadingStrategy::AllCaps,
];

/// A proposed clause: the heading line and the text up to the next heading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub heading: String,
    pub body: String,
}

impl Section {
    /// Full clause text, heading included
    pub fn text(&self) -> String {
        if self.body.is_empty() {
            self.heading.clone()
        } else {
            format!("{}\n{}", self.heading, self.body)
        }
    }
}

impl HeadingStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            HeadingStrategy::SectionMarker => "section_marker",
            HeadingStrategy::Numbered => "numbered",
            HeadingStrategy::RomanNumeral => "roman_numeral",
            HeadingStrategy::Lettered => "lettered",
            HeadingStrategy::AllCaps => "all_caps",
        }
    }

    fn pattern(&self) -> &'static Regex {
        match self {
            HeadingStrategy::SectionMarker => &SECTION_MARKER_HEADING,
            HeadingStrategy::Numbered => &NUMBERED_HEADING,
            HeadingStrategy::RomanNumeral => &ROMAN_HEADING,
            HeadingStrategy::Lettered => &LETTERED_HEADING,
            HeadingStrategy::AllCaps => &ALL_CAPS_HEADING,
        }
    }

    fn accepts(&self, heading: &Match<'_>) -> bool {
        match self {
            HeadingStrategy::AllCaps => {
                heading
                    .as_str()
                    .chars()
                    .filter(|c| c.is_ascii_uppercase())
                    .count()
                    >= MIN_ALL_CAPS_LETTERS
            }
            _ => true,
        }
    }

    /// Split `text` at every heading of this style.
    ///
    /// Returns `None` when the style does not occur at all. Text before the
    /// first heading (title block, recitals) is not part of any section.
    pub fn propose(&self, text: &str) -> Option<Vec<Section>> {
        let headings: Vec<Match<'_>> = self
            .pattern()
            .find_iter(text)
            .filter(|m| self.accepts(m))
            .collect();

        if headings.is_empty() {
            return None;
        }

        let sections = headings
            .iter()
            .enumerate()
            .map(|(i, heading)| {
                let body_end = headings
                    .get(i + 1)
                    .map(|next| next.start())
                    .unwrap_or(text.len());

                Section {
                    heading: heading.as_str().trim().to_string(),
                    body: text[heading.end()..body_end].trim().to_string(),
                }
            })
            .collect();

        Some(sections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_numbered_headings_ignore_subsections() {
        let text = "1. SCOPE\nText about scope.\n1.1 Detail line.\n2. FEES\nText about fees.";
        let sections = HeadingStrategy::Numbered.propose(text).unwrap();

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].heading, "1. SCOPE");
        assert_eq!(sections[0].body, "Text about scope.\n1.1 Detail line.");
        assert_eq!(sections[1].heading, "2. FEES");
        assert_eq!(sections[1].body, "Text about fees.");
    }

    #[test]
    fn test_section_marker_is_case_insensitive() {
        let text = "SECTION 1 - Scope\nbody one\nArticle II Payment\nbody two\nclause 3: Term\nbody three";
        let sections = HeadingStrategy::SectionMarker.propose(text).unwrap();

        assert_eq!(sections.len(), 3);
        assert_eq!(sections[1].heading, "Article II Payment");
        assert_eq!(sections[2].body, "body three");
    }

    #[test]
    fn test_roman_headings() {
        let text = "I. PARTIES\nThe parties are named.\nII. TERM\nThe term is one year.";
        let sections = HeadingStrategy::RomanNumeral.propose(text).unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[1].heading, "II. TERM");
    }

    #[test]
    fn test_lettered_headings() {
        let text = "A. Scope\nScope text.\n(B) Fees\nFee text.";
        let sections = HeadingStrategy::Lettered.propose(text).unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[1].heading, "(B) Fees");
    }

    #[test]
    fn test_all_caps_requires_enough_letters() {
        let text = "NDA\nshort line\nGOVERNING LAW\nThis Agreement is governed by the laws of Delaware.";
        let sections = HeadingStrategy::AllCaps.propose(text).unwrap();

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].heading, "GOVERNING LAW");
    }

    #[test]
    fn test_absent_style_yields_none() {
        let text = "Plain prose without any headings at all.";
        assert!(HeadingStrategy::SectionMarker.propose(text).is_none());
        assert!(HeadingStrategy::Numbered.propose(text).is_none());
    }

    #[test]
    fn test_section_text_includes_heading() {
        let section = Section {
            heading: "1. TERM".to_string(),
            body: "One year.".to_string(),
        };
        assert_eq!(section.text(), "1. TERM\nOne year.");
    }
}
