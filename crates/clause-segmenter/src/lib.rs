//! Clause segmentation for unstructured contract text
//!
//! Turns raw extracted text into an ordered list of [`Clause`]s using a
//! cascade of heading strategies:
//!
//! 1. Normalize the text (control characters, line endings, blank lines)
//! 2. Try each [`HeadingStrategy`] in [`CASCADE`] order and keep the first
//!    one producing at least `min_clauses` valid clauses
//! 3. Otherwise split on blank-line paragraphs longer than 100 characters
//! 4. Otherwise return the whole document as a single clause
//!
//! Segmentation never fails. Input without enough readable content produces a
//! single sentinel clause (`error-short` / `error-empty`) instead.

pub mod normalize;
pub mod strategy;
pub mod title;
pub mod validity;

use serde::Serialize;
use shared_types::Clause;
use tracing::{debug, info};

pub use normalize::normalize;
pub use strategy::{HeadingStrategy, Section, CASCADE};
pub use title::extract_title;
pub use validity::{check_clause, is_valid_clause, InvalidReason};

/// Segmenter thresholds
#[derive(Debug, Clone)]
pub struct SegmenterConfig {
    /// A heading strategy must produce at least this many valid clauses
    pub min_clauses: usize,
    /// Paragraph fallback keeps only paragraphs longer than this
    pub min_paragraph_chars: usize,
    /// Input shorter than this (after normalization) is rejected
    pub min_document_chars: usize,
    /// Input with fewer recognizable words than this is rejected
    pub min_document_words: usize,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            min_clauses: 3,
            min_paragraph_chars: 100,
            min_document_chars: 50,
            min_document_words: 10,
        }
    }
}

/// Why the input could not be segmented at all
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputRejection {
    Empty,
    TooShort,
}

impl InputRejection {
    /// The placeholder clause reported in place of real clauses
    pub fn sentinel_clause(&self) -> Clause {
        match self {
            InputRejection::Empty => Clause::new(
                "error-empty",
                Some("Empty Document".to_string()),
                "The document contains no readable text. Please upload a text-based contract.",
            ),
            InputRejection::TooShort => Clause::new(
                "error-short",
                Some("Insufficient Content".to_string()),
                "The document does not contain enough readable text to identify contract clauses. \
                 Please upload a complete contract with at least a few sentences of content.",
            ),
        }
    }
}

/// Which branch of the cascade produced the clauses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "strategy", rename_all = "snake_case")]
pub enum SegmentOutcome {
    Heading(HeadingStrategy),
    Paragraphs,
    FullDocument,
    Rejected(InputRejection),
}

/// Clauses plus the branch that produced them
#[derive(Debug, Clone)]
pub struct Segmentation {
    pub clauses: Vec<Clause>,
    pub outcome: SegmentOutcome,
}

impl Segmentation {
    pub fn is_rejected(&self) -> bool {
        matches!(self.outcome, SegmentOutcome::Rejected(_))
    }
}

/// Cascading heuristic segmenter
#[derive(Debug, Clone, Default)]
pub struct TextSegmenter {
    config: SegmenterConfig,
}

impl TextSegmenter {
    pub fn new(config: SegmenterConfig) -> Self {
        Self { config }
    }

    /// Segment text into clauses; never empty
    pub fn segment(&self, text: &str) -> Vec<Clause> {
        self.segment_detailed(text).clauses
    }

    /// Segment text and report which strategy was used
    pub fn segment_detailed(&self, text: &str) -> Segmentation {
        let normalized = normalize(text);

        if let Some(rejection) = self.check_input(&normalized) {
            info!(?rejection, chars = normalized.len(), "Rejecting input for segmentation");
            return Segmentation {
                clauses: vec![rejection.sentinel_clause()],
                outcome: SegmentOutcome::Rejected(rejection),
            };
        }

        for strategy in CASCADE {
            if let Some(sections) = self.try_strategy(strategy, &normalized) {
                info!(
                    strategy = strategy.name(),
                    clauses = sections.len(),
                    "Segmented document by headings"
                );
                return Segmentation {
                    clauses: build_clauses(sections),
                    outcome: SegmentOutcome::Heading(strategy),
                };
            }
        }

        let paragraphs = self.split_paragraphs(&normalized);
        if !paragraphs.is_empty() {
            info!(clauses = paragraphs.len(), "Segmented document by paragraphs");
            return Segmentation {
                clauses: build_clauses(paragraphs),
                outcome: SegmentOutcome::Paragraphs,
            };
        }

        info!("No structure found, using the full document as one clause");
        Segmentation {
            clauses: vec![Clause::new(
                clause_id(0),
                Some("Full Document".to_string()),
                normalized,
            )],
            outcome: SegmentOutcome::FullDocument,
        }
    }

    fn check_input(&self, normalized: &str) -> Option<InputRejection> {
        if normalized.is_empty() {
            return Some(InputRejection::Empty);
        }

        let too_few_chars = normalized.chars().count() < self.config.min_document_chars;
        let too_few_words =
            normalize::recognizable_word_count(normalized) < self.config.min_document_words;

        if too_few_chars || too_few_words {
            return Some(InputRejection::TooShort);
        }

        None
    }

    fn try_strategy(&self, strategy: HeadingStrategy, text: &str) -> Option<Vec<Section>> {
        let proposed = strategy.propose(text)?;
        let proposed_count = proposed.len();

        let valid: Vec<Section> = proposed
            .into_iter()
            .filter(|section| match check_clause(&section.text()) {
                Ok(()) => true,
                Err(reason) => {
                    debug!(
                        strategy = strategy.name(),
                        heading = %section.heading,
                        ?reason,
                        "Dropping candidate clause"
                    );
                    false
                }
            })
            .collect();

        debug!(
            strategy = strategy.name(),
            proposed = proposed_count,
            valid = valid.len(),
            "Strategy evaluated"
        );

        if valid.len() >= self.config.min_clauses {
            Some(valid)
        } else {
            None
        }
    }

    fn split_paragraphs(&self, text: &str) -> Vec<Section> {
        text.split("\n\n")
            .map(str::trim)
            .filter(|paragraph| paragraph.chars().count() > self.config.min_paragraph_chars)
            .filter(|paragraph| is_valid_clause(paragraph))
            .map(|paragraph| {
                let (first_line, rest) = paragraph.split_once('\n').unwrap_or((paragraph, ""));
                Section {
                    heading: first_line.trim().to_string(),
                    body: rest.trim().to_string(),
                }
            })
            .collect()
    }
}

fn clause_id(index: usize) -> String {
    format!("clause-{}", index + 1)
}

fn build_clauses(sections: Vec<Section>) -> Vec<Clause> {
    sections
        .into_iter()
        .enumerate()
        .map(|(index, section)| {
            let title = extract_title(&section.heading, &section.body);
            Clause::new(clause_id(index), Some(title), section.text())
        })
        .collect()
}
