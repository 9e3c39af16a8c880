//! Property tests for the segmenter: it never fails, never returns nothing,
//! and always produces well-formed ids.

use clause_segmenter::{normalize, TextSegmenter};
use proptest::prelude::*;

const SENTENCES: &[&str] = &[
    "The Supplier shall deliver the goods to the Buyer within ten business days.",
    "Either party may terminate this Agreement upon thirty days written notice.",
    "The Client will reimburse reasonable expenses incurred by the Consultant.",
    "All intellectual property created under this Agreement belongs to the Company.",
    "Neither party shall be liable for indirect or consequential damages of any kind.",
];

const HEADINGS: &[&str] = &[
    "DEFINITIONS",
    "PAYMENT TERMS",
    "TERMINATION",
    "CONFIDENTIALITY",
    "GOVERNING LAW",
    "INDEMNIFICATION",
];

fn numbered_contract() -> impl Strategy<Value = (usize, String)> {
    (3usize..=6, 1usize..=3).prop_map(|(sections, sentences_per_section)| {
        let mut text = String::from("MASTER SERVICES AGREEMENT\n\n");
        for i in 0..sections {
            text.push_str(&format!("{}. {}\n", i + 1, HEADINGS[i]));
            for j in 0..sentences_per_section {
                text.push_str(SENTENCES[(i + j) % SENTENCES.len()]);
                text.push(' ');
            }
            text.push_str("\n\n");
        }
        (sections, text)
    })
}

proptest! {
    #[test]
    fn segment_never_returns_empty(text in "\\PC{0,600}") {
        let clauses = TextSegmenter::default().segment(&text);
        prop_assert!(!clauses.is_empty());
    }

    #[test]
    fn clause_ids_are_unique(text in "[A-Za-z0-9 .,\\n]{0,800}") {
        let clauses = TextSegmenter::default().segment(&text);
        let mut ids: Vec<&str> = clauses.iter().map(|c| c.id.as_str()).collect();
        let before = ids.len();
        ids.sort_unstable();
        ids.dedup();
        prop_assert_eq!(ids.len(), before);
    }

    #[test]
    fn sentinel_is_always_alone(text in "\\PC{0,120}") {
        let clauses = TextSegmenter::default().segment(&text);
        if clauses.iter().any(|c| c.is_sentinel()) {
            prop_assert_eq!(clauses.len(), 1);
        }
    }

    #[test]
    fn every_clause_has_a_title(text in "[A-Za-z0-9 .,:\\n]{0,800}") {
        for clause in TextSegmenter::default().segment(&text) {
            let title = clause.title.unwrap_or_default();
            prop_assert!(!title.trim().is_empty());
        }
    }

    #[test]
    fn normalize_is_idempotent(text in "\\PC{0,400}") {
        let once = normalize(&text);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn numbered_contracts_segment_by_heading((sections, text) in numbered_contract()) {
        let clauses = TextSegmenter::default().segment(&text);

        prop_assert_eq!(clauses.len(), sections);
        for (i, clause) in clauses.iter().enumerate() {
            prop_assert_eq!(clause.id.clone(), format!("clause-{}", i + 1));
            prop_assert_eq!(clause.title.as_deref(), Some(HEADINGS[i]));
        }
    }
}
