//! Extraction result and its assembly from grouped words.

use std::collections::BTreeMap;

use itertools::Itertools;
use serde::Serialize;

use crate::document::WordBoundingBox;
use crate::error::ExtractionFailure;
use crate::pattern::PatternType;
use crate::trace::Termination;

/// Outcome of one pattern over one document.
///
/// On success `grouped_words` holds the anchor (first, for keyword patterns)
/// followed by the words in assembly order, and `combined_text` is their text
/// joined by single spaces.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PatternExtractionResult {
    pub success: bool,
    pub anchor_word: Option<WordBoundingBox>,
    pub grouped_words: Vec<WordBoundingBox>,
    pub combined_text: String,
    pub error_message: String,
    pub metadata: BTreeMap<String, String>,
}

/// How an assembly loop finished.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Outcome {
    pub termination: Termination,
    pub lines: usize,
    pub stop_word: Option<String>,
}

impl PatternExtractionResult {
    /// A failed result carrying only the reason.
    pub fn failure(pattern_type: Option<PatternType>, failure: &ExtractionFailure) -> Self {
        let mut metadata = BTreeMap::new();
        if let Some(pt) = pattern_type {
            metadata.insert("pattern_type".to_string(), pt.as_str().to_string());
        }
        Self {
            success: false,
            anchor_word: None,
            grouped_words: Vec::new(),
            combined_text: String::new(),
            error_message: failure.to_string(),
            metadata,
        }
    }

    pub(crate) fn assemble(
        pattern_type: PatternType,
        anchor: &WordBoundingBox,
        words: &[&WordBoundingBox],
        outcome: &Outcome,
    ) -> Self {
        let combined_text = words.iter().map(|w| w.text()).join(" ");

        let mut metadata = BTreeMap::new();
        metadata.insert("pattern_type".to_string(), pattern_type.as_str().to_string());
        metadata.insert(
            "anchor_index".to_string(),
            anchor.original_index().to_string(),
        );
        metadata.insert("word_count".to_string(), words.len().to_string());
        metadata.insert("line_count".to_string(), outcome.lines.to_string());
        metadata.insert(
            "termination".to_string(),
            outcome.termination.as_str().to_string(),
        );
        if let Some(stop) = &outcome.stop_word {
            metadata.insert("stop_word".to_string(), stop.clone());
        }

        Self {
            success: true,
            anchor_word: Some(anchor.clone()),
            grouped_words: words.iter().map(|w| (*w).clone()).collect(),
            combined_text,
            error_message: String::new(),
            metadata,
        }
    }

    /// Marks an assembled result as failed without discarding its words.
    pub(crate) fn fail_with(mut self, failure: &ExtractionFailure) -> Self {
        self.success = false;
        self.error_message = failure.to_string();
        self
    }

    /// Texts of the grouped words, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.grouped_words.iter().map(|w| w.text()).collect()
    }
}
