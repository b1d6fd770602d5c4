//! Serde input records for documents delivered by an OCR collaborator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{SpatialDocument, WordBoundingBox};
use crate::error::{GridError, Result};
use crate::geometry::PixelRect;

fn default_confidence() -> f64 {
    100.0
}

/// One word as it arrives on the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WordInput {
    pub text: String,
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    /// Defaults to the word's position in the list.
    #[serde(default)]
    pub original_index: Option<usize>,
}

/// A page of words as it arrives on the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DocumentInput {
    pub width: u32,
    pub height: u32,
    pub words: Vec<WordInput>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl TryFrom<DocumentInput> for SpatialDocument {
    type Error = GridError;

    fn try_from(input: DocumentInput) -> Result<Self> {
        let words = input
            .words
            .into_iter()
            .enumerate()
            .map(|(pos, w)| {
                WordBoundingBox::new(
                    w.original_index.unwrap_or(pos),
                    w.text,
                    PixelRect::new(w.x1, w.y1, w.x2, w.y2),
                    w.confidence,
                )
            })
            .collect::<Result<Vec<_>>>()?;

        let mut doc = SpatialDocument::new(input.width, input.height, words)?;
        doc.metadata.extend(input.metadata);
        Ok(doc)
    }
}
