//! A single recognized OCR token.

use serde::Serialize;

use crate::error::{GridError, Result};
use crate::geometry::{HasPixelBox, PixelRect};

/// One recognized word with its pixel box, normalised box and confidence.
///
/// Identity is `original_index`; two words are "the same word" only if their
/// indices match.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WordBoundingBox {
    text: String,
    raw_x1: i32,
    raw_y1: i32,
    raw_x2: i32,
    raw_y2: i32,
    norm_x1: f64,
    norm_y1: f64,
    norm_x2: f64,
    norm_y2: f64,
    confidence: f64,
    original_index: usize,
}

impl WordBoundingBox {
    /// Creates a word, validating text, box and confidence.
    ///
    /// Surrounding whitespace is trimmed from `text`. Normalised coordinates
    /// are zero until the word is placed in a `SpatialDocument`.
    pub fn new(
        original_index: usize,
        text: impl Into<String>,
        rect: PixelRect,
        confidence: f64,
    ) -> Result<Self> {
        let invalid = |msg: String| GridError::InvalidWord {
            index: original_index,
            msg,
        };

        let text = text.into();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(invalid("empty text".to_string()));
        }
        if rect.x1 > rect.x2 || rect.y1 > rect.y2 {
            return Err(invalid(format!(
                "inverted box ({},{},{},{})",
                rect.x1, rect.y1, rect.x2, rect.y2
            )));
        }
        if rect.x1 < 0 || rect.y1 < 0 {
            return Err(invalid(format!(
                "negative coordinate ({},{})",
                rect.x1, rect.y1
            )));
        }
        if !confidence.is_finite() || !(0.0..=100.0).contains(&confidence) {
            return Err(invalid(format!("confidence {confidence} outside 0..=100")));
        }

        Ok(Self {
            text: trimmed.to_string(),
            raw_x1: rect.x1,
            raw_y1: rect.y1,
            raw_x2: rect.x2,
            raw_y2: rect.y2,
            norm_x1: 0.0,
            norm_y1: 0.0,
            norm_x2: 0.0,
            norm_y2: 0.0,
            confidence,
            original_index,
        })
    }

    /// Builds a word from parts that already satisfy every invariant.
    pub(crate) fn from_parts(
        original_index: usize,
        text: String,
        rect: PixelRect,
        confidence: f64,
    ) -> Self {
        Self {
            text,
            raw_x1: rect.x1,
            raw_y1: rect.y1,
            raw_x2: rect.x2,
            raw_y2: rect.y2,
            norm_x1: 0.0,
            norm_y1: 0.0,
            norm_x2: 0.0,
            norm_y2: 0.0,
            confidence,
            original_index,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn original_index(&self) -> usize {
        self.original_index
    }

    /// Normalised box `(x1, y1, x2, y2)` in `[0, 1]`.
    pub fn norm(&self) -> (f64, f64, f64, f64) {
        (self.norm_x1, self.norm_y1, self.norm_x2, self.norm_y2)
    }

    /// Case-insensitive substring match.
    pub fn contains_ignore_case(&self, needle_lower: &str) -> bool {
        self.text.to_lowercase().contains(needle_lower)
    }

    /// Number of characters in the text.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Fills the normalised box from page dimensions, clamping to `[0, 1]`.
    pub(crate) fn normalize(&mut self, width: u32, height: u32) {
        let (w, h) = (f64::from(width), f64::from(height));
        let clamp = |v: f64| v.clamp(0.0, 1.0);
        self.norm_x1 = clamp(f64::from(self.raw_x1) / w);
        self.norm_y1 = clamp(f64::from(self.raw_y1) / h);
        self.norm_x2 = clamp(f64::from(self.raw_x2) / w);
        self.norm_y2 = clamp(f64::from(self.raw_y2) / h);
    }
}

impl HasPixelBox for WordBoundingBox {
    fn rect(&self) -> PixelRect {
        PixelRect::new(self.raw_x1, self.raw_y1, self.raw_x2, self.raw_y2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_text() {
        let w = WordBoundingBox::new(0, "  Amount ", PixelRect::new(10, 10, 60, 30), 95.0).unwrap();
        assert_eq!(w.text(), "Amount");
        assert_eq!(w.char_len(), 6);
    }

    #[test]
    fn rejects_blank_text() {
        let err = WordBoundingBox::new(3, "   ", PixelRect::new(0, 0, 1, 1), 50.0).unwrap_err();
        assert_eq!(
            err,
            GridError::InvalidWord {
                index: 3,
                msg: "empty text".to_string()
            }
        );
    }

    #[test]
    fn rejects_inverted_box() {
        assert!(WordBoundingBox::new(0, "x", PixelRect::new(10, 0, 5, 10), 50.0).is_err());
        assert!(WordBoundingBox::new(0, "x", PixelRect::new(0, 10, 5, 0), 50.0).is_err());
    }

    #[test]
    fn rejects_bad_confidence() {
        let r = PixelRect::new(0, 0, 5, 5);
        assert!(WordBoundingBox::new(0, "x", r, -1.0).is_err());
        assert!(WordBoundingBox::new(0, "x", r, 100.5).is_err());
        assert!(WordBoundingBox::new(0, "x", r, f64::NAN).is_err());
        assert!(WordBoundingBox::new(0, "x", r, 100.0).is_ok());
    }

    #[test]
    fn normalize_clamps_overflowing_boxes() {
        let mut w = WordBoundingBox::new(0, "edge", PixelRect::new(50, 0, 120, 25), 80.0).unwrap();
        w.normalize(100, 50);
        assert_eq!(w.norm(), (0.5, 0.0, 1.0, 0.5));
    }

    #[test]
    fn case_insensitive_contains() {
        let w = WordBoundingBox::new(0, "TOTAL:", PixelRect::new(0, 0, 5, 5), 80.0).unwrap();
        assert!(w.contains_ignore_case("total"));
        assert!(!w.contains_ignore_case("amount"));
    }
}
