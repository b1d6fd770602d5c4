//! Extraction and fragment-merge parameters.
//!
//! Contains [`ExtractParams`] and [`MergeParams`] for controlling the
//! geometry thresholds the engine uses. Every default is a named constant.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Default horizontal tolerance (pixels) when a pattern does not set one.
pub const DEFAULT_TOLERANCE_X: i32 = 5;
/// Default vertical tolerance (pixels) when a pattern does not set one.
pub const DEFAULT_TOLERANCE_Y: i32 = 26;
/// Tight X window tried before `tolerance_x` when seeding the next column line.
pub const COLUMN_TIGHT_X: i32 = 5;
/// Overlap allowed between neighbours while marching along a line.
pub const LINE_OVERLAP_EPSILON: i32 = 2;
/// Vertical slack around a line's bounds when recovering missed symbols.
pub const SYMBOL_Y_SLACK: i32 = 3;
/// Tokens up to this many characters are eligible for symbol recovery.
pub const SYMBOL_MAX_CHARS: usize = 2;

/// Default maximum vertical gap (pixels) between fragments of one glyph.
pub const DEFAULT_GAP_TOLERANCE: i32 = 15;
/// Default minimum horizontal overlap ratio between fragments of one glyph.
pub const DEFAULT_OVERLAP_THRESHOLD: f64 = 0.5;
/// Thai block.
pub const THAI_RANGE: RangeInclusive<u32> = 0x0E00..=0x0E7F;

/// Parameters for pattern extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractParams {
    /// Horizontal tolerance applied when a pattern leaves `tolerance_x` unset.
    pub default_tolerance_x: i32,

    /// Vertical tolerance applied when a pattern leaves `tolerance_y` unset.
    pub default_tolerance_y: i32,

    /// X window of the first seed search below a column line.
    pub column_tight_x: i32,

    /// How far two neighbours on a line may overlap horizontally and still
    /// be considered left/right of each other.
    pub line_overlap_epsilon: i32,

    /// Vertical slack for symbol recovery.
    pub symbol_y_slack: i32,

    /// Maximum character count of a recoverable symbol.
    pub symbol_max_chars: usize,
}

impl Default for ExtractParams {
    fn default() -> Self {
        Self {
            default_tolerance_x: DEFAULT_TOLERANCE_X,
            default_tolerance_y: DEFAULT_TOLERANCE_Y,
            column_tight_x: COLUMN_TIGHT_X,
            line_overlap_epsilon: LINE_OVERLAP_EPSILON,
            symbol_y_slack: SYMBOL_Y_SLACK,
            symbol_max_chars: SYMBOL_MAX_CHARS,
        }
    }
}

/// Parameters for the fragment merge pre-pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeParams {
    /// Fragments further apart vertically than this are never merged.
    pub gap_tolerance: i32,

    /// Minimum horizontal overlap ratio, relative to the narrower fragment.
    pub overlap_threshold: f64,

    /// Code point ranges of scripts prone to over-segmentation.
    pub script_ranges: Vec<RangeInclusive<u32>>,
}

impl Default for MergeParams {
    fn default() -> Self {
        Self {
            gap_tolerance: DEFAULT_GAP_TOLERANCE,
            overlap_threshold: DEFAULT_OVERLAP_THRESHOLD,
            script_ranges: vec![THAI_RANGE],
        }
    }
}

impl MergeParams {
    /// Creates merge parameters for the default script ranges.
    ///
    /// # Panics
    /// Panics if overlap_threshold is not within [0.0, 1.0].
    pub fn new(gap_tolerance: i32, overlap_threshold: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&overlap_threshold),
            "overlap_threshold should be a number between 0 and 1"
        );
        Self {
            gap_tolerance,
            overlap_threshold,
            ..Self::default()
        }
    }

    /// True if any character of `text` falls in a configured script range.
    pub fn is_in_script(&self, text: &str) -> bool {
        text.chars().any(|c| {
            let cp = u32::from(c);
            self.script_ranges.iter().any(|r| r.contains(&cp))
        })
    }
}
