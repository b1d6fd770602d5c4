//! ocrgrid - spatial pattern extraction over OCR word boxes.
//!
//! Given the words of one OCR'd page and a [`SearchPattern`], the engine
//! locates an anchor (by keyword or by pixel coordinate) and assembles the
//! words that belong to the field: a column of lines below the anchor, or a
//! chain of words to its right. An optional pre-pass merges vertically
//! fragmented glyphs before extraction.

pub mod document;
pub mod error;
pub mod extract;
pub mod geometry;
pub mod merge;
pub mod params;
pub mod pattern;
pub mod trace;

pub use document::{DocumentInput, SpatialDocument, WordBoundingBox, WordInput, parse_tesseract_tsv};
pub use error::{ExtractionFailure, GridError, Result};
pub use extract::{PatternExtractionResult, extract, extract_batch, extract_with};
pub use geometry::{HasPixelBox, PixelRect};
pub use merge::{merge_fragments, merge_fragments_with};
pub use params::{ExtractParams, MergeParams};
pub use pattern::{PatternRecord, PatternType, SearchPattern};
pub use trace::{ExtractionObserver, RecordingObserver, Termination, TraceEvent, TracingObserver};
