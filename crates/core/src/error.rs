//! Error types for the ocrgrid extraction engine.
//!
//! Two families live here. [`GridError`] is raised while *building* inputs
//! (words, documents, TSV imports) and rejects malformed data up front.
//! [`ExtractionFailure`] is the per-field outcome of a pattern that could not
//! be satisfied; it never aborts a batch and is reported through
//! `PatternExtractionResult::error_message`.

use thiserror::Error;

/// Construction-time error for words and documents.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error("invalid word #{index}: {msg}")]
    InvalidWord { index: usize, msg: String },

    #[error("invalid document dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("duplicate original_index {0}")]
    DuplicateIndex(usize),

    #[error("TSV line {line}: {msg}")]
    TsvError { line: usize, msg: String },
}

/// Convenience Result type alias for GridError.
pub type Result<T> = std::result::Result<T, GridError>;

/// Expected failure of a single pattern extraction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionFailure {
    #[error("keyword not found")]
    KeywordNotFound,

    #[error("empty keyword")]
    EmptyKeyword,

    #[error("malformed coordinate: {0:?}")]
    MalformedCoordinate(String),

    #[error("no words near coordinate ({x},{y})")]
    NoWordsNearCoordinate { x: i32, y: i32 },

    #[error("no words on row y={y}")]
    NoWordsOnRow { y: i32 },

    #[error("only one word on row y={y}")]
    RowHasSingleWord { y: i32 },

    #[error("negative tolerance: {0}")]
    NegativeTolerance(i32),

    #[error("unsupported pattern type: {0}")]
    UnsupportedPatternType(String),

    #[error("horizontal pattern requires at least one stop word")]
    MissingStopWords,

    #[error("no words found right of anchor")]
    NoWordsRightOfAnchor,
}
