//! Search patterns supplied by the pattern library.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ExtractionFailure;
use crate::params::ExtractParams;

/// How a pattern walks the page from its anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    /// Keyword anchor, then lines marching downward.
    VerticalColumn,
    /// Keyword anchor, then words to the right up to a stop word.
    Horizontal,
    /// Coordinate anchor, its own line, then lines marching downward.
    PositionBasedColumn,
    /// Every word on the row at a coordinate's Y.
    PositionBasedHorizontal,
}

impl PatternType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternType::VerticalColumn => "vertical_column",
            PatternType::Horizontal => "horizontal",
            PatternType::PositionBasedColumn => "position_based_column",
            PatternType::PositionBasedHorizontal => "position_based_horizontal",
        }
    }
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatternType {
    type Err = ExtractionFailure;

    /// Accepts `VerticalColumn`, `vertical_column` and `vertical-column`
    /// spellings, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-' && !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "verticalcolumn" => Ok(PatternType::VerticalColumn),
            "horizontal" => Ok(PatternType::Horizontal),
            "positionbasedcolumn" => Ok(PatternType::PositionBasedColumn),
            "positionbasedhorizontal" => Ok(PatternType::PositionBasedHorizontal),
            _ => Err(ExtractionFailure::UnsupportedPatternType(s.to_string())),
        }
    }
}

/// A field pattern: where to anchor and how to walk from the anchor.
///
/// `regex_patterns` and `parse_as_date` belong to downstream post-processing
/// and are carried through untouched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPattern {
    pub keyword_or_coordinate: String,
    pub pattern_type: PatternType,
    #[serde(default)]
    pub tolerance_x: Option<i32>,
    #[serde(default)]
    pub tolerance_y: Option<i32>,
    #[serde(default)]
    pub stop_words: Vec<String>,
    #[serde(default)]
    pub regex_patterns: Vec<String>,
    #[serde(default)]
    pub parse_as_date: bool,
}

impl SearchPattern {
    pub fn new(keyword_or_coordinate: impl Into<String>, pattern_type: PatternType) -> Self {
        Self {
            keyword_or_coordinate: keyword_or_coordinate.into(),
            pattern_type,
            tolerance_x: None,
            tolerance_y: None,
            stop_words: Vec::new(),
            regex_patterns: Vec::new(),
            parse_as_date: false,
        }
    }

    pub fn with_tolerance(mut self, tolerance_x: i32, tolerance_y: i32) -> Self {
        self.tolerance_x = Some(tolerance_x);
        self.tolerance_y = Some(tolerance_y);
        self
    }

    pub fn with_stop_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop_words = words.into_iter().map(Into::into).collect();
        self
    }

    /// Tolerances with defaults applied; negative values are rejected.
    pub fn tolerances(&self, params: &ExtractParams) -> Result<(i32, i32), ExtractionFailure> {
        let tx = self.tolerance_x.unwrap_or(params.default_tolerance_x);
        let ty = self.tolerance_y.unwrap_or(params.default_tolerance_y);
        for t in [tx, ty] {
            if t < 0 {
                return Err(ExtractionFailure::NegativeTolerance(t));
            }
        }
        Ok((tx, ty))
    }

    /// Lowercased, non-blank stop words.
    pub fn normalized_stop_words(&self) -> Vec<String> {
        self.stop_words
            .iter()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Parses `keyword_or_coordinate` as `"x,y"`.
    pub fn coordinate(&self) -> Result<(i32, i32), ExtractionFailure> {
        parse_coordinate(&self.keyword_or_coordinate)
    }
}

/// Parses an `"x,y"` pixel coordinate. Whitespace around either part is allowed.
pub fn parse_coordinate(s: &str) -> Result<(i32, i32), ExtractionFailure> {
    let malformed = || ExtractionFailure::MalformedCoordinate(s.to_string());
    let (x, y) = s.split_once(',').ok_or_else(malformed)?;
    let x = x.trim().parse().map_err(|_| malformed())?;
    let y = y.trim().parse().map_err(|_| malformed())?;
    Ok((x, y))
}

/// A pattern as stored by the pattern library, with a free-form type name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRecord {
    pub keyword_or_coordinate: String,
    pub pattern_type: String,
    #[serde(default)]
    pub tolerance_x: Option<i32>,
    #[serde(default)]
    pub tolerance_y: Option<i32>,
    #[serde(default)]
    pub stop_words: Vec<String>,
    #[serde(default)]
    pub regex_patterns: Vec<String>,
    #[serde(default)]
    pub parse_as_date: bool,
}

impl TryFrom<&PatternRecord> for SearchPattern {
    type Error = ExtractionFailure;

    fn try_from(record: &PatternRecord) -> Result<Self, Self::Error> {
        Ok(SearchPattern {
            keyword_or_coordinate: record.keyword_or_coordinate.clone(),
            pattern_type: record.pattern_type.parse()?,
            tolerance_x: record.tolerance_x,
            tolerance_y: record.tolerance_y,
            stop_words: record.stop_words.clone(),
            regex_patterns: record.regex_patterns.clone(),
            parse_as_date: record.parse_as_date,
        })
    }
}
