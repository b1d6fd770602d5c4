//! Spatial document model.
//!
//! A [`SpatialDocument`] is an unordered set of [`WordBoundingBox`] values on
//! a page of known pixel size, plus a spatial index. It is immutable once
//! built; passes that change the word set (fragment merging) produce a new
//! document.

mod index;
mod input;
mod tsv;
mod word;

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;

use crate::error::{GridError, Result};
use crate::geometry::PixelRect;

use self::index::WordIndex;

pub use input::{DocumentInput, WordInput};
pub use tsv::{TSV_MIN_FIELDS, TSV_PAGE_LEVEL, TSV_WORD_LEVEL, parse_tesseract_tsv};
pub use word::WordBoundingBox;

/// The words of one page, read-only during extraction.
#[derive(Clone, Debug)]
pub struct SpatialDocument {
    words: Vec<WordBoundingBox>,
    width: u32,
    height: u32,
    metadata: BTreeMap<String, String>,
    index: WordIndex,
}

impl SpatialDocument {
    /// Builds a document, normalising every word against the page size.
    ///
    /// Fails on zero dimensions or repeated `original_index` values.
    pub fn new(width: u32, height: u32, mut words: Vec<WordBoundingBox>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(GridError::InvalidDimensions { width, height });
        }

        let mut seen = FxHashSet::default();
        for word in &mut words {
            if !seen.insert(word.original_index()) {
                return Err(GridError::DuplicateIndex(word.original_index()));
            }
            word.normalize(width, height);
        }

        let index = WordIndex::new(&words);
        Ok(Self {
            words,
            width,
            height,
            metadata: BTreeMap::new(),
            index,
        })
    }

    /// Builds a document from words already known to be valid and unique.
    pub(crate) fn from_trusted(
        width: u32,
        height: u32,
        mut words: Vec<WordBoundingBox>,
        metadata: BTreeMap<String, String>,
    ) -> Self {
        for word in &mut words {
            word.normalize(width, height);
        }
        let index = WordIndex::new(&words);
        Self {
            words,
            width,
            height,
            metadata,
            index,
        }
    }

    /// Adds a diagnostic metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn words(&self) -> &[WordBoundingBox] {
        &self.words
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Words whose box intersects `rect`, in unspecified order.
    pub fn intersecting(&self, rect: &PixelRect) -> impl Iterator<Item = &WordBoundingBox> + '_ {
        self.index.intersecting(rect).map(|slot| &self.words[slot])
    }

    /// Positions in `words()` of the words intersecting `rect`.
    pub(crate) fn slots_intersecting(&self, rect: &PixelRect) -> impl Iterator<Item = usize> + '_ {
        self.index.intersecting(rect)
    }

    /// Words whose box lies fully inside `rect`, in unspecified order.
    pub fn contained_in(&self, rect: &PixelRect) -> impl Iterator<Item = &WordBoundingBox> + '_ {
        self.index.contained_in(rect).map(|slot| &self.words[slot])
    }
}
