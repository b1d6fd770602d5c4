//! Anchor location by keyword or by pixel coordinate.

use crate::document::{SpatialDocument, WordBoundingBox};
use crate::error::ExtractionFailure;
use crate::geometry::{HasPixelBox, PixelRect, top_left_distance_sq};

/// First word (lowest `original_index`) whose text contains `keyword`,
/// compared case-insensitively.
pub(crate) fn find_by_keyword<'a>(
    doc: &'a SpatialDocument,
    keyword: &str,
) -> Result<&'a WordBoundingBox, ExtractionFailure> {
    let needle = keyword.trim().to_lowercase();
    if needle.is_empty() {
        return Err(ExtractionFailure::EmptyKeyword);
    }
    doc.words()
        .iter()
        .filter(|w| w.contains_ignore_case(&needle))
        .min_by_key(|w| w.original_index())
        .ok_or(ExtractionFailure::KeywordNotFound)
}

/// Word nearest to `(x, y)` among those intersecting the tolerance window.
///
/// Distance is measured to each word's top-left corner; ties go to the lower
/// `original_index`.
pub(crate) fn find_by_coordinate(
    doc: &SpatialDocument,
    x: i32,
    y: i32,
    tol_x: i32,
    tol_y: i32,
) -> Result<&WordBoundingBox, ExtractionFailure> {
    let window = PixelRect::around(x, y, tol_x, tol_y);
    doc.intersecting(&window)
        .min_by_key(|w| (top_left_distance_sq(&w.rect(), x, y), w.original_index()))
        .ok_or(ExtractionFailure::NoWordsNearCoordinate { x, y })
}
