//! Right-only word chains.
//!
//! [`scan_right`] follows a keyword anchor to the right along its centre
//! line until a stop word. [`scan_row`] takes a whole row at a given Y for
//! position-based patterns.

use rustc_hash::FxHashSet;

use super::stop_word_in;
use crate::document::{SpatialDocument, WordBoundingBox};
use crate::error::ExtractionFailure;
use crate::geometry::HasPixelBox;
use crate::trace::Termination;

/// Words collected by a horizontal scan, anchor first.
#[derive(Debug)]
pub(crate) struct ScanOutcome<'a> {
    pub words: Vec<&'a WordBoundingBox>,
    pub termination: Termination,
    pub stop_word: Option<String>,
}

/// Chains words to the right of `anchor` whose vertical centre stays within
/// `tolerance_y` of the previous word's. There is no horizontal gap limit;
/// the chain ends at (and includes) the first stop word.
pub(crate) fn scan_right<'a>(
    doc: &'a SpatialDocument,
    anchor: &'a WordBoundingBox,
    tolerance_y: i32,
    stop_words: &[String],
) -> ScanOutcome<'a> {
    let tol = f64::from(tolerance_y);
    let mut consumed = FxHashSet::default();
    consumed.insert(anchor.original_index());
    let mut words = vec![anchor];
    let mut current = anchor;

    // Each step consumes one word, bounding the loop by the document size.
    for _ in 0..doc.len() {
        let cy = current.rect().center_y();
        let next = doc
            .words()
            .iter()
            .filter(|w| !consumed.contains(&w.original_index()))
            .filter(|w| w.x1() > current.x2())
            .filter(|w| (w.rect().center_y() - cy).abs() <= tol)
            .min_by_key(|w| (w.x1(), w.original_index()));

        let Some(next) = next else {
            break;
        };
        consumed.insert(next.original_index());
        words.push(next);

        if let Some(stop) = stop_word_in(&[next], stop_words) {
            return ScanOutcome {
                words,
                termination: Termination::StopWordHit,
                stop_word: Some(stop),
            };
        }
        current = next;
    }

    ScanOutcome {
        words,
        termination: Termination::NoCandidate,
        stop_word: None,
    }
}

/// Row of words whose top edge lies within `tolerance_y` of `y`.
///
/// Words are taken left to right; the row ends at the first horizontal gap
/// wider than `tolerance_x`, or at (and including) the first stop word.
pub(crate) fn scan_row<'a>(
    doc: &'a SpatialDocument,
    y: i32,
    tolerance_x: i32,
    tolerance_y: i32,
    stop_words: &[String],
) -> Result<ScanOutcome<'a>, ExtractionFailure> {
    let mut row: Vec<&WordBoundingBox> = doc
        .words()
        .iter()
        .filter(|w| w.y1().abs_diff(y) <= tolerance_y.unsigned_abs())
        .collect();
    if row.is_empty() {
        return Err(ExtractionFailure::NoWordsOnRow { y });
    }
    row.sort_by_key(|w| (w.x1(), w.original_index()));

    let mut words = vec![row[0]];
    for pair in row.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        if next.x1() - prev.x2() > tolerance_x {
            break;
        }
        words.push(next);
    }

    if let Some(pos) = words
        .iter()
        .position(|w| stop_word_in(&[*w], stop_words).is_some())
    {
        let stop = stop_word_in(&[words[pos]], stop_words);
        words.truncate(pos + 1);
        return Ok(ScanOutcome {
            words,
            termination: Termination::StopWordHit,
            stop_word: stop,
        });
    }

    Ok(ScanOutcome {
        words,
        termination: Termination::NoCandidate,
        stop_word: None,
    })
}
