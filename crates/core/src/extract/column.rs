//! Vertical-column marching.
//!
//! Keeps a marching coordinate at the left-bottom corner of the last
//! accepted line and repeatedly seeds the next line just below it.

use rustc_hash::FxHashSet;

use super::line::LineAssembler;
use super::stop_word_in;
use crate::document::{SpatialDocument, WordBoundingBox};
use crate::geometry::{HasPixelBox, PixelRect};
use crate::trace::{ExtractionObserver, Termination, TraceEvent};

/// Lines collected below a marching start point.
#[derive(Debug)]
pub(crate) struct ColumnOutcome<'a> {
    pub lines: Vec<Vec<&'a WordBoundingBox>>,
    pub termination: Termination,
    pub stop_word: Option<String>,
}

pub(crate) struct ColumnMarcher<'a, 'p> {
    pub doc: &'a SpatialDocument,
    pub assembler: LineAssembler<'a>,
    pub tolerance_x: i32,
    pub tolerance_y: i32,
    pub tight_x: i32,
    pub stop_words: &'p [String],
}

impl<'a> ColumnMarcher<'a, '_> {
    /// Marches down from `(x, y)`, consuming every word it accepts.
    ///
    /// Each iteration consumes at least its seed, so the loop runs at most
    /// once per document word.
    pub(crate) fn march(
        &self,
        mut x: i32,
        mut y: i32,
        consumed: &mut FxHashSet<usize>,
        observer: &mut dyn ExtractionObserver,
    ) -> ColumnOutcome<'a> {
        let mut lines = Vec::new();

        for _ in 0..self.doc.len() {
            let Some(seed) = self.next_seed(x, y, consumed) else {
                break;
            };

            let line = self.assembler.assemble(seed, consumed);
            consumed.extend(line.iter().map(|w| w.original_index()));
            observer.on_event(TraceEvent::LineAssembled {
                indices: line.iter().map(|w| w.original_index()).collect(),
            });

            if let Some(stop) = stop_word_in(&line, self.stop_words) {
                lines.push(line);
                return ColumnOutcome {
                    lines,
                    termination: Termination::StopWordHit,
                    stop_word: Some(stop),
                };
            }

            x = line.iter().map(|w| w.x1()).min().unwrap_or(x);
            y = line.iter().map(|w| w.y2()).max().unwrap_or(y);
            lines.push(line);
        }

        ColumnOutcome {
            lines,
            termination: Termination::NoMoreLines,
            stop_word: None,
        }
    }

    /// First word of the next line below `(x, y)`.
    ///
    /// Tries a tight X window before falling back to `tolerance_x`; within a
    /// window the topmost, then closest-in-X, then lowest-index word wins.
    fn next_seed(
        &self,
        x: i32,
        y: i32,
        consumed: &FxHashSet<usize>,
    ) -> Option<&'a WordBoundingBox> {
        let widest = self.tight_x.max(self.tolerance_x);
        let search = PixelRect::new(
            x.saturating_sub(widest),
            y,
            x.saturating_add(widest),
            y.saturating_add(self.tolerance_y),
        );
        let below: Vec<&'a WordBoundingBox> = self
            .doc
            .intersecting(&search)
            .filter(|w| !consumed.contains(&w.original_index()))
            .filter(|w| w.y1() > y && w.y1() <= y.saturating_add(self.tolerance_y))
            .collect();

        [self.tight_x, self.tolerance_x].into_iter().find_map(|window| {
            below
                .iter()
                .copied()
                .filter(|w| w.x1().abs_diff(x) <= window.unsigned_abs())
                .min_by_key(|w| (w.y1(), w.x1().abs_diff(x), w.original_index()))
        })
    }
}
