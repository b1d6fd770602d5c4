//! Line reconstruction by collision detection.
//!
//! OCR output is not in reading order, and neighbouring boxes on one line
//! rarely share a baseline. Starting from a seed word we march left, then
//! right, accepting the nearest neighbour whose vertical extent would collide
//! with the current word and whose horizontal gap fits the tolerance.
//!
//! ```text
//!   march left            seed            march right
//!  <----------- +------+ +------+ +------+ ----------->
//!               | c    | | seed | | c    |
//!               +------+ +------+ +------+
//!                      |<->|  gap <= tolerance_x
//! ```
//!
//! Small tokens (colons, currency marks) sitting inside the finished line's
//! bounds are then recovered and slotted in by X position.

use std::cmp::Reverse;
use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use crate::document::{SpatialDocument, WordBoundingBox};
use crate::geometry::{HasPixelBox, PixelRect, bounding_rect, y_ranges_could_collide};
use crate::params::ExtractParams;

/// Assembles one text line around a seed word.
#[derive(Clone, Copy, Debug)]
pub(crate) struct LineAssembler<'a> {
    doc: &'a SpatialDocument,
    tolerance_x: i32,
    epsilon: i32,
    symbol_y_slack: i32,
    symbol_max_chars: usize,
}

impl<'a> LineAssembler<'a> {
    pub(crate) fn new(doc: &'a SpatialDocument, tolerance_x: i32, params: &ExtractParams) -> Self {
        Self {
            doc,
            tolerance_x,
            epsilon: params.line_overlap_epsilon,
            symbol_y_slack: params.symbol_y_slack,
            symbol_max_chars: params.symbol_max_chars,
        }
    }

    /// Returns the seed's line in left-to-right order.
    ///
    /// Words in `consumed` are never used; the caller owns marking the
    /// returned words as consumed.
    pub(crate) fn assemble(
        &self,
        seed: &'a WordBoundingBox,
        consumed: &FxHashSet<usize>,
    ) -> Vec<&'a WordBoundingBox> {
        let mut in_line = FxHashSet::default();
        in_line.insert(seed.original_index());
        let mut line = VecDeque::from([seed]);

        let mut current = seed;
        while let Some(c) = self.left_neighbour(current, consumed, &in_line) {
            in_line.insert(c.original_index());
            line.push_front(c);
            current = c;
        }

        current = seed;
        while let Some(c) = self.right_neighbour(current, consumed, &in_line) {
            in_line.insert(c.original_index());
            line.push_back(c);
            current = c;
        }

        let mut line: Vec<_> = line.into();
        self.recover_symbols(&mut line, consumed, &in_line);
        line
    }

    fn is_free(
        word: &WordBoundingBox,
        consumed: &FxHashSet<usize>,
        in_line: &FxHashSet<usize>,
    ) -> bool {
        let idx = word.original_index();
        !consumed.contains(&idx) && !in_line.contains(&idx)
    }

    /// Rightmost free word ending before `current` starts.
    fn left_neighbour(
        &self,
        current: &WordBoundingBox,
        consumed: &FxHashSet<usize>,
        in_line: &FxHashSet<usize>,
    ) -> Option<&'a WordBoundingBox> {
        let edge = current.x1();
        let window = PixelRect::new(
            edge.saturating_sub(self.tolerance_x),
            current.y1(),
            edge.saturating_add(self.epsilon),
            current.y2(),
        );
        self.doc
            .intersecting(&window)
            .filter(|c| Self::is_free(c, consumed, in_line))
            .filter(|c| {
                c.x2() <= edge.saturating_add(self.epsilon)
                    && edge.saturating_sub(c.x2()) <= self.tolerance_x
            })
            .filter(|c| y_ranges_could_collide(*c, current))
            .max_by_key(|c| (c.x2(), Reverse(c.original_index())))
    }

    /// Leftmost free word starting after `current` ends.
    fn right_neighbour(
        &self,
        current: &WordBoundingBox,
        consumed: &FxHashSet<usize>,
        in_line: &FxHashSet<usize>,
    ) -> Option<&'a WordBoundingBox> {
        let edge = current.x2();
        let window = PixelRect::new(
            edge.saturating_sub(self.epsilon),
            current.y1(),
            edge.saturating_add(self.tolerance_x),
            current.y2(),
        );
        self.doc
            .intersecting(&window)
            .filter(|c| Self::is_free(c, consumed, in_line))
            .filter(|c| {
                c.x1() >= edge.saturating_sub(self.epsilon)
                    && c.x1().saturating_sub(edge) <= self.tolerance_x
            })
            .filter(|c| y_ranges_could_collide(*c, current))
            .min_by_key(|c| (c.x1(), c.original_index()))
    }

    /// Inserts short free tokens lying inside the line's bounds.
    fn recover_symbols(
        &self,
        line: &mut Vec<&'a WordBoundingBox>,
        consumed: &FxHashSet<usize>,
        in_line: &FxHashSet<usize>,
    ) {
        let Some(bounds) = bounding_rect(line.iter().copied()) else {
            return;
        };
        let bounds = bounds.expand_y(self.symbol_y_slack);

        let mut symbols: Vec<&WordBoundingBox> = self
            .doc
            .contained_in(&bounds)
            .filter(|w| Self::is_free(w, consumed, in_line))
            .filter(|w| w.char_len() <= self.symbol_max_chars)
            .collect();
        symbols.sort_by_key(|w| (w.x1(), w.original_index()));

        for symbol in symbols {
            let at = line.partition_point(|w| w.x1() <= symbol.x1());
            line.insert(at, symbol);
        }
    }
}
