//! R-tree over word boxes.
//!
//! Slots are positions in the owning document's word vector; the tree stores
//! only `(slot, rect)` and is built once by bulk load.

use std::fmt;

use rstar::{AABB, RTree, RTreeObject};

use crate::geometry::{HasPixelBox, PixelRect};

#[derive(Clone, Debug)]
struct WordNode {
    slot: usize,
    rect: PixelRect,
}

impl PartialEq for WordNode {
    fn eq(&self, other: &Self) -> bool {
        self.slot == other.slot
    }
}

impl RTreeObject for WordNode {
    type Envelope = AABB<[i32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([self.rect.x1, self.rect.y1], [self.rect.x2, self.rect.y2])
    }
}

fn envelope_of(rect: &PixelRect) -> AABB<[i32; 2]> {
    AABB::from_corners([rect.x1, rect.y1], [rect.x2, rect.y2])
}

/// Static spatial index answering rectangle queries with slot ids.
///
/// Query results come back in tree order; callers that need determinism
/// must order them by identity themselves.
#[derive(Clone)]
pub(crate) struct WordIndex {
    tree: RTree<WordNode>,
}

impl WordIndex {
    pub fn new<T: HasPixelBox>(items: &[T]) -> Self {
        let nodes = items
            .iter()
            .enumerate()
            .map(|(slot, item)| WordNode {
                slot,
                rect: item.rect(),
            })
            .collect();
        Self {
            tree: RTree::bulk_load(nodes),
        }
    }

    /// Slots whose box intersects `rect` (edges inclusive).
    pub fn intersecting(&self, rect: &PixelRect) -> impl Iterator<Item = usize> + '_ {
        self.tree
            .locate_in_envelope_intersecting(&envelope_of(rect))
            .map(|node| node.slot)
    }

    /// Slots whose box lies fully inside `rect`.
    pub fn contained_in(&self, rect: &PixelRect) -> impl Iterator<Item = usize> + '_ {
        self.tree
            .locate_in_envelope(&envelope_of(rect))
            .map(|node| node.slot)
    }
}

impl fmt::Debug for WordIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WordIndex")
            .field("size", &self.tree.size())
            .finish()
    }
}
