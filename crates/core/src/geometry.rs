//! Bounding-box math for pixel-space word boxes.
//!
//! OCR coordinates use a top-left origin: `y1` is the top edge and `y2` the
//! bottom edge, so "below" means a larger `y`.

use serde::{Deserialize, Serialize};

/// An axis-aligned pixel rectangle `(x1, y1)..(x2, y2)` with `x1 <= x2`, `y1 <= y2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelRect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl PixelRect {
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Rectangle centred on a point, extended by `tol_x`/`tol_y` in each direction.
    pub const fn around(x: i32, y: i32, tol_x: i32, tol_y: i32) -> Self {
        Self {
            x1: x.saturating_sub(tol_x),
            y1: y.saturating_sub(tol_y),
            x2: x.saturating_add(tol_x),
            y2: y.saturating_add(tol_y),
        }
    }

    pub const fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    pub const fn height(&self) -> i32 {
        self.y2 - self.y1
    }

    pub fn center_x(&self) -> f64 {
        (f64::from(self.x1) + f64::from(self.x2)) / 2.0
    }

    pub fn center_y(&self) -> f64 {
        (f64::from(self.y1) + f64::from(self.y2)) / 2.0
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &PixelRect) -> PixelRect {
        PixelRect {
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
            x2: self.x2.max(other.x2),
            y2: self.y2.max(other.y2),
        }
    }

    /// Closed-interval intersection test (touching edges intersect).
    pub const fn intersects(&self, other: &PixelRect) -> bool {
        self.x1 <= other.x2 && other.x1 <= self.x2 && self.y1 <= other.y2 && other.y1 <= self.y2
    }

    /// True if `other` lies fully inside `self` (edges inclusive).
    pub const fn contains(&self, other: &PixelRect) -> bool {
        other.x1 >= self.x1 && other.x2 <= self.x2 && other.y1 >= self.y1 && other.y2 <= self.y2
    }

    /// Grow vertically by `dy` on both edges.
    pub const fn expand_y(&self, dy: i32) -> PixelRect {
        PixelRect {
            x1: self.x1,
            y1: self.y1.saturating_sub(dy),
            x2: self.x2,
            y2: self.y2.saturating_add(dy),
        }
    }
}

/// Trait for objects that occupy a pixel rectangle.
pub trait HasPixelBox {
    fn rect(&self) -> PixelRect;

    fn x1(&self) -> i32 {
        self.rect().x1
    }
    fn y1(&self) -> i32 {
        self.rect().y1
    }
    fn x2(&self) -> i32 {
        self.rect().x2
    }
    fn y2(&self) -> i32 {
        self.rect().y2
    }
}

impl HasPixelBox for PixelRect {
    fn rect(&self) -> PixelRect {
        *self
    }
}

/// Horizontal overlap relative to the narrower box, in `[0, 1]`.
///
/// Returns 0 when either box has zero width.
pub fn horizontal_overlap<A: HasPixelBox, B: HasPixelBox>(a: &A, b: &B) -> f64 {
    let (a, b) = (a.rect(), b.rect());
    let narrow = a.width().min(b.width());
    if narrow <= 0 {
        return 0.0;
    }
    let overlap = (a.x2.min(b.x2) - a.x1.max(b.x1)).max(0);
    f64::from(overlap) / f64::from(narrow)
}

/// Distance between vertical centres.
pub fn vertical_gap<A: HasPixelBox, B: HasPixelBox>(a: &A, b: &B) -> f64 {
    (a.rect().center_y() - b.rect().center_y()).abs()
}

/// Empty vertical space between two boxes; 0 when their Y extents overlap.
pub fn vertical_edge_gap<A: HasPixelBox, B: HasPixelBox>(a: &A, b: &B) -> i32 {
    let (a, b) = (a.rect(), b.rect());
    (a.y1.max(b.y1) - a.y2.min(b.y2)).max(0)
}

/// True when the boxes would touch if slid horizontally onto the same axis.
///
///   +---+
///   | a |   +---+   -
///   +---+   | b |   | shared y
///           +---+   -
pub fn y_ranges_could_collide<A: HasPixelBox, B: HasPixelBox>(a: &A, b: &B) -> bool {
    let (a, b) = (a.rect(), b.rect());
    !(a.y2 < b.y1 || a.y1 > b.y2)
}

/// Bounding rectangle of a non-empty set of boxes.
pub fn bounding_rect<'a, T, I>(items: I) -> Option<PixelRect>
where
    T: HasPixelBox + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items
        .into_iter()
        .map(|item| item.rect())
        .reduce(|acc, r| acc.union(&r))
}

/// Squared Euclidean distance from the top-left corner of `r` to `(x, y)`.
pub fn top_left_distance_sq(r: &PixelRect, x: i32, y: i32) -> i64 {
    let dx = i64::from(r.x1) - i64::from(x);
    let dy = i64::from(r.y1) - i64::from(y);
    dx * dx + dy * dy
}
