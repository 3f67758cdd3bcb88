//! Integer Grid Coordinates
//!
//! Grid positions are the canonical identity of every board entity.
//! Pixel positions are always derived through the projection and never
//! stored alongside them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 2D integer coordinate with copy value semantics.
///
/// `x` is the row index (first axis of the tile array), `y` the column.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    /// Row index
    pub x: i32,
    /// Column index
    pub y: i32,
}

impl Point {
    /// Origin.
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create a new point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Translate by a delta.
    #[inline]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Hop count between two points along the grid axes.
    #[inline]
    pub fn manhattan_distance(self, other: Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
