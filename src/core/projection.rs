//! Isometric Projection
//!
//! Exact integer mapping between grid coordinates and screen pixels.
//! The forward and inverse transforms are algebraic inverses of each
//! other, so integer grid coordinates round-trip without drift. No
//! floating point is involved anywhere.

use serde::{Deserialize, Serialize};

use super::point::Point;

/// Screen-space pixel coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    /// Horizontal pixel
    pub x: i32,
    /// Vertical pixel
    pub y: i32,
}

impl ScreenPoint {
    /// Create a new screen point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Diamond-projection parameters.
///
/// A grid cell projects to a diamond `tile_width` wide and
/// `tile_height = tile_width / 2` tall, centered horizontally in a
/// world `world_width` pixels wide:
///
/// ```text
/// screen_x = (gx - gy) * tile_width / 2 + world_width / 2
/// screen_y = (gx + gy) * tile_height / 2
/// ```
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct IsoProjection {
    tile_width: i32,
    tile_height: i32,
    world_width: i32,
}

impl IsoProjection {
    /// Create a projection.
    ///
    /// `tile_width` must be a positive multiple of 4 so both half-tile
    /// offsets stay integral; `world_width` must be positive and even.
    pub fn new(tile_width: i32, world_width: i32) -> Self {
        debug_assert!(tile_width > 0 && tile_width % 4 == 0);
        debug_assert!(world_width > 0 && world_width % 2 == 0);
        Self {
            tile_width,
            tile_height: tile_width / 2,
            world_width,
        }
    }

    /// Tile diamond width in pixels.
    #[inline]
    pub fn tile_width(&self) -> i32 {
        self.tile_width
    }

    /// Tile diamond height in pixels (half the width).
    #[inline]
    pub fn tile_height(&self) -> i32 {
        self.tile_height
    }

    /// World width in pixels.
    #[inline]
    pub fn world_width(&self) -> i32 {
        self.world_width
    }

    /// Project a grid coordinate to its screen anchor (diamond top).
    #[inline]
    pub fn grid_to_screen(&self, p: Point) -> ScreenPoint {
        ScreenPoint::new(
            (p.x - p.y) * (self.tile_width / 2) + self.world_width / 2,
            (p.x + p.y) * (self.tile_height / 2),
        )
    }

    /// Inverse projection with floor semantics.
    ///
    /// Every pixel maps to some cell; callers decide whether the cell
    /// lies on the board. The division is carried out on the combined
    /// numerator so no intermediate rounding can disagree with the
    /// forward transform.
    #[inline]
    pub fn screen_to_grid(&self, s: ScreenPoint) -> Point {
        let cx = i64::from(s.x - self.world_width / 2);
        let sy = i64::from(s.y);
        let tw = i64::from(self.tile_width);
        let th = i64::from(self.tile_height);
        // (cx / (tw/2) + sy / (th/2)) / 2 and its mirror, as one floor
        // division each.
        let x = (cx * th + sy * tw).div_euclid(tw * th);
        let y = (sy * tw - cx * th).div_euclid(tw * th);
        Point::new(x as i32, y as i32)
    }
}
