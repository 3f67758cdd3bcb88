//! Collectible Crystals
//!
//! Crystals bound to tiles. The grid creates them during generation,
//! tiles hold their ids, and players gather them strictly in assignment
//! order.

use serde::{Deserialize, Serialize};

use crate::core::point::Point;
use crate::game::player::PlayerSeat;

/// Unique collectible identifier (creation order, doubles as the index
/// into the grid's collectible vector).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CollectibleId(pub u32);

/// Columns in the crystal sprite sheet.
pub const SHEET_COLS: u32 = 15;
/// Rows in the crystal sprite sheet.
pub const SHEET_ROWS: u32 = 8;
/// Side length of one sheet cell in pixels.
pub const SHEET_CELL: u32 = 512;

/// Source rectangle origin inside the crystal sprite sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteCoords {
    /// Source x in pixels
    pub sx: u32,
    /// Source y in pixels
    pub sy: u32,
}

/// State of one collectible crystal.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Collectible {
    /// Unique id (monotonic creation counter)
    pub id: CollectibleId,

    /// Host tile grid coordinates; follows the tile when it shifts,
    /// including a ride through the spare slot
    pub position: Point,

    /// Index into the sprite sheet
    pub sprite_index: u32,

    /// Has a player gathered this crystal?
    pub collected: bool,

    /// Seat that gathered it (if collected)
    pub collected_by: Option<PlayerSeat>,

    /// Turn on which it was gathered (if collected)
    pub collected_turn: Option<u32>,
}

impl Collectible {
    /// Create a new, uncollected crystal.
    pub fn new(id: CollectibleId, position: Point, sprite_index: u32) -> Self {
        Self {
            id,
            position,
            sprite_index,
            collected: false,
            collected_by: None,
            collected_turn: None,
        }
    }

    /// Source cell inside the sprite sheet, counted from the
    /// bottom-right corner of the sheet.
    pub fn sprite_coords(&self) -> SpriteCoords {
        let col = SHEET_COLS - 1 - (self.sprite_index % SHEET_COLS);
        let row = SHEET_ROWS - 1 - ((self.sprite_index / SHEET_COLS) % SHEET_ROWS);
        SpriteCoords {
            sx: SHEET_CELL * col,
            sy: SHEET_CELL * row,
        }
    }
}
