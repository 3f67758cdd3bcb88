//! Tiles and Path Connectors
//!
//! A tile is one cell of the board: its kind (fixed, movable, border
//! slot), the path template stamped on it, and handles to whatever is
//! standing on it. Two adjacent tiles are passable between each other
//! only when both open a connector toward one another.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::point::Point;
use crate::game::collectible::CollectibleId;
use crate::game::player::PlayerSeat;

// =============================================================================
// DIRECTION
// =============================================================================

/// Compass direction of a tile edge.
///
/// North/South run along the column axis, East/West along the row axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    /// Toward decreasing column
    North = 0,
    /// Toward increasing column
    South = 1,
    /// Toward increasing row
    East = 2,
    /// Toward decreasing row
    West = 3,
}

impl Direction {
    /// All four directions, in the order traversals expand them.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// The edge a neighbor must open to face this one.
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// Rotate 90 degrees clockwise (N -> E -> S -> W -> N).
    #[inline]
    pub fn rotated_cw(self) -> Self {
        match self {
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
        }
    }

    /// The neighboring coordinate one hop in this direction.
    #[inline]
    pub fn step(self, p: Point) -> Point {
        match self {
            Direction::North => p.offset(0, -1),
            Direction::South => p.offset(0, 1),
            Direction::East => p.offset(1, 0),
            Direction::West => p.offset(-1, 0),
        }
    }

    /// Direction of a single-hop displacement, if there is one.
    pub fn between(from: Point, to: Point) -> Option<Direction> {
        match (to.x - from.x, to.y - from.y) {
            (0, -1) => Some(Direction::North),
            (0, 1) => Some(Direction::South),
            (1, 0) => Some(Direction::East),
            (-1, 0) => Some(Direction::West),
            _ => None,
        }
    }
}

// =============================================================================
// CONNECTORS
// =============================================================================

/// Bit set of the edges a tile's path opens onto.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connectors(u8);

impl Connectors {
    /// No openings (border slots, empty cells).
    pub const NONE: Self = Self(0);

    /// Build from a direction list.
    pub const fn of(directions: &[Direction]) -> Self {
        let mut bits = 0u8;
        let mut i = 0;
        while i < directions.len() {
            bits |= 1 << directions[i] as u8;
            i += 1;
        }
        Self(bits)
    }

    /// Whether the path opens onto `direction`.
    #[inline]
    pub const fn contains(self, direction: Direction) -> bool {
        self.0 & (1 << direction as u8) != 0
    }

    /// Number of open edges.
    #[inline]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Rotate every opening 90 degrees clockwise.
    pub fn rotated_cw(self) -> Self {
        let mut bits = 0u8;
        for d in Direction::ALL {
            if self.contains(d) {
                bits |= 1 << d.rotated_cw() as u8;
            }
        }
        Self(bits)
    }

    /// Iterate the open directions in N, S, E, W order.
    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |d| self.contains(*d))
    }
}

impl fmt::Debug for Connectors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Connectors(")?;
        let mut first = true;
        for d in self.iter() {
            if !first {
                write!(f, "|")?;
            }
            let label = match d {
                Direction::North => "N",
                Direction::South => "S",
                Direction::East => "E",
                Direction::West => "W",
            };
            write!(f, "{label}")?;
            first = false;
        }
        write!(f, ")")
    }
}

// =============================================================================
// PATH SHAPES
// =============================================================================

/// The ten path templates stamped on tiles.
///
/// Turns open two adjacent edges, straights two opposite edges,
/// detours three edges. Rotation always stays inside the same family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PathShape {
    /// Turn opening south and east
    TurnSouthEast = 0,
    /// Turn opening south and west
    TurnSouthWest = 1,
    /// Turn opening north and west
    TurnNorthWest = 2,
    /// Turn opening north and east
    TurnNorthEast = 3,
    /// Straight east-west corridor
    StraightEastWest = 4,
    /// Straight north-south corridor
    StraightNorthSouth = 5,
    /// Three-way opening south, east, west
    DetourSouthEastWest = 6,
    /// Three-way opening north, east, west
    DetourNorthEastWest = 7,
    /// Three-way opening north, south, west
    DetourNorthSouthWest = 8,
    /// Three-way opening north, south, east
    DetourNorthSouthEast = 9,
}

/// Broad family of a path template; invariant under rotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeFamily {
    /// Two adjacent openings
    Turn,
    /// Two opposite openings
    Straight,
    /// Three openings
    Detour,
}

impl PathShape {
    /// All templates in discriminant order.
    pub const ALL: [PathShape; 10] = [
        PathShape::TurnSouthEast,
        PathShape::TurnSouthWest,
        PathShape::TurnNorthWest,
        PathShape::TurnNorthEast,
        PathShape::StraightEastWest,
        PathShape::StraightNorthSouth,
        PathShape::DetourSouthEastWest,
        PathShape::DetourNorthEastWest,
        PathShape::DetourNorthSouthWest,
        PathShape::DetourNorthSouthEast,
    ];

    /// The edges this template opens.
    pub const fn connectors(self) -> Connectors {
        use Direction::{East, North, South, West};
        match self {
            PathShape::TurnSouthEast => Connectors::of(&[South, East]),
            PathShape::TurnSouthWest => Connectors::of(&[South, West]),
            PathShape::TurnNorthWest => Connectors::of(&[North, West]),
            PathShape::TurnNorthEast => Connectors::of(&[North, East]),
            PathShape::StraightEastWest => Connectors::of(&[East, West]),
            PathShape::StraightNorthSouth => Connectors::of(&[North, South]),
            PathShape::DetourSouthEastWest => Connectors::of(&[South, East, West]),
            PathShape::DetourNorthEastWest => Connectors::of(&[North, East, West]),
            PathShape::DetourNorthSouthWest => Connectors::of(&[North, South, West]),
            PathShape::DetourNorthSouthEast => Connectors::of(&[North, South, East]),
        }
    }

    /// The template produced by a 90-degree clockwise rotation.
    pub fn rotated_cw(self) -> Self {
        match self {
            PathShape::TurnSouthEast => PathShape::TurnSouthWest,
            PathShape::TurnSouthWest => PathShape::TurnNorthWest,
            PathShape::TurnNorthWest => PathShape::TurnNorthEast,
            PathShape::TurnNorthEast => PathShape::TurnSouthEast,
            PathShape::StraightEastWest => PathShape::StraightNorthSouth,
            PathShape::StraightNorthSouth => PathShape::StraightEastWest,
            PathShape::DetourSouthEastWest => PathShape::DetourNorthSouthWest,
            PathShape::DetourNorthSouthWest => PathShape::DetourNorthEastWest,
            PathShape::DetourNorthEastWest => PathShape::DetourNorthSouthEast,
            PathShape::DetourNorthSouthEast => PathShape::DetourSouthEastWest,
        }
    }

    /// Family grouping; rotation never changes it.
    pub fn family(self) -> ShapeFamily {
        match self {
            PathShape::TurnSouthEast
            | PathShape::TurnSouthWest
            | PathShape::TurnNorthWest
            | PathShape::TurnNorthEast => ShapeFamily::Turn,
            PathShape::StraightEastWest | PathShape::StraightNorthSouth => ShapeFamily::Straight,
            PathShape::DetourSouthEastWest
            | PathShape::DetourNorthEastWest
            | PathShape::DetourNorthSouthWest
            | PathShape::DetourNorthSouthEast => ShapeFamily::Detour,
        }
    }

    /// Stable asset key for the renderer's sprite lookup.
    pub fn sprite_key(self) -> &'static str {
        match self {
            PathShape::TurnSouthEast => "Turn_SE",
            PathShape::TurnSouthWest => "Turn_SW",
            PathShape::TurnNorthWest => "Turn_NW",
            PathShape::TurnNorthEast => "Turn_NE",
            PathShape::StraightEastWest => "Straight_EW",
            PathShape::StraightNorthSouth => "Straight_NS",
            PathShape::DetourSouthEastWest => "Detour_SEW",
            PathShape::DetourNorthEastWest => "Detour_NEW",
            PathShape::DetourNorthSouthWest => "Detour_NSW",
            PathShape::DetourNorthSouthEast => "Detour_NSE",
        }
    }

    /// Get template from index (0-9).
    pub fn from_index(index: u8) -> Option<Self> {
        PathShape::ALL.get(index as usize).copied()
    }
}

// =============================================================================
// TILES
// =============================================================================

/// Role of a board cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TileKind {
    /// Interior tile that never moves; its template comes from the
    /// quadrant rule table
    Fixed = 0,
    /// Interior tile that rides row/column shifts
    Movable = 1,
    /// Border slot where the spare may be inserted
    Enabled = 2,
    /// Border slot blocked because using it would undo the last shift
    Disabled = 3,
    /// Border corner / odd border cell; never rendered, never used
    Empty = 4,
}

/// One cell of the board (or the spare tile).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tile {
    /// Grid coordinates; the spare sits at the off-board home column.
    pub position: Point,

    /// Cell role.
    pub kind: TileKind,

    /// Path template; border slots and empty cells carry none.
    pub shape: Option<PathShape>,

    /// Reachable from the active player's tile (drives the rise
    /// highlight).
    pub connected: bool,

    /// Collectible standing on this tile, if any.
    pub collectible: Option<CollectibleId>,

    /// Player standing on this tile, if any.
    pub player: Option<PlayerSeat>,
}

impl Tile {
    /// Create a bare tile.
    pub fn new(position: Point, kind: TileKind, shape: Option<PathShape>) -> Self {
        Self {
            position,
            kind,
            shape,
            connected: false,
            collectible: None,
            player: None,
        }
    }

    /// The edges this tile's path opens; border slots open nothing.
    #[inline]
    pub fn connectors(&self) -> Connectors {
        self.shape.map(PathShape::connectors).unwrap_or(Connectors::NONE)
    }

    /// Rotate the stamped template 90 degrees clockwise.
    pub fn rotate_cw(&mut self) {
        if let Some(shape) = self.shape {
            self.shape = Some(shape.rotated_cw());
        }
    }

    /// Whether a player can stand here.
    #[inline]
    pub fn is_walkable(&self) -> bool {
        matches!(self.kind, TileKind::Fixed | TileKind::Movable)
    }

    /// Whether the spare may be inserted here.
    #[inline]
    pub fn is_insertion_point(&self) -> bool {
        self.kind == TileKind::Enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_opposites() {
        for d in Direction::ALL {
            assert_eq!(d.opposite().opposite(), d);
            assert_ne!(d.opposite(), d);
        }
    }

    #[test]
    fn test_direction_step_and_back() {
        let p = Point::new(4, 4);
        for d in Direction::ALL {
            assert_eq!(d.opposite().step(d.step(p)), p);
        }
        assert_eq!(Direction::North.step(p), Point::new(4, 3));
        assert_eq!(Direction::East.step(p), Point::new(5, 4));
    }

    #[test]
    fn test_direction_between() {
        let p = Point::new(2, 2);
        for d in Direction::ALL {
            assert_eq!(Direction::between(p, d.step(p)), Some(d));
        }
        assert_eq!(Direction::between(p, Point::new(4, 2)), None);
        assert_eq!(Direction::between(p, p), None);
    }

    #[test]
    fn test_direction_rotation_cycle() {
        for d in Direction::ALL {
            assert_eq!(d.rotated_cw().rotated_cw().rotated_cw().rotated_cw(), d);
        }
        assert_eq!(Direction::North.rotated_cw(), Direction::East);
    }

    #[test]
    fn test_connectors_contains() {
        let c = Connectors::of(&[Direction::North, Direction::East]);
        assert!(c.contains(Direction::North));
        assert!(c.contains(Direction::East));
        assert!(!c.contains(Direction::South));
        assert!(!c.contains(Direction::West));
        assert_eq!(c.count(), 2);
    }

    #[test]
    fn test_shape_connectors_match_rotation() {
        // Rotating a shape's template must equal rotating its
        // connector set.
        for shape in PathShape::ALL {
            assert_eq!(
                shape.rotated_cw().connectors(),
                shape.connectors().rotated_cw(),
                "connector rotation disagrees for {shape:?}"
            );
        }
    }

    #[test]
    fn test_four_rotations_restore_identity() {
        // A straight east-west tile rotated four times is itself again,
        // both in connectors and template identity.
        let mut tile = Tile::new(Point::new(2, 2), TileKind::Movable, Some(PathShape::StraightEastWest));
        let original = tile.connectors();

        for _ in 0..4 {
            tile.rotate_cw();
        }

        assert_eq!(tile.shape, Some(PathShape::StraightEastWest));
        assert_eq!(tile.connectors(), original);

        // And for every other template too.
        for shape in PathShape::ALL {
            let mut s = shape;
            for _ in 0..4 {
                s = s.rotated_cw();
            }
            assert_eq!(s, shape);
        }
    }

    #[test]
    fn test_rotation_preserves_family() {
        for shape in PathShape::ALL {
            assert_eq!(shape.rotated_cw().family(), shape.family());
        }
    }

    #[test]
    fn test_border_slot_has_no_connectors() {
        let slot = Tile::new(Point::new(2, 0), TileKind::Enabled, None);
        assert_eq!(slot.connectors(), Connectors::NONE);
        assert!(slot.is_insertion_point());
        assert!(!slot.is_walkable());
    }
}
