//! The Board
//!
//! Owns the tile array, the spare tile, the players, and the crystals;
//! hosts the generation, shift-and-insert, connectivity, and pathing
//! algorithms. All mutation goes through the contracts below; the
//! renderer only reads.
//!
//! Layout: a 7x7 walkable interior inside a one-cell border of
//! insertion slots, a 9x9 backing array in total. Exactly one tile
//! object occupies each cell at all times; the single spare tile lives
//! at the off-board home `(4, -2)` between insertions.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::core::hash::{compute_state_hash, StateHash};
use crate::core::point::Point;
use crate::core::projection::{IsoProjection, ScreenPoint};
use crate::core::rng::DeterministicRng;
use crate::game::collectible::{Collectible, CollectibleId};
use crate::game::config::GameConfig;
use crate::game::player::{Player, PlayerSeat};
use crate::game::templates::TemplateBag;
use crate::game::tile::{Direction, PathShape, Tile, TileKind};

/// Interior side length of the canonical board.
pub const INTERIOR_SIZE: i32 = 7;
/// Backing array side length (interior plus one border of slots).
pub const GRID_SIZE: i32 = INTERIOR_SIZE + 2;
/// Off-board home of the spare tile.
pub const SPARE_HOME: Point = Point::new(4, -2);
/// Spawn corners in seat order.
pub const SPAWN_POINTS: [Point; 4] = [
    Point::new(1, 1),
    Point::new(INTERIOR_SIZE, INTERIOR_SIZE),
    Point::new(1, INTERIOR_SIZE),
    Point::new(INTERIOR_SIZE, 1),
];

/// Whether `p` lies on the backing array.
#[inline]
pub fn in_grid(p: Point) -> bool {
    (0..GRID_SIZE).contains(&p.x) && (0..GRID_SIZE).contains(&p.y)
}

/// Whether `p` lies in the walkable interior.
#[inline]
pub fn in_interior(p: Point) -> bool {
    (1..=INTERIOR_SIZE).contains(&p.x) && (1..=INTERIOR_SIZE).contains(&p.y)
}

/// Cell role from coordinate parity, computed once at generation.
///
/// Corners and odd border cells are dead space; even border cells are
/// insertion slots; odd/odd interior cells are fixed; everything else
/// in the interior shifts.
pub fn classify(p: Point) -> TileKind {
    let on_x_border = p.x == 0 || p.x == GRID_SIZE - 1;
    let on_y_border = p.y == 0 || p.y == GRID_SIZE - 1;
    let both_even = p.x % 2 == 0 && p.y % 2 == 0;
    let both_odd = p.x % 2 == 1 && p.y % 2 == 1;

    if on_x_border && on_y_border {
        TileKind::Empty
    } else if on_x_border || on_y_border {
        if both_even {
            TileKind::Enabled
        } else {
            TileKind::Empty
        }
    } else if both_odd {
        TileKind::Fixed
    } else {
        TileKind::Movable
    }
}

/// Template for a fixed tile, selected by its interior quadrant.
///
/// The four interior corners get turns opening inward; border-adjacent
/// fixed tiles get detours opening away from their border; the inner
/// fixed tiles pick the detour facing their quadrant's far corner.
fn fixed_shape(p: Point) -> PathShape {
    let (ix, iy) = (p.x - 1, p.y - 1);
    let last = INTERIOR_SIZE - 1;
    let mid = last / 2;
    match (ix, iy) {
        (0, 0) => PathShape::TurnSouthEast,
        (0, y) if y == last => PathShape::TurnNorthEast,
        (x, 0) if x == last => PathShape::TurnSouthWest,
        (x, y) if x == last && y == last => PathShape::TurnNorthWest,
        (0, _) => PathShape::DetourNorthSouthEast,
        (x, _) if x == last => PathShape::DetourNorthSouthWest,
        (_, 0) => PathShape::DetourSouthEastWest,
        (_, y) if y == last => PathShape::DetourNorthEastWest,
        (x, y) if x < mid && y < mid => PathShape::DetourNorthSouthEast,
        (x, y) if x > mid && y > mid => PathShape::DetourNorthSouthWest,
        (x, y) if x < mid && y > mid => PathShape::DetourNorthEastWest,
        _ => PathShape::DetourSouthEastWest,
    }
}

/// Board generation violated an internal invariant.
///
/// These are programming errors, not user input errors; the template
/// counts are sized so neither can fire for a validated configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerationError {
    /// The template bag ran dry before every movable cell was stamped
    #[error("movable template pool exhausted at {0:?}")]
    TemplatePoolExhausted(Point),

    /// The bag still held templates after the spare was drawn
    #[error("{0} templates left over after generation")]
    TemplatePoolLeftover(usize),
}

/// What a completed shift did, for events and animation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftOutcome {
    /// Border slot the spare entered through.
    pub insert_slot: Point,
    /// Push direction.
    pub direction: Direction,
    /// Interior cells that moved, nearest-to-edge first (settled
    /// positions).
    pub moved: Vec<Point>,
    /// Template now sitting in the spare slot.
    pub ejected_shape: PathShape,
    /// Border slot disabled until the next shift.
    pub disabled_slot: Point,
    /// Seats carried one cell along with their tiles.
    pub carried: Vec<PlayerSeat>,
    /// Seat that rode the ejected tile and wrapped to the inserted one.
    pub wrapped: Option<PlayerSeat>,
}

/// One straight stretch of a walk, for the animator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveSegment {
    /// Travel direction.
    pub direction: Direction,
    /// Hops covered in that direction.
    pub steps: u32,
}

/// What a completed move did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Seat that moved.
    pub seat: PlayerSeat,
    /// Tile-by-tile path, origin included.
    pub path: Vec<Point>,
    /// Path compressed into straight legs.
    pub segments: Vec<MoveSegment>,
    /// Crystal gathered on arrival, if the destination held the seat's
    /// current target.
    pub collected: Option<CollectibleId>,
}

/// The board: tiles, spare, players, crystals, and projection.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Grid {
    tiles: Vec<Vec<Tile>>,
    spare: Tile,
    disabled_slots: Vec<Point>,
    collectibles: Vec<Collectible>,
    players: Vec<Player>,
    projection: IsoProjection,
    seed: u64,
}

impl Grid {
    /// Generate a board from a validated configuration.
    ///
    /// The caller validates the config first (see
    /// [`GameConfig::validate`]); generation itself can only fail on
    /// internal invariant violations.
    pub fn generate(config: &GameConfig, projection: IsoProjection) -> Result<Self, GenerationError> {
        let mut rng = DeterministicRng::new(config.seed);
        let mut bag = TemplateBag::standard(&mut rng);

        let mut tiles = Vec::with_capacity(GRID_SIZE as usize);
        for x in 0..GRID_SIZE {
            let mut row = Vec::with_capacity(GRID_SIZE as usize);
            for y in 0..GRID_SIZE {
                let position = Point::new(x, y);
                let kind = classify(position);
                let shape = match kind {
                    TileKind::Fixed => Some(fixed_shape(position)),
                    TileKind::Movable => Some(
                        bag.draw()
                            .ok_or(GenerationError::TemplatePoolExhausted(position))?,
                    ),
                    _ => None,
                };
                row.push(Tile::new(position, kind, shape));
            }
            tiles.push(row);
        }

        // The spare consumes the final template; the bag must then be
        // empty or the counts were wrong.
        let spare_shape = bag
            .draw()
            .ok_or(GenerationError::TemplatePoolExhausted(SPARE_HOME))?;
        if !bag.is_empty() {
            return Err(GenerationError::TemplatePoolLeftover(bag.remaining()));
        }
        let spare = Tile::new(SPARE_HOME, TileKind::Movable, Some(spare_shape));

        let mut grid = Self {
            tiles,
            spare,
            disabled_slots: Vec::new(),
            collectibles: Vec::new(),
            players: Vec::new(),
            projection,
            seed: config.seed,
        };

        grid.place_collectibles(config.total_collectibles(), &mut rng);
        grid.seat_players(config);

        debug!(
            seed = config.seed,
            players = config.num_players(),
            collectibles = grid.collectibles.len(),
            "board generated"
        );
        Ok(grid)
    }

    /// Drop crystals on unique random interior cells, re-rolling
    /// duplicates and the spawn corners.
    fn place_collectibles(&mut self, total: u32, rng: &mut DeterministicRng) {
        for i in 0..total {
            let position = loop {
                let x = rng.next_int_range(1, INTERIOR_SIZE);
                let y = rng.next_int_range(1, INTERIOR_SIZE);
                let candidate = Point::new(x, y);
                if SPAWN_POINTS.contains(&candidate) {
                    continue;
                }
                if self.cell(candidate).collectible.is_some() {
                    continue;
                }
                break candidate;
            };
            let id = CollectibleId(i);
            self.cell_mut(position).collectible = Some(id);
            self.collectibles.push(Collectible::new(id, position, i));
        }
    }

    /// Seat players on their spawn corners and deal the crystals
    /// round-robin: crystal `i` goes to seat `i mod n`, each seat's
    /// list ordered by deal order.
    fn seat_players(&mut self, config: &GameConfig) {
        for (i, name) in config.player_names.iter().enumerate() {
            let seat = PlayerSeat(i as u8);
            let spawn = SPAWN_POINTS[i];
            let mut player = Player::new(seat, name.clone(), spawn);
            player.assigned = self
                .collectibles
                .iter()
                .map(|c| c.id)
                .skip(i)
                .step_by(config.num_players())
                .collect();
            self.cell_mut(spawn).player = Some(seat);
            self.players.push(player);
        }
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// Tile at `p`, if `p` lies on the backing array.
    pub fn tile(&self, p: Point) -> Option<&Tile> {
        if in_grid(p) {
            Some(self.cell(p))
        } else {
            None
        }
    }

    /// The spare tile waiting for insertion.
    pub fn spare(&self) -> &Tile {
        &self.spare
    }

    /// Border slots currently blocked against insertion.
    pub fn disabled_slots(&self) -> &[Point] {
        &self.disabled_slots
    }

    /// All players in seat order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Player at `seat`.
    pub fn player(&self, seat: PlayerSeat) -> Option<&Player> {
        self.players.get(seat.index())
    }

    /// All crystals, collected or not.
    pub fn collectibles(&self) -> &[Collectible] {
        &self.collectibles
    }

    /// Crystal by id.
    pub fn collectible(&self, id: CollectibleId) -> Option<&Collectible> {
        self.collectibles.get(id.0 as usize)
    }

    /// Iterate every tile on the backing array, row by row.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().flatten()
    }

    /// Projection used for screen lookups.
    pub fn projection(&self) -> &IsoProjection {
        &self.projection
    }

    /// Seed this board was generated from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Resolve a pixel to a board coordinate.
    ///
    /// The spare's home cell resolves too; anything else off the array
    /// is `None`.
    pub fn screen_to_grid(&self, s: ScreenPoint) -> Option<Point> {
        let p = self.projection.screen_to_grid(s);
        if in_grid(p) || p == self.spare.position {
            Some(p)
        } else {
            None
        }
    }

    /// Tile under a pixel, the spare included.
    pub fn tile_at_screen(&self, s: ScreenPoint) -> Option<&Tile> {
        let p = self.projection.screen_to_grid(s);
        if p == self.spare.position {
            return Some(&self.spare);
        }
        self.tile(p)
    }

    #[inline]
    fn cell(&self, p: Point) -> &Tile {
        &self.tiles[p.x as usize][p.y as usize]
    }

    #[inline]
    fn cell_mut(&mut self, p: Point) -> &mut Tile {
        &mut self.tiles[p.x as usize][p.y as usize]
    }

    // =========================================================================
    // SHIFT-AND-INSERT
    // =========================================================================

    /// Which push direction a border slot commands.
    fn shift_direction(p: Point) -> Option<Direction> {
        if p.y == 0 {
            Some(Direction::South)
        } else if p.y == GRID_SIZE - 1 {
            Some(Direction::North)
        } else if p.x == 0 {
            Some(Direction::East)
        } else if p.x == GRID_SIZE - 1 {
            Some(Direction::West)
        } else {
            None
        }
    }

    /// Interior cells of the lane behind a border slot, nearest first.
    fn lane_cells(edge: Point, direction: Direction) -> Vec<Point> {
        (1..=INTERIOR_SIZE)
            .map(|i| match direction {
                Direction::South => Point::new(edge.x, i),
                Direction::North => Point::new(edge.x, GRID_SIZE - 1 - i),
                Direction::East => Point::new(i, edge.y),
                Direction::West => Point::new(GRID_SIZE - 1 - i, edge.y),
            })
            .collect()
    }

    /// Shift the lane behind an Enabled border slot and insert the
    /// spare.
    ///
    /// No-op (`None`) unless `edge` currently accepts insertion. Slots
    /// disabled by the previous shift are re-enabled first; the far
    /// slot of this lane is then disabled so the shift cannot be
    /// immediately undone. Tiles move one cell along the push
    /// direction; the far interior tile is ejected and becomes the new
    /// spare. Riders follow their tiles, and a rider on the ejected
    /// tile wraps around to the inserted one.
    pub fn shift_and_insert(&mut self, edge: Point) -> Option<ShiftOutcome> {
        if !self.tile(edge).is_some_and(Tile::is_insertion_point) {
            return None;
        }
        let direction = Self::shift_direction(edge)?;
        let lane = Self::lane_cells(edge, direction);
        let near = lane[0];
        let far = lane[lane.len() - 1];
        let ejected_shape = self.cell(far).shape?;

        self.enable_disabled_slots();

        // Rotate the lane: the spare enters at the near cell, every
        // lane tile moves one cell along, the far tile leaves the
        // board.
        let mut incoming = std::mem::replace(&mut self.spare, Tile::new(SPARE_HOME, TileKind::Movable, None));
        incoming.kind = TileKind::Movable;
        incoming.connected = false;
        for &cell in &lane {
            incoming.position = cell;
            incoming = std::mem::replace(self.cell_mut(cell), incoming);
        }
        let mut ejected = incoming;
        ejected.position = SPARE_HOME;
        ejected.connected = false;

        // Riders follow their tiles.
        let mut carried = Vec::new();
        for &cell in &lane {
            if let Some(seat) = self.cell(cell).player {
                self.players[seat.index()].position = cell;
                carried.push(seat);
            }
            if let Some(id) = self.cell(cell).collectible {
                self.collectibles[id.0 as usize].position = cell;
            }
        }

        // A rider on the ejected tile wraps around to the inserted one.
        let mut wrapped = None;
        if let Some(seat) = ejected.player.take() {
            self.cell_mut(near).player = Some(seat);
            self.players[seat.index()].position = near;
            wrapped = Some(seat);
        }
        if let Some(id) = ejected.collectible {
            self.collectibles[id.0 as usize].position = SPARE_HOME;
        }
        self.spare = ejected;

        // Block the far slot; using it next would trivially undo this
        // shift.
        let disabled_slot = match direction {
            Direction::South => Point::new(edge.x, GRID_SIZE - 1),
            Direction::North => Point::new(edge.x, 0),
            Direction::East => Point::new(GRID_SIZE - 1, edge.y),
            Direction::West => Point::new(0, edge.y),
        };
        self.cell_mut(disabled_slot).kind = TileKind::Disabled;
        self.disabled_slots.push(disabled_slot);

        debug!(?edge, ?direction, ?disabled_slot, "lane shifted");

        Some(ShiftOutcome {
            insert_slot: edge,
            direction,
            moved: lane,
            ejected_shape,
            disabled_slot,
            carried,
            wrapped,
        })
    }

    /// Re-open slots blocked by the previous shift.
    fn enable_disabled_slots(&mut self) {
        for p in std::mem::take(&mut self.disabled_slots) {
            self.cell_mut(p).kind = TileKind::Enabled;
        }
    }

    /// Rotate the spare's template 90 degrees clockwise, returning the
    /// new template.
    pub fn rotate_spare(&mut self) -> Option<PathShape> {
        self.spare.rotate_cw();
        self.spare.shape
    }

    // =========================================================================
    // CONNECTIVITY
    // =========================================================================

    /// Flood the interior from `from`, marking every tile reachable
    /// through mutually agreeing connectors.
    ///
    /// Previously set flags are cleared first. Returns the reachable
    /// cells in visit order; a one-sided connector never crosses.
    pub fn compute_connected(&mut self, from: Point) -> Vec<Point> {
        self.clear_connected();
        if !in_interior(from) || !self.cell(from).is_walkable() {
            return Vec::new();
        }

        let mut reached = Vec::new();
        let mut stack = vec![from];
        while let Some(p) = stack.pop() {
            if self.cell(p).connected {
                continue;
            }
            self.cell_mut(p).connected = true;
            reached.push(p);

            let connectors = self.cell(p).connectors();
            for d in Direction::ALL {
                if !connectors.contains(d) {
                    continue;
                }
                let n = d.step(p);
                if !in_interior(n) || self.cell(n).connected {
                    continue;
                }
                if self.cell(n).connectors().contains(d.opposite()) {
                    stack.push(n);
                }
            }
        }
        reached
    }

    /// Lower every tile (clear the rise highlight).
    pub fn clear_connected(&mut self) {
        for row in &mut self.tiles {
            for tile in row {
                tile.connected = false;
            }
        }
        self.spare.connected = false;
    }

    // =========================================================================
    // PATHING & MOVEMENT
    // =========================================================================

    /// Shortest path between two interior tiles over mutually agreeing
    /// connectors, origin included; `None` when unreachable.
    ///
    /// Breadth-first, expanding neighbors in N, S, E, W order, so the
    /// result is shortest in hops and deterministic among ties.
    pub fn find_path(&self, from: Point, to: Point) -> Option<Vec<Point>> {
        if !in_interior(from) || !in_interior(to) {
            return None;
        }
        if from == to {
            return Some(vec![from]);
        }

        let idx = |p: Point| (p.x * GRID_SIZE + p.y) as usize;
        let cells = (GRID_SIZE * GRID_SIZE) as usize;
        let mut parents: Vec<Option<Point>> = vec![None; cells];
        let mut visited = vec![false; cells];
        let mut queue = VecDeque::new();

        visited[idx(from)] = true;
        queue.push_back(from);

        while let Some(p) = queue.pop_front() {
            let connectors = self.cell(p).connectors();
            for d in Direction::ALL {
                if !connectors.contains(d) {
                    continue;
                }
                let n = d.step(p);
                if !in_interior(n) || visited[idx(n)] {
                    continue;
                }
                if !self.cell(n).connectors().contains(d.opposite()) {
                    continue;
                }
                visited[idx(n)] = true;
                parents[idx(n)] = Some(p);
                if n == to {
                    let mut path = vec![to];
                    let mut cursor = to;
                    while let Some(prev) = parents[idx(cursor)] {
                        path.push(prev);
                        cursor = prev;
                    }
                    path.reverse();
                    return Some(path);
                }
                queue.push_back(n);
            }
        }
        None
    }

    /// Merge consecutive same-direction hops into animation legs.
    ///
    /// The leg boundaries are part of the core contract consumed by the
    /// animator.
    pub fn compress_path(path: &[Point]) -> Vec<MoveSegment> {
        let mut segments: Vec<MoveSegment> = Vec::new();
        for pair in path.windows(2) {
            let Some(direction) = Direction::between(pair[0], pair[1]) else {
                continue;
            };
            match segments.last_mut() {
                Some(last) if last.direction == direction => last.steps += 1,
                _ => segments.push(MoveSegment { direction, steps: 1 }),
            }
        }
        segments
    }

    /// Move a player to a connected destination, gathering their target
    /// crystal if it sits there.
    ///
    /// `None` for anything invalid: unknown seat, a destination off the
    /// interior, not connected, or occupied by another player. Moving
    /// onto the current tile is a legal zero-hop move (the collection
    /// check still runs).
    pub fn apply_move(&mut self, seat: PlayerSeat, to: Point, turn: u32) -> Option<MoveRecord> {
        let from = self.players.get(seat.index())?.position;
        let dest = self.tile(to)?;
        if !dest.is_walkable() || !dest.connected {
            return None;
        }
        if dest.player.is_some_and(|s| s != seat) {
            return None;
        }

        // Connected implies reachable; a miss here would be an
        // internal inconsistency between the flood and the BFS.
        let path = self.find_path(from, to)?;
        debug_assert_eq!(path.last(), Some(&to));
        let segments = Self::compress_path(&path);

        self.cell_mut(from).player = None;
        self.cell_mut(to).player = Some(seat);
        self.players[seat.index()].position = to;
        if let Some(direction) = segments.last().map(|s| s.direction) {
            self.players[seat.index()].facing = direction;
        }

        // Strict in-order collection on arrival: only the seat's
        // current target counts.
        let mut collected = None;
        if let Some(id) = self.cell(to).collectible {
            if self.players[seat.index()].target_collectible() == Some(id) {
                self.players[seat.index()].advance_target();
                self.cell_mut(to).collectible = None;
                let crystal = &mut self.collectibles[id.0 as usize];
                crystal.collected = true;
                crystal.collected_by = Some(seat);
                crystal.collected_turn = Some(turn);
                collected = Some(id);
            }
        }

        debug!(seat = seat.0, ?from, ?to, hops = path.len() - 1, "player moved");

        Some(MoveRecord {
            seat,
            path,
            segments,
            collected,
        })
    }

    // =========================================================================
    // HASHING
    // =========================================================================

    /// Hash of the full board state.
    pub fn compute_hash(&self, turn: u32) -> StateHash {
        compute_state_hash(turn, self.seed, |hasher| {
            for tile in self.tiles.iter().flatten() {
                hasher.update_u8(tile.kind as u8);
                hasher.update_u8(tile.shape.map(|s| s as u8 + 1).unwrap_or(0));
                hasher.update_bool(tile.connected);
            }
            hasher.update_u8(self.spare.shape.map(|s| s as u8 + 1).unwrap_or(0));

            for player in &self.players {
                player.hash_into(hasher);
            }

            for crystal in &self.collectibles {
                hasher.update_u32(crystal.id.0);
                hasher.update_point(crystal.position);
                hasher.update_bool(crystal.collected);
            }
        })
    }
}

#[cfg(test)]
impl Grid {
    /// Test-only mutable access for crafting scenarios.
    pub(crate) fn players_mut(&mut self) -> &mut [Player] {
        &mut self.players
    }

    /// Test-only mutable access for crafting scenarios.
    pub(crate) fn tile_mut(&mut self, p: Point) -> Option<&mut Tile> {
        if in_grid(p) {
            Some(self.cell_mut(p))
        } else {
            None
        }
    }

    /// Test-only mutable access for crafting scenarios.
    pub(crate) fn collectibles_mut(&mut self) -> &mut [Collectible] {
        &mut self.collectibles
    }
}
