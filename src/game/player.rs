//! Players
//!
//! A player occupies one tile, owns an ordered list of assigned
//! crystals, and must gather them in exactly that order: standing on a
//! later crystal's tile collects nothing.

use serde::{Deserialize, Serialize};

use crate::core::hash::StateHasher;
use crate::core::point::Point;
use crate::game::collectible::CollectibleId;
use crate::game::tile::Direction;

/// Seat index establishing turn order (0-based).
///
/// Implements Ord so seats sort into turn order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerSeat(pub u8);

impl PlayerSeat {
    /// Index into the grid's player vector.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// State of a single player.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    /// Turn-order seat
    pub seat: PlayerSeat,

    /// Display name shown in the info panel
    pub name: String,

    /// Current tile coordinates
    pub position: Point,

    /// Spawn corner (fixed for the session)
    pub spawn: Point,

    /// Crystals assigned to this seat, in mandatory collection order
    pub assigned: Vec<CollectibleId>,

    /// Index of the next crystal to gather
    pub next_target: usize,

    /// Facing for the renderer's directional sprite row
    pub facing: Direction,
}

impl Player {
    /// Create a player standing on their spawn corner.
    pub fn new(seat: PlayerSeat, name: impl Into<String>, spawn: Point) -> Self {
        Self {
            seat,
            name: name.into(),
            position: spawn,
            spawn,
            assigned: Vec::new(),
            next_target: 0,
            facing: Direction::East,
        }
    }

    /// The crystal this player must gather next, if any remain.
    #[inline]
    pub fn target_collectible(&self) -> Option<CollectibleId> {
        self.assigned.get(self.next_target).copied()
    }

    /// Record the current target as gathered and advance to the next.
    ///
    /// Returns the gathered id; callers verify the match first.
    pub fn advance_target(&mut self) -> Option<CollectibleId> {
        let id = self.target_collectible()?;
        self.next_target += 1;
        Some(id)
    }

    /// Crystals gathered so far.
    #[inline]
    pub fn collected_count(&self) -> u32 {
        self.next_target as u32
    }

    /// Crystals still owed.
    #[inline]
    pub fn remaining_count(&self) -> u32 {
        (self.assigned.len() - self.next_target) as u32
    }

    /// Whether the full assignment has been gathered.
    #[inline]
    pub fn has_collected_all(&self) -> bool {
        !self.assigned.is_empty() && self.next_target >= self.assigned.len()
    }

    /// Hash this player's state.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u8(self.seat.0);
        hasher.update_point(self.position);
        hasher.update_u32(self.next_target as u32);
        for id in &self.assigned {
            hasher.update_u32(id.0);
        }
    }
}
