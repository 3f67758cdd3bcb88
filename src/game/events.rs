//! Game Events
//!
//! Emitted by mutations and drained by the caller through
//! [`GameEngine::take_events`](crate::game::engine::GameEngine::take_events).
//! The renderer and any session layer react to these instead of diffing
//! snapshots.

use serde::{Deserialize, Serialize};

use crate::core::point::Point;
use crate::game::collectible::CollectibleId;
use crate::game::player::PlayerSeat;
use crate::game::tile::{Direction, PathShape};

/// Something observable happened in the simulation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A game was initialized and entered the shifting phase.
    GameStarted {
        /// Seated players
        num_players: u8,
        /// Crystals on the board
        total_collectibles: u32,
        /// Board seed
        seed: u64,
    },

    /// The spare tile was rotated while waiting for insertion.
    SpareRotated {
        /// Template after rotation
        shape: PathShape,
    },

    /// A lane was shifted and the spare inserted.
    LaneShifted {
        /// Border slot the spare entered through
        insert_slot: Point,
        /// Push direction
        direction: Direction,
        /// Template ejected into the spare slot
        ejected_shape: PathShape,
        /// Border slot blocked until the next shift
        disabled_slot: Point,
        /// Seats carried one cell with their tiles
        carried: Vec<PlayerSeat>,
    },

    /// A player walked to a connected tile.
    PlayerMoved {
        /// Who moved
        seat: PlayerSeat,
        /// Starting tile
        from: Point,
        /// Destination tile
        to: Point,
        /// Path length in tile hops
        hops: u32,
    },

    /// A player gathered their current target crystal.
    CollectibleGathered {
        /// Who gathered
        seat: PlayerSeat,
        /// The crystal
        collectible: CollectibleId,
        /// Where it sat
        at: Point,
        /// Crystals the seat still owes
        remaining: u32,
    },

    /// A move settled and the turn passed on.
    TurnAdvanced {
        /// Completed turn counter
        turn: u32,
        /// Seat now shifting
        next: PlayerSeat,
    },

    /// A seat finished its full assignment.
    GameCompleted {
        /// Winning seat
        winner: PlayerSeat,
        /// Turn on which the game completed
        turn: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_round_trip_json() {
        let events = vec![
            GameEvent::SpareRotated {
                shape: PathShape::StraightEastWest,
            },
            GameEvent::CollectibleGathered {
                seat: PlayerSeat(1),
                collectible: CollectibleId(3),
                at: Point::new(4, 5),
                remaining: 1,
            },
        ];

        let json = serde_json::to_string(&events).unwrap();
        let back: Vec<GameEvent> = serde_json::from_str(&json).unwrap();
        assert_eq!(events, back);
    }
}
