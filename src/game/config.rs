//! Game Configuration
//!
//! Validated inputs for starting a game, and the crate's error
//! taxonomy: configuration and generation errors are fatal and abort
//! initialization; invalid pointer input is never an error (it is
//! silently ignored by the engine).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::grid::GenerationError;

/// Minimum seated players.
pub const MIN_PLAYERS: usize = 2;
/// Maximum seated players (one per spawn corner).
pub const MAX_PLAYERS: usize = 4;
/// Board capacity for crystals.
pub const MAX_COLLECTIBLES: u32 = 24;

/// Inputs for starting a game.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameConfig {
    /// Display names, one per seat, in turn order
    pub player_names: Vec<String>,

    /// Crystals assigned to each seat; must be a positive even number
    pub collectibles_per_player: u32,

    /// Board seed; derive one with
    /// [`derive_game_seed`](crate::core::rng::derive_game_seed) or pass
    /// a fixed value for reproducible boards
    pub seed: u64,
}

impl GameConfig {
    /// Convenience constructor.
    pub fn new(player_names: Vec<String>, collectibles_per_player: u32, seed: u64) -> Self {
        Self {
            player_names,
            collectibles_per_player,
            seed,
        }
    }

    /// Number of seated players.
    pub fn num_players(&self) -> usize {
        self.player_names.len()
    }

    /// Total crystals placed on the board.
    pub fn total_collectibles(&self) -> u32 {
        self.player_names.len() as u32 * self.collectibles_per_player
    }

    /// Check the configuration against board limits.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let players = self.player_names.len();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players) {
            return Err(ConfigError::PlayerCount(players));
        }
        if self.collectibles_per_player == 0 || self.collectibles_per_player % 2 != 0 {
            return Err(ConfigError::CollectiblesPerPlayer(self.collectibles_per_player));
        }
        let total = self.total_collectibles();
        if total > MAX_COLLECTIBLES {
            return Err(ConfigError::TooManyCollectibles(total));
        }
        Ok(())
    }
}

/// Fatal configuration errors; initialization aborts and no partial
/// board is left behind.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Seats outside the supported range
    #[error("{0} players outside supported range {MIN_PLAYERS}..={MAX_PLAYERS}")]
    PlayerCount(usize),

    /// Per-seat crystal count must be a positive even number
    #[error("collectibles per player must be a positive even number, got {0}")]
    CollectiblesPerPlayer(u32),

    /// Total crystals exceed board capacity
    #[error("{0} total collectibles exceed board capacity of {MAX_COLLECTIBLES}")]
    TooManyCollectibles(u32),
}

/// Any error that can abort game initialization.
#[derive(Debug, Error)]
pub enum GameError {
    /// Rejected configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Board generation violated an internal invariant
    #[error(transparent)]
    Generation(#[from] GenerationError),
}
