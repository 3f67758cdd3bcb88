//! # Crystal Labyrinth Core Engine
//!
//! Deterministic simulation for a tile-sliding labyrinth board game:
//! players shift rows and columns of path tiles, rotate the spare tile,
//! and walk the connected maze to gather their crystals in order.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                  CRYSTAL LABYRINTH CORE                       │
//! ├──────────────────────────────────────────────────────────────┤
//! │  core/            - Deterministic primitives                  │
//! │  ├── point.rs     - Integer grid coordinates                  │
//! │  ├── projection.rs- Exact isometric screen mapping            │
//! │  ├── rng.rs       - Deterministic Xorshift128+ PRNG           │
//! │  └── hash.rs      - State hashing for verification            │
//! │                                                               │
//! │  game/            - Game logic (deterministic)                │
//! │  ├── tile.rs      - Tiles, connectors, path templates         │
//! │  ├── templates.rs - Shuffle bag of movable templates          │
//! │  ├── collectible.rs - Crystals and sprite coordinates         │
//! │  ├── player.rs    - Seats and ordered assignments             │
//! │  ├── grid.rs      - Board: generation, shifting, pathing      │
//! │  ├── engine.rs    - Turn state machine and pointer input      │
//! │  ├── tween.rs     - Presentation tweens for the render loop   │
//! │  ├── events.rs    - Observable game events                    │
//! │  └── config.rs    - Validated configuration and errors        │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The whole crate is **100% deterministic**:
//! - Integer arithmetic only, no floating point anywhere
//! - All randomness from the seeded Xorshift128+ generator
//! - No system time; animations advance on caller-supplied deltas
//!
//! Given the same configuration and pointer script, a game reproduces
//! the identical state hash on any platform. Rendering, asset loading,
//! UI screens, and network rooms live outside this crate and only
//! consume snapshots and events.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;

// Re-export commonly used types
pub use crate::core::hash::{StateHash, StateHasher};
pub use crate::core::point::Point;
pub use crate::core::projection::{IsoProjection, ScreenPoint};
pub use crate::core::rng::{derive_game_seed, DeterministicRng};
pub use crate::game::config::{ConfigError, GameConfig, GameError};
pub use crate::game::engine::{GameEngine, InfoPanelData, TurnPhase, ViewConfig};
pub use crate::game::events::GameEvent;
pub use crate::game::grid::{Grid, GRID_SIZE, INTERIOR_SIZE, SPARE_HOME};
pub use crate::game::player::{Player, PlayerSeat};
pub use crate::game::tile::{Direction, PathShape, Tile, TileKind};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
