//! Game Logic Module
//!
//! All board simulation code. 100% deterministic.
//!
//! ## Module Structure
//!
//! - `tile`: tiles, connectors, path templates
//! - `templates`: shuffle bag of movable templates
//! - `collectible`: crystals and sprite coordinates
//! - `player`: seats and ordered assignments
//! - `grid`: the board - generation, shifting, connectivity, pathing
//! - `engine`: turn state machine and pointer input
//! - `tween`: presentation tweens for the render loop
//! - `events`: observable game events
//! - `config`: validated configuration and errors

pub mod collectible;
pub mod config;
pub mod engine;
pub mod events;
pub mod grid;
pub mod player;
pub mod templates;
pub mod tile;
pub mod tween;

// Re-export key types
pub use collectible::{Collectible, CollectibleId};
pub use config::{ConfigError, GameConfig, GameError};
pub use engine::{GameEngine, InfoPanelData, TurnPhase, ViewConfig};
pub use events::GameEvent;
pub use grid::{GenerationError, Grid, MoveRecord, MoveSegment, ShiftOutcome};
pub use player::{Player, PlayerSeat};
pub use tile::{Connectors, Direction, PathShape, Tile, TileKind};
