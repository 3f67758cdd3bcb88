//! Core deterministic primitives.
//!
//! All types in this module are designed for perfect cross-platform
//! determinism: integer arithmetic only, no wall clock, no ambient
//! randomness.

pub mod hash;
pub mod point;
pub mod projection;
pub mod rng;

// Re-export core types
pub use hash::{compute_state_hash, StateHash};
pub use point::Point;
pub use projection::{IsoProjection, ScreenPoint};
pub use rng::DeterministicRng;
