//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies
//!
//! Side effects (sound, share) are expressed as `GameEvent`s returned from
//! `tick` and consumed by the platform glue.

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::Rect;
pub use state::{GameEvent, GamePhase, GameState, Obstacle, Player};
pub use tick::{TickInput, tick};
