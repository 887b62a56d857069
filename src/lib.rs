//! Scroll Runner - a side-scrolling double-jump runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, game state)
//! - `renderer`: 2D canvas rendering
//! - `platform`: Messaging-app SDK bridge (profile, share, in-client flag)
//! - `audio`: Procedural Web Audio sound effects
//! - `settings`: User preferences persisted to LocalStorage

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod platform;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 5;

    /// Logical play field dimensions; the renderer scales to the viewport
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 400.0;
    /// Height of the painted ground strip
    pub const GROUND_THICKNESS: f32 = 50.0;

    /// Player rectangle
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 50.0;
    /// Horizontal position is fixed; the world scrolls past the player
    pub const PLAYER_X: f32 = 100.0;
    /// Top-of-player coordinate while standing on the ground line
    pub const GROUND_Y: f32 = FIELD_HEIGHT - PLAYER_HEIGHT;

    /// Obstacle rectangle
    pub const OBSTACLE_WIDTH: f32 = 30.0;
    pub const OBSTACLE_HEIGHT: f32 = 60.0;

    /// Per-tick physics quantities (the step runs at a fixed 60 Hz)
    pub const GRAVITY: f32 = 0.5;
    pub const JUMP_STRENGTH: f32 = 10.0;
    pub const GAME_SPEED: f32 = 5.0;
    /// Per-tick obstacle spawn probability
    pub const SPAWN_CHANCE: f32 = 0.02;

    /// Jumps allowed between ground contacts (2 = double jump)
    pub const MAX_JUMPS: u32 = 2;
}
