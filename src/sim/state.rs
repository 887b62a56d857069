//! Game state and core simulation types

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::Rect;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Waiting for the player to press start; no physics runs
    Start,
    /// Active gameplay
    Playing,
    /// Run ended by collision; state is frozen for display until restart
    GameOver,
}

/// Events emitted by the simulation step, consumed by the platform glue
/// (audio cues, overlay updates). The step itself performs no side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A jump input was honored
    Jumped,
    /// The player hit an obstacle; phase is now `GameOver`
    Collided,
}

/// The player rectangle. x is fixed; only the vertical axis is simulated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    pub velocity_y: f32,
    /// Jumps consumed since the last ground contact
    pub jump_count: u32,
    pub max_jumps: u32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(PLAYER_X, GROUND_Y),
            velocity_y: 0.0,
            jump_count: 0,
            max_jumps: MAX_JUMPS,
        }
    }
}

impl Player {
    /// Attempt a jump. Honored only while jumps remain; returns whether it
    /// was. A refused jump is a silent no-op — jump chances replenish solely
    /// on ground contact, inside the tick's ground clamp.
    pub fn try_jump(&mut self) -> bool {
        if self.jump_count < self.max_jumps {
            self.velocity_y = -JUMP_STRENGTH;
            self.jump_count += 1;
            true
        } else {
            false
        }
    }

    /// Jumps still available before the next ground contact is required
    pub fn jumps_remaining(&self) -> u32 {
        self.max_jumps.saturating_sub(self.jump_count)
    }

    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
        }
    }
}

/// An obstacle scrolling leftward at the game speed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Obstacle {
    /// Spawn at the right edge of the field, resting on the ground
    pub fn at_right_edge() -> Self {
        Self {
            pos: Vec2::new(FIELD_WIDTH, FIELD_HEIGHT - OBSTACLE_HEIGHT),
            size: Vec2::new(OBSTACLE_WIDTH, OBSTACLE_HEIGHT),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    /// Keep condition: an obstacle lives until its right edge has passed the
    /// field's left edge
    pub fn is_on_field(&self) -> bool {
        self.pos.x > -self.size.x
    }
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub player: Player,
    /// Live obstacles in spawn order (swept linearly each tick)
    pub obstacles: Vec<Obstacle>,
    /// Scrolling background offset, advanced with the obstacles
    pub background_offset: f32,
    pub game_speed: f32,
    /// Increments by 1 every playing tick
    pub score: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl GameState {
    /// Create a fresh state in the `Start` phase
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Start,
            player: Player::default(),
            obstacles: Vec::new(),
            background_offset: 0.0,
            game_speed: GAME_SPEED,
            score: 0,
            time_ticks: 0,
        }
    }

    /// Start or restart a run: simulation state and score are rebuilt
    /// atomically, then the phase flips to `Playing`. Re-entrant from
    /// `GameOver`. The RNG keeps advancing across runs so restarts don't
    /// replay the same obstacle pattern.
    pub fn start(&mut self) {
        self.player = Player::default();
        self.obstacles.clear();
        self.background_offset = 0.0;
        self.game_speed = GAME_SPEED;
        self.score = 0;
        self.phase = GamePhase::Playing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_passive() {
        let state = GameState::new(42);
        assert_eq!(state.phase, GamePhase::Start);
        assert_eq!(state.score, 0);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.player.pos, Vec2::new(PLAYER_X, GROUND_Y));
    }

    #[test]
    fn test_start_resets_everything() {
        let mut state = GameState::new(42);
        state.start();
        state.score = 999;
        state.obstacles.push(Obstacle::at_right_edge());
        state.player.pos.y = 100.0;
        state.player.velocity_y = -3.0;
        state.player.jump_count = 2;
        state.phase = GamePhase::GameOver;

        state.start();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.player.pos.y, GROUND_Y);
        assert_eq!(state.player.velocity_y, 0.0);
        assert_eq!(state.player.jump_count, 0);
    }

    #[test]
    fn test_jump_gating() {
        let mut player = Player::default();
        assert!(player.try_jump());
        assert_eq!(player.velocity_y, -JUMP_STRENGTH);
        assert!(player.try_jump());
        assert_eq!(player.jump_count, 2);
        assert_eq!(player.jumps_remaining(), 0);

        // Third attempt is a silent no-op
        player.velocity_y = -3.25;
        assert!(!player.try_jump());
        assert_eq!(player.velocity_y, -3.25);
        assert_eq!(player.jump_count, 2);
    }

    #[test]
    fn test_obstacle_keep_condition() {
        let mut o = Obstacle::at_right_edge();
        assert!(o.is_on_field());
        o.pos.x = -OBSTACLE_WIDTH + 0.5;
        assert!(o.is_on_field());
        // Right edge exactly at the field's left edge: gone
        o.pos.x = -OBSTACLE_WIDTH;
        assert!(!o.is_on_field());
    }
}
