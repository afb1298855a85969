//! Starvent - event-driven wave shooter core
//!
//! Core modules:
//! - `sim`: Fixed-tick simulation (event bus, entities, pool, waves, collisions, engine)
//! - `settings`: Data-driven tunables loaded from JSON
//! - `scoreboard`: Score tracking collaborator fed from the event bus

pub mod scoreboard;
pub mod settings;
pub mod sim;

pub use scoreboard::Scoreboard;
pub use settings::{Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (~60 Hz)
    pub const TICK_MS: u64 = 16;

    /// Stage dimensions
    pub const STAGE_WIDTH: f32 = 800.0;
    pub const STAGE_HEIGHT: f32 = 600.0;

    /// Minimum time between two squadron spawns
    pub const SPAWN_COOLDOWN_MS: u64 = 3000;
    /// Squadrons per wave
    pub const WAVE_LENGTH: usize = 30;
    /// Enemies allowed past the player before the run ends
    pub const OVERRUN_LIMIT: u32 = 10;
    /// How long wave banners stay on screen
    pub const MESSAGE_DURATION_MS: u64 = 2000;

    /// Enemy defaults
    pub const ENEMY_SIZE: f32 = 12.0;
    pub const ENEMY_SPEED: f32 = 1.5;
    pub const ENEMY_FRICTION: f32 = 0.05;
    /// Speed multiplier for enemies spawned under a status effect
    pub const EFFECTED_SPEED_FACTOR: f32 = 0.5;

    /// Laser defaults
    pub const LASER_SIZE: f32 = 3.0;
    pub const LASER_SPEED: f32 = 9.0;

    /// Asteroid size range
    pub const ASTEROID_MIN_SIZE: f32 = 15.0;
    pub const ASTEROID_MAX_SIZE: f32 = 30.0;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 30.0;
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const PLAYER_FRICTION: f32 = 0.8;

    /// Game-over causes
    pub const CAUSE_OVERRUN: &str = "Valiant effort, but you were overrun.";
    pub const CAUSE_PLAYER_DEAD: &str = "Your hero is dead.";
}

/// Move `current` toward `goal` by at most `step`, never overshooting
#[inline]
pub fn approach(goal: f32, current: f32, step: f32) -> f32 {
    let diff = goal - current;
    if diff > step {
        current + step
    } else if diff < -step {
        current - step
    } else {
        goal
    }
}
