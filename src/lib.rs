//! Tank Raid - a top-down tank shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, combat, difficulty progression)
//! - `renderer`: Canvas 2D sprite-sheet rendering
//! - `assets`: Async image cache
//! - `input`: Held-key tracking

#[cfg(target_arch = "wasm32")]
pub mod assets;
#[cfg(target_arch = "wasm32")]
pub mod input;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod sim;

pub use sim::{GamePhase, GameState, TickInput, tick};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest wall-clock delta fed into the accumulator (tab-switch guard)
    pub const MAX_FRAME_DT: f32 = 0.25;

    /// Playfield dimensions (canvas pixels)
    pub const PLAYFIELD_WIDTH: f32 = 512.0;
    pub const PLAYFIELD_HEIGHT: f32 = 480.0;

    /// Player spawn point (left edge, vertical center)
    pub const PLAYER_START_X: f32 = 50.0;
    pub const PLAYER_START_Y: f32 = 240.0;

    /// Session-start tunables
    pub const PLAYER_SPEED_DEF: f32 = 80.0;
    pub const SHELL_SPEED_DEF: f32 = 200.0;
    pub const FIRE_COOLDOWN_DEF_MS: f32 = 700.0;
    pub const SCORE_NEXT_LEVEL_DEF: u64 = 200;

    /// Per-level tunable steps
    pub const PLAYER_SPEED_STEP: f32 = 10.0;
    pub const SHELL_SPEED_STEP: f32 = 20.0;
    pub const FIRE_COOLDOWN_STEP_MS: f32 = 50.0;

    /// Tunable caps
    pub const PLAYER_SPEED_MAX: f32 = 200.0;
    pub const SHELL_SPEED_MAX: f32 = 400.0;
    pub const FIRE_COOLDOWN_MIN_MS: f32 = 300.0;

    /// Spawn probability is 1 - SPAWN_DECAY_BASE^t, t in seconds
    pub const SPAWN_DECAY_BASE: f64 = 0.993;
    /// Live enemy cap is SPAWN_CAP_PER_LEVEL * level
    pub const SPAWN_CAP_PER_LEVEL: usize = 3;
    /// Keeps spawned enemies fully inside the bottom edge
    pub const SPAWN_Y_MARGIN: f32 = 39.0;

    /// Muzzle sits this many pixels above the player's center
    pub const MUZZLE_LIFT: f32 = 5.0;
    /// Hit flashes draw this many pixels above the struck enemy
    pub const HIT_FLASH_LIFT: f32 = 10.0;

    /// All explosion animations play at this rate
    pub const EXPLOSION_FPS: f32 = 16.0;

    /// Sprite sheet asset paths
    pub const UNITS_SHEET_PATH: &str = "img/tanks.png";
    pub const FX_SHEET_PATH: &str = "img/sprites.png";
    pub const TERRAIN_PATH: &str = "img/terrain.png";
}
