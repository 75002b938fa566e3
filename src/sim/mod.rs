//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Injected, seeded RNG only
//! - Stable iteration order (scan order is spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod sprite;
pub mod state;
pub mod tick;

pub use collision::{aabb_overlap, check_collisions, clamp_player_bounds};
pub use sprite::{Sheet, Sprite};
pub use state::{
    Enemy, EnemyKind, Explosion, GamePhase, GameState, Player, Progression, Shell, ShellDir,
};
pub use tick::{TickInput, spawn_probability, tick};
