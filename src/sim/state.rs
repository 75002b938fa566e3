//! Game state and core simulation types
//!
//! Everything the simulation mutates frame to frame lives here. The state is
//! plain data: serializable, cloneable, and free of platform handles.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::sprite::{Sheet, Sprite};
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Player was overrun; world keeps moving but input is ignored
    GameOver,
}

/// Enemy classes, from fast-and-fragile to slow-and-tough
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Wheeled carrier: fast, dies to one shell
    Btr,
    /// Medium tank
    Tank,
    /// Self-propelled gun: crawls, soaks five shells
    Sau,
    /// Towed cannon: fragile but worth the most
    Cannon,
}

impl EnemyKind {
    /// All kinds, in spawn-roll order
    pub const ALL: [EnemyKind; 4] = [
        EnemyKind::Btr,
        EnemyKind::Tank,
        EnemyKind::Sau,
        EnemyKind::Cannon,
    ];

    /// Shells needed to destroy this kind
    pub fn health(self) -> u32 {
        match self {
            EnemyKind::Btr => 1,
            EnemyKind::Tank => 3,
            EnemyKind::Sau => 5,
            EnemyKind::Cannon => 1,
        }
    }

    /// Leftward drift speed in pixels per second
    pub fn speed(self) -> f32 {
        match self {
            EnemyKind::Btr => 100.0,
            EnemyKind::Tank => 50.0,
            EnemyKind::Sau => 20.0,
            EnemyKind::Cannon => 50.0,
        }
    }

    /// Points awarded on destruction
    pub fn score_value(self) -> u64 {
        match self {
            EnemyKind::Btr => 50,
            EnemyKind::Tank => 100,
            EnemyKind::Sau => 200,
            EnemyKind::Cannon => 300,
        }
    }

    /// Body sprite in the units sheet
    pub fn sprite(self) -> Sprite {
        let (source, size) = match self {
            EnemyKind::Btr => (Vec2::new(42.0, 40.0), Vec2::new(35.0, 13.0)),
            EnemyKind::Tank => (Vec2::new(42.0, 20.0), Vec2::new(35.0, 17.0)),
            EnemyKind::Sau => (Vec2::new(42.0, 0.0), Vec2::new(35.0, 17.0)),
            EnemyKind::Cannon => (Vec2::new(42.0, 58.0), Vec2::new(35.0, 14.0)),
        };
        Sprite::fixed(Sheet::Units, source, size)
    }
}

/// Firing directions for a volley. Which of these get used grows with level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShellDir {
    /// Straight right
    Forward,
    /// Diagonal up-right
    Top,
    /// Diagonal down-right
    Bottom,
    /// Straight up
    Up,
    /// Straight down
    Down,
    /// Shallow up-right
    ForwardTop,
    /// Shallow down-right
    ForwardBottom,
}

impl ShellDir {
    /// Velocity for a shell flying this way at `speed` pixels per second.
    /// The y axis points down, so upward components are negative.
    pub fn velocity(self, speed: f32) -> Vec2 {
        let factors = match self {
            ShellDir::Forward => Vec2::new(1.0, 0.0),
            ShellDir::Top => Vec2::new(0.7, -0.7),
            ShellDir::Bottom => Vec2::new(0.7, 0.7),
            ShellDir::Up => Vec2::new(0.0, -1.0),
            ShellDir::Down => Vec2::new(0.0, 1.0),
            ShellDir::ForwardTop => Vec2::new(1.0, -0.3),
            ShellDir::ForwardBottom => Vec2::new(1.0, 0.3),
        };
        factors * speed
    }

    /// Projectile sprite in the fx sheet
    pub fn sprite(self) -> Sprite {
        let (source, size) = match self {
            ShellDir::Forward | ShellDir::ForwardTop | ShellDir::ForwardBottom => {
                (Vec2::new(0.0, 39.0), Vec2::new(18.0, 8.0))
            }
            ShellDir::Top | ShellDir::Bottom | ShellDir::Up => {
                (Vec2::new(0.0, 50.0), Vec2::new(9.0, 5.0))
            }
            ShellDir::Down => (Vec2::new(0.0, 60.0), Vec2::new(9.0, 5.0)),
        };
        Sprite::fixed(Sheet::Fx, source, size)
    }
}

/// The player's tank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub sprite: Sprite,
}

impl Player {
    pub fn new() -> Self {
        Self {
            pos: Vec2::new(PLAYER_START_X, PLAYER_START_Y),
            sprite: Sprite::fixed(Sheet::Units, Vec2::new(0.0, 96.0), Vec2::new(35.0, 17.0)),
        }
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

/// An enemy vehicle drifting in from the right edge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub sprite: Sprite,
    /// Hits left before destruction; live enemies always have at least 1
    pub health: u32,
    pub speed: f32,
    pub score_value: u64,
}

impl Enemy {
    pub fn new(kind: EnemyKind, pos: Vec2) -> Self {
        Self {
            pos,
            sprite: kind.sprite(),
            health: kind.health(),
            speed: kind.speed(),
            score_value: kind.score_value(),
        }
    }
}

/// A shell in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shell {
    pub pos: Vec2,
    pub dir: ShellDir,
    pub sprite: Sprite,
}

impl Shell {
    pub fn new(pos: Vec2, dir: ShellDir) -> Self {
        Self {
            pos,
            dir,
            sprite: dir.sprite(),
        }
    }
}

/// A transient explosion animation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: Vec2,
    pub sprite: Sprite,
}

impl Explosion {
    /// Full 13-frame blast played where an enemy died.
    pub fn death(pos: Vec2) -> Self {
        Self {
            pos,
            sprite: Sprite::animated(
                Sheet::Fx,
                Vec2::new(0.0, 117.0),
                Vec2::new(39.0, 39.0),
                EXPLOSION_FPS,
                (0..13).collect(),
                true,
            ),
        }
    }

    /// Short 6-frame flash for a non-lethal hit.
    pub fn hit_flash(pos: Vec2) -> Self {
        Self {
            pos,
            sprite: Sprite::animated(
                Sheet::Fx,
                Vec2::new(0.0, 117.0),
                Vec2::new(39.0, 39.0),
                EXPLOSION_FPS,
                vec![0, 1, 2, 10, 11, 12],
                true,
            ),
        }
    }
}

/// Score, level, and the tunables that scale with level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Progression {
    pub score: u64,
    /// 1-based difficulty level
    pub level: u32,
    /// Score threshold that triggers the next level
    pub score_next_level: u64,
    pub player_speed: f32,
    pub shell_speed: f32,
    /// Minimum milliseconds between volleys
    pub fire_cooldown_ms: f32,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            score: 0,
            level: 1,
            score_next_level: SCORE_NEXT_LEVEL_DEF,
            player_speed: PLAYER_SPEED_DEF,
            shell_speed: SHELL_SPEED_DEF,
            fire_cooldown_ms: FIRE_COOLDOWN_DEF_MS,
        }
    }
}

impl Progression {
    /// Double the threshold, bump the level, and step each tunable toward
    /// its cap.
    pub fn advance_level(&mut self) {
        self.score_next_level *= 2;
        self.level += 1;

        if self.player_speed < PLAYER_SPEED_MAX {
            self.player_speed += PLAYER_SPEED_STEP;
        }
        if self.shell_speed < SHELL_SPEED_MAX {
            self.shell_speed += SHELL_SPEED_STEP;
        }
        if self.fire_cooldown_ms > FIRE_COOLDOWN_MIN_MS {
            self.fire_cooldown_ms -= FIRE_COOLDOWN_STEP_MS;
        }
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Elapsed session time in seconds
    pub game_time: f64,
    pub phase: GamePhase,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub shells: Vec<Shell>,
    pub explosions: Vec<Explosion>,
    pub progression: Progression,
    /// Game time of the last volley; None until the first shot
    pub last_fire: Option<f64>,
}

impl GameState {
    /// A fresh session: defaults restored, field cleared, player at the
    /// start position.
    pub fn new() -> Self {
        Self {
            game_time: 0.0,
            phase: GamePhase::Playing,
            player: Player::new(),
            enemies: Vec::new(),
            shells: Vec::new(),
            explosions: Vec::new(),
            progression: Progression::default(),
            last_fire: None,
        }
    }

    /// Return the session to its launch state. The only way out of
    /// [`GamePhase::GameOver`].
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
