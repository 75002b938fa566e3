//! Sprite sheet frames and strip animation
//!
//! Every entity carries a [`Sprite`]: a source rectangle in one of the two
//! sheets, plus an optional frame strip. Animated strips advance left to
//! right, one frame width per index.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Which sheet a sprite samples from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sheet {
    /// Tank bodies (player and enemies)
    Units,
    /// Shells and explosions
    Fx,
}

/// A drawable region of a sprite sheet, optionally animated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sprite {
    pub sheet: Sheet,
    /// Top-left corner of frame 0 in the sheet (pixels)
    pub source: Vec2,
    /// Frame size in pixels, doubling as the entity's collision footprint
    pub size: Vec2,
    /// Frames advanced per second (0 for static sprites)
    fps: f32,
    /// Frame indices to cycle through
    frames: Vec<u32>,
    /// Play the strip once instead of looping
    once: bool,
    /// Fractional frame cursor
    index: f32,
    /// Set when a play-once strip has shown its last frame
    pub done: bool,
}

impl Sprite {
    /// A static single-frame sprite. Never reports `done`.
    pub fn fixed(sheet: Sheet, source: Vec2, size: Vec2) -> Self {
        Self {
            sheet,
            source,
            size,
            fps: 0.0,
            frames: Vec::new(),
            once: false,
            index: 0.0,
            done: false,
        }
    }

    /// An animated strip playing `frames` at `fps`.
    pub fn animated(
        sheet: Sheet,
        source: Vec2,
        size: Vec2,
        fps: f32,
        frames: Vec<u32>,
        once: bool,
    ) -> Self {
        Self {
            sheet,
            source,
            size,
            fps,
            frames,
            once,
            index: 0.0,
            done: false,
        }
    }

    /// Advance the frame cursor. No-op for static sprites.
    pub fn update(&mut self, dt: f32) {
        if self.fps > 0.0 {
            self.index += self.fps * dt;
            if self.once && self.index as usize >= self.frames.len() {
                self.done = true;
            }
        }
    }

    /// Frame to draw this tick, as a horizontal offset count from `source`.
    pub fn current_frame(&self) -> u32 {
        if self.fps > 0.0 && !self.frames.is_empty() {
            self.frames[self.index as usize % self.frames.len()]
        } else {
            0
        }
    }
}
