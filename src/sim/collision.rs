//! Collision detection and combat resolution
//!
//! Everything on the field is an axis-aligned box: top-left corner plus the
//! sprite's frame size. One pass per tick resolves shell hits, scoring,
//! level-ups, and player contact.

use glam::Vec2;

use super::state::{Explosion, GamePhase, GameState};
use crate::consts::*;

/// Axis-aligned overlap test for boxes given as top-left corner + size.
///
/// Edge contact is asymmetric: a box ending exactly where the other begins
/// counts as separate on one side of each axis and as touching on the other.
#[inline]
pub fn aabb_overlap(pos: Vec2, size: Vec2, pos2: Vec2, size2: Vec2) -> bool {
    let (left, top) = (pos.x, pos.y);
    let (right, bottom) = (pos.x + size.x, pos.y + size.y);
    let (left2, top2) = (pos2.x, pos2.y);
    let (right2, bottom2) = (pos2.x + size2.x, pos2.y + size2.y);

    !(right <= left2 || left > right2 || bottom <= top2 || top > bottom2)
}

/// Clamp the player fully inside the playfield.
pub fn clamp_player_bounds(state: &mut GameState) {
    let max = Vec2::new(PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT) - state.player.sprite.size;
    state.player.pos = state.player.pos.clamp(Vec2::ZERO, max);
}

/// Resolve this tick's collisions.
///
/// For each enemy, in order: consume at most one overlapping shell, apply
/// damage, score and level-up on a kill, then test the survivor against the
/// player. A destroyed enemy is gone before the player test runs.
pub fn check_collisions(state: &mut GameState) {
    clamp_player_bounds(state);

    let mut i = 0;
    while i < state.enemies.len() {
        let enemy_pos = state.enemies[i].pos;
        let enemy_size = state.enemies[i].sprite.size;
        let mut destroyed = false;

        let mut j = 0;
        while j < state.shells.len() {
            let hit = {
                let shell = &state.shells[j];
                aabb_overlap(enemy_pos, enemy_size, shell.pos, shell.sprite.size)
            };
            if !hit {
                j += 1;
                continue;
            }

            state.shells.remove(j);
            let enemy = &mut state.enemies[i];
            enemy.health = enemy.health.saturating_sub(1);

            if enemy.health == 0 {
                let value = enemy.score_value;
                state.enemies.remove(i);
                destroyed = true;

                state.progression.score += value;
                if state.progression.score >= state.progression.score_next_level {
                    state.progression.advance_level();
                }
                state.explosions.push(Explosion::death(enemy_pos));
            } else {
                state
                    .explosions
                    .push(Explosion::hit_flash(enemy_pos - Vec2::new(0.0, HIT_FLASH_LIFT)));
            }
            // At most one shell per enemy per tick
            break;
        }

        if destroyed {
            // Slot i now holds the next enemy
            continue;
        }

        if aabb_overlap(
            enemy_pos,
            enemy_size,
            state.player.pos,
            state.player.sprite.size,
        ) {
            state.phase = GamePhase::GameOver;
        }
        i += 1;
    }
}
