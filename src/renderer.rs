//! Canvas renderer for the browser build.
//!
//! Draws straight to a 2d context: terrain pattern fill, then every live
//! entity as a sprite-sheet blit. All drawing happens here once per animation
//! frame; the simulation never touches the canvas.

use glam::Vec2;
use wasm_bindgen::JsValue;
use web_sys::{CanvasPattern, CanvasRenderingContext2d, HtmlImageElement};

use crate::assets::ResourceCache;
use crate::consts::*;
use crate::sim::{GamePhase, GameState, Sheet, Sprite};

pub struct Renderer {
    ctx: CanvasRenderingContext2d,
    units: HtmlImageElement,
    fx: HtmlImageElement,
    terrain: CanvasPattern,
}

impl Renderer {
    /// Builds a renderer over a 2d context. Every sheet must already be in
    /// the cache, so construct only after [`ResourceCache::on_ready`] fires.
    pub fn new(ctx: CanvasRenderingContext2d, cache: &ResourceCache) -> Result<Self, JsValue> {
        let units = cache
            .get(UNITS_SHEET_PATH)
            .ok_or_else(|| JsValue::from_str("units sheet not loaded"))?;
        let fx = cache
            .get(FX_SHEET_PATH)
            .ok_or_else(|| JsValue::from_str("fx sheet not loaded"))?;
        let terrain_img = cache
            .get(TERRAIN_PATH)
            .ok_or_else(|| JsValue::from_str("terrain tile not loaded"))?;
        let terrain = ctx
            .create_pattern_with_html_image_element(&terrain_img, "repeat")?
            .ok_or_else(|| JsValue::from_str("terrain pattern unavailable"))?;

        Ok(Self {
            ctx,
            units,
            fx,
            terrain,
        })
    }

    /// Draws one frame: terrain, then player, shells, enemies, explosions.
    pub fn render(&self, state: &GameState) -> Result<(), JsValue> {
        self.ctx.set_fill_style_canvas_pattern(&self.terrain);
        self.ctx.fill_rect(
            0.0,
            0.0,
            f64::from(PLAYFIELD_WIDTH),
            f64::from(PLAYFIELD_HEIGHT),
        );

        // No player sprite once the run is over
        if state.phase != GamePhase::GameOver {
            self.draw_sprite(&state.player.sprite, state.player.pos)?;
        }

        for shell in &state.shells {
            self.draw_sprite(&shell.sprite, shell.pos)?;
        }
        for enemy in &state.enemies {
            self.draw_sprite(&enemy.sprite, enemy.pos)?;
        }
        for explosion in &state.explosions {
            self.draw_sprite(&explosion.sprite, explosion.pos)?;
        }
        Ok(())
    }

    fn sheet(&self, sheet: Sheet) -> &HtmlImageElement {
        match sheet {
            Sheet::Units => &self.units,
            Sheet::Fx => &self.fx,
        }
    }

    /// Blits the sprite's current frame at `pos`. Frames sit side by side in
    /// the sheet starting at the sprite's source rect.
    fn draw_sprite(&self, sprite: &Sprite, pos: Vec2) -> Result<(), JsValue> {
        if sprite.done {
            return Ok(());
        }
        let frame = sprite.current_frame();
        let sx = f64::from(sprite.source.x + frame as f32 * sprite.size.x);
        let sy = f64::from(sprite.source.y);
        let w = f64::from(sprite.size.x);
        let h = f64::from(sprite.size.y);

        self.ctx.save();
        self.ctx.translate(f64::from(pos.x), f64::from(pos.y))?;
        self.ctx
            .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                self.sheet(sprite.sheet),
                sx,
                sy,
                w,
                h,
                0.0,
                0.0,
                w,
                h,
            )?;
        self.ctx.restore();
        Ok(())
    }
}
