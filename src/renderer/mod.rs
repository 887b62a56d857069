//! 2D canvas rendering
//!
//! Pure read of the simulation state. All game objects are drawn in logical
//! field coordinates (800x400); a uniform letterboxed scale maps them onto
//! the device-pixel canvas, so simulation coordinates are independent of the
//! viewport size.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::*;
use crate::sim::GameState;

const SKY_COLOR: &str = "#87CEEB";
const GROUND_COLOR: &str = "#2E8B57";
const GROUND_TICK_COLOR: &str = "#24704A";
const PLAYER_COLOR: &str = "red";
const OBSTACLE_COLOR: &str = "black";
const HUD_COLOR: &str = "black";
const HUD_FONT: &str = "20px sans-serif";

/// Spacing of the ground tick marks that make the scroll visible
const GROUND_TICK_SPACING: f64 = 80.0;

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    /// Logical-to-device scale factor
    scale: f64,
    /// Letterbox offset in device pixels
    offset: (f64, f64),
    /// Device pixel size of the backing store
    size: (u32, u32),
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        let width = canvas.width();
        let height = canvas.height();
        let mut renderer = Self {
            canvas,
            ctx,
            scale: 1.0,
            offset: (0.0, 0.0),
            size: (width, height),
        };
        renderer.resize(width, height);
        Ok(renderer)
    }

    /// Resize the backing store and recompute the draw scale. Called on
    /// startup and on every viewport resize/orientation change.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.size = (width, height);

        let sx = width as f64 / FIELD_WIDTH as f64;
        let sy = height as f64 / FIELD_HEIGHT as f64;
        self.scale = sx.min(sy);
        self.offset = (
            (width as f64 - FIELD_WIDTH as f64 * self.scale) / 2.0,
            (height as f64 - FIELD_HEIGHT as f64 * self.scale) / 2.0,
        );
    }

    /// Paint the current state: background, ground strip, player, obstacles,
    /// score/jumps overlay
    pub fn draw(&self, state: &GameState, fps: Option<u32>) {
        let ctx = &self.ctx;

        // Clear the full device surface, then enter logical coordinates
        let _ = ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
        ctx.clear_rect(0.0, 0.0, self.size.0 as f64, self.size.1 as f64);
        let _ = ctx.set_transform(
            self.scale,
            0.0,
            0.0,
            self.scale,
            self.offset.0,
            self.offset.1,
        );

        ctx.set_fill_style_str(SKY_COLOR);
        ctx.fill_rect(0.0, 0.0, FIELD_WIDTH as f64, FIELD_HEIGHT as f64);

        self.draw_ground(state.background_offset as f64);

        ctx.set_fill_style_str(PLAYER_COLOR);
        ctx.fill_rect(
            state.player.pos.x as f64,
            state.player.pos.y as f64,
            PLAYER_WIDTH as f64,
            PLAYER_HEIGHT as f64,
        );

        ctx.set_fill_style_str(OBSTACLE_COLOR);
        for obstacle in &state.obstacles {
            ctx.fill_rect(
                obstacle.pos.x as f64,
                obstacle.pos.y as f64,
                obstacle.size.x as f64,
                obstacle.size.y as f64,
            );
        }

        ctx.set_fill_style_str(HUD_COLOR);
        ctx.set_font(HUD_FONT);
        let _ = ctx.fill_text(&format!("Score: {}", state.score), 10.0, 30.0);
        let _ = ctx.fill_text(
            &format!("Jumps: {}", state.player.jumps_remaining()),
            10.0,
            60.0,
        );
        if let Some(fps) = fps {
            let _ = ctx.fill_text(&format!("{} fps", fps), 10.0, 90.0);
        }
    }

    /// Ground strip with scrolling tick marks driven by the background offset
    fn draw_ground(&self, background_offset: f64) {
        let ctx = &self.ctx;
        let top = (FIELD_HEIGHT - GROUND_THICKNESS) as f64;

        ctx.set_fill_style_str(GROUND_COLOR);
        ctx.fill_rect(0.0, top, FIELD_WIDTH as f64, GROUND_THICKNESS as f64);

        ctx.set_fill_style_str(GROUND_TICK_COLOR);
        let phase = background_offset.rem_euclid(GROUND_TICK_SPACING);
        let mut x = phase - GROUND_TICK_SPACING;
        while x < FIELD_WIDTH as f64 {
            ctx.fill_rect(x, top, 4.0, GROUND_THICKNESS as f64);
            x += GROUND_TICK_SPACING;
        }
    }
}
