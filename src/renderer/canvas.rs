//! Canvas 2D renderer (wasm32 only)

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::Renderer;
use crate::sim::{Invader, Owner, Player, Projectile};

const BACKGROUND: &str = "#020617";
const PLAYER: &str = "#38bdf8";
const INVADER: &str = "#22c55e";
const INVADER_EYES: &str = "#022c22";
const PLAYER_SHOT: &str = "#facc15";
const INVADER_SHOT: &str = "#f97316";
const OVERLAY: &str = "rgba(15,23,42,0.75)";
const OVERLAY_TEXT: &str = "#e5e7eb";

/// Draws the game into a `<canvas>` with plain filled rectangles
pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasRenderer {
    /// Returns `None` if the canvas has no 2D context
    pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self {
            ctx,
            width: canvas.width() as f64,
            height: canvas.height() as f64,
        })
    }

    fn rect(&self, color: &str, x: f32, y: f32, w: f32, h: f32) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
    }

    fn text(&self, font: &str, text: &str, y: f64) {
        self.ctx.set_font(font);
        if let Err(e) = self.ctx.fill_text(text, self.width / 2.0, y) {
            log::warn!("fill_text failed: {:?}", e);
        }
    }
}

impl Renderer for CanvasRenderer {
    fn begin_frame(&mut self, width: f32, height: f32) {
        self.width = width as f64;
        self.height = height as f64;
        self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
        self.ctx.set_fill_style_str(BACKGROUND);
        self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
    }

    fn draw_player(&mut self, player: &Player) {
        let (p, s) = (player.pos, player.size);
        self.rect(PLAYER, p.x, p.y, s.x, s.y);
        // Turret
        self.rect(PLAYER, p.x + s.x / 2.0 - 4.0, p.y - 8.0, 8.0, 8.0);
    }

    fn draw_invaders(&mut self, invaders: &[Invader]) {
        for inv in invaders.iter().filter(|inv| inv.alive) {
            let (p, s) = (inv.pos, inv.size);
            self.rect(INVADER, p.x, p.y, s.x, s.y);
            self.rect(INVADER_EYES, p.x + 4.0, p.y + 6.0, 4.0, 4.0);
            self.rect(INVADER_EYES, p.x + s.x - 8.0, p.y + 6.0, 4.0, 4.0);
        }
    }

    fn draw_projectiles(&mut self, projectiles: &[Projectile]) {
        for shot in projectiles.iter().filter(|p| p.active) {
            let color = match shot.owner() {
                Owner::Player => PLAYER_SHOT,
                Owner::Invader => INVADER_SHOT,
            };
            self.rect(color, shot.pos.x, shot.pos.y, shot.size.x, shot.size.y);
        }
    }

    fn draw_overlay(&mut self, message: &str) {
        self.ctx.set_fill_style_str(OVERLAY);
        self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
        self.ctx.set_fill_style_str(OVERLAY_TEXT);
        self.ctx.set_text_align("center");
        let mid = self.height / 2.0;
        self.text("bold 24px system-ui", "Game Over", mid - 10.0);
        self.text("14px system-ui", message, mid + 14.0);
        self.text("14px system-ui", crate::game::RESTART_HINT, mid + 34.0);
    }
}
