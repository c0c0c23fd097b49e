//! Rendering seam
//!
//! The game hands each entity kind to a [`Renderer`] once per frame. What a
//! renderer does with it (canvas, terminal, nothing) is up to the host.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;

use crate::sim::{Invader, Player, Projectile};

/// Display surface collaborator
pub trait Renderer {
    /// Start a frame for a field of the given size
    fn begin_frame(&mut self, width: f32, height: f32);
    fn draw_player(&mut self, player: &Player);
    /// Every formation slot; implementations skip dead ones themselves
    fn draw_invaders(&mut self, invaders: &[Invader]);
    fn draw_projectiles(&mut self, projectiles: &[Projectile]);
    /// Terminal overlay carrying the outcome message
    fn draw_overlay(&mut self, message: &str);
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Begin,
    Player,
    /// Number of slots handed over
    Invaders(usize),
    /// Number of projectiles handed over
    Projectiles(usize),
    Overlay(String),
}

/// Records the calls of the most recent frame. Used by headless runs.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub calls: Vec<DrawCall>,
    /// Frames begun so far
    pub frames: u64,
}

impl Renderer for DrawList {
    fn begin_frame(&mut self, _width: f32, _height: f32) {
        self.calls.clear();
        self.frames += 1;
        self.calls.push(DrawCall::Begin);
    }

    fn draw_player(&mut self, _player: &Player) {
        self.calls.push(DrawCall::Player);
    }

    fn draw_invaders(&mut self, invaders: &[Invader]) {
        self.calls.push(DrawCall::Invaders(invaders.len()));
    }

    fn draw_projectiles(&mut self, projectiles: &[Projectile]) {
        self.calls.push(DrawCall::Projectiles(projectiles.len()));
    }

    fn draw_overlay(&mut self, message: &str) {
        self.calls.push(DrawCall::Overlay(message.to_string()));
    }
}
