//! Grid Invaders - A fixed-formation space invaders arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, formation AI, collisions, tick)
//! - `game`: Win/lose state machine, frame clock and host collaborator traits
//! - `renderer`: Draw-call seam between the game and a display surface
//! - `config`: Arena size and seed loaded from JSON

pub mod config;
pub mod game;
pub mod renderer;
pub mod sim;

pub use config::GameConfig;
pub use game::{FixedRateScheduler, FrameScheduler, Game, GamePhase, Hud, InputSource, run};
pub use renderer::Renderer;

/// Game configuration constants
pub mod consts {
    /// Default arena dimensions
    pub const SCREEN_WIDTH: f32 = 480.0;
    pub const SCREEN_HEIGHT: f32 = 640.0;

    /// Largest simulated step per frame (seconds)
    pub const MAX_FRAME_DT: f64 = 0.033;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 18.0;
    /// Gap between the player's bottom edge and the bottom of the arena
    pub const PLAYER_BOTTOM_GAP: f32 = 16.0;
    pub const PLAYER_SPEED: f32 = 280.0;
    /// Seconds between player shots
    pub const PLAYER_SHOOT_COOLDOWN: f32 = 0.3;
    pub const PLAYER_START_LIVES: u32 = 3;

    /// Projectile defaults
    pub const PROJECTILE_WIDTH: f32 = 4.0;
    pub const PROJECTILE_HEIGHT: f32 = 10.0;
    pub const PLAYER_PROJECTILE_SPEED: f32 = -320.0;
    /// Spawn height above the player's top edge
    pub const PLAYER_PROJECTILE_OFFSET: f32 = 10.0;
    pub const INVADER_PROJECTILE_SPEED: f32 = 200.0;
    /// Spawn gap below the shooter's bottom edge
    pub const INVADER_PROJECTILE_OFFSET: f32 = 4.0;
    /// Projectiles survive this far past the top/bottom edge
    pub const PROJECTILE_BOUNDS_MARGIN: f32 = 20.0;

    /// Invader formation layout
    pub const INVADER_ROWS: usize = 4;
    pub const INVADER_COLS: usize = 8;
    pub const INVADER_WIDTH: f32 = 28.0;
    pub const INVADER_HEIGHT: f32 = 20.0;
    pub const FORMATION_MARGIN_X: f32 = 40.0;
    pub const FORMATION_MARGIN_Y: f32 = 40.0;
    pub const FORMATION_SPACING_X: f32 = 50.0;
    pub const FORMATION_SPACING_Y: f32 = 32.0;
    /// Formation motion
    pub const FORMATION_START_SPEED: f32 = 40.0;
    /// Speed multiplier applied on every direction flip
    pub const FORMATION_SPEED_UP: f32 = 1.05;
    pub const FORMATION_DROP_STEP: f32 = 18.0;
    /// Flip when the formation comes this close to a side wall
    pub const FORMATION_EDGE_MARGIN: f32 = 10.0;
    /// Per-tick chance that one invader fires
    pub const INVADER_FIRE_CHANCE: f32 = 0.02;

    /// Points per invader destroyed
    pub const KILL_SCORE: u32 = 100;
}
