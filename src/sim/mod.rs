//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only arrives as an explicit `dt`
//! - Randomness only through an injected `Rng`
//! - Stable iteration order (formation slots never move)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entities;
pub mod formation;
pub mod state;
pub mod tick;

pub use collision::Aabb;
pub use entities::{Invader, Owner, Player, Projectile};
pub use formation::{FormationReport, InvaderFormation};
pub use state::{
    GameEvent, GamePhase, GameState, LOSS_DESTROYED, LOSS_INVASION, Outcome, WIN_MESSAGE,
};
pub use tick::{TickInput, tick};
