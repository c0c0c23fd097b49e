//! Game state and core simulation types

use serde::{Deserialize, Serialize};

use super::entities::{Player, Projectile};
use super::formation::InvaderFormation;
use crate::config::GameConfig;
use crate::consts::PLAYER_START_LIVES;

pub const WIN_MESSAGE: &str = "All invaders defeated!";
pub const LOSS_INVASION: &str = "The invasion reached Earth!";
pub const LOSS_DESTROYED: &str = "Your ship was destroyed.";

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Built or reset, loop not yet started
    #[default]
    Idle,
    /// Loop active, ticks accepted
    Running,
    /// Terminal until reset
    Over,
}

/// How a finished game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
}

/// Observable changes produced by a tick or a reset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged(u32),
    LivesChanged(u32),
    /// An invader slot was destroyed
    InvaderKilled { slot: usize },
    PlayerHit,
    FormationFlipped { speed: f32 },
    GameOver { outcome: Outcome, message: String },
    /// Terminal message cleared by reset
    StatusCleared,
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub screen_width: f32,
    pub screen_height: f32,
    pub player: Player,
    pub formation: InvaderFormation,
    /// Live projectiles, in spawn order
    pub projectiles: Vec<Projectile>,
    pub score: u32,
    pub lives: u32,
    pub phase: GamePhase,
    /// Set once, by whichever of win/loss happens first
    pub outcome: Option<Outcome>,
    /// Terminal message shown while over
    pub message: Option<String>,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl GameState {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            screen_width: config.screen_width,
            screen_height: config.screen_height,
            player: Player::new(config.screen_width, config.screen_height),
            formation: InvaderFormation::new(config.screen_width),
            projectiles: Vec::new(),
            score: 0,
            lives: PLAYER_START_LIVES,
            phase: GamePhase::Idle,
            outcome: None,
            message: None,
            time_ticks: 0,
        }
    }

    /// Rebuild everything in place, whatever the current phase.
    /// Returns the HUD-visible values that changed.
    pub fn reset(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.score != 0 {
            events.push(GameEvent::ScoreChanged(0));
        }
        if self.lives != PLAYER_START_LIVES {
            events.push(GameEvent::LivesChanged(PLAYER_START_LIVES));
        }
        if self.message.is_some() {
            events.push(GameEvent::StatusCleared);
        }

        self.player = Player::new(self.screen_width, self.screen_height);
        self.formation = InvaderFormation::new(self.screen_width);
        self.projectiles.clear();
        self.score = 0;
        self.lives = PLAYER_START_LIVES;
        self.phase = GamePhase::Idle;
        self.outcome = None;
        self.message = None;
        self.time_ticks = 0;
        events
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::Over
    }

    pub fn win(&mut self, reason: &str) -> Option<GameEvent> {
        self.finish(Outcome::Win, reason)
    }

    pub fn lose(&mut self, reason: &str) -> Option<GameEvent> {
        self.finish(Outcome::Loss, reason)
    }

    /// Terminal transition guard. The first call wins; later calls are ignored.
    fn finish(&mut self, outcome: Outcome, reason: &str) -> Option<GameEvent> {
        if self.is_over() {
            return None;
        }
        self.phase = GamePhase::Over;
        self.outcome = Some(outcome);
        self.message = Some(reason.to_string());
        log::info!(
            "Game over ({:?}) after {} ticks: {} score={} lives={}",
            outcome,
            self.time_ticks,
            reason,
            self.score,
            self.lives
        );
        Some(GameEvent::GameOver {
            outcome,
            message: reason.to_string(),
        })
    }
}
