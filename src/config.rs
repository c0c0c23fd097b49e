//! Arena configuration
//!
//! Gameplay tuning lives in [`crate::consts`]; only the arena size and the
//! RNG seed are configurable.

use serde::{Deserialize, Serialize};

use crate::consts::{PLAYER_WIDTH, SCREEN_HEIGHT, SCREEN_WIDTH};

/// Arena and run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Play field width in world units
    pub screen_width: f32,
    /// Play field height in world units
    pub screen_height: f32,
    /// Fixed seed for invader fire; `None` lets the host pick one
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut config: Self = serde_json::from_str(json)?;
        config.sanitize();
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Replace dimensions that cannot hold the player with the defaults
    fn sanitize(&mut self) {
        if !self.screen_width.is_finite() || self.screen_width < PLAYER_WIDTH {
            log::warn!(
                "screen_width {} too small, using {}",
                self.screen_width,
                SCREEN_WIDTH
            );
            self.screen_width = SCREEN_WIDTH;
        }
        if !self.screen_height.is_finite() || self.screen_height <= 0.0 {
            log::warn!(
                "screen_height {} invalid, using {}",
                self.screen_height,
                SCREEN_HEIGHT
            );
            self.screen_height = SCREEN_HEIGHT;
        }
    }
}
