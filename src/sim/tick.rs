//! Variable timestep simulation tick
//!
//! One tick runs in a fixed order: player, formation, projectile advance,
//! player-shot pass, invader-shot pass, prune, win check.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entities::Owner;
use super::state::{GameEvent, GameState, LOSS_DESTROYED, LOSS_INVASION, WIN_MESSAGE};
use crate::consts::KILL_SCORE;

/// Input levels sampled once at the start of a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub shoot: bool,
}

/// Advance the game state by `dt` seconds. No-op once the game is over.
pub fn tick<R: Rng>(
    state: &mut GameState,
    input: &TickInput,
    dt: f32,
    rng: &mut R,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.is_over() {
        return events;
    }
    state.time_ticks += 1;

    if let Some(shot) = state.player.update(dt, input, state.screen_width) {
        state.projectiles.push(shot);
    }

    let report = state.formation.update(dt, rng, state.player.pos.y);
    if report.flipped {
        events.push(GameEvent::FormationFlipped {
            speed: state.formation.speed,
        });
    }
    if let Some(shot) = report.shot {
        state.projectiles.push(shot);
    }
    if report.reached_player {
        events.extend(state.lose(LOSS_INVASION));
    }

    for shot in &mut state.projectiles {
        shot.update(dt, state.screen_height);
    }
    state.projectiles.retain(|p| p.active);

    resolve_player_shots(state, &mut events);
    resolve_invader_shots(state, &mut events);
    state.projectiles.retain(|p| p.active);

    if state.formation.alive_count() == 0 {
        events.extend(state.win(WIN_MESSAGE));
    }

    events
}

/// Each player shot kills at most one invader: the first alive slot it
/// overlaps in formation order.
fn resolve_player_shots(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let GameState {
        projectiles,
        formation,
        score,
        ..
    } = state;

    for shot in projectiles
        .iter_mut()
        .filter(|p| p.active && p.owner() == Owner::Player)
    {
        let bounds = shot.bounds();
        let Some(slot) = formation
            .invaders
            .iter()
            .position(|inv| inv.alive && inv.bounds().overlaps(&bounds))
        else {
            continue;
        };

        formation.invaders[slot].alive = false;
        shot.active = false;
        *score += KILL_SCORE;
        log::debug!("Invader {} destroyed, score {}", slot, score);
        events.push(GameEvent::InvaderKilled { slot });
        events.push(GameEvent::ScoreChanged(*score));
    }
}

/// Each invader shot touching the player costs one life
fn resolve_invader_shots(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let player_box = state.player.bounds();

    for i in 0..state.projectiles.len() {
        let shot = &state.projectiles[i];
        if !shot.active || shot.owner() != Owner::Invader || !shot.bounds().overlaps(&player_box) {
            continue;
        }

        state.projectiles[i].active = false;
        events.push(GameEvent::PlayerHit);
        if state.lives == 0 {
            continue;
        }
        state.lives -= 1;
        log::debug!("Player hit, {} lives left", state.lives);
        events.push(GameEvent::LivesChanged(state.lives));
        if state.lives == 0 {
            events.extend(state.lose(LOSS_DESTROYED));
        }
    }
}
