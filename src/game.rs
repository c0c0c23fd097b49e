//! Game state machine and frame loop
//!
//! `Game` owns the simulation state and the random source. Hosts drive it one
//! frame at a time through [`Game::frame`], supplying a timestamp, an input
//! snapshot, a [`Renderer`] and a [`Hud`]. Headless hosts and tests use
//! [`run`] with a [`FrameScheduler`] instead of a real display clock.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::GameConfig;
use crate::consts::MAX_FRAME_DT;
use crate::renderer::Renderer;
use crate::sim::{GameEvent, GameState, TickInput, tick};

pub use crate::sim::GamePhase;

/// Text appended to the terminal message
pub const RESTART_HINT: &str = "Restart: button or press R";

/// Score/lives/status readout owned by the host
pub trait Hud {
    fn set_score(&mut self, score: u32);
    fn set_lives(&mut self, lives: u32);
    /// Empty string clears the status line
    fn set_status(&mut self, status: &str);
}

/// Supplies one input snapshot per frame
pub trait InputSource {
    fn sample(&mut self, state: &GameState) -> TickInput;
}

/// A held, unchanging input
impl InputSource for TickInput {
    fn sample(&mut self, _state: &GameState) -> TickInput {
        *self
    }
}

/// Yields the timestamp (seconds) of each frame; `None` stops the loop
pub trait FrameScheduler {
    fn next_frame(&mut self) -> Option<f64>;
}

/// Synthetic clock ticking at a fixed rate, optionally for a bounded number of frames
#[derive(Debug, Clone)]
pub struct FixedRateScheduler {
    now: f64,
    step: f64,
    remaining: Option<u64>,
}

impl FixedRateScheduler {
    pub fn new(start: f64, fps: f64) -> Self {
        Self {
            now: start,
            step: 1.0 / fps,
            remaining: None,
        }
    }

    /// Stop after `frames` frames
    pub fn limited(mut self, frames: u64) -> Self {
        self.remaining = Some(frames);
        self
    }
}

impl FrameScheduler for FixedRateScheduler {
    fn next_frame(&mut self) -> Option<f64> {
        if let Some(remaining) = self.remaining.as_mut() {
            if *remaining == 0 {
                return None;
            }
            *remaining -= 1;
        }
        self.now += self.step;
        Some(self.now)
    }
}

/// The game: simulation state, random source and loop bookkeeping
pub struct Game<R: Rng = Pcg32> {
    state: GameState,
    rng: R,
    /// Host loop active (between `start` and `reset`)
    looping: bool,
    /// Timestamp of the previous frame (seconds)
    last_time: f64,
    /// Events not yet delivered to the HUD
    pending: Vec<GameEvent>,
}

impl Game<Pcg32> {
    /// Game with a seeded PCG random source
    pub fn new(config: &GameConfig, seed: u64) -> Self {
        Self::with_rng(config, Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> Game<R> {
    pub fn with_rng(config: &GameConfig, rng: R) -> Self {
        Self {
            state: GameState::new(config),
            rng,
            looping: false,
            last_time: 0.0,
            pending: Vec::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Begin the frame loop at timestamp `now`. Returns false if it was
    /// already running, in which case nothing changes.
    pub fn start(&mut self, now: f64) -> bool {
        if self.looping {
            return false;
        }
        self.looping = true;
        self.last_time = now;
        if self.state.phase == GamePhase::Idle {
            self.state.phase = GamePhase::Running;
        }
        log::info!("Game started");
        true
    }

    /// Back to a fresh Idle game, whatever the current phase. Stops the loop.
    pub fn reset(&mut self) {
        let events = self.state.reset();
        self.pending.extend(events);
        self.looping = false;
        log::info!("Game reset");
    }

    /// One simulation tick of `dt` seconds. No-op once over.
    pub fn update(&mut self, dt: f32, input: &TickInput) {
        let events = tick(&mut self.state, input, dt, &mut self.rng);
        self.pending.extend(events);
    }

    pub fn win(&mut self, reason: &str) {
        self.pending.extend(self.state.win(reason));
    }

    pub fn lose(&mut self, reason: &str) {
        self.pending.extend(self.state.lose(reason));
    }

    /// Capped delta since the previous frame
    pub fn frame_dt(&mut self, now: f64) -> f32 {
        let dt = (now - self.last_time).clamp(0.0, MAX_FRAME_DT);
        self.last_time = now;
        dt as f32
    }

    /// One host frame: tick, draw, then push HUD changes. Ignored while the
    /// loop is not running.
    pub fn frame<D: Renderer, H: Hud>(
        &mut self,
        now: f64,
        input: &TickInput,
        renderer: &mut D,
        hud: &mut H,
    ) {
        if !self.looping {
            return;
        }
        let dt = self.frame_dt(now);
        self.update(dt, input);
        self.draw(renderer);
        self.flush_hud(hud);
    }

    /// Hand every entity to the renderer, plus the overlay when over
    pub fn draw<D: Renderer>(&self, renderer: &mut D) {
        let state = &self.state;
        renderer.begin_frame(state.screen_width, state.screen_height);
        renderer.draw_player(&state.player);
        renderer.draw_invaders(&state.formation.invaders);
        renderer.draw_projectiles(&state.projectiles);
        if state.is_over() {
            renderer.draw_overlay(state.message.as_deref().unwrap_or_default());
        }
    }

    /// Write every HUD value, changed or not. Used once at host start-up.
    pub fn sync_hud<H: Hud>(&mut self, hud: &mut H) {
        self.pending.clear();
        hud.set_score(self.state.score);
        hud.set_lives(self.state.lives);
        hud.set_status(&status_text(self.state.message.as_deref()));
    }

    /// Deliver pending score/lives/status changes
    pub fn flush_hud<H: Hud>(&mut self, hud: &mut H) {
        for event in self.pending.drain(..) {
            match event {
                GameEvent::ScoreChanged(score) => hud.set_score(score),
                GameEvent::LivesChanged(lives) => hud.set_lives(lives),
                GameEvent::GameOver { message, .. } => hud.set_status(&status_text(Some(&message))),
                GameEvent::StatusCleared => hud.set_status(""),
                _ => {}
            }
        }
    }
}

fn status_text(message: Option<&str>) -> String {
    match message {
        Some(message) => format!("{message} {RESTART_HINT}"),
        None => String::new(),
    }
}

/// Drive `game` until the scheduler runs dry, the loop is stopped, or the
/// game ends. Returns the number of frames run.
pub fn run<R, S, I, D, H>(
    game: &mut Game<R>,
    scheduler: &mut S,
    input: &mut I,
    renderer: &mut D,
    hud: &mut H,
) -> u64
where
    R: Rng,
    S: FrameScheduler,
    I: InputSource,
    D: Renderer,
    H: Hud,
{
    let mut frames = 0;
    while game.is_looping() {
        let Some(now) = scheduler.next_frame() else {
            break;
        };
        let snapshot = input.sample(game.state());
        game.frame(now, &snapshot, renderer, hud);
        frames += 1;
        if game.phase() == GamePhase::Over {
            break;
        }
    }
    frames
}
