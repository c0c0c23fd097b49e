//! Grid Invaders entry point
//!
//! The wasm32 build wires the canvas, keyboard and touch buttons to the game.
//! The native build runs a headless game with an autopilot and logs the result.

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, KeyboardEvent};

    use grid_invaders::renderer::CanvasRenderer;
    use grid_invaders::sim::TickInput;
    use grid_invaders::{Game, GameConfig, GamePhase, Hud};

    /// Score, lives and status spans in the page
    struct DomHud {
        score: Option<Element>,
        lives: Option<Element>,
        status: Option<Element>,
    }

    impl DomHud {
        fn new(document: &Document) -> Self {
            Self {
                score: document.get_element_by_id("score"),
                lives: document.get_element_by_id("lives"),
                status: document.get_element_by_id("status"),
            }
        }
    }

    impl Hud for DomHud {
        fn set_score(&mut self, score: u32) {
            if let Some(el) = &self.score {
                el.set_text_content(Some(&score.to_string()));
            }
        }

        fn set_lives(&mut self, lives: u32) {
            if let Some(el) = &self.lives {
                el.set_text_content(Some(&lives.to_string()));
            }
        }

        fn set_status(&mut self, status: &str) {
            if let Some(el) = &self.status {
                el.set_text_content(Some(status));
            }
        }
    }

    /// Game instance plus its browser collaborators
    struct Host {
        game: Game,
        renderer: CanvasRenderer,
        hud: DomHud,
        /// Held input levels, written by event handlers between frames
        keys: TickInput,
        /// Bumped on every start so a stale animation-frame chain stops
        loop_id: u64,
    }

    impl Host {
        fn frame(&mut self, now: f64) {
            let Host {
                game,
                renderer,
                hud,
                keys,
                ..
            } = self;
            let input = *keys;
            game.frame(now, &input, renderer, hud);
        }

        fn restart(&mut self) {
            self.game.reset();
            self.game.flush_hud(&mut self.hud);
            // Draw once so the field is not blank while idle
            self.game.draw(&mut self.renderer);
        }
    }

    fn now_secs() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now() / 1000.0)
            .unwrap_or_default()
    }

    /// Start the loop if it is not running yet
    fn begin(host: &Rc<RefCell<Host>>) {
        let loop_id = {
            let mut h = host.borrow_mut();
            if !h.game.start(now_secs()) {
                return;
            }
            h.loop_id += 1;
            h.loop_id
        };
        request_animation_frame(host.clone(), loop_id);
    }

    fn request_animation_frame(host: Rc<RefCell<Host>>, loop_id: u64) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(host, loop_id, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(host: Rc<RefCell<Host>>, loop_id: u64, time: f64) {
        {
            let mut h = host.borrow_mut();
            // Reset stops the loop; a later start schedules a fresh chain
            if !h.game.is_looping() || h.loop_id != loop_id {
                return;
            }
            h.frame(time / 1000.0);
        }
        request_animation_frame(host, loop_id);
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);
        log::info!("Grid Invaders starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::warn!("No document available");
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("game")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::warn!("Canvas #game not found");
            return;
        };
        let Some(renderer) = CanvasRenderer::new(&canvas) else {
            log::warn!("Canvas 2D context unavailable");
            return;
        };

        let config = GameConfig {
            screen_width: canvas.width() as f32,
            screen_height: canvas.height() as f32,
            ..Default::default()
        };
        let seed = config.seed.unwrap_or(js_sys::Date::now() as u64);
        log::info!("Game initialized with seed: {}", seed);

        let mut host = Host {
            game: Game::new(&config, seed),
            renderer,
            hud: DomHud::new(&document),
            keys: TickInput::default(),
            loop_id: 0,
        };
        host.game.sync_hud(&mut host.hud);
        host.game.draw(&mut host.renderer);
        let host = Rc::new(RefCell::new(host));

        setup_keyboard(host.clone());
        setup_touch_controls(&document, host.clone());
        setup_canvas_click(&canvas, host);
        log::info!("Grid Invaders ready");
    }

    fn setup_keyboard(host: Rc<RefCell<Host>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let code = event.code();
                let over = {
                    let mut h = host.borrow_mut();
                    match code.as_str() {
                        "ArrowLeft" => h.keys.left = true,
                        "ArrowRight" => h.keys.right = true,
                        "Space" => {
                            event.prevent_default();
                            h.keys.shoot = true;
                        }
                        _ => {}
                    }
                    h.game.phase() == GamePhase::Over
                };
                if over && (code == "KeyR" || code == "Enter") {
                    host.borrow_mut().restart();
                }
                // Any key starts the loop
                begin(&host);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut h = host.borrow_mut();
            match event.code().as_str() {
                "ArrowLeft" => h.keys.left = false,
                "ArrowRight" => h.keys.right = false,
                "Space" => h.keys.shoot = false,
                _ => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Bind press/release handlers to an on-screen button
    fn bind_button<D, U>(document: &Document, id: &str, on_down: D, on_up: U)
    where
        D: FnMut() + 'static,
        U: FnMut() + 'static,
    {
        let Some(el) = document.get_element_by_id(id) else {
            return;
        };

        let on_down = Rc::new(RefCell::new(on_down));
        for kind in ["pointerdown", "touchstart"] {
            let on_down = on_down.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                event.prevent_default();
                let mut on_down = on_down.borrow_mut();
                (*on_down)();
            });
            let _ = el.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let on_up = Rc::new(RefCell::new(on_up));
        for kind in ["pointerup", "pointerleave", "pointercancel", "touchend", "touchcancel"] {
            let on_up = on_up.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                event.prevent_default();
                let mut on_up = on_up.borrow_mut();
                (*on_up)();
            });
            let _ = el.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_touch_controls(document: &Document, host: Rc<RefCell<Host>>) {
        let (a, b) = (host.clone(), host.clone());
        bind_button(
            document,
            "btn-left",
            move || a.borrow_mut().keys.left = true,
            move || b.borrow_mut().keys.left = false,
        );
        let (a, b) = (host.clone(), host.clone());
        bind_button(
            document,
            "btn-right",
            move || a.borrow_mut().keys.right = true,
            move || b.borrow_mut().keys.right = false,
        );
        let (a, b) = (host.clone(), host.clone());
        bind_button(
            document,
            "btn-fire",
            move || {
                a.borrow_mut().keys.shoot = true;
                begin(&a);
            },
            move || b.borrow_mut().keys.shoot = false,
        );
        bind_button(
            document,
            "btn-restart",
            move || {
                host.borrow_mut().restart();
                begin(&host);
                log::info!("Game restarted");
            },
            || {},
        );
    }

    fn setup_canvas_click(canvas: &HtmlCanvasElement, host: Rc<RefCell<Host>>) {
        let target = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            let _ = target.focus();
            begin(&host);
        });
        let _ = canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use grid_invaders::consts::PROJECTILE_WIDTH;
    use grid_invaders::sim::{GameState, Owner, TickInput};
    use grid_invaders::{GameConfig, Hud, InputSource};

    /// Logs HUD changes instead of drawing them
    pub struct LogHud;

    impl Hud for LogHud {
        fn set_score(&mut self, score: u32) {
            log::info!("Score: {}", score);
        }

        fn set_lives(&mut self, lives: u32) {
            log::info!("Lives: {}", lives);
        }

        fn set_status(&mut self, status: &str) {
            if !status.is_empty() {
                log::info!("{}", status);
            }
        }
    }

    /// Shadows the lowest alive invader, fires constantly and sidesteps
    /// incoming shots
    #[derive(Default)]
    pub struct Autopilot;

    /// Danger zone above the player, in world units
    const DODGE_RANGE: f32 = 120.0;

    impl InputSource for Autopilot {
        fn sample(&mut self, state: &GameState) -> TickInput {
            let player = state.player.bounds();
            let center = (player.left() + player.right()) / 2.0;

            let threat = state.projectiles.iter().find(|p| {
                p.owner() == Owner::Invader
                    && p.pos.y < player.top()
                    && player.top() - p.pos.y < DODGE_RANGE
                    && p.pos.x + PROJECTILE_WIDTH >= player.left() - 4.0
                    && p.pos.x <= player.right() + 4.0
            });
            if let Some(threat) = threat {
                let go_left = (threat.pos.x > center && player.left() > 0.0)
                    || player.right() >= state.screen_width;
                return TickInput {
                    left: go_left,
                    right: !go_left,
                    shoot: true,
                };
            }

            let target = state
                .formation
                .invaders
                .iter()
                .filter(|inv| inv.alive)
                .max_by(|a, b| {
                    a.pos
                        .y
                        .partial_cmp(&b.pos.y)
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .then_with(|| {
                            let da = (a.pos.x - center).abs();
                            let db = (b.pos.x - center).abs();
                            db.partial_cmp(&da).unwrap_or(std::cmp::Ordering::Equal)
                        })
                })
                .map(|inv| inv.pos.x + inv.size.x / 2.0);

            let mut input = TickInput {
                shoot: true,
                ..Default::default()
            };
            if let Some(target_x) = target {
                input.left = target_x < center - 4.0;
                input.right = target_x > center + 4.0;
            }
            input
        }
    }

    /// Read a JSON config file
    pub fn load_config(path: &str) -> std::io::Result<GameConfig> {
        let json = std::fs::read_to_string(path)?;
        Ok(GameConfig::from_json(&json)?)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use grid_invaders::renderer::DrawList;
    use grid_invaders::sim::Outcome;
    use grid_invaders::{FixedRateScheduler, Game, GameConfig, run};

    env_logger::init();
    log::info!("Grid Invaders (headless) starting...");

    let config = match std::env::args().nth(1) {
        Some(path) => headless::load_config(&path).unwrap_or_else(|e| {
            log::warn!("Could not load config {}: {}, using defaults", path, e);
            GameConfig::default()
        }),
        None => GameConfig::default(),
    };
    let seed = config.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default()
    });
    log::info!("Game initialized with seed: {}", seed);

    let mut game = Game::new(&config, seed);
    let mut hud = headless::LogHud;
    let mut renderer = DrawList::default();
    let mut pilot = headless::Autopilot;
    // Ten minutes of play at 60 fps
    let mut scheduler = FixedRateScheduler::new(0.0, 60.0).limited(60 * 600);

    game.sync_hud(&mut hud);
    game.start(0.0);
    let frames = run(&mut game, &mut scheduler, &mut pilot, &mut renderer, &mut hud);

    let state = game.state();
    let result = match state.outcome {
        Some(Outcome::Win) => "won",
        Some(Outcome::Loss) => "lost",
        None => "timed out",
    };
    println!(
        "Autopilot {} after {} frames: score {}, lives {}",
        result, frames, state.score, state.lives
    );
}
