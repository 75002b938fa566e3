//! Tank Raid entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

    use tank_raid::assets::ResourceCache;
    use tank_raid::consts::*;
    use tank_raid::input::KeyState;
    use tank_raid::renderer::Renderer;
    use tank_raid::sim::{GamePhase, GameState, tick};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        rng: Pcg32,
        renderer: Option<Renderer>,
        keys: KeyState,
        accumulator: f32,
        last_time: f64,
        // Track transitions for one-shot logging
        last_phase: GamePhase,
        last_level: u32,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            Self {
                state: GameState::new(),
                rng: Pcg32::seed_from_u64(seed),
                renderer: None,
                keys: KeyState::new(),
                accumulator: 0.0,
                last_time: 0.0,
                last_phase: GamePhase::Playing,
                last_level: 1,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.clamp(0.0, MAX_FRAME_DT);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.keys.snapshot();
                tick(&mut self.state, &input, &mut self.rng, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;
            }

            if self.state.progression.level != self.last_level {
                log::info!("Reached level {}", self.state.progression.level);
                self.last_level = self.state.progression.level;
            }

            if self.state.phase != self.last_phase {
                if self.state.phase == GamePhase::GameOver {
                    log::info!(
                        "Game over at level {} with {} points",
                        self.state.progression.level,
                        self.state.progression.score
                    );
                }
                self.last_phase = self.state.phase;
            }
        }

        /// Render the current frame
        fn render(&self) {
            if let Some(ref renderer) = self.renderer {
                if let Err(e) = renderer.render(&self.state) {
                    log::warn!("Render error: {:?}", e);
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let window = web_sys::window().unwrap();
            let document = window.document().unwrap();

            if let Some(el) = document.get_element_by_id("score-cnt") {
                el.set_text_content(Some(&format!(
                    "{} / {}",
                    self.state.progression.score, self.state.progression.score_next_level
                )));
            }

            if let Some(el) = document.get_element_by_id("level-cnt") {
                el.set_text_content(Some(&self.state.progression.level.to_string()));
            }

            // Show/hide the game-over panel and its backdrop
            let over = self.state.phase == GamePhase::GameOver;
            for id in ["game-over", "game-over-overlay"] {
                if let Some(el) = document.get_element_by_id(id) {
                    if over {
                        let _ = el.set_attribute("class", "");
                    } else {
                        let _ = el.set_attribute("class", "hidden");
                    }
                }
            }
        }

        /// Reset game state for a new run
        fn restart(&mut self, seed: u64) {
            self.state.reset();
            self.rng = Pcg32::seed_from_u64(seed);
            self.accumulator = 0.0;
            self.last_phase = GamePhase::Playing;
            self.last_level = 1;
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Tank Raid starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .expect("create canvas")
            .dyn_into()
            .expect("not a canvas");
        canvas.set_width(PLAYFIELD_WIDTH as u32);
        canvas.set_height(PLAYFIELD_HEIGHT as u32);
        document
            .body()
            .expect("no body")
            .append_child(&canvas)
            .expect("append canvas");

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .expect("context request failed")
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        game.borrow().keys.attach(&window);

        log::info!("Game initialized with seed: {}", seed);

        let cache = ResourceCache::new();
        cache.load(&[UNITS_SHEET_PATH, FX_SHEET_PATH, TERRAIN_PATH]);

        // Everything below waits for the sprite sheets
        {
            let game = game.clone();
            let cache_handle = cache.clone();
            cache.on_ready(move || {
                match Renderer::new(ctx, &cache_handle) {
                    Ok(renderer) => game.borrow_mut().renderer = Some(renderer),
                    Err(e) => {
                        log::error!("Renderer init failed: {:?}", e);
                        return;
                    }
                }

                setup_restart_button(game.clone());

                // Start game loop
                request_animation_frame(game.clone());

                log::info!("Tank Raid running!");
            });
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Some(btn) = document.get_element_by_id("play-again") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let seed = js_sys::Date::now() as u64;
                game.borrow_mut().restart(seed);
                log::info!("Game restarted with seed: {}", seed);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Tank Raid (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    println!("\nRunning scripted battle...");
    let first = scripted_battle(7);
    println!(
        "After {:.0}s: score {} level {} enemies {} shells {}",
        first.game_time,
        first.progression.score,
        first.progression.level,
        first.enemies.len(),
        first.shells.len()
    );

    let second = scripted_battle(7);
    assert_eq!(first.progression.score, second.progression.score);
    assert_eq!(first.progression.level, second.progression.level);
    assert_eq!(first.enemies.len(), second.enemies.len());
    println!("✓ Same seed reproduced the same battle");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Thirty simulated seconds with the trigger held, or less if the run ends.
#[cfg(not(target_arch = "wasm32"))]
fn scripted_battle(seed: u64) -> tank_raid::sim::GameState {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use tank_raid::consts::SIM_DT;
    use tank_raid::sim::{GamePhase, GameState, TickInput, tick};

    let mut state = GameState::new();
    let mut rng = Pcg32::seed_from_u64(seed);
    let input = TickInput {
        fire: true,
        ..TickInput::default()
    };

    for _ in 0..(30.0 / SIM_DT) as u32 {
        if state.phase == GamePhase::GameOver {
            break;
        }
        tick(&mut state, &input, &mut rng, SIM_DT);
    }
    state
}
