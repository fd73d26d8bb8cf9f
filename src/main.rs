//! River Raid entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;

    use river_raid::consts::SIM_DT;
    use river_raid::platform::KeyboardState;
    use river_raid::sim::{GameEvent, RenderSnapshot, Simulation};
    use river_raid::{FrameDriver, FrameSink, Tuning};

    // Hand-off to the page renderer, if it registered one
    #[wasm_bindgen(inline_js = "
        export function render_frame(json) {
            if (window.renderFrame) {
                window.renderFrame(json);
            }
        }
    ")]
    extern "C" {
        fn render_frame(json: &str);
    }

    /// Pushes snapshots to JS and events into the HUD
    struct DomSink;

    impl DomSink {
        fn set_text(id: &str, text: &str) {
            let document = web_sys::window().and_then(|w| w.document());
            if let Some(el) = document.and_then(|d| d.get_element_by_id(id)) {
                el.set_text_content(Some(text));
            }
        }

        fn set_visible(id: &str, visible: bool) {
            let document = web_sys::window().and_then(|w| w.document());
            if let Some(el) = document.and_then(|d| d.get_element_by_id(id)) {
                let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
            }
        }
    }

    impl FrameSink for DomSink {
        fn render(&mut self, snapshot: &RenderSnapshot) {
            match snapshot.to_json() {
                Ok(json) => render_frame(&json),
                Err(e) => log::warn!("Snapshot encode failed: {}", e),
            }
        }

        fn present(&mut self, event: &GameEvent) {
            match event {
                GameEvent::ScoreChanged(score) => Self::set_text("hud-score", &score.to_string()),
                GameEvent::LivesChanged(lives) => Self::set_text("hud-lives", &lives.to_string()),
                GameEvent::GameEnded => Self::set_visible("game-over", true),
                GameEvent::GameReset => Self::set_visible("game-over", false),
                _ => {}
            }
        }
    }

    /// Game instance holding all state
    struct Game {
        driver: FrameDriver,
        keys: KeyboardState,
        sink: DomSink,
        last_time: f64,
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Logger init failed: {e}").into());
        }

        log::info!("River Raid starting...");

        let seed = js_sys::Date::now() as u64;
        let sim = match Simulation::new(Tuning::default(), seed) {
            Ok(sim) => sim,
            Err(e) => {
                log::error!("Bad tuning: {}", e);
                return;
            }
        };

        let game = Rc::new(RefCell::new(Game {
            driver: FrameDriver::new(sim),
            keys: KeyboardState::new(),
            sink: DomSink,
            last_time: 0.0,
        }));

        DomSink::set_text("hud-score", "0");
        DomSink::set_text("hud-lives", &Tuning::default().starting_lives.to_string());
        DomSink::set_visible("game-over", false);

        setup_input_handlers(game.clone());
        request_animation_frame(game);

        log::info!("River Raid running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard down (auto-repeat keeps firing, gated by the cooldown)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if game.borrow_mut().keys.key_down(&event.code()) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                game.borrow_mut().keys.key_up(&event.code());
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Losing focus drops held keys so the craft doesn't drift
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().keys.release_all();
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            let g = &mut *g;

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            let controls = g.keys.take_controls();
            g.driver.advance(dt, &controls, &mut g.sink);
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use river_raid::sim::{ControlState, GameEvent, RenderSnapshot, Simulation};
    use river_raid::{FrameDriver, FrameSink, Tuning, TuningError};

    /// Demo length: two simulated minutes
    const DEMO_FRAMES: u32 = 60 * 120;

    /// Logs presentation events and a periodic frame summary
    #[derive(Default)]
    struct LogSink {
        kills: u32,
        hits: u32,
        runs_ended: u32,
    }

    impl FrameSink for LogSink {
        fn render(&mut self, snapshot: &RenderSnapshot) {
            if snapshot.time_ticks % 600 == 0 {
                log::debug!(
                    "tick {} x={:.2} enemies={} shots={}",
                    snapshot.time_ticks,
                    snapshot.player.x,
                    snapshot.enemies.len(),
                    snapshot.projectiles.len()
                );
            }
        }

        fn present(&mut self, event: &GameEvent) {
            match event {
                GameEvent::ScoreChanged(score) => log::info!("Score: {}", score),
                GameEvent::LivesChanged(lives) => log::info!("Lives: {}", lives),
                GameEvent::GameEnded => {
                    self.runs_ended += 1;
                    log::info!("GAME OVER");
                }
                GameEvent::GameReset => log::info!("New run"),
                GameEvent::EnemyDestroyed { .. } => self.kills += 1,
                GameEvent::PlayerHit { .. } => self.hits += 1,
                GameEvent::EnemySpawned { .. } | GameEvent::ProjectileFired { .. } => {}
            }
        }
    }

    fn load_tuning(path: Option<String>) -> Result<Tuning, TuningError> {
        let Some(path) = path else {
            return Ok(Tuning::default());
        };
        log::info!("Loading tuning from {}", path);
        Tuning::load(&path)
    }

    /// Headless attract-mode run: autopilot plays, events go to the log
    pub fn run() -> Result<(), TuningError> {
        let tuning = load_tuning(std::env::args().nth(1))?;
        let seed = std::env::var("RIVER_RAID_SEED")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0x5EED);

        let mut driver = FrameDriver::new(Simulation::new(tuning, seed)?);
        let mut sink = LogSink::default();
        let demo = ControlState {
            idle_mode: true,
            ..Default::default()
        };

        for _ in 0..DEMO_FRAMES {
            driver.frame(&demo, &mut sink);
        }

        let state = driver.sim().state();
        log::info!(
            "Demo finished after {} frames: score={} lives={} kills={} hits={} runs ended={}",
            driver.frames(),
            state.score(),
            state.lives(),
            sink.kills,
            sink.hits,
            sink.runs_ended
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("River Raid (native) starting...");
    log::info!("Native mode runs a headless autopilot demo - build for wasm32 for the browser version");

    if let Err(e) = native::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
