//! Scroll Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, MouseEvent, TouchEvent};

    use scroll_runner::audio::{AudioManager, SoundEffect};
    use scroll_runner::consts::*;
    use scroll_runner::platform::{self, PlatformContext, ShareOutcome};
    use scroll_runner::renderer::CanvasRenderer;
    use scroll_runner::settings::Settings;
    use scroll_runner::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: CanvasRenderer,
        audio: AudioManager,
        settings: Settings,
        input: TickInput,
        accumulator: f32,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64, renderer: CanvasRenderer, settings: Settings) -> Self {
            let mut audio = AudioManager::new();
            audio.set_master_volume(settings.master_volume);
            audio.set_sfx_volume(settings.sfx_volume);
            Self {
                state: GameState::new(seed),
                renderer,
                audio,
                settings,
                input: TickInput::default(),
                accumulator: 0.0,
                last_time: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Tap/click dispatch by phase. Taps on the start screen are ignored;
        /// the explicit start button is the only way into a run.
        fn handle_tap(&mut self) {
            match self.state.phase {
                GamePhase::Playing => self.input.jump = true,
                GamePhase::GameOver => self.start_run(),
                GamePhase::Start => {}
            }
        }

        /// Start or restart a run
        fn start_run(&mut self) {
            self.state.start();
            self.accumulator = 0.0;
            self.input = TickInput::default();
            log::info!("Run started (seed {})", self.state.seed);
        }

        /// Run fixed simulation steps and react to their events
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input;
                let events = tick(&mut self.state, &input);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.jump = false;

                for event in events {
                    match event {
                        GameEvent::Jumped => self.audio.play(SoundEffect::Jump),
                        GameEvent::Collided => {
                            self.audio.play(SoundEffect::GameOver);
                            log::info!("Game over at score {}", self.state.score);
                        }
                    }
                }
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&self) {
            let fps = if self.settings.show_fps {
                Some(self.fps)
            } else {
                None
            };
            self.renderer.draw(&self.state, fps);
        }

        /// Show/hide the start and game-over overlays in the DOM
        fn update_overlays(&self, document: &Document) {
            if let Some(el) = document.get_element_by_id("start-screen") {
                let class = if self.state.phase == GamePhase::Start {
                    ""
                } else {
                    "hidden"
                };
                let _ = el.set_attribute("class", class);
            }

            if let Some(el) = document.get_element_by_id("game-over") {
                if self.state.phase == GamePhase::GameOver {
                    let _ = el.set_attribute("class", "");
                    if let Some(score_el) = document.get_element_by_id("final-score") {
                        score_el.set_text_content(Some(&self.state.score.to_string()));
                    }
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }
    }

    /// Size the canvas to its CSS box in device pixels
    fn device_size(canvas: &HtmlCanvasElement) -> (u32, u32) {
        let window = web_sys::window().unwrap();
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        (width.max(1), height.max(1))
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Scroll Runner starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let mut renderer = CanvasRenderer::new(canvas.clone()).expect("no 2d context");
        let (width, height) = device_size(&canvas);
        renderer.resize(width, height);

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, renderer, settings)));

        log::info!("Game initialized with seed: {}", seed);

        // Platform boundary: in-client flag, then async profile fetch for the
        // greeting. Both are non-fatal.
        let context = PlatformContext::detect();
        log::info!("Running inside host client: {}", context.in_client);
        if !context.in_client {
            // Share sheet only exists inside the host app
            if let Some(el) = document.get_element_by_id("share-btn") {
                let _ = el.set_attribute("class", "hidden");
            }
        }
        init_greeting(&document);

        setup_input_handlers(&canvas, game.clone());
        setup_start_buttons(game.clone());
        setup_share_button(game.clone());
        setup_resize_handler(&canvas, game.clone());
        setup_mute_on_blur(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Scroll Runner running!");
    }

    /// Kick off the SDK session and fill in the greeting line once the
    /// profile arrives. Failure just leaves the greeting empty.
    fn init_greeting(document: &Document) {
        let liff_id = document
            .query_selector("meta[name='liff-id']")
            .ok()
            .flatten()
            .and_then(|el| el.get_attribute("content"));

        let Some(liff_id) = liff_id else {
            log::warn!("No liff-id meta tag; skipping session init");
            return;
        };

        wasm_bindgen_futures::spawn_local(async move {
            if let Some(name) = platform::init_session(&liff_id).await {
                let document = web_sys::window().unwrap().document().unwrap();
                if let Some(el) = document.get_element_by_id("greeting") {
                    el.set_text_content(Some(&format!("Hello, {}!", name)));
                }
                log::info!("Session ready for {}", name);
            }
        });
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse click
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().handle_tap();
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().handle_tap();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let game = game.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                match event.key().as_str() {
                    " " | "ArrowUp" => {
                        event.prevent_default();
                        game.borrow_mut().handle_tap();
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Start and retry buttons both (re)start a run
    fn setup_start_buttons(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        for id in ["start-btn", "retry-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    game.borrow_mut().start_run();
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_share_button(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        if let Some(btn) = document.get_element_by_id("share-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let score = game.borrow().state.score;
                wasm_bindgen_futures::spawn_local(async move {
                    let outcome = platform::share_score(score).await;
                    let message = match outcome {
                        ShareOutcome::Shared => "Score shared!",
                        ShareOutcome::Cancelled => "Share cancelled",
                        ShareOutcome::Failed => "Could not share right now",
                    };
                    show_transient_message(message);
                });
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Put a short-lived status line into the share-status element
    fn show_transient_message(message: &str) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();
        let Some(el) = document.get_element_by_id("share-status") else {
            return;
        };
        el.set_text_content(Some(message));

        let clear = Closure::once_into_js(move || {
            let document = web_sys::window().unwrap().document().unwrap();
            if let Some(el) = document.get_element_by_id("share-status") {
                el.set_text_content(None);
            }
        });
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            clear.unchecked_ref(),
            3000,
        );
    }

    /// Re-read the viewport on resize/orientation change and rescale the
    /// renderer. Simulation coordinates are unaffected.
    fn setup_resize_handler(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (width, height) = device_size(&canvas);
            game.borrow_mut().renderer.resize(width, height);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Mute audio while the window is unfocused (if enabled in settings).
    /// There is no paused phase; the simulation keeps its frozen/running state.
    fn setup_mute_on_blur(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.settings.mute_on_blur {
                    g.audio.set_muted(true);
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().audio.set_muted(false);
            });
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
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

    /// rAF-driven loop. The game lives behind one stable Rc<RefCell<..>>, so
    /// nothing is re-subscribed per tick; update always completes before the
    /// same frame's render reads the state.
    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();

            let document = web_sys::window().unwrap().document().unwrap();
            g.update_overlays(&document);
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Scroll Runner (native) starting...");
    log::info!("The playable build targets wasm32 - run with `trunk serve`");

    // Headless demo: run the deterministic sim for a while
    demo_run(0xC0FFEE, 600);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn demo_run(seed: u64, max_ticks: u32) {
    use scroll_runner::sim::{GamePhase, GameState, TickInput, tick};

    let mut state = GameState::new(seed);
    state.start();

    for i in 0..max_ticks {
        // Hop periodically so the demo survives some obstacles
        let input = TickInput { jump: i % 45 == 0 };
        tick(&mut state, &input);
        if state.phase == GamePhase::GameOver {
            break;
        }
    }

    println!(
        "Demo run (seed {:#x}): score {} over {} ticks, {} obstacles live, phase {:?}",
        seed, state.score, state.time_ticks, state.obstacles.len(), state.phase
    );
}
