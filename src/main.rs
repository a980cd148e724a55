//! Candy Dash entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, Response};

    use candy_dash::Settings;
    use candy_dash::audio::{WebAudio, dispatch_all};
    use candy_dash::consts::*;
    use candy_dash::frame_multiplier;
    use candy_dash::platform::{AssetTracker, InputState};
    use candy_dash::renderer::{self, QuadBatch, QuadRenderer, SpriteSet};
    use candy_dash::sim::{GameEvent, GamePhase, WorldState, tick};

    const SPRITE_MANIFEST: &str = "sprites.json";
    /// Asset groups that must settle before the menu appears
    const ASSET_GROUPS: u32 = 2;

    struct Game {
        world: WorldState,
        render_state: Option<QuadRenderer>,
        sprites: SpriteSet,
        input: InputState,
        assets: AssetTracker,
        audio: WebAudio,
        settings: Settings,
        last_time: f64,
    }

    impl Game {
        fn new(seed: u64, settings: Settings) -> Self {
            Self {
                world: WorldState::with_high_score(seed, settings.high_score),
                render_state: None,
                sprites: SpriteSet::new(),
                input: InputState::new(),
                assets: AssetTracker::new(ASSET_GROUPS),
                audio: WebAudio::new(),
                settings,
                last_time: 0.0,
            }
        }

        fn asset_loaded(&mut self, name: &str) {
            if self.assets.mark_loaded(name) {
                self.world.assets_ready();
            }
        }

        fn asset_failed(&mut self, name: &str) {
            if self.assets.mark_failed(name) {
                self.world.assets_ready();
            }
        }

        /// Advance one frame and flush the side effects the sim queued
        fn update(&mut self, dt: f32) {
            let input = self.input.tick_input();
            tick(&mut self.world, &input, dt);
            self.input.clear_actions();

            let cues = self.world.drain_cues();
            dispatch_all(&mut self.audio, cues);

            for event in self.world.drain_events() {
                match event {
                    GameEvent::PhaseChanged(phase) => log::info!("Phase: {:?}", phase),
                    GameEvent::GameOver => {
                        log::info!("Game over with {} candy", self.world.score.candy)
                    }
                    _ => {}
                }
            }

            if let Some(best) = self.world.score.take_high_score_update() {
                if self.settings.record_high_score(best) {
                    if let Err(e) = self.settings.save() {
                        log::warn!("Failed to save high score: {}", e);
                    }
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };

            let mut batch = QuadBatch::with_overlays(&self.sprites);
            if self.world.phase == GamePhase::Loading {
                renderer::render_loading(self.assets.progress(), &mut batch);
            } else {
                renderer::render_world(&self.world, &self.sprites, &mut batch);
            }

            match render_state.render(batch.vertices()) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    render_state.resize(render_state.size.0, render_state.size.1);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Candy Dash starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let width = SCREEN_WIDTH as u32 * DISPLAY_SCALE;
        let height = SCREEN_HEIGHT as u32 * DISPLAY_SCALE;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, settings)));

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match QuadRenderer::new(surface, &adapter, width, height).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("Failed to create device: {}", e),
        }

        setup_input_handlers(game.clone());
        setup_auto_pause(game.clone());

        // Start game loop
        request_animation_frame(game.clone());

        // Audio is synthesized, so its group settles as soon as the context exists
        game.borrow_mut().asset_loaded("audio");

        match fetch_text(SPRITE_MANIFEST).await {
            Ok(json) => match SpriteSet::from_manifest_json(&json) {
                Ok(sprites) => {
                    let missing = sprites.missing();
                    if !missing.is_empty() {
                        log::warn!("Sprites missing from manifest: {:?}", missing);
                    }
                    let mut g = game.borrow_mut();
                    g.sprites = sprites;
                    g.asset_loaded(SPRITE_MANIFEST);
                }
                Err(e) => {
                    log::warn!("Bad sprite manifest: {}", e);
                    game.borrow_mut().asset_failed(SPRITE_MANIFEST);
                }
            },
            Err(e) => {
                log::warn!("Failed to fetch {}: {:?}", SPRITE_MANIFEST, e);
                game.borrow_mut().asset_failed(SPRITE_MANIFEST);
            }
        }

        log::info!("Candy Dash running!");
    }

    async fn fetch_text(url: &str) -> Result<String, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let response: Response = JsFuture::from(window.fetch_with_str(url))
            .await?
            .dyn_into()?;
        if !response.ok() {
            return Err(JsValue::from_str(&format!("HTTP {}", response.status())));
        }
        let text = JsFuture::from(response.text()?).await?;
        text.as_string()
            .ok_or_else(|| JsValue::from_str("response body is not text"))
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let code = event.code();
                if matches!(
                    code.as_str(),
                    "Space" | "ArrowUp" | "ArrowDown" | "ArrowLeft" | "ArrowRight"
                ) {
                    event.prevent_default();
                }
                let mut g = game.borrow_mut();
                // Browsers only allow audio after a user gesture
                g.audio.resume();
                g.input.key_down(&code);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().input.key_up(&event.code());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
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

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                frame_multiplier(time - g.last_time)
            } else {
                1.0
            };
            g.last_time = time;

            g.update(dt);
            g.render();
        }

        request_animation_frame(game);
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    g.input.release_all();
                    if g.world.phase == GamePhase::Playing {
                        g.input.request_pause();
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.input.release_all();
                if g.world.phase == GamePhase::Playing {
                    g.input.request_pause();
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
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
    log::info!("Candy Dash (native) starting...");
    log::info!("Native mode is headless - serve the wasm build to play");

    run_demo();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted run: start, hold right, hop every second until the round ends
#[cfg(not(target_arch = "wasm32"))]
fn run_demo() {
    use candy_dash::Settings;
    use candy_dash::audio::{LogSink, dispatch_all};
    use candy_dash::sim::{GameEvent, GamePhase, TickInput, WorldState, tick};

    const MAX_FRAMES: u32 = 60 * 120;

    let mut settings = Settings::load();
    let mut world = WorldState::with_high_score(0xC0FFEE, settings.high_score);
    let mut sink = LogSink::default();

    world.assets_ready();

    for frame in 0..MAX_FRAMES {
        let input = TickInput {
            right: frame % 240 < 120,
            left: frame % 240 >= 120,
            jump: frame % 60 == 0,
            start: frame == 1,
            ..Default::default()
        };
        tick(&mut world, &input, 1.0);

        dispatch_all(&mut sink, world.drain_cues());
        for event in world.drain_events() {
            match event {
                GameEvent::PhaseChanged(phase) => log::info!("frame {frame}: {:?}", phase),
                GameEvent::Damaged { lives_left } => {
                    log::info!("frame {frame}: hit, {lives_left} lives left")
                }
                _ => {}
            }
        }
        if let Some(best) = world.score.take_high_score_update() {
            settings.record_high_score(best);
        }

        if world.phase == GamePhase::GameOver {
            break;
        }
    }

    if let Err(e) = settings.save() {
        log::warn!("Failed to save settings: {}", e);
    }

    println!(
        "Demo finished: phase {:?}, candy {}, lives {}, high score {}, {} sounds",
        world.phase, world.score.candy, world.score.lives, settings.high_score, sink.played
    );
}
