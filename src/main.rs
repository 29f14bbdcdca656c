//! Night Fireworks entry point
//!
//! Web: wires the engine to the page canvas, the animation loop, resize and
//! swipe input. Native: runs a scripted headless show and logs what it drew.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web_show {
    use std::cell::RefCell;
    use std::rc::Rc;

    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use wasm_bindgen::prelude::*;
    use web_sys::{MouseEvent, TouchEvent};

    use night_fireworks::driver::AnimationLoop;
    use night_fireworks::platform::input::{ECHO_DELAY_MS, SwipeTracker};
    use night_fireworks::renderer::Canvas2d;
    use night_fireworks::{Engine, EngineError, Settings};

    type WebEngine = Engine<Canvas2d>;

    fn window_size(window: &web_sys::Window) -> (u32, u32) {
        let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0);
        let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0);
        (w as u32, h as u32)
    }

    pub fn run() -> Result<(), EngineError> {
        let window = web_sys::window().ok_or(EngineError::NoWindow)?;
        let (width, height) = window_size(&window);

        let mut canvas = Canvas2d::from_element_id("canvas")?;
        canvas.set_size(width, height);

        let settings = Settings::load();
        let engine = Rc::new(RefCell::new(
            Engine::new(canvas, width as f32, height as f32).with_settings(&settings),
        ));
        log::info!(
            "Engine ready at {}x{} with {} colors",
            width,
            height,
            settings.palette.len()
        );

        let animation = {
            let engine = engine.clone();
            AnimationLoop::start(move |_time| engine.borrow_mut().update_and_draw())?
        };
        // Runs for the lifetime of the page
        std::mem::forget(animation);

        setup_resize(&window, engine.clone());
        setup_swipe_input(&window, engine);

        log::info!("Night Fireworks running!");
        Ok(())
    }

    fn setup_resize(window: &web_sys::Window, engine: Rc<RefCell<WebEngine>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (width, height) = window_size(&window);
            let mut engine = engine.borrow_mut();
            engine.surface_mut().set_size(width, height);
            engine.resize(width as f32, height as f32);
            log::info!("Resized to {}x{}", width, height);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn launch_from_swipe(
        engine: &Rc<RefCell<WebEngine>>,
        tracker: &RefCell<SwipeTracker>,
        rng: &RefCell<Pcg32>,
        x: f32,
        y: f32,
    ) {
        let request = tracker.borrow_mut().release(x, y, &mut *rng.borrow_mut());
        let Some(request) = request else {
            return;
        };

        engine.borrow_mut().launch(Some(request.x));

        if let Some(echo_x) = request.echo {
            let engine = engine.clone();
            let echo = Closure::once_into_js(move || engine.borrow_mut().launch(Some(echo_x)));
            if let Some(window) = web_sys::window() {
                let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                    echo.unchecked_ref(),
                    ECHO_DELAY_MS,
                );
            }
        }
    }

    fn setup_swipe_input(window: &web_sys::Window, engine: Rc<RefCell<WebEngine>>) {
        let tracker = Rc::new(RefCell::new(SwipeTracker::new()));
        let rng = Rc::new(RefCell::new(Pcg32::from_os_rng()));

        // Mouse down
        {
            let tracker = tracker.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                tracker.borrow_mut().press(event.client_y() as f32);
            });
            let _ = window.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse up
        {
            let engine = engine.clone();
            let tracker = tracker.clone();
            let rng = rng.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                launch_from_swipe(
                    &engine,
                    &tracker,
                    &rng,
                    event.client_x() as f32,
                    event.client_y() as f32,
                );
            });
            let _ = window.add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let tracker = tracker.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if let Some(touch) = event.touches().get(0) {
                    tracker.borrow_mut().press(touch.client_y() as f32);
                }
            });
            let _ = window.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end: the lifted finger is only in changedTouches
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                match event.changed_touches().get(0) {
                    Some(touch) => launch_from_swipe(
                        &engine,
                        &tracker,
                        &rng,
                        touch.client_x() as f32,
                        touch.client_y() as f32,
                    ),
                    None => tracker.borrow_mut().cancel(),
                }
            });
            let _ = window.add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Night Fireworks starting...");

    if let Err(e) = web_show::run() {
        log::error!("Failed to start: {}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use night_fireworks::driver::HeadlessLoop;
    use night_fireworks::renderer::Recorder;
    use night_fireworks::{Engine, Settings};

    env_logger::init();
    log::info!("Night Fireworks (native) starting...");
    log::info!("Native mode renders headless - run with `trunk serve` for the web version");

    const WIDTH: f32 = 1280.0;
    const HEIGHT: f32 = 720.0;
    const FRAMES: u64 = 600;

    let settings = Settings::load();
    if let Ok(json) = settings.to_json() {
        log::debug!("Settings: {}", json);
    }
    let mut engine = Engine::new(Recorder::new(), WIDTH, HEIGHT)
        .with_settings(&settings)
        .on_explode(|| log::debug!("Boom"));

    let mut peak_particles = 0;
    let mut total_fills = 0;
    let driver = HeadlessLoop::new();
    let ran = driver.run(FRAMES, |frame| {
        // A launch every 20 frames for the first 6 seconds; every third one at a fixed x
        if frame < 360 && frame % 20 == 0 {
            let x = (frame % 60 == 0).then(|| WIDTH * (0.1 + 0.8 * frame as f32 / 360.0));
            engine.launch(x);
        }

        engine.surface_mut().clear();
        engine.update_and_draw();
        total_fills += engine.surface().additive_fills();
        peak_particles = peak_particles.max(engine.live_particles());

        if frame % 60 == 0 {
            log::info!(
                "Frame {}: {} fireworks, {} particles",
                frame,
                engine.fireworks().len(),
                engine.live_particles()
            );
        }
    });

    if log::log_enabled!(log::Level::Trace) {
        if let Ok(json) = serde_json::to_string(engine.surface().commands()) {
            log::trace!("Last frame: {}", json);
        }
    }

    log::info!(
        "Show finished: {} frames, {} bursts, peak {} particles, {} additive fills",
        ran,
        engine.explosions(),
        peak_particles,
        total_fills
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
