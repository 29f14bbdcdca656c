//! Frame drivers
//!
//! The engine never schedules itself. A driver owns the repeating task, calls
//! the frame callback once per tick and can be stopped; stopping drops the
//! callback and with it whatever it captured (engine, surface).

use std::cell::Cell;
use std::rc::Rc;

/// Shared stop flag for a running loop
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Rc<Cell<bool>>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.set(true);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.get()
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use headless::HeadlessLoop;

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::time::{Duration, Instant};

    use super::StopHandle;

    /// Native loop that runs a bounded number of frames.
    ///
    /// Without a cadence frames run back to back (tests, offline runs).
    #[derive(Debug, Default)]
    pub struct HeadlessLoop {
        frame_interval: Option<Duration>,
        stop: StopHandle,
    }

    impl HeadlessLoop {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pace frames to `fps` using sleeps
        pub fn with_cadence(fps: u32) -> Self {
            Self {
                frame_interval: Some(Duration::from_secs_f64(1.0 / fps.max(1) as f64)),
                stop: StopHandle::new(),
            }
        }

        pub fn stop_handle(&self) -> StopHandle {
            self.stop.clone()
        }

        /// Call `frame(index)` up to `max_frames` times, returning how many ran
        pub fn run<F: FnMut(u64)>(&self, max_frames: u64, mut frame: F) -> u64 {
            let mut ran = 0;
            while ran < max_frames && !self.stop.is_stopped() {
                let started = Instant::now();
                frame(ran);
                ran += 1;

                if let Some(interval) = self.frame_interval {
                    if let Some(rest) = interval.checked_sub(started.elapsed()) {
                        std::thread::sleep(rest);
                    }
                }
            }
            log::debug!("Headless loop finished after {} frames", ran);
            ran
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AnimationLoop;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;

    use super::StopHandle;
    use crate::error::EngineError;

    struct LoopState {
        window: web_sys::Window,
        callback: RefCell<Option<Closure<dyn FnMut(f64)>>>,
        pending: Cell<Option<i32>>,
        in_frame: Cell<bool>,
        stop: StopHandle,
    }

    impl LoopState {
        fn schedule(&self) {
            let callback = self.callback.borrow();
            let Some(callback) = callback.as_ref() else {
                return;
            };
            match self
                .window
                .request_animation_frame(callback.as_ref().unchecked_ref())
            {
                Ok(id) => self.pending.set(Some(id)),
                Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
            }
        }
    }

    /// `requestAnimationFrame` loop calling `frame(timestamp_ms)` every display frame
    pub struct AnimationLoop {
        state: Rc<LoopState>,
    }

    impl AnimationLoop {
        pub fn start<F: FnMut(f64) + 'static>(mut frame: F) -> Result<Self, EngineError> {
            let window = web_sys::window().ok_or(EngineError::NoWindow)?;
            let state = Rc::new(LoopState {
                window,
                callback: RefCell::new(None),
                pending: Cell::new(None),
                in_frame: Cell::new(false),
                stop: StopHandle::new(),
            });

            let weak = Rc::downgrade(&state);
            let callback = Closure::<dyn FnMut(f64)>::new(move |time: f64| {
                let Some(state) = weak.upgrade() else {
                    return;
                };
                state.pending.set(None);
                if state.stop.is_stopped() {
                    return;
                }
                state.in_frame.set(true);
                frame(time);
                state.in_frame.set(false);
                if !state.stop.is_stopped() {
                    state.schedule();
                }
            });
            *state.callback.borrow_mut() = Some(callback);
            state.schedule();

            log::info!("Animation loop started");
            Ok(Self { state })
        }

        /// Cancel the pending frame and release the callback.
        ///
        /// Called from inside the frame callback this only prevents the next
        /// frame; the callback itself is released on drop.
        pub fn stop(&self) {
            self.state.stop.stop();
            if let Some(id) = self.state.pending.take() {
                let _ = self.state.window.cancel_animation_frame(id);
            }
            if !self.state.in_frame.get() && self.state.callback.borrow_mut().take().is_some() {
                log::info!("Animation loop stopped");
            }
        }
    }

    impl Drop for AnimationLoop {
        fn drop(&mut self) {
            self.stop();
        }
    }
}
