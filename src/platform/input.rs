//! Swipe-to-launch gesture tracking
//!
//! An upward drag of more than [`SWIPE_THRESHOLD`] px launches a firework at
//! the release x. Some swipes also earn a delayed "echo" launch nearby.

use rand::Rng;

/// Minimum upward travel (px) that counts as a launch swipe
pub const SWIPE_THRESHOLD: f32 = 50.0;
/// Chance that a swipe also schedules an echo launch
pub const ECHO_CHANCE: f64 = 0.4;
/// Delay before the echo launch
pub const ECHO_DELAY_MS: i32 = 250;
/// Max horizontal offset of the echo from the original launch
pub const ECHO_SPREAD: f32 = 40.0;

/// What the host should launch after a completed swipe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchRequest {
    /// Launch x right away
    pub x: f32,
    /// Launch x after [`ECHO_DELAY_MS`], if any
    pub echo: Option<f32>,
}

/// Tracks one press/release pair at a time
#[derive(Debug, Default)]
pub struct SwipeTracker {
    start_y: Option<f32>,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer/touch went down at `y`
    pub fn press(&mut self, y: f32) {
        self.start_y = Some(y);
    }

    /// Pointer/touch released at (x, y). Ends the gesture either way.
    pub fn release<R: Rng + ?Sized>(&mut self, x: f32, y: f32, rng: &mut R) -> Option<LaunchRequest> {
        let start_y = self.start_y.take()?;
        if start_y - y <= SWIPE_THRESHOLD {
            return None;
        }

        let echo = rng
            .random_bool(ECHO_CHANCE)
            .then(|| x + rng.random_range(-ECHO_SPREAD..ECHO_SPREAD));
        Some(LaunchRequest { x, echo })
    }

    /// Drop a gesture in progress
    pub fn cancel(&mut self) {
        self.start_y = None;
    }

    pub fn is_tracking(&self) -> bool {
        self.start_y.is_some()
    }
}
