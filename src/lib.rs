//! Night Fireworks - swipe-launched fireworks over a night sky
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation engine (rockets, bursts, particle decay)
//! - `renderer`: 2D drawing surface abstraction (browser canvas, headless recorder)
//! - `driver`: Frame drivers that call the engine once per display frame
//! - `platform`: Browser input helpers (swipe-to-launch)
//! - `settings`: Palette configuration loaded from LocalStorage

pub mod color;
pub mod driver;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use color::Rgb;
pub use error::{EngineError, SettingsError};
pub use settings::Settings;
pub use sim::Engine;

use glam::Vec2;

/// Engine tuning constants
///
/// All velocities are in px/frame and all rates are per frame; the engine has
/// no notion of wall-clock time.
pub mod consts {
    /// Launch x when none is given: fraction of width (keeps rockets off the edges)
    pub const LAUNCH_X_MIN_FRAC: f32 = 0.2;
    pub const LAUNCH_X_MAX_FRAC: f32 = 0.8;

    /// Burst altitude as a fraction of height (upper sky)
    pub const TARGET_Y_MIN_FRAC: f32 = 0.1;
    pub const TARGET_Y_MAX_FRAC: f32 = 0.5;

    /// Rocket ascent speed range (upper bound exclusive)
    pub const ROCKET_SPEED_MIN: f32 = 15.0;
    pub const ROCKET_SPEED_MAX: f32 = 20.0;
    /// Radius of the soft glow drawn around a rising rocket
    pub const ROCKET_GLOW_RADIUS: f32 = 10.0;

    /// Particles per burst (upper bound exclusive)
    pub const BURST_COUNT_MIN: usize = 150;
    pub const BURST_COUNT_MAX: usize = 250;
    /// Initial particle speed range
    pub const BURST_SPEED_MIN: f32 = 2.0;
    pub const BURST_SPEED_MAX: f32 = 12.0;

    /// Particle radius range
    pub const PARTICLE_SIZE_MIN: f32 = 0.5;
    pub const PARTICLE_SIZE_MAX: f32 = 3.0;
    /// Velocity multiplier applied every frame (drag)
    pub const PARTICLE_FRICTION: f32 = 0.95;
    /// Added to vertical velocity every frame
    pub const PARTICLE_GRAVITY: f32 = 0.18;
    /// Alpha lost per frame
    pub const PARTICLE_DECAY_MIN: f32 = 0.008;
    pub const PARTICLE_DECAY_MAX: f32 = 0.023;

    /// Bloom halo is drawn only while alpha is above this
    pub const HALO_ALPHA_THRESHOLD: f32 = 0.5;
    pub const HALO_RADIUS_SCALE: f32 = 4.0;
    pub const HALO_ALPHA_SCALE: f32 = 0.2;

    /// Smallest palette a configuration may supply
    pub const MIN_PALETTE_SIZE: usize = 6;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
