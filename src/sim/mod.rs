//! Fireworks simulation
//!
//! Frame-stepped and passive: nothing here schedules itself. All velocities
//! are px/frame, so the caller's frame rate is the simulation rate.

pub mod burst;
pub mod engine;
pub mod state;

pub use burst::{ParticlePool, burst};
pub use engine::{Engine, ExplosionHook};
pub use state::{Firework, FireworkPhase, Particle};
