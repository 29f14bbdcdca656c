//! Firework and particle types
//!
//! Everything here is owned by the [`Engine`](super::Engine); nothing outside
//! it can hold on to a firework or particle across frames.

use glam::Vec2;
use serde::Serialize;

use crate::color::Rgb;
use crate::consts::HALO_ALPHA_THRESHOLD;

/// A single decaying point of light
#[derive(Debug, Clone, Serialize)]
pub struct Particle {
    pub pos: Vec2,
    /// px/frame
    pub vel: Vec2,
    /// Opacity, visible while > 0
    pub alpha: f32,
    pub color: Rgb,
    /// Radius in px
    pub size: f32,
    /// Velocity multiplier per frame
    pub friction: f32,
    /// Added to vel.y per frame
    pub gravity: f32,
    /// Alpha lost per frame
    pub decay: f32,
}

impl Particle {
    /// Advance one frame. Returns false once the particle has faded out.
    #[inline]
    pub fn step(&mut self) -> bool {
        self.vel *= self.friction;
        self.vel.y += self.gravity;
        self.pos += self.vel;
        self.alpha -= self.decay;
        self.alpha > 0.0
    }

    /// Bright enough to get a bloom halo
    #[inline]
    pub fn has_halo(&self) -> bool {
        self.alpha > HALO_ALPHA_THRESHOLD
    }
}

/// Lifecycle phase of a firework
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FireworkPhase {
    /// Rising toward its burst altitude
    Ascending,
    /// Burst, particles still alive
    Bursting,
    /// Burst and every particle faded; removed at the end of the frame
    Spent,
}

/// A rocket that rises, then bursts into particles
#[derive(Debug, Clone, Serialize)]
pub struct Firework {
    pub pos: Vec2,
    /// Burst altitude (y decreases while rising)
    pub target_y: f32,
    /// Upward px/frame until the burst
    pub speed: f32,
    pub color: Rgb,
    exploded: bool,
    particles: Vec<Particle>,
}

impl Firework {
    pub fn new(pos: Vec2, target_y: f32, speed: f32, color: Rgb) -> Self {
        Self {
            pos,
            target_y,
            speed,
            color,
            exploded: false,
            particles: Vec::new(),
        }
    }

    pub fn is_exploded(&self) -> bool {
        self.exploded
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn phase(&self) -> FireworkPhase {
        match (self.exploded, self.particles.is_empty()) {
            (false, _) => FireworkPhase::Ascending,
            (true, false) => FireworkPhase::Bursting,
            (true, true) => FireworkPhase::Spent,
        }
    }

    /// Rise one frame. Returns true once the burst altitude is reached.
    #[inline]
    pub fn ascend(&mut self) -> bool {
        self.pos.y -= self.speed;
        self.pos.y <= self.target_y
    }

    /// Flip to exploded and take ownership of the burst particles.
    ///
    /// Returns the buffer untouched (as `Err`) if this firework already
    /// exploded, so a burst can never happen twice.
    pub(crate) fn explode(&mut self, particles: Vec<Particle>) -> Result<(), Vec<Particle>> {
        if self.exploded {
            return Err(particles);
        }
        self.exploded = true;
        self.particles = particles;
        Ok(())
    }

    pub(crate) fn particles_mut(&mut self) -> &mut Vec<Particle> {
        &mut self.particles
    }

    /// Give back the (emptied) particle buffer for reuse
    pub(crate) fn into_particles(self) -> Vec<Particle> {
        self.particles
    }
}
