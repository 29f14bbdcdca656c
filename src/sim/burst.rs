//! Burst generation and particle buffer reuse

use glam::Vec2;
use rand::Rng;

use super::state::Particle;
use crate::color::Rgb;
use crate::consts::*;
use crate::polar_to_cartesian;

/// Spare buffers kept around; more than this are freed
const MAX_SPARE_BUFFERS: usize = 16;

/// Recycles particle buffers of spent fireworks so bursts don't allocate
#[derive(Debug, Default)]
pub struct ParticlePool {
    spare: Vec<Vec<Particle>>,
}

impl ParticlePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty buffer with room for a full burst
    pub fn take(&mut self) -> Vec<Particle> {
        self.spare
            .pop()
            .unwrap_or_else(|| Vec::with_capacity(BURST_COUNT_MAX))
    }

    /// Return a buffer; its contents are discarded
    pub fn give(&mut self, mut buffer: Vec<Particle>) {
        if self.spare.len() < MAX_SPARE_BUFFERS {
            buffer.clear();
            self.spare.push(buffer);
        }
    }

    pub fn spare(&self) -> usize {
        self.spare.len()
    }
}

/// Fill `out` with a spherical burst at `origin`, returning the count added.
///
/// Directions are uniform over the full circle; speed, size and decay are
/// drawn independently per particle.
pub fn burst<R: Rng + ?Sized>(rng: &mut R, origin: Vec2, color: Rgb, out: &mut Vec<Particle>) -> usize {
    let count = rng.random_range(BURST_COUNT_MIN..BURST_COUNT_MAX);
    out.reserve(count);

    for _ in 0..count {
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let speed = rng.random_range(BURST_SPEED_MIN..BURST_SPEED_MAX);
        out.push(Particle {
            pos: origin,
            vel: polar_to_cartesian(speed, angle),
            alpha: 1.0,
            color,
            size: rng.random_range(PARTICLE_SIZE_MIN..PARTICLE_SIZE_MAX),
            friction: PARTICLE_FRICTION,
            gravity: PARTICLE_GRAVITY,
            decay: rng.random_range(PARTICLE_DECAY_MIN..PARTICLE_DECAY_MAX),
        });
    }

    count
}
