//! The simulation engine
//!
//! Owns every live firework and its particles, steps physics once per frame
//! and draws the result to a [`Surface`]. The engine is passive: a frame
//! driver calls [`Engine::update_and_draw`] once per display frame and input
//! handling calls [`Engine::launch`].

use std::panic::{AssertUnwindSafe, catch_unwind};

use glam::Vec2;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::burst::{ParticlePool, burst};
use super::state::{Firework, Particle};
use crate::color::{DEFAULT_PALETTE, Rgb};
use crate::consts::*;
use crate::renderer::{BlendMode, SKY_GRADIENT, Surface};
use crate::settings::Settings;

/// Called once per burst (e.g. to play a sound)
pub type ExplosionHook = Box<dyn FnMut()>;

/// Fireworks simulation bound to a drawing surface
pub struct Engine<S: Surface, R: Rng = Pcg32> {
    surface: S,
    rng: R,
    /// Live fireworks, unordered
    fireworks: Vec<Firework>,
    width: f32,
    height: f32,
    palette: Vec<Rgb>,
    pool: ParticlePool,
    explosions: u64,
    on_explode: Option<ExplosionHook>,
}

impl<S: Surface> Engine<S, Pcg32> {
    /// Create an engine drawing to `surface`, seeded from the OS
    pub fn new(surface: S, width: f32, height: f32) -> Self {
        Self::with_rng(surface, width, height, Pcg32::from_os_rng())
    }
}

impl<S: Surface, R: Rng> Engine<S, R> {
    /// Create an engine with a caller-supplied generator (seed it for tests)
    pub fn with_rng(surface: S, width: f32, height: f32, rng: R) -> Self {
        Self {
            surface,
            rng,
            fireworks: Vec::new(),
            width,
            height,
            palette: DEFAULT_PALETTE.to_vec(),
            pool: ParticlePool::new(),
            explosions: 0,
            on_explode: None,
        }
    }

    /// Use the palette from `settings`.
    ///
    /// Settings that fail validation leave the current palette in place.
    pub fn with_settings(mut self, settings: &Settings) -> Self {
        match settings.validate() {
            Ok(()) => self.palette = settings.palette.clone(),
            Err(e) => log::warn!("Keeping current palette: {}", e),
        }
        self
    }

    /// Register a callback fired once per burst.
    ///
    /// A panicking hook is caught and logged where unwinding is available.
    /// On wasm32 panics abort, so there a panicking hook ends the page's
    /// script like any other panic.
    pub fn on_explode(mut self, hook: impl FnMut() + 'static) -> Self {
        self.on_explode = Some(Box::new(hook));
        self
    }

    /// Queue a new rocket from the bottom edge.
    ///
    /// `x` is used as given; `None` picks a spot in the middle 60% of the
    /// width. Never draws.
    pub fn launch(&mut self, x: Option<f32>) {
        let x = x.unwrap_or_else(|| {
            self.width * self.rng.random_range(LAUNCH_X_MIN_FRAC..LAUNCH_X_MAX_FRAC)
        });
        let target_y = self.height * self.rng.random_range(TARGET_Y_MIN_FRAC..TARGET_Y_MAX_FRAC);
        let speed = self.rng.random_range(ROCKET_SPEED_MIN..ROCKET_SPEED_MAX);
        let color = self.palette.choose(&mut self.rng).copied().unwrap_or(Rgb::WHITE);

        log::debug!("Launch at x={:.1}, burst at y={:.1}, speed {:.2}", x, target_y, speed);
        self.fireworks.push(Firework::new(
            Vec2::new(x, self.height),
            target_y,
            speed,
            color,
        ));
    }

    /// Set the viewport size used by later launches and the backdrop.
    /// Live fireworks keep their coordinates.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Step every firework one frame and draw it.
    ///
    /// Paints the sky (replacing the previous frame), draws rockets and
    /// particles with additive blending, and restores normal blending before
    /// returning.
    pub fn update_and_draw(&mut self) {
        let Self {
            surface,
            rng,
            fireworks,
            width,
            height,
            pool,
            explosions,
            on_explode,
            ..
        } = self;

        surface.fill_vertical_gradient(*width, *height, &SKY_GRADIENT);
        surface.set_blend(BlendMode::Lighter);

        // Reverse scan so swap_remove only moves already-visited fireworks
        for i in (0..fireworks.len()).rev() {
            let firework = &mut fireworks[i];

            if !firework.is_exploded() {
                let reached = firework.ascend();
                surface.fill_glow(firework.pos, ROCKET_GLOW_RADIUS, firework.color);

                if reached {
                    let mut particles = pool.take();
                    let count = burst(rng, firework.pos, firework.color, &mut particles);
                    if let Err(unused) = firework.explode(particles) {
                        pool.give(unused);
                        continue;
                    }
                    *explosions += 1;
                    log::debug!(
                        "Burst at ({:.1}, {:.1}) with {} particles",
                        firework.pos.x,
                        firework.pos.y,
                        count
                    );
                    notify(on_explode);
                }
            } else {
                step_particles(surface, firework.particles_mut());

                if firework.particles().is_empty() {
                    let spent = fireworks.swap_remove(i);
                    pool.give(spent.into_particles());
                }
            }
        }

        surface.set_blend(BlendMode::SourceOver);

        log::trace!(
            "Frame: {} fireworks, {} particles",
            self.fireworks.len(),
            self.live_particles()
        );
    }

    /// Live fireworks, in no particular order
    pub fn fireworks(&self) -> &[Firework] {
        &self.fireworks
    }

    /// Total particles across all fireworks
    pub fn live_particles(&self) -> usize {
        self.fireworks.iter().map(|f| f.particles().len()).sum()
    }

    /// Current viewport size
    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Bursts since the engine was created
    pub fn explosions(&self) -> u64 {
        self.explosions
    }

    pub fn palette(&self) -> &[Rgb] {
        &self.palette
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Tear down the simulation and hand back the surface
    pub fn into_surface(self) -> S {
        self.surface
    }
}

/// Integrate, fade, cull and draw one firework's particles
fn step_particles<S: Surface>(surface: &mut S, particles: &mut Vec<Particle>) {
    particles.retain_mut(|p| {
        if !p.step() {
            return false;
        }
        surface.fill_circle(p.pos, p.size, p.color, p.alpha);
        if p.has_halo() {
            surface.fill_circle(
                p.pos,
                p.size * HALO_RADIUS_SCALE,
                p.color,
                p.alpha * HALO_ALPHA_SCALE,
            );
        }
        true
    });
}

/// Run the burst hook; a panicking hook never takes the frame down
fn notify(hook: &mut Option<ExplosionHook>) {
    if let Some(hook) = hook.as_mut() {
        if catch_unwind(AssertUnwindSafe(|| hook())).is_err() {
            log::warn!("Explosion hook panicked, ignoring");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{DrawCommand, Recorder};
    use std::cell::Cell;
    use std::rc::Rc;

    fn engine(seed: u64) -> Engine<Recorder> {
        Engine::with_rng(Recorder::new(), 800.0, 600.0, Pcg32::seed_from_u64(seed))
    }

    /// Frames until the (only) firework bursts
    fn frames_to_burst(engine: &mut Engine<Recorder>) -> u32 {
        let mut frames = 0;
        while !engine.fireworks()[0].is_exploded() {
            engine.update_and_draw();
            frames += 1;
            assert!(frames < 1000, "firework never burst");
        }
        frames
    }

    #[test]
    fn test_launch_defaults() {
        let mut engine = engine(1);
        engine.launch(Some(400.0));

        let fw = &engine.fireworks()[0];
        assert_eq!(fw.pos, Vec2::new(400.0, 600.0));
        assert!(!fw.is_exploded());
        assert!(fw.particles().is_empty());
        assert!(fw.target_y >= 60.0 && fw.target_y <= 300.0);
        assert!(fw.speed >= ROCKET_SPEED_MIN && fw.speed < ROCKET_SPEED_MAX);
        assert!(engine.palette().contains(&fw.color));
    }

    #[test]
    fn test_launch_at_zero_is_honoured() {
        let mut engine = engine(2);
        engine.launch(Some(0.0));
        assert_eq!(engine.fireworks()[0].pos.x, 0.0);
    }

    #[test]
    fn test_launch_without_x_stays_central() {
        let mut engine = engine(3);
        for _ in 0..10 {
            engine.launch(None);
        }
        assert_eq!(engine.fireworks().len(), 10);
        for fw in engine.fireworks() {
            assert!(fw.pos.x >= 0.2 * 800.0 && fw.pos.x <= 0.8 * 800.0, "{}", fw.pos.x);
        }
    }

    #[test]
    fn test_launch_does_not_draw() {
        let mut engine = engine(4);
        engine.launch(None);
        assert!(engine.surface().commands().is_empty());
    }

    #[test]
    fn test_scenario_launch_burst_fade() {
        let mut engine = engine(2026);
        engine.launch(Some(400.0));

        let (target_y, speed) = {
            let fw = &engine.fireworks()[0];
            (fw.target_y, fw.speed)
        };
        assert!(target_y <= 300.0);

        let frames = frames_to_burst(&mut engine);
        let expected = ((600.0 - target_y) / speed).ceil() as u32;
        // One frame of slack for f32 accumulation in y
        assert!(frames.abs_diff(expected) <= 1, "{} vs {}", frames, expected);

        let count = engine.fireworks()[0].particles().len();
        assert!((BURST_COUNT_MIN..BURST_COUNT_MAX).contains(&count));
        assert_eq!(engine.explosions(), 1);

        // Slowest decay is 0.008/frame: everything is gone within ~125 frames
        for _ in 0..130 {
            engine.update_and_draw();
        }
        assert!(engine.fireworks().is_empty());
        assert_eq!(engine.live_particles(), 0);
    }

    #[test]
    fn test_burst_happens_exactly_once() {
        let mut engine = engine(5);
        engine.launch(Some(100.0));
        frames_to_burst(&mut engine);

        let mut last = engine.fireworks()[0].particles().len();
        while let Some(fw) = engine.fireworks().first() {
            // Count never grows again after the burst
            assert!(fw.particles().len() <= last);
            last = fw.particles().len();
            engine.update_and_draw();
        }
        assert_eq!(engine.explosions(), 1);
    }

    #[test]
    fn test_never_bursts_early() {
        let mut engine = engine(6);
        engine.launch(Some(300.0));
        loop {
            let before = engine.fireworks()[0].clone();
            engine.update_and_draw();
            let after = &engine.fireworks()[0];
            if after.is_exploded() {
                assert!(after.pos.y <= after.target_y);
                break;
            }
            assert!(after.pos.y > after.target_y);
            assert_eq!(after.pos.y, before.pos.y - before.speed);
        }
    }

    #[test]
    fn test_frame_draw_order() {
        let mut engine = engine(7);
        engine.launch(Some(200.0));
        engine.update_and_draw();

        let commands = engine.surface().commands();
        assert_eq!(
            commands[0],
            DrawCommand::Background {
                width: 800.0,
                height: 600.0,
                stops: SKY_GRADIENT.to_vec(),
            }
        );
        assert_eq!(commands[1], DrawCommand::Blend(BlendMode::Lighter));

        let rocket = &engine.fireworks()[0];
        let glows: Vec<_> = engine.surface().glows().collect();
        assert_eq!(
            glows,
            vec![&DrawCommand::Glow {
                center: rocket.pos,
                radius: ROCKET_GLOW_RADIUS,
                color: rocket.color,
            }]
        );
        assert_eq!(&commands[2], glows[0]);
        assert_eq!(
            commands.last(),
            Some(&DrawCommand::Blend(BlendMode::SourceOver))
        );
        assert_eq!(engine.surface().blend(), BlendMode::SourceOver);
    }

    #[test]
    fn test_sky_gradient_stops() {
        let mut engine = engine(17);
        engine.resize(1024.0, 768.0);
        engine.update_and_draw();

        let DrawCommand::Background {
            width,
            height,
            stops,
        } = &engine.surface().commands()[0]
        else {
            panic!("frame did not start with the sky");
        };
        assert_eq!((*width, *height), (1024.0, 768.0));
        let stops: Vec<_> = stops.iter().map(|s| (s.offset, s.color.to_hex())).collect();
        assert_eq!(
            stops,
            vec![
                (0.0, "#020617".to_string()),
                (0.6, "#0f172a".to_string()),
                (1.0, "#1e1b4b".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_frame_still_paints_sky() {
        let mut engine = engine(8);
        engine.update_and_draw();
        assert_eq!(engine.surface().commands().len(), 3);
        assert_eq!(engine.surface().additive_fills(), 0);
    }

    #[test]
    fn test_particles_drawn_with_halo_while_bright() {
        let mut engine = engine(9);
        engine.launch(Some(400.0));
        frames_to_burst(&mut engine);

        engine.surface_mut().clear();
        engine.update_and_draw();
        let particles = engine.fireworks()[0].particles();
        // First frame after the burst: alpha is still > 0.5, so core + halo each
        let circles: Vec<_> = engine.surface().circles().collect();
        assert_eq!(circles.len(), particles.len() * 2);

        for (pair, p) in circles.chunks(2).zip(particles) {
            let (
                DrawCommand::Circle {
                    center,
                    radius,
                    color,
                    alpha,
                },
                DrawCommand::Circle {
                    center: halo_center,
                    radius: halo_radius,
                    color: halo_color,
                    alpha: halo_alpha,
                },
            ) = (pair[0], pair[1])
            else {
                panic!("expected core and halo circles");
            };
            assert_eq!(*center, p.pos);
            assert_eq!(*radius, p.size);
            assert_eq!(*alpha, p.alpha);
            assert_eq!(halo_center, center);
            assert_eq!(halo_color, color);
            assert!((*halo_radius - radius * 4.0).abs() < 1e-5);
            assert!((*halo_alpha - alpha * 0.2).abs() < 1e-6);
        }
    }

    #[test]
    fn test_dim_particles_lose_halo() {
        let mut engine = engine(10);
        engine.launch(Some(400.0));
        frames_to_burst(&mut engine);

        loop {
            engine.surface_mut().clear();
            engine.update_and_draw();
            let Some(fw) = engine.fireworks().first() else {
                break;
            };
            let halos = fw.particles().iter().filter(|p| p.alpha > 0.5).count();
            assert_eq!(
                engine.surface().circles().count(),
                fw.particles().len() + halos
            );
        }
    }

    #[test]
    fn test_launches_never_dropped() {
        let mut engine = engine(11);
        for _ in 0..50 {
            engine.launch(Some(400.0));
        }
        assert_eq!(engine.fireworks().len(), 50);
    }

    #[test]
    fn test_settings_palette_used_for_launches() {
        let palette = vec![Rgb::new(1, 2, 3); MIN_PALETTE_SIZE];
        let mut engine = engine(18).with_settings(&Settings {
            palette: palette.clone(),
        });
        assert_eq!(engine.palette(), palette.as_slice());

        engine.launch(None);
        assert_eq!(engine.fireworks()[0].color, Rgb::new(1, 2, 3));
    }

    #[test]
    fn test_invalid_settings_keep_palette() {
        let engine = engine(19).with_settings(&Settings {
            palette: vec![Rgb::WHITE],
        });
        assert_eq!(engine.palette(), DEFAULT_PALETTE.as_slice());
    }

    #[test]
    fn test_resize_keeps_live_positions() {
        let mut engine = engine(12);
        engine.launch(Some(700.0));
        engine.update_and_draw();
        let before = engine.fireworks()[0].pos;

        engine.resize(320.0, 240.0);
        assert_eq!(engine.fireworks()[0].pos, before);
        assert_eq!(engine.size(), (320.0, 240.0));

        // Off-surface fireworks are still simulated
        engine.update_and_draw();
        assert!(engine.fireworks()[0].pos.y < before.y);

        // New launches use the new size
        engine.launch(None);
        let fw = &engine.fireworks()[1];
        assert_eq!(fw.pos.y, 240.0);
        assert!(fw.pos.x >= 64.0 && fw.pos.x <= 256.0);
        assert!(fw.target_y >= 24.0 && fw.target_y <= 120.0);
    }

    #[test]
    fn test_many_fireworks_all_retire() {
        let mut engine = engine(13);
        for i in 0..12 {
            engine.launch(Some(50.0 + i as f32 * 60.0));
            engine.update_and_draw();
        }
        for _ in 0..200 {
            engine.update_and_draw();
        }
        assert!(engine.fireworks().is_empty());
        assert_eq!(engine.explosions(), 12);
    }

    #[test]
    fn test_explosion_hook_called_once_per_burst() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let mut engine = engine(14).on_explode(move || counter.set(counter.get() + 1));

        engine.launch(Some(100.0));
        engine.launch(Some(500.0));
        for _ in 0..200 {
            engine.update_and_draw();
        }
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_panicking_hook_is_swallowed() {
        let mut engine = engine(15).on_explode(|| panic!("speaker unplugged"));
        engine.launch(Some(400.0));
        frames_to_burst(&mut engine);

        // Frame completed: blend restored and the burst kept
        assert_eq!(engine.surface().blend(), BlendMode::SourceOver);
        assert!(!engine.fireworks()[0].particles().is_empty());
    }

    #[test]
    fn test_same_seed_same_show() {
        let mut a = engine(99);
        let mut b = engine(99);
        for _ in 0..3 {
            a.launch(None);
            b.launch(None);
        }
        for _ in 0..40 {
            a.update_and_draw();
            b.update_and_draw();
        }
        assert_eq!(a.live_particles(), b.live_particles());
        assert_eq!(a.surface().commands(), b.surface().commands());
    }

    #[test]
    fn test_into_surface_releases_engine() {
        let mut engine = engine(16);
        engine.update_and_draw();
        let recorder = engine.into_surface();
        assert_eq!(recorder.commands().len(), 3);
    }
}
