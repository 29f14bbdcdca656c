//! Headless surface that records draw calls
//!
//! Used by tests to assert what a frame drew, and by the native binary to run
//! a show without a window.

use glam::Vec2;
use serde::Serialize;

use super::surface::{BlendMode, GradientStop, Surface};
use crate::color::Rgb;

/// One recorded draw call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawCommand {
    Background {
        width: f32,
        height: f32,
        stops: Vec<GradientStop>,
    },
    Blend(BlendMode),
    Glow {
        center: Vec2,
        radius: f32,
        color: Rgb,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Rgb,
        alpha: f32,
    },
}

/// Recording surface
#[derive(Debug, Default)]
pub struct Recorder {
    commands: Vec<DrawCommand>,
    blend: BlendMode,
    /// Fills issued while additive blending was active
    additive_fills: usize,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands recorded since the last [`Recorder::clear`]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Current blend mode
    pub fn blend(&self) -> BlendMode {
        self.blend
    }

    pub fn additive_fills(&self) -> usize {
        self.additive_fills
    }

    /// Drop recorded commands (keeps the allocation and blend state)
    pub fn clear(&mut self) {
        self.commands.clear();
        self.additive_fills = 0;
    }

    pub fn glows(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Glow { .. }))
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
    }

    fn push_fill(&mut self, command: DrawCommand) {
        if self.blend == BlendMode::Lighter {
            self.additive_fills += 1;
        }
        self.commands.push(command);
    }
}

impl Surface for Recorder {
    fn fill_vertical_gradient(&mut self, width: f32, height: f32, stops: &[GradientStop]) {
        self.push_fill(DrawCommand::Background {
            width,
            height,
            stops: stops.to_vec(),
        });
    }

    fn set_blend(&mut self, mode: BlendMode) {
        self.blend = mode;
        self.commands.push(DrawCommand::Blend(mode));
    }

    fn fill_glow(&mut self, center: Vec2, radius: f32, color: Rgb) {
        self.push_fill(DrawCommand::Glow {
            center,
            radius,
            color,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32) {
        self.push_fill(DrawCommand::Circle {
            center,
            radius,
            color,
            alpha,
        });
    }
}
