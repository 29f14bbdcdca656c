//! Drawing surface trait and shared draw types

use glam::Vec2;
use serde::Serialize;

use crate::color::Rgb;

/// Compositing mode for subsequent fills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum BlendMode {
    /// Normal alpha blending ("source-over")
    #[default]
    SourceOver,
    /// Additive blending ("lighter"): overlapping glows brighten
    Lighter,
}

impl BlendMode {
    /// Canvas `globalCompositeOperation` name
    pub fn as_str(&self) -> &'static str {
        match self {
            BlendMode::SourceOver => "source-over",
            BlendMode::Lighter => "lighter",
        }
    }
}

/// A color stop of a linear gradient (offset in 0..=1)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Rgb,
}

/// Night sky backdrop, top to bottom
pub const SKY_GRADIENT: [GradientStop; 3] = [
    // Near-black navy
    GradientStop {
        offset: 0.0,
        color: Rgb::new(0x02, 0x06, 0x17),
    },
    // Dark slate
    GradientStop {
        offset: 0.6,
        color: Rgb::new(0x0f, 0x17, 0x2a),
    },
    // Deep indigo
    GradientStop {
        offset: 1.0,
        color: Rgb::new(0x1e, 0x1b, 0x4b),
    },
];

/// A 2D drawing target.
///
/// Coordinates are surface pixels with y growing downward. Implementations
/// must apply the last [`BlendMode`] set to every later fill.
pub trait Surface {
    /// Fill the rectangle (0, 0, width, height) with a vertical linear gradient.
    fn fill_vertical_gradient(&mut self, width: f32, height: f32, stops: &[GradientStop]);

    /// Switch the compositing mode.
    fn set_blend(&mut self, mode: BlendMode);

    /// Fill a circle with a radial gradient from `color` at the center to
    /// fully transparent at `radius`.
    fn fill_glow(&mut self, center: Vec2, radius: f32, color: Rgb);

    /// Fill a solid circle with `color` at the given opacity.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32);
}

impl<S: Surface + ?Sized> Surface for Box<S> {
    fn fill_vertical_gradient(&mut self, width: f32, height: f32, stops: &[GradientStop]) {
        (**self).fill_vertical_gradient(width, height, stops)
    }

    fn set_blend(&mut self, mode: BlendMode) {
        (**self).set_blend(mode)
    }

    fn fill_glow(&mut self, center: Vec2, radius: f32, color: Rgb) {
        (**self).fill_glow(center, radius, color)
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32) {
        (**self).fill_circle(center, radius, color, alpha)
    }
}
