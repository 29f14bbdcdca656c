//! Browser `<canvas>` 2D context surface

use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::surface::{BlendMode, GradientStop, Surface};
use crate::color::Rgb;
use crate::error::EngineError;

/// Surface backed by a canvas element's 2D context
pub struct Canvas2d {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    /// Reused `rgba(...)` buffer for fill styles
    style: String,
}

impl Canvas2d {
    /// Look up `<canvas id=...>` in the current document
    pub fn from_element_id(id: &str) -> Result<Self, EngineError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or(EngineError::NoWindow)?;
        let canvas = document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
            .ok_or_else(|| EngineError::NoCanvas(id.to_string()))?;
        Self::from_canvas(canvas)
    }

    /// Wrap a canvas; fails if it cannot give an opaque 2D context
    pub fn from_canvas(canvas: HtmlCanvasElement) -> Result<Self, EngineError> {
        // Opaque backbuffer: the sky gradient covers every pixel each frame
        let options = js_sys::Object::new();
        let _ = js_sys::Reflect::set(&options, &JsValue::from_str("alpha"), &JsValue::FALSE);

        let ctx = canvas
            .get_context_with_context_options("2d", &options)
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or(EngineError::SurfaceUnavailable)?;

        Ok(Self {
            canvas,
            ctx,
            style: String::with_capacity(32),
        })
    }

    /// Resize the pixel buffer
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    pub fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn circle_path(&self, center: Vec2, radius: f32) {
        self.ctx.begin_path();
        let _ = self
            .ctx
            .arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU);
    }
}

impl Surface for Canvas2d {
    fn fill_vertical_gradient(&mut self, width: f32, height: f32, stops: &[GradientStop]) {
        let gradient = self.ctx.create_linear_gradient(0.0, 0.0, 0.0, height as f64);
        for stop in stops {
            let _ = gradient.add_color_stop(stop.offset, &stop.color.to_hex());
        }
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.ctx.fill_rect(0.0, 0.0, width as f64, height as f64);
    }

    fn set_blend(&mut self, mode: BlendMode) {
        let _ = self.ctx.set_global_composite_operation(mode.as_str());
    }

    fn fill_glow(&mut self, center: Vec2, radius: f32, color: Rgb) {
        let (x, y) = (center.x as f64, center.y as f64);
        let Ok(glow) = self
            .ctx
            .create_radial_gradient(x, y, 0.0, x, y, radius as f64)
        else {
            return;
        };
        let _ = glow.add_color_stop(0.0, &color.to_hex());
        let _ = glow.add_color_stop(1.0, "transparent");
        self.ctx.set_fill_style_canvas_gradient(&glow);
        self.circle_path(center, radius);
        self.ctx.fill();
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32) {
        self.style.clear();
        let _ = color.write_css_rgba(alpha, &mut self.style);
        self.ctx.set_fill_style_str(&self.style);
        self.circle_path(center, radius);
        self.ctx.fill();
    }
}
