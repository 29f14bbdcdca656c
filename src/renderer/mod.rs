//! 2D drawing surfaces
//!
//! The engine draws through the [`Surface`] trait. The browser build renders to
//! a `<canvas>` 2D context; tests and the native binary use [`Recorder`].

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod recorder;
pub mod surface;

#[cfg(target_arch = "wasm32")]
pub use canvas::Canvas2d;
pub use recorder::{DrawCommand, Recorder};
pub use surface::{BlendMode, GradientStop, SKY_GRADIENT, Surface};
