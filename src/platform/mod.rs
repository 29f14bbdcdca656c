//! Platform helpers
//!
//! Browser-facing glue that stays outside the engine:
//! - Input (swipe-to-launch gestures)

pub mod input;

pub use input::{LaunchRequest, SwipeTracker};
