//! Error types
//!
//! The engine itself never fails once built; these cover acquiring a drawing
//! surface from the host page and loading settings.

use std::fmt;

/// Errors that prevent an engine from being set up.
#[derive(Debug)]
pub enum EngineError {
    /// No browser `window` (not running in a page).
    NoWindow,
    /// The page has no `<canvas>` with the given id.
    NoCanvas(String),
    /// The canvas could not provide a 2D rendering context.
    SurfaceUnavailable,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::NoWindow => write!(f, "No browser window available"),
            EngineError::NoCanvas(id) => write!(f, "No canvas element with id {:?}", id),
            EngineError::SurfaceUnavailable => write!(f, "Canvas 2D context not found"),
        }
    }
}

impl std::error::Error for EngineError {}

/// Errors that can occur while loading settings.
#[derive(Debug)]
pub enum SettingsError {
    /// Malformed JSON, or a field with the wrong shape (including bad colors).
    Json(serde_json::Error),
    /// The palette has fewer colors than the engine requires.
    PaletteTooSmall { found: usize, min: usize },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Json(e) => write!(f, "Failed to parse settings: {}", e),
            SettingsError::PaletteTooSmall { found, min } => write!(
                f,
                "Palette has {} colors, at least {} are required",
                found, min
            ),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::Json(e)
    }
}
