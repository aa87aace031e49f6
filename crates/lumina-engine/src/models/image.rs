use serde::{Deserialize, Serialize};

use crate::error::EditorError;

/// Normalized sub-rectangle of the source image that is visible in the layer.
///
/// `x`/`y` is the top-left of the viewport and `width`/`height` its size, all
/// relative to the source. A width below one zooms in. Pan is deliberately not
/// clamped against the size, so a window may reach past the source edge and
/// expose empty (letterboxed) area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropWindow {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropWindow {
    pub const FULL: CropWindow = CropWindow {
        x: 0.0,
        y: 0.0,
        width: 1.0,
        height: 1.0,
    };

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Result<Self, EditorError> {
        let crop = Self {
            x,
            y,
            width,
            height,
        };
        crop.validate()?;
        Ok(crop)
    }

    /// `0 <= x, y` and `0 < width, height <= 1`
    pub fn validate(&self) -> Result<(), EditorError> {
        let values = [self.x, self.y, self.width, self.height];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(EditorError::invalid("crop values must be finite"));
        }
        if self.x < 0.0 || self.y < 0.0 {
            return Err(EditorError::invalid(format!(
                "crop offset must not be negative, got ({}, {})",
                self.x, self.y
            )));
        }
        let in_range = |v: f64| v > 0.0 && v <= 1.0;
        if !in_range(self.width) || !in_range(self.height) {
            return Err(EditorError::invalid(format!(
                "crop size must be within (0, 1], got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Uniform zoom: both dimensions become `scale`, the offset is kept
    pub fn with_zoom(self, scale: f64) -> Result<Self, EditorError> {
        Self::new(self.x, self.y, scale, scale)
    }

    pub fn panned(self, x: f64, y: f64) -> Result<Self, EditorError> {
        Self::new(x, y, self.width, self.height)
    }

    /// Magnification factor shown to users (`1 / width`)
    pub fn zoom_factor(&self) -> f64 {
        1.0 / self.width
    }

    /// Whether the window reaches past the source edges
    pub fn exposes_empty_area(&self) -> bool {
        self.x + self.width > 1.0 || self.y + self.height > 1.0
    }
}

/// Two-colour linear gradient painted over an image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientOverlay {
    pub enabled: bool,
    pub colors: [String; 2],
    /// Degrees
    pub direction: f64,
    pub opacity: f64,
}

impl Default for GradientOverlay {
    fn default() -> Self {
        Self {
            enabled: false,
            colors: ["transparent".to_string(), "black".to_string()],
            direction: 180.0,
            opacity: 0.5,
        }
    }
}

/// Colour filters, all in percent except `blur` (px)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Filters {
    pub brightness: f64,
    pub contrast: f64,
    pub saturate: f64,
    pub grayscale: f64,
    pub sepia: f64,
    pub blur: f64,
}

impl Default for Filters {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Filters {
    pub const IDENTITY: Filters = Filters {
        brightness: 100.0,
        contrast: 100.0,
        saturate: 100.0,
        grayscale: 0.0,
        sepia: 0.0,
        blur: 0.0,
    };

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn validate(&self) -> Result<(), EditorError> {
        let checks = [
            ("brightness", self.brightness, 200.0),
            ("contrast", self.contrast, 200.0),
            ("saturate", self.saturate, 200.0),
            ("grayscale", self.grayscale, 100.0),
            ("sepia", self.sepia, 100.0),
        ];
        for (name, value, max) in checks {
            if !(0.0..=max).contains(&value) {
                return Err(EditorError::invalid(format!(
                    "{name} must be within [0, {max}], got {value}"
                )));
            }
        }
        if !(self.blur.is_finite() && self.blur >= 0.0) {
            return Err(EditorError::invalid(format!(
                "blur must be a non-negative number, got {}",
                self.blur
            )));
        }
        Ok(())
    }
}

/// Image-specific layer content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageLayer {
    /// Opaque handle understood by the renderer (URI, data URL, path...)
    pub source: String,
    pub flip_x: bool,
    pub flip_y: bool,
    pub crop: Option<CropWindow>,
    pub gradient_overlay: Option<GradientOverlay>,
    pub filters: Filters,
}
