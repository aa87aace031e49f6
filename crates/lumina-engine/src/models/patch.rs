//! Partial updates applied to layers.
//!
//! A [`LayerPatch`] is a shallow merge: every `Some` field replaces the
//! layer's value, every `None` field is left alone. Nested structures (glow,
//! filters, crop, gradient overlay, backdrop) are replaced as a whole. The
//! `*Patch` helpers at the bottom merge individual sub-fields into an existing
//! structure first, so callers don't have to copy the untouched fields by hand.

use std::str::FromStr;

use crate::error::EditorError;
use crate::models::{
    Backdrop, CropWindow, Filters, FontStyle, GradientOverlay, Glow, Layer, LayerKind, TextAlign,
    TextDecoration, TextFill,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerPatch {
    pub name: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: Option<f64>,
    pub opacity: Option<f64>,
    pub visible: Option<bool>,
    pub locked: Option<bool>,
    /// `Some(None)` removes the glow
    pub glow: Option<Option<Glow>>,
    pub text: Option<TextPatch>,
    pub image: Option<ImagePatch>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextPatch {
    pub text: Option<String>,
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
    pub font_weight: Option<String>,
    pub font_style: Option<FontStyle>,
    pub text_decoration: Option<TextDecoration>,
    pub fill: Option<TextFill>,
    pub align: Option<TextAlign>,
    pub letter_spacing: Option<f64>,
    pub line_height: Option<f64>,
    pub stroke_color: Option<String>,
    pub stroke_width: Option<f64>,
    pub backdrop: Option<Backdrop>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImagePatch {
    pub source: Option<String>,
    pub flip_x: Option<bool>,
    pub flip_y: Option<bool>,
    /// `Some(None)` removes the crop
    pub crop: Option<Option<CropWindow>>,
    /// `Some(None)` removes the overlay
    pub gradient_overlay: Option<Option<GradientOverlay>>,
    pub filters: Option<Filters>,
}

impl LayerPatch {
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    pub fn bounds(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    pub fn rotation(degrees: f64) -> Self {
        Self {
            rotation: Some(degrees),
            ..Self::default()
        }
    }

    pub fn text(patch: TextPatch) -> Self {
        Self {
            text: Some(patch),
            ..Self::default()
        }
    }

    pub fn image(patch: ImagePatch) -> Self {
        Self {
            image: Some(patch),
            ..Self::default()
        }
    }

    /// Build a patch from raw form input for a numeric field.
    ///
    /// Text that does not parse to a finite number is rejected so a layer can
    /// never end up holding `NaN`.
    pub fn numeric(field: NumericField, raw: &str) -> Result<Self, EditorError> {
        let value: f64 = raw.trim().parse().map_err(|_| {
            EditorError::invalid(format!("'{raw}' is not a number for {}", field.name()))
        })?;
        if !value.is_finite() {
            return Err(EditorError::invalid(format!(
                "{} must be a finite number, got '{raw}'",
                field.name()
            )));
        }

        let patch = match field {
            NumericField::X => Self {
                x: Some(value),
                ..Self::default()
            },
            NumericField::Y => Self {
                y: Some(value),
                ..Self::default()
            },
            NumericField::Width => Self {
                width: Some(value),
                ..Self::default()
            },
            NumericField::Height => Self {
                height: Some(value),
                ..Self::default()
            },
            NumericField::Rotation => Self::rotation(value),
            NumericField::Opacity => Self {
                opacity: Some(value),
                ..Self::default()
            },
            NumericField::FontSize => Self::text(TextPatch {
                font_size: Some(value),
                ..TextPatch::default()
            }),
            NumericField::LetterSpacing => Self::text(TextPatch {
                letter_spacing: Some(value),
                ..TextPatch::default()
            }),
            NumericField::LineHeight => Self::text(TextPatch {
                line_height: Some(value),
                ..TextPatch::default()
            }),
            NumericField::StrokeWidth => Self::text(TextPatch {
                stroke_width: Some(value),
                ..TextPatch::default()
            }),
        };
        Ok(patch)
    }

    pub fn is_empty(&self) -> bool {
        self.touched_fields().is_empty()
    }

    /// Names of the fields this patch writes, in declaration order
    pub fn touched_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        let mut mark = |set: bool, name: &'static str| {
            if set {
                fields.push(name);
            }
        };
        mark(self.name.is_some(), "name");
        mark(self.x.is_some(), "x");
        mark(self.y.is_some(), "y");
        mark(self.width.is_some(), "width");
        mark(self.height.is_some(), "height");
        mark(self.rotation.is_some(), "rotation");
        mark(self.opacity.is_some(), "opacity");
        mark(self.visible.is_some(), "visible");
        mark(self.locked.is_some(), "locked");
        mark(self.glow.is_some(), "glow");
        if let Some(text) = &self.text {
            mark(text.text.is_some(), "text");
            mark(text.font_family.is_some(), "font_family");
            mark(text.font_size.is_some(), "font_size");
            mark(text.font_weight.is_some(), "font_weight");
            mark(text.font_style.is_some(), "font_style");
            mark(text.text_decoration.is_some(), "text_decoration");
            mark(text.fill.is_some(), "fill");
            mark(text.align.is_some(), "align");
            mark(text.letter_spacing.is_some(), "letter_spacing");
            mark(text.line_height.is_some(), "line_height");
            mark(text.stroke_color.is_some(), "stroke_color");
            mark(text.stroke_width.is_some(), "stroke_width");
            mark(text.backdrop.is_some(), "backdrop");
        }
        if let Some(image) = &self.image {
            mark(image.source.is_some(), "source");
            mark(image.flip_x.is_some(), "flip_x");
            mark(image.flip_y.is_some(), "flip_y");
            mark(image.crop.is_some(), "crop");
            mark(image.gradient_overlay.is_some(), "gradient_overlay");
            mark(image.filters.is_some(), "filters");
        }
        fields
    }

    /// Check the patch against `layer` without touching it
    pub fn validate(&self, layer: &Layer) -> Result<(), EditorError> {
        for (name, value) in [
            ("x", self.x),
            ("y", self.y),
            ("width", self.width),
            ("height", self.height),
            ("rotation", self.rotation),
        ] {
            finite(name, value)?;
        }
        unit_interval("opacity", self.opacity)?;
        if let Some(Some(glow)) = &self.glow {
            non_negative("glow size", Some(glow.size))?;
            unit_interval("glow intensity", Some(glow.intensity))?;
        }

        match (&layer.kind, &self.text, &self.image) {
            (LayerKind::Image(_), Some(_), _) => {
                return Err(EditorError::invalid(format!(
                    "text properties cannot be applied to image layer {}",
                    layer.id
                )));
            }
            (LayerKind::Text(_), _, Some(_)) => {
                return Err(EditorError::invalid(format!(
                    "image properties cannot be applied to text layer {}",
                    layer.id
                )));
            }
            _ => {}
        }

        if let Some(text) = &self.text {
            text.validate()?;
        }
        if let Some(image) = &self.image {
            image.validate()?;
        }
        Ok(())
    }
}

impl TextPatch {
    fn validate(&self) -> Result<(), EditorError> {
        if let Some(size) = self.font_size
            && !(size.is_finite() && size > 0.0)
        {
            return Err(EditorError::invalid(format!(
                "font size must be positive, got {size}"
            )));
        }
        finite("letter spacing", self.letter_spacing)?;
        non_negative("line height", self.line_height)?;
        non_negative("stroke width", self.stroke_width)?;
        if let Some(backdrop) = &self.backdrop {
            unit_interval("backdrop opacity", Some(backdrop.opacity))?;
            non_negative("backdrop padding", Some(backdrop.padding))?;
            non_negative("backdrop radius", Some(backdrop.radius))?;
        }
        Ok(())
    }
}

impl ImagePatch {
    fn validate(&self) -> Result<(), EditorError> {
        if let Some(Some(crop)) = &self.crop {
            crop.validate()?;
        }
        if let Some(Some(overlay)) = &self.gradient_overlay {
            finite("gradient direction", Some(overlay.direction))?;
            unit_interval("gradient opacity", Some(overlay.opacity))?;
        }
        if let Some(filters) = &self.filters {
            filters.validate()?;
        }
        Ok(())
    }
}

fn finite(name: &str, value: Option<f64>) -> Result<(), EditorError> {
    match value {
        Some(v) if !v.is_finite() => Err(EditorError::invalid(format!(
            "{name} must be a finite number, got {v}"
        ))),
        _ => Ok(()),
    }
}

fn non_negative(name: &str, value: Option<f64>) -> Result<(), EditorError> {
    match value {
        Some(v) if !(v.is_finite() && v >= 0.0) => Err(EditorError::invalid(format!(
            "{name} must be a non-negative number, got {v}"
        ))),
        _ => Ok(()),
    }
}

fn unit_interval(name: &str, value: Option<f64>) -> Result<(), EditorError> {
    match value {
        Some(v) if !(0.0..=1.0).contains(&v) => Err(EditorError::invalid(format!(
            "{name} must be within [0, 1], got {v}"
        ))),
        _ => Ok(()),
    }
}

impl Layer {
    /// Apply `patch` in place. The patch is validated first; on error the
    /// layer is left exactly as it was.
    pub fn apply_patch(&mut self, patch: &LayerPatch) -> Result<(), EditorError> {
        patch.validate(self)?;

        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        assign(&mut self.x, patch.x);
        assign(&mut self.y, patch.y);
        assign(&mut self.width, patch.width);
        assign(&mut self.height, patch.height);
        assign(&mut self.rotation, patch.rotation);
        assign(&mut self.opacity, patch.opacity);
        assign(&mut self.visible, patch.visible);
        assign(&mut self.locked, patch.locked);
        if let Some(glow) = &patch.glow {
            self.glow = glow.clone();
        }

        match &mut self.kind {
            LayerKind::Text(text) => {
                if let Some(p) = &patch.text {
                    assign_cloned(&mut text.text, &p.text);
                    assign_cloned(&mut text.font_family, &p.font_family);
                    assign(&mut text.font_size, p.font_size);
                    assign_cloned(&mut text.font_weight, &p.font_weight);
                    assign(&mut text.font_style, p.font_style);
                    assign(&mut text.text_decoration, p.text_decoration);
                    assign_cloned(&mut text.fill, &p.fill);
                    assign(&mut text.align, p.align);
                    assign(&mut text.letter_spacing, p.letter_spacing);
                    assign(&mut text.line_height, p.line_height);
                    assign_cloned(&mut text.stroke.color, &p.stroke_color);
                    assign(&mut text.stroke.width, p.stroke_width);
                    assign_cloned(&mut text.backdrop, &p.backdrop);
                }
            }
            LayerKind::Image(image) => {
                if let Some(p) = &patch.image {
                    assign_cloned(&mut image.source, &p.source);
                    assign(&mut image.flip_x, p.flip_x);
                    assign(&mut image.flip_y, p.flip_y);
                    assign(&mut image.crop, p.crop);
                    assign_cloned(&mut image.gradient_overlay, &p.gradient_overlay);
                    assign(&mut image.filters, p.filters);
                }
            }
        }
        Ok(())
    }
}

fn assign<T: Copy>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn assign_cloned<T: Clone>(slot: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        *slot = value.clone();
    }
}

/// Return a patched copy of `layer`, leaving the original untouched
pub fn patch_layer(layer: &Layer, patch: &LayerPatch) -> Result<Layer, EditorError> {
    let mut patched = layer.clone();
    patched.apply_patch(patch)?;
    Ok(patched)
}

/// Numeric properties that can be typed into a form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericField {
    X,
    Y,
    Width,
    Height,
    Rotation,
    Opacity,
    FontSize,
    LetterSpacing,
    LineHeight,
    StrokeWidth,
}

impl NumericField {
    pub const ALL: [NumericField; 10] = [
        NumericField::X,
        NumericField::Y,
        NumericField::Width,
        NumericField::Height,
        NumericField::Rotation,
        NumericField::Opacity,
        NumericField::FontSize,
        NumericField::LetterSpacing,
        NumericField::LineHeight,
        NumericField::StrokeWidth,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NumericField::X => "x",
            NumericField::Y => "y",
            NumericField::Width => "width",
            NumericField::Height => "height",
            NumericField::Rotation => "rotation",
            NumericField::Opacity => "opacity",
            NumericField::FontSize => "font_size",
            NumericField::LetterSpacing => "letter_spacing",
            NumericField::LineHeight => "line_height",
            NumericField::StrokeWidth => "stroke_width",
        }
    }
}

impl FromStr for NumericField {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|field| field.name() == wanted)
            .ok_or_else(|| EditorError::invalid(format!("unknown field '{s}'")))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlowPatch {
    pub enabled: Option<bool>,
    pub color: Option<String>,
    pub size: Option<f64>,
    pub intensity: Option<f64>,
}

impl GlowPatch {
    /// Merge onto the existing glow, starting from the default when absent
    pub fn merge_into(&self, existing: Option<&Glow>) -> Glow {
        let mut glow = existing.cloned().unwrap_or_default();
        assign(&mut glow.enabled, self.enabled);
        assign_cloned(&mut glow.color, &self.color);
        assign(&mut glow.size, self.size);
        assign(&mut glow.intensity, self.intensity);
        glow
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FiltersPatch {
    pub brightness: Option<f64>,
    pub contrast: Option<f64>,
    pub saturate: Option<f64>,
    pub grayscale: Option<f64>,
    pub sepia: Option<f64>,
    pub blur: Option<f64>,
}

impl FiltersPatch {
    pub fn merge_into(&self, existing: &Filters) -> Filters {
        let mut filters = *existing;
        assign(&mut filters.brightness, self.brightness);
        assign(&mut filters.contrast, self.contrast);
        assign(&mut filters.saturate, self.saturate);
        assign(&mut filters.grayscale, self.grayscale);
        assign(&mut filters.sepia, self.sepia);
        assign(&mut filters.blur, self.blur);
        filters
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CropPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    /// Uniform zoom, overrides `width`/`height`
    pub zoom: Option<f64>,
}

impl CropPatch {
    /// Merged window; validity is checked when the resulting patch is applied
    pub fn merge_into(&self, existing: &CropWindow) -> CropWindow {
        let mut crop = *existing;
        assign(&mut crop.x, self.x);
        assign(&mut crop.y, self.y);
        assign(&mut crop.width, self.width);
        assign(&mut crop.height, self.height);
        if let Some(zoom) = self.zoom {
            crop.width = zoom;
            crop.height = zoom;
        }
        crop
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GradientPatch {
    pub enabled: Option<bool>,
    pub colors: Option<[String; 2]>,
    pub direction: Option<f64>,
    pub opacity: Option<f64>,
}

impl GradientPatch {
    pub fn merge_into(&self, existing: Option<&GradientOverlay>) -> GradientOverlay {
        let mut overlay = existing.cloned().unwrap_or_default();
        assign(&mut overlay.enabled, self.enabled);
        assign_cloned(&mut overlay.colors, &self.colors);
        assign(&mut overlay.direction, self.direction);
        assign(&mut overlay.opacity, self.opacity);
        overlay
    }
}
