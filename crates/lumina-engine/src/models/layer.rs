use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::geometry::{Point, Rect};
use crate::models::{ImageLayer, TextLayer};

/// Stable identifier of a layer, assigned at creation and never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerId(Uuid);

impl LayerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for LayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Outer glow applied around a layer's content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Glow {
    pub enabled: bool,
    pub color: String,
    /// Blur radius in px, never negative
    pub size: f64,
    /// Alpha of the glow colour in `[0, 1]`
    pub intensity: f64,
}

impl Default for Glow {
    fn default() -> Self {
        Self {
            enabled: false,
            color: "#0ea5e9".to_string(),
            size: 10.0,
            intensity: 0.8,
        }
    }
}

/// Variant-specific content of a layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LayerKind {
    Text(TextLayer),
    Image(ImageLayer),
}

impl LayerKind {
    pub fn label(&self) -> &'static str {
        match self {
            LayerKind::Text(_) => "text",
            LayerKind::Image(_) => "image",
        }
    }
}

/// One editable element on the canvas.
///
/// Attributes shared by every layer live directly on the struct; the variant
/// specific ones live in [`LayerKind`]. Z-order is not stored here, it is the
/// layer's position in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Degrees, clockwise, around the layer's centre
    pub rotation: f64,
    pub opacity: f64,
    pub visible: bool,
    /// Locked layers ignore pointer transforms but stay programmatically editable
    pub locked: bool,
    pub glow: Option<Glow>,
    pub kind: LayerKind,
}

impl Layer {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Whether a canvas-space point lands on this layer, honouring rotation
    pub fn contains(&self, point: Point) -> bool {
        self.bounds().contains_rotated(point, self.rotation)
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, LayerKind::Text(_))
    }

    pub fn is_image(&self) -> bool {
        matches!(self.kind, LayerKind::Image(_))
    }

    pub fn as_text(&self) -> Option<&TextLayer> {
        match &self.kind {
            LayerKind::Text(text) => Some(text),
            LayerKind::Image(_) => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageLayer> {
        match &self.kind {
            LayerKind::Image(image) => Some(image),
            LayerKind::Text(_) => None,
        }
    }

    /// Label shown in layer lists: the explicit name, or a content fallback
    pub fn display_name(&self) -> &str {
        if !self.name.is_empty() {
            return &self.name;
        }
        match &self.kind {
            LayerKind::Text(text) => &text.text,
            LayerKind::Image(_) => "Image",
        }
    }

    /// Copy of this layer under a fresh id
    pub(crate) fn clone_with_new_id(&self) -> Layer {
        Layer {
            id: LayerId::new(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;
    use crate::models::factory::{create_image_layer, create_text_layer};

    #[test]
    fn test_layer_ids_are_unique() {
        let a = LayerId::new();
        let b = LayerId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_layer_id_display_is_uuid() {
        let id = LayerId::new();
        assert_eq!(id.to_string(), id.as_uuid().to_string());
    }

    #[test]
    fn test_display_name_falls_back_to_content() {
        let mut text = create_text_layer("Hello", Point::new(960.0, 540.0));
        assert_eq!(text.display_name(), "Text");
        text.name.clear();
        assert_eq!(text.display_name(), "Hello");

        let mut image = create_image_layer("cat.png", None, Size::new(1920.0, 1080.0));
        image.name.clear();
        assert_eq!(image.display_name(), "Image");
    }

    #[test]
    fn test_contains_honours_rotation() {
        let mut layer = create_text_layer("Bar", Point::new(960.0, 540.0));
        // 400x100 box at (760, 490)
        let near_right_end = Point::new(1150.0, 540.0);
        assert!(layer.contains(near_right_end));

        layer.rotation = 90.0;
        assert!(!layer.contains(near_right_end));
        assert!(layer.contains(Point::new(960.0, 720.0)));
    }

    #[test]
    fn test_clone_with_new_id_keeps_everything_else() {
        let layer = create_text_layer("Copy me", Point::new(100.0, 100.0));
        let copy = layer.clone_with_new_id();

        assert_ne!(copy.id, layer.id);
        assert_eq!(Layer { id: layer.id, ..copy }, layer);
    }

    #[test]
    fn test_variant_accessors() {
        let text = create_text_layer("t", Point::ORIGIN);
        assert!(text.is_text());
        assert!(text.as_text().is_some());
        assert!(text.as_image().is_none());
        assert_eq!(text.kind.label(), "text");
    }
}
