//! Constructors that produce fully populated layers.
//!
//! A layer never reaches the store half-initialized: every field gets a
//! default here.

use crate::geometry::{Point, Size};
use crate::models::{
    Backdrop, Filters, FontStyle, GradientOverlay, Glow, ImageLayer, Layer, LayerId, LayerKind,
    Stroke, TextAlign, TextDecoration, TextFill, TextLayer,
};

/// Box used for new text layers; the height is advisory
pub const DEFAULT_TEXT_SIZE: Size = Size {
    width: 400.0,
    height: 100.0,
};

/// Fallback when the natural size of an image is unknown
pub const DEFAULT_IMAGE_SIZE: Size = Size {
    width: 600.0,
    height: 400.0,
};

/// Largest share of the shorter canvas side a new image may occupy
pub const MAX_IMAGE_FRACTION: f64 = 0.8;

pub const DEFAULT_FONT_FAMILY: &str = "\"Anton\", sans-serif";
pub const DEFAULT_GLOW_COLOR: &str = "#0ea5e9";

/// Create a text layer centred on `canvas_center`
pub fn create_text_layer(text: impl Into<String>, canvas_center: Point) -> Layer {
    let size = DEFAULT_TEXT_SIZE;
    Layer {
        id: LayerId::new(),
        name: "Text".to_string(),
        x: canvas_center.x - size.width / 2.0,
        y: canvas_center.y - size.height / 2.0,
        width: size.width,
        height: size.height,
        rotation: 0.0,
        opacity: 1.0,
        visible: true,
        locked: false,
        glow: Some(Glow {
            enabled: false,
            color: DEFAULT_GLOW_COLOR.to_string(),
            size: 10.0,
            intensity: 0.8,
        }),
        kind: LayerKind::Text(TextLayer {
            text: text.into(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: 80.0,
            font_weight: "bold".to_string(),
            font_style: FontStyle::Normal,
            text_decoration: TextDecoration::None,
            fill: TextFill::Solid("#ffffff".to_string()),
            align: TextAlign::Center,
            letter_spacing: 0.0,
            line_height: 1.2,
            stroke: Stroke {
                color: "#000000".to_string(),
                width: 0.0,
            },
            backdrop: Backdrop::default(),
        }),
    }
}

/// Create an image layer centred on a canvas of size `canvas`.
///
/// Images whose larger side exceeds 80% of the shorter canvas side are scaled
/// down uniformly so that side fits. Without a usable natural size the layer
/// falls back to [`DEFAULT_IMAGE_SIZE`].
pub fn create_image_layer(source: impl Into<String>, natural: Option<Size>, canvas: Size) -> Layer {
    let size = fit_image(natural.filter(is_usable).unwrap_or(DEFAULT_IMAGE_SIZE), canvas);
    Layer {
        id: LayerId::new(),
        name: "Image".to_string(),
        x: (canvas.width - size.width) / 2.0,
        y: (canvas.height - size.height) / 2.0,
        width: size.width,
        height: size.height,
        rotation: 0.0,
        opacity: 1.0,
        visible: true,
        locked: false,
        glow: Some(Glow {
            enabled: false,
            color: DEFAULT_GLOW_COLOR.to_string(),
            size: 20.0,
            intensity: 1.0,
        }),
        kind: LayerKind::Image(ImageLayer {
            source: source.into(),
            flip_x: false,
            flip_y: false,
            crop: None,
            gradient_overlay: Some(GradientOverlay::default()),
            filters: Filters::IDENTITY,
        }),
    }
}

fn is_usable(size: &Size) -> bool {
    size.width.is_finite() && size.height.is_finite() && size.width > 0.0 && size.height > 0.0
}

/// Smart scaling for freshly added images
pub fn fit_image(natural: Size, canvas: Size) -> Size {
    let max_allowed = canvas.width.min(canvas.height) * MAX_IMAGE_FRACTION;
    let largest = natural.width.max(natural.height);
    if largest <= max_allowed {
        return natural;
    }
    let ratio = max_allowed / largest;
    Size::new(natural.width * ratio, natural.height * ratio)
}
