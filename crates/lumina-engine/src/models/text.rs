use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
}

/// Fill of the glyphs: a solid colour or a CSS gradient description.
///
/// Both serialize as a bare string; gradients are recognised by their
/// `linear-gradient` prefix so renderers can tell the two apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TextFill {
    Solid(String),
    Gradient(String),
}

const GRADIENT_PREFIX: &str = "linear-gradient";

impl TextFill {
    pub fn parse(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.starts_with(GRADIENT_PREFIX) {
            TextFill::Gradient(value)
        } else {
            TextFill::Solid(value)
        }
    }

    pub fn is_gradient(&self) -> bool {
        matches!(self, TextFill::Gradient(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            TextFill::Solid(value) | TextFill::Gradient(value) => value,
        }
    }

    /// Colour usable where only a solid colour makes sense (e.g. an accent
    /// border next to gradient text)
    pub fn solid_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self {
            TextFill::Solid(color) => color,
            TextFill::Gradient(_) => fallback,
        }
    }
}

impl From<String> for TextFill {
    fn from(value: String) -> Self {
        TextFill::parse(value)
    }
}

impl From<TextFill> for String {
    fn from(fill: TextFill) -> Self {
        match fill {
            TextFill::Solid(value) | TextFill::Gradient(value) => value,
        }
    }
}

/// Outline around glyphs; a width of zero means no stroke
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: String,
    pub width: f64,
}

impl Stroke {
    pub fn is_visible(&self) -> bool {
        self.width > 0.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackdropKind {
    #[default]
    None,
    Solid,
    Soft,
    Glass,
    Neon,
    Rough,
    Carbon,
    Scanline,
}

/// Decorative panel drawn behind text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Backdrop {
    pub kind: BackdropKind,
    pub color: Option<String>,
    pub opacity: f64,
    pub padding: f64,
    pub radius: f64,
}

impl Default for Backdrop {
    fn default() -> Self {
        Self {
            kind: BackdropKind::None,
            color: None,
            opacity: 1.0,
            padding: 0.0,
            radius: 0.0,
        }
    }
}

impl Backdrop {
    pub fn is_visible(&self) -> bool {
        self.kind != BackdropKind::None
    }
}

/// Text-specific layer content.
///
/// The layer height is advisory for text: the rendered height follows the
/// content and is decided by the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLayer {
    pub text: String,
    pub font_family: String,
    /// px
    pub font_size: f64,
    pub font_weight: String,
    pub font_style: FontStyle,
    pub text_decoration: TextDecoration,
    pub fill: TextFill,
    pub align: TextAlign,
    pub letter_spacing: f64,
    pub line_height: f64,
    pub stroke: Stroke,
    pub backdrop: Backdrop,
}
