//! Built-in style presets offered by property editors.

use crate::geometry::Size;
use crate::models::{Backdrop, BackdropKind};

pub const DEFAULT_CANVAS_SIZE: Size = Size {
    width: 1920.0,
    height: 1080.0,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontPreset {
    pub name: &'static str,
    /// CSS font-family value stored on the layer
    pub value: &'static str,
}

pub const FONTS: &[FontPreset] = &[
    FontPreset {
        name: "Anton",
        value: "\"Anton\", sans-serif",
    },
    FontPreset {
        name: "Bebas Neue",
        value: "\"Bebas Neue\", sans-serif",
    },
    FontPreset {
        name: "Bangers",
        value: "\"Bangers\", system-ui",
    },
    FontPreset {
        name: "Permanent Marker",
        value: "\"Permanent Marker\", cursive",
    },
    FontPreset {
        name: "Righteous",
        value: "\"Righteous\", cursive",
    },
    FontPreset {
        name: "Lobster",
        value: "\"Lobster\", cursive",
    },
    FontPreset {
        name: "Inter",
        value: "Inter, sans-serif",
    },
    FontPreset {
        name: "Montserrat",
        value: "Montserrat, sans-serif",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradientPreset {
    pub name: &'static str,
    pub value: &'static str,
}

/// Gradient fills for text
pub const TEXT_GRADIENTS: &[GradientPreset] = &[
    GradientPreset {
        name: "Sunset",
        value: "linear-gradient(135deg, #ff9a9e 0%, #fecfef 99%, #fecfef 100%)",
    },
    GradientPreset {
        name: "Ocean",
        value: "linear-gradient(120deg, #84fab0 0%, #8fd3f4 100%)",
    },
    GradientPreset {
        name: "Gold",
        value: "linear-gradient(to right, #bf953f, #fcf6ba, #bf953f)",
    },
    GradientPreset {
        name: "Neon",
        value: "linear-gradient(to right, #ff00cc, #333399)",
    },
    GradientPreset {
        name: "Fire",
        value: "linear-gradient(to right, #f12711, #f5af19)",
    },
    GradientPreset {
        name: "Silver",
        value: "linear-gradient(to top, #d5d4d0 0%, #d5d4d0 1%, #eeeeec 31%, #efeeec 75%, #e7e9bb 100%)",
    },
    GradientPreset {
        name: "Lime",
        value: "linear-gradient(to right, #11998e, #38ef7d)",
    },
    GradientPreset {
        name: "Holo",
        value: "linear-gradient(to right, #667eea, #764ba2)",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DualColorPreset {
    pub name: &'static str,
    pub colors: [&'static str; 2],
}

impl DualColorPreset {
    pub fn colors(&self) -> [String; 2] {
        self.colors.map(str::to_string)
    }
}

/// Colour pairs for the image gradient overlay
pub const IMAGE_GRADIENTS: &[DualColorPreset] = &[
    DualColorPreset {
        name: "Vignette",
        colors: ["transparent", "rgba(0,0,0,0.8)"],
    },
    DualColorPreset {
        name: "Warmth",
        colors: ["rgba(255,165,0,0.2)", "rgba(255,69,0,0.5)"],
    },
    DualColorPreset {
        name: "Cool",
        colors: ["rgba(0,255,255,0.2)", "rgba(0,0,255,0.5)"],
    },
    DualColorPreset {
        name: "Vibe",
        colors: ["rgba(255,0,255,0.2)", "rgba(128,0,128,0.5)"],
    },
    DualColorPreset {
        name: "Success",
        colors: ["rgba(144,238,144,0.2)", "rgba(0,128,0,0.5)"],
    },
    DualColorPreset {
        name: "Alert",
        colors: ["rgba(255,255,0,0.2)", "rgba(255,140,0,0.5)"],
    },
    DualColorPreset {
        name: "Midnight",
        colors: ["rgba(25,25,112,0.3)", "rgba(0,0,0,0.8)"],
    },
    DualColorPreset {
        name: "Fade",
        colors: ["rgba(255,255,255,0)", "rgba(255,255,255,0.8)"],
    },
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackdropPreset {
    pub name: &'static str,
    pub kind: BackdropKind,
    pub color: &'static str,
    pub opacity: f64,
    pub padding: f64,
    pub radius: f64,
}

impl BackdropPreset {
    pub fn apply(&self) -> Backdrop {
        Backdrop {
            kind: self.kind,
            color: Some(self.color.to_string()),
            opacity: self.opacity,
            padding: self.padding,
            radius: self.radius,
        }
    }
}

pub const BACKDROP_PRESETS: &[BackdropPreset] = &[
    BackdropPreset {
        name: "Solid Black",
        kind: BackdropKind::Solid,
        color: "#000000",
        opacity: 1.0,
        padding: 10.0,
        radius: 4.0,
    },
    BackdropPreset {
        name: "Carbon",
        kind: BackdropKind::Carbon,
        color: "#131313",
        opacity: 1.0,
        padding: 15.0,
        radius: 4.0,
    },
    BackdropPreset {
        name: "Cyber",
        kind: BackdropKind::Scanline,
        color: "#000000",
        opacity: 0.9,
        padding: 10.0,
        radius: 0.0,
    },
    BackdropPreset {
        name: "Soft Brush",
        kind: BackdropKind::Soft,
        color: "#000000",
        opacity: 0.8,
        padding: 15.0,
        radius: 20.0,
    },
    BackdropPreset {
        name: "Glass",
        kind: BackdropKind::Glass,
        color: "#ffffff",
        opacity: 0.15,
        padding: 15.0,
        radius: 10.0,
    },
    BackdropPreset {
        name: "Neon Box",
        kind: BackdropKind::Neon,
        color: "#0ea5e9",
        opacity: 0.1,
        padding: 12.0,
        radius: 0.0,
    },
    BackdropPreset {
        name: "Rough Paper",
        kind: BackdropKind::Rough,
        color: "#f5f5f5",
        opacity: 1.0,
        padding: 12.0,
        radius: 2.0,
    },
    BackdropPreset {
        name: "Highlight",
        kind: BackdropKind::Solid,
        color: "#facc15",
        opacity: 0.9,
        padding: 5.0,
        radius: 0.0,
    },
];

// Lookups by display name, case-insensitive

pub fn font_preset(name: &str) -> Option<&'static FontPreset> {
    FONTS
        .iter()
        .find(|preset| preset.name.eq_ignore_ascii_case(name))
}

pub fn text_gradient_preset(name: &str) -> Option<&'static GradientPreset> {
    TEXT_GRADIENTS
        .iter()
        .find(|preset| preset.name.eq_ignore_ascii_case(name))
}

pub fn image_gradient_preset(name: &str) -> Option<&'static DualColorPreset> {
    IMAGE_GRADIENTS
        .iter()
        .find(|preset| preset.name.eq_ignore_ascii_case(name))
}

pub fn backdrop_preset(name: &str) -> Option<&'static BackdropPreset> {
    BACKDROP_PRESETS
        .iter()
        .find(|preset| preset.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TextFill;

    #[test]
    fn test_text_gradients_are_recognised_as_gradients() {
        for preset in TEXT_GRADIENTS {
            assert!(
                TextFill::parse(preset.value).is_gradient(),
                "{} should parse as a gradient",
                preset.name
            );
        }
    }

    #[test]
    fn test_backdrop_presets_are_valid() {
        for preset in BACKDROP_PRESETS {
            let backdrop = preset.apply();
            assert!(backdrop.is_visible(), "{} should be visible", preset.name);
            assert!((0.0..=1.0).contains(&backdrop.opacity));
        }
    }

    #[test]
    fn test_backdrop_preset_lookup() {
        let glass = backdrop_preset("glass").unwrap();
        assert_eq!(glass.kind, BackdropKind::Glass);
        assert!(backdrop_preset("nope").is_none());
    }

    #[test]
    fn test_preset_lookups_ignore_case() {
        assert_eq!(font_preset("bebas neue").unwrap().value, "\"Bebas Neue\", sans-serif");
        assert_eq!(text_gradient_preset("GOLD").unwrap().name, "Gold");
        assert_eq!(image_gradient_preset("vignette").unwrap().name, "Vignette");
        assert!(font_preset("Comic Sans").is_none());
    }

    #[test]
    fn test_image_gradient_colors() {
        assert_eq!(
            IMAGE_GRADIENTS[0].colors(),
            ["transparent".to_string(), "rgba(0,0,0,0.8)".to_string()]
        );
    }
}
