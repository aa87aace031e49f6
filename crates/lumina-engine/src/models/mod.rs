pub mod factory;
pub mod image;
pub mod layer;
pub mod patch;
pub mod presets;
pub mod text;

pub use factory::{create_image_layer, create_text_layer};
pub use image::{CropWindow, Filters, GradientOverlay, ImageLayer};
pub use layer::{Glow, Layer, LayerId, LayerKind};
pub use patch::{
    CropPatch, FiltersPatch, GlowPatch, GradientPatch, ImagePatch, LayerPatch, NumericField,
    TextPatch, patch_layer,
};
pub use text::{
    Backdrop, BackdropKind, FontStyle, Stroke, TextAlign, TextDecoration, TextFill, TextLayer,
};
