pub mod editing;
pub mod error;
pub mod geometry;
pub mod models;
pub mod render;

// Re-export key types for easier usage
pub use editing::{
    Change, Editor, EditorSettings, GestureState, History, InteractionController, LayerStore,
    Modifiers, Snapshot, Viewport, ZOrder,
};
pub use error::EditorError;
pub use geometry::{Corner, Point, Rect, Size};
pub use models::{Layer, LayerId, LayerKind, LayerPatch, NumericField};
pub use render::{Renderer, Scene};
