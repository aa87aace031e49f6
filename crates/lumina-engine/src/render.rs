//! Boundary between the editing core and whatever draws the canvas.
//!
//! A renderer receives a [`Scene`] and must be a pure function of it: two
//! scenes with equal content render identically.

use crate::geometry::Size;
use crate::models::{Layer, LayerId};

/// Everything needed to draw one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scene<'a> {
    /// Back to front
    pub layers: &'a [Layer],
    pub canvas: Size,
    pub zoom: f64,
    pub show_grid: bool,
    pub grid_size: f64,
    pub selection: Option<LayerId>,
}

impl<'a> Scene<'a> {
    pub fn selected(&self) -> Option<&'a Layer> {
        let id = self.selection?;
        self.layers.iter().find(|layer| layer.id == id)
    }

    /// Layers that produce pixels, back to front
    pub fn visible_layers(&self) -> impl Iterator<Item = &'a Layer> + 'a {
        self.layers
            .iter()
            .filter(|layer| layer.visible && layer.opacity > 0.0)
    }

    /// Canvas size on screen at the current zoom
    pub fn scaled_canvas(&self) -> Size {
        Size::new(self.canvas.width * self.zoom, self.canvas.height * self.zoom)
    }
}

pub trait Renderer {
    type Output;

    fn render(&self, scene: &Scene<'_>) -> Self::Output;
}
