//! Terminal rendition of the canvas: every visible layer becomes a box of
//! cells covering its rotated bounds.

use lumina_engine::{LayerId, LayerKind, Point, Renderer, Scene};
use ratatui::layout::Rect;

/// Screen pixels covered by one terminal cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellSize {
    pub width: f64,
    pub height: f64,
}

/// Typical terminal font cell, taller than wide
pub const CELL_SIZE: CellSize = CellSize {
    width: 16.0,
    height: 32.0,
};

/// Cell coordinates are clamped to this magnitude so far-off layers stay
/// representable; anything beyond it is off screen anyway
const CELL_LIMIT: f64 = u16::MAX as f64 * 4.0;

fn to_cell(value: f64) -> i32 {
    value.clamp(-CELL_LIMIT, CELL_LIMIT) as i32
}

/// One layer laid out in cells, relative to the canvas top-left cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellBox {
    pub id: LayerId,
    pub label: String,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub selected: bool,
    pub locked: bool,
}

impl CellBox {
    /// Terminal area of this box inside `area`, clipped; `None` when the box
    /// lies entirely outside
    pub fn place(&self, area: Rect) -> Option<Rect> {
        let (area_x, area_y) = (i64::from(area.x), i64::from(area.y));
        let left = (area_x + i64::from(self.x)).max(area_x);
        let top = (area_y + i64::from(self.y)).max(area_y);
        let right = (area_x + i64::from(self.x) + i64::from(self.width)).min(i64::from(area.right()));
        let bottom =
            (area_y + i64::from(self.y) + i64::from(self.height)).min(i64::from(area.bottom()));
        if right <= left || bottom <= top {
            return None;
        }
        Some(Rect::new(
            u16::try_from(left).ok()?,
            u16::try_from(top).ok()?,
            u16::try_from(right - left).ok()?,
            u16::try_from(bottom - top).ok()?,
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellFrame {
    /// Canvas extent in cells
    pub width: u16,
    pub height: u16,
    /// Grid spacing in cells when the grid is shown
    pub grid_step: Option<(u16, u16)>,
    /// Back to front
    pub boxes: Vec<CellBox>,
}

impl CellFrame {
    /// Background rows: grid dots where the grid is on, blanks elsewhere
    pub fn background(&self) -> Vec<String> {
        let width = usize::from(self.width);
        let Some((step_x, step_y)) = self.grid_step else {
            return vec![" ".repeat(width); usize::from(self.height)];
        };
        (0..self.height)
            .map(|row| {
                if row % step_y != 0 {
                    return " ".repeat(width);
                }
                (0..self.width)
                    .map(|col| if col % step_x == 0 { '·' } else { ' ' })
                    .collect()
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellRenderer {
    pub cell: CellSize,
}

impl Default for CellRenderer {
    fn default() -> Self {
        Self { cell: CELL_SIZE }
    }
}

impl CellRenderer {
    /// Centre of a terminal cell in screen pixels, relative to the top-left of
    /// `area`
    pub fn cell_to_screen(&self, column: u16, row: u16, area: Rect) -> Point {
        Point::new(
            (f64::from(column) - f64::from(area.x) + 0.5) * self.cell.width,
            (f64::from(row) - f64::from(area.y) + 0.5) * self.cell.height,
        )
    }
}

impl Renderer for CellRenderer {
    type Output = CellFrame;

    fn render(&self, scene: &Scene<'_>) -> CellFrame {
        let zoom = scene.zoom;
        let canvas = scene.scaled_canvas();
        let to_u16 = |value: f64| value.ceil().clamp(0.0, f64::from(u16::MAX)) as u16;

        let boxes = scene
            .visible_layers()
            .map(|layer| {
                let bounds = layer.bounds().rotated_bounds(layer.rotation);
                let left = to_cell((bounds.x * zoom / self.cell.width).floor());
                let top = to_cell((bounds.y * zoom / self.cell.height).floor());
                let right = to_cell(((bounds.x + bounds.width) * zoom / self.cell.width).ceil());
                let bottom = to_cell(((bounds.y + bounds.height) * zoom / self.cell.height).ceil());

                let glyph = match layer.kind {
                    LayerKind::Text(_) => "T",
                    LayerKind::Image(_) => "▣",
                };
                let mut label = format!("{glyph} {}", layer.display_name());
                if layer.locked {
                    label.push_str(" [locked]");
                }

                CellBox {
                    id: layer.id,
                    label,
                    x: left,
                    y: top,
                    width: right.abs_diff(left).max(1),
                    height: bottom.abs_diff(top).max(1),
                    selected: scene.selection == Some(layer.id),
                    locked: layer.locked,
                }
            })
            .collect();

        let grid_step = scene.show_grid.then(|| {
            let step = |cell: f64| ((scene.grid_size * zoom / cell).round() as u16).max(1);
            (step(self.cell.width), step(self.cell.height))
        });

        CellFrame {
            width: to_u16(canvas.width / self.cell.width),
            height: to_u16(canvas.height / self.cell.height),
            grid_step,
            boxes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumina_engine::{Editor, LayerPatch};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_text_layer_box_at_default_zoom() {
        let mut editor = Editor::default();
        editor.add_text("Hello");

        let frame = CellRenderer::default().render(&editor.scene());

        // 1920x1080 at 0.6 is 1152x648 px
        assert_eq!((frame.width, frame.height), (72, 21));
        let text = &frame.boxes[0];
        assert_eq!((text.x, text.y, text.width, text.height), (28, 9, 16, 3));
        assert_eq!(text.label, "T Text");
        assert!(text.selected);
    }

    #[test]
    fn test_hidden_layers_are_skipped_and_locked_marked() {
        let mut editor = Editor::default();
        let hidden = editor.add_text("hidden").changed[0];
        let locked = editor.add_image("photo.png", None).changed[0];
        editor
            .edit_layer(
                hidden,
                LayerPatch {
                    visible: Some(false),
                    ..LayerPatch::default()
                },
            )
            .unwrap();
        editor
            .edit_layer(
                locked,
                LayerPatch {
                    locked: Some(true),
                    ..LayerPatch::default()
                },
            )
            .unwrap();

        let frame = CellRenderer::default().render(&editor.scene());

        assert_eq!(frame.boxes.len(), 1);
        assert_eq!(frame.boxes[0].label, "▣ Image [locked]");
        assert!(frame.boxes[0].locked);
    }

    #[test]
    fn test_rotation_widens_the_box() {
        let mut editor = Editor::default();
        let id = editor.add_text("Spin").changed[0];
        let flat = CellRenderer::default().render(&editor.scene()).boxes[0].clone();

        editor.edit_layer(id, LayerPatch::rotation(45.0)).unwrap();
        let turned = CellRenderer::default().render(&editor.scene()).boxes[0].clone();

        assert!(turned.height > flat.height);
    }

    #[test]
    fn test_grid_background() {
        let mut editor = Editor::default();
        editor.toggle_grid();

        let frame = CellRenderer::default().render(&editor.scene());

        // 40 canvas units at 0.6 are 24 px: 1.5 cells wide, 0.75 high
        assert_eq!(frame.grid_step, Some((2, 1)));
        let background = frame.background();
        assert_eq!(background.len(), 21);
        assert!(background[0].starts_with("· · "));
    }

    #[test]
    fn test_place_clips_to_area() {
        let area = Rect::new(10, 5, 20, 10);
        let cell_box = CellBox {
            id: LayerId::new(),
            label: String::new(),
            x: -3,
            y: 8,
            width: 6,
            height: 6,
            selected: false,
            locked: false,
        };

        assert_eq!(cell_box.place(area), Some(Rect::new(10, 13, 3, 2)));
        assert_eq!(CellBox { x: 40, ..cell_box }.place(area), None);
    }

    #[test]
    fn test_far_away_layer_is_clipped_not_overflowed() {
        let mut editor = Editor::default();
        let id = editor.add_text("Far").changed[0];
        editor
            .edit_numeric(id, lumina_engine::NumericField::X, "1e12")
            .unwrap();

        let frame = CellRenderer::default().render(&editor.scene());

        assert_eq!(frame.boxes[0].x, CELL_LIMIT as i32);
        assert_eq!(frame.boxes[0].place(Rect::new(0, 0, 80, 25)), None);
    }

    #[test]
    fn test_huge_layer_covers_the_whole_area() {
        let mut editor = Editor::default();
        let id = editor.add_text("Wide").changed[0];
        editor
            .edit_layer(id, LayerPatch::bounds(-1e12, 0.0, 2e12, 100.0))
            .unwrap();

        let frame = CellRenderer::default().render(&editor.scene());
        let area = Rect::new(0, 0, 80, 25);

        assert_eq!(frame.boxes[0].width, 2 * CELL_LIMIT as u32);
        assert_eq!(frame.boxes[0].place(area), Some(Rect::new(0, 9, 80, 3)));
    }

    #[test]
    fn test_cell_to_screen_uses_cell_centres() {
        let renderer = CellRenderer::default();
        let area = Rect::new(2, 1, 50, 20);

        assert_eq!(renderer.cell_to_screen(2, 1, area), Point::new(8.0, 16.0));
        assert_eq!(renderer.cell_to_screen(5, 3, area), Point::new(56.0, 80.0));
    }
}
