//! Pointer gesture state machine.
//!
//! The controller owns no editing state; every call borrows the [`Editor`] it
//! acts on. A gesture captures the pointer from `pointer_down` until
//! `pointer_up` or `cancel`, and only pointer moves received while capturing
//! have any effect. Moves produce transient updates, the end of the gesture
//! produces at most one history entry.

use crate::editing::{Change, Editor};
use crate::error::EditorError;
use crate::geometry::{Corner, Point, Rect, angle_between, normalize_degrees, rotate_point, snap};
use crate::models::{Layer, LayerId, LayerPatch};

/// Distance of the rotation handle above the top edge, in canvas units
pub const ROTATE_HANDLE_OFFSET: f64 = 30.0;
/// Default pick radius around handles, in screen pixels
pub const HANDLE_TOLERANCE_PX: f64 = 6.0;
/// Rotation step while Shift is held, in degrees
pub const ROTATION_SNAP: f64 = 15.0;
/// Layers never shrink below this size while resizing
pub const MIN_LAYER_SIZE: f64 = 1.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
}

/// Grab points drawn around the selected layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    Corner(Corner),
    Rotate,
}

/// Handle positions in canvas space, following the layer's rotation
pub fn handle_positions(layer: &Layer) -> Vec<(Handle, Point)> {
    let bounds = layer.bounds();
    let mut handles: Vec<(Handle, Point)> = Corner::ALL
        .into_iter()
        .map(|corner| (Handle::Corner(corner), bounds.corner(corner, layer.rotation)))
        .collect();
    handles.push((Handle::Rotate, rotate_handle(&bounds, layer.rotation)));
    handles
}

fn rotate_handle(bounds: &Rect, rotation: f64) -> Point {
    let top_center = Point::new(bounds.center().x, bounds.y - ROTATE_HANDLE_OFFSET);
    rotate_point(top_center, bounds.center(), rotation)
}

#[derive(Debug, Clone, PartialEq)]
pub enum GestureState {
    Idle,
    Dragging {
        layer: LayerId,
        anchor_pointer: Point,
        /// Layer as it was when the gesture started
        anchor: Layer,
    },
    Resizing {
        layer: LayerId,
        corner: Corner,
        anchor: Layer,
    },
    Rotating {
        layer: LayerId,
        start_angle: f64,
        anchor: Layer,
    },
}

impl GestureState {
    fn anchor(&self) -> Option<&Layer> {
        match self {
            GestureState::Idle => None,
            GestureState::Dragging { anchor, .. }
            | GestureState::Resizing { anchor, .. }
            | GestureState::Rotating { anchor, .. } => Some(anchor),
        }
    }

    pub fn layer(&self) -> Option<LayerId> {
        self.anchor().map(|anchor| anchor.id)
    }

    pub fn name(&self) -> &'static str {
        match self {
            GestureState::Idle => "idle",
            GestureState::Dragging { .. } => "dragging",
            GestureState::Resizing { .. } => "resizing",
            GestureState::Rotating { .. } => "rotating",
        }
    }
}

#[derive(Debug, Clone)]
pub struct InteractionController {
    state: GestureState,
    handle_tolerance: f64,
    /// Editor version after the gesture's own last update; any other change
    /// (undo, redo, delete, a keyboard edit) invalidates the anchor
    observed_version: u64,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionController {
    pub fn new() -> Self {
        Self::with_handle_tolerance(HANDLE_TOLERANCE_PX)
    }

    /// Frontends with coarse pointers (e.g. terminal cells) need a larger pick
    /// radius
    pub fn with_handle_tolerance(pixels: f64) -> Self {
        Self {
            state: GestureState::Idle,
            handle_tolerance: pixels.max(0.0),
            observed_version: 0,
        }
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    /// Whether a gesture currently owns the pointer
    pub fn is_capturing(&self) -> bool {
        self.state != GestureState::Idle
    }

    /// Start a gesture. Handles of the selected layer win over layers below
    /// them; clicking empty canvas clears the selection. A locked layer is
    /// selected so its properties can be edited, but no gesture starts on it.
    pub fn pointer_down(
        &mut self,
        editor: &mut Editor,
        screen: Point,
        _modifiers: Modifiers,
    ) -> Result<Change, EditorError> {
        let unchanged = Change::none(editor.version());
        if self.is_capturing() {
            log::debug!("Pointer down ignored, {} in progress", self.state.name());
            return Ok(unchanged);
        }
        let pointer = editor.viewport().to_canvas(screen)?;

        if let Some(state) = self.grab_handle(editor, pointer) {
            log::debug!("Start {} on {:?}", state.name(), state.layer());
            self.state = state;
            self.observed_version = editor.version();
            return Ok(unchanged);
        }

        let Some(hit) = editor.store().hit_test(pointer).cloned() else {
            editor.clear_selection();
            return Ok(unchanged);
        };
        editor.select(hit.id);
        if hit.locked {
            log::debug!("Layer {} is locked, not dragging", hit.id);
            return Ok(unchanged);
        }

        self.state = GestureState::Dragging {
            layer: hit.id,
            anchor_pointer: pointer,
            anchor: hit,
        };
        self.observed_version = editor.version();
        Ok(unchanged)
    }

    /// Drop the gesture if the editor changed underneath it
    fn abandon_if_interrupted(&mut self, editor: &Editor) -> bool {
        if !self.is_capturing() || editor.version() == self.observed_version {
            return false;
        }
        log::debug!(
            "Abandoning {}, editor moved from version {} to {}",
            self.state.name(),
            self.observed_version,
            editor.version()
        );
        self.state = GestureState::Idle;
        true
    }

    fn grab_handle(&self, editor: &Editor, pointer: Point) -> Option<GestureState> {
        let layer = editor.selected_layer()?;
        if layer.locked || !layer.visible {
            return None;
        }
        let radius = self.handle_tolerance / editor.viewport().zoom();
        let (handle, _) = handle_positions(layer)
            .into_iter()
            .filter(|(_, position)| position.distance_to(pointer) <= radius)
            .min_by(|(_, a), (_, b)| a.distance_to(pointer).total_cmp(&b.distance_to(pointer)))?;

        let anchor = layer.clone();
        let state = match handle {
            Handle::Corner(corner) => GestureState::Resizing {
                layer: anchor.id,
                corner,
                anchor,
            },
            Handle::Rotate => GestureState::Rotating {
                layer: anchor.id,
                start_angle: angle_between(layer.bounds().center(), pointer),
                anchor,
            },
        };
        Some(state)
    }

    /// Continue the gesture with a transient update
    pub fn pointer_move(
        &mut self,
        editor: &mut Editor,
        screen: Point,
        modifiers: Modifiers,
    ) -> Result<Change, EditorError> {
        if self.abandon_if_interrupted(editor) {
            return Ok(Change::none(editor.version()));
        }
        let Some(id) = self.state.layer() else {
            return Ok(Change::none(editor.version()));
        };
        if editor.layer(id).is_none() {
            log::debug!("Layer {id} vanished during {}", self.state.name());
            self.state = GestureState::Idle;
            return Ok(Change::none(editor.version()));
        }

        let pointer = editor.viewport().to_canvas(screen)?;
        let patch = match &self.state {
            GestureState::Idle => return Ok(Change::none(editor.version())),
            GestureState::Dragging {
                anchor_pointer,
                anchor,
                ..
            } => drag_patch(editor, anchor, *anchor_pointer, pointer),
            GestureState::Resizing { corner, anchor, .. } => resize_patch(anchor, *corner, pointer),
            GestureState::Rotating {
                start_angle,
                anchor,
                ..
            } => rotate_patch(anchor, *start_angle, pointer, modifiers),
        };
        let change = editor.update_transient(id, &patch)?;
        self.observed_version = change.version;
        Ok(change)
    }

    /// End the gesture, committing once if the layer changed
    pub fn pointer_up(&mut self, editor: &mut Editor) -> Change {
        if self.abandon_if_interrupted(editor) {
            return Change::none(editor.version());
        }
        let state = std::mem::replace(&mut self.state, GestureState::Idle);
        let Some(anchor) = state.anchor() else {
            return Change::none(editor.version());
        };

        let changed = editor.layer(anchor.id).is_some_and(|layer| layer != anchor);
        if !changed {
            return Change::none(editor.version());
        }
        if !editor.settings().commit_on_release {
            log::debug!("Leaving {} result uncommitted", state.name());
            return Change::none(editor.version());
        }
        editor.commit()
    }

    /// Abort the gesture and put the layer back where it started
    pub fn cancel(&mut self, editor: &mut Editor) -> Result<Change, EditorError> {
        if self.abandon_if_interrupted(editor) {
            return Ok(Change::none(editor.version()));
        }
        let state = std::mem::replace(&mut self.state, GestureState::Idle);
        let Some(anchor) = state.anchor() else {
            return Ok(Change::none(editor.version()));
        };
        log::debug!("Cancelled {} on {}", state.name(), anchor.id);
        let restore = LayerPatch {
            rotation: Some(anchor.rotation),
            ..LayerPatch::bounds(anchor.x, anchor.y, anchor.width, anchor.height)
        };
        editor.update_transient(anchor.id, &restore)
    }
}

fn drag_patch(editor: &Editor, anchor: &Layer, anchor_pointer: Point, pointer: Point) -> LayerPatch {
    let (dx, dy) = anchor_pointer.delta_to(pointer);
    let (mut x, mut y) = (anchor.x + dx, anchor.y + dy);
    if editor.settings().snap_to_grid {
        let grid = editor.settings().grid_size;
        x = snap(x, grid);
        y = snap(y, grid);
    }
    LayerPatch::position(x, y)
}

/// Resize so that the corner opposite the grabbed one stays put on the canvas,
/// even for rotated layers
fn resize_patch(anchor: &Layer, corner: Corner, pointer: Point) -> LayerPatch {
    let (sx, sy) = corner.signs();
    let fixed = anchor.bounds().corner(corner.opposite(), anchor.rotation);

    // Pointer in the layer's unrotated frame, relative to the fixed corner
    let local = rotate_point(pointer, fixed, -anchor.rotation);
    let (lx, ly) = fixed.delta_to(local);
    let width = (sx * lx).max(MIN_LAYER_SIZE);
    let height = (sy * ly).max(MIN_LAYER_SIZE);

    let half = rotate_point(
        Point::new(sx * width / 2.0, sy * height / 2.0),
        Point::ORIGIN,
        anchor.rotation,
    );
    let center = fixed.offset(half.x, half.y);
    LayerPatch::bounds(center.x - width / 2.0, center.y - height / 2.0, width, height)
}

fn rotate_patch(anchor: &Layer, start_angle: f64, pointer: Point, modifiers: Modifiers) -> LayerPatch {
    let center = anchor.bounds().center();
    let mut rotation = anchor.rotation + angle_between(center, pointer) - start_angle;
    if modifiers.shift {
        rotation = snap(rotation, ROTATION_SNAP);
    }
    LayerPatch::rotation(normalize_degrees(rotation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::EditorSettings;
    use pretty_assertions::assert_eq;

    const NO_MODS: Modifiers = Modifiers { shift: false };

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    /// Editor at zoom 1 with the origin at 0 so screen and canvas coincide
    fn editor_with(settings: EditorSettings) -> Editor {
        let mut editor = Editor::new(settings);
        editor.set_zoom(1.0).unwrap();
        editor
    }

    fn editor() -> Editor {
        editor_with(EditorSettings::default())
    }

    fn text_at_center(editor: &mut Editor) -> LayerId {
        // 400x100 box at (760, 490)
        editor.add_text("Drag me").changed[0]
    }

    #[test]
    fn test_pointer_down_on_layer_starts_drag() {
        let mut editor = editor();
        let id = text_at_center(&mut editor);
        editor.clear_selection();
        let mut controller = InteractionController::new();

        controller
            .pointer_down(&mut editor, Point::new(900.0, 540.0), NO_MODS)
            .unwrap();

        assert!(controller.is_capturing());
        assert_eq!(controller.state().layer(), Some(id));
        assert_eq!(editor.selection(), Some(id));
    }

    #[test]
    fn test_pointer_down_on_empty_canvas_clears_selection() {
        let mut editor = editor();
        text_at_center(&mut editor);
        let mut controller = InteractionController::new();

        controller
            .pointer_down(&mut editor, Point::new(10.0, 10.0), NO_MODS)
            .unwrap();

        assert!(!controller.is_capturing());
        assert_eq!(editor.selection(), None);
    }

    #[test]
    fn test_drag_commits_exactly_once() {
        let mut editor = editor();
        let id = text_at_center(&mut editor);
        let history_len = editor.history().len();
        let mut controller = InteractionController::new();

        controller
            .pointer_down(&mut editor, Point::new(900.0, 540.0), NO_MODS)
            .unwrap();
        for step in 1..=25 {
            let change = controller
                .pointer_move(&mut editor, Point::new(900.0 + step as f64, 540.0 + step as f64), NO_MODS)
                .unwrap();
            assert!(!change.committed);
        }
        assert_eq!(editor.history().len(), history_len);

        let change = controller.pointer_up(&mut editor);

        assert!(change.committed);
        assert!(!controller.is_capturing());
        assert_eq!(editor.history().len(), history_len + 1);
        assert_eq!(editor.layer(id).unwrap().position(), Point::new(785.0, 515.0));

        editor.undo();
        assert_eq!(editor.layer(id).unwrap().position(), Point::new(760.0, 490.0));
    }

    #[test]
    fn test_drag_delta_is_in_canvas_units() {
        let mut editor = editor();
        let id = text_at_center(&mut editor);
        editor.set_zoom(0.5).unwrap();
        let mut controller = InteractionController::new();

        // Canvas (900, 540) is screen (450, 270) at zoom 0.5
        controller
            .pointer_down(&mut editor, Point::new(450.0, 270.0), NO_MODS)
            .unwrap();
        controller
            .pointer_move(&mut editor, Point::new(460.0, 270.0), NO_MODS)
            .unwrap();

        assert_eq!(editor.layer(id).unwrap().x, 780.0);
    }

    #[test]
    fn test_click_without_movement_does_not_commit() {
        let mut editor = editor();
        text_at_center(&mut editor);
        let history_len = editor.history().len();
        let mut controller = InteractionController::new();

        controller
            .pointer_down(&mut editor, Point::new(900.0, 540.0), NO_MODS)
            .unwrap();
        let change = controller.pointer_up(&mut editor);

        assert!(change.is_noop());
        assert_eq!(editor.history().len(), history_len);
    }

    #[test]
    fn test_release_without_commit_on_release_leaves_change_pending() {
        let mut editor = editor_with(EditorSettings {
            commit_on_release: false,
            ..EditorSettings::default()
        });
        text_at_center(&mut editor);
        let history_len = editor.history().len();
        let mut controller = InteractionController::new();

        controller
            .pointer_down(&mut editor, Point::new(900.0, 540.0), NO_MODS)
            .unwrap();
        controller
            .pointer_move(&mut editor, Point::new(950.0, 540.0), NO_MODS)
            .unwrap();
        controller.pointer_up(&mut editor);

        assert_eq!(editor.history().len(), history_len);
        assert!(editor.has_uncommitted_changes());
    }

    #[test]
    fn test_locked_layer_is_selected_but_not_dragged() {
        let mut editor = editor();
        let id = text_at_center(&mut editor);
        editor
            .edit_layer(
                id,
                LayerPatch {
                    locked: Some(true),
                    ..LayerPatch::default()
                },
            )
            .unwrap();
        editor.clear_selection();
        let mut controller = InteractionController::new();

        controller
            .pointer_down(&mut editor, Point::new(900.0, 540.0), NO_MODS)
            .unwrap();
        controller
            .pointer_move(&mut editor, Point::new(1000.0, 600.0), NO_MODS)
            .unwrap();

        assert!(!controller.is_capturing());
        assert_eq!(editor.selection(), Some(id));
        assert_eq!(editor.layer(id).unwrap().position(), Point::new(760.0, 490.0));
    }

    #[test]
    fn test_snap_to_grid_while_dragging() {
        let mut editor = editor_with(EditorSettings {
            snap_to_grid: true,
            ..EditorSettings::default()
        });
        let id = text_at_center(&mut editor);
        let mut controller = InteractionController::new();

        controller
            .pointer_down(&mut editor, Point::new(900.0, 540.0), NO_MODS)
            .unwrap();
        controller
            .pointer_move(&mut editor, Point::new(913.0, 547.0), NO_MODS)
            .unwrap();

        // 773 -> 760, 497 -> 480
        assert_eq!(editor.layer(id).unwrap().position(), Point::new(760.0, 480.0));
    }

    #[test]
    fn test_cancel_restores_anchor_without_commit() {
        let mut editor = editor();
        let id = text_at_center(&mut editor);
        let history_len = editor.history().len();
        let mut controller = InteractionController::new();

        controller
            .pointer_down(&mut editor, Point::new(900.0, 540.0), NO_MODS)
            .unwrap();
        controller
            .pointer_move(&mut editor, Point::new(1200.0, 800.0), NO_MODS)
            .unwrap();
        controller.cancel(&mut editor).unwrap();

        assert!(!controller.is_capturing());
        assert_eq!(editor.layer(id).unwrap().position(), Point::new(760.0, 490.0));
        assert_eq!(editor.history().len(), history_len);
        assert!(!editor.has_uncommitted_changes());
    }

    #[test]
    fn test_layer_deleted_mid_gesture_returns_to_idle() {
        let mut editor = editor();
        let id = text_at_center(&mut editor);
        let mut controller = InteractionController::new();

        controller
            .pointer_down(&mut editor, Point::new(900.0, 540.0), NO_MODS)
            .unwrap();
        editor.delete_layer(id);
        let change = controller
            .pointer_move(&mut editor, Point::new(950.0, 540.0), NO_MODS)
            .unwrap();

        assert!(change.is_noop());
        assert!(!controller.is_capturing());
        assert!(controller.pointer_up(&mut editor).is_noop());
    }

    #[test]
    fn test_undo_mid_drag_abandons_gesture() {
        let mut editor = editor();
        let id = text_at_center(&mut editor);
        editor.edit_layer(id, LayerPatch::rotation(10.0)).unwrap();
        let history_len = editor.history().len();
        let mut controller = InteractionController::new();

        controller
            .pointer_down(&mut editor, Point::new(900.0, 540.0), NO_MODS)
            .unwrap();
        controller
            .pointer_move(&mut editor, Point::new(950.0, 540.0), NO_MODS)
            .unwrap();
        editor.undo();
        let moved = controller
            .pointer_move(&mut editor, Point::new(1000.0, 540.0), NO_MODS)
            .unwrap();
        let released = controller.pointer_up(&mut editor);

        assert!(moved.is_noop());
        assert!(released.is_noop());
        assert!(!controller.is_capturing());
        let layer = editor.layer(id).unwrap();
        assert_eq!(layer.rotation, 0.0);
        assert_eq!(layer.position(), Point::new(760.0, 490.0));
        assert!(editor.history().can_redo());
        assert_eq!(editor.history().len(), history_len);

        editor.redo();
        assert_eq!(editor.layer(id).unwrap().rotation, 10.0);
    }

    #[test]
    fn test_keyboard_edit_mid_drag_is_kept() {
        let mut editor = editor();
        let id = text_at_center(&mut editor);
        let mut controller = InteractionController::new();

        controller
            .pointer_down(&mut editor, Point::new(900.0, 540.0), NO_MODS)
            .unwrap();
        editor.edit_layer(id, LayerPatch::position(10.0, 20.0)).unwrap();
        let cancelled = controller.cancel(&mut editor).unwrap();

        assert!(cancelled.is_noop());
        assert_eq!(editor.layer(id).unwrap().position(), Point::new(10.0, 20.0));
    }

    #[test]
    fn test_resize_from_bottom_right_keeps_top_left() {
        let mut editor = editor();
        let id = text_at_center(&mut editor);
        let mut controller = InteractionController::new();

        // Bottom-right handle at (1160, 590)
        controller
            .pointer_down(&mut editor, Point::new(1162.0, 591.0), NO_MODS)
            .unwrap();
        assert_eq!(controller.state().name(), "resizing");
        controller
            .pointer_move(&mut editor, Point::new(1260.0, 640.0), NO_MODS)
            .unwrap();
        controller.pointer_up(&mut editor);

        let layer = editor.layer(id).unwrap();
        assert!(approx(layer.x, 760.0));
        assert!(approx(layer.y, 490.0));
        assert!(approx(layer.width, 500.0));
        assert!(approx(layer.height, 150.0));
    }

    #[test]
    fn test_resize_rotated_layer_keeps_opposite_corner_fixed() {
        let mut editor = editor();
        let id = text_at_center(&mut editor);
        editor.edit_layer(id, LayerPatch::rotation(90.0)).unwrap();
        let layer = editor.layer(id).unwrap().clone();
        let fixed = layer.bounds().corner(Corner::TopLeft, 90.0);
        let grab = layer.bounds().corner(Corner::BottomRight, 90.0);
        let mut controller = InteractionController::new();

        controller.pointer_down(&mut editor, grab, NO_MODS).unwrap();
        controller
            .pointer_move(&mut editor, grab.offset(-20.0, 30.0), NO_MODS)
            .unwrap();

        let resized = editor.layer(id).unwrap();
        let moved_fixed = resized.bounds().corner(Corner::TopLeft, resized.rotation);
        assert!(approx(moved_fixed.x, fixed.x));
        assert!(approx(moved_fixed.y, fixed.y));
        // Rotated a quarter turn: screen +y grows the width, screen -x the height
        assert!(approx(resized.width, 430.0));
        assert!(approx(resized.height, 120.0));
    }

    #[test]
    fn test_resize_never_collapses() {
        let mut editor = editor();
        let id = text_at_center(&mut editor);
        let mut controller = InteractionController::new();

        controller
            .pointer_down(&mut editor, Point::new(1160.0, 590.0), NO_MODS)
            .unwrap();
        controller
            .pointer_move(&mut editor, Point::new(0.0, 0.0), NO_MODS)
            .unwrap();

        let layer = editor.layer(id).unwrap();
        assert_eq!((layer.width, layer.height), (MIN_LAYER_SIZE, MIN_LAYER_SIZE));
    }

    #[test]
    fn test_rotate_handle_with_shift_snaps() {
        let mut editor = editor();
        let id = text_at_center(&mut editor);
        let mut controller = InteractionController::new();

        // Rotation handle sits 30 above the top centre: (960, 460)
        controller
            .pointer_down(&mut editor, Point::new(960.0, 460.0), NO_MODS)
            .unwrap();
        assert_eq!(controller.state().name(), "rotating");

        // A quarter turn clockwise around the centre (960, 540), nudged off axis
        controller
            .pointer_move(&mut editor, Point::new(1040.0, 545.0), Modifiers { shift: true })
            .unwrap();
        assert!(approx(editor.layer(id).unwrap().rotation, 90.0));

        controller
            .pointer_move(&mut editor, Point::new(1040.0, 545.0), NO_MODS)
            .unwrap();
        let free = editor.layer(id).unwrap().rotation;
        assert!(free > 90.0 && free < 95.0, "rotation {free}");
    }

    #[test]
    fn test_handles_follow_rotation() {
        let mut editor = editor();
        let id = text_at_center(&mut editor);
        editor.edit_layer(id, LayerPatch::rotation(180.0)).unwrap();

        let handles = handle_positions(editor.layer(id).unwrap());
        let (_, rotate) = handles
            .iter()
            .find(|(handle, _)| *handle == Handle::Rotate)
            .unwrap();

        assert!(approx(rotate.x, 960.0));
        assert!(approx(rotate.y, 620.0));
    }

    #[test]
    fn test_move_without_gesture_is_ignored() {
        let mut editor = editor();
        text_at_center(&mut editor);
        let mut controller = InteractionController::new();

        let change = controller
            .pointer_move(&mut editor, Point::new(5.0, 5.0), NO_MODS)
            .unwrap();

        assert!(change.is_noop());
        assert!(controller.cancel(&mut editor).unwrap().is_noop());
    }
}
