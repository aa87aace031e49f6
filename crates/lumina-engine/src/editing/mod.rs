/*!
 * # Editing Core Module
 *
 * Everything that changes the canvas goes through this module.
 *
 * ## Architecture Overview
 *
 * ### 1. Single Source of Truth: `LayerStore`
 * - The ordered layer sequence lives in one **`LayerStore`**; sequence position is z-order
 * - Operations on ids that are no longer present are **no-ops**, never errors
 * - Patches are validated before they touch a layer, so a layer never holds `NaN`
 *
 * ### 2. Linear Undo/Redo: `History`
 * - Every undoable action records an immutable **`Snapshot`** of the whole sequence
 * - Committing after an undo discards the redo tail (no redo tree)
 * - Optional depth limit and amend support for coalescing rapid field edits
 *
 * ### 3. Explicit State Container: `Editor`
 * - Owns store, history, selection and viewport; no global state
 * - Each mutating call returns a **`Change`** with the touched ids, whether a
 *   snapshot was recorded, and a monotonically increasing version
 * - Distinguishes **committed** actions from **transient** updates
 *
 * ### 4. Pointer Gestures: `InteractionController`
 * - Explicit state machine `Idle → Dragging | Resizing | Rotating → Idle`
 * - Moves are transient; releasing the pointer commits at most once
 * - Cancelling restores the geometry captured when the gesture started
 *
 * ## Usage Pattern
 *
 * ```rust
 * use lumina_engine::editing::*;
 * use lumina_engine::geometry::Point;
 *
 * let mut editor = Editor::new(EditorSettings::default());
 * let mut controller = InteractionController::new();
 *
 * // 1. Committed action
 * let change = editor.add_text("Hello");
 * assert!(change.committed);
 *
 * // 2. Drag it around: transient updates, one commit on release
 * let start = editor.viewport().to_screen(Point::new(960.0, 540.0)).unwrap();
 * controller.pointer_down(&mut editor, start, Modifiers::default()).unwrap();
 * controller.pointer_move(&mut editor, start.offset(30.0, 0.0), Modifiers::default()).unwrap();
 * controller.pointer_up(&mut editor);
 *
 * // 3. Undo the drag, then the insertion
 * editor.undo();
 * editor.undo();
 * assert!(editor.layers().is_empty());
 * ```
 */

pub mod change;
pub mod editor;
pub mod history;
pub mod interaction;
pub mod store;

pub use change::Change;
pub use editor::{Editor, EditorSettings, Viewport};
pub use history::{History, Snapshot};
pub use interaction::{GestureState, Handle, InteractionController, Modifiers, handle_positions};
pub use store::{LayerStore, ZOrder};
