use crate::editing::change::diff_ids;
use crate::editing::{Change, History, LayerStore, Snapshot, ZOrder};
use crate::error::EditorError;
use crate::geometry::{Point, Size, canvas_to_screen, screen_to_canvas};
use crate::models::presets::{
    DEFAULT_CANVAS_SIZE, backdrop_preset, font_preset, image_gradient_preset, text_gradient_preset,
};
use crate::models::{
    CropPatch, CropWindow, FiltersPatch, GlowPatch, GradientPatch, ImagePatch, Layer, LayerId,
    LayerPatch, NumericField, TextFill, TextPatch, create_image_layer, create_text_layer,
};
use crate::render::Scene;

/// Tunables for an [`Editor`], usually filled from the user's config file
#[derive(Debug, Clone, PartialEq)]
pub struct EditorSettings {
    pub canvas: Size,
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_step: f64,
    pub show_grid: bool,
    pub snap_to_grid: bool,
    pub grid_size: f64,
    /// Maximum number of snapshots kept, unbounded when `None`
    pub history_limit: Option<usize>,
    /// Record one snapshot when a pointer gesture ends
    pub commit_on_release: bool,
    /// Fold consecutive edits of the same fields on the same layer into one
    /// undo step
    pub coalesce_field_edits: bool,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            canvas: DEFAULT_CANVAS_SIZE,
            zoom: 0.6,
            min_zoom: 0.1,
            max_zoom: 2.0,
            zoom_step: 0.1,
            show_grid: false,
            snap_to_grid: false,
            grid_size: 40.0,
            history_limit: None,
            commit_on_release: true,
            coalesce_field_edits: false,
        }
    }
}

/// Where the canvas sits on screen and how large it is drawn
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    origin: Point,
    zoom: f64,
    min_zoom: f64,
    max_zoom: f64,
    step: f64,
    show_grid: bool,
}

impl Viewport {
    fn from_settings(settings: &EditorSettings) -> Self {
        let min_zoom = settings.min_zoom.max(f64::EPSILON);
        let max_zoom = settings.max_zoom.max(min_zoom);
        Self {
            origin: Point::ORIGIN,
            zoom: settings.zoom.clamp(min_zoom, max_zoom),
            min_zoom,
            max_zoom,
            step: settings.zoom_step,
            show_grid: settings.show_grid,
        }
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn show_grid(&self) -> bool {
        self.show_grid
    }

    /// Set the zoom, clamped to the configured range. Returns the applied
    /// value.
    pub fn set_zoom(&mut self, zoom: f64) -> Result<f64, EditorError> {
        if !zoom.is_finite() || zoom <= 0.0 {
            return Err(EditorError::invalid(format!(
                "zoom must be a positive number, got {zoom}"
            )));
        }
        // Two decimals keep repeated steps from drifting (0.1 + 0.2 ...)
        self.zoom = ((zoom * 100.0).round() / 100.0).clamp(self.min_zoom, self.max_zoom);
        Ok(self.zoom)
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.set_zoom(self.zoom + self.step).unwrap_or(self.zoom)
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.set_zoom(self.zoom - self.step).unwrap_or(self.zoom)
    }

    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    pub fn toggle_grid(&mut self) -> bool {
        self.show_grid = !self.show_grid;
        self.show_grid
    }

    pub fn to_canvas(&self, screen: Point) -> Result<Point, EditorError> {
        screen_to_canvas(screen, self.origin, self.zoom)
    }

    pub fn to_screen(&self, canvas: Point) -> Result<Point, EditorError> {
        canvas_to_screen(canvas, self.origin, self.zoom)
    }
}

/// Single owner of the editing state: layers, undo history, selection and
/// viewport.
///
/// Every mutating call returns a [`Change`]. Calls that reference a missing
/// layer are no-ops and return an empty change; calls with malformed input
/// return [`EditorError::InvalidArgument`] and leave everything untouched.
#[derive(Debug, Clone)]
pub struct Editor {
    store: LayerStore,
    history: History,
    selection: Option<LayerId>,
    viewport: Viewport,
    settings: EditorSettings,
    version: u64,
    /// Layer and fields of the last committed field edit, for coalescing
    last_field_edit: Option<(LayerId, Vec<&'static str>)>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorSettings::default())
    }
}

impl Editor {
    pub fn new(settings: EditorSettings) -> Self {
        let store = LayerStore::new();
        let mut history = match settings.history_limit {
            Some(limit) => History::with_limit(limit),
            None => History::new(),
        };
        // Seed with the empty canvas so the first action can be undone
        history.commit(store.snapshot());

        Self {
            store,
            history,
            selection: None,
            viewport: Viewport::from_settings(&settings),
            settings,
            version: 0,
            last_field_edit: None,
        }
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn store(&self) -> &LayerStore {
        &self.store
    }

    pub fn layers(&self) -> &[Layer] {
        self.store.layers()
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.store.get(id)
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn canvas_center(&self) -> Point {
        self.settings.canvas.center()
    }

    /// Whether the live layers differ from the snapshot at the history cursor
    pub fn has_uncommitted_changes(&self) -> bool {
        self.history
            .current()
            .is_none_or(|snapshot| snapshot.layers() != self.store.layers())
    }

    // Layer creation

    pub fn add_text(&mut self, text: impl Into<String>) -> Change {
        let layer = create_text_layer(text, self.canvas_center());
        self.add_layer(layer)
    }

    pub fn add_image(&mut self, source: impl Into<String>, natural: Option<Size>) -> Change {
        let layer = create_image_layer(source, natural, self.settings.canvas);
        self.add_layer(layer)
    }

    fn add_layer(&mut self, layer: Layer) -> Change {
        let id = layer.id;
        let kind = layer.kind.label();
        if let Err(e) = self.store.insert(layer) {
            log::error!("Could not add {kind} layer: {e}");
            debug_assert!(false, "{e}");
            return Change::none(self.version);
        }
        log::debug!("Added {kind} layer {id}");
        self.selection = Some(id);
        self.committed(vec![id])
    }

    // Attribute edits

    /// Apply a patch from a property editor and record it in history.
    ///
    /// With `coalesce_field_edits` enabled, repeated edits touching the same
    /// fields of the same layer amend the previous snapshot instead of adding
    /// one per keystroke.
    pub fn edit_layer(&mut self, id: LayerId, patch: LayerPatch) -> Result<Change, EditorError> {
        let Some(before) = self.store.get(id).cloned() else {
            log::debug!("Edit ignored, layer {id} not found");
            return Ok(Change::none(self.version));
        };
        if patch.is_empty() {
            return Ok(Change::none(self.version));
        }

        self.store
            .update_by_id(id, &patch)
            .inspect_err(|e| log::warn!("Rejected edit of layer {id}: {e}"))?;
        if self.store.get(id) == Some(&before) {
            return Ok(Change::none(self.version));
        }

        let key = (id, patch.touched_fields());
        let coalesce =
            self.settings.coalesce_field_edits && self.last_field_edit.as_ref() == Some(&key);
        if coalesce {
            log::debug!("Amending history entry for {:?} on {id}", key.1);
            self.history.amend(self.store.snapshot());
        } else {
            log::debug!("Committing edit of {:?} on {id}", key.1);
            self.history.commit(self.store.snapshot());
        }
        self.last_field_edit = Some(key);
        Ok(self.bump(vec![id], true))
    }

    /// Parse raw form text for a numeric field and apply it
    pub fn edit_numeric(
        &mut self,
        id: LayerId,
        field: NumericField,
        raw: &str,
    ) -> Result<Change, EditorError> {
        let patch = LayerPatch::numeric(field, raw)?;
        self.edit_layer(id, patch)
    }

    pub fn edit_glow(&mut self, id: LayerId, patch: GlowPatch) -> Result<Change, EditorError> {
        let Some(layer) = self.store.get(id) else {
            return Ok(self.missing(id));
        };
        let glow = patch.merge_into(layer.glow.as_ref());
        self.edit_layer(
            id,
            LayerPatch {
                glow: Some(Some(glow)),
                ..LayerPatch::default()
            },
        )
    }

    pub fn edit_filters(&mut self, id: LayerId, patch: FiltersPatch) -> Result<Change, EditorError> {
        let Some(layer) = self.store.get(id) else {
            return Ok(self.missing(id));
        };
        let Some(image) = layer.as_image() else {
            return Err(not_an_image(id));
        };
        let filters = patch.merge_into(&image.filters);
        self.edit_layer(
            id,
            LayerPatch::image(ImagePatch {
                filters: Some(filters),
                ..ImagePatch::default()
            }),
        )
    }

    /// Merge into the current crop window, starting from the full image when
    /// the layer is not cropped yet
    pub fn edit_crop(&mut self, id: LayerId, patch: CropPatch) -> Result<Change, EditorError> {
        let Some(layer) = self.store.get(id) else {
            return Ok(self.missing(id));
        };
        let Some(image) = layer.as_image() else {
            return Err(not_an_image(id));
        };
        let crop = patch.merge_into(&image.crop.unwrap_or(CropWindow::FULL));
        self.edit_layer(
            id,
            LayerPatch::image(ImagePatch {
                crop: Some(Some(crop)),
                ..ImagePatch::default()
            }),
        )
    }

    /// Enable cropping with the full window, or remove an existing crop
    pub fn toggle_crop(&mut self, id: LayerId) -> Result<Change, EditorError> {
        let Some(layer) = self.store.get(id) else {
            return Ok(self.missing(id));
        };
        let Some(image) = layer.as_image() else {
            return Err(not_an_image(id));
        };
        let crop = match image.crop {
            Some(_) => None,
            None => Some(CropWindow::FULL),
        };
        self.edit_layer(
            id,
            LayerPatch::image(ImagePatch {
                crop: Some(crop),
                ..ImagePatch::default()
            }),
        )
    }

    pub fn edit_gradient_overlay(
        &mut self,
        id: LayerId,
        patch: GradientPatch,
    ) -> Result<Change, EditorError> {
        let Some(layer) = self.store.get(id) else {
            return Ok(self.missing(id));
        };
        let Some(image) = layer.as_image() else {
            return Err(not_an_image(id));
        };
        let overlay = patch.merge_into(image.gradient_overlay.as_ref());
        self.edit_layer(
            id,
            LayerPatch::image(ImagePatch {
                gradient_overlay: Some(Some(overlay)),
                ..ImagePatch::default()
            }),
        )
    }

    /// Replace the backdrop of a text layer with a named preset
    pub fn apply_backdrop_preset(&mut self, id: LayerId, name: &str) -> Result<Change, EditorError> {
        let preset = backdrop_preset(name)
            .ok_or_else(|| EditorError::invalid(format!("unknown backdrop preset '{name}'")))?;
        self.edit_layer(
            id,
            LayerPatch::text(TextPatch {
                backdrop: Some(preset.apply()),
                ..TextPatch::default()
            }),
        )
    }

    /// Switch a text layer to one of the built-in fonts
    pub fn set_font(&mut self, id: LayerId, name: &str) -> Result<Change, EditorError> {
        let preset =
            font_preset(name).ok_or_else(|| EditorError::invalid(format!("unknown font '{name}'")))?;
        self.edit_layer(
            id,
            LayerPatch::text(TextPatch {
                font_family: Some(preset.value.to_string()),
                ..TextPatch::default()
            }),
        )
    }

    /// Fill a text layer with a named gradient
    pub fn apply_text_gradient_preset(
        &mut self,
        id: LayerId,
        name: &str,
    ) -> Result<Change, EditorError> {
        let preset = text_gradient_preset(name)
            .ok_or_else(|| EditorError::invalid(format!("unknown text gradient '{name}'")))?;
        self.edit_layer(
            id,
            LayerPatch::text(TextPatch {
                fill: Some(TextFill::Gradient(preset.value.to_string())),
                ..TextPatch::default()
            }),
        )
    }

    /// Take the overlay colours of a named preset and switch the overlay on;
    /// direction and opacity are kept
    pub fn apply_overlay_preset(&mut self, id: LayerId, name: &str) -> Result<Change, EditorError> {
        let preset = image_gradient_preset(name)
            .ok_or_else(|| EditorError::invalid(format!("unknown overlay preset '{name}'")))?;
        self.edit_gradient_overlay(
            id,
            GradientPatch {
                enabled: Some(true),
                colors: Some(preset.colors()),
                ..GradientPatch::default()
            },
        )
    }

    // Structural edits

    pub fn delete_layer(&mut self, id: LayerId) -> Change {
        let Some(removed) = self.store.remove_by_id(id) else {
            return Change::none(self.version);
        };
        log::debug!("Deleted layer {} ({})", removed.id, removed.display_name());
        if self.selection == Some(id) {
            self.selection = None;
        }
        self.committed(vec![id])
    }

    pub fn delete_selected(&mut self) -> Change {
        match self.selection {
            Some(id) => self.delete_layer(id),
            None => Change::none(self.version),
        }
    }

    /// Duplicate a layer and select the copy
    pub fn duplicate_layer(&mut self, id: LayerId) -> Change {
        let Some(copy) = self.store.duplicate(id) else {
            return self.missing(id);
        };
        self.selection = Some(copy);
        self.committed(vec![copy])
    }

    pub fn reorder_layer(&mut self, id: LayerId, direction: ZOrder) -> Change {
        if !self.store.reorder(id, direction) {
            return Change::none(self.version);
        }
        self.committed(vec![id])
    }

    // Gestures

    /// Update a layer without recording history, e.g. while it is dragged
    pub fn update_transient(&mut self, id: LayerId, patch: &LayerPatch) -> Result<Change, EditorError> {
        let Some(before) = self.store.get(id).cloned() else {
            return Ok(self.missing(id));
        };
        self.store
            .update_by_id(id, patch)
            .inspect_err(|e| log::warn!("Rejected transient update of layer {id}: {e}"))?;
        if self.store.get(id) == Some(&before) {
            return Ok(Change::none(self.version));
        }
        // A gesture in between ends any run of coalesced field edits
        self.last_field_edit = None;
        Ok(self.bump(vec![id], false))
    }

    /// Record the live layers as a new history entry if they differ from the
    /// entry at the cursor
    pub fn commit(&mut self) -> Change {
        let changed = match self.history.current() {
            Some(current) => diff_ids(current.layers(), self.store.layers()),
            None => self.store.iter().map(|layer| layer.id).collect(),
        };
        if changed.is_empty() && self.history.current().is_some() {
            return Change::none(self.version);
        }
        log::debug!("Committing {} changed layer(s)", changed.len());
        self.history.commit(self.store.snapshot());
        self.last_field_edit = None;
        self.version += 1;
        Change {
            changed,
            committed: true,
            version: self.version,
        }
    }

    // History

    pub fn undo(&mut self) -> Change {
        let Some(snapshot) = self.history.undo().cloned() else {
            log::debug!("Nothing to undo");
            return Change::none(self.version);
        };
        self.restore(&snapshot)
    }

    pub fn redo(&mut self) -> Change {
        let Some(snapshot) = self.history.redo().cloned() else {
            log::debug!("Nothing to redo");
            return Change::none(self.version);
        };
        self.restore(&snapshot)
    }

    fn restore(&mut self, snapshot: &Snapshot) -> Change {
        log::debug!(
            "Restoring history entry {:?} of {}",
            self.history.cursor(),
            self.history.len()
        );
        let changed = diff_ids(self.store.layers(), snapshot.layers());
        self.store.restore(snapshot);
        self.last_field_edit = None;
        if let Some(selected) = self.selection
            && !self.store.contains(selected)
        {
            self.selection = None;
        }
        self.bump(changed, false)
    }

    // Selection

    pub fn selection(&self) -> Option<LayerId> {
        self.selection
    }

    /// Select a layer; returns false and keeps the selection when the id is
    /// absent
    pub fn select(&mut self, id: LayerId) -> bool {
        if !self.store.contains(id) {
            log::debug!("Select ignored, layer {id} not found");
            return false;
        }
        self.selection = Some(id);
        true
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn selected_layer(&self) -> Option<&Layer> {
        self.selection.and_then(|id| self.store.get(id))
    }

    /// Select the next layer towards the back, wrapping around to the front
    pub fn cycle_selection(&mut self) -> Option<LayerId> {
        let layers = self.store.layers();
        if layers.is_empty() {
            return None;
        }
        let next = match self.selection.and_then(|id| self.store.index_of(id).ok()) {
            Some(0) | None => layers.len() - 1,
            Some(index) => index - 1,
        };
        self.selection = Some(layers[next].id);
        self.selection
    }

    // Viewport

    pub fn zoom_in(&mut self) -> f64 {
        self.viewport.zoom_in()
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.viewport.zoom_out()
    }

    pub fn set_zoom(&mut self, zoom: f64) -> Result<f64, EditorError> {
        self.viewport.set_zoom(zoom)
    }

    pub fn toggle_grid(&mut self) -> bool {
        self.viewport.toggle_grid()
    }

    pub fn set_origin(&mut self, origin: Point) {
        self.viewport.set_origin(origin);
    }

    /// Renderer input for the current state
    pub fn scene(&self) -> Scene<'_> {
        Scene {
            layers: self.store.layers(),
            canvas: self.settings.canvas,
            zoom: self.viewport.zoom,
            show_grid: self.viewport.show_grid,
            grid_size: self.settings.grid_size,
            selection: self.selection,
        }
    }

    fn committed(&mut self, changed: Vec<LayerId>) -> Change {
        log::debug!(
            "Commit #{} ({} layer(s))",
            self.history.len(),
            self.store.len()
        );
        self.history.commit(self.store.snapshot());
        self.last_field_edit = None;
        self.bump(changed, true)
    }

    fn bump(&mut self, changed: Vec<LayerId>, committed: bool) -> Change {
        self.version += 1;
        Change {
            changed,
            committed,
            version: self.version,
        }
    }

    fn missing(&self, id: LayerId) -> Change {
        log::debug!("Ignoring action on missing layer {id}");
        Change::none(self.version)
    }
}

fn not_an_image(id: LayerId) -> EditorError {
    EditorError::invalid(format!("layer {id} is not an image layer"))
}
