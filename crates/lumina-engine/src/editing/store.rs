use serde::Serialize;

use crate::editing::Snapshot;
use crate::error::EditorError;
use crate::geometry::Point;
use crate::models::{Layer, LayerId, LayerPatch};

/// Horizontal offset, and vertical, applied to duplicates so they don't hide
/// the original
pub const DUPLICATE_OFFSET: f64 = 20.0;
pub const COPY_SUFFIX: &str = " (Copy)";

/// Direction for z-order moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZOrder {
    /// One step towards the front
    Up,
    /// One step towards the back
    Down,
    /// Topmost
    Front,
    /// Bottommost
    Back,
}

/// Ordered collection of layers; the last element is the front-most.
///
/// Ids are unique within the store. Operations that reference an absent id
/// are no-ops and report that through their return value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayerStore {
    layers: Vec<Layer>,
}

impl LayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from an existing sequence, rejecting duplicate ids
    pub fn from_layers(layers: Vec<Layer>) -> Result<Self, EditorError> {
        let mut store = Self::new();
        for layer in layers {
            store.insert(layer)?;
        }
        Ok(store)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Layer> {
        self.layers.iter()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn get(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.id == id)
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.get(id).is_some()
    }

    pub fn index_of(&self, id: LayerId) -> Result<usize, EditorError> {
        self.layers
            .iter()
            .position(|layer| layer.id == id)
            .ok_or(EditorError::NotFound(id))
    }

    /// Append `layer` at the front of the z-order
    pub fn insert(&mut self, layer: Layer) -> Result<(), EditorError> {
        if self.contains(layer.id) {
            log::error!("Refusing to insert layer with duplicate id {}", layer.id);
            return Err(EditorError::InvariantViolation(format!(
                "duplicate layer id {}",
                layer.id
            )));
        }
        self.layers.push(layer);
        Ok(())
    }

    /// Apply `patch` to the layer with `id`.
    ///
    /// Returns `Ok(false)` when the id is absent. An invalid patch is rejected
    /// and the store stays unchanged.
    pub fn update_by_id(&mut self, id: LayerId, patch: &LayerPatch) -> Result<bool, EditorError> {
        let Some(layer) = self.layers.iter_mut().find(|layer| layer.id == id) else {
            log::debug!("Update ignored, layer {id} not found");
            return Ok(false);
        };
        layer.apply_patch(patch)?;
        Ok(true)
    }

    pub fn remove_by_id(&mut self, id: LayerId) -> Option<Layer> {
        match self.index_of(id) {
            Ok(index) => Some(self.layers.remove(index)),
            Err(e) => {
                log::debug!("Remove ignored: {e}");
                None
            }
        }
    }

    /// Clone the layer under a fresh id, shifted by [`DUPLICATE_OFFSET`] and
    /// named with a " (Copy)" suffix, and put the copy at the front.
    pub fn duplicate(&mut self, id: LayerId) -> Option<LayerId> {
        let source = self.get(id)?;
        let mut copy = source.clone_with_new_id();
        copy.x += DUPLICATE_OFFSET;
        copy.y += DUPLICATE_OFFSET;
        copy.name.push_str(COPY_SUFFIX);

        let copy_id = copy.id;
        self.layers.push(copy);
        Some(copy_id)
    }

    /// Move a layer in the z-order.
    ///
    /// The layer is taken out first and then reinserted, so `Up` lands one
    /// slot above its previous neighbour and `Down` one slot below. Returns
    /// whether the order actually changed.
    pub fn reorder(&mut self, id: LayerId, direction: ZOrder) -> bool {
        let index = match self.index_of(id) {
            Ok(index) => index,
            Err(e) => {
                log::debug!("Reorder ignored: {e}");
                return false;
            }
        };

        let layer = self.layers.remove(index);
        let target = match direction {
            ZOrder::Front => self.layers.len(),
            ZOrder::Back => 0,
            ZOrder::Up => (index + 1).min(self.layers.len()),
            ZOrder::Down => index.saturating_sub(1),
        };
        self.layers.insert(target, layer);
        target != index
    }

    /// Topmost visible layer under `point` (canvas space)
    pub fn hit_test(&self, point: Point) -> Option<&Layer> {
        self.layers
            .iter()
            .rev()
            .find(|layer| layer.visible && layer.contains(point))
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from(self.layers.clone())
    }

    /// Replace the whole sequence with the content of `snapshot`
    pub fn restore(&mut self, snapshot: &Snapshot) {
        self.layers = snapshot.to_vec();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{create_text_layer, LayerPatch};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn named(name: &str, x: f64, y: f64) -> Layer {
        let mut layer = create_text_layer(name, Point::new(0.0, 0.0));
        layer.name = name.to_string();
        layer.x = x;
        layer.y = y;
        layer
    }

    fn store_of(names: &[&str]) -> LayerStore {
        LayerStore::from_layers(names.iter().map(|n| named(n, 0.0, 0.0)).collect()).unwrap()
    }

    fn names(store: &LayerStore) -> Vec<&str> {
        store.iter().map(|layer| layer.name.as_str()).collect()
    }

    fn id_of(store: &LayerStore, name: &str) -> LayerId {
        store.iter().find(|l| l.name == name).unwrap().id
    }

    #[test]
    fn test_insert_appends_to_front() {
        let mut store = store_of(&["back"]);
        store.insert(named("front", 0.0, 0.0)).unwrap();
        assert_eq!(names(&store), vec!["back", "front"]);
    }

    #[test]
    fn test_insert_rejects_duplicate_id() {
        let mut store = store_of(&["only"]);
        let clone = store.layers()[0].clone();

        let result = store.insert(clone);

        assert!(matches!(result, Err(EditorError::InvariantViolation(_))));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_update_by_id() {
        let mut store = store_of(&["a", "b"]);
        let id = id_of(&store, "b");

        let updated = store.update_by_id(id, &LayerPatch::position(5.0, 6.0)).unwrap();

        assert!(updated);
        assert_eq!(store.get(id).unwrap().position(), Point::new(5.0, 6.0));
        assert_eq!(store.layers()[0].position(), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_missing_id_operations_are_structural_no_ops() {
        let mut store = store_of(&["a", "b"]);
        let before = store.clone();
        let ghost = LayerId::new();

        assert!(!store.update_by_id(ghost, &LayerPatch::position(1.0, 1.0)).unwrap());
        assert!(store.remove_by_id(ghost).is_none());
        assert!(store.duplicate(ghost).is_none());
        assert!(!store.reorder(ghost, ZOrder::Front));

        assert_eq!(store, before);
    }

    #[test]
    fn test_invalid_update_leaves_store_unchanged() {
        let mut store = store_of(&["a"]);
        let before = store.clone();
        let id = id_of(&store, "a");
        let patch = LayerPatch {
            width: Some(f64::NAN),
            ..LayerPatch::default()
        };

        assert!(store.update_by_id(id, &patch).is_err());
        assert_eq!(store, before);
    }

    #[test]
    fn test_remove_by_id() {
        let mut store = store_of(&["a", "b", "c"]);
        let removed = store.remove_by_id(id_of(&store, "b")).unwrap();
        assert_eq!(removed.name, "b");
        assert_eq!(names(&store), vec!["a", "c"]);
    }

    #[test]
    fn test_duplicate_offsets_and_renames() {
        let mut store = LayerStore::from_layers(vec![named("Title", 100.0, 100.0), named("Logo", 0.0, 0.0)]).unwrap();
        let original = id_of(&store, "Title");

        let copy_id = store.duplicate(original).unwrap();
        let copy = store.get(copy_id).unwrap();

        assert_ne!(copy_id, original);
        assert_eq!(copy.position(), Point::new(120.0, 120.0));
        assert_eq!(copy.name, "Title (Copy)");
        assert_eq!(store.layers().last().unwrap().id, copy_id);
        assert_eq!(store.get(original).unwrap().position(), Point::new(100.0, 100.0));
    }

    #[rstest]
    #[case("a", ZOrder::Up, &["b", "a", "c"])]
    #[case("c", ZOrder::Up, &["a", "b", "c"])]
    #[case("b", ZOrder::Down, &["b", "a", "c"])]
    #[case("a", ZOrder::Down, &["a", "b", "c"])]
    #[case("a", ZOrder::Front, &["b", "c", "a"])]
    #[case("c", ZOrder::Back, &["c", "a", "b"])]
    fn test_reorder(#[case] name: &str, #[case] direction: ZOrder, #[case] expected: &[&str]) {
        let mut store = store_of(&["a", "b", "c"]);
        store.reorder(id_of(&store, name), direction);
        assert_eq!(names(&store), expected);
    }

    #[test]
    fn test_reorder_reports_unchanged_order() {
        let mut store = store_of(&["a", "b"]);
        assert!(!store.reorder(id_of(&store, "b"), ZOrder::Front));
        assert!(store.reorder(id_of(&store, "b"), ZOrder::Back));
    }

    #[test]
    fn test_front_then_back_ends_at_bottom() {
        let mut store = store_of(&["back", "middle", "front"]);
        let id = id_of(&store, "middle");

        store.reorder(id, ZOrder::Front);
        store.reorder(id, ZOrder::Back);

        assert_eq!(store.index_of(id).unwrap(), 0);
        insta::assert_debug_snapshot!(names(&store), @r#"
        [
            "middle",
            "back",
            "front",
        ]
        "#);
    }

    #[test]
    fn test_hit_test_prefers_topmost_visible() {
        let mut store = LayerStore::from_layers(vec![named("bottom", 0.0, 0.0), named("top", 50.0, 0.0)]).unwrap();
        let inside_both = Point::new(100.0, 50.0);

        assert_eq!(store.hit_test(inside_both).unwrap().name, "top");

        let top = id_of(&store, "top");
        store
            .update_by_id(
                top,
                &LayerPatch {
                    visible: Some(false),
                    ..LayerPatch::default()
                },
            )
            .unwrap();
        assert_eq!(store.hit_test(inside_both).unwrap().name, "bottom");
        assert!(store.hit_test(Point::new(5000.0, 5000.0)).is_none());
    }

    #[test]
    fn test_snapshot_restore_roundtrip() {
        let mut store = store_of(&["a", "b"]);
        let snapshot = store.snapshot();

        store.remove_by_id(id_of(&store, "a"));
        store.restore(&snapshot);

        assert_eq!(names(&store), vec!["a", "b"]);
    }
}
