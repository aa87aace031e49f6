use crate::models::{Layer, LayerId};

/// Result of applying an editor action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    /// Layers whose content, presence or z-position differs afterwards
    pub changed: Vec<LayerId>,
    /// Whether a history snapshot was recorded (or amended)
    pub committed: bool,
    /// Editor version after the action
    pub version: u64,
}

impl Change {
    pub(crate) fn none(version: u64) -> Self {
        Self {
            changed: Vec::new(),
            committed: false,
            version,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.changed.is_empty() && !self.committed
    }
}

/// Ids that differ between two layer sequences, in `after` order followed by
/// ids that only exist in `before`
pub(crate) fn diff_ids(before: &[Layer], after: &[Layer]) -> Vec<LayerId> {
    let mut changed = Vec::new();
    for (index, layer) in after.iter().enumerate() {
        let same = before.get(index).is_some_and(|old| old == layer);
        if !same {
            changed.push(layer.id);
        }
    }
    for layer in before {
        if !after.iter().any(|l| l.id == layer.id) {
            changed.push(layer.id);
        }
    }
    changed
}
