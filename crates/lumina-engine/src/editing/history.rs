use std::ops::Deref;
use std::sync::Arc;

use crate::models::Layer;

/// Immutable copy of the whole layer sequence at one point in time.
///
/// Cloning is cheap; the layers are shared.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot(Arc<[Layer]>);

impl Snapshot {
    pub fn empty() -> Self {
        Self(Arc::from(Vec::new()))
    }

    pub fn layers(&self) -> &[Layer] {
        &self.0
    }
}

impl From<Vec<Layer>> for Snapshot {
    fn from(layers: Vec<Layer>) -> Self {
        Self(Arc::from(layers))
    }
}

impl Deref for Snapshot {
    type Target = [Layer];

    fn deref(&self) -> &[Layer] {
        &self.0
    }
}

/// Linear undo/redo timeline.
///
/// Invariant: `cursor` is `None` only while the timeline is empty, otherwise it
/// points at the snapshot matching the live store. Committing after an undo
/// drops every snapshot past the cursor.
#[derive(Debug, Clone, Default)]
pub struct History {
    snapshots: Vec<Snapshot>,
    cursor: Option<usize>,
    limit: Option<usize>,
}

impl History {
    /// Unbounded history
    pub fn new() -> Self {
        Self::default()
    }

    /// History keeping at most `limit` snapshots (at least one)
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit.max(1)),
            ..Self::default()
        }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn current(&self) -> Option<&Snapshot> {
        self.cursor.and_then(|cursor| self.snapshots.get(cursor))
    }

    /// Record `snapshot` as the newest state, discarding the redo tail
    pub fn commit(&mut self, snapshot: Snapshot) {
        let keep = self.cursor.map_or(0, |cursor| cursor + 1);
        let discarded = self.snapshots.len() - keep;
        if discarded > 0 {
            log::debug!("Discarding {discarded} redo snapshot(s)");
        }
        self.snapshots.truncate(keep);
        self.snapshots.push(snapshot);
        self.cursor = Some(self.snapshots.len() - 1);
        self.enforce_limit();
    }

    /// Replace the snapshot at the cursor instead of adding a new one.
    ///
    /// Used to fold a burst of edits to the same field into one undo step.
    /// Falls back to [`History::commit`] on an empty timeline.
    pub fn amend(&mut self, snapshot: Snapshot) {
        let Some(cursor) = self.cursor else {
            self.commit(snapshot);
            return;
        };
        self.snapshots.truncate(cursor + 1);
        self.snapshots[cursor] = snapshot;
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|cursor| cursor > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.cursor
            .is_some_and(|cursor| cursor + 1 < self.snapshots.len())
    }

    /// Step back; `None` at the beginning of the timeline
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if !self.can_undo() {
            return None;
        }
        let cursor = self.cursor.map(|cursor| cursor - 1);
        self.cursor = cursor;
        self.current()
    }

    /// Step forward; `None` at the end of the timeline
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if !self.can_redo() {
            return None;
        }
        self.cursor = self.cursor.map(|cursor| cursor + 1);
        self.current()
    }

    fn enforce_limit(&mut self) {
        let Some(limit) = self.limit else {
            return;
        };
        if self.snapshots.len() <= limit {
            return;
        }
        let excess = self.snapshots.len() - limit;
        self.snapshots.drain(..excess);
        self.cursor = self.cursor.map(|cursor| cursor.saturating_sub(excess));
        log::debug!("History limit {limit} reached, dropped {excess} oldest snapshot(s)");
    }
}
