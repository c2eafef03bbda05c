//! Multi-select model for batch node operations.
//!
//! # Responsibility
//! - Track which identifiers are chosen for the next batch mutation,
//!   plus the anchor used for range extension.
//!
//! # Invariants
//! - The chosen set never holds duplicates; iteration order is
//!   irrelevant to correctness.
//! - Range extension only ever adds identifiers.
//! - A drag always acts on a coherent selection: the multi-select the
//!   operator built, or just the grabbed item.

use std::collections::HashSet;
use std::hash::Hash;

/// Ephemeral selection set with a "last selected" anchor.
#[derive(Debug, Clone, Default)]
pub struct Selection<K: Eq + Hash + Clone> {
    chosen: HashSet<K>,
    last_selected: Option<K>,
}

impl<K: Eq + Hash + Clone> Selection<K> {
    pub fn new() -> Self {
        Self {
            chosen: HashSet::new(),
            last_selected: None,
        }
    }

    /// Adds the id when absent, removes it when present. Always moves the
    /// anchor to `id`.
    pub fn toggle(&mut self, id: K) {
        if !self.chosen.remove(&id) {
            self.chosen.insert(id.clone());
        }
        self.last_selected = Some(id);
    }

    /// Adds every id in the inclusive span between the anchor's position
    /// and `target`'s position in `order` (order-independent endpoints).
    /// Ids outside the span stay selected; the anchor is retained so
    /// successive extensions re-span from the same point.
    ///
    /// Without a resolvable anchor or target this degrades to `toggle`.
    pub fn extend_range(&mut self, target: K, order: &[K]) {
        let anchor_index = self
            .last_selected
            .as_ref()
            .and_then(|anchor| order.iter().position(|key| key == anchor));
        let target_index = order.iter().position(|key| *key == target);

        match (anchor_index, target_index) {
            (Some(anchor), Some(hit)) => {
                let (lo, hi) = (anchor.min(hit), anchor.max(hit));
                for key in &order[lo..=hi] {
                    self.chosen.insert(key.clone());
                }
            }
            _ => self.toggle(target),
        }
    }

    /// Ensures the upcoming drag acts on a coherent selection: grabbing
    /// an unselected id collapses the selection to that id alone.
    pub fn start_drag(&mut self, id: &K) {
        if !self.chosen.contains(id) {
            self.chosen.clear();
            self.chosen.insert(id.clone());
            self.last_selected = Some(id.clone());
        }
    }

    /// Empties the set and drops the anchor.
    pub fn clear(&mut self) {
        self.chosen.clear();
        self.last_selected = None;
    }

    pub fn contains(&self, id: &K) -> bool {
        self.chosen.contains(id)
    }

    pub fn len(&self) -> usize {
        self.chosen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chosen.is_empty()
    }

    pub fn last_selected(&self) -> Option<&K> {
        self.last_selected.as_ref()
    }

    /// Selected ids in current list order, for deterministic remote
    /// batches. Ids no longer present in `order` are skipped.
    pub fn batch(&self, order: &[K]) -> Vec<K> {
        order
            .iter()
            .filter(|key| self.chosen.contains(key))
            .cloned()
            .collect()
    }
}
