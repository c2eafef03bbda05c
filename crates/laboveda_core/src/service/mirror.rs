//! Local collection mirror with the optimistic mutation protocol.
//!
//! # Responsibility
//! - Own a console's local copy of a remote collection plus its focus
//!   pointer.
//! - Apply every mutation optimistically and revert deterministically on
//!   remote failure.
//!
//! # Invariants
//! - Snapshot and optimistic apply run synchronously, with no suspension
//!   between them; the remote call is the only suspension point.
//! - After a failed mutation the collection equals the snapshot exactly,
//!   and focus returns to its pre-mutation target when that target still
//!   exists in the snapshot, else to the snapshot's first element.
//! - An empty mutation is the caller's no-op; the mirror never invents
//!   remote calls.

/// Identity extraction for mirrored rows.
pub trait Keyed {
    type Key: Clone + PartialEq;

    fn key(&self) -> Self::Key;
}

/// A console's local copy of one remote collection.
pub struct Mirror<T: Keyed + Clone> {
    items: Vec<T>,
    focus: Option<T::Key>,
}

impl<T: Keyed + Clone> Default for Mirror<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            focus: None,
        }
    }
}

impl<T: Keyed + Clone> Mirror<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the mirror from a fresh remote read. Focus falls to the
    /// first element.
    pub fn replace_all(&mut self, items: Vec<T>) {
        self.items = items;
        self.focus = self.items.first().map(Keyed::key);
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Current row order as keys, for selection bookkeeping.
    pub fn keys(&self) -> Vec<T::Key> {
        self.items.iter().map(Keyed::key).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, key: &T::Key) -> bool {
        self.items.iter().any(|item| item.key() == *key)
    }

    pub fn get(&self, key: &T::Key) -> Option<&T> {
        self.items.iter().find(|item| item.key() == *key)
    }

    pub fn focused(&self) -> Option<&T> {
        self.focus.as_ref().and_then(|key| self.get(key))
    }

    pub fn focus_key(&self) -> Option<&T::Key> {
        self.focus.as_ref()
    }

    /// Moves focus to an existing row. Unknown keys are rejected.
    pub fn set_focus(&mut self, key: &T::Key) -> bool {
        if self.contains(key) {
            self.focus = Some(key.clone());
            true
        } else {
            false
        }
    }

    /// Runs one mutation under the optimistic protocol.
    ///
    /// 1. Snapshot items and focus.
    /// 2. Apply `mutate` to the local collection synchronously; focus
    ///    advances to the first remaining row if its target vanished.
    /// 3. Invoke `remote`.
    /// 4. On success the optimistic state stands.
    /// 5. On failure restore the snapshot, with focus restored to the
    ///    pre-mutation target when it survives in the snapshot, else to
    ///    the snapshot's first element. The error is passed through.
    pub fn apply_optimistic<E>(
        &mut self,
        mutate: impl FnOnce(&mut Vec<T>),
        remote: impl FnOnce() -> Result<(), E>,
    ) -> Result<(), E> {
        let snapshot = self.items.clone();
        let prior_focus = self.focus.clone();

        mutate(&mut self.items);
        self.normalize_focus();

        match remote() {
            Ok(()) => Ok(()),
            Err(err) => {
                self.items = snapshot;
                self.focus = match prior_focus {
                    Some(key) if self.contains(&key) => Some(key),
                    _ => self.items.first().map(Keyed::key),
                };
                Err(err)
            }
        }
    }

    fn normalize_focus(&mut self) {
        let valid = self
            .focus
            .as_ref()
            .is_some_and(|key| self.contains(key));
        if !valid {
            self.focus = self.items.first().map(Keyed::key);
        }
    }
}

mod keyed_impls {
    use super::Keyed;
    use crate::model::asset::Sku;
    use crate::model::matrix::{Matrix, MatrixId};
    use crate::model::node::{Node, NodeId};
    use crate::model::report::{EliteRow, GhostAsset, InfrastructureGap, MonetizationGap};

    impl Keyed for Node {
        type Key = NodeId;

        fn key(&self) -> NodeId {
            self.uuid
        }
    }

    impl Keyed for Matrix {
        type Key = MatrixId;

        fn key(&self) -> MatrixId {
            self.uuid
        }
    }

    impl Keyed for MonetizationGap {
        type Key = Sku;

        fn key(&self) -> Sku {
            self.sku.clone()
        }
    }

    impl Keyed for InfrastructureGap {
        type Key = Sku;

        fn key(&self) -> Sku {
            self.sku.clone()
        }
    }

    impl Keyed for GhostAsset {
        type Key = Sku;

        fn key(&self) -> Sku {
            self.sku.clone()
        }
    }

    impl Keyed for EliteRow {
        type Key = Sku;

        fn key(&self) -> Sku {
            self.sku.clone()
        }
    }
}
