//! Matrix scope: the view filter every list-fetch must honor.
//!
//! # Responsibility
//! - Hold the known matrix registry and the currently scoped matrix.
//! - Tell consumers when their last fetch went stale.
//!
//! # Invariants
//! - Selecting an id that does not resolve against the registry is a
//!   no-op; the previous selection is retained.
//! - `generation` moves only on effective changes, so consumers re-issue
//!   exactly one read per change and never cache across changes.

use crate::model::matrix::{Matrix, MatrixId};

/// Single selected-scope value shared by every console.
#[derive(Debug, Clone, Default)]
pub struct MatrixScope {
    matrices: Vec<Matrix>,
    selected: Option<MatrixId>,
    generation: u64,
}

impl MatrixScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the known registry. A selection that no longer resolves
    /// falls back to "all".
    pub fn load(&mut self, matrices: Vec<Matrix>) {
        self.matrices = matrices;
        if let Some(selected) = self.selected {
            if !self.matrices.iter().any(|m| m.uuid == selected) {
                self.selected = None;
                self.generation += 1;
            }
        }
    }

    pub fn matrices(&self) -> &[Matrix] {
        &self.matrices
    }

    /// Currently scoped matrix, `None` meaning "all".
    pub fn selected(&self) -> Option<&Matrix> {
        self.selected
            .and_then(|id| self.matrices.iter().find(|m| m.uuid == id))
    }

    /// Scope value to pass into store reads.
    pub fn filter(&self) -> Option<&MatrixId> {
        self.selected.as_ref()
    }

    /// Bumps on every effective scope change.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Selects a matrix (`Some`) or "all" (`None`). Returns whether the
    /// scope actually changed. Unresolvable ids are ignored.
    pub fn select(&mut self, target: Option<MatrixId>) -> bool {
        match target {
            None => {
                if self.selected.is_none() {
                    return false;
                }
                self.selected = None;
            }
            Some(id) => {
                if self.selected == Some(id) {
                    return false;
                }
                if !self.matrices.iter().any(|m| m.uuid == id) {
                    return false;
                }
                self.selected = Some(id);
            }
        }
        self.generation += 1;
        true
    }
}
