//! Void console: the orphan-node assignment terminal.
//!
//! # Responsibility
//! - Own the orphan-pool mirror, its focus pointer and the multi-select.
//! - Run reassignment and incineration under the optimistic protocol.
//!
//! # Invariants
//! - An empty selection batch never reaches the store.
//! - The selection is cleared after every attempted batch mutation,
//!   success or failure.
//! - Remote failure restores the mirror and focus exactly.

use crate::model::asset::{Asset, Sku};
use crate::model::node::{Node, NodeId};
use crate::repo::asset_repo::AssetRepository;
use crate::repo::node_repo::NodeRepository;
use crate::repo::{StoreError, StoreResult};
use crate::service::feed::{EventFeed, FeedLevel};
use crate::service::mirror::Mirror;
use crate::service::scope::MatrixScope;
use crate::service::selection::Selection;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Minimum significant characters before a silo search hits the store.
const SILO_SEARCH_MIN_CHARS: usize = 2;

/// Errors from void console operations.
#[derive(Debug)]
pub enum VoidServiceError {
    /// No node is focused to link.
    NoFocusedNode,
    /// No silo asset has been targeted for the link.
    NoSiloTargeted,
    /// Store-level failure; local state has already been rolled back.
    Store(StoreError),
}

impl Display for VoidServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoFocusedNode => write!(f, "no node focused for linking"),
            Self::NoSiloTargeted => write!(f, "no silo asset targeted"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for VoidServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for VoidServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Orphan-node console service.
pub struct VoidService<N: NodeRepository, A: AssetRepository> {
    nodes: N,
    assets: A,
    mirror: Mirror<Node>,
    selection: Selection<NodeId>,
    silo: Option<Asset>,
    synced_generation: Option<u64>,
}

impl<N: NodeRepository, A: AssetRepository> VoidService<N, A> {
    pub fn new(nodes: N, assets: A) -> Self {
        Self {
            nodes,
            assets,
            mirror: Mirror::new(),
            selection: Selection::new(),
            silo: None,
            synced_generation: None,
        }
    }

    /// Re-fetches the orphan pool when the scope moved since the last
    /// fetch. Orphans carry no matrix lineage, so the scope only triggers
    /// the re-read; the read itself is unscoped. Returns whether a fetch
    /// ran.
    pub fn sync(&mut self, scope: &MatrixScope) -> StoreResult<bool> {
        if self.synced_generation == Some(scope.generation()) {
            return Ok(false);
        }
        let orphans = self.nodes.list_orphaned(None)?;
        info!(
            "event=orphans_sync module=void status=ok count={}",
            orphans.len()
        );
        self.mirror.replace_all(orphans);
        self.selection.clear();
        self.synced_generation = Some(scope.generation());
        Ok(true)
    }

    pub fn orphans(&self) -> &[Node] {
        self.mirror.items()
    }

    pub fn focused(&self) -> Option<&Node> {
        self.mirror.focused()
    }

    pub fn focus(&mut self, id: &NodeId) -> bool {
        self.mirror.set_focus(id)
    }

    pub fn selection(&self) -> &Selection<NodeId> {
        &self.selection
    }

    pub fn toggle(&mut self, id: NodeId) {
        self.selection.toggle(id);
    }

    /// Shift-style range extension against the current orphan order.
    pub fn extend_range(&mut self, id: NodeId) {
        let order = self.mirror.keys();
        self.selection.extend_range(id, &order);
    }

    pub fn start_drag(&mut self, id: &NodeId) {
        self.selection.start_drag(id);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Bounded asset search for the silo target. Queries shorter than two
    /// significant characters short-circuit to empty without a store call.
    pub fn search_silo(&self, query: &str) -> StoreResult<Vec<Asset>> {
        if query.trim().chars().count() < SILO_SEARCH_MIN_CHARS {
            return Ok(Vec::new());
        }
        self.assets.search_assets(query, None)
    }

    pub fn target_silo(&mut self, asset: Asset) {
        self.silo = Some(asset);
    }

    pub fn clear_silo(&mut self) {
        self.silo = None;
    }

    pub fn silo(&self) -> Option<&Asset> {
        self.silo.as_ref()
    }

    /// Links the focused node to the targeted silo. The silo target is
    /// consumed on attempt, matching the console's reset-on-execute.
    pub fn link_focused(&mut self, feed: &mut EventFeed) -> Result<(), VoidServiceError> {
        let node_id = *self
            .mirror
            .focus_key()
            .ok_or(VoidServiceError::NoFocusedNode)?;
        let silo = self.silo.take().ok_or(VoidServiceError::NoSiloTargeted)?;
        let sku: Sku = silo.sku;

        let nodes = &self.nodes;
        let result = self.mirror.apply_optimistic(
            |items| items.retain(|node| node.uuid != node_id),
            || nodes.assign_nodes(&[node_id], &sku),
        );

        match result {
            Ok(()) => {
                info!("event=node_link module=void status=ok node={node_id} sku={sku}");
                feed.push(
                    FeedLevel::Success,
                    format!("NEURAL LINK ESTABLISHED: {node_id} -> {sku}"),
                );
                Ok(())
            }
            Err(err) => {
                error!("event=node_link module=void status=error node={node_id} sku={sku} error={err}");
                feed.push(
                    FeedLevel::Error,
                    "NEURAL LINK FAILED: TIMELINE REVERTED".to_string(),
                );
                Err(err.into())
            }
        }
    }

    /// Drops the current selection onto a silo. Returns the batch size.
    pub fn assign_selection(
        &mut self,
        silo_sku: &str,
        feed: &mut EventFeed,
    ) -> Result<usize, VoidServiceError> {
        let order = self.mirror.keys();
        let batch = self.selection.batch(&order);
        self.selection.clear();
        if batch.is_empty() {
            return Ok(0);
        }

        let nodes = &self.nodes;
        let result = self.mirror.apply_optimistic(
            |items| items.retain(|node| !batch.contains(&node.uuid)),
            || nodes.assign_nodes(&batch, silo_sku),
        );

        match result {
            Ok(()) => {
                info!(
                    "event=node_assign module=void status=ok count={} sku={silo_sku}",
                    batch.len()
                );
                feed.push(
                    FeedLevel::Success,
                    format!("{} NODES REASSIGNED TO {silo_sku}", batch.len()),
                );
                Ok(batch.len())
            }
            Err(err) => {
                error!(
                    "event=node_assign module=void status=error count={} sku={silo_sku} error={err}",
                    batch.len()
                );
                feed.push(
                    FeedLevel::Error,
                    format!("REASSIGNMENT TO {silo_sku} FAILED: TIMELINE REVERTED"),
                );
                Err(err.into())
            }
        }
    }

    /// Hard-deletes the current selection. Returns the batch size.
    pub fn incinerate_selection(
        &mut self,
        feed: &mut EventFeed,
    ) -> Result<usize, VoidServiceError> {
        let order = self.mirror.keys();
        let batch = self.selection.batch(&order);
        self.selection.clear();
        if batch.is_empty() {
            return Ok(0);
        }

        let nodes = &self.nodes;
        let result = self.mirror.apply_optimistic(
            |items| items.retain(|node| !batch.contains(&node.uuid)),
            || nodes.delete_nodes(&batch),
        );

        match result {
            Ok(()) => {
                info!(
                    "event=node_incinerate module=void status=ok count={}",
                    batch.len()
                );
                feed.push(
                    FeedLevel::Warning,
                    format!("{} NODES INCINERATED", batch.len()),
                );
                Ok(batch.len())
            }
            Err(err) => {
                error!(
                    "event=node_incinerate module=void status=error count={} error={err}",
                    batch.len()
                );
                feed.push(
                    FeedLevel::Error,
                    "INCINERATION FAILED: TIMELINE REVERTED".to_string(),
                );
                Err(err.into())
            }
        }
    }
}
