//! Deterministic fault injection for store write paths.
//!
//! # Responsibility
//! - Let tests force exact success/failure sequences on remote writes
//!   without touching the wrapped repository.
//!
//! # Invariants
//! - Reads always pass through untouched.
//! - A scripted failure is consumed before the inner repository is
//!   reached, so a failed write leaves the store unchanged.

use crate::model::asset::Asset;
use crate::model::matrix::{Matrix, MatrixId};
use crate::model::node::{Node, NodeId};
use crate::repo::asset_repo::{AssetPatch, AssetRepository};
use crate::repo::matrix_repo::MatrixRepository;
use crate::repo::node_repo::NodeRepository;
use crate::repo::{StoreError, StoreResult};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

/// Scripted failure queue shared between a test and its wrappers.
#[derive(Debug, Default)]
pub struct FaultPlan {
    scripted: RefCell<VecDeque<StoreError>>,
    write_attempts: Cell<usize>,
}

impl FaultPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the next intercepted write to fail with `error`.
    pub fn fail_next(&self, error: StoreError) {
        self.scripted.borrow_mut().push_back(error);
    }

    /// Number of writes that reached the seam, failed or not.
    pub fn write_attempts(&self) -> usize {
        self.write_attempts.get()
    }

    /// Returns whether every scripted failure has been consumed.
    pub fn is_drained(&self) -> bool {
        self.scripted.borrow().is_empty()
    }

    fn intercept(&self) -> StoreResult<()> {
        self.write_attempts.set(self.write_attempts.get() + 1);
        match self.scripted.borrow_mut().pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Node repository decorator consuming a [`FaultPlan`] on writes.
pub struct FaultInjectedNodes<'p, R> {
    inner: R,
    plan: &'p FaultPlan,
}

impl<'p, R> FaultInjectedNodes<'p, R> {
    pub fn new(inner: R, plan: &'p FaultPlan) -> Self {
        Self { inner, plan }
    }
}

impl<R: NodeRepository> NodeRepository for FaultInjectedNodes<'_, R> {
    fn list_orphaned(&self, limit: Option<u32>) -> StoreResult<Vec<Node>> {
        self.inner.list_orphaned(limit)
    }

    fn assign_nodes(&self, ids: &[NodeId], sku: &str) -> StoreResult<()> {
        self.plan.intercept()?;
        self.inner.assign_nodes(ids, sku)
    }

    fn delete_nodes(&self, ids: &[NodeId]) -> StoreResult<()> {
        self.plan.intercept()?;
        self.inner.delete_nodes(ids)
    }
}

/// Asset repository decorator consuming a [`FaultPlan`] on writes.
pub struct FaultInjectedAssets<'p, R> {
    inner: R,
    plan: &'p FaultPlan,
}

impl<'p, R> FaultInjectedAssets<'p, R> {
    pub fn new(inner: R, plan: &'p FaultPlan) -> Self {
        Self { inner, plan }
    }
}

impl<R: AssetRepository> AssetRepository for FaultInjectedAssets<'_, R> {
    fn create_asset(&self, asset: &Asset) -> StoreResult<()> {
        self.plan.intercept()?;
        self.inner.create_asset(asset)
    }

    fn get_asset(&self, sku: &str) -> StoreResult<Option<Asset>> {
        self.inner.get_asset(sku)
    }

    fn list_active_assets(
        &self,
        scope: Option<&MatrixId>,
        limit: Option<u32>,
    ) -> StoreResult<Vec<Asset>> {
        self.inner.list_active_assets(scope, limit)
    }

    fn search_assets(&self, query: &str, limit: Option<u32>) -> StoreResult<Vec<Asset>> {
        self.inner.search_assets(query, limit)
    }

    fn patch_asset(&self, sku: &str, patch: &AssetPatch) -> StoreResult<()> {
        self.plan.intercept()?;
        self.inner.patch_asset(sku, patch)
    }

    fn purge_asset(&self, sku: &str) -> StoreResult<()> {
        self.plan.intercept()?;
        self.inner.purge_asset(sku)
    }
}

/// Matrix repository decorator consuming a [`FaultPlan`] on writes.
pub struct FaultInjectedMatrices<'p, R> {
    inner: R,
    plan: &'p FaultPlan,
}

impl<'p, R> FaultInjectedMatrices<'p, R> {
    pub fn new(inner: R, plan: &'p FaultPlan) -> Self {
        Self { inner, plan }
    }
}

impl<R: MatrixRepository> MatrixRepository for FaultInjectedMatrices<'_, R> {
    fn list_matrices(&self) -> StoreResult<Vec<Matrix>> {
        self.inner.list_matrices()
    }

    fn create_matrix(&self, matrix: &Matrix) -> StoreResult<()> {
        self.plan.intercept()?;
        self.inner.create_matrix(matrix)
    }
}
