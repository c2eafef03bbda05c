//! Elite Vault console: high-tier performance analytics.
//!
//! # Responsibility
//! - Hold the analytics rows and the conversion-alert set for the vault.
//! - Keep sorting a store concern: header clicks re-issue the read with
//!   the new sort spec instead of re-sorting locally.
//!
//! # Invariants
//! - The sort spec is a closed enumeration; no string field keys.
//! - Rows are never mutated locally; this console is read-only.

use crate::model::asset::Sku;
use crate::model::report::{EliteRow, EliteSort, EliteSortField};
use crate::repo::report_repo::ReportRepository;
use crate::repo::StoreResult;
use crate::service::scope::MatrixScope;
use log::info;
use std::collections::HashSet;

/// Elite analytics console service.
pub struct EliteService<R: ReportRepository> {
    reports: R,
    rows: Vec<EliteRow>,
    alerts: HashSet<Sku>,
    sort: EliteSort,
    synced_generation: Option<u64>,
}

impl<R: ReportRepository> EliteService<R> {
    pub fn new(reports: R) -> Self {
        Self {
            reports,
            rows: Vec::new(),
            alerts: HashSet::new(),
            sort: EliteSort::default(),
            synced_generation: None,
        }
    }

    /// Re-fetches rows and alerts when the scope moved. Returns whether a
    /// fetch ran.
    pub fn sync(&mut self, scope: &MatrixScope) -> StoreResult<bool> {
        if self.synced_generation == Some(scope.generation()) {
            return Ok(false);
        }
        self.refetch(scope)?;
        self.synced_generation = Some(scope.generation());
        Ok(true)
    }

    /// Header-click semantics: repeated field flips direction, new field
    /// resets to descending. Always re-issues the read.
    pub fn toggle_sort(&mut self, field: EliteSortField, scope: &MatrixScope) -> StoreResult<()> {
        self.sort = self.sort.toggled(field);
        self.refetch(scope)
    }

    pub fn rows(&self) -> &[EliteRow] {
        &self.rows
    }

    pub fn sort(&self) -> EliteSort {
        self.sort
    }

    /// Whether the given SKU trips the conversion alert.
    pub fn is_alert(&self, sku: &str) -> bool {
        self.alerts.contains(sku)
    }

    pub fn alert_count(&self) -> usize {
        self.alerts.len()
    }

    fn refetch(&mut self, scope: &MatrixScope) -> StoreResult<()> {
        let rows = self.reports.elite_analytics(scope.filter(), &self.sort)?;
        let alerts = self.reports.conversion_alerts(scope.filter())?;
        info!(
            "event=vault_sync module=elite status=ok rows={} alerts={}",
            rows.len(),
            alerts.len()
        );
        self.rows = rows;
        self.alerts = alerts.into_iter().map(|alert| alert.sku).collect();
        Ok(())
    }
}
