use laboveda_core::{
    Asset, AssetPatch, AssetRepository, ConversionAlert, DustCandidate, EliteRow, EliteSort,
    GhostAsset, GlobalKpis, HemorrhageService, InfrastructureGap, IngestionCycle, Matrix,
    MatrixId, MatrixKind, MatrixScope, MonetizationGap, NewMatrix, ReportRepository, StoreResult,
    ViewCounts, VoidAsset,
};
use std::cell::Cell;
use uuid::Uuid;

fn matrix(code: &str) -> Matrix {
    Matrix::from_draft(&NewMatrix {
        code: code.to_string(),
        name: format!("{code} matrix"),
        kind: MatrixKind::Primary,
    })
}

#[test]
fn select_null_means_all() {
    let m1 = matrix("MX1");
    let mut scope = MatrixScope::new();
    scope.load(vec![m1.clone()]);

    assert!(scope.select(Some(m1.uuid)));
    assert_eq!(scope.selected().map(|m| m.code.as_str()), Some("MX1"));

    assert!(scope.select(None));
    assert!(scope.selected().is_none());
    assert!(scope.filter().is_none());
}

#[test]
fn select_unknown_id_is_a_noop_retaining_previous_selection() {
    let m1 = matrix("MX1");
    let mut scope = MatrixScope::new();
    scope.load(vec![m1.clone()]);
    scope.select(Some(m1.uuid));
    let generation = scope.generation();

    assert!(!scope.select(Some(Uuid::new_v4())));
    assert_eq!(scope.selected().map(|m| m.code.as_str()), Some("MX1"));
    assert_eq!(scope.generation(), generation);
}

#[test]
fn generation_bumps_only_on_effective_changes() {
    let m1 = matrix("MX1");
    let m2 = matrix("MX2");
    let mut scope = MatrixScope::new();
    scope.load(vec![m1.clone(), m2.clone()]);
    let start = scope.generation();

    assert!(!scope.select(None), "already unscoped");
    assert_eq!(scope.generation(), start);

    assert!(scope.select(Some(m1.uuid)));
    assert_eq!(scope.generation(), start + 1);

    assert!(!scope.select(Some(m1.uuid)), "same scope, no change");
    assert_eq!(scope.generation(), start + 1);

    assert!(scope.select(Some(m2.uuid)));
    assert_eq!(scope.generation(), start + 2);
}

#[test]
fn load_resets_a_selection_that_no_longer_resolves() {
    let m1 = matrix("MX1");
    let m2 = matrix("MX2");
    let mut scope = MatrixScope::new();
    scope.load(vec![m1.clone()]);
    scope.select(Some(m1.uuid));
    let generation = scope.generation();

    scope.load(vec![m2.clone()]);

    assert!(scope.selected().is_none());
    assert_eq!(scope.generation(), generation + 1);
}

/// Report stub that counts monetization reads.
#[derive(Default)]
struct CountingReports {
    monetization_reads: Cell<usize>,
}

impl ReportRepository for &CountingReports {
    fn monetization_gaps(&self, _scope: Option<&MatrixId>) -> StoreResult<Vec<MonetizationGap>> {
        self.monetization_reads.set(self.monetization_reads.get() + 1);
        Ok(Vec::new())
    }

    fn infrastructure_gaps(
        &self,
        _scope: Option<&MatrixId>,
    ) -> StoreResult<Vec<InfrastructureGap>> {
        Ok(Vec::new())
    }

    fn ghost_assets(&self, _scope: Option<&MatrixId>) -> StoreResult<Vec<GhostAsset>> {
        Ok(Vec::new())
    }

    fn void_assets(&self, _scope: Option<&MatrixId>) -> StoreResult<Vec<VoidAsset>> {
        Ok(Vec::new())
    }

    fn dust_candidates(&self, _scope: Option<&MatrixId>) -> StoreResult<Vec<DustCandidate>> {
        Ok(Vec::new())
    }

    fn elite_analytics(
        &self,
        _scope: Option<&MatrixId>,
        _sort: &EliteSort,
    ) -> StoreResult<Vec<EliteRow>> {
        Ok(Vec::new())
    }

    fn conversion_alerts(&self, _scope: Option<&MatrixId>) -> StoreResult<Vec<ConversionAlert>> {
        Ok(Vec::new())
    }

    fn view_counts(&self) -> StoreResult<ViewCounts> {
        Ok(ViewCounts::default())
    }

    fn latest_cycle(&self) -> StoreResult<Option<IngestionCycle>> {
        Ok(None)
    }

    fn global_kpis(&self) -> StoreResult<GlobalKpis> {
        Ok(GlobalKpis::default())
    }
}

/// Asset stub; the scope tests never reach asset writes.
struct NoopAssets;

impl AssetRepository for NoopAssets {
    fn create_asset(&self, _asset: &Asset) -> StoreResult<()> {
        Ok(())
    }

    fn get_asset(&self, _sku: &str) -> StoreResult<Option<Asset>> {
        Ok(None)
    }

    fn list_active_assets(
        &self,
        _scope: Option<&MatrixId>,
        _limit: Option<u32>,
    ) -> StoreResult<Vec<Asset>> {
        Ok(Vec::new())
    }

    fn search_assets(&self, _query: &str, _limit: Option<u32>) -> StoreResult<Vec<Asset>> {
        Ok(Vec::new())
    }

    fn patch_asset(&self, _sku: &str, _patch: &AssetPatch) -> StoreResult<()> {
        Ok(())
    }

    fn purge_asset(&self, _sku: &str) -> StoreResult<()> {
        Ok(())
    }
}

#[test]
fn consumers_reissue_reads_exactly_once_per_scope_change() {
    let m1 = matrix("MX1");
    let reports = CountingReports::default();
    let mut scope = MatrixScope::new();
    scope.load(vec![m1.clone()]);

    let mut console = HemorrhageService::new(&reports, NoopAssets);

    assert!(console.sync(&scope).unwrap());
    assert_eq!(reports.monetization_reads.get(), 1);

    // Unchanged scope: no re-read, no caching invalidation needed.
    assert!(!console.sync(&scope).unwrap());
    assert!(!console.sync(&scope).unwrap());
    assert_eq!(reports.monetization_reads.get(), 1);

    // Scope change: exactly one fresh read.
    assert!(scope.select(Some(m1.uuid)));
    assert!(console.sync(&scope).unwrap());
    assert_eq!(reports.monetization_reads.get(), 2);

    // Back to "all": another fresh read.
    assert!(scope.select(None));
    assert!(console.sync(&scope).unwrap());
    assert_eq!(reports.monetization_reads.get(), 3);
}
