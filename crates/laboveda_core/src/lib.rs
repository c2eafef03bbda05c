//! Core domain logic for the LaBoveda asset command console.
//! This crate is the single source of truth for console invariants:
//! the optimistic mutation protocol, the selection model and the matrix
//! scope, over a SQLite-backed store.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::asset::{
    is_well_formed_link, Asset, AssetStatus, AssetValidationError, RarityTier, Sku,
};
pub use model::ingestion::{CycleId, CycleStatus, IngestionCycle};
pub use model::matrix::{Matrix, MatrixId, MatrixKind, MatrixValidationError, NewMatrix};
pub use model::node::{Node, NodeId};
pub use model::report::{
    ConversionAlert, DustCandidate, DustRecommendation, EliteRow, EliteSort, EliteSortField,
    GhostAsset, GlobalKpis, InfraIssue, InfrastructureGap, MissingField, MonetizationGap,
    RevenueImpact, SortDirection, TrafficTrend, ViewCounts, VoidAsset,
};
pub use repo::asset_repo::{AssetPatch, AssetRepository, SqliteAssetRepository};
pub use repo::fault::{FaultInjectedAssets, FaultInjectedMatrices, FaultInjectedNodes, FaultPlan};
pub use repo::matrix_repo::{MatrixRepository, SqliteMatrixRepository};
pub use repo::node_repo::{NodeRepository, SqliteNodeRepository};
pub use repo::report_repo::{ReportRepository, SqliteReportRepository};
pub use repo::{StoreError, StoreResult};
pub use service::defense_service::{
    DefenseServiceError, GhostService, HemorrhageService, InfraService,
};
pub use service::elite_service::EliteService;
pub use service::feed::{EventFeed, FeedEntry, FeedLevel};
pub use service::matrix_service::{MatrixService, MatrixServiceError};
pub use service::mirror::{Keyed, Mirror};
pub use service::scope::MatrixScope;
pub use service::selection::Selection;
pub use service::void_service::{VoidService, VoidServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
