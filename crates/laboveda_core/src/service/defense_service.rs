//! Defense consoles: Hemorrhage, Infrastructure and Ghosts.
//!
//! # Responsibility
//! - Surface the monetization/structural/ghost radars and run their
//!   repair actions under the optimistic protocol.
//!
//! # Invariants
//! - Link values are validated locally; a rejected value never produces
//!   a store call.
//! - A repaired or purged row leaves its radar optimistically and comes
//!   back on remote failure.

use crate::model::asset::{is_well_formed_link, Sku};
use crate::model::report::{GhostAsset, InfrastructureGap, MonetizationGap};
use crate::repo::asset_repo::{AssetPatch, AssetRepository};
use crate::repo::report_repo::ReportRepository;
use crate::repo::{StoreError, StoreResult};
use crate::service::feed::{EventFeed, FeedLevel};
use crate::service::mirror::Mirror;
use crate::service::scope::MatrixScope;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from defense console operations.
#[derive(Debug)]
pub enum DefenseServiceError {
    /// Link value rejected locally; no store call was made.
    InvalidLink(String),
    /// Store-level failure; local state has already been rolled back.
    Store(StoreError),
}

impl Display for DefenseServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLink(value) => write!(f, "rejected link value: `{value}`"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DefenseServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::InvalidLink(_) => None,
        }
    }
}

impl From<StoreError> for DefenseServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Hemorrhage console: high-value assets leaking revenue.
pub struct HemorrhageService<R: ReportRepository, A: AssetRepository> {
    reports: R,
    assets: A,
    mirror: Mirror<MonetizationGap>,
    synced_generation: Option<u64>,
}

impl<R: ReportRepository, A: AssetRepository> HemorrhageService<R, A> {
    pub fn new(reports: R, assets: A) -> Self {
        Self {
            reports,
            assets,
            mirror: Mirror::new(),
            synced_generation: None,
        }
    }

    /// Re-fetches the radar when the scope moved. Returns whether a fetch
    /// ran.
    pub fn sync(&mut self, scope: &MatrixScope) -> StoreResult<bool> {
        if self.synced_generation == Some(scope.generation()) {
            return Ok(false);
        }
        let rows = self.reports.monetization_gaps(scope.filter())?;
        info!(
            "event=radar_sync module=hemorrhage status=ok count={}",
            rows.len()
        );
        self.mirror.replace_all(rows);
        self.synced_generation = Some(scope.generation());
        Ok(true)
    }

    pub fn gaps(&self) -> &[MonetizationGap] {
        self.mirror.items()
    }

    /// Injects a monetization link. The repaired row leaves the radar
    /// optimistically; remote failure brings it back.
    pub fn patch_link(
        &mut self,
        sku: &str,
        value: &str,
        feed: &mut EventFeed,
    ) -> Result<(), DefenseServiceError> {
        let trimmed = value.trim();
        if trimmed.is_empty() || !is_well_formed_link(trimmed) {
            warn!("event=link_patch module=hemorrhage status=rejected sku={sku}");
            feed.push(
                FeedLevel::Error,
                "VALIDATION FAILURE: MALFORMED MONETIZATION LINK".to_string(),
            );
            return Err(DefenseServiceError::InvalidLink(value.to_string()));
        }

        let sku_key: Sku = sku.to_string();
        let patch = AssetPatch::MonetizationLink(trimmed.to_string());
        let assets = &self.assets;
        let result = self.mirror.apply_optimistic(
            |items| items.retain(|row| row.sku != sku_key),
            || assets.patch_asset(&sku_key, &patch),
        );

        match result {
            Ok(()) => {
                info!("event=link_patch module=hemorrhage status=ok sku={sku}");
                feed.push(
                    FeedLevel::Success,
                    format!("ASSET {sku} PATCHED. REVENUE STREAM SECURED."),
                );
                Ok(())
            }
            Err(err) => {
                error!("event=link_patch module=hemorrhage status=error sku={sku} error={err}");
                feed.push(
                    FeedLevel::Error,
                    format!("CODE INJECTION FAILED FOR {sku}: TIMELINE REVERTED"),
                );
                Err(err.into())
            }
        }
    }
}

/// Infrastructure console: structural gap repair.
pub struct InfraService<R: ReportRepository, A: AssetRepository> {
    reports: R,
    assets: A,
    mirror: Mirror<InfrastructureGap>,
    synced_generation: Option<u64>,
}

impl<R: ReportRepository, A: AssetRepository> InfraService<R, A> {
    pub fn new(reports: R, assets: A) -> Self {
        Self {
            reports,
            assets,
            mirror: Mirror::new(),
            synced_generation: None,
        }
    }

    /// Re-fetches the radar when the scope moved. Returns whether a fetch
    /// ran.
    pub fn sync(&mut self, scope: &MatrixScope) -> StoreResult<bool> {
        if self.synced_generation == Some(scope.generation()) {
            return Ok(false);
        }
        let rows = self.reports.infrastructure_gaps(scope.filter())?;
        info!(
            "event=radar_sync module=infra status=ok count={}",
            rows.len()
        );
        self.mirror.replace_all(rows);
        self.synced_generation = Some(scope.generation());
        Ok(true)
    }

    pub fn gaps(&self) -> &[InfrastructureGap] {
        self.mirror.items()
    }

    /// Writes a drive link into the asset's description slot. The value
    /// must be a well-formed google.com URL.
    pub fn repair_drive(
        &mut self,
        sku: &str,
        value: &str,
        feed: &mut EventFeed,
    ) -> Result<(), DefenseServiceError> {
        let trimmed = value.trim();
        if trimmed.is_empty() || !is_well_formed_link(trimmed) || !trimmed.contains("google.com") {
            warn!("event=drive_repair module=infra status=rejected sku={sku}");
            feed.push(
                FeedLevel::Error,
                "SYNTAX ERROR: INVALID GOOGLE URL".to_string(),
            );
            return Err(DefenseServiceError::InvalidLink(value.to_string()));
        }

        let sku_key: Sku = sku.to_string();
        let patch = AssetPatch::DriveLink(trimmed.to_string());
        let assets = &self.assets;
        let result = self.mirror.apply_optimistic(
            |items| items.retain(|row| row.sku != sku_key),
            || assets.patch_asset(&sku_key, &patch),
        );

        match result {
            Ok(()) => {
                info!("event=drive_repair module=infra status=ok sku={sku}");
                feed.push(
                    FeedLevel::Success,
                    format!("INFRASTRUCTURE GAP REPAIRED FOR {sku}"),
                );
                Ok(())
            }
            Err(err) => {
                error!("event=drive_repair module=infra status=error sku={sku} error={err}");
                feed.push(
                    FeedLevel::Error,
                    format!("DRIVE WRITE FAILURE FOR {sku}: TIMELINE REVERTED"),
                );
                Err(err.into())
            }
        }
    }
}

/// Ghosts console: assets with no nodes attached.
pub struct GhostService<R: ReportRepository, A: AssetRepository> {
    reports: R,
    assets: A,
    mirror: Mirror<GhostAsset>,
    synced_generation: Option<u64>,
}

impl<R: ReportRepository, A: AssetRepository> GhostService<R, A> {
    pub fn new(reports: R, assets: A) -> Self {
        Self {
            reports,
            assets,
            mirror: Mirror::new(),
            synced_generation: None,
        }
    }

    /// Re-fetches the radar when the scope moved. Returns whether a fetch
    /// ran.
    pub fn sync(&mut self, scope: &MatrixScope) -> StoreResult<bool> {
        if self.synced_generation == Some(scope.generation()) {
            return Ok(false);
        }
        let rows = self.reports.ghost_assets(scope.filter())?;
        info!(
            "event=radar_sync module=ghosts status=ok count={}",
            rows.len()
        );
        self.mirror.replace_all(rows);
        self.synced_generation = Some(scope.generation());
        Ok(true)
    }

    pub fn ghosts(&self) -> &[GhostAsset] {
        self.mirror.items()
    }

    /// Average days since creation across the listed ghosts.
    pub fn average_dormancy_days(&self) -> i64 {
        let ghosts = self.mirror.items();
        if ghosts.is_empty() {
            return 0;
        }
        let total: i64 = ghosts.iter().map(|g| g.days_since_creation).sum();
        total / ghosts.len() as i64
    }

    /// Permanently erases a ghost asset. The row leaves the radar
    /// optimistically; remote failure brings it back.
    pub fn exorcise(&mut self, sku: &str, feed: &mut EventFeed) -> Result<(), DefenseServiceError> {
        let sku_key: Sku = sku.to_string();
        let assets = &self.assets;
        let result = self.mirror.apply_optimistic(
            |items| items.retain(|row| row.sku != sku_key),
            || assets.purge_asset(&sku_key),
        );

        match result {
            Ok(()) => {
                info!("event=asset_purge module=ghosts status=ok sku={sku}");
                feed.push(
                    FeedLevel::Warning,
                    format!("GHOST PROTOCOL: ASSET {sku} PERMANENTLY ERASED"),
                );
                Ok(())
            }
            Err(err) => {
                error!("event=asset_purge module=ghosts status=error sku={sku} error={err}");
                feed.push(
                    FeedLevel::Error,
                    format!("FAILED TO EXORCISE {sku}: TIMELINE REVERTED"),
                );
                Err(err.into())
            }
        }
    }
}
