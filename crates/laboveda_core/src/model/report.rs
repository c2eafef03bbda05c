//! Read-only radar/analytics report rows.
//!
//! # Responsibility
//! - Define one typed row per aggregated store view.
//! - Keep sortable/filterable fields as closed enumerations so invalid
//!   field references fail at compile time, not at query time.
//!
//! # Invariants
//! - Every row carries `sku` and `matrix_id` so scope filtering works
//!   uniformly across consoles.

use crate::model::asset::{RarityTier, Sku};
use crate::model::matrix::MatrixId;
use serde::{Deserialize, Serialize};

/// Which asset field blocks monetization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MissingField {
    Link,
    Price,
    Availability,
}

impl MissingField {
    pub fn from_db_str(value: &str) -> Option<Self> {
        match value {
            "LINK" => Some(Self::Link),
            "PRICE" => Some(Self::Price),
            "AVAILABILITY" => Some(Self::Availability),
            _ => None,
        }
    }
}

/// Estimated revenue impact bucket for a monetization gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RevenueImpact {
    High,
    Medium,
    Low,
}

impl RevenueImpact {
    pub fn from_db_str(value: &str) -> Option<Self> {
        match value {
            "HIGH" => Some(Self::High),
            "MEDIUM" => Some(Self::Medium),
            "LOW" => Some(Self::Low),
            _ => None,
        }
    }
}

/// Structural defect category for an infrastructure gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InfraIssue {
    /// Unreachable under a SKU primary key; kept for view parity.
    MissingSku,
    NoDescription,
    BrokenImage,
}

impl InfraIssue {
    pub fn from_db_str(value: &str) -> Option<Self> {
        match value {
            "MISSING_SKU" => Some(Self::MissingSku),
            "NO_DESCRIPTION" => Some(Self::NoDescription),
            "BROKEN_IMAGE" => Some(Self::BrokenImage),
            _ => None,
        }
    }
}

/// Cleanup recommendation for low-score assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DustRecommendation {
    Purge,
    Archive,
}

impl DustRecommendation {
    pub fn from_db_str(value: &str) -> Option<Self> {
        match value {
            "PURGE" => Some(Self::Purge),
            "ARCHIVE" => Some(Self::Archive),
            _ => None,
        }
    }
}

/// Traffic direction indicator for elite analytics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrafficTrend {
    Up,
    Down,
    Stable,
}

impl TrafficTrend {
    pub fn from_db_str(value: &str) -> Option<Self> {
        match value {
            "UP" => Some(Self::Up),
            "DOWN" => Some(Self::Down),
            "STABLE" => Some(Self::Stable),
            _ => None,
        }
    }
}

/// High-value asset missing monetization setup (Hemorrhage radar).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonetizationGap {
    pub sku: Sku,
    pub matrix_id: MatrixId,
    pub asset_name: String,
    pub matrix_name: String,
    pub current_score: i64,
    pub tier: RarityTier,
    pub missing_field: MissingField,
    pub revenue_impact: RevenueImpact,
}

/// Asset with a structural defect (Infrastructure radar).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfrastructureGap {
    pub sku: Sku,
    pub matrix_id: MatrixId,
    pub asset_name: String,
    pub issue: InfraIssue,
    pub detected_at: i64,
    pub days_open: i64,
}

/// Asset with zero linked nodes (Ghosts radar).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GhostAsset {
    pub sku: Sku,
    pub matrix_id: MatrixId,
    pub asset_name: String,
    pub created_at: i64,
    pub days_since_creation: i64,
    pub last_known_activity: Option<i64>,
}

/// Asset with nodes but zero traffic (Void radar).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoidAsset {
    pub sku: Sku,
    pub matrix_id: MatrixId,
    pub asset_name: String,
    pub node_count: i64,
    pub total_impressions: i64,
    pub total_clicks: i64,
    pub dormant_days: i64,
}

/// Low-score purge candidate (Incinerator radar).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DustCandidate {
    pub sku: Sku,
    pub matrix_id: MatrixId,
    pub asset_name: String,
    pub score: i64,
    pub node_count: i64,
    pub recommendation: DustRecommendation,
}

/// High-tier performance row (Elite Vault).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EliteRow {
    pub sku: Sku,
    pub matrix_id: MatrixId,
    pub asset_name: String,
    pub tier: RarityTier,
    pub traffic_score: i64,
    pub revenue_score: i64,
    /// One-decimal precision, computed store-side.
    pub efficiency_index: f64,
    pub trend: TrafficTrend,
}

/// High traffic, zero revenue marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionAlert {
    pub sku: Sku,
}

/// Row counts across the radar views, for the side navigation badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewCounts {
    pub monetization_gaps: i64,
    pub infrastructure_gaps: i64,
    pub ghost_assets: i64,
    pub void_assets: i64,
    pub dust_candidates: i64,
}

/// Global header aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlobalKpis {
    pub total_assets: i64,
    pub total_nodes: i64,
    pub efficiency_avg: f64,
}

/// Sortable columns of the elite analytics view. Closed on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EliteSortField {
    Sku,
    AssetName,
    Tier,
    TrafficScore,
    RevenueScore,
    EfficiencyIndex,
    Trend,
}

/// Sort direction for report reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Complete sort spec passed to the store for elite analytics reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EliteSort {
    pub field: EliteSortField,
    pub direction: SortDirection,
}

impl Default for EliteSort {
    fn default() -> Self {
        Self {
            field: EliteSortField::EfficiencyIndex,
            direction: SortDirection::Descending,
        }
    }
}

impl EliteSort {
    /// Console header-click semantics: a repeated field flips the
    /// direction, a new field resets to descending.
    pub fn toggled(self, field: EliteSortField) -> Self {
        if self.field == field {
            let direction = match self.direction {
                SortDirection::Ascending => SortDirection::Descending,
                SortDirection::Descending => SortDirection::Ascending,
            };
            Self { field, direction }
        } else {
            Self {
                field,
                direction: SortDirection::Descending,
            }
        }
    }
}
