//! Business asset domain model.
//!
//! # Responsibility
//! - Define the canonical asset record keyed by SKU.
//! - Validate asset fields before any persistence attempt.
//!
//! # Invariants
//! - `sku` is the stable primary key and never reused for another asset.
//! - `tier` ordering is part of the contract: Dust < Common < Uncommon <
//!   Rare < Legendary.
//! - Links, when present, must be well-formed http(s) URLs.

use crate::model::matrix::MatrixId;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable string primary key for business assets.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type Sku = String;

static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://\S+$").expect("valid link regex"));

/// Returns whether a value is an acceptable http(s) link.
pub fn is_well_formed_link(value: &str) -> bool {
    LINK_RE.is_match(value.trim())
}

/// Rarity ladder for assets. The derived `Ord` follows declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RarityTier {
    Dust,
    Common,
    Uncommon,
    Rare,
    Legendary,
}

impl RarityTier {
    /// Canonical DB spelling of this tier.
    pub fn as_db_str(self) -> &'static str {
        match self {
            Self::Dust => "DUST",
            Self::Common => "COMMON",
            Self::Uncommon => "UNCOMMON",
            Self::Rare => "RARE",
            Self::Legendary => "LEGENDARY",
        }
    }

    /// Parses the canonical DB spelling back into a tier.
    pub fn from_db_str(value: &str) -> Option<Self> {
        match value {
            "DUST" => Some(Self::Dust),
            "COMMON" => Some(Self::Common),
            "UNCOMMON" => Some(Self::Uncommon),
            "RARE" => Some(Self::Rare),
            "LEGENDARY" => Some(Self::Legendary),
            _ => None,
        }
    }
}

/// Asset lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetStatus {
    Active,
    Archived,
    Purged,
    Pending,
}

impl AssetStatus {
    pub fn as_db_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Archived => "ARCHIVED",
            Self::Purged => "PURGED",
            Self::Pending => "PENDING",
        }
    }

    pub fn from_db_str(value: &str) -> Option<Self> {
        match value {
            "ACTIVE" => Some(Self::Active),
            "ARCHIVED" => Some(Self::Archived),
            "PURGED" => Some(Self::Purged),
            "PENDING" => Some(Self::Pending),
            _ => None,
        }
    }
}

/// Validation failure raised before an asset reaches persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetValidationError {
    /// SKU is blank after trim.
    BlankSku,
    /// Display name is blank after trim.
    BlankName,
    /// Score must not be negative.
    NegativeScore(i64),
    /// A link field holds a value that is not an http(s) URL.
    MalformedLink {
        field: &'static str,
        value: String,
    },
}

impl Display for AssetValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankSku => write!(f, "asset sku must not be blank"),
            Self::BlankName => write!(f, "asset name must not be blank"),
            Self::NegativeScore(score) => write!(f, "asset score must not be negative: {score}"),
            Self::MalformedLink { field, value } => {
                write!(f, "malformed {field} link: `{value}`")
            }
        }
    }
}

impl Error for AssetValidationError {}

/// Canonical asset record (Producto).
///
/// Timestamps are epoch milliseconds, populated by the store on read;
/// freshly constructed records carry zero until first persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Primary key. Strict string SKU.
    pub sku: Sku,
    /// Owning matrix (brand) reference.
    pub matrix_id: MatrixId,
    pub name: String,
    /// Doubles as the drive-link slot when patched through the infra console.
    pub description: Option<String>,
    pub main_image_url: Option<String>,
    pub tier: RarityTier,
    /// Performance score, 0-1000+.
    pub score: i64,
    pub status: AssetStatus,
    pub monetization_link: Option<String>,
    pub last_ingested_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Asset {
    /// Creates an active asset with default score and tier.
    pub fn new(sku: impl Into<Sku>, matrix_id: MatrixId, name: impl Into<String>) -> Self {
        Self {
            sku: sku.into(),
            matrix_id,
            name: name.into(),
            description: None,
            main_image_url: None,
            tier: RarityTier::Common,
            score: 0,
            status: AssetStatus::Active,
            monetization_link: None,
            last_ingested_at: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    /// Checks field invariants. Write paths must call this before SQL.
    pub fn validate(&self) -> Result<(), AssetValidationError> {
        if self.sku.trim().is_empty() {
            return Err(AssetValidationError::BlankSku);
        }
        if self.name.trim().is_empty() {
            return Err(AssetValidationError::BlankName);
        }
        if self.score < 0 {
            return Err(AssetValidationError::NegativeScore(self.score));
        }
        for (field, value) in [
            ("monetization", self.monetization_link.as_deref()),
            ("image", self.main_image_url.as_deref()),
        ] {
            if let Some(value) = value {
                if !value.is_empty() && !is_well_formed_link(value) {
                    return Err(AssetValidationError::MalformedLink {
                        field,
                        value: value.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Returns whether this asset is visible to tactical consoles.
    pub fn is_active(&self) -> bool {
        self.status == AssetStatus::Active
    }
}
