//! Pinterest node domain model.
//!
//! # Responsibility
//! - Define the traffic-source record optionally linked to one asset.
//!
//! # Invariants
//! - Nodes are created by the external ingestion process, never by consoles.
//! - Consoles mutate nodes only by reassignment or incineration.

use crate::model::asset::Sku;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a node.
pub type NodeId = Uuid;

/// Canonical node record (Pin).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub uuid: NodeId,
    /// Orphaned when `None`. Always references a live asset otherwise.
    pub asset_sku: Option<Sku>,
    /// External platform identifier.
    pub pin_id: String,
    pub url: String,
    pub image_url: Option<String>,
    pub impressions: i64,
    pub saves: i64,
    pub outbound_clicks: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Node {
    /// Returns whether this node lacks an asset reference.
    pub fn is_orphaned(&self) -> bool {
        self.asset_sku.is_none()
    }
}
