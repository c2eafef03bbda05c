//! Domain model for the Matrix -> Asset -> Node hierarchy.
//!
//! # Responsibility
//! - Define the canonical records shared by every console projection.
//! - Keep DB string mappings next to the enums they encode.
//!
//! # Invariants
//! - Assets are keyed by SKU; matrices, nodes and cycles by stable UUID.
//! - A node referencing an asset always references a live, non-purged row;
//!   the store re-orphans nodes when their asset is purged.

pub mod asset;
pub mod ingestion;
pub mod matrix;
pub mod node;
pub mod report;
