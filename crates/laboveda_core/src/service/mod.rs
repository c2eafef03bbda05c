//! Console use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into per-console APIs.
//! - Own the optimistic mutation protocol, the selection model and the
//!   matrix scope that every console shares.
//!
//! # Invariants
//! - Every mutating flow snapshots before applying and rolls back on
//!   remote failure. One policy, no exceptions.
//! - A console only mutates its own local mirror; cross-console
//!   synchronization happens by re-fetching from the store.

pub mod defense_service;
pub mod elite_service;
pub mod feed;
pub mod matrix_service;
pub mod mirror;
pub mod scope;
pub mod selection;
pub mod void_service;
