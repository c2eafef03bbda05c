//! Ingestion cycle log model.
//!
//! The ingestion process itself is external; this core only reads the most
//! recent cycle for the system heartbeat display.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for an ingestion cycle.
pub type CycleId = Uuid;

/// Lifecycle state of one synchronization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CycleStatus {
    Running,
    Completed,
    Failed,
}

impl CycleStatus {
    pub fn as_db_str(self) -> &'static str {
        match self {
            Self::Running => "RUNNING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        }
    }

    pub fn from_db_str(value: &str) -> Option<Self> {
        match value {
            "RUNNING" => Some(Self::Running),
            "COMPLETED" => Some(Self::Completed),
            "FAILED" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// One logged data-synchronization run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionCycle {
    pub uuid: CycleId,
    pub started_at: i64,
    pub ended_at: Option<i64>,
    pub status: CycleStatus,
    pub records_processed: i64,
    pub log_summary: Option<String>,
}
