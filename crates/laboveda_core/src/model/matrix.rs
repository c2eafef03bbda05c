//! Matrix (brand) domain model.
//!
//! # Responsibility
//! - Define the top-level grouping entity that owns assets.
//! - Validate creation requests before they reach the registry.
//!
//! # Invariants
//! - `code` is a unique short reference code enforced by the store.
//! - Aggregate counters are derived/read-only from the consoles' view.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a matrix.
pub type MatrixId = Uuid;

/// Matrix classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatrixKind {
    Primary,
    Secondary,
}

impl MatrixKind {
    pub fn as_db_str(self) -> &'static str {
        match self {
            Self::Primary => "PRIMARY",
            Self::Secondary => "SECONDARY",
        }
    }

    pub fn from_db_str(value: &str) -> Option<Self> {
        match value {
            "PRIMARY" => Some(Self::Primary),
            "SECONDARY" => Some(Self::Secondary),
            _ => None,
        }
    }
}

/// Validation failure for matrix creation input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatrixValidationError {
    /// Reference code is blank after trim.
    BlankCode,
    /// Display name is blank after trim.
    BlankName,
}

impl Display for MatrixValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankCode => write!(f, "matrix code must not be blank"),
            Self::BlankName => write!(f, "matrix name must not be blank"),
        }
    }
}

impl Error for MatrixValidationError {}

/// Creation request collected from the registry console form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMatrix {
    pub code: String,
    pub name: String,
    pub kind: MatrixKind,
}

impl NewMatrix {
    pub fn validate(&self) -> Result<(), MatrixValidationError> {
        if self.code.trim().is_empty() {
            return Err(MatrixValidationError::BlankCode);
        }
        if self.name.trim().is_empty() {
            return Err(MatrixValidationError::BlankName);
        }
        Ok(())
    }
}

/// Canonical matrix record (Marca).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub uuid: MatrixId,
    /// Internal reference code, unique across the registry.
    pub code: String,
    pub name: String,
    pub kind: MatrixKind,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    /// Derived counter, owned by the store.
    pub total_assets_count: i64,
    /// Derived score, owned by the store.
    pub efficiency_score: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Matrix {
    /// Materializes a registry row from a validated creation request.
    ///
    /// The identity is generated client-side so optimistic registry
    /// insertion can reference the row before the store confirms it.
    pub fn from_draft(draft: &NewMatrix) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            code: draft.code.clone(),
            name: draft.name.clone(),
            kind: draft.kind,
            description: None,
            logo_url: None,
            total_assets_count: 0,
            efficiency_score: 0.0,
            created_at: 0,
            updated_at: 0,
        }
    }

    /// Checks registry invariants. Write paths must call this before SQL.
    pub fn validate(&self) -> Result<(), MatrixValidationError> {
        if self.code.trim().is_empty() {
            return Err(MatrixValidationError::BlankCode);
        }
        if self.name.trim().is_empty() {
            return Err(MatrixValidationError::BlankName);
        }
        Ok(())
    }
}
