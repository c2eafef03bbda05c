//! Store contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define the remote-store operations the consoles consume, one trait
//!   per entity family.
//! - Map SQLite constraint failures to semantic store errors.
//!
//! # Invariants
//! - Write paths validate domain records before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Empty id batches never touch the database.

use crate::db::{migrations, DbError};
use crate::model::asset::{AssetValidationError, Sku};
use crate::model::matrix::{MatrixId, MatrixValidationError};
use crate::model::node::NodeId;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod asset_repo;
pub mod fault;
pub mod matrix_repo;
pub mod node_repo;
pub mod report_repo;

pub type StoreResult<T> = Result<T, StoreError>;

/// Semantic store error shared by every repository.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    AssetValidation(AssetValidationError),
    MatrixValidation(MatrixValidationError),
    AssetNotFound(Sku),
    NodeNotFound(NodeId),
    MatrixNotFound(MatrixId),
    DuplicateSku(Sku),
    DuplicateMatrixCode(String),
    /// A node reassignment referenced a SKU the store does not hold.
    ForeignKeyViolation {
        node: NodeId,
        sku: Sku,
    },
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::AssetValidation(err) => write!(f, "{err}"),
            Self::MatrixValidation(err) => write!(f, "{err}"),
            Self::AssetNotFound(sku) => write!(f, "asset not found: {sku}"),
            Self::NodeNotFound(id) => write!(f, "node not found: {id}"),
            Self::MatrixNotFound(id) => write!(f, "matrix not found: {id}"),
            Self::DuplicateSku(sku) => write!(f, "asset sku already registered: {sku}"),
            Self::DuplicateMatrixCode(code) => {
                write!(f, "matrix code already registered: {code}")
            }
            Self::ForeignKeyViolation { node, sku } => {
                write!(f, "node {node} cannot reference unknown asset {sku}")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted store data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "store connection not migrated: expected schema {expected_version}, found {actual_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table: {table}"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column: {table}.{column}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::AssetValidation(err) => Some(err),
            Self::MatrixValidation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<AssetValidationError> for StoreError {
    fn from(value: AssetValidationError) -> Self {
        Self::AssetValidation(value)
    }
}

impl From<MatrixValidationError> for StoreError {
    fn from(value: MatrixValidationError) -> Self {
        Self::MatrixValidation(value)
    }
}

pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    constraint_message(err).is_some_and(|msg| msg.contains("UNIQUE"))
}

pub(crate) fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    constraint_message(err).is_some_and(|msg| msg.contains("FOREIGN KEY"))
}

fn constraint_message(err: &rusqlite::Error) -> Option<&str> {
    match err {
        rusqlite::Error::SqliteFailure(info, Some(message))
            if info.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Some(message.as_str())
        }
        _ => None,
    }
}

pub(crate) fn parse_uuid(value: &str, context: &str) -> StoreResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| StoreError::InvalidData(format!("invalid uuid value `{value}` in {context}")))
}

/// Rejects connections whose schema does not match this binary.
pub(crate) fn ensure_schema_version(conn: &Connection) -> StoreResult<()> {
    let actual: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let expected = migrations::latest_version();
    if actual != expected {
        return Err(StoreError::UninitializedConnection {
            expected_version: expected,
            actual_version: actual,
        });
    }
    Ok(())
}

/// Verifies each required table and its columns exist on the connection.
pub(crate) fn ensure_tables(
    conn: &Connection,
    required: &[(&'static str, &[&'static str])],
) -> StoreResult<()> {
    for &(table, columns) in required {
        if !table_exists(conn, table)? {
            return Err(StoreError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(StoreError::MissingRequiredColumn { table, column });
            }
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> StoreResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type IN ('table', 'view') AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> StoreResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
