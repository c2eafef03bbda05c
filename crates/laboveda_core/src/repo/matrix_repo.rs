//! Matrix registry contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide the registry read/create operations behind the ontology
//!   console and the scope selector.
//!
//! # Invariants
//! - Listing order is deterministic: `code ASC`.
//! - Duplicate reference codes surface as `DuplicateMatrixCode`, never as
//!   raw SQLite errors.

use crate::model::matrix::{Matrix, MatrixKind};
use crate::repo::{
    ensure_schema_version, ensure_tables, is_unique_violation, parse_uuid, StoreError, StoreResult,
};
use rusqlite::{params, Connection, Row};

const MATRIX_SELECT_SQL: &str = "SELECT
    uuid,
    code,
    name,
    kind,
    description,
    logo_url,
    total_assets_count,
    efficiency_score,
    created_at,
    updated_at
FROM matrix_registry";

/// Repository interface for the matrix registry.
pub trait MatrixRepository {
    /// Lists every registered matrix, ordered by reference code.
    fn list_matrices(&self) -> StoreResult<Vec<Matrix>>;
    /// Registers one matrix. Fails on duplicate reference codes.
    fn create_matrix(&self, matrix: &Matrix) -> StoreResult<()>;
}

/// SQLite-backed matrix registry.
pub struct SqliteMatrixRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMatrixRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_schema_version(conn)?;
        ensure_tables(
            conn,
            &[(
                "matrix_registry",
                &["uuid", "code", "name", "kind", "total_assets_count", "efficiency_score"],
            )],
        )?;
        Ok(Self { conn })
    }
}

impl MatrixRepository for SqliteMatrixRepository<'_> {
    fn list_matrices(&self) -> StoreResult<Vec<Matrix>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MATRIX_SELECT_SQL} ORDER BY code ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut matrices = Vec::new();
        while let Some(row) = rows.next()? {
            matrices.push(parse_matrix_row(row)?);
        }
        Ok(matrices)
    }

    fn create_matrix(&self, matrix: &Matrix) -> StoreResult<()> {
        matrix.validate()?;

        self.conn
            .execute(
                "INSERT INTO matrix_registry (
                    uuid,
                    code,
                    name,
                    kind,
                    description,
                    logo_url,
                    total_assets_count,
                    efficiency_score
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
                params![
                    matrix.uuid.to_string(),
                    matrix.code.as_str(),
                    matrix.name.as_str(),
                    matrix.kind.as_db_str(),
                    matrix.description.as_deref(),
                    matrix.logo_url.as_deref(),
                    matrix.total_assets_count,
                    matrix.efficiency_score,
                ],
            )
            .map_err(|err| {
                if is_unique_violation(&err) {
                    StoreError::DuplicateMatrixCode(matrix.code.clone())
                } else {
                    err.into()
                }
            })?;

        Ok(())
    }
}

fn parse_matrix_row(row: &Row<'_>) -> StoreResult<Matrix> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = parse_uuid(&uuid_text, "matrix_registry.uuid")?;

    let kind_text: String = row.get("kind")?;
    let kind = MatrixKind::from_db_str(&kind_text).ok_or_else(|| {
        StoreError::InvalidData(format!(
            "invalid matrix kind `{kind_text}` in matrix_registry.kind"
        ))
    })?;

    Ok(Matrix {
        uuid,
        code: row.get("code")?,
        name: row.get("name")?,
        kind,
        description: row.get("description")?,
        logo_url: row.get("logo_url")?,
        total_assets_count: row.get("total_assets_count")?,
        efficiency_score: row.get("efficiency_score")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
