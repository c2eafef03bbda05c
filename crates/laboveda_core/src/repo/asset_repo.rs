//! Asset repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide asset CRUD, bounded search and targeted field patches.
//! - Keep SQL details inside the store persistence boundary.
//!
//! # Invariants
//! - Write paths call `Asset::validate()` before SQL mutations.
//! - Search is case-insensitive over name/SKU substrings, bounded to 20.
//! - Purge is a hard delete; referencing nodes are re-orphaned by the
//!   store's foreign-key action, never left dangling.

use crate::model::asset::{is_well_formed_link, Asset, AssetStatus, AssetValidationError, RarityTier};
use crate::model::matrix::MatrixId;
use crate::repo::{
    ensure_schema_version, ensure_tables, is_foreign_key_violation, is_unique_violation,
    parse_uuid, StoreError, StoreResult,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const ASSET_SELECT_SQL: &str = "SELECT
    sku,
    matrix_id,
    name,
    description,
    main_image_url,
    tier,
    score,
    status,
    monetization_link,
    last_ingested_at,
    created_at,
    updated_at
FROM business_assets";

const LIST_DEFAULT_LIMIT: u32 = 100;
const LIST_LIMIT_MAX: u32 = 100;
const SEARCH_DEFAULT_LIMIT: u32 = 20;
const SEARCH_LIMIT_MAX: u32 = 20;

/// Targeted single-field patch. Closed on purpose: only these two fields
/// are console-patchable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetPatch {
    MonetizationLink(String),
    /// Stored in the description slot.
    DriveLink(String),
}

impl AssetPatch {
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::MonetizationLink(_) => "monetization-link",
            Self::DriveLink(_) => "drive-link",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::MonetizationLink(value) | Self::DriveLink(value) => value,
        }
    }
}

/// Repository interface for asset persistence and lookup.
pub trait AssetRepository {
    /// Registers one asset. Fails on duplicate SKU or unknown matrix.
    fn create_asset(&self, asset: &Asset) -> StoreResult<()>;
    /// Gets one asset by SKU.
    fn get_asset(&self, sku: &str) -> StoreResult<Option<Asset>>;
    /// Lists active assets, optionally scoped to one matrix. Bounded.
    fn list_active_assets(
        &self,
        scope: Option<&MatrixId>,
        limit: Option<u32>,
    ) -> StoreResult<Vec<Asset>>;
    /// Case-insensitive substring search over name and SKU. Bounded.
    fn search_assets(&self, query: &str, limit: Option<u32>) -> StoreResult<Vec<Asset>>;
    /// Applies one targeted field patch.
    fn patch_asset(&self, sku: &str, patch: &AssetPatch) -> StoreResult<()>;
    /// Hard-deletes one asset; its nodes are re-orphaned by the store.
    fn purge_asset(&self, sku: &str) -> StoreResult<()>;
}

/// SQLite-backed asset repository.
pub struct SqliteAssetRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAssetRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_schema_version(conn)?;
        ensure_tables(
            conn,
            &[(
                "business_assets",
                &["sku", "matrix_id", "name", "tier", "score", "status", "monetization_link"],
            )],
        )?;
        Ok(Self { conn })
    }
}

impl AssetRepository for SqliteAssetRepository<'_> {
    fn create_asset(&self, asset: &Asset) -> StoreResult<()> {
        asset.validate()?;

        self.conn
            .execute(
                "INSERT INTO business_assets (
                    sku,
                    matrix_id,
                    name,
                    description,
                    main_image_url,
                    tier,
                    score,
                    status,
                    monetization_link,
                    last_ingested_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
                params![
                    asset.sku.as_str(),
                    asset.matrix_id.to_string(),
                    asset.name.as_str(),
                    asset.description.as_deref(),
                    asset.main_image_url.as_deref(),
                    asset.tier.as_db_str(),
                    asset.score,
                    asset.status.as_db_str(),
                    asset.monetization_link.as_deref(),
                    asset.last_ingested_at,
                ],
            )
            .map_err(|err| {
                if is_unique_violation(&err) {
                    StoreError::DuplicateSku(asset.sku.clone())
                } else if is_foreign_key_violation(&err) {
                    StoreError::MatrixNotFound(asset.matrix_id)
                } else {
                    err.into()
                }
            })?;

        Ok(())
    }

    fn get_asset(&self, sku: &str) -> StoreResult<Option<Asset>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ASSET_SELECT_SQL} WHERE sku = ?1;"))?;
        let mut rows = stmt.query([sku])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_asset_row(row)?));
        }
        Ok(None)
    }

    fn list_active_assets(
        &self,
        scope: Option<&MatrixId>,
        limit: Option<u32>,
    ) -> StoreResult<Vec<Asset>> {
        let mut sql = format!("{ASSET_SELECT_SQL} WHERE status = 'ACTIVE'");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(matrix_id) = scope {
            sql.push_str(" AND matrix_id = ?");
            bind_values.push(Value::Text(matrix_id.to_string()));
        }

        sql.push_str(" ORDER BY score DESC, sku ASC LIMIT ?");
        bind_values.push(Value::Integer(i64::from(normalize_limit(
            limit,
            LIST_DEFAULT_LIMIT,
            LIST_LIMIT_MAX,
        ))));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut assets = Vec::new();
        while let Some(row) = rows.next()? {
            assets.push(parse_asset_row(row)?);
        }
        Ok(assets)
    }

    fn search_assets(&self, query: &str, limit: Option<u32>) -> StoreResult<Vec<Asset>> {
        let needle = query.trim();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let pattern = format!("%{}%", escape_like(needle));
        let limit = normalize_limit(limit, SEARCH_DEFAULT_LIMIT, SEARCH_LIMIT_MAX);

        let mut stmt = self.conn.prepare(&format!(
            "{ASSET_SELECT_SQL}
             WHERE status = 'ACTIVE'
               AND (name LIKE ?1 ESCAPE '\\' OR sku LIKE ?1 ESCAPE '\\')
             ORDER BY score DESC, sku ASC
             LIMIT ?2;"
        ))?;
        let mut rows = stmt.query(params![pattern, limit])?;
        let mut assets = Vec::new();
        while let Some(row) = rows.next()? {
            assets.push(parse_asset_row(row)?);
        }
        Ok(assets)
    }

    fn patch_asset(&self, sku: &str, patch: &AssetPatch) -> StoreResult<()> {
        let value = patch.value().trim();
        if value.is_empty() || !is_well_formed_link(value) {
            return Err(StoreError::AssetValidation(
                AssetValidationError::MalformedLink {
                    field: patch.field_name(),
                    value: patch.value().to_string(),
                },
            ));
        }

        let column = match patch {
            AssetPatch::MonetizationLink(_) => "monetization_link",
            AssetPatch::DriveLink(_) => "description",
        };

        let changed = self.conn.execute(
            &format!(
                "UPDATE business_assets
                 SET {column} = ?2,
                     updated_at = (strftime('%s', 'now') * 1000)
                 WHERE sku = ?1;"
            ),
            params![sku, value],
        )?;

        if changed == 0 {
            return Err(StoreError::AssetNotFound(sku.to_string()));
        }

        Ok(())
    }

    fn purge_asset(&self, sku: &str) -> StoreResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM business_assets WHERE sku = ?1;", [sku])?;

        if changed == 0 {
            return Err(StoreError::AssetNotFound(sku.to_string()));
        }

        Ok(())
    }
}

fn normalize_limit(limit: Option<u32>, default: u32, max: u32) -> u32 {
    match limit {
        Some(0) | None => default,
        Some(value) if value > max => max,
        Some(value) => value,
    }
}

fn escape_like(raw: &str) -> String {
    raw.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn parse_asset_row(row: &Row<'_>) -> StoreResult<Asset> {
    let matrix_text: String = row.get("matrix_id")?;
    let matrix_id = parse_uuid(&matrix_text, "business_assets.matrix_id")?;

    let tier_text: String = row.get("tier")?;
    let tier = RarityTier::from_db_str(&tier_text).ok_or_else(|| {
        StoreError::InvalidData(format!("invalid tier `{tier_text}` in business_assets.tier"))
    })?;

    let status_text: String = row.get("status")?;
    let status = AssetStatus::from_db_str(&status_text).ok_or_else(|| {
        StoreError::InvalidData(format!(
            "invalid status `{status_text}` in business_assets.status"
        ))
    })?;

    Ok(Asset {
        sku: row.get("sku")?,
        matrix_id,
        name: row.get("name")?,
        description: row.get("description")?,
        main_image_url: row.get("main_image_url")?,
        tier,
        score: row.get("score")?,
        status,
        monetization_link: row.get("monetization_link")?,
        last_ingested_at: row.get("last_ingested_at")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
