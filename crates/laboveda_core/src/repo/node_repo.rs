//! Node repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide the orphan-pool read plus the only two node mutations the
//!   consoles may perform: reassignment and incineration.
//!
//! # Invariants
//! - Batch mutations are all-or-nothing within one transaction.
//! - Reassignment to an unknown SKU surfaces as `ForeignKeyViolation`.
//! - Incineration is idempotent: already-gone ids are not an error.

use crate::model::node::{Node, NodeId};
use crate::repo::{
    ensure_schema_version, ensure_tables, is_foreign_key_violation, parse_uuid, StoreError,
    StoreResult,
};
use rusqlite::{params, Connection, Row};

const NODE_SELECT_SQL: &str = "SELECT
    uuid,
    asset_sku,
    pin_id,
    url,
    image_url,
    impressions,
    saves,
    outbound_clicks,
    created_at,
    updated_at
FROM pinterest_nodes";

const ORPHAN_DEFAULT_LIMIT: u32 = 100;
const ORPHAN_LIMIT_MAX: u32 = 100;

/// Repository interface for node operations.
pub trait NodeRepository {
    /// Lists nodes with no asset reference, oldest first. Bounded.
    fn list_orphaned(&self, limit: Option<u32>) -> StoreResult<Vec<Node>>;
    /// Points every given node at the target SKU. Single or batch.
    fn assign_nodes(&self, ids: &[NodeId], sku: &str) -> StoreResult<()>;
    /// Hard-deletes the given nodes. Single or batch.
    fn delete_nodes(&self, ids: &[NodeId]) -> StoreResult<()>;
}

/// SQLite-backed node repository.
pub struct SqliteNodeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNodeRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_schema_version(conn)?;
        ensure_tables(
            conn,
            &[(
                "pinterest_nodes",
                &["uuid", "asset_sku", "pin_id", "url", "impressions", "saves", "outbound_clicks"],
            )],
        )?;
        Ok(Self { conn })
    }
}

impl NodeRepository for SqliteNodeRepository<'_> {
    fn list_orphaned(&self, limit: Option<u32>) -> StoreResult<Vec<Node>> {
        let limit = match limit {
            Some(0) | None => ORPHAN_DEFAULT_LIMIT,
            Some(value) if value > ORPHAN_LIMIT_MAX => ORPHAN_LIMIT_MAX,
            Some(value) => value,
        };

        let mut stmt = self.conn.prepare(&format!(
            "{NODE_SELECT_SQL}
             WHERE asset_sku IS NULL
             ORDER BY created_at ASC, uuid ASC
             LIMIT ?1;"
        ))?;
        let mut rows = stmt.query([limit])?;
        let mut nodes = Vec::new();
        while let Some(row) = rows.next()? {
            nodes.push(parse_node_row(row)?);
        }
        Ok(nodes)
    }

    fn assign_nodes(&self, ids: &[NodeId], sku: &str) -> StoreResult<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let tx = self.conn.unchecked_transaction()?;
        for id in ids {
            let changed = tx
                .execute(
                    "UPDATE pinterest_nodes
                     SET asset_sku = ?1,
                         updated_at = (strftime('%s', 'now') * 1000)
                     WHERE uuid = ?2;",
                    params![sku, id.to_string()],
                )
                .map_err(|err| {
                    if is_foreign_key_violation(&err) {
                        StoreError::ForeignKeyViolation {
                            node: *id,
                            sku: sku.to_string(),
                        }
                    } else {
                        err.into()
                    }
                })?;

            if changed == 0 {
                return Err(StoreError::NodeNotFound(*id));
            }
        }
        tx.commit()?;

        Ok(())
    }

    fn delete_nodes(&self, ids: &[NodeId]) -> StoreResult<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let tx = self.conn.unchecked_transaction()?;
        for id in ids {
            tx.execute(
                "DELETE FROM pinterest_nodes WHERE uuid = ?1;",
                [id.to_string()],
            )?;
        }
        tx.commit()?;

        Ok(())
    }
}

fn parse_node_row(row: &Row<'_>) -> StoreResult<Node> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = parse_uuid(&uuid_text, "pinterest_nodes.uuid")?;

    Ok(Node {
        uuid,
        asset_sku: row.get("asset_sku")?,
        pin_id: row.get("pin_id")?,
        url: row.get("url")?,
        image_url: row.get("image_url")?,
        impressions: row.get("impressions")?,
        saves: row.get("saves")?,
        outbound_clicks: row.get("outbound_clicks")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
