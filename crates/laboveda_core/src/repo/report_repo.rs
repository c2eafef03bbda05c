//! Radar/analytics report reads over the store's SQL views.
//!
//! # Responsibility
//! - Surface every aggregated view as typed rows.
//! - Keep sorting server-side; consoles never re-sort locally.
//!
//! # Invariants
//! - Every report read accepts an optional matrix scope.
//! - Result ordering is deterministic (explicit ORDER BY with a `sku`
//!   tiebreaker everywhere).

use crate::model::asset::RarityTier;
use crate::model::ingestion::{CycleStatus, IngestionCycle};
use crate::model::matrix::MatrixId;
use crate::model::report::{
    ConversionAlert, DustCandidate, DustRecommendation, EliteRow, EliteSort, EliteSortField,
    GhostAsset, GlobalKpis, InfraIssue, InfrastructureGap, MissingField, MonetizationGap,
    RevenueImpact, SortDirection, TrafficTrend, ViewCounts, VoidAsset,
};
use crate::repo::{ensure_schema_version, ensure_tables, parse_uuid, StoreError, StoreResult};
use rusqlite::{params, Connection, Row};

/// Repository interface for read-only aggregate reports.
pub trait ReportRepository {
    fn monetization_gaps(&self, scope: Option<&MatrixId>) -> StoreResult<Vec<MonetizationGap>>;
    fn infrastructure_gaps(&self, scope: Option<&MatrixId>)
        -> StoreResult<Vec<InfrastructureGap>>;
    fn ghost_assets(&self, scope: Option<&MatrixId>) -> StoreResult<Vec<GhostAsset>>;
    fn void_assets(&self, scope: Option<&MatrixId>) -> StoreResult<Vec<VoidAsset>>;
    fn dust_candidates(&self, scope: Option<&MatrixId>) -> StoreResult<Vec<DustCandidate>>;
    fn elite_analytics(
        &self,
        scope: Option<&MatrixId>,
        sort: &EliteSort,
    ) -> StoreResult<Vec<EliteRow>>;
    fn conversion_alerts(&self, scope: Option<&MatrixId>) -> StoreResult<Vec<ConversionAlert>>;
    /// Row counts for the navigation badges.
    fn view_counts(&self) -> StoreResult<ViewCounts>;
    /// Most recent ingestion cycle, for the system heartbeat.
    fn latest_cycle(&self) -> StoreResult<Option<IngestionCycle>>;
    /// Global header aggregates.
    fn global_kpis(&self) -> StoreResult<GlobalKpis>;
}

/// SQLite-backed report repository over the radar views.
pub struct SqliteReportRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteReportRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_schema_version(conn)?;
        ensure_tables(
            conn,
            &[
                ("radar_monetization_gap", &[]),
                ("radar_infrastructure_gap", &[]),
                ("radar_ghost_assets", &[]),
                ("radar_the_void", &[]),
                ("radar_dust_cleaner", &[]),
                ("view_elite_analytics", &[]),
                ("radar_conversion_alert", &[]),
                ("ingestion_cycles", &[]),
            ],
        )?;
        Ok(Self { conn })
    }

    fn query_scoped<T>(
        &self,
        sql: &str,
        scope: Option<&MatrixId>,
        parse: impl Fn(&Row<'_>) -> StoreResult<T>,
    ) -> StoreResult<Vec<T>> {
        let scope_text = scope.map(MatrixId::to_string);
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params![scope_text])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse(row)?);
        }
        Ok(items)
    }
}

impl ReportRepository for SqliteReportRepository<'_> {
    fn monetization_gaps(&self, scope: Option<&MatrixId>) -> StoreResult<Vec<MonetizationGap>> {
        self.query_scoped(
            "SELECT sku, matrix_id, asset_name, matrix_name, current_score, tier,
                    missing_field, revenue_impact
             FROM radar_monetization_gap
             WHERE (?1 IS NULL OR matrix_id = ?1)
             ORDER BY current_score DESC, sku ASC;",
            scope,
            parse_monetization_row,
        )
    }

    fn infrastructure_gaps(
        &self,
        scope: Option<&MatrixId>,
    ) -> StoreResult<Vec<InfrastructureGap>> {
        self.query_scoped(
            "SELECT sku, matrix_id, asset_name, issue_type, detected_at, days_open
             FROM radar_infrastructure_gap
             WHERE (?1 IS NULL OR matrix_id = ?1)
             ORDER BY days_open DESC, sku ASC;",
            scope,
            parse_infrastructure_row,
        )
    }

    fn ghost_assets(&self, scope: Option<&MatrixId>) -> StoreResult<Vec<GhostAsset>> {
        self.query_scoped(
            "SELECT sku, matrix_id, asset_name, created_at, days_since_creation,
                    last_known_activity
             FROM radar_ghost_assets
             WHERE (?1 IS NULL OR matrix_id = ?1)
             ORDER BY days_since_creation DESC, sku ASC;",
            scope,
            parse_ghost_row,
        )
    }

    fn void_assets(&self, scope: Option<&MatrixId>) -> StoreResult<Vec<VoidAsset>> {
        self.query_scoped(
            "SELECT sku, matrix_id, asset_name, node_count, total_impressions,
                    total_clicks, dormant_days
             FROM radar_the_void
             WHERE (?1 IS NULL OR matrix_id = ?1)
             ORDER BY dormant_days DESC, sku ASC;",
            scope,
            parse_void_row,
        )
    }

    fn dust_candidates(&self, scope: Option<&MatrixId>) -> StoreResult<Vec<DustCandidate>> {
        self.query_scoped(
            "SELECT sku, matrix_id, asset_name, score, node_count, recommendation
             FROM radar_dust_cleaner
             WHERE (?1 IS NULL OR matrix_id = ?1)
             ORDER BY score ASC, sku ASC;",
            scope,
            parse_dust_row,
        )
    }

    fn elite_analytics(
        &self,
        scope: Option<&MatrixId>,
        sort: &EliteSort,
    ) -> StoreResult<Vec<EliteRow>> {
        let direction = match sort.direction {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        };
        let sql = format!(
            "SELECT sku, matrix_id, asset_name, tier, traffic_score, revenue_score,
                    efficiency_index, traffic_trend
             FROM view_elite_analytics
             WHERE (?1 IS NULL OR matrix_id = ?1)
             ORDER BY {} {direction}, sku ASC;",
            elite_order_expr(sort.field)
        );
        self.query_scoped(&sql, scope, parse_elite_row)
    }

    fn conversion_alerts(&self, scope: Option<&MatrixId>) -> StoreResult<Vec<ConversionAlert>> {
        self.query_scoped(
            "SELECT sku, matrix_id
             FROM radar_conversion_alert
             WHERE (?1 IS NULL OR matrix_id = ?1)
             ORDER BY sku ASC;",
            scope,
            |row| {
                Ok(ConversionAlert {
                    sku: row.get("sku")?,
                })
            },
        )
    }

    fn view_counts(&self) -> StoreResult<ViewCounts> {
        let counts = self.conn.query_row(
            "SELECT
                (SELECT COUNT(*) FROM radar_monetization_gap),
                (SELECT COUNT(*) FROM radar_infrastructure_gap),
                (SELECT COUNT(*) FROM radar_ghost_assets),
                (SELECT COUNT(*) FROM radar_the_void),
                (SELECT COUNT(*) FROM radar_dust_cleaner);",
            [],
            |row| {
                Ok(ViewCounts {
                    monetization_gaps: row.get(0)?,
                    infrastructure_gaps: row.get(1)?,
                    ghost_assets: row.get(2)?,
                    void_assets: row.get(3)?,
                    dust_candidates: row.get(4)?,
                })
            },
        )?;
        Ok(counts)
    }

    fn latest_cycle(&self) -> StoreResult<Option<IngestionCycle>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, started_at, ended_at, status, records_processed, log_summary
             FROM ingestion_cycles
             ORDER BY started_at DESC, uuid ASC
             LIMIT 1;",
        )?;
        let mut rows = stmt.query([])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_cycle_row(row)?));
        }
        Ok(None)
    }

    fn global_kpis(&self) -> StoreResult<GlobalKpis> {
        let kpis = self.conn.query_row(
            "SELECT
                (SELECT COUNT(*) FROM business_assets),
                (SELECT COUNT(*) FROM pinterest_nodes),
                (SELECT COALESCE(AVG(efficiency_score), 0) FROM matrix_registry);",
            [],
            |row| {
                Ok(GlobalKpis {
                    total_assets: row.get(0)?,
                    total_nodes: row.get(1)?,
                    efficiency_avg: row.get(2)?,
                })
            },
        )?;
        Ok(kpis)
    }
}

fn elite_order_expr(field: EliteSortField) -> &'static str {
    match field {
        EliteSortField::Sku => "sku",
        EliteSortField::AssetName => "asset_name",
        EliteSortField::Tier => {
            // Rarity order, not lexicographic.
            "CASE tier
                WHEN 'DUST' THEN 0
                WHEN 'COMMON' THEN 1
                WHEN 'UNCOMMON' THEN 2
                WHEN 'RARE' THEN 3
                WHEN 'LEGENDARY' THEN 4
             END"
        }
        EliteSortField::TrafficScore => "traffic_score",
        EliteSortField::RevenueScore => "revenue_score",
        EliteSortField::EfficiencyIndex => "efficiency_index",
        EliteSortField::Trend => "traffic_trend",
    }
}

fn parse_matrix_id(row: &Row<'_>) -> StoreResult<MatrixId> {
    let text: String = row.get("matrix_id")?;
    parse_uuid(&text, "report.matrix_id")
}

fn parse_tier(row: &Row<'_>) -> StoreResult<RarityTier> {
    let text: String = row.get("tier")?;
    RarityTier::from_db_str(&text)
        .ok_or_else(|| StoreError::InvalidData(format!("invalid tier `{text}` in report row")))
}

fn parse_monetization_row(row: &Row<'_>) -> StoreResult<MonetizationGap> {
    let missing_text: String = row.get("missing_field")?;
    let impact_text: String = row.get("revenue_impact")?;
    Ok(MonetizationGap {
        sku: row.get("sku")?,
        matrix_id: parse_matrix_id(row)?,
        asset_name: row.get("asset_name")?,
        matrix_name: row.get("matrix_name")?,
        current_score: row.get("current_score")?,
        tier: parse_tier(row)?,
        missing_field: MissingField::from_db_str(&missing_text).ok_or_else(|| {
            StoreError::InvalidData(format!("invalid missing_field `{missing_text}`"))
        })?,
        revenue_impact: RevenueImpact::from_db_str(&impact_text).ok_or_else(|| {
            StoreError::InvalidData(format!("invalid revenue_impact `{impact_text}`"))
        })?,
    })
}

fn parse_infrastructure_row(row: &Row<'_>) -> StoreResult<InfrastructureGap> {
    let issue_text: String = row.get("issue_type")?;
    Ok(InfrastructureGap {
        sku: row.get("sku")?,
        matrix_id: parse_matrix_id(row)?,
        asset_name: row.get("asset_name")?,
        issue: InfraIssue::from_db_str(&issue_text)
            .ok_or_else(|| StoreError::InvalidData(format!("invalid issue_type `{issue_text}`")))?,
        detected_at: row.get("detected_at")?,
        days_open: row.get("days_open")?,
    })
}

fn parse_ghost_row(row: &Row<'_>) -> StoreResult<GhostAsset> {
    Ok(GhostAsset {
        sku: row.get("sku")?,
        matrix_id: parse_matrix_id(row)?,
        asset_name: row.get("asset_name")?,
        created_at: row.get("created_at")?,
        days_since_creation: row.get("days_since_creation")?,
        last_known_activity: row.get("last_known_activity")?,
    })
}

fn parse_void_row(row: &Row<'_>) -> StoreResult<VoidAsset> {
    Ok(VoidAsset {
        sku: row.get("sku")?,
        matrix_id: parse_matrix_id(row)?,
        asset_name: row.get("asset_name")?,
        node_count: row.get("node_count")?,
        total_impressions: row.get("total_impressions")?,
        total_clicks: row.get("total_clicks")?,
        dormant_days: row.get("dormant_days")?,
    })
}

fn parse_dust_row(row: &Row<'_>) -> StoreResult<DustCandidate> {
    let recommendation_text: String = row.get("recommendation")?;
    Ok(DustCandidate {
        sku: row.get("sku")?,
        matrix_id: parse_matrix_id(row)?,
        asset_name: row.get("asset_name")?,
        score: row.get("score")?,
        node_count: row.get("node_count")?,
        recommendation: DustRecommendation::from_db_str(&recommendation_text).ok_or_else(
            || StoreError::InvalidData(format!("invalid recommendation `{recommendation_text}`")),
        )?,
    })
}

fn parse_elite_row(row: &Row<'_>) -> StoreResult<EliteRow> {
    let trend_text: String = row.get("traffic_trend")?;
    Ok(EliteRow {
        sku: row.get("sku")?,
        matrix_id: parse_matrix_id(row)?,
        asset_name: row.get("asset_name")?,
        tier: parse_tier(row)?,
        traffic_score: row.get("traffic_score")?,
        revenue_score: row.get("revenue_score")?,
        efficiency_index: row.get("efficiency_index")?,
        trend: TrafficTrend::from_db_str(&trend_text)
            .ok_or_else(|| StoreError::InvalidData(format!("invalid trend `{trend_text}`")))?,
    })
}

fn parse_cycle_row(row: &Row<'_>) -> StoreResult<IngestionCycle> {
    let uuid_text: String = row.get("uuid")?;
    let status_text: String = row.get("status")?;
    Ok(IngestionCycle {
        uuid: parse_uuid(&uuid_text, "ingestion_cycles.uuid")?,
        started_at: row.get("started_at")?,
        ended_at: row.get("ended_at")?,
        status: CycleStatus::from_db_str(&status_text).ok_or_else(|| {
            StoreError::InvalidData(format!("invalid cycle status `{status_text}`"))
        })?,
        records_processed: row.get("records_processed")?,
        log_summary: row.get("log_summary")?,
    })
}
