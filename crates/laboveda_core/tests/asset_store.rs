use laboveda_core::db::open_db_in_memory;
use laboveda_core::{
    Asset, AssetPatch, AssetRepository, AssetStatus, Matrix, MatrixId, MatrixKind,
    MatrixRepository, NewMatrix, NodeRepository, RarityTier, SqliteAssetRepository,
    SqliteMatrixRepository, SqliteNodeRepository, StoreError,
};
use rusqlite::{params, Connection};
use uuid::Uuid;

fn seed_matrix(conn: &Connection, code: &str) -> MatrixId {
    let repo = SqliteMatrixRepository::try_new(conn).unwrap();
    let matrix = Matrix::from_draft(&NewMatrix {
        code: code.to_string(),
        name: format!("{code} matrix"),
        kind: MatrixKind::Primary,
    });
    repo.create_matrix(&matrix).unwrap();
    matrix.uuid
}

fn node_id(n: u32) -> Uuid {
    Uuid::parse_str(&format!("00000000-0000-4000-8000-{n:012x}")).unwrap()
}

fn seed_node(conn: &Connection, n: u32, sku: Option<&str>) -> Uuid {
    let id = node_id(n);
    conn.execute(
        "INSERT INTO pinterest_nodes (uuid, asset_sku, pin_id, url)
         VALUES (?1, ?2, ?3, ?4);",
        params![
            id.to_string(),
            sku,
            format!("pin-{n}"),
            "https://pinterest.com/pin/x"
        ],
    )
    .unwrap();
    id
}

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let matrix_id = seed_matrix(&conn, "MX1");
    let repo = SqliteAssetRepository::try_new(&conn).unwrap();

    let mut asset = Asset::new("CKU-2099", matrix_id, "Cyber Katana Umbrella");
    asset.tier = RarityTier::Legendary;
    asset.score = 1200;
    asset.monetization_link = Some("https://payhip.com/cku".to_string());
    repo.create_asset(&asset).unwrap();

    let loaded = repo.get_asset("CKU-2099").unwrap().unwrap();
    assert_eq!(loaded.sku, "CKU-2099");
    assert_eq!(loaded.matrix_id, matrix_id);
    assert_eq!(loaded.tier, RarityTier::Legendary);
    assert_eq!(loaded.score, 1200);
    assert_eq!(loaded.status, AssetStatus::Active);
    assert_eq!(
        loaded.monetization_link.as_deref(),
        Some("https://payhip.com/cku")
    );
    assert!(loaded.created_at > 0);
}

#[test]
fn get_unknown_sku_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAssetRepository::try_new(&conn).unwrap();

    assert!(repo.get_asset("MISSING").unwrap().is_none());
}

#[test]
fn duplicate_sku_surfaces_as_conflict() {
    let conn = open_db_in_memory().unwrap();
    let matrix_id = seed_matrix(&conn, "MX1");
    let repo = SqliteAssetRepository::try_new(&conn).unwrap();

    repo.create_asset(&Asset::new("NGM-001", matrix_id, "Neon Gas Mask"))
        .unwrap();
    let err = repo
        .create_asset(&Asset::new("NGM-001", matrix_id, "Impostor"))
        .unwrap_err();

    assert!(matches!(err, StoreError::DuplicateSku(sku) if sku == "NGM-001"));
}

#[test]
fn unknown_matrix_reference_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    seed_matrix(&conn, "MX1");
    let repo = SqliteAssetRepository::try_new(&conn).unwrap();

    let ghost_matrix = Uuid::new_v4();
    let err = repo
        .create_asset(&Asset::new("ORF-1", ghost_matrix, "Orphan Product"))
        .unwrap_err();

    assert!(matches!(err, StoreError::MatrixNotFound(id) if id == ghost_matrix));
}

#[test]
fn validation_failure_blocks_create() {
    let conn = open_db_in_memory().unwrap();
    let matrix_id = seed_matrix(&conn, "MX1");
    let repo = SqliteAssetRepository::try_new(&conn).unwrap();

    let mut invalid = Asset::new("BAD-1", matrix_id, "Bad Link");
    invalid.monetization_link = Some("not-a-url".to_string());

    let err = repo.create_asset(&invalid).unwrap_err();
    assert!(matches!(err, StoreError::AssetValidation(_)));
}

#[test]
fn search_matches_name_and_sku_case_insensitively() {
    let conn = open_db_in_memory().unwrap();
    let matrix_id = seed_matrix(&conn, "MX1");
    let repo = SqliteAssetRepository::try_new(&conn).unwrap();

    repo.create_asset(&Asset::new("CKU-2099", matrix_id, "Cyber Katana Umbrella"))
        .unwrap();
    repo.create_asset(&Asset::new("NGM-001", matrix_id, "Neon Gas Mask"))
        .unwrap();

    let by_name = repo.search_assets("katana", None).unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].sku, "CKU-2099");

    let by_sku = repo.search_assets("ngm", None).unwrap();
    assert_eq!(by_sku.len(), 1);
    assert_eq!(by_sku[0].sku, "NGM-001");

    assert!(repo.search_assets("plasma", None).unwrap().is_empty());
    assert!(repo.search_assets("   ", None).unwrap().is_empty());
}

#[test]
fn search_is_bounded_to_twenty_rows() {
    let conn = open_db_in_memory().unwrap();
    let matrix_id = seed_matrix(&conn, "MX1");
    let repo = SqliteAssetRepository::try_new(&conn).unwrap();

    for n in 0..25 {
        repo.create_asset(&Asset::new(
            format!("BULK-{n:03}"),
            matrix_id,
            format!("Bulk Item {n}"),
        ))
        .unwrap();
    }

    assert_eq!(repo.search_assets("bulk", None).unwrap().len(), 20);
    assert_eq!(repo.search_assets("bulk", Some(5)).unwrap().len(), 5);
    assert_eq!(repo.search_assets("bulk", Some(500)).unwrap().len(), 20);
}

#[test]
fn search_excludes_non_active_assets() {
    let conn = open_db_in_memory().unwrap();
    let matrix_id = seed_matrix(&conn, "MX1");
    let repo = SqliteAssetRepository::try_new(&conn).unwrap();

    let mut archived = Asset::new("DFC-10", matrix_id, "Dust Filter Component");
    archived.status = AssetStatus::Archived;
    repo.create_asset(&archived).unwrap();

    assert!(repo.search_assets("dust", None).unwrap().is_empty());
}

#[test]
fn list_active_assets_honors_scope_and_status() {
    let conn = open_db_in_memory().unwrap();
    let mx1 = seed_matrix(&conn, "MX1");
    let mx2 = seed_matrix(&conn, "MX2");
    let repo = SqliteAssetRepository::try_new(&conn).unwrap();

    repo.create_asset(&Asset::new("A-1", mx1, "Alpha One")).unwrap();
    repo.create_asset(&Asset::new("B-1", mx2, "Beta One")).unwrap();
    let mut pending = Asset::new("A-2", mx1, "Alpha Two");
    pending.status = AssetStatus::Pending;
    repo.create_asset(&pending).unwrap();

    let all = repo.list_active_assets(None, None).unwrap();
    assert_eq!(all.len(), 2);

    let scoped = repo.list_active_assets(Some(&mx1), None).unwrap();
    assert_eq!(scoped.len(), 1);
    assert_eq!(scoped[0].sku, "A-1");
}

#[test]
fn patch_monetization_link_writes_the_link_column() {
    let conn = open_db_in_memory().unwrap();
    let matrix_id = seed_matrix(&conn, "MX1");
    let repo = SqliteAssetRepository::try_new(&conn).unwrap();
    repo.create_asset(&Asset::new("PAS-900", matrix_id, "Protocol Alpha Sword"))
        .unwrap();

    repo.patch_asset(
        "PAS-900",
        &AssetPatch::MonetizationLink("https://payhip.com/pas".to_string()),
    )
    .unwrap();

    let loaded = repo.get_asset("PAS-900").unwrap().unwrap();
    assert_eq!(
        loaded.monetization_link.as_deref(),
        Some("https://payhip.com/pas")
    );
}

#[test]
fn patch_drive_link_writes_the_description_slot() {
    let conn = open_db_in_memory().unwrap();
    let matrix_id = seed_matrix(&conn, "MX1");
    let repo = SqliteAssetRepository::try_new(&conn).unwrap();
    repo.create_asset(&Asset::new("RMB-4545", matrix_id, "Raw Material Bundle"))
        .unwrap();

    repo.patch_asset(
        "RMB-4545",
        &AssetPatch::DriveLink("https://docs.google.com/doc/rmb".to_string()),
    )
    .unwrap();

    let loaded = repo.get_asset("RMB-4545").unwrap().unwrap();
    assert_eq!(
        loaded.description.as_deref(),
        Some("https://docs.google.com/doc/rmb")
    );
}

#[test]
fn patch_rejects_malformed_and_blank_values() {
    let conn = open_db_in_memory().unwrap();
    let matrix_id = seed_matrix(&conn, "MX1");
    let repo = SqliteAssetRepository::try_new(&conn).unwrap();
    repo.create_asset(&Asset::new("PAS-900", matrix_id, "Protocol Alpha Sword"))
        .unwrap();

    let blank = repo
        .patch_asset("PAS-900", &AssetPatch::MonetizationLink(String::new()))
        .unwrap_err();
    assert!(matches!(blank, StoreError::AssetValidation(_)));

    let malformed = repo
        .patch_asset("PAS-900", &AssetPatch::MonetizationLink("ftp://x".to_string()))
        .unwrap_err();
    assert!(matches!(malformed, StoreError::AssetValidation(_)));

    let loaded = repo.get_asset("PAS-900").unwrap().unwrap();
    assert!(loaded.monetization_link.is_none(), "no write happened");
}

#[test]
fn patch_unknown_sku_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    seed_matrix(&conn, "MX1");
    let repo = SqliteAssetRepository::try_new(&conn).unwrap();

    let err = repo
        .patch_asset(
            "MISSING",
            &AssetPatch::MonetizationLink("https://payhip.com/x".to_string()),
        )
        .unwrap_err();
    assert!(matches!(err, StoreError::AssetNotFound(sku) if sku == "MISSING"));
}

#[test]
fn purge_reorphans_referencing_nodes() {
    let conn = open_db_in_memory().unwrap();
    let matrix_id = seed_matrix(&conn, "MX1");
    let assets = SqliteAssetRepository::try_new(&conn).unwrap();
    assets
        .create_asset(&Asset::new("CKU-2099", matrix_id, "Cyber Katana Umbrella"))
        .unwrap();

    let linked = seed_node(&conn, 1, Some("CKU-2099"));
    seed_node(&conn, 2, None);

    let nodes = SqliteNodeRepository::try_new(&conn).unwrap();
    assert_eq!(nodes.list_orphaned(None).unwrap().len(), 1);

    assets.purge_asset("CKU-2099").unwrap();

    assert!(assets.get_asset("CKU-2099").unwrap().is_none());
    let orphans = nodes.list_orphaned(None).unwrap();
    assert_eq!(orphans.len(), 2, "purge re-orphaned the linked node");
    assert!(orphans.iter().any(|node| node.uuid == linked));
}

#[test]
fn purge_unknown_sku_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    seed_matrix(&conn, "MX1");
    let repo = SqliteAssetRepository::try_new(&conn).unwrap();

    let err = repo.purge_asset("MISSING").unwrap_err();
    assert!(matches!(err, StoreError::AssetNotFound(_)));
}
