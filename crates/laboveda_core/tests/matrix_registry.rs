use laboveda_core::db::open_db_in_memory;
use laboveda_core::{
    EventFeed, FeedLevel, Matrix, MatrixKind, MatrixRepository, MatrixService,
    MatrixServiceError, NewMatrix, SqliteMatrixRepository, StoreError,
};
use rusqlite::Connection;

fn draft(code: &str, name: &str) -> NewMatrix {
    NewMatrix {
        code: code.to_string(),
        name: name.to_string(),
        kind: MatrixKind::Primary,
    }
}

#[test]
fn create_and_list_roundtrip_ordered_by_code() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMatrixRepository::try_new(&conn).unwrap();

    let beta = Matrix::from_draft(&draft("MX-B", "Beta"));
    let alpha = Matrix::from_draft(&NewMatrix {
        code: "MX-A".to_string(),
        name: "Alpha".to_string(),
        kind: MatrixKind::Secondary,
    });
    repo.create_matrix(&beta).unwrap();
    repo.create_matrix(&alpha).unwrap();

    let listed = repo.list_matrices().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].code, "MX-A");
    assert_eq!(listed[0].kind, MatrixKind::Secondary);
    assert_eq!(listed[1].code, "MX-B");
    assert_eq!(listed[1].name, "Beta");
    assert!(listed[0].created_at > 0, "store stamps creation time");
}

#[test]
fn duplicate_code_surfaces_as_conflict() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMatrixRepository::try_new(&conn).unwrap();

    repo.create_matrix(&Matrix::from_draft(&draft("MX-A", "First")))
        .unwrap();
    let err = repo
        .create_matrix(&Matrix::from_draft(&draft("MX-A", "Second")))
        .unwrap_err();

    assert!(matches!(err, StoreError::DuplicateMatrixCode(code) if code == "MX-A"));
}

#[test]
fn blank_fields_are_rejected_before_sql() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMatrixRepository::try_new(&conn).unwrap();

    let mut matrix = Matrix::from_draft(&draft("MX-A", "Valid"));
    matrix.code = "  ".to_string();

    let err = repo.create_matrix(&matrix).unwrap_err();
    assert!(matches!(err, StoreError::MatrixValidation(_)));
    assert!(repo.list_matrices().unwrap().is_empty());
}

#[test]
fn uninitialized_connection_is_rejected() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteMatrixRepository::try_new(&conn);
    match result {
        Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn service_create_appends_optimistically_and_keeps_success() {
    let conn = open_db_in_memory().unwrap();
    let mut service = MatrixService::new(SqliteMatrixRepository::try_new(&conn).unwrap());
    let mut feed = EventFeed::new();
    service.refresh().unwrap();

    let id = service.create(draft("MX-A", "Alpha"), &mut feed).unwrap();

    assert_eq!(service.matrices().len(), 1);
    assert_eq!(service.matrices()[0].uuid, id);
    assert_eq!(feed.latest().map(|entry| entry.level), Some(FeedLevel::Success));

    let listed = SqliteMatrixRepository::try_new(&conn)
        .unwrap()
        .list_matrices()
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].uuid, id);
}

#[test]
fn service_create_rolls_back_on_duplicate_code() {
    let conn = open_db_in_memory().unwrap();
    let mut service = MatrixService::new(SqliteMatrixRepository::try_new(&conn).unwrap());
    let mut feed = EventFeed::new();
    service.refresh().unwrap();

    service.create(draft("MX-A", "Alpha"), &mut feed).unwrap();
    let err = service
        .create(draft("MX-A", "Impostor"), &mut feed)
        .unwrap_err();

    assert!(matches!(
        err,
        MatrixServiceError::Store(StoreError::DuplicateMatrixCode(_))
    ));
    assert_eq!(service.matrices().len(), 1, "optimistic row was reverted");
    assert_eq!(service.matrices()[0].name, "Alpha");
    assert_eq!(feed.latest().map(|entry| entry.level), Some(FeedLevel::Error));
}

#[test]
fn service_rejects_blank_draft_locally() {
    let conn = open_db_in_memory().unwrap();
    let mut service = MatrixService::new(SqliteMatrixRepository::try_new(&conn).unwrap());
    let mut feed = EventFeed::new();
    service.refresh().unwrap();

    let err = service.create(draft("", "Nameless"), &mut feed).unwrap_err();

    assert!(matches!(err, MatrixServiceError::Validation(_)));
    assert!(service.matrices().is_empty());
    assert_eq!(feed.latest().map(|entry| entry.level), Some(FeedLevel::Error));
    assert!(SqliteMatrixRepository::try_new(&conn)
        .unwrap()
        .list_matrices()
        .unwrap()
        .is_empty());
}
