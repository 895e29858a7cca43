use nucleotec_core::db::migrations::{current_user_version, latest_version};
use nucleotec_core::db::{open_db, open_db_in_memory, DbError};
use nucleotec_core::{RepoError, SqliteRegistryRepository, StorageFault};
use rusqlite::Connection;

const REGISTRY_TABLES: [&str; 13] = [
    "empresas",
    "consultores",
    "categorias_servico",
    "tipos_servico",
    "instrumentos",
    "modalidades",
    "portes",
    "setores",
    "macro_segmentos",
    "fichas",
    "trilhas",
    "fichas_publico_alvo",
    "fichas_setores",
];

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(current_user_version(&conn).unwrap(), latest_version());
    for table in REGISTRY_TABLES {
        assert_table_exists(&conn, table);
    }
    assert_table_exists(&conn, "fichas_macro_segmentos");
}

#[test]
fn foreign_keys_are_enforced_on_opened_connections() {
    let conn = open_db_in_memory().unwrap();
    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nucleotec.db");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute("INSERT INTO portes (nome) VALUES ('MEI');", [])
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(current_user_version(&conn_second).unwrap(), latest_version());
    let portes: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM portes;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(portes, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn repositories_reject_unmigrated_connections() {
    let conn = Connection::open_in_memory().unwrap();

    let err = SqliteRegistryRepository::try_new(&conn).err().unwrap();
    assert!(matches!(err, RepoError::UninitializedConnection { .. }));
    assert_eq!(err.fault(), StorageFault::Unavailable);
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
