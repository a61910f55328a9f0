use rusqlite::Connection;
use scotted_core::db::migrations::{apply_migrations, latest_version, schema_version};
use scotted_core::db::{open_db, open_db_in_memory, DbError};

#[test]
fn fresh_connection_reports_every_step_applied() {
    let mut conn = Connection::open_in_memory().unwrap();

    let report = apply_migrations(&mut conn).unwrap();
    assert_eq!(report.from_version, 0);
    assert_eq!(report.to_version, latest_version());
    assert_eq!(report.applied, vec!["kv_store"]);
    assert_eq!(schema_version(&conn).unwrap(), latest_version());
}

#[test]
fn migrated_connection_reports_nothing_to_do() {
    let mut conn = open_db_in_memory().unwrap();

    let report = apply_migrations(&mut conn).unwrap();
    assert!(report.is_noop());
    assert_eq!(report.from_version, latest_version());
    assert_eq!(report.to_version, latest_version());
}

#[test]
fn reopened_file_keeps_stored_preferences() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scotted.sqlite3");

    let first = open_db(&path).unwrap();
    first
        .execute(
            "INSERT INTO kv_store (key, value) VALUES ('scotted.audio.volume', '0.25');",
            [],
        )
        .unwrap();
    drop(first);

    let second = open_db(&path).unwrap();
    let volume: String = second
        .query_row(
            "SELECT value FROM kv_store WHERE key = 'scotted.audio.volume';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(volume, "0.25");
    assert_eq!(schema_version(&second).unwrap(), latest_version());
}

#[test]
fn kv_store_stamps_rows_with_update_time() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO kv_store (key, value) VALUES ('scotted.audio.muted', 'false');",
        [],
    )
    .unwrap();

    let columns = table_columns(&conn, "kv_store");
    assert_eq!(columns, vec!["key", "value", "updated_at"]);

    let updated_at: i64 = conn
        .query_row("SELECT updated_at FROM kv_store;", [], |row| row.get(0))
        .unwrap();
    assert!(updated_at > 0);
}

#[test]
fn opened_connections_enforce_foreign_keys() {
    let dir = tempfile::tempdir().unwrap();
    let file_conn = open_db(dir.path().join("fk.sqlite3")).unwrap();
    let memory_conn = open_db_in_memory().unwrap();

    for conn in [&file_conn, &memory_conn] {
        let enabled: i64 = conn
            .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }
}

#[test]
fn file_from_newer_build_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::SchemaTooNew { found, supported } => {
            assert_eq!(found, 999);
            assert_eq!(supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn failing_step_is_named_and_leaves_version_untouched() {
    let mut conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("PRAGMA query_only = ON;").unwrap();

    match apply_migrations(&mut conn).unwrap_err() {
        DbError::Migration { version, name, .. } => {
            assert_eq!(version, 1);
            assert_eq!(name, "kv_store");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(schema_version(&conn).unwrap(), 0);
}

fn table_columns(conn: &Connection, table: &str) -> Vec<String> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table});"))
        .unwrap();
    stmt.query_map([], |row| row.get::<_, String>(1))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap()
}
