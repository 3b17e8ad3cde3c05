//! Local SQLite database layer for the Shooter Bar System.
//!
//! Uses rusqlite with WAL mode. All application state lives in a single
//! `kv_store` table of JSON-serialized slots keyed by name. Provides schema
//! migrations and the raw get/set/remove slot API; typed access lives in
//! [`crate::store`].

use rusqlite::{params, Connection};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};

/// Managed state holding the database connection.
pub struct DbState {
    pub conn: Mutex<Connection>,
    pub db_path: PathBuf,
}

/// Current schema version. Bump when adding new migrations.
const CURRENT_SCHEMA_VERSION: i32 = 2;

/// Initialize the database at `{data_dir}/bar.db`.
///
/// Creates the directory if needed, opens the connection, sets pragmas,
/// and runs any pending migrations. On corruption or open failure,
/// deletes the file and retries once.
pub fn init(data_dir: &Path) -> Result<DbState, String> {
    fs::create_dir_all(data_dir).map_err(|e| format!("Failed to create data dir: {e}"))?;

    let db_path = data_dir.join("bar.db");
    info!("Opening database at {}", db_path.display());

    let conn = match open_and_configure(&db_path) {
        Ok(c) => c,
        Err(first_err) => {
            warn!(
                "Database open failed ({}), deleting and retrying once",
                first_err
            );
            if db_path.exists() {
                let _ = fs::remove_file(&db_path);
                // Also remove WAL/SHM files if present
                let wal = db_path.with_extension("db-wal");
                let shm = db_path.with_extension("db-shm");
                let _ = fs::remove_file(&wal);
                let _ = fs::remove_file(&shm);
            }
            open_and_configure(&db_path)
                .map_err(|e| format!("Database open failed after retry: {e}"))?
        }
    };

    run_migrations(&conn)?;

    info!("Database initialized (schema v{CURRENT_SCHEMA_VERSION})");

    Ok(DbState {
        conn: Mutex::new(conn),
        db_path,
    })
}

/// Open the database file and apply pragmas.
fn open_and_configure(path: &Path) -> Result<Connection, String> {
    let conn = Connection::open(path).map_err(|e| format!("sqlite open: {e}"))?;

    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA busy_timeout = 5000;
         PRAGMA synchronous = NORMAL;",
    )
    .map_err(|e| format!("pragma setup: {e}"))?;

    Ok(conn)
}

/// Run all pending migrations up to `CURRENT_SCHEMA_VERSION`.
fn run_migrations(conn: &Connection) -> Result<(), String> {
    // Ensure schema_version table exists first
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT DEFAULT (datetime('now'))
        );",
    )
    .map_err(|e| format!("create schema_version: {e}"))?;

    let current: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    if current >= CURRENT_SCHEMA_VERSION {
        info!("Database schema up to date (v{current})");
        return Ok(());
    }

    info!("Migrating database from v{current} to v{CURRENT_SCHEMA_VERSION}");

    if current < 1 {
        migrate_v1(conn)?;
    }
    if current < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

/// Migration v1: the kv_store slot table.
fn migrate_v1(conn: &Connection) -> Result<(), String> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS kv_store (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        INSERT INTO schema_version (version) VALUES (1);
        ",
    )
    .map_err(|e| format!("migration v1: {e}"))?;
    Ok(())
}

/// Migration v2: track slot write times for diagnostics.
fn migrate_v2(conn: &Connection) -> Result<(), String> {
    conn.execute_batch(
        "
        ALTER TABLE kv_store ADD COLUMN updated_at TEXT;

        INSERT INTO schema_version (version) VALUES (2);
        ",
    )
    .map_err(|e| format!("migration v2: {e}"))?;
    Ok(())
}

/// Run all migrations against a test connection (in-memory DBs skip `init`).
pub fn run_migrations_for_test(conn: &Connection) {
    run_migrations(conn).expect("test migrations");
}

// ---------------------------------------------------------------------------
// Raw slot API
// ---------------------------------------------------------------------------

/// Read the raw JSON text stored under `key`, or `None` if the slot is empty.
pub fn get_raw(conn: &Connection, key: &str) -> Option<String> {
    conn.query_row(
        "SELECT value FROM kv_store WHERE key = ?1",
        params![key],
        |row| row.get(0),
    )
    .ok()
}

/// Write raw JSON text under `key`, replacing any previous value.
pub fn set_raw(conn: &Connection, key: &str, value: &str) -> Result<(), String> {
    conn.execute(
        "INSERT INTO kv_store (key, value, updated_at)
         VALUES (?1, ?2, datetime('now'))
         ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = excluded.updated_at",
        params![key, value],
    )
    .map_err(|e| format!("kv set {key}: {e}"))?;
    Ok(())
}

/// Delete the slot under `key`. Silently succeeds if it does not exist.
pub fn remove_raw(conn: &Connection, key: &str) -> Result<(), String> {
    conn.execute("DELETE FROM kv_store WHERE key = ?1", params![key])
        .map_err(|e| format!("kv remove {key}: {e}"))?;
    Ok(())
}

/// List all slot keys starting with `prefix`, in ascending key order.
pub fn keys_with_prefix(conn: &Connection, prefix: &str) -> Result<Vec<String>, String> {
    let pattern = format!("{}%", prefix.replace('%', "\\%").replace('_', "\\_"));
    let mut stmt = conn
        .prepare("SELECT key FROM kv_store WHERE key LIKE ?1 ESCAPE '\\' ORDER BY key ASC")
        .map_err(|e| format!("prepare key scan: {e}"))?;
    let rows = stmt
        .query_map(params![pattern], |row| row.get::<_, String>(0))
        .map_err(|e| format!("key scan: {e}"))?;
    Ok(rows.filter_map(|r| r.ok()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().expect("open in-memory db");
        run_migrations_for_test(&conn);
        conn
    }

    #[test]
    fn set_get_remove_round_trip() {
        let conn = test_conn();

        assert_eq!(get_raw(&conn, "barTables"), None);
        set_raw(&conn, "barTables", "[1,2,3]").unwrap();
        assert_eq!(get_raw(&conn, "barTables").as_deref(), Some("[1,2,3]"));

        set_raw(&conn, "barTables", "[]").unwrap();
        assert_eq!(get_raw(&conn, "barTables").as_deref(), Some("[]"));

        remove_raw(&conn, "barTables").unwrap();
        assert_eq!(get_raw(&conn, "barTables"), None);
        // Removing a missing key is not an error
        remove_raw(&conn, "barTables").unwrap();
    }

    #[test]
    fn prefix_scan_ignores_other_keys() {
        let conn = test_conn();
        set_raw(&conn, "backup_100", "{}").unwrap();
        set_raw(&conn, "backup_200", "{}").unwrap();
        set_raw(&conn, "barTables", "[]").unwrap();

        let keys = keys_with_prefix(&conn, "backup_").unwrap();
        assert_eq!(
            keys,
            vec!["backup_100".to_string(), "backup_200".to_string()]
        );
    }

    #[test]
    fn migrations_are_idempotent() {
        let conn = test_conn();
        run_migrations(&conn).unwrap();
        let version: i32 = conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(version, CURRENT_SCHEMA_VERSION);
    }
}
