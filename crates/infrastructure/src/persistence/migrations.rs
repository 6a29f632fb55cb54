//! Database migrations
//!
//! Schema versions are tracked in the `schema_version` table and applied in
//! order on startup. All tables are append-only.

use rusqlite::Connection;
use tracing::{debug, error, info};

use super::connection::DatabaseError;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 2;

/// Run all pending migrations
///
/// # Errors
///
/// Returns an error if a migration statement fails.
pub fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    let current_version = schema_version(conn)?;

    if current_version >= SCHEMA_VERSION {
        debug!(version = current_version, "Database schema is up to date");
        return Ok(());
    }

    info!(
        from_version = current_version,
        to_version = SCHEMA_VERSION,
        "Running database migrations"
    );

    let steps: [(i32, &str, fn(&Connection) -> Result<(), DatabaseError>); 2] = [
        (1, "initial schema", migrate_v1),
        (2, "visit results", migrate_v2),
    ];

    for (version, name, migrate) in steps {
        if current_version < version {
            if let Err(e) = migrate(conn) {
                error!(version, migration = name, error = %e, "Migration failed");
                return Err(e);
            }
        }
    }

    set_schema_version(conn, SCHEMA_VERSION)?;
    info!(version = SCHEMA_VERSION, "Database migrations complete");
    Ok(())
}

/// Current schema version, 0 for a fresh database
///
/// # Errors
///
/// Returns an error if the version table cannot be created or read.
pub fn schema_version(conn: &Connection) -> Result<i32, DatabaseError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;

    Ok(version)
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Version 1: credentials, requests and their case data
fn migrate_v1(conn: &Connection) -> Result<(), DatabaseError> {
    debug!("Applying migration V001: initial schema");

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS api_credentials (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            provider TEXT NOT NULL,
            api_key TEXT,
            client_id TEXT,
            client_secret TEXT,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS user_requests (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            latitude REAL NOT NULL,
            longitude REAL NOT NULL,
            search_input TEXT NOT NULL,
            search_radius INTEGER NOT NULL,
            visit_datetime TEXT NOT NULL,
            result_limit INTEGER NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS region_case_data (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            request_id INTEGER NOT NULL UNIQUE,
            region_name TEXT NOT NULL,
            county TEXT NOT NULL,
            cases INTEGER NOT NULL,
            deaths INTEGER NOT NULL,
            cases7_per_100k REAL NOT NULL,
            FOREIGN KEY (request_id) REFERENCES user_requests(id)
        );

        CREATE INDEX IF NOT EXISTS idx_credentials_provider ON api_credentials(provider);
        CREATE INDEX IF NOT EXISTS idx_requests_created ON user_requests(created_at);
        ",
    )?;

    Ok(())
}

/// Version 2: venues produced by each request
fn migrate_v2(conn: &Connection) -> Result<(), DatabaseError> {
    debug!("Applying migration V002: visit results");

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS visit_results (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            request_id INTEGER NOT NULL,
            venue_id TEXT NOT NULL,
            venue_name TEXT NOT NULL,
            kind TEXT NOT NULL CHECK(kind IN ('exact', 'suggestion')),
            FOREIGN KEY (request_id) REFERENCES user_requests(id)
        );

        CREATE INDEX IF NOT EXISTS idx_results_request ON visit_results(request_id);
        ",
    )?;

    Ok(())
}
