//! SQLite storage layer
//!
//! One store struct per table (purchases, customers, products), each owning
//! its connection. Connections are opened in WAL mode with foreign keys on
//! and a bounded busy timeout, so concurrent short-lived CLI invocations
//! fail fast with [`StoreError::Busy`] instead of hanging.

mod schema;

pub mod customers;
pub mod products;
pub mod purchases;

pub use customers::{Customer, CustomerDirectory, CustomerInput, CustomerSummary};
pub use products::{Product, ProductCatalog, ProductInput, ProductPatch};
pub use purchases::{
    DailySummary, LedgerOptions, ProductRollup, Purchase, PurchaseLedger, SaleDraft, TrendPoint,
};

use chrono::Local;
use rusqlite::{Connection, ErrorCode};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by the storage layer.
///
/// Busy/locked conditions get their own variant so callers can tell a
/// contended database apart from a broken one. No variant is retried
/// automatically.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database is busy: {0}")]
    Busy(rusqlite::Error),

    #[error("database I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("export failed: {0}")]
    Export(#[from] csv::Error),

    #[error(transparent)]
    Sqlite(rusqlite::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _)
                if e.code == ErrorCode::DatabaseBusy || e.code == ErrorCode::DatabaseLocked =>
            {
                StoreError::Busy(err)
            }
            _ => StoreError::Sqlite(err),
        }
    }
}

/// Open a connection with the pragmas every store relies on.
pub(crate) fn open_connection(path: &Path, busy_timeout: Duration) -> Result<Connection, StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let conn = Connection::open(path)?;
    conn.busy_timeout(busy_timeout)?;
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    Ok(conn)
}

/// Add any column from `required` that the table does not have yet.
///
/// Existence check and ALTER statements run in one transaction so a reader
/// never sees a half-migrated table. Safe to run on every start.
pub(crate) fn ensure_columns(
    conn: &mut Connection,
    table: &str,
    required: &[(&str, &str)],
) -> Result<(), StoreError> {
    let tx = conn.transaction()?;

    let existing: HashSet<String> = {
        let mut stmt = tx.prepare(&format!("PRAGMA table_info({table})"))?;
        let names = stmt.query_map([], |row| row.get::<_, String>(1))?;
        names.collect::<Result<_, _>>()?
    };

    for (name, col_type) in required {
        if !existing.contains(*name) {
            tx.execute_batch(&format!("ALTER TABLE {table} ADD COLUMN {name} {col_type}"))?;
        }
    }

    tx.commit()?;
    Ok(())
}

/// Second-precision local timestamp, the format every table stores.
pub fn now_stamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Today's date component in the same format `date(timestamp)` yields.
pub fn today_label() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_columns_adds_missing_and_is_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE widgets (id INTEGER PRIMARY KEY, name TEXT)")
            .unwrap();

        let required = &[("name", "TEXT"), ("color", "TEXT"), ("weight", "REAL")];
        ensure_columns(&mut conn, "widgets", required).unwrap();
        ensure_columns(&mut conn, "widgets", required).unwrap();

        let mut stmt = conn.prepare("PRAGMA table_info(widgets)").unwrap();
        let cols: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(cols, vec!["id", "name", "color", "weight"]);
    }

    #[test]
    fn busy_errors_are_classified() {
        let err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            Some("database is locked".into()),
        );
        assert!(matches!(StoreError::from(err), StoreError::Busy(_)));
    }
}
