//! SQLite inventory database.
//!
//! All hosts share one `packages` table. Storing a scan deletes the host's
//! rows and inserts the new ones inside a single transaction, so readers
//! see either the previous scan or the new one, never a mix.

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::model::{PackageRecord, ScanResult};

pub struct PackageDb {
    conn: Connection,
}

impl PackageDb {
    /// Opens (or creates) the database at `path` in WAL mode.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed creating database dir {}", parent.display()))?;
            }
        }

        let conn = Connection::open(path)
            .with_context(|| format!("failed opening database {}", path.display()))?;
        conn.execute_batch(
            "
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            CREATE TABLE IF NOT EXISTS packages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                version TEXT NOT NULL,
                vendor TEXT NOT NULL,
                install_date TEXT NOT NULL,
                host TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_packages_host ON packages(host);
            ",
        )
        .context("failed initializing database schema")?;

        Ok(Self { conn })
    }

    /// Replaces every stored row for `result.host` with `result.records`.
    pub fn replace_host(&mut self, result: &ScanResult) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let removed = tx.execute("DELETE FROM packages WHERE host = ?1", params![result.host])?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO packages(name, version, vendor, install_date, host) VALUES(?1, ?2, ?3, ?4, ?5)",
            )?;
            for record in &result.records {
                insert.execute(params![
                    record.name,
                    record.version,
                    record.vendor,
                    record.install_date,
                    result.host,
                ])?;
            }
        }
        tx.commit()?;

        debug!(
            host = result.host.as_str(),
            removed,
            inserted = result.records.len(),
            "database rows replaced"
        );
        Ok(result.records.len())
    }

    /// Stored records for `host`, in insertion order.
    pub fn records(&self, host: &str) -> Result<Vec<PackageRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, version, vendor, install_date, host FROM packages WHERE host = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![host], |row| {
            Ok(PackageRecord {
                name: row.get(0)?,
                version: row.get(1)?,
                vendor: row.get(2)?,
                install_date: row.get(3)?,
                host: row.get(4)?,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// Number of stored rows for `host`.
    pub fn count(&self, host: &str) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM packages WHERE host = ?1",
            params![host],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Deletes every stored row and returns how many were removed.
    pub fn clear(&mut self) -> Result<usize> {
        let removed = self.conn.execute("DELETE FROM packages", [])?;
        Ok(removed)
    }
}
