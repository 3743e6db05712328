//! Database schema management
//!
//! Schema definitions and version tracking for the range database.

use anyhow::{anyhow, Result};
use rusqlite::Connection;
use tracing::info;

/// Current schema version
/// Increment this when making breaking schema changes
pub const SCHEMA_VERSION: u32 = 1;

/// Schema definitions for all tables
pub struct SchemaDefinitions;

impl SchemaDefinitions {
    /// Key/value table tracking the schema version
    pub const META_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS ipteam_meta (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );
    "#;

    /// Team-owned IPv4 ranges, bounds stored as unsigned 32-bit integers
    pub const IP_RANGES_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS ip_ranges (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            start_ip INTEGER NOT NULL CHECK (start_ip BETWEEN 0 AND 4294967295),
            end_ip INTEGER NOT NULL CHECK (end_ip BETWEEN 0 AND 4294967295),
            team TEXT NOT NULL,
            CHECK (start_ip <= end_ip)
        );
    "#;

    pub const IP_RANGES_INDEXES: &'static [&'static str] = &[
        "CREATE INDEX IF NOT EXISTS idx_ip_ranges_bounds ON ip_ranges(start_ip, end_ip)",
        "CREATE INDEX IF NOT EXISTS idx_ip_ranges_team ON ip_ranges(team)",
    ];
}

/// Schema manager
///
/// Handles schema initialization, version checking and resets.
pub struct SchemaManager<'a> {
    conn: &'a Connection,
}

impl<'a> SchemaManager<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create all tables and indexes and record the schema version
    pub fn initialize(&self) -> Result<()> {
        self.conn
            .execute(SchemaDefinitions::META_TABLE, [])
            .map_err(|e| anyhow!("Failed to create meta table: {}", e))?;

        self.set_meta("schema_version", &SCHEMA_VERSION.to_string())?;

        self.conn
            .execute(SchemaDefinitions::IP_RANGES_TABLE, [])
            .map_err(|e| anyhow!("Failed to create ip_ranges table: {}", e))?;

        for index_sql in SchemaDefinitions::IP_RANGES_INDEXES {
            self.conn
                .execute(index_sql, [])
                .map_err(|e| anyhow!("Failed to create ip_ranges index: {}", e))?;
        }

        info!("initialized ipteam schema v{}", SCHEMA_VERSION);
        Ok(())
    }

    /// Check the current schema status
    pub fn check_status(&self) -> Result<SchemaStatus> {
        let meta_exists: i32 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='ipteam_meta'",
                [],
                |row| row.get(0),
            )
            .map_err(|e| anyhow!("Failed to inspect schema: {}", e))?;

        if meta_exists == 0 {
            return Ok(SchemaStatus::NotInitialized);
        }

        let current_version = self.get_schema_version()?;

        if current_version == SCHEMA_VERSION {
            if self.verify_integrity()? {
                Ok(SchemaStatus::Current)
            } else {
                Ok(SchemaStatus::Corrupted)
            }
        } else if current_version < SCHEMA_VERSION {
            Ok(SchemaStatus::NeedsMigration {
                from: current_version,
                to: SCHEMA_VERSION,
            })
        } else {
            Ok(SchemaStatus::Incompatible {
                database_version: current_version,
                required_version: SCHEMA_VERSION,
            })
        }
    }

    fn get_schema_version(&self) -> Result<u32> {
        let version = self.get_meta("schema_version")?.unwrap_or_else(|| "0".to_string());
        version
            .parse()
            .map_err(|e| anyhow!("Invalid schema version: {}", e))
    }

    fn verify_integrity(&self) -> Result<bool> {
        for table in ["ipteam_meta", "ip_ranges"] {
            let exists: i32 = self
                .conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |row| row.get(0),
                )
                .map_err(|e| anyhow!("Failed to inspect schema: {}", e))?;

            if exists == 0 {
                return Ok(false);
            }
        }

        Ok(true)
    }

    pub fn set_meta(&self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO ipteam_meta (key, value, updated_at) VALUES (?1, ?2, strftime('%s', 'now'))",
                [key, value],
            )
            .map_err(|e| anyhow!("Failed to set meta value: {}", e))?;
        Ok(())
    }

    pub fn get_meta(&self, key: &str) -> Result<Option<String>> {
        let result: Result<String, _> = self.conn.query_row(
            "SELECT value FROM ipteam_meta WHERE key = ?1",
            [key],
            |row| row.get(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(anyhow!("Failed to get meta value: {}", e)),
        }
    }

    /// Drop every table. Stored ranges are lost.
    pub fn reset(&self) -> Result<()> {
        self.conn.execute("DROP TABLE IF EXISTS ip_ranges", [])?;
        self.conn.execute("DROP TABLE IF EXISTS ipteam_meta", [])?;
        Ok(())
    }
}

/// Status of the database schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaStatus {
    /// Fresh database
    NotInitialized,

    Current,

    NeedsMigration { from: u32, to: u32 },

    /// Database was written by a newer version
    Incompatible {
        database_version: u32,
        required_version: u32,
    },

    /// Missing tables
    Corrupted,
}
