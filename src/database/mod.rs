//! Database module
//!
//! ```text
//! database/
//! ├── core/       # Foundation
//! │   ├── connection  # SQLite DatabaseConn wrapper
//! │   └── schema      # schema definitions and version management
//! │
//! └── ranges/     # Team-owned IP ranges
//!     ├── RangeStore       # persistence contract used by the lenses
//!     └── IpRangeRepository  # SQLite implementation
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use ipteam::database::{IpteamDatabase, RangeStore};
//!
//! let db = IpteamDatabase::open_in_dir("~/.ipteam")?;
//! let id = db.ranges().add_ip_range_from_cidr("10.50.0.0/24", "Network Ops")?;
//! let record = db.ranges().get_ip_range_by_id(id)?;
//! ```

pub mod core;
pub mod ranges;

pub use core::{DatabaseConn, SchemaDefinitions, SchemaManager, SchemaStatus, SCHEMA_VERSION};
pub use ranges::{validate_range, IpRange, IpRangeRepository, RangeStore, TeamSummary};

use anyhow::{anyhow, Result};
use tracing::info;

/// Default database file name inside the data directory
pub const DEFAULT_DATABASE_FILE: &str = "ipteam-data.sqlite3";

/// Main ipteam database (SQLite backend)
///
/// Opens or creates the database file, checks the schema version and hands
/// out the range repository.
pub struct IpteamDatabase {
    db: DatabaseConn,
}

impl IpteamDatabase {
    /// Open the database at the specified path
    ///
    /// A missing database is created and an older schema is upgraded in place.
    /// A database written by a newer schema version is refused so its ranges
    /// are never touched. A schema with missing tables is rebuilt.
    pub fn open(path: &str) -> Result<Self> {
        let db = DatabaseConn::open_path(path)?;
        let schema = SchemaManager::new(&db.conn);

        match schema.check_status()? {
            SchemaStatus::Current => {
                info!("ipteam database schema is current");
            }
            SchemaStatus::NotInitialized => {
                info!("initializing ipteam database schema at {}", path);
                schema.initialize()?;
            }
            SchemaStatus::NeedsMigration { from, to } => {
                info!("migrating ipteam database schema from v{} to v{}", from, to);
                schema.initialize()?;
            }
            SchemaStatus::Incompatible {
                database_version,
                required_version,
            } => {
                return Err(anyhow!(
                    "database {} uses schema v{}, this build supports up to v{}",
                    path,
                    database_version,
                    required_version
                ));
            }
            SchemaStatus::Corrupted => {
                info!("ipteam database schema is missing tables, rebuilding");
                schema.reset()?;
                schema.initialize()?;
            }
        }

        Ok(Self { db })
    }

    /// Open `{data_dir}/ipteam-data.sqlite3`
    pub fn open_in_dir(data_dir: &str) -> Result<Self> {
        ensure_data_dir(data_dir)?;
        let path = format!(
            "{}/{}",
            data_dir.trim_end_matches('/'),
            DEFAULT_DATABASE_FILE
        );
        Self::open(&path)
    }

    /// Create an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let db = DatabaseConn::open_in_memory()?;
        let schema = SchemaManager::new(&db.conn);
        schema.initialize()?;
        Ok(Self { db })
    }

    /// Get the range repository
    pub fn ranges(&self) -> IpRangeRepository<'_> {
        IpRangeRepository::new(&self.db.conn)
    }

    /// Get the underlying database connection
    pub fn connection(&self) -> &rusqlite::Connection {
        &self.db.conn
    }

    pub fn get_meta(&self, key: &str) -> Result<Option<String>> {
        SchemaManager::new(&self.db.conn).get_meta(key)
    }

    pub fn set_meta(&self, key: &str, value: &str) -> Result<()> {
        SchemaManager::new(&self.db.conn).set_meta(key, value)
    }
}

/// Ensure the data directory exists
pub fn ensure_data_dir(data_dir: &str) -> Result<()> {
    std::fs::create_dir_all(data_dir)
        .map_err(|e| anyhow!("Failed to create data directory '{}': {}", data_dir, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let db = IpteamDatabase::open_in_memory().unwrap();
        assert_eq!(db.ranges().count().unwrap(), 0);
    }

    #[test]
    fn test_meta_operations() {
        let db = IpteamDatabase::open_in_memory().unwrap();

        db.set_meta("test_key", "test_value").unwrap();
        let value = db.get_meta("test_key").unwrap();
        assert_eq!(value, Some("test_value".to_string()));
    }

    #[test]
    fn test_reopen_keeps_ranges() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().to_str().unwrap();

        {
            let db = IpteamDatabase::open_in_dir(data_dir).unwrap();
            db.ranges().add_ip_range(1, 10, "persist").unwrap();
        }

        let db = IpteamDatabase::open_in_dir(data_dir).unwrap();
        let all = db.ranges().get_all_ip_ranges().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].team, "persist");
    }

    #[test]
    fn test_newer_schema_is_refused_and_ranges_kept() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().to_str().unwrap();

        {
            let db = IpteamDatabase::open_in_dir(data_dir).unwrap();
            db.ranges().add_ip_range(1, 10, "kept").unwrap();
            db.set_meta("schema_version", &(SCHEMA_VERSION + 1).to_string())
                .unwrap();
        }

        assert!(IpteamDatabase::open_in_dir(data_dir).is_err());

        // restore the version and confirm nothing was dropped
        let path = format!("{}/{}", data_dir, DEFAULT_DATABASE_FILE);
        let conn = DatabaseConn::open_path(&path).unwrap();
        SchemaManager::new(&conn.conn)
            .set_meta("schema_version", &SCHEMA_VERSION.to_string())
            .unwrap();
        drop(conn);

        let db = IpteamDatabase::open_in_dir(data_dir).unwrap();
        assert_eq!(db.ranges().count().unwrap(), 1);
    }

    #[test]
    fn test_older_schema_is_migrated_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().to_str().unwrap();

        {
            let db = IpteamDatabase::open_in_dir(data_dir).unwrap();
            db.ranges().add_ip_range(1, 10, "kept").unwrap();
            db.set_meta("schema_version", "0").unwrap();
        }

        let db = IpteamDatabase::open_in_dir(data_dir).unwrap();
        assert_eq!(db.ranges().count().unwrap(), 1);
        assert_eq!(
            db.get_meta("schema_version").unwrap(),
            Some(SCHEMA_VERSION.to_string())
        );
    }

    #[test]
    fn test_missing_table_is_rebuilt() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().to_str().unwrap();

        {
            let db = IpteamDatabase::open_in_dir(data_dir).unwrap();
            db.connection().execute("DROP TABLE ip_ranges", []).unwrap();
        }

        let db = IpteamDatabase::open_in_dir(data_dir).unwrap();
        db.ranges().add_ip_range(1, 10, "fresh").unwrap();
        assert_eq!(db.ranges().count().unwrap(), 1);
    }
}
