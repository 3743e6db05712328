use clap::Args;
use ipteam::database::{
    DatabaseConn, IpteamDatabase, RangeStore, SchemaManager, SchemaStatus, SCHEMA_VERSION,
};
use ipteam::lens::utils::{format_json_value, OutputFormat};
use ipteam::IpteamConfig;
use serde::Serialize;
use std::path::Path;

/// Arguments for the Config command
#[derive(Args)]
pub struct ConfigArgs {
    /// Include per-team counts
    #[clap(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Serialize)]
struct ConfigInfo {
    config_file: String,
    data_dir: String,
    database: DatabaseInfo,
}

#[derive(Debug, Serialize)]
struct DatabaseInfo {
    path: String,
    exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    size_bytes: Option<u64>,
    schema_initialized: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    schema_version: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    range_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    team_count: Option<usize>,
}

pub fn run(config: &IpteamConfig, args: ConfigArgs, output_format: OutputFormat) {
    let ConfigArgs { verbose } = args;

    let sqlite_path = config.sqlite_path();
    let sqlite_exists = Path::new(&sqlite_path).exists();
    let sqlite_size = if sqlite_exists {
        std::fs::metadata(&sqlite_path).ok().map(|m| m.len())
    } else {
        None
    };

    // Inspect the schema before opening through IpteamDatabase, which would
    // initialize or migrate it
    let (schema_initialized, schema_version, range_count, team_count) = if sqlite_exists {
        match schema_status(&sqlite_path) {
            Some((initialized, version)) if initialized && version == Some(SCHEMA_VERSION) => {
                match IpteamDatabase::open(&sqlite_path) {
                    Ok(db) => {
                        let repo = db.ranges();
                        let count = repo.count().ok();
                        let teams = if verbose {
                            repo.team_summaries().ok().map(|t| t.len())
                        } else {
                            None
                        };
                        (true, version, count, teams)
                    }
                    Err(_) => (initialized, version, None, None),
                }
            }
            Some((initialized, version)) => (initialized, version, None, None),
            None => (false, None, None, None),
        }
    } else {
        (false, None, None, None)
    };

    let info = ConfigInfo {
        config_file: IpteamConfig::config_file_path(),
        data_dir: config.data_dir.clone(),
        database: DatabaseInfo {
            path: sqlite_path,
            exists: sqlite_exists,
            size_bytes: sqlite_size,
            schema_initialized,
            schema_version,
            range_count,
            team_count,
        },
    };

    if output_format.is_json() {
        println!("{}", format_json_value(&info, output_format));
        return;
    }

    println!("{}", config.summary());
    println!();
    println!("Database:");
    println!("  Exists:             {}", info.database.exists);
    if let Some(size) = info.database.size_bytes {
        println!("  Size:               {} bytes", size);
    }
    match info.database.schema_version {
        Some(v) => println!("  Schema Version:     {}", v),
        None => println!("  Schema Version:     not initialized"),
    }
    if let Some(count) = info.database.range_count {
        println!("  Ranges:             {}", count);
    }
    if let Some(count) = info.database.team_count {
        println!("  Teams:              {}", count);
    }
}

/// Read schema status without modifying the database
fn schema_status(path: &str) -> Option<(bool, Option<u32>)> {
    let conn = DatabaseConn::open_path(path).ok()?;
    let manager = SchemaManager::new(&conn.conn);
    match manager.check_status().ok()? {
        SchemaStatus::Current => Some((true, Some(SCHEMA_VERSION))),
        SchemaStatus::NeedsMigration { from, .. } => Some((true, Some(from))),
        SchemaStatus::Incompatible {
            database_version, ..
        } => Some((true, Some(database_version))),
        SchemaStatus::NotInitialized | SchemaStatus::Corrupted => Some((false, None)),
    }
}
