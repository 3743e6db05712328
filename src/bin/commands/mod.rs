pub mod add;
pub mod config;
pub mod import;
pub mod lookup;
pub mod query;
pub mod ranges;
pub mod teams;

use ipteam::database::IpteamDatabase;
use ipteam::IpteamConfig;

/// Open the configured range database, exiting on failure
pub(crate) fn open_database(config: &IpteamConfig) -> IpteamDatabase {
    match IpteamDatabase::open(&config.sqlite_path()) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Failed to open database: {}", e);
            std::process::exit(1);
        }
    }
}

/// Print an error and exit with status 1
pub(crate) fn fail(context: &str, err: impl std::fmt::Display) -> ! {
    eprintln!("ERROR: {}: {}", context, err);
    std::process::exit(1);
}
