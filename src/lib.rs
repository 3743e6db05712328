#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! ipteam - IPv4 range to team attribution
//!
//! ipteam ingests free-form IP specifications (single addresses, `start-end`
//! ranges and CIDR blocks in any mix), stores them as team-owned ranges and
//! answers two questions: which team owns an address, and which teams own
//! ranges overlapping an address, range or CIDR block.
//!
//! # Feature Flags
//!
//! | Feature | Description | Key Dependencies |
//! |---------|-------------|------------------|
//! | (none) | Parsing, SQLite store, lenses with JSON output | `rusqlite`, `ipnet` |
//! | `display` | Table and PSV output | `tabled` |
//! | `cli` | The `ipteam` binary | `clap`, `tracing-subscriber` |
//!
//! # Architecture
//!
//! - **[`addr`]**: dotted-quad/CIDR conversions and the input tokenizer
//! - **[`database`]**: SQLite connection, schema and the [`RangeStore`] contract
//! - **[`lens`]**: ingestion, resolution and inventory operations
//! - **[`config`]**: configuration management
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use ipteam::database::IpteamDatabase;
//! use ipteam::lens::ingest::IngestLens;
//! use ipteam::lens::resolve::ResolveLens;
//!
//! let db = IpteamDatabase::open_in_dir("~/.ipteam")?;
//! let repo = db.ranges();
//!
//! let report = IngestLens::new(&repo)
//!     .add_ip_list_to_team("10.20.1.1 10.20.2.1-10.20.2.5, 10.50.0.0/24", "Network Ops");
//! println!("added {} addresses, {} errors", report.added, report.errors.len());
//!
//! let resolver = ResolveLens::new(&repo);
//! assert_eq!(resolver.get_team_by_ip("10.50.0.9")?.as_deref(), Some("Network Ops"));
//! ```

pub mod addr;
pub mod config;
pub mod database;
pub mod error;
pub mod lens;

pub use config::IpteamConfig;
pub use error::RangeError;

pub use addr::{
    cidr_to_range, format_dotted_quad, parse_dotted_quad, parse_ip_input,
    range_to_cidr_if_aligned, ParsedEntry,
};

pub use database::{
    DatabaseConn, IpRange, IpRangeRepository, IpteamDatabase, RangeStore, SchemaDefinitions,
    SchemaManager, SchemaStatus, TeamSummary, SCHEMA_VERSION,
};

pub use lens::ingest::{IngestLens, IngestReport};
pub use lens::inventory::InventoryLens;
pub use lens::resolve::{ResolveLens, TeamQueryResult};
pub use lens::utils::OutputFormat;
