//! Lens module
//!
//! Lenses combine the range store with business logic and output formatting.
//! Each lens borrows any [`crate::database::RangeStore`], so the same code
//! runs against the SQLite repository or another store implementation.
//!
//! | Lens | Purpose |
//! |------|---------|
//! | `IngestLens` | bulk ingestion of free-form IP lists for one team |
//! | `ResolveLens` | single-address and overlap queries |
//! | `InventoryLens` | record management, listings and team summaries |
//!
//! ```rust,ignore
//! use ipteam::lens::ingest::{IngestArgs, IngestLens, IngestReport};
//! use ipteam::lens::resolve::{ResolveLens, TeamQueryArgs, TeamQueryResult};
//! use ipteam::lens::inventory::InventoryLens;
//! ```

pub mod utils;

pub mod ingest;
pub mod inventory;
pub mod resolve;
