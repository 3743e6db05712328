//! Bulk ingestion arguments and report types

use crate::error::RangeError;
use serde::{Deserialize, Serialize};

/// Arguments for a bulk ingestion
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
pub struct IngestArgs {
    /// Team that will own the ingested ranges
    #[cfg_attr(feature = "cli", clap(short, long))]
    pub team: String,

    /// Addresses, ranges (a.b.c.d-e.f.g.h) or CIDR blocks, separated by spaces or commas
    #[cfg_attr(feature = "cli", clap(value_name = "ENTRY"))]
    #[serde(default)]
    pub entries: Vec<String>,
}

impl IngestArgs {
    pub fn new(team: impl Into<String>, entry: impl Into<String>) -> Self {
        Self {
            team: team.into(),
            entries: vec![entry.into()],
        }
    }

    pub fn with_entry(mut self, entry: impl Into<String>) -> Self {
        self.entries.push(entry.into());
        self
    }

    /// All entries joined into one specification string
    pub fn input_text(&self) -> String {
        self.entries.join("\n")
    }
}

/// Outcome of a bulk ingestion
///
/// `success` is true when at least one entry was stored. `errors` lists every
/// rejected entry whether or not the overall call succeeded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    pub success: bool,
    /// Number of addresses covered by the stored entries
    pub added: u64,
    pub errors: Vec<String>,
    /// Number of records written
    #[serde(default)]
    pub ranges_created: usize,
}

impl IngestReport {
    /// Report for a call rejected before any entry was examined
    pub fn rejected(err: RangeError) -> Self {
        Self {
            success: false,
            added: 0,
            errors: vec![err.to_string()],
            ranges_created: 0,
        }
    }
}
