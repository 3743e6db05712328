//! Bulk ingestion lens
//!
//! Applies a free-form IP specification to the store on behalf of one team.
//! Every entry is written independently: a rejected entry is recorded in the
//! report and processing continues, and entries written before a failure stay
//! written. There is no surrounding transaction.

pub mod types;

pub use types::{IngestArgs, IngestReport};

use crate::addr::{parse_ip_input, ParsedEntry};
use crate::database::RangeStore;
use crate::error::RangeError;
use crate::lens::utils::OutputFormat;
use tracing::{info, warn};

/// Bulk ingestion lens
///
/// # Example
///
/// ```rust,ignore
/// use ipteam::database::IpteamDatabase;
/// use ipteam::lens::ingest::IngestLens;
///
/// let db = IpteamDatabase::open_in_memory()?;
/// let repo = db.ranges();
/// let lens = IngestLens::new(&repo);
///
/// let report = lens.add_ip_list_to_team("10.20.1.1 10.20.2.1-10.20.2.5", "Network Ops");
/// assert_eq!(report.added, 6);
/// ```
pub struct IngestLens<'a, S: RangeStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: RangeStore + ?Sized> IngestLens<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Run an ingestion described by `args`
    pub fn ingest(&self, args: &IngestArgs) -> IngestReport {
        self.add_ip_list_to_team(&args.input_text(), &args.team)
    }

    /// Parse `list_text` and add every valid entry to `team`.
    ///
    /// `added` counts addresses, not entries: a `/24` adds 256.
    pub fn add_ip_list_to_team(&self, list_text: &str, team: &str) -> IngestReport {
        let entries = parse_ip_input(list_text);
        if entries.is_empty() {
            return IngestReport::rejected(RangeError::EmptyInput);
        }
        if team.trim().is_empty() {
            return IngestReport::rejected(RangeError::EmptyTeam);
        }

        let mut report = IngestReport::default();

        for entry in entries {
            let result = match &entry {
                ParsedEntry::Invalid { text, reason } => {
                    warn!("skipping invalid entry '{}': {}", text, reason);
                    report
                        .errors
                        .push(format!("invalid entry '{}': {}", text, reason));
                    continue;
                }
                ParsedEntry::Single { address, .. } => {
                    self.store.add_ip_range(*address, *address, team)
                }
                ParsedEntry::Range { start, end, .. } => self.store.add_ip_range(*start, *end, team),
                ParsedEntry::Cidr { text, .. } => self.store.add_ip_range_from_cidr(text, team),
            };

            match result {
                Ok(_) => {
                    report.added += entry.address_count();
                    report.ranges_created += 1;
                }
                Err(e) => {
                    warn!("failed to add '{}' for team '{}': {}", entry.text(), team, e);
                    report
                        .errors
                        .push(format!("failed to add '{}': {}", entry.text(), e));
                }
            }
        }

        report.success = report.ranges_created > 0;
        info!(
            "ingested {} ranges ({} addresses) for team '{}', {} errors",
            report.ranges_created,
            report.added,
            team.trim(),
            report.errors.len()
        );
        report
    }

    /// Format an ingestion report
    #[cfg(feature = "display")]
    pub fn format_report(&self, report: &IngestReport, format: OutputFormat) -> String {
        use crate::lens::utils::format_json_value;

        if format.is_json() {
            return format_json_value(report, format);
        }

        let mut lines = vec![format!(
            "{} {} addresses in {} ranges",
            if report.success { "Added" } else { "Nothing added:" },
            report.added,
            report.ranges_created
        )];
        for err in &report.errors {
            lines.push(format!("  error: {}", err));
        }
        lines.join("\n")
    }

    /// Format an ingestion report
    #[cfg(not(feature = "display"))]
    pub fn format_report(&self, report: &IngestReport, format: OutputFormat) -> String {
        crate::lens::utils::format_json_value(report, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::IpteamDatabase;

    #[test]
    fn test_singles_count_one_each() {
        let db = IpteamDatabase::open_in_memory().unwrap();
        let repo = db.ranges();
        let lens = IngestLens::new(&repo);

        let report = lens.add_ip_list_to_team("172.16.1.10 172.16.1.20 172.16.1.30", "T");
        assert!(report.success);
        assert_eq!(report.added, 3);
        assert!(report.errors.is_empty());
        assert_eq!(repo.count().unwrap(), 3);
    }

    #[test]
    fn test_range_counts_addresses() {
        let db = IpteamDatabase::open_in_memory().unwrap();
        let repo = db.ranges();
        let lens = IngestLens::new(&repo);

        let report = lens.add_ip_list_to_team("10.20.1.1 10.20.2.1-10.20.2.5 10.20.3.1", "T");
        assert!(report.success);
        assert_eq!(report.added, 7);
        assert_eq!(report.ranges_created, 3);
    }

    #[test]
    fn test_cidr_counts_addresses() {
        let db = IpteamDatabase::open_in_memory().unwrap();
        let repo = db.ranges();
        let lens = IngestLens::new(&repo);

        let report = lens.add_ip_list_to_team("10.0.0.0/24,10.1.0.0/30", "T");
        assert_eq!(report.added, 260);
        assert_eq!(repo.count().unwrap(), 2);
    }

    #[test]
    fn test_invalid_entry_does_not_abort() {
        let db = IpteamDatabase::open_in_memory().unwrap();
        let repo = db.ranges();
        let lens = IngestLens::new(&repo);

        let report = lens.add_ip_list_to_team("256.256.256.256 192.168.1.1", "T");
        assert!(report.success);
        assert_eq!(report.added, 1);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("256.256.256.256"));
    }

    #[test]
    fn test_only_invalid_entries() {
        let db = IpteamDatabase::open_in_memory().unwrap();
        let repo = db.ranges();
        let lens = IngestLens::new(&repo);

        let report = lens.add_ip_list_to_team("nope 10.0.0.0/99 10.0.0.5-10.0.0.1", "T");
        assert!(!report.success);
        assert_eq!(report.added, 0);
        assert_eq!(report.errors.len(), 3);
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_empty_input() {
        let db = IpteamDatabase::open_in_memory().unwrap();
        let repo = db.ranges();
        let lens = IngestLens::new(&repo);

        for text in ["", "   ", "\n\n", ",,,", " , \t,\n"] {
            let report = lens.add_ip_list_to_team(text, "T");
            assert!(!report.success);
            assert_eq!(report.added, 0);
            assert_eq!(report.errors, vec!["empty input".to_string()]);
        }
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_blank_team_rejected() {
        let db = IpteamDatabase::open_in_memory().unwrap();
        let repo = db.ranges();
        let lens = IngestLens::new(&repo);

        let report = lens.add_ip_list_to_team("10.0.0.1", " ");
        assert!(!report.success);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_ingest_args() {
        let db = IpteamDatabase::open_in_memory().unwrap();
        let repo = db.ranges();
        let lens = IngestLens::new(&repo);

        let args = IngestArgs::new("infra", "10.0.0.1").with_entry("10.0.0.2-10.0.0.3");
        let report = lens.ingest(&args);
        assert_eq!(report.added, 3);
        assert_eq!(repo.get_ip_ranges_by_team("infra").unwrap().len(), 2);
    }

    #[test]
    fn test_format_report_json() {
        let db = IpteamDatabase::open_in_memory().unwrap();
        let repo = db.ranges();
        let lens = IngestLens::new(&repo);

        let report = lens.add_ip_list_to_team("10.0.0.1 bad", "T");
        let json: serde_json::Value =
            serde_json::from_str(&lens.format_report(&report, OutputFormat::Json)).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["added"], 1);
        assert_eq!(json["errors"].as_array().unwrap().len(), 1);
    }
}
