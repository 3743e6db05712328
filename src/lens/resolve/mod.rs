//! Team resolution lens
//!
//! Answers "which team owns this address?" and "which teams own ranges
//! overlapping this address, range or CIDR block?".
//!
//! Single-address lookups are first-match: among all stored ranges containing
//! the address, the one with the lowest id wins. Overlapping ranges from
//! different teams are never merged, so range and CIDR queries report every
//! team involved.

pub mod types;

pub use types::{TeamQueryResult, TeamQueryRow};

use crate::addr::{parse_dotted_quad, parse_ip_input, ParsedEntry};
use crate::database::RangeStore;
use crate::error::RangeError;
use crate::lens::utils::OutputFormat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::net::Ipv4Addr;
use tracing::debug;

/// Arguments for a team query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
pub struct TeamQueryArgs {
    /// Addresses, ranges or CIDR blocks to resolve
    #[cfg_attr(feature = "cli", clap(required = true, value_name = "ENTRY"))]
    #[serde(default)]
    pub entries: Vec<String>,
}

impl TeamQueryArgs {
    pub fn new(entry: impl Into<String>) -> Self {
        Self {
            entries: vec![entry.into()],
        }
    }

    pub fn input_text(&self) -> String {
        self.entries.join("\n")
    }
}

/// Team resolution lens
///
/// # Example
///
/// ```rust,ignore
/// use ipteam::database::IpteamDatabase;
/// use ipteam::lens::resolve::ResolveLens;
///
/// let db = IpteamDatabase::open_in_dir("~/.ipteam")?;
/// let repo = db.ranges();
/// let lens = ResolveLens::new(&repo);
///
/// if let Some(team) = lens.get_team_by_ip("192.168.100.25")? {
///     println!("owned by {}", team);
/// }
/// ```
pub struct ResolveLens<'a, S: RangeStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: RangeStore + ?Sized> ResolveLens<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Team of the first stored range containing `ip`, if any.
    ///
    /// Fails with `InvalidAddress` when `ip` is not a dotted quad.
    pub fn get_team_by_ip(&self, ip: &str) -> Result<Option<String>, RangeError> {
        let address = parse_dotted_quad(ip.trim())?;
        self.team_for_address(address)
    }

    /// Numeric form of [`Self::get_team_by_ip`]
    pub fn team_for_address(&self, address: u32) -> Result<Option<String>, RangeError> {
        let found = self.store.find_first_containing(address)?;
        debug!(
            "resolved {} to {:?}",
            Ipv4Addr::from(address),
            found.as_ref().map(|r| r.id)
        );
        Ok(found.map(|r| r.team))
    }

    /// Distinct teams owning a range that intersects `[start, end]`
    pub fn overlapping_teams(&self, start: u32, end: u32) -> Result<BTreeSet<String>, RangeError> {
        Ok(self
            .store
            .find_overlapping(start, end)?
            .into_iter()
            .map(|r| r.team)
            .collect())
    }

    /// Resolve every entry of a free-form specification, in input order.
    ///
    /// Only store failures are returned as errors; malformed entries come
    /// back as [`TeamQueryResult::Invalid`].
    pub fn get_teams_by_ip_input(&self, text: &str) -> Result<Vec<TeamQueryResult>, RangeError> {
        parse_ip_input(text)
            .iter()
            .map(|entry| self.resolve_entry(entry))
            .collect()
    }

    pub fn query(&self, args: &TeamQueryArgs) -> Result<Vec<TeamQueryResult>, RangeError> {
        self.get_teams_by_ip_input(&args.input_text())
    }

    fn resolve_entry(&self, entry: &ParsedEntry) -> Result<TeamQueryResult, RangeError> {
        Ok(match entry {
            ParsedEntry::Single { text, address } => TeamQueryResult::Single {
                input: text.clone(),
                address: Ipv4Addr::from(*address),
                team: self.team_for_address(*address)?,
            },
            ParsedEntry::Range { text, start, end } => TeamQueryResult::Range {
                input: text.clone(),
                start: Ipv4Addr::from(*start),
                end: Ipv4Addr::from(*end),
                overlapping_teams: self.overlapping_teams(*start, *end)?,
            },
            ParsedEntry::Cidr { text, start, end } => TeamQueryResult::Cidr {
                input: text.clone(),
                start: Ipv4Addr::from(*start),
                end: Ipv4Addr::from(*end),
                overlapping_teams: self.overlapping_teams(*start, *end)?,
            },
            ParsedEntry::Invalid { reason, .. } => TeamQueryResult::invalid(entry, reason),
        })
    }

    /// Format query results
    #[cfg(feature = "display")]
    pub fn format_results(&self, results: &[TeamQueryResult], format: OutputFormat) -> String {
        use crate::lens::utils::{format_json, format_table};

        if format.is_json() {
            return format_json(results, format);
        }
        let rows: Vec<TeamQueryRow> = results.iter().map(TeamQueryRow::from).collect();
        format_table(&rows, format)
    }

    /// Format query results
    #[cfg(not(feature = "display"))]
    pub fn format_results(&self, results: &[TeamQueryResult], format: OutputFormat) -> String {
        crate::lens::utils::format_json(results, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::IpteamDatabase;

    fn ip(text: &str) -> u32 {
        parse_dotted_quad(text).unwrap()
    }

    #[test]
    fn test_get_team_by_ip() {
        let db = IpteamDatabase::open_in_memory().unwrap();
        let repo = db.ranges();
        repo.add_ip_range(ip("192.168.100.1"), ip("192.168.100.50"), "T")
            .unwrap();
        let lens = ResolveLens::new(&repo);

        assert_eq!(
            lens.get_team_by_ip("192.168.100.25").unwrap().as_deref(),
            Some("T")
        );
        assert_eq!(
            lens.get_team_by_ip("192.168.100.1").unwrap().as_deref(),
            Some("T")
        );
        assert_eq!(
            lens.get_team_by_ip("192.168.100.50").unwrap().as_deref(),
            Some("T")
        );
        assert_eq!(lens.get_team_by_ip("192.168.100.51").unwrap(), None);
        assert_eq!(lens.get_team_by_ip("10.0.0.1").unwrap(), None);
    }

    #[test]
    fn test_get_team_by_ip_invalid() {
        let db = IpteamDatabase::open_in_memory().unwrap();
        let repo = db.ranges();
        let lens = ResolveLens::new(&repo);

        assert!(matches!(
            lens.get_team_by_ip("not-an-ip"),
            Err(RangeError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_first_match_on_overlap() {
        let db = IpteamDatabase::open_in_memory().unwrap();
        let repo = db.ranges();
        repo.add_ip_range_from_cidr("10.0.0.0/8", "first").unwrap();
        repo.add_ip_range_from_cidr("10.1.0.0/16", "second").unwrap();
        let lens = ResolveLens::new(&repo);

        assert_eq!(
            lens.get_team_by_ip("10.1.2.3").unwrap().as_deref(),
            Some("first")
        );
    }

    #[test]
    fn test_cidr_query_overlap() {
        let db = IpteamDatabase::open_in_memory().unwrap();
        let repo = db.ranges();
        repo.add_ip_range_from_cidr("10.50.0.0/24", "T").unwrap();
        let lens = ResolveLens::new(&repo);

        let results = lens.get_teams_by_ip_input("10.50.0.0/28").unwrap();
        assert_eq!(results.len(), 1);
        match &results[0] {
            TeamQueryResult::Cidr {
                overlapping_teams, ..
            } => {
                assert_eq!(overlapping_teams.len(), 1);
                assert!(overlapping_teams.contains("T"));
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_range_query_collects_distinct_teams() {
        let db = IpteamDatabase::open_in_memory().unwrap();
        let repo = db.ranges();
        repo.add_ip_range(ip("10.0.0.0"), ip("10.0.0.99"), "red")
            .unwrap();
        repo.add_ip_range(ip("10.0.0.100"), ip("10.0.0.199"), "blue")
            .unwrap();
        repo.add_ip_range(ip("10.0.0.150"), ip("10.0.0.160"), "red")
            .unwrap();
        repo.add_ip_range(ip("10.0.1.0"), ip("10.0.1.255"), "green")
            .unwrap();
        let lens = ResolveLens::new(&repo);

        let results = lens
            .get_teams_by_ip_input("10.0.0.50-10.0.0.155")
            .unwrap();
        assert_eq!(results[0].kind(), "range");
        assert_eq!(results[0].teams(), vec!["blue", "red"]);

        let results = lens.get_teams_by_ip_input("10.0.2.0-10.0.2.255").unwrap();
        assert!(results[0].teams().is_empty());
    }

    #[test]
    fn test_mixed_query() {
        let db = IpteamDatabase::open_in_memory().unwrap();
        let repo = db.ranges();
        repo.add_ip_range_from_cidr("172.16.0.0/16", "infra").unwrap();
        let lens = ResolveLens::new(&repo);

        let args = TeamQueryArgs::new("172.16.3.4, 8.8.8.8 172.16.0.0/12 999.1.1.1");
        let results = lens.query(&args).unwrap();
        let kinds: Vec<&str> = results.iter().map(|r| r.kind()).collect();
        assert_eq!(kinds, vec!["single", "single", "cidr", "invalid"]);
        assert_eq!(results[0].teams(), vec!["infra"]);
        assert!(results[1].teams().is_empty());
        assert_eq!(results[2].teams(), vec!["infra"]);
        assert_eq!(results[3].input(), "999.1.1.1");
    }

    #[test]
    fn test_result_json_shape() {
        let db = IpteamDatabase::open_in_memory().unwrap();
        let repo = db.ranges();
        repo.add_ip_range_from_cidr("10.50.0.0/24", "T").unwrap();
        let lens = ResolveLens::new(&repo);

        let results = lens
            .get_teams_by_ip_input("10.50.0.7 10.50.0.0/28 junk")
            .unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&lens.format_results(&results, OutputFormat::Json)).unwrap();

        assert_eq!(json[0]["type"], "single");
        assert_eq!(json[0]["address"], "10.50.0.7");
        assert_eq!(json[0]["team"], "T");
        assert_eq!(json[1]["type"], "cidr");
        assert_eq!(json[1]["start"], "10.50.0.0");
        assert_eq!(json[1]["end"], "10.50.0.15");
        assert_eq!(json[1]["overlapping_teams"], serde_json::json!(["T"]));
        assert_eq!(json[2]["type"], "invalid");
        assert_eq!(json[2]["input"], "junk");
    }

    #[cfg(feature = "display")]
    #[test]
    fn test_format_psv() {
        let db = IpteamDatabase::open_in_memory().unwrap();
        let repo = db.ranges();
        repo.add_ip_range_from_cidr("10.50.0.0/24", "T").unwrap();
        let lens = ResolveLens::new(&repo);

        let results = lens.get_teams_by_ip_input("10.50.0.7 1.1.1.1").unwrap();
        let output = lens.format_results(&results, OutputFormat::Psv);
        assert_eq!(
            output,
            "input|type|teams\n10.50.0.7|single|T\n1.1.1.1|single|-"
        );
    }
}
