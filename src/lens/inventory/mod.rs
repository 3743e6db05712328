//! Range inventory lens
//!
//! Record-level management of stored ranges: add, edit, delete, listing and
//! per-team summaries, plus the table/JSON formatting used by the CLI.

use crate::addr::{format_dotted_quad, parse_dotted_quad};
use crate::database::{IpRange, RangeStore, TeamSummary};
use crate::error::RangeError;
use crate::lens::utils::OutputFormat;
use serde::Serialize;
use tracing::info;

#[cfg(feature = "display")]
use tabled::Tabled;

/// Display row for a stored range
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "display", derive(Tabled))]
pub struct RangeRow {
    pub id: i64,
    pub start_ip: String,
    pub end_ip: String,
    #[cfg_attr(feature = "display", tabled(skip))]
    pub cidr: Option<String>,
    #[serde(skip)]
    #[cfg_attr(feature = "display", tabled(rename = "cidr"))]
    pub cidr_display: String,
    pub addresses: u64,
    pub team: String,
}

impl From<&IpRange> for RangeRow {
    fn from(range: &IpRange) -> Self {
        let cidr = range.cidr();
        Self {
            id: range.id,
            start_ip: format_dotted_quad(range.start),
            end_ip: format_dotted_quad(range.end),
            cidr_display: cidr.clone().unwrap_or_else(|| "-".to_string()),
            cidr,
            addresses: range.size(),
            team: range.team.clone(),
        }
    }
}

/// Display row for a team summary
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "display", derive(Tabled))]
pub struct TeamRow {
    pub team: String,
    pub ranges: u64,
    pub addresses: u64,
}

impl From<&TeamSummary> for TeamRow {
    fn from(summary: &TeamSummary) -> Self {
        Self {
            team: summary.team.clone(),
            ranges: summary.ranges,
            addresses: summary.addresses,
        }
    }
}

/// Range inventory lens
pub struct InventoryLens<'a, S: RangeStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: RangeStore + ?Sized> InventoryLens<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Add `start..=end` given as dotted quads; returns the stored record
    pub fn add_range(&self, start: &str, end: &str, team: &str) -> Result<IpRange, RangeError> {
        let start = parse_dotted_quad(start.trim())?;
        let end = parse_dotted_quad(end.trim())?;
        let id = self.store.add_ip_range(start, end, team)?;
        self.fetch(id)
    }

    /// Add a CIDR block; returns the stored record
    pub fn add_cidr(&self, cidr: &str, team: &str) -> Result<IpRange, RangeError> {
        let id = self.store.add_ip_range_from_cidr(cidr.trim(), team)?;
        self.fetch(id)
    }

    /// Replace bounds and team of an existing record
    pub fn update_range(
        &self,
        id: i64,
        start: &str,
        end: &str,
        team: &str,
    ) -> Result<IpRange, RangeError> {
        let start = parse_dotted_quad(start.trim())?;
        let end = parse_dotted_quad(end.trim())?;
        self.store.update_ip_range(id, start, end, team)?;
        info!("updated range #{}", id);
        self.fetch(id)
    }

    /// Delete a record, returning what was removed
    pub fn delete_range(&self, id: i64) -> Result<IpRange, RangeError> {
        let range = self.fetch(id)?;
        self.store.delete_ip_range(id)?;
        info!("deleted range #{} ({})", id, range.display_range());
        Ok(range)
    }

    pub fn get(&self, id: i64) -> Result<Option<IpRange>, RangeError> {
        self.store.get_ip_range_by_id(id)
    }

    /// All ranges, or the ranges of one team, in id order
    pub fn list(&self, team: Option<&str>) -> Result<Vec<IpRange>, RangeError> {
        match team {
            Some(team) => self.store.get_ip_ranges_by_team(team),
            None => self.store.get_all_ip_ranges(),
        }
    }

    pub fn teams(&self) -> Result<Vec<TeamSummary>, RangeError> {
        self.store.team_summaries()
    }

    /// Delete every range of `team`, returning the number removed
    pub fn purge_team(&self, team: &str) -> Result<usize, RangeError> {
        let removed = self.store.delete_team_ranges(team)?;
        info!("purged {} ranges of team '{}'", removed, team.trim());
        Ok(removed)
    }

    fn fetch(&self, id: i64) -> Result<IpRange, RangeError> {
        self.store
            .get_ip_range_by_id(id)?
            .ok_or(RangeError::UnknownId(id))
    }

    #[cfg(feature = "display")]
    pub fn format_ranges(&self, ranges: &[IpRange], format: OutputFormat) -> String {
        use crate::lens::utils::{format_json, format_table};

        let rows: Vec<RangeRow> = ranges.iter().map(RangeRow::from).collect();
        if format.is_json() {
            return format_json(&rows, format);
        }
        format_table(&rows, format)
    }

    #[cfg(not(feature = "display"))]
    pub fn format_ranges(&self, ranges: &[IpRange], format: OutputFormat) -> String {
        let rows: Vec<RangeRow> = ranges.iter().map(RangeRow::from).collect();
        crate::lens::utils::format_json(&rows, format)
    }

    #[cfg(feature = "display")]
    pub fn format_teams(&self, teams: &[TeamSummary], format: OutputFormat) -> String {
        use crate::lens::utils::{format_json, format_table};

        let rows: Vec<TeamRow> = teams.iter().map(TeamRow::from).collect();
        if format.is_json() {
            return format_json(&rows, format);
        }
        format_table(&rows, format)
    }

    #[cfg(not(feature = "display"))]
    pub fn format_teams(&self, teams: &[TeamSummary], format: OutputFormat) -> String {
        let rows: Vec<TeamRow> = teams.iter().map(TeamRow::from).collect();
        crate::lens::utils::format_json(&rows, format)
    }
}
