//! Team-owned IP range storage
//!
//! [`RangeStore`] is the persistence contract the ingestion and resolution
//! lenses are written against. [`IpRangeRepository`] implements it on top of
//! SQLite. Overlapping ranges, including ranges owned by different teams, are
//! stored as-is; nothing is merged or deduplicated.

mod sqlite;

pub use sqlite::IpRangeRepository;

use crate::addr::{aligned_network, cidr_to_range, format_dotted_quad, range_size};
use crate::error::RangeError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::Ipv4Addr;

/// A stored range. `start <= end` holds for every record returned by a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpRange {
    pub id: i64,
    pub start: u32,
    pub end: u32,
    pub team: String,
}

impl IpRange {
    pub fn start_addr(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.start)
    }

    pub fn end_addr(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.end)
    }

    /// Number of addresses covered
    pub fn size(&self) -> u64 {
        range_size(self.start, self.end)
    }

    pub fn contains(&self, address: u32) -> bool {
        self.start <= address && address <= self.end
    }

    /// Closed-interval intersection test
    pub fn overlaps(&self, start: u32, end: u32) -> bool {
        self.start <= end && self.end >= start
    }

    /// CIDR form when the range is exactly one aligned block (display only)
    pub fn cidr(&self) -> Option<String> {
        aligned_network(self.start, self.end).map(|net| net.to_string())
    }

    /// `start-end`, or the CIDR form when it exists
    pub fn display_range(&self) -> String {
        self.cidr().unwrap_or_else(|| {
            format!(
                "{}-{}",
                format_dotted_quad(self.start),
                format_dotted_quad(self.end)
            )
        })
    }
}

/// Per-team aggregate over stored ranges
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSummary {
    pub team: String,
    pub ranges: u64,
    /// Sum of range sizes; overlapping ranges are counted twice
    pub addresses: u64,
}

/// Check the invariants every write must satisfy and return the trimmed team name.
pub fn validate_range(start: u32, end: u32, team: &str) -> Result<&str, RangeError> {
    if start > end {
        return Err(RangeError::InvalidRangeOrder { start, end });
    }
    let team = team.trim();
    if team.is_empty() {
        return Err(RangeError::EmptyTeam);
    }
    Ok(team)
}

/// Persistence contract for team-owned ranges
///
/// Implementations hand out value copies; callers never hold references into
/// the store. `get_all_ip_ranges` must return records in ascending `id` order,
/// which is the order single-address resolution uses to pick the first match.
///
/// The query methods have full-scan default implementations built on
/// `get_all_ip_ranges`; backends with indexes should override them.
pub trait RangeStore {
    /// Insert a range, returning its id. Fails with `InvalidRangeOrder` when `start > end`.
    fn add_ip_range(&self, start: u32, end: u32, team: &str) -> Result<i64, RangeError>;

    /// Full replace of bounds and team
    fn update_ip_range(&self, id: i64, start: u32, end: u32, team: &str)
        -> Result<(), RangeError>;

    fn delete_ip_range(&self, id: i64) -> Result<(), RangeError>;

    fn get_all_ip_ranges(&self) -> Result<Vec<IpRange>, RangeError>;

    fn get_ip_range_by_id(&self, id: i64) -> Result<Option<IpRange>, RangeError>;

    /// Insert the block described by CIDR text. Nothing is inserted on `InvalidCidr`.
    fn add_ip_range_from_cidr(&self, cidr: &str, team: &str) -> Result<i64, RangeError> {
        let (start, end) = cidr_to_range(cidr)?;
        self.add_ip_range(start, end, team)
    }

    /// First record, in id order, whose range contains `address`
    fn find_first_containing(&self, address: u32) -> Result<Option<IpRange>, RangeError> {
        Ok(self
            .get_all_ip_ranges()?
            .into_iter()
            .find(|r| r.contains(address)))
    }

    /// Every record intersecting `[start, end]`, in id order
    fn find_overlapping(&self, start: u32, end: u32) -> Result<Vec<IpRange>, RangeError> {
        Ok(self
            .get_all_ip_ranges()?
            .into_iter()
            .filter(|r| r.overlaps(start, end))
            .collect())
    }

    fn get_ip_ranges_by_team(&self, team: &str) -> Result<Vec<IpRange>, RangeError> {
        let team = team.trim();
        Ok(self
            .get_all_ip_ranges()?
            .into_iter()
            .filter(|r| r.team == team)
            .collect())
    }

    /// Delete every range owned by `team`, returning how many were removed
    fn delete_team_ranges(&self, team: &str) -> Result<usize, RangeError> {
        let ranges = self.get_ip_ranges_by_team(team)?;
        for range in &ranges {
            self.delete_ip_range(range.id)?;
        }
        Ok(ranges.len())
    }

    fn count(&self) -> Result<u64, RangeError> {
        Ok(self.get_all_ip_ranges()?.len() as u64)
    }

    /// Range and address totals per team, ordered by team name
    fn team_summaries(&self) -> Result<Vec<TeamSummary>, RangeError> {
        let mut totals: BTreeMap<String, (u64, u64)> = BTreeMap::new();
        for range in self.get_all_ip_ranges()? {
            let entry = totals.entry(range.team.clone()).or_default();
            entry.0 += 1;
            entry.1 += range.size();
        }
        Ok(totals
            .into_iter()
            .map(|(team, (ranges, addresses))| TeamSummary {
                team,
                ranges,
                addresses,
            })
            .collect())
    }
}
