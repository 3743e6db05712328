//! Team resolution result types

use crate::addr::ParsedEntry;
use crate::lens::utils::{truncate_name, DEFAULT_NAME_MAX_LEN};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::net::Ipv4Addr;

#[cfg(feature = "display")]
use tabled::Tabled;

/// Answer for one entry of a team query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TeamQueryResult {
    /// First stored range containing the address, in id order
    Single {
        input: String,
        address: Ipv4Addr,
        team: Option<String>,
    },
    Range {
        input: String,
        start: Ipv4Addr,
        end: Ipv4Addr,
        overlapping_teams: BTreeSet<String>,
    },
    Cidr {
        input: String,
        start: Ipv4Addr,
        end: Ipv4Addr,
        overlapping_teams: BTreeSet<String>,
    },
    Invalid {
        input: String,
        reason: String,
    },
}

impl TeamQueryResult {
    pub fn input(&self) -> &str {
        match self {
            TeamQueryResult::Single { input, .. }
            | TeamQueryResult::Range { input, .. }
            | TeamQueryResult::Cidr { input, .. }
            | TeamQueryResult::Invalid { input, .. } => input,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            TeamQueryResult::Single { .. } => "single",
            TeamQueryResult::Range { .. } => "range",
            TeamQueryResult::Cidr { .. } => "cidr",
            TeamQueryResult::Invalid { .. } => "invalid",
        }
    }

    /// Every team the entry resolved to
    pub fn teams(&self) -> Vec<&str> {
        match self {
            TeamQueryResult::Single { team, .. } => team.iter().map(String::as_str).collect(),
            TeamQueryResult::Range {
                overlapping_teams, ..
            }
            | TeamQueryResult::Cidr {
                overlapping_teams, ..
            } => overlapping_teams.iter().map(String::as_str).collect(),
            TeamQueryResult::Invalid { .. } => Vec::new(),
        }
    }

    pub(crate) fn invalid(entry: &ParsedEntry, reason: &str) -> Self {
        TeamQueryResult::Invalid {
            input: entry.text().to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Flattened result row for table output
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "display", derive(Tabled))]
pub struct TeamQueryRow {
    pub input: String,
    #[cfg_attr(feature = "display", tabled(rename = "type"))]
    pub kind: String,
    pub teams: String,
}

impl From<&TeamQueryResult> for TeamQueryRow {
    fn from(result: &TeamQueryResult) -> Self {
        let teams = match result {
            TeamQueryResult::Invalid { reason, .. } => format!("({})", reason),
            _ => {
                let teams = result.teams();
                if teams.is_empty() {
                    "-".to_string()
                } else {
                    teams
                        .iter()
                        .map(|t| truncate_name(t, DEFAULT_NAME_MAX_LEN))
                        .collect::<Vec<_>>()
                        .join(", ")
                }
            }
        };
        Self {
            input: result.input().to_string(),
            kind: result.kind().to_string(),
            teams,
        }
    }
}
