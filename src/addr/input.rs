//! Free-form IP specification parsing
//!
//! A specification is any mix of single addresses, `start-end` ranges and CIDR
//! blocks separated by whitespace or commas. Each token is classified on its
//! own; a bad token becomes [`ParsedEntry::Invalid`] and never aborts the rest.

use super::codec::{cidr_to_range, parse_dotted_quad, range_size};
use crate::error::RangeError;
use serde::Serialize;

/// One classified token from an IP specification string
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ParsedEntry {
    Single {
        text: String,
        address: u32,
    },
    Range {
        text: String,
        start: u32,
        end: u32,
    },
    Cidr {
        text: String,
        start: u32,
        end: u32,
    },
    Invalid {
        text: String,
        reason: String,
    },
}

impl ParsedEntry {
    /// The token exactly as it appeared in the input
    pub fn text(&self) -> &str {
        match self {
            ParsedEntry::Single { text, .. }
            | ParsedEntry::Range { text, .. }
            | ParsedEntry::Cidr { text, .. }
            | ParsedEntry::Invalid { text, .. } => text,
        }
    }

    /// Inclusive numeric bounds; `None` for invalid entries
    pub fn bounds(&self) -> Option<(u32, u32)> {
        match self {
            ParsedEntry::Single { address, .. } => Some((*address, *address)),
            ParsedEntry::Range { start, end, .. } | ParsedEntry::Cidr { start, end, .. } => {
                Some((*start, *end))
            }
            ParsedEntry::Invalid { .. } => None,
        }
    }

    /// Number of addresses covered, zero for invalid entries
    pub fn address_count(&self) -> u64 {
        self.bounds()
            .map(|(start, end)| range_size(start, end))
            .unwrap_or(0)
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, ParsedEntry::Invalid { .. })
    }

    fn invalid(text: &str, err: RangeError) -> Self {
        ParsedEntry::Invalid {
            text: text.to_string(),
            reason: err.to_string(),
        }
    }
}

fn is_separator(c: char) -> bool {
    c == ',' || c.is_whitespace()
}

/// Split on runs of whitespace and commas, keeping token order
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(is_separator).filter(|t| !t.is_empty())
}

/// Classify a single token
pub fn parse_token(token: &str) -> ParsedEntry {
    if token.contains('/') {
        return match cidr_to_range(token) {
            Ok((start, end)) => ParsedEntry::Cidr {
                text: token.to_string(),
                start,
                end,
            },
            Err(e) => ParsedEntry::invalid(token, e),
        };
    }

    if let Some((left, right)) = token.split_once('-') {
        let start = match parse_dotted_quad(left) {
            Ok(v) => v,
            Err(e) => return ParsedEntry::invalid(token, e),
        };
        let end = match parse_dotted_quad(right) {
            Ok(v) => v,
            Err(e) => return ParsedEntry::invalid(token, e),
        };
        if start > end {
            return ParsedEntry::invalid(token, RangeError::InvalidRangeOrder { start, end });
        }
        return ParsedEntry::Range {
            text: token.to_string(),
            start,
            end,
        };
    }

    match parse_dotted_quad(token) {
        Ok(address) => ParsedEntry::Single {
            text: token.to_string(),
            address,
        },
        Err(e) => ParsedEntry::invalid(token, e),
    }
}

/// Parse a free-form IP specification into ordered entries. Never fails.
pub fn parse_ip_input(text: &str) -> Vec<ParsedEntry> {
    tokenize(text).map(parse_token).collect()
}
