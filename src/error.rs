//! Error taxonomy for the attribution engine
//!
//! Parsing failures never escape as errors from the input parser; they are
//! carried inside [`crate::addr::ParsedEntry::Invalid`] instead. Store writes
//! return these errors so the caller can decide how to report them.

use std::net::Ipv4Addr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RangeError {
    /// Not exactly four dot-separated octets in `0..=255`
    #[error("invalid IPv4 address '{0}'")]
    InvalidAddress(String),

    /// Malformed network address or prefix outside `0..=32`
    #[error("invalid CIDR block '{0}'")]
    InvalidCidr(String),

    #[error("range start {} is greater than range end {}", dotted(.start), dotted(.end))]
    InvalidRangeOrder { start: u32, end: u32 },

    #[error("no IP range with id {0}")]
    UnknownId(i64),

    #[error("empty input")]
    EmptyInput,

    #[error("team name must not be empty")]
    EmptyTeam,

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

fn dotted(value: &u32) -> Ipv4Addr {
    Ipv4Addr::from(*value)
}
