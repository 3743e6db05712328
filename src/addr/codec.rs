//! Conversions between dotted-quad text, `u32` addresses and CIDR blocks
//!
//! Everything here is pure and stateless. Addresses are handled as host-order
//! `u32` values so that ranges compare numerically.

use crate::error::RangeError;
use ipnet::Ipv4Net;
use std::net::Ipv4Addr;

/// Parse dotted-quad text (`a.b.c.d`) into its numeric value.
///
/// Exactly four octets in `0..=255` are required. Leading zeros are rejected.
pub fn parse_dotted_quad(text: &str) -> Result<u32, RangeError> {
    text.parse::<Ipv4Addr>()
        .map(u32::from)
        .map_err(|_| RangeError::InvalidAddress(text.to_string()))
}

pub fn format_dotted_quad(value: u32) -> String {
    Ipv4Addr::from(value).to_string()
}

/// Netmask for a prefix length. A `/0` mask is all zeros.
fn prefix_mask(prefix: u8) -> u32 {
    u32::MAX.checked_shl(32 - u32::from(prefix)).unwrap_or(0)
}

/// Convert CIDR text into an inclusive `(start, end)` pair.
///
/// The address half does not have to be the network address: `10.1.2.3/24`
/// is floored to `10.1.2.0` and yields `(10.1.2.0, 10.1.2.255)`.
pub fn cidr_to_range(text: &str) -> Result<(u32, u32), RangeError> {
    let invalid = || RangeError::InvalidCidr(text.to_string());

    let (addr_part, prefix_part) = text.split_once('/').ok_or_else(invalid)?;
    if prefix_part.is_empty() || !prefix_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let prefix: u8 = prefix_part.parse().map_err(|_| invalid())?;
    if prefix > 32 {
        return Err(invalid());
    }
    let address = parse_dotted_quad(addr_part).map_err(|_| invalid())?;

    let mask = prefix_mask(prefix);
    let start = address & mask;
    let end = start | !mask;
    Ok((start, end))
}

/// Rebuild the CIDR block covering exactly `[start, end]`, if there is one.
///
/// Only display code should use this; the result is never stored.
pub fn range_to_cidr_if_aligned(start: u32, end: u32) -> Option<String> {
    aligned_network(start, end).map(|net| net.to_string())
}

/// Same as [`range_to_cidr_if_aligned`] but returns the typed network.
pub fn aligned_network(start: u32, end: u32) -> Option<Ipv4Net> {
    if start > end {
        return None;
    }
    let size = u64::from(end - start) + 1;
    if !size.is_power_of_two() || u64::from(start) % size != 0 {
        return None;
    }
    let prefix = 32 - size.trailing_zeros() as u8;
    Ipv4Net::new(Ipv4Addr::from(start), prefix).ok()
}

/// Number of addresses in an inclusive range. `u64` because `/0` holds 2^32.
pub fn range_size(start: u32, end: u32) -> u64 {
    u64::from(end.saturating_sub(start)) + 1
}
