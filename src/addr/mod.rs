//! IPv4 address handling
//!
//! - `codec`: dotted-quad and CIDR conversions (AddressCodec)
//! - `input`: free-form specification tokenizer and classifier (InputParser)

mod codec;
mod input;

pub use codec::{
    aligned_network, cidr_to_range, format_dotted_quad, parse_dotted_quad, range_size,
    range_to_cidr_if_aligned,
};
pub use input::{parse_ip_input, parse_token, tokenize, ParsedEntry};
