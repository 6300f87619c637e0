//! Reverse-lookup names for PTR queries.
//!
//! `147.229.8.12` maps to `12.8.229.147.in-addr.arpa` and every IPv6 address
//! maps to 32 single-nibble labels under `ip6.arpa` (RFC 3596 section 2.5),
//! least significant nibble first.

use std::fmt::Write;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

const IPV4_ZONE: &str = "in-addr.arpa";
const IPV6_ZONE: &str = "ip6.arpa";

/// Builds the reverse-lookup name for an already classified address.
pub fn reverse_name(addr: IpAddr) -> String {
    match addr {
        IpAddr::V4(v4) => ipv4_reverse_name(v4),
        IpAddr::V6(v6) => ipv6_reverse_name(v6),
    }
}

/// Builds the `in-addr.arpa` name of an IPv4 address.
///
/// # Arguments
///
/// * `addr` - The address whose PTR record is wanted.
///
/// # Returns
///
/// The four octets in reverse order followed by `in-addr.arpa`, without a
/// trailing dot.
///
/// # Examples
///
/// ```rust
/// use std::net::Ipv4Addr;
/// use dns_query::reverse::ipv4_reverse_name;
///
/// assert_eq!(
///     ipv4_reverse_name(Ipv4Addr::new(147, 229, 8, 12)),
///     "12.8.229.147.in-addr.arpa"
/// );
/// ```
pub fn ipv4_reverse_name(addr: Ipv4Addr) -> String {
    let [a, b, c, d] = addr.octets();
    format!("{}.{}.{}.{}.{}", d, c, b, a, IPV4_ZONE)
}

/// Builds the `ip6.arpa` name of an IPv6 address.
///
/// # Returns
///
/// All 32 nibbles as single lowercase hex labels, least significant first,
/// followed by `ip6.arpa`. Zero groups are spelled out, never compressed.
pub fn ipv6_reverse_name(addr: Ipv6Addr) -> String {
    let mut name = String::with_capacity(32 * 2 + IPV6_ZONE.len());
    for octet in addr.octets().iter().rev() {
        // Within a reversed octet the low nibble comes first.
        let _ = write!(name, "{:x}.{:x}.", octet & 0x0F, octet >> 4);
    }
    name.push_str(IPV6_ZONE);
    name
}
