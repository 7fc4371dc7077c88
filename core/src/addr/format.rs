//! addr/format.rs
//! Text renderings of IP addresses.

use std::net::{IpAddr, Ipv4Addr};

/// IPv4 view of an address: plain IPv4, or the embedded address of an
/// IPv4-mapped IPv6 address (`::ffff:a.b.c.d`).
#[inline]
pub fn ipv4_of(ip: &IpAddr) -> Option<Ipv4Addr> {
    match ip {
        IpAddr::V4(v4) => Some(*v4),
        IpAddr::V6(v6) => v6.to_ipv4_mapped(),
    }
}

/// Display form of a bare address: IPv4-mapped addresses render dotted.
pub fn format_host(ip: &IpAddr) -> String {
    match ipv4_of(ip) {
        Some(v4) => v4.to_string(),
        None => ip.to_string(),
    }
}

/// Display form used next to a port.
///
/// - IPv4 (and IPv4-mapped) → dotted
/// - anything else → `[addr]`
/// - absent → empty string
pub fn format_display(ip: Option<&IpAddr>) -> String {
    match ip {
        None => String::new(),
        Some(ip) => match ipv4_of(ip) {
            Some(v4) => v4.to_string(),
            None => format!("[{}]", ip),
        },
    }
}

/// Host form accepted by the capture-filter grammar.
///
/// IPv4 renders dotted. IPv6 renders as eight zero-padded groups of four
/// lowercase hex digits, never with `::` elision: the filter grammar rejects
/// the compressed notation.
pub fn format_filter_host(ip: &IpAddr) -> String {
    match (ipv4_of(ip), ip) {
        (Some(v4), _) => v4.to_string(),
        (None, IpAddr::V6(v6)) => {
            let digits = hex::encode(v6.octets());
            let groups: Vec<&str> = (0..8).map(|i| &digits[i * 4..i * 4 + 4]).collect();
            groups.join(":")
        }
        (None, IpAddr::V4(v4)) => v4.to_string(),
    }
}
