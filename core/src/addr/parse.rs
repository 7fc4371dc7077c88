//! addr/parse.rs
//! Endpoint text grammars.
//!
//! Tried in order:
//! - `:<port>`      → wildcard TCP endpoint
//! - `<ip>:<port>`  → TCP endpoint (IPv6 host in brackets)
//! - `<ip>`         → point IP endpoint

use std::net::IpAddr;

use crate::addr::types::{AddrError, Endpoint, HostAddr, TcpAddr};

fn parse_port(s: &str) -> Result<u16, AddrError> {
    // `u16::from_str` accepts a leading '+', the port grammar does not.
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AddrError::InvalidPort(s.to_string()));
    }
    s.parse::<u16>().map_err(|_| AddrError::InvalidPort(s.to_string()))
}

fn parse_ip(s: &str) -> Result<IpAddr, AddrError> {
    s.parse::<IpAddr>().map_err(|_| AddrError::InvalidIp(s.to_string()))
}

/// Split `host:port` / `[host]:port`. `None` when the text carries no port
/// (a bare IPv4 or bare IPv6 address).
fn split_host_port(s: &str) -> Option<Result<(&str, &str), AddrError>> {
    if let Some(rest) = s.strip_prefix('[') {
        return Some(match rest.split_once("]:") {
            Some((host, port)) => Ok((host, port)),
            None => Err(AddrError::MissingPort(s.to_string())),
        });
    }

    match s.matches(':').count() {
        1 => s.split_once(':').map(Ok),
        _ => None,
    }
}

/// Parse strict `<ip>:<port>` text.
pub fn parse_tcp_endpoint(s: &str) -> Result<TcpAddr, AddrError> {
    if s.is_empty() {
        return Err(AddrError::Empty);
    }

    let (host, port) = match split_host_port(s) {
        Some(parts) => parts?,
        None => return Err(AddrError::MissingPort(s.to_string())),
    };

    let ip = parse_ip(host)?;
    let port = parse_port(port)?;

    Ok(TcpAddr::new(ip, port))
}

/// Parse endpoint text into a TCP or point-IP endpoint.
pub fn parse_endpoint(s: &str) -> Result<Endpoint, AddrError> {
    if s.is_empty() {
        return Err(AddrError::Empty);
    }

    // A leading ':' followed by more colons is compressed IPv6 (`::1`).
    if let Some(port) = s.strip_prefix(':').filter(|rest| !rest.contains(':')) {
        return Ok(Endpoint::Tcp(TcpAddr::any(parse_port(port)?)));
    }

    match split_host_port(s) {
        Some(parts) => {
            let (host, port) = parts?;
            let ip = parse_ip(host)?;
            let port = parse_port(port)?;
            Ok(Endpoint::Tcp(TcpAddr::new(ip, port)))
        }
        None => Ok(Endpoint::Ip(HostAddr::new(parse_ip(s)?))),
    }
}
