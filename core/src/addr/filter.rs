//! addr/filter.rs
//! Capture-filter expression compiler.
//!
//! Output shapes:
//!
//! ```text
//! (<dir> host <expanded-host>)
//! (<dir> port <port>)
//! (<dir> host <expanded-host> && <dir> port <port>)
//! ```

use std::fmt;
use std::str::FromStr;

use crate::addr::format::format_filter_host;
use crate::addr::types::{Endpoint, FilterError, NetAddr};

/// Filter direction qualifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Src,
    Dst,
}

impl Direction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::Src => "src",
            Direction::Dst => "dst",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "src" => Ok(Direction::Src),
            "dst" => Ok(Direction::Dst),
            other => Err(FilterError::UnknownDirection(other.to_string())),
        }
    }
}

/// Compile one endpoint into a filter expression for `direction`.
///
/// Point IP and TCP endpoints are expressible. ICMP query and multi-IP
/// endpoints fail with `FilterError::UnsupportedEndpointKind`.
pub fn compile_filter(direction: Direction, endpoint: &Endpoint) -> Result<String, FilterError> {
    let dir = direction.as_str();

    match endpoint {
        Endpoint::Ip(host) => Ok(format!("({} host {})", dir, format_filter_host(&host.ip))),
        Endpoint::Tcp(tcp) => match tcp.ip {
            None => Ok(format!("({} port {})", dir, tcp.port)),
            Some(ip) => Ok(format!(
                "({} host {} && {} port {})",
                dir,
                format_filter_host(&ip),
                dir,
                tcp.port
            )),
        },
        Endpoint::IcmpQuery(_) | Endpoint::MultiIp(_) => Err(FilterError::UnsupportedEndpointKind {
            network: endpoint.network(),
            endpoint: endpoint.to_string(),
        }),
    }
}

/// Source filter for `endpoint`.
pub fn src_filter(endpoint: &Endpoint) -> Result<String, FilterError> {
    compile_filter(Direction::Src, endpoint)
}

/// Destination filter for `endpoint`.
pub fn dst_filter(endpoint: &Endpoint) -> Result<String, FilterError> {
    compile_filter(Direction::Dst, endpoint)
}
