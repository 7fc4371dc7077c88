//! Local device binding: the addresses outgoing and listening sockets bind to.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::addr::MultiIpAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    name: String,
    addrs: MultiIpAddr,
}

impl Device {
    pub fn new(name: impl Into<String>, addrs: MultiIpAddr) -> Self {
        Self { name: name.into(), addrs }
    }

    /// Loopback device carrying `127.0.0.1` and `::1`.
    pub fn loopback() -> Self {
        Self::new(
            "lo",
            MultiIpAddr::new(vec![IpAddr::V4(Ipv4Addr::LOCALHOST), IpAddr::V6(Ipv6Addr::LOCALHOST)]),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn addrs(&self) -> &MultiIpAddr {
        &self.addrs
    }

    /// Address used as the source of outgoing connections: IPv4 when the
    /// device has one, else IPv6, else the IPv4 unspecified address.
    pub fn ip_addr(&self) -> IpAddr {
        self.addrs
            .ipv4()
            .or_else(|| self.addrs.ipv6())
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.addrs)
    }
}
