use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::addr::format::{format_display, format_host, ipv4_of};

/// Capability shared by every endpoint variant: text rendering plus a
/// network-kind tag.
pub trait NetAddr: fmt::Display {
    fn network(&self) -> &'static str;
}

/// Point IP endpoint, no port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HostAddr {
    pub ip: IpAddr,
}

impl HostAddr {
    pub fn new(ip: IpAddr) -> Self {
        Self { ip }
    }
}

impl fmt::Display for HostAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_host(&self.ip))
    }
}

impl NetAddr for HostAddr {
    fn network(&self) -> &'static str {
        "ip"
    }
}

/// TCP endpoint. `ip == None` is the wildcard ("any") address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TcpAddr {
    pub ip: Option<IpAddr>,
    pub port: u16,
}

impl TcpAddr {
    pub fn new(ip: IpAddr, port: u16) -> Self {
        Self { ip: Some(ip), port }
    }

    pub fn any(port: u16) -> Self {
        Self { ip: None, port }
    }

    /// Socket address for this endpoint; the wildcard maps to `0.0.0.0`.
    pub fn to_socket_addr(&self) -> SocketAddr {
        let ip = self.ip.unwrap_or(IpAddr::from([0, 0, 0, 0]));
        SocketAddr::new(ip, self.port)
    }
}

impl From<SocketAddr> for TcpAddr {
    fn from(addr: SocketAddr) -> Self {
        Self { ip: Some(addr.ip()), port: addr.port() }
    }
}

impl fmt::Display for TcpAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", format_display(self.ip.as_ref()), self.port)
    }
}

impl NetAddr for TcpAddr {
    fn network(&self) -> &'static str {
        "tcp"
    }
}

/// ICMP query endpoint. Identity is `(ip, id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IcmpQueryAddr {
    ip: IpAddr,
    id: u16,
}

impl IcmpQueryAddr {
    pub fn new(ip: IpAddr, id: u16) -> Self {
        Self { ip, id }
    }

    pub fn ip(&self) -> IpAddr {
        self.ip
    }

    pub fn id(&self) -> u16 {
        self.id
    }
}

impl fmt::Display for IcmpQueryAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", format_display(Some(&self.ip)), self.id)
    }
}

impl NetAddr for IcmpQueryAddr {
    fn network(&self) -> &'static str {
        "icmp query"
    }
}

/// Dual-stack addresses of one logical host, in preference order.
///
/// Usually holds at most one IPv4(-mapped) and one IPv6 address, but the
/// sequence itself is not limited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MultiIpAddr {
    pub ips: Vec<IpAddr>,
}

impl MultiIpAddr {
    pub fn new(ips: Vec<IpAddr>) -> Self {
        Self { ips }
    }

    /// First IPv4-capable entry (plain IPv4 or IPv4-mapped IPv6).
    pub fn ipv4(&self) -> Option<IpAddr> {
        self.ips.iter().copied().find(|ip| ipv4_of(ip).is_some())
    }

    /// First entry that is not IPv4-capable.
    pub fn ipv6(&self) -> Option<IpAddr> {
        self.ips.iter().copied().find(|ip| ipv4_of(ip).is_none())
    }
}

impl fmt::Display for MultiIpAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.ips.iter().map(format_host).collect();
        f.write_str(&parts.join(", "))
    }
}

impl NetAddr for MultiIpAddr {
    fn network(&self) -> &'static str {
        "ip"
    }
}

/// Closed set of endpoint kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Ip(HostAddr),
    Tcp(TcpAddr),
    IcmpQuery(IcmpQueryAddr),
    MultiIp(MultiIpAddr),
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Ip(a) => a.fmt(f),
            Endpoint::Tcp(a) => a.fmt(f),
            Endpoint::IcmpQuery(a) => a.fmt(f),
            Endpoint::MultiIp(a) => a.fmt(f),
        }
    }
}

impl NetAddr for Endpoint {
    fn network(&self) -> &'static str {
        match self {
            Endpoint::Ip(a) => a.network(),
            Endpoint::Tcp(a) => a.network(),
            Endpoint::IcmpQuery(a) => a.network(),
            Endpoint::MultiIp(a) => a.network(),
        }
    }
}

impl From<HostAddr> for Endpoint {
    fn from(a: HostAddr) -> Self {
        Endpoint::Ip(a)
    }
}

impl From<TcpAddr> for Endpoint {
    fn from(a: TcpAddr) -> Self {
        Endpoint::Tcp(a)
    }
}

impl From<IcmpQueryAddr> for Endpoint {
    fn from(a: IcmpQueryAddr) -> Self {
        Endpoint::IcmpQuery(a)
    }
}

impl From<MultiIpAddr> for Endpoint {
    fn from(a: MultiIpAddr) -> Self {
        Endpoint::MultiIp(a)
    }
}

/// Malformed endpoint text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddrError {
    /// Input was empty.
    Empty,

    /// Host part is not an IP address.
    InvalidIp(String),

    /// Port part is not an unsigned 16-bit integer.
    InvalidPort(String),

    /// `host:port` grammar required but no port was given.
    MissingPort(String),
}

impl fmt::Display for AddrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddrError::Empty => write!(f, "empty address"),
            AddrError::InvalidIp(s) => write!(f, "invalid ip {}", s),
            AddrError::InvalidPort(s) => write!(f, "parse port {}: not a 16-bit unsigned integer", s),
            AddrError::MissingPort(s) => write!(f, "missing port in address {}", s),
        }
    }
}

impl std::error::Error for AddrError {}

/// Filter compilation was given an endpoint kind the filter grammar cannot express.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    UnsupportedEndpointKind { network: &'static str, endpoint: String },

    /// Direction qualifier other than `src` / `dst`.
    UnknownDirection(String),
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterError::UnsupportedEndpointKind { network, endpoint } =>
                write!(f, "endpoint kind {:?} ({}) not supported in filters", network, endpoint),
            FilterError::UnknownDirection(d) =>
                write!(f, "unknown filter direction {:?}", d),
        }
    }
}

impl std::error::Error for FilterError {}
