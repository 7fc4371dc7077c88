//! Endpoint model and capture-filter compilation.
//!
//! Responsibilities:
//! - Typed endpoint variants (point IP, TCP, ICMP query, multi-IP)
//! - Display rendering and the expanded host form the filter grammar needs
//! - Parsing endpoint text
//! - Compiling endpoints into `src`/`dst` filter expressions
//!
//! Non-responsibilities:
//! - Packet capture
//! - Sockets

pub mod types;
pub mod format;
pub mod parse;
pub mod filter;

pub use types::{
    NetAddr,
    Endpoint,
    HostAddr,
    TcpAddr,
    IcmpQueryAddr,
    MultiIpAddr,
    AddrError,
    FilterError,
};

pub use format::{format_display, format_filter_host, format_host, ipv4_of};
pub use parse::{parse_endpoint, parse_tcp_endpoint};
pub use filter::{Direction, compile_filter, src_filter, dst_filter};
