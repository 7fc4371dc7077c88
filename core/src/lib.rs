//! pcapnet-core
//!
//! Encrypted, datagram-framed TCP transport plus the endpoint model that
//! compiles addresses into capture-filter expressions.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;
pub mod config;

// Collaborators
pub mod addr;
pub mod crypto;
pub mod destick;
pub mod device;
pub mod telemetry;

// Transport
pub mod net;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::addr::{compile_filter, parse_endpoint, Direction, Endpoint, NetAddr};
    pub use crate::config::{ConnOptions, TransportConfig};
    pub use crate::crypto::{new_crypt, Crypt, Method};
    pub use crate::device::Device;
    pub use crate::net::{dial, listen, Conn, ConnError, TcpConn, TcpListener};
    pub use crate::types::Error;
}
