//! Encrypted, datagram-framed TCP transport.
//!
//! Responsibilities:
//! - Dial and listen/accept over plain TCP sockets
//! - Decrypt and re-frame received bytes into whole datagrams
//! - Encrypt each written datagram as one frame
//! - Tag failures with operation, endpoints and cause
//!
//! Non-responsibilities:
//! - Handshakes or authentication
//! - Multiplexing

pub mod error;
pub mod conn;
pub mod dial;
pub mod listener;

pub use error::{Cause, ConnError, Op, OpError};
pub use conn::{Conn, ConnReader, ConnWriter, ReadState, TcpConn};
pub use dial::dial;
pub use listener::{listen, Acceptor, Incoming, TcpListener};
