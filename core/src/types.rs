use std::io;
use crate::{
    addr::{AddrError, FilterError},
    crypto::CryptoError,
    destick::DestickError,
    net::ConnError,
};

/// Unified crate error covering addressing, filters, codecs, framing,
/// connections and configuration.
/// - `From<T>` impls enable `?` across module boundaries.
#[derive(Debug)]
pub enum Error {
    /// I/O error outside a connection.
    Io(io::Error),

    /// Malformed endpoint text.
    Addr(AddrError),

    /// Endpoint not expressible as a capture filter.
    Filter(FilterError),

    /// Codec construction or use failed.
    Crypto(CryptoError),

    /// Frame extraction failed.
    Destick(DestickError),

    /// Connection or listener failure.
    Conn(ConnError),

    /// Configuration could not be decoded.
    Json(serde_json::Error),

    /// Generic high-level validation with a descriptive message.
    Validation(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Addr(e) => write!(f, "address error: {}", e),
            Error::Filter(e) => write!(f, "filter error: {}", e),
            Error::Crypto(e) => write!(f, "crypto error: {}", e),
            Error::Destick(e) => write!(f, "destick error: {}", e),
            Error::Conn(e) => write!(f, "connection error: {}", e),
            Error::Json(e) => write!(f, "config error: {}", e),
            Error::Validation(msg) => write!(f, "validation error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Addr(e) => Some(e),
            Error::Filter(e) => Some(e),
            Error::Crypto(e) => Some(e),
            Error::Destick(e) => Some(e),
            Error::Conn(e) => Some(e),
            Error::Json(e) => Some(e),
            Error::Validation(_) => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<AddrError> for Error {
    fn from(e: AddrError) -> Self {
        Error::Addr(e)
    }
}

impl From<FilterError> for Error {
    fn from(e: FilterError) -> Self {
        Error::Filter(e)
    }
}

impl From<CryptoError> for Error {
    fn from(e: CryptoError) -> Self {
        Error::Crypto(e)
    }
}

impl From<DestickError> for Error {
    fn from(e: DestickError) -> Self {
        Error::Destick(e)
    }
}

impl From<ConnError> for Error {
    fn from(e: ConnError) -> Self {
        Error::Conn(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}
