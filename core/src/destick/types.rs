use std::fmt;
use std::time::Duration;

use bytes::Bytes;

/// Reassembles datagram boundaries from an arbitrarily split byte stream.
pub trait FrameExtractor: Send {
    /// Maximum time partial, undelivered bytes may stay buffered before the
    /// next `append` fails.
    fn set_deadline(&mut self, deadline: Duration);

    /// Consume `data`, returning every frame it completes, in order. A
    /// trailing partial frame is retained.
    fn append(&mut self, data: &[u8]) -> Result<Vec<Bytes>, DestickError>;

    /// Bytes currently retained.
    fn buffered(&self) -> usize;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestickError {
    /// Partial frame outlived the staleness deadline. Retained bytes were
    /// discarded.
    Stale {
        buffered: usize,
        age: Duration,
        deadline: Duration,
    },

    /// Leading nibble is not an IP version.
    InvalidVersion(u8),

    /// Header fields cannot describe a datagram.
    Malformed(String),
}

impl fmt::Display for DestickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use DestickError::*;
        match self {
            Stale { buffered, age, deadline } =>
                write!(f, "{} bytes buffered for {:?}, exceeds deadline {:?}", buffered, age, deadline),
            InvalidVersion(v) =>
                write!(f, "invalid ip version: {}", v),
            Malformed(msg) =>
                write!(f, "malformed datagram: {}", msg),
        }
    }
}

impl std::error::Error for DestickError {}
