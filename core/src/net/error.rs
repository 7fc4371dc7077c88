use std::fmt;
use std::io;
use std::net::SocketAddr;

use crate::crypto::CryptoError;
use crate::destick::DestickError;

/// Socket-level operation an error arose in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Dial,
    Listen,
    Accept,
    Read,
    Write,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Op::Dial   => "dial",
            Op::Listen => "listen",
            Op::Accept => "accept",
            Op::Read   => "read",
            Op::Write  => "write",
        };
        f.write_str(name)
    }
}

/// What failed inside an operation.
#[derive(Debug, thiserror::Error)]
pub enum Cause {
    #[error("{0}")]
    Io(#[source] io::Error),

    #[error("decrypt: {0}")]
    Decrypt(#[source] CryptoError),

    #[error("encrypt: {0}")]
    Encrypt(#[source] CryptoError),

    #[error("destick: {0}")]
    Destick(#[source] DestickError),
}

impl Cause {
    /// Stage tag: `io`, `decrypt`, `encrypt` or `destick`.
    pub fn stage(&self) -> &'static str {
        match self {
            Cause::Io(_) => "io",
            Cause::Decrypt(_) => "decrypt",
            Cause::Encrypt(_) => "encrypt",
            Cause::Destick(_) => "destick",
        }
    }
}

/// Operation-tagged error carrying both endpoints and the wrapped cause.
#[derive(Debug)]
pub struct OpError {
    pub op: Op,
    pub net: &'static str,
    pub local: Option<SocketAddr>,
    pub remote: Option<SocketAddr>,
    pub cause: Cause,
}

impl OpError {
    pub fn new(op: Op, local: Option<SocketAddr>, remote: Option<SocketAddr>, cause: Cause) -> Self {
        Self {
            op,
            net: crate::constants::NETWORK,
            local,
            remote,
            cause,
        }
    }
}

impl fmt::Display for OpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.op, self.net)?;
        if let Some(local) = self.local {
            write!(f, " {}", local)?;
        }
        if let Some(remote) = self.remote {
            let sep = if self.local.is_some() { "->" } else { " " };
            write!(f, "{}{}", sep, remote)?;
        }
        write!(f, ": {}", self.cause)
    }
}

impl std::error::Error for OpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}

/// Error returned by connection and listener calls.
#[derive(Debug, thiserror::Error)]
pub enum ConnError {
    /// Setup, codec, or extractor failure tagged with its operation.
    #[error(transparent)]
    Op(#[from] OpError),

    /// Socket error passed through verbatim (deadline expiry included).
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Peer closed the stream.
    #[error("connection closed by peer")]
    Eof,

    /// Destination cannot hold the next frame; the frame stays queued.
    #[error("destination buffer too small: frame is {needed} bytes, buffer holds {available}")]
    ShortBuffer { needed: usize, available: usize },
}

impl ConnError {
    pub fn op_error(&self) -> Option<&OpError> {
        match self {
            ConnError::Op(e) => Some(e),
            _ => None,
        }
    }

    /// Stage tag of an operation-tagged error.
    pub fn stage(&self) -> Option<&'static str> {
        self.op_error().map(|e| e.cause.stage())
    }

    /// Deadline expiry on the underlying socket.
    pub fn is_timeout(&self) -> bool {
        match self {
            ConnError::Io(e) => matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut),
            _ => false,
        }
    }

    /// The stream can no longer be trusted to stay in sync; close it.
    pub fn is_fatal(&self) -> bool {
        match self {
            ConnError::Eof => true,
            ConnError::Op(e) => matches!(e.cause, Cause::Destick(_)),
            ConnError::Io(e) => !matches!(
                e.kind(),
                io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
            ),
            ConnError::ShortBuffer { .. } => false,
        }
    }
}
