//! Datagram boundary reconstruction over a byte stream.
//!
//! Responsibilities:
//! - Find IP datagram boundaries in coalesced or split stream reads
//! - Retain a trailing partial datagram between appends
//! - Bound retention with a staleness deadline
//!
//! Non-responsibilities:
//! - Cryptography
//! - IO

pub mod types;
pub mod decode;
pub mod desticker;

pub use types::{DestickError, FrameExtractor};
pub use decode::datagram_len;
pub use desticker::Desticker;
