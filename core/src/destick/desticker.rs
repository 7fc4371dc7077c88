use std::time::{Duration, Instant};

use bytes::{Bytes, BytesMut};
use tracing::debug;

use crate::constants::{DEFAULT_STALE_AFTER, MAX_DATAGRAM_LEN};
use crate::destick::decode::datagram_len;
use crate::destick::types::{DestickError, FrameExtractor};

/// IP datagram extractor with a staleness deadline.
///
/// The staleness clock starts when a partial datagram is first retained and
/// restarts every time a datagram completes. An `append` that finds the
/// retained bytes older than the deadline fails and drops them.
#[derive(Debug)]
pub struct Desticker {
    buf: BytesMut,
    deadline: Duration,
    pending_since: Option<Instant>,
}

impl Default for Desticker {
    fn default() -> Self {
        Self::new()
    }
}

impl Desticker {
    pub fn new() -> Self {
        Self {
            buf: BytesMut::with_capacity(MAX_DATAGRAM_LEN),
            deadline: DEFAULT_STALE_AFTER,
            pending_since: None,
        }
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Age of the retained partial datagram, if any.
    pub fn pending_age(&self) -> Option<Duration> {
        self.pending_since.map(|t| t.elapsed())
    }

    /// Drop retained bytes and stop the staleness clock.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.pending_since = None;
    }

    fn check_stale(&mut self) -> Result<(), DestickError> {
        let age = match self.pending_age() {
            Some(age) if age > self.deadline => age,
            _ => return Ok(()),
        };

        let err = DestickError::Stale {
            buffered: self.buf.len(),
            age,
            deadline: self.deadline,
        };
        self.reset();
        Err(err)
    }
}

impl FrameExtractor for Desticker {
    fn set_deadline(&mut self, deadline: Duration) {
        self.deadline = deadline;
    }

    fn append(&mut self, data: &[u8]) -> Result<Vec<Bytes>, DestickError> {
        self.check_stale()?;

        self.buf.extend_from_slice(data);

        let mut frames = Vec::new();
        loop {
            match datagram_len(&self.buf) {
                Ok(Some(len)) if self.buf.len() >= len => {
                    frames.push(self.buf.split_to(len).freeze());
                }
                Ok(_) => break,
                Err(e) => {
                    self.reset();
                    return Err(e);
                }
            }
        }

        if self.buf.is_empty() {
            self.pending_since = None;
        } else if !frames.is_empty() || self.pending_since.is_none() {
            self.pending_since = Some(Instant::now());
        }

        if !self.buf.is_empty() {
            debug!(frames = frames.len(), retained = self.buf.len(), "partial datagram retained");
        }

        Ok(frames)
    }

    fn buffered(&self) -> usize {
        self.buf.len()
    }
}
