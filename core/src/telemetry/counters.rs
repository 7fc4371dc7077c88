//! telemetry/counters.rs
//! Mutable counters kept by each connection.
//!
//! Summary: Frame and byte counts in both directions plus failure counts.
//! Converted into an immutable `ConnSnapshot` on demand.

use serde::{Serialize, Deserialize};
use std::ops::AddAssign;

#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnCounters {
    pub frames_in: u64,
    pub frames_out: u64,
    /// Ciphertext bytes read from the socket.
    pub bytes_in_wire: u64,
    /// Plaintext bytes delivered to the caller.
    pub bytes_in_plain: u64,
    /// Plaintext bytes accepted from the caller.
    pub bytes_out_plain: u64,
    /// Ciphertext bytes written to the socket.
    pub bytes_out_wire: u64,
    /// Reads that ended with a partial frame and returned zero bytes.
    pub reads_incomplete: u64,
    pub decrypt_failures: u64,
    pub encrypt_failures: u64,
    pub destick_failures: u64,
}

impl ConnCounters {
    /// Record one socket read of `wire_len` ciphertext bytes.
    pub fn add_wire_read(&mut self, wire_len: usize) {
        self.bytes_in_wire += wire_len as u64;
    }

    /// Record one frame handed to the caller.
    pub fn add_frame_in(&mut self, plain_len: usize) {
        self.frames_in += 1;
        self.bytes_in_plain += plain_len as u64;
    }

    /// Record one frame written as `wire_len` ciphertext bytes.
    pub fn add_frame_out(&mut self, plain_len: usize, wire_len: usize) {
        self.frames_out += 1;
        self.bytes_out_plain += plain_len as u64;
        self.bytes_out_wire += wire_len as u64;
    }

    pub fn add_incomplete(&mut self) {
        self.reads_incomplete += 1;
    }

    pub fn add_decrypt_failure(&mut self) {
        self.decrypt_failures += 1;
    }

    pub fn add_encrypt_failure(&mut self) {
        self.encrypt_failures += 1;
    }

    pub fn add_destick_failure(&mut self) {
        self.destick_failures += 1;
    }

    pub fn failures(&self) -> u64 {
        self.decrypt_failures + self.encrypt_failures + self.destick_failures
    }

    pub fn merge(&mut self, other: &ConnCounters) {
        *self += other.clone();
    }
}

impl AddAssign for ConnCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.frames_in        += rhs.frames_in;
        self.frames_out       += rhs.frames_out;

        self.bytes_in_wire    += rhs.bytes_in_wire;
        self.bytes_in_plain   += rhs.bytes_in_plain;
        self.bytes_out_plain  += rhs.bytes_out_plain;
        self.bytes_out_wire   += rhs.bytes_out_wire;

        self.reads_incomplete += rhs.reads_incomplete;
        self.decrypt_failures += rhs.decrypt_failures;
        self.encrypt_failures += rhs.encrypt_failures;
        self.destick_failures += rhs.destick_failures;
    }
}
