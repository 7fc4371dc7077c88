use std::time::Duration;
use serde::{Serialize, Deserialize};

use crate::telemetry::counters::ConnCounters;
use crate::telemetry::timers::{TelemetryTimer, StageTimes, Stage};

/// Immutable view of one connection's counters and stage timings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnSnapshot {
    pub counters: ConnCounters,
    /// Ciphertext bytes per plaintext byte sent (1.0 when nothing was sent).
    pub expansion_ratio: f64,
    pub elapsed: Duration,
    pub stage_times: StageTimes,
}

impl ConnSnapshot {
    pub fn from(counters: &ConnCounters, timer: &TelemetryTimer) -> Self {
        let expansion_ratio = if counters.bytes_out_plain > 0 {
            counters.bytes_out_wire as f64 / counters.bytes_out_plain as f64
        } else {
            1.0
        };

        Self {
            counters: counters.clone(),
            expansion_ratio,
            elapsed: timer.elapsed(),
            stage_times: timer.stage_times.clone(),
        }
    }

    pub fn connect_latency(&self) -> Duration {
        self.stage_times.get(Stage::Connect)
    }

    pub fn has_all_stages(&self, expected: &[Stage]) -> bool {
        self.stage_times.has_all(expected)
    }

    /// Internal invariants:
    /// - stage times never exceed elapsed wall time
    /// - ciphertext out is at least plaintext out for non-expanding codecs
    pub fn sanity_check(&self) -> bool {
        self.stage_times.total() <= self.elapsed
            && self.counters.bytes_out_wire >= self.counters.bytes_out_plain
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
