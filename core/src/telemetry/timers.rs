//! telemetry/timers.rs
//! Stage timers for connections.
//!
//! Summary: Records durations for connect, socket read/write, encrypt,
//! decrypt and destick stages.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Connect,
    Read,
    Write,
    Encrypt,
    Decrypt,
    Destick,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageTimes {
    times: HashMap<Stage, Duration>,
}

impl StageTimes {
    /// Add duration to a stage (accumulates if already present).
    pub fn add(&mut self, stage: Stage, dur: Duration) {
        *self.times.entry(stage).or_insert(Duration::ZERO) += dur;
    }

    pub fn get(&self, stage: Stage) -> Duration {
        self.times.get(&stage).copied().unwrap_or(Duration::ZERO)
    }

    /// Sum all stage durations.
    pub fn total(&self) -> Duration {
        self.times.values().copied().sum()
    }

    /// Fold the other half's timings into this one.
    pub fn merge(&mut self, other: &StageTimes) {
        for (stage, dur) in &other.times {
            self.add(*stage, *dur);
        }
    }

    /// Check if all expected stages are present (non-zero).
    pub fn has_all(&self, expected: &[Stage]) -> bool {
        expected.iter().all(|s| self.get(*s) > Duration::ZERO)
    }
}

/// Wall clock of one connection half plus its per-stage totals.
#[derive(Clone, Debug)]
pub struct TelemetryTimer {
    pub start_time: Instant,
    pub stage_times: StageTimes,
}

impl TelemetryTimer {
    /// Timer whose clock started at `start` (e.g. before a dial).
    pub fn started_at(start: Instant) -> Self {
        Self {
            start_time: start,
            stage_times: StageTimes::default(),
        }
    }

    pub fn add_stage_time(&mut self, stage: Stage, dur: Duration) {
        self.stage_times.add(stage, dur);
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}
