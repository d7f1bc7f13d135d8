//! Counters describing how playout is going. See [Health].

use std::fmt::{self, Display, Formatter};

/// Running totals kept by the playout loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Health {
    frames_sent: u64,
    key_frames_sent: u64,
    bytes_sent: u64,
    shortfalls: u64,
    restarts: u64,
    failures: u64,
}

impl Health {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame that was sent.
    pub fn record_frame(&mut self, bytes: usize, key_frame: bool) {
        self.frames_sent += 1;
        self.bytes_sent += bytes as u64;
        if key_frame {
            self.key_frames_sent += 1;
        }
    }

    /// Record a frame that took its whole interval (or more) to process.
    pub fn record_shortfall(&mut self) {
        self.shortfalls += 1;
    }

    /// Record the source being started over.
    pub fn record_restart(&mut self) {
        self.restarts += 1;
    }

    /// Record a failed pass (decode, conversion or send error).
    pub fn record_failure(&mut self) {
        self.failures += 1;
    }

    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }

    pub fn shortfalls(&self) -> u64 {
        self.shortfalls
    }

    pub fn restarts(&self) -> u64 {
        self.restarts
    }

    pub fn failures(&self) -> u64 {
        self.failures
    }

    /// Get a snapshot of these counters.
    pub fn summary(&self) -> HealthSummary {
        HealthSummary {
            frames_sent: self.frames_sent,
            key_frames_sent: self.key_frames_sent,
            bytes_sent: self.bytes_sent,
            shortfalls: self.shortfalls,
            restarts: self.restarts,
            failures: self.failures,
        }
    }
}

/// Snapshot of [Health].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthSummary {
    pub frames_sent: u64,
    pub key_frames_sent: u64,
    pub bytes_sent: u64,
    pub shortfalls: u64,
    pub restarts: u64,
    pub failures: u64,
}

impl Display for HealthSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} frames sent ({} key frames, {} bytes), {} pacing shortfalls, \
            {} restarts, {} failures",
            self.frames_sent,
            self.key_frames_sent,
            self.bytes_sent,
            self.shortfalls,
            self.restarts,
            self.failures
        )
    }
}
