//! Frame timing utilities.
//!
//! Smoothing runs once per rendered frame, not once per input event. This
//! module turns monotonic timestamps into the per-frame `dt` the springs
//! integrate over, and defines the fixed frame grid used by replays.

use std::time::Instant;

/// Largest `dt` handed to a spring in one frame, in seconds.
///
/// A stalled frame (backgrounded tab, debugger pause) is treated as this
/// long instead of its real duration.
pub const MAX_FRAME_DT_SECS: f64 = 0.1;

/// A monotonic frame clock anchored to a fixed epoch.
#[derive(Debug, Clone)]
pub struct FrameClock {
    epoch: Instant,

    /// Wall-clock time at epoch (RFC 3339).
    epoch_wall: String,

    last_frame_ns: Option<u64>,
}

impl FrameClock {
    /// Create a new clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
            last_frame_ns: None,
        }
    }

    /// Nanoseconds elapsed since the epoch.
    pub fn elapsed_ns(&self) -> u64 {
        self.epoch.elapsed().as_nanos() as u64
    }

    /// Wall-clock time at the epoch.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }

    /// Seconds since the previous frame, clamped to `[0, MAX_FRAME_DT_SECS]`.
    ///
    /// The first frame has `dt = 0`. A timestamp earlier than the previous
    /// frame also yields zero.
    pub fn frame_dt(&mut self, now_ns: u64) -> f64 {
        let dt = match self.last_frame_ns {
            None => 0.0,
            Some(last) => Self::ns_to_secs(now_ns.saturating_sub(last)),
        };
        self.last_frame_ns = Some(now_ns.max(self.last_frame_ns.unwrap_or(0)));
        dt.min(MAX_FRAME_DT_SECS)
    }

    /// Convert nanoseconds to seconds.
    pub fn ns_to_secs(ns: u64) -> f64 {
        ns as f64 / 1_000_000_000.0
    }
}

/// A fixed frame grid at a target rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRate {
    target_interval_ns: u64,
}

impl FrameRate {
    /// Create a grid targeting the given Hz rate (minimum 1 Hz).
    pub fn new(target_hz: u32) -> Self {
        Self {
            target_interval_ns: 1_000_000_000 / target_hz.max(1) as u64,
        }
    }

    /// Target interval in nanoseconds.
    pub fn interval_ns(&self) -> u64 {
        self.target_interval_ns
    }

    /// Target interval in seconds.
    pub fn interval_secs(&self) -> f64 {
        FrameClock::ns_to_secs(self.target_interval_ns)
    }

    /// Timestamp of frame `index` (frame 0 is at t = 0).
    pub fn frame_time_ns(&self, index: u64) -> u64 {
        index * self.target_interval_ns
    }

    /// Number of frames needed to cover `duration_ns`, including frame 0.
    pub fn frames_covering(&self, duration_ns: u64) -> u64 {
        duration_ns.div_ceil(self.target_interval_ns) + 1
    }
}
