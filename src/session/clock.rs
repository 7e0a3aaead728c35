//! # Frame Clock
//!
//! Classifies each frame's timestamp against the last accepted frame.
//!
//! | Condition (`period = t - previous`) | Verdict |
//! |-------------------------------------|---------|
//! | first frame | `Accepted { period_ms: 0 }` |
//! | `previous - t > reorder_tolerance_ms` | `Reordered` |
//! | `period < 0` | `ClockAnomaly` |
//! | `period > watchdog_timeout_ms` | `Stalled` |
//! | otherwise | `Accepted` |
//!
//! Only `Accepted` and `Stalled` frames advance the clock.

/// Default gap that counts as a stalled input source.
pub const DEFAULT_WATCHDOG_TIMEOUT_MS: i64 = 100;

/// Default backwards jitter before a frame counts as reordered.
pub const DEFAULT_REORDER_TOLERANCE_MS: i64 = 2;

/// What to do with a frame, judged by its timestamp alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameVerdict {
    /// In order; dispatch normally
    Accepted { period_ms: i64 },
    /// In order but after a gap; reset the session, then dispatch
    Stalled { period_ms: i64 },
    /// Older than the previous frame by more than the tolerance; drop
    Reordered { behind_ms: i64 },
    /// Slightly older than the previous frame; drop
    ClockAnomaly { period_ms: i64 },
}

impl FrameVerdict {
    #[must_use]
    pub fn is_dropped(self) -> bool {
        matches!(self, FrameVerdict::Reordered { .. } | FrameVerdict::ClockAnomaly { .. })
    }
}

/// Tracks the timestamp of the last accepted frame.
#[derive(Debug, Clone)]
pub struct FrameClock {
    watchdog_timeout_ms: i64,
    reorder_tolerance_ms: i64,
    previous: Option<i64>,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(DEFAULT_WATCHDOG_TIMEOUT_MS, DEFAULT_REORDER_TOLERANCE_MS)
    }
}

impl FrameClock {
    #[must_use]
    pub fn new(watchdog_timeout_ms: i64, reorder_tolerance_ms: i64) -> Self {
        Self {
            watchdog_timeout_ms,
            reorder_tolerance_ms,
            previous: None,
        }
    }

    /// Timestamp of the last accepted frame.
    #[must_use]
    pub fn previous(&self) -> Option<i64> {
        self.previous
    }

    pub fn observe(&mut self, timestamp_ms: i64) -> FrameVerdict {
        let Some(previous) = self.previous else {
            self.previous = Some(timestamp_ms);
            return FrameVerdict::Accepted { period_ms: 0 };
        };

        let behind_ms = previous.saturating_sub(timestamp_ms);
        if behind_ms > self.reorder_tolerance_ms {
            return FrameVerdict::Reordered { behind_ms };
        }

        let period_ms = timestamp_ms.saturating_sub(previous);
        if period_ms < 0 {
            return FrameVerdict::ClockAnomaly { period_ms };
        }

        self.previous = Some(timestamp_ms);
        if period_ms > self.watchdog_timeout_ms {
            FrameVerdict::Stalled { period_ms }
        } else {
            FrameVerdict::Accepted { period_ms }
        }
    }
}
