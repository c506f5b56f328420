//! Progress, speed, and ETA derivation from byte-count deltas.
//!
//! All values here are advisory telemetry for display. They are never fed
//! back into the job state machine, so rounding artifacts cannot affect
//! lifecycle transitions.

use std::time::Instant;

/// A single progress measurement
///
/// Every field is optional: with an unknown total size there is no
/// percentage or ETA to report, and with zero elapsed time there is no
/// speed. Undefined values stay `None` rather than being computed from a
/// zero or missing denominator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Progress {
    /// Progress percentage, `ceil(bytes_received / total_size * 100)`
    pub percentage: Option<u32>,

    /// Instantaneous speed in bytes per millisecond
    pub speed: Option<f64>,

    /// Estimated seconds until completion
    pub eta_seconds: Option<f64>,
}

impl Progress {
    /// Compute a measurement from cumulative bytes, the optional total, and
    /// elapsed milliseconds since the stream started.
    ///
    /// Pure function of its inputs; no clock access.
    pub fn compute(bytes_received: u64, total_size: Option<u64>, elapsed_ms: u64) -> Self {
        let percentage = match total_size {
            Some(total) if total > 0 => {
                Some((bytes_received as f64 / total as f64 * 100.0).ceil() as u32)
            }
            _ => None,
        };

        // First sample arrives with zero elapsed time; speed is undefined
        // there, not infinite
        let speed = if elapsed_ms > 0 {
            Some(bytes_received as f64 / elapsed_ms as f64)
        } else {
            None
        };

        let eta_seconds = match (total_size, speed) {
            (Some(total), Some(speed)) if total > 0 && speed > 0.0 => {
                let remaining = total.saturating_sub(bytes_received);
                Some(remaining as f64 / (speed * 1000.0))
            }
            _ => None,
        };

        Self {
            percentage,
            speed,
            eta_seconds,
        }
    }
}

/// Tracks one job's progress against its start time and total size
#[derive(Clone, Debug)]
pub struct ProgressTracker {
    started_at: Instant,
    total_size: Option<u64>,
}

impl ProgressTracker {
    /// Create a tracker, recording "now" as the stream start time.
    ///
    /// Call this when the byte stream begins producing data, not when the
    /// request was received — speed and ETA are measured from first byte.
    pub fn new(total_size: Option<u64>) -> Self {
        Self {
            started_at: Instant::now(),
            total_size,
        }
    }

    /// Total size this tracker was created with
    pub fn total_size(&self) -> Option<u64> {
        self.total_size
    }

    /// Measure progress for the given cumulative byte count
    pub fn sample(&self, bytes_received: u64) -> Progress {
        let elapsed_ms = self.started_at.elapsed().as_millis() as u64;
        Progress::compute(bytes_received, self.total_size, elapsed_ms)
    }
}
