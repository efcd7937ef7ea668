//! Delay reconstruction for playback

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Blocks the playback thread between synthesized actions
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Stops an in-flight playback before its next step
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Wait before an event recorded at `current`, given the previous event was
/// recorded at `previous`: `max(0, (current - previous) / speed_factor)`.
///
/// Both timestamps come from the recording, never from the playback clock,
/// so synthesis latency does not accumulate.
pub fn scaled_delay(previous: f64, current: f64, speed_factor: f64) -> Duration {
    let secs = ((current - previous) / speed_factor).max(0.0);
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO)
}
