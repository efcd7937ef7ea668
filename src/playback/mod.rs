//! Macro playback
//!
//! Replays a recorded log on a single blocking timeline, reconstructing the
//! recorded gaps between events scaled by a speed factor.

pub mod player;
pub mod timing;

pub use player::{PlaybackReport, Player};
pub use timing::{scaled_delay, CancelToken, Sleeper, ThreadSleeper};
