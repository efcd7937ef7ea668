//! Keyboard and mouse button capture
//!
//! Implements the recording side of a macro: notifications arrive from an
//! [`InputListener`](crate::capture::traits::InputListener), pass through the
//! debounce filter and land in an [`EventLog`](crate::recorder::log::EventLog).

pub mod channel;
pub mod filter;
pub mod types;

pub use channel::InputRecorder;
pub use filter::{EventFilter, FilterOutcome, RecordingSession};
pub use types::{Action, MouseButton, RawNotification};
