//! Input capture and synthesis
//!
//! This module defines the contract with the platform input layer and the
//! recording pipeline built on top of it.

pub mod traits;
pub mod input;
pub mod mock;

#[cfg(feature = "native")]
pub mod native;

// Re-export traits
pub use traits::{
    Clock, InputListener, InputSource, InputSynthesizer, NotificationSink, SystemClock,
};

// Re-export input recorder
pub use input::InputRecorder;
