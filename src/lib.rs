//! Macro Recorder - record global keyboard and mouse input, replay it later.
//!
//! This is the library crate behind the `macro-recorder` binary. It provides
//! the capture pipeline, the event log and its file format, and playback.

pub mod capture;
pub mod commands;
pub mod config;
pub mod playback;
pub mod recorder;

pub use config::{CaptureConfig, MacroConfig, PlaybackConfig};
pub use playback::{PlaybackReport, Player};
pub use recorder::{Event, EventLog, MacroCoordinator, MacroError, MacroResult};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "macro_recorder=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("Macro Recorder v{}", env!("CARGO_PKG_VERSION"));
}
