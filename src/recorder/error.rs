//! Error types shared by capture, persistence and playback

use thiserror::Error;

/// Errors that can occur while recording, persisting or replaying a macro
#[derive(Error, Debug)]
pub enum MacroError {
    #[error("No recorded events to play")]
    EmptyLog,

    #[error("Malformed macro data: {0}")]
    Format(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not record notification: {0}")]
    Notification(String),

    #[error("Invalid playback speed: {0} (must be finite and greater than zero)")]
    InvalidSpeed(f64),

    #[error("Synthesis error: {0}")]
    Synthesis(String),

    #[error("Platform error: {0}")]
    Platform(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result type for macro operations
pub type MacroResult<T> = Result<T, MacroError>;
