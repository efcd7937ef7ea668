//! Capture and playback configuration
//!
//! Configuration is a small JSON document; every field is optional and
//! falls back to the defaults below:
//!
//! ```json
//! {
//!   "capture": { "debounceSecs": 0.1, "trackPressedButtons": true },
//!   "playback": { "speedFactor": 1.0, "leadInSecs": 1.0 }
//! }
//! ```

use crate::recorder::error::{MacroError, MacroResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Window inside which a repeated press of the same key counts as key-repeat
pub const DEFAULT_DEBOUNCE_SECS: f64 = 0.1;

/// Pause before the first synthesized action, so the operator can let go
/// of whatever triggered playback
pub const DEFAULT_LEAD_IN_SECS: f64 = 1.0;

/// Uniform time scale of the compressed playback mode
pub const COMPRESSED_TIME_SCALE: f64 = 0.2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CaptureConfig {
    pub debounce_secs: f64,
    /// Keep the set of currently held mouse buttons up to date while recording
    pub track_pressed_buttons: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            debounce_secs: DEFAULT_DEBOUNCE_SECS,
            track_pressed_buttons: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlaybackConfig {
    /// Recorded delays are divided by this factor; 2.0 plays twice as fast
    pub speed_factor: f64,
    pub lead_in_secs: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            speed_factor: 1.0,
            lead_in_secs: DEFAULT_LEAD_IN_SECS,
        }
    }
}

impl PlaybackConfig {
    pub fn with_speed(speed_factor: f64) -> Self {
        Self {
            speed_factor,
            ..Self::default()
        }
    }

    /// Every recorded delay scaled by [`COMPRESSED_TIME_SCALE`]
    pub fn compressed() -> Self {
        Self::with_speed(1.0 / COMPRESSED_TIME_SCALE)
    }

    pub fn lead_in(&self) -> Duration {
        Duration::try_from_secs_f64(self.lead_in_secs).unwrap_or(Duration::ZERO)
    }

    pub fn validate(&self) -> MacroResult<()> {
        if !self.speed_factor.is_finite() || self.speed_factor <= 0.0 {
            return Err(MacroError::InvalidSpeed(self.speed_factor));
        }
        if !self.lead_in_secs.is_finite() || self.lead_in_secs < 0.0 {
            return Err(MacroError::Configuration(format!(
                "lead-in must be a non-negative number of seconds, got {}",
                self.lead_in_secs
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacroConfig {
    pub capture: CaptureConfig,
    pub playback: PlaybackConfig,
}

impl MacroConfig {
    pub fn load(path: &Path) -> MacroResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: MacroConfig = serde_json::from_str(&content)
            .map_err(|e| MacroError::Configuration(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> MacroResult<()> {
        if !self.capture.debounce_secs.is_finite() || self.capture.debounce_secs < 0.0 {
            return Err(MacroError::Configuration(format!(
                "debounce must be a non-negative number of seconds, got {}",
                self.capture.debounce_secs
            )));
        }
        self.playback.validate()
    }
}
