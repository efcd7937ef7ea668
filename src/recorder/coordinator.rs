//! Caller-facing macro operations
//!
//! [`MacroCoordinator`] owns the recording session and the current log and
//! exposes the operations a front-end drives: start/stop recording, save,
//! load and play.

use crate::capture::input::channel::InputRecorder;
use crate::capture::traits::{Clock, InputSource, SystemClock};
use crate::config::{MacroConfig, PlaybackConfig};
use crate::playback::player::{PlaybackReport, Player};
use crate::playback::timing::{CancelToken, Sleeper, ThreadSleeper};
use crate::recorder::error::MacroResult;
use crate::recorder::log::EventLog;
use crate::recorder::state::{MacroSummary, RecordingState};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

pub struct MacroCoordinator<S: InputSource + 'static> {
    source: Arc<S>,
    recorder: InputRecorder,
    config: MacroConfig,
    sleeper: Arc<dyn Sleeper>,
}

impl<S: InputSource + 'static> MacroCoordinator<S> {
    pub fn new(source: Arc<S>, config: MacroConfig) -> Self {
        Self::with_timing(source, config, Arc::new(SystemClock), Arc::new(ThreadSleeper))
    }

    /// Build a coordinator with an explicit capture clock and playback sleeper
    pub fn with_timing(
        source: Arc<S>,
        config: MacroConfig,
        clock: Arc<dyn Clock>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        let recorder = InputRecorder::new(source.clone(), clock, config.capture.clone());
        Self {
            source,
            recorder,
            config,
            sleeper,
        }
    }

    pub fn config(&self) -> &MacroConfig {
        &self.config
    }

    pub fn state(&self) -> RecordingState {
        if self.recorder.is_recording() {
            RecordingState::Recording
        } else {
            RecordingState::Idle
        }
    }

    /// Start a fresh recording. Does nothing if one is already running.
    pub fn start_recording(&mut self) -> MacroResult<()> {
        self.recorder.start()?;
        Ok(())
    }

    /// Stop the running recording. Does nothing if none is running.
    pub fn stop_recording(&mut self) -> MacroResult<()> {
        self.recorder.stop()?;
        Ok(())
    }

    /// Copy of the current log
    pub fn events(&self) -> EventLog {
        self.recorder.events()
    }

    pub fn summary(&self) -> MacroSummary {
        MacroSummary::of(&self.recorder.events())
    }

    pub fn pressed_buttons(&self) -> HashSet<String> {
        self.recorder.pressed_buttons()
    }

    /// Write the current log to `path`. Safe to call while recording; the
    /// file holds the events captured so far.
    pub fn save(&self, path: &Path) -> MacroResult<()> {
        self.recorder.events().save(path)
    }

    /// Replace the current log with the macro stored at `path`.
    ///
    /// On any failure the current log is left untouched. A running
    /// recording is stopped before its log is replaced.
    pub fn load(&mut self, path: &Path) -> MacroResult<()> {
        let log = EventLog::load(path)?;
        if self.recorder.stop()? {
            tracing::info!("Stopped active recording to load {:?}", path);
        }
        self.recorder.replace_log(log)
    }

    /// Replay the current log at `speed_factor`, using the configured lead-in
    pub fn play(&self, speed_factor: f64) -> MacroResult<PlaybackReport> {
        let config = PlaybackConfig {
            speed_factor,
            ..self.config.playback.clone()
        };
        self.play_with(&config, None)
    }

    pub fn play_with(
        &self,
        config: &PlaybackConfig,
        cancel: Option<CancelToken>,
    ) -> MacroResult<PlaybackReport> {
        let log = self.recorder.events();
        let mut player = Player::new(&*self.source, &*self.sleeper);
        if let Some(token) = cancel {
            player = player.with_cancel(token);
        }
        player.play(&log, config)
    }
}
