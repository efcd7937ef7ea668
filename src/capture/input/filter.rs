//! Turns raw notifications into recorded events
//!
//! Key-down notifications are debounced against the last accepted key press:
//! a repeat of the same key inside the debounce window is hardware
//! auto-repeat and is dropped. Key-ups are never recorded. Mouse button
//! transitions are always recorded.

use crate::capture::input::types::{Action, RawNotification};
use crate::config::CaptureConfig;
use crate::recorder::error::{MacroError, MacroResult};
use crate::recorder::log::{Event, EventLog};
use std::collections::HashSet;

/// Per-recording filter state, reset whenever a recording starts
#[derive(Debug, Clone, Default)]
pub struct RecordingSession {
    last_key_event: Option<(String, f64)>,
    pressed_buttons: HashSet<String>,
}

impl RecordingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last accepted key press and its timestamp
    pub fn last_key_event(&self) -> Option<(&str, f64)> {
        self.last_key_event
            .as_ref()
            .map(|(key, time)| (key.as_str(), *time))
    }

    /// Buttons seen going down and not yet released
    pub fn pressed_buttons(&self) -> &HashSet<String> {
        &self.pressed_buttons
    }

    pub fn reset(&mut self) {
        self.last_key_event = None;
        self.pressed_buttons.clear();
    }
}

/// What the filter did with a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOutcome {
    Recorded,
    /// Dropped as a key-repeat of the previous press
    Debounced,
    /// Not part of the event model (key releases)
    Ignored,
}

#[derive(Debug, Clone)]
pub struct EventFilter {
    config: CaptureConfig,
    session: RecordingSession,
}

impl EventFilter {
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            session: RecordingSession::new(),
        }
    }

    pub fn session(&self) -> &RecordingSession {
        &self.session
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    /// Classify one notification captured at `at` and append it to `log`
    /// if it is accepted.
    pub fn on_notification(
        &mut self,
        raw: RawNotification,
        at: f64,
        log: &mut EventLog,
    ) -> MacroResult<FilterOutcome> {
        if !at.is_finite() {
            return Err(MacroError::Notification(format!(
                "timestamp {} is not a finite number",
                at
            )));
        }

        match raw {
            RawNotification::Key { key, action } => {
                validate_identifier("key", &key)?;

                if action == Action::Up {
                    return Ok(FilterOutcome::Ignored);
                }

                if let Some((last_key, last_time)) = &self.session.last_key_event {
                    if *last_key == key
                        && whole_micros(at - last_time) < whole_micros(self.config.debounce_secs)
                    {
                        tracing::debug!("Debounced repeat of key {:?}", key);
                        return Ok(FilterOutcome::Debounced);
                    }
                }

                self.session.last_key_event = Some((key.clone(), at));
                tracing::debug!("Recorded key {:?} at {:.3}", key, at);
                log.push(Event::key(key, at));
                Ok(FilterOutcome::Recorded)
            }
            RawNotification::Button { button, action } => {
                validate_identifier("button", &button)?;

                if self.config.track_pressed_buttons {
                    match action {
                        Action::Down => {
                            self.session.pressed_buttons.insert(button.clone());
                        }
                        Action::Up => {
                            self.session.pressed_buttons.remove(&button);
                        }
                    }
                }

                tracing::debug!("Recorded button {:?} {} at {:.3}", button, action, at);
                log.push(Event::mouse(button, action, at));
                Ok(FilterOutcome::Recorded)
            }
        }
    }
}

/// Epoch-second timestamps carry sub-microsecond rounding noise, so gaps
/// are compared at microsecond resolution.
fn whole_micros(secs: f64) -> i64 {
    (secs * 1e6).round() as i64
}

fn validate_identifier(kind: &str, identifier: &str) -> MacroResult<()> {
    if identifier.trim().is_empty() {
        return Err(MacroError::Notification(format!("empty {} identifier", kind)));
    }
    Ok(())
}
