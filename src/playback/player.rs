//! Replays a recorded [`EventLog`] through an [`InputSynthesizer`]

use crate::capture::input::types::{Action, MouseButton};
use crate::capture::traits::InputSynthesizer;
use crate::config::PlaybackConfig;
use crate::playback::timing::{scaled_delay, CancelToken, Sleeper};
use crate::recorder::error::{MacroError, MacroResult};
use crate::recorder::log::{Event, EventLog};
use serde::Serialize;

/// Outcome of a completed (or cancelled) playback
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackReport {
    /// Events turned into synthesized input
    pub synthesized: usize,
    /// Mouse events whose button has no synthesis counterpart
    pub skipped: usize,
    pub cancelled: bool,
}

/// Blocking, single-threaded playback.
///
/// Must not run while the same log is being recorded; nothing here guards
/// against that.
pub struct Player<'a> {
    synthesizer: &'a dyn InputSynthesizer,
    sleeper: &'a dyn Sleeper,
    cancel: Option<CancelToken>,
}

impl<'a> Player<'a> {
    pub fn new(synthesizer: &'a dyn InputSynthesizer, sleeper: &'a dyn Sleeper) -> Self {
        Self {
            synthesizer,
            sleeper,
            cancel: None,
        }
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }

    /// Replay `log`, waiting `config.lead_in()` first and then each recorded
    /// gap divided by `config.speed_factor`.
    pub fn play(&self, log: &EventLog, config: &PlaybackConfig) -> MacroResult<PlaybackReport> {
        let Some(first) = log.events().first() else {
            tracing::warn!("Playback requested with no recorded events");
            return Err(MacroError::EmptyLog);
        };
        config.validate()?;

        tracing::info!(
            "Playing {} events (speed={}, recorded duration={:.3}s)",
            log.len(),
            config.speed_factor,
            log.duration_secs()
        );

        let mut report = PlaybackReport::default();
        self.wait(config.lead_in());

        let mut previous = first.time();
        for event in log {
            if self.is_cancelled() {
                report.cancelled = true;
                break;
            }

            self.wait(scaled_delay(previous, event.time(), config.speed_factor));
            previous = event.time();

            if self.is_cancelled() {
                report.cancelled = true;
                break;
            }

            if self.replay_event(event)? {
                report.synthesized += 1;
            } else {
                report.skipped += 1;
            }
        }

        if report.cancelled {
            tracing::info!(
                "Playback cancelled after {} of {} events",
                report.synthesized + report.skipped,
                log.len()
            );
        } else {
            tracing::info!(
                "Playback complete ({} synthesized, {} skipped)",
                report.synthesized,
                report.skipped
            );
        }
        Ok(report)
    }

    fn wait(&self, duration: std::time::Duration) {
        if !duration.is_zero() {
            self.sleeper.sleep(duration);
        }
    }

    /// Returns `false` when the event was skipped
    fn replay_event(&self, event: &Event) -> MacroResult<bool> {
        match event {
            Event::Key { key, .. } => {
                self.synthesizer.press_and_release(key)?;
                Ok(true)
            }
            Event::Mouse { button, action, .. } => {
                let Some(button_id) = MouseButton::from_identifier(button) else {
                    tracing::debug!("Skipping unsupported mouse button {:?}", button);
                    return Ok(false);
                };
                match action {
                    Action::Down => self.synthesizer.press_button(button_id)?,
                    Action::Up => self.synthesizer.release_button(button_id)?,
                }
                Ok(true)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::mock::{MockInputSource, RecordingSleeper, SynthesizedInput};
    use std::time::Duration;

    fn assert_waits(actual: &[Duration], expected_secs: &[f64]) {
        assert_eq!(actual.len(), expected_secs.len(), "waits: {:?}", actual);
        for (wait, expected) in actual.iter().zip(expected_secs) {
            assert!(
                (wait.as_secs_f64() - expected).abs() < 1e-6,
                "waited {:?}, expected {}s",
                wait,
                expected
            );
        }
    }

    #[test]
    fn test_empty_log_reports_error_without_side_effects() {
        let source = MockInputSource::new();
        let sleeper = RecordingSleeper::new();

        let result =
            Player::new(&source, &sleeper).play(&EventLog::new(), &PlaybackConfig::default());

        assert!(matches!(result, Err(MacroError::EmptyLog)));
        assert!(source.synthesized().is_empty());
        assert!(sleeper.waits().is_empty());
    }

    #[test]
    fn test_recorded_gaps_are_scaled_by_speed() {
        let source = MockInputSource::new();
        let sleeper = RecordingSleeper::new();
        let log = EventLog::from_events(vec![
            Event::key("a", 50.0),
            Event::key("b", 50.5),
            Event::key("c", 52.0),
        ]);

        let report = Player::new(&source, &sleeper)
            .play(&log, &PlaybackConfig::with_speed(2.0))
            .unwrap();

        assert_waits(&sleeper.waits(), &[1.0, 0.25, 0.75]);
        assert_eq!(report.synthesized, 3);
        assert_eq!(
            source.synthesized(),
            vec![
                SynthesizedInput::KeyPressAndRelease("a".into()),
                SynthesizedInput::KeyPressAndRelease("b".into()),
                SynthesizedInput::KeyPressAndRelease("c".into()),
            ]
        );
    }

    #[test]
    fn test_slow_and_compressed_playback() {
        let log = EventLog::from_events(vec![Event::key("a", 0.0), Event::key("b", 1.0)]);

        let source = MockInputSource::new();
        let sleeper = RecordingSleeper::new();
        Player::new(&source, &sleeper)
            .play(&log, &PlaybackConfig::with_speed(0.5))
            .unwrap();
        assert_waits(&sleeper.waits(), &[1.0, 2.0]);

        let sleeper = RecordingSleeper::new();
        Player::new(&source, &sleeper)
            .play(&log, &PlaybackConfig::compressed())
            .unwrap();
        assert_waits(&sleeper.waits(), &[1.0, 0.2]);
    }

    #[test]
    fn test_timestamps_going_backwards_wait_zero() {
        let source = MockInputSource::new();
        let sleeper = RecordingSleeper::new();
        let log = EventLog::from_events(vec![
            Event::key("a", 10.0),
            Event::key("b", 9.0),
            Event::key("c", 9.5),
        ]);

        Player::new(&source, &sleeper)
            .play(&log, &PlaybackConfig::default())
            .unwrap();

        // Gap measured from the previous recorded event, not the largest so far
        assert_waits(&sleeper.waits(), &[1.0, 0.5]);
        assert_eq!(source.synthesized().len(), 3);
    }

    #[test]
    fn test_mouse_press_then_release_in_order() {
        let source = MockInputSource::new();
        let sleeper = RecordingSleeper::new();
        let log = EventLog::from_events(vec![
            Event::mouse("left", Action::Down, 1.0),
            Event::mouse("left", Action::Up, 1.2),
        ]);

        Player::new(&source, &sleeper)
            .play(&log, &PlaybackConfig::default())
            .unwrap();

        assert_eq!(
            source.synthesized(),
            vec![
                SynthesizedInput::ButtonPress(MouseButton::Left),
                SynthesizedInput::ButtonRelease(MouseButton::Left),
            ]
        );
    }

    #[test]
    fn test_unsupported_buttons_are_skipped() {
        let source = MockInputSource::new();
        let sleeper = RecordingSleeper::new();
        let log = EventLog::from_events(vec![
            Event::mouse("x2", Action::Down, 1.0),
            Event::key("a", 1.1),
            Event::mouse("x2", Action::Up, 1.2),
            Event::mouse("middle", Action::Down, 1.3),
        ]);

        let report = Player::new(&source, &sleeper)
            .play(&log, &PlaybackConfig::default())
            .unwrap();

        assert_eq!(report.synthesized, 2);
        assert_eq!(report.skipped, 2);
        assert!(!report.cancelled);
        assert_eq!(
            source.synthesized(),
            vec![
                SynthesizedInput::KeyPressAndRelease("a".into()),
                SynthesizedInput::ButtonPress(MouseButton::Middle),
            ]
        );
        // Skipped events still consume their recorded gap
        assert_waits(&sleeper.waits(), &[1.0, 0.1, 0.1, 0.1]);
    }

    #[test]
    fn test_invalid_speed_fails_before_any_action() {
        let source = MockInputSource::new();
        let sleeper = RecordingSleeper::new();
        let log = EventLog::from_events(vec![Event::key("a", 0.0)]);

        let result = Player::new(&source, &sleeper).play(&log, &PlaybackConfig::with_speed(0.0));

        assert!(matches!(result, Err(MacroError::InvalidSpeed(_))));
        assert!(sleeper.waits().is_empty());
        assert!(source.synthesized().is_empty());
    }

    #[test]
    fn test_synthesis_failure_aborts_playback() {
        let source = MockInputSource::new();
        source.fail_synthesis_for("bogus");
        let sleeper = RecordingSleeper::new();
        let log = EventLog::from_events(vec![
            Event::key("a", 0.0),
            Event::key("bogus", 0.1),
            Event::key("c", 0.2),
        ]);

        let result = Player::new(&source, &sleeper).play(&log, &PlaybackConfig::default());

        assert!(matches!(result, Err(MacroError::Synthesis(_))));
        assert_eq!(
            source.synthesized(),
            vec![SynthesizedInput::KeyPressAndRelease("a".into())]
        );
    }

    #[test]
    fn test_cancelled_playback_stops_before_next_event() {
        let source = MockInputSource::new();
        let sleeper = RecordingSleeper::new();
        let token = CancelToken::new();
        token.cancel();
        let log = EventLog::from_events(vec![Event::key("a", 0.0), Event::key("b", 1.0)]);

        let report = Player::new(&source, &sleeper)
            .with_cancel(token)
            .play(&log, &PlaybackConfig::default())
            .unwrap();

        assert!(report.cancelled);
        assert_eq!(report.synthesized, 0);
        assert!(source.synthesized().is_empty());
    }
}
