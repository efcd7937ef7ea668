//! Playback command

use crate::capture::traits::{InputSource, SystemClock};
use crate::config::{MacroConfig, PlaybackConfig};
use crate::playback::player::PlaybackReport;
use crate::playback::timing::{CancelToken, Sleeper};
use crate::recorder::coordinator::MacroCoordinator;
use anyhow::Context;
use std::path::Path;
use std::sync::Arc;

/// Load the macro at `input` and replay it on a blocking thread.
///
/// Cancelling `cancel` stops playback before its next event.
pub async fn play_macro<S>(
    source: Arc<S>,
    sleeper: Arc<dyn Sleeper>,
    config: MacroConfig,
    input: &Path,
    playback: PlaybackConfig,
    cancel: CancelToken,
) -> anyhow::Result<PlaybackReport>
where
    S: InputSource + 'static,
{
    let mut coordinator =
        MacroCoordinator::with_timing(source, config, Arc::new(SystemClock), sleeper);
    coordinator
        .load(input)
        .with_context(|| format!("Failed to load macro from {}", input.display()))?;

    let report = tokio::task::spawn_blocking(move || coordinator.play_with(&playback, Some(cancel)))
        .await
        .context("Playback thread failed")?
        .context("Playback failed")?;

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::input::types::{Action, MouseButton};
    use crate::capture::mock::{MockInputSource, RecordingSleeper, SynthesizedInput};
    use crate::recorder::error::MacroError;
    use crate::recorder::log::{Event, EventLog};

    #[tokio::test]
    async fn test_plays_stored_macro() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("macro.json");
        EventLog::from_events(vec![
            Event::mouse("right", Action::Down, 3.0),
            Event::mouse("right", Action::Up, 3.5),
        ])
        .save(&input)
        .unwrap();

        let source = Arc::new(MockInputSource::new());
        let sleeper = Arc::new(RecordingSleeper::new());
        let report = play_macro(
            source.clone(),
            sleeper.clone(),
            MacroConfig::default(),
            &input,
            PlaybackConfig::with_speed(2.0),
            CancelToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(report.synthesized, 2);
        assert_eq!(
            source.synthesized(),
            vec![
                SynthesizedInput::ButtonPress(MouseButton::Right),
                SynthesizedInput::ButtonRelease(MouseButton::Right),
            ]
        );
        assert_eq!(sleeper.waits().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_macro_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("empty.json");
        std::fs::write(&input, "[]").unwrap();

        let source = Arc::new(MockInputSource::new());
        let error = play_macro(
            source.clone(),
            Arc::new(RecordingSleeper::new()),
            MacroConfig::default(),
            &input,
            PlaybackConfig::default(),
            CancelToken::new(),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            error.downcast_ref::<MacroError>(),
            Some(MacroError::EmptyLog)
        ));
        assert!(source.synthesized().is_empty());
    }
}
