use macro_recorder::capture::input::{Action, MouseButton, RawNotification};
use macro_recorder::capture::mock::{
    ManualClock, MockInputSource, RecordingSleeper, SynthesizedInput,
};
use macro_recorder::recorder::RecordingState;
use macro_recorder::{Event, EventLog, MacroConfig, MacroCoordinator, MacroError};
use std::sync::Arc;

fn coordinator(
    source: &Arc<MockInputSource>,
    clock: &Arc<ManualClock>,
    sleeper: &Arc<RecordingSleeper>,
) -> MacroCoordinator<MockInputSource> {
    MacroCoordinator::with_timing(
        source.clone(),
        MacroConfig::default(),
        clock.clone(),
        sleeper.clone(),
    )
}

#[test]
fn record_save_load_and_replay() {
    let source = Arc::new(MockInputSource::new());
    let clock = Arc::new(ManualClock::new(1_700_000_000.0));
    let sleeper = Arc::new(RecordingSleeper::new());
    let mut recorder = coordinator(&source, &clock, &sleeper);

    recorder.start_recording().unwrap();

    // Held key with auto-repeat, then released
    source.emit(RawNotification::key_down("w"));
    clock.advance(0.03);
    source.emit(RawNotification::key_down("w"));
    clock.advance(0.03);
    source.emit(RawNotification::key_down("w"));
    source.emit(RawNotification::key_up("w"));

    clock.advance(0.44);
    source.emit(RawNotification::button("left", Action::Down));
    clock.advance(0.1);
    source.emit(RawNotification::button("x1", Action::Down));
    clock.advance(0.1);
    source.emit(RawNotification::button("left", Action::Up));
    clock.advance(1.3);
    source.emit(RawNotification::key_down("enter"));

    recorder.stop_recording().unwrap();
    assert_eq!(recorder.state(), RecordingState::Idle);

    let recorded = recorder.events();
    assert_eq!(recorded.len(), 5);
    assert!(matches!(&recorded.events()[0], Event::Key { key, .. } if key == "w"));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    recorder.save(&path).unwrap();

    // A fresh coordinator, as a front-end would have after a restart
    let player_source = Arc::new(MockInputSource::new());
    let player_sleeper = Arc::new(RecordingSleeper::new());
    let mut player = coordinator(&player_source, &clock, &player_sleeper);
    player.load(&path).unwrap();
    assert_eq!(player.events(), recorded);

    let report = player.play(2.0).unwrap();

    assert_eq!(report.synthesized, 4);
    assert_eq!(report.skipped, 1);
    assert_eq!(
        player_source.synthesized(),
        vec![
            SynthesizedInput::KeyPressAndRelease("w".into()),
            SynthesizedInput::ButtonPress(MouseButton::Left),
            SynthesizedInput::ButtonRelease(MouseButton::Left),
            SynthesizedInput::KeyPressAndRelease("enter".into()),
        ]
    );

    let waits: Vec<f64> = player_sleeper
        .waits()
        .iter()
        .map(|d| d.as_secs_f64())
        .collect();
    let expected = [1.0, 0.25, 0.05, 0.05, 0.65];
    assert_eq!(waits.len(), expected.len(), "waits: {:?}", waits);
    for (wait, expected) in waits.iter().zip(expected) {
        assert!((wait - expected).abs() < 1e-4, "waited {} expected {}", wait, expected);
    }
}

#[test]
fn start_while_recording_is_idempotent() {
    let source = Arc::new(MockInputSource::new());
    let clock = Arc::new(ManualClock::new(0.0));
    let sleeper = Arc::new(RecordingSleeper::new());
    let mut recorder = coordinator(&source, &clock, &sleeper);

    recorder.start_recording().unwrap();
    source.emit(RawNotification::key_down("a"));
    recorder.start_recording().unwrap();
    clock.advance(1.0);
    source.emit(RawNotification::key_down("b"));
    recorder.stop_recording().unwrap();

    // One notification per emit: a second subscription would have doubled them
    assert_eq!(
        recorder.events(),
        EventLog::from_events(vec![Event::key("a", 0.0), Event::key("b", 1.0)])
    );
}

#[test]
fn playing_nothing_reports_empty_log() {
    let source = Arc::new(MockInputSource::new());
    let clock = Arc::new(ManualClock::new(0.0));
    let sleeper = Arc::new(RecordingSleeper::new());
    let recorder = coordinator(&source, &clock, &sleeper);

    assert!(matches!(recorder.play(1.0), Err(MacroError::EmptyLog)));
    assert!(source.synthesized().is_empty());
    assert!(sleeper.waits().is_empty());
}
