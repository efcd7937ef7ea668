//! Recorded event model and its on-disk form
//!
//! A macro file is a single JSON array. Every record carries a `type`
//! discriminator (`keyboard` or `mouse`), the key or button identifier under
//! `event`, a floating-point `time`, and for mouse records an `action`:
//!
//! ```json
//! [
//!   {"type": "keyboard", "event": "a", "time": 1718000000.125},
//!   {"type": "mouse", "event": "left", "action": "down", "time": 1718000000.5}
//! ]
//! ```

use crate::capture::input::types::Action;
use crate::recorder::error::{MacroError, MacroResult};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

/// One recorded keyboard or mouse occurrence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A key press. Releases are never recorded.
    #[serde(rename = "keyboard")]
    Key {
        #[serde(rename = "event")]
        key: String,
        time: f64,
    },
    #[serde(rename = "mouse")]
    Mouse {
        #[serde(rename = "event")]
        button: String,
        action: Action,
        time: f64,
    },
}

impl Event {
    pub fn key(key: impl Into<String>, time: f64) -> Self {
        Event::Key {
            key: key.into(),
            time,
        }
    }

    pub fn mouse(button: impl Into<String>, action: Action, time: f64) -> Self {
        Event::Mouse {
            button: button.into(),
            action,
            time,
        }
    }

    /// Seconds since the Unix epoch at which the event was captured
    pub fn time(&self) -> f64 {
        match self {
            Event::Key { time, .. } | Event::Mouse { time, .. } => *time,
        }
    }
}

/// Ordered record of accepted events; insertion order is capture order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_events(events: Vec<Event>) -> Self {
        Self { events }
    }

    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Recorded span between the first and last event, in seconds
    pub fn duration_secs(&self) -> f64 {
        match (self.events.first(), self.events.last()) {
            (Some(first), Some(last)) => (last.time() - first.time()).max(0.0),
            _ => 0.0,
        }
    }

    pub fn serialize(&self) -> MacroResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn deserialize(bytes: &[u8]) -> MacroResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Write the log to `path`.
    ///
    /// The data goes to a temporary file next to the destination first and is
    /// renamed into place only once fully written, so a failure never leaves a
    /// truncated macro at `path`.
    pub fn save(&self, path: &Path) -> MacroResult<()> {
        let data = self.serialize()?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&data)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| MacroError::Io(e.error))?;

        tracing::info!("Saved {} events to {:?}", self.len(), path);
        Ok(())
    }

    pub fn load(path: &Path) -> MacroResult<Self> {
        let data = std::fs::read(path)?;
        let log = Self::deserialize(&data)?;
        tracing::info!("Loaded {} events from {:?}", log.len(), path);
        Ok(log)
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_log() -> EventLog {
        EventLog::from_events(vec![
            Event::key("a", 1_718_000_000.125),
            Event::mouse("left", Action::Down, 1_718_000_000.5),
            Event::mouse("left", Action::Up, 1_718_000_000.625),
            Event::key("space", 1_718_000_001.0),
        ])
    }

    #[test]
    fn test_serialized_field_names() {
        let json: serde_json::Value =
            serde_json::from_slice(&sample_log().serialize().unwrap()).unwrap();

        assert_eq!(json[0]["type"], "keyboard");
        assert_eq!(json[0]["event"], "a");
        assert!(json[0].get("action").is_none());
        assert_eq!(json[1]["type"], "mouse");
        assert_eq!(json[1]["event"], "left");
        assert_eq!(json[1]["action"], "down");
        assert_eq!(json[1]["time"], 1_718_000_000.5);
    }

    #[test]
    fn test_reads_existing_macro_file_format() {
        let data = br#"[
            {"type": "keyboard", "event": "enter", "time": 10.0},
            {"type": "mouse", "event": "right", "action": "up", "time": 10.25}
        ]"#;
        let log = EventLog::deserialize(data).unwrap();
        assert_eq!(
            log.events(),
            &[
                Event::key("enter", 10.0),
                Event::mouse("right", Action::Up, 10.25)
            ]
        );
    }

    #[test]
    fn test_malformed_input_is_format_error() {
        let cases: [&[u8]; 5] = [
            b"not json",
            b"{\"type\": \"keyboard\"}",
            b"[{\"type\": \"touch\", \"event\": \"a\", \"time\": 1.0}]",
            b"[{\"type\": \"mouse\", \"event\": \"left\", \"time\": 1.0}]",
            b"[{\"type\": \"keyboard\", \"event\": \"a\", \"time\": \"soon\"}]",
        ];
        for data in cases {
            assert!(
                matches!(EventLog::deserialize(data), Err(MacroError::Format(_))),
                "expected format error for {:?}",
                String::from_utf8_lossy(data)
            );
        }
    }

    #[test]
    fn test_empty_array_loads_as_empty_log() {
        let log = EventLog::deserialize(b"[]").unwrap();
        assert!(log.is_empty());
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("macro.json");

        let log = sample_log();
        log.save(&path).unwrap();
        assert_eq!(EventLog::load(&path).unwrap(), log);
    }

    #[test]
    fn test_save_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("macro.json");

        sample_log().save(&path).unwrap();
        let shorter = EventLog::from_events(vec![Event::key("q", 2.0)]);
        shorter.save(&path).unwrap();

        assert_eq!(EventLog::load(&path).unwrap(), shorter);
    }

    #[test]
    fn test_save_into_missing_directory_fails_without_leaving_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("macro.json");

        let result = sample_log().save(&path);
        assert!(matches!(result, Err(MacroError::Io(_))));
        assert!(!path.exists());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = EventLog::load(&dir.path().join("nope.json"));
        assert!(matches!(result, Err(MacroError::Io(_))));
    }

    #[test]
    fn test_duration() {
        assert_eq!(EventLog::new().duration_secs(), 0.0);
        assert!((sample_log().duration_secs() - 0.875).abs() < 1e-9);
    }

    fn arb_event() -> impl Strategy<Value = Event> {
        let identifier = "[a-z0-9_]{1,12}";
        let time = 0.0f64..2.0e9;
        prop_oneof![
            (identifier, time.clone()).prop_map(|(key, time)| Event::key(key, time)),
            (identifier, any::<bool>(), time).prop_map(|(button, down, time)| {
                let action = if down { Action::Down } else { Action::Up };
                Event::mouse(button, action, time)
            }),
        ]
    }

    proptest! {
        #[test]
        fn prop_serialization_preserves_every_field(events in prop::collection::vec(arb_event(), 1..40)) {
            let log = EventLog::from_events(events);
            let restored = EventLog::deserialize(&log.serialize().unwrap()).unwrap();
            prop_assert_eq!(restored, log);
        }
    }
}
