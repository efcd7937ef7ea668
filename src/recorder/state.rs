//! Recording state shared with front-ends

use crate::capture::input::types::Action;
use crate::recorder::log::{Event, EventLog};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordingState {
    Idle,
    Recording,
}

/// Counts and span of a macro, for display
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroSummary {
    pub total_events: usize,
    pub key_presses: usize,
    pub button_presses: usize,
    pub button_releases: usize,
    pub duration_secs: f64,
}

impl MacroSummary {
    pub fn of(log: &EventLog) -> Self {
        let mut summary = MacroSummary {
            total_events: log.len(),
            duration_secs: log.duration_secs(),
            ..Default::default()
        };
        for event in log {
            match event {
                Event::Key { .. } => summary.key_presses += 1,
                Event::Mouse {
                    action: Action::Down,
                    ..
                } => summary.button_presses += 1,
                Event::Mouse {
                    action: Action::Up,
                    ..
                } => summary.button_releases += 1,
            }
        }
        summary
    }
}
