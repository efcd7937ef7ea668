//! In-process input layer for tests and demos
//!
//! [`MockInputSource`] behaves like a platform hook that never sees real
//! hardware: callers inject notifications with [`MockInputSource::emit`] and
//! inspect synthesized input with [`MockInputSource::synthesized`].
//! [`ManualClock`] and [`RecordingSleeper`] make capture timestamps and
//! playback waits deterministic.

use crate::capture::input::types::{MouseButton, RawNotification};
use crate::capture::traits::{Clock, InputListener, InputSynthesizer, NotificationSink};
use crate::playback::timing::Sleeper;
use crate::recorder::error::{MacroError, MacroResult};
use parking_lot::Mutex as ParkingMutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// One synthesis call observed by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesizedInput {
    KeyPressAndRelease(String),
    ButtonPress(MouseButton),
    ButtonRelease(MouseButton),
}

#[derive(Default)]
pub struct MockInputSource {
    keyboard_sinks: ParkingMutex<Vec<NotificationSink>>,
    mouse_sinks: ParkingMutex<Vec<NotificationSink>>,
    synthesized: ParkingMutex<Vec<SynthesizedInput>>,
    fail_subscribe: AtomicBool,
    failing_keys: ParkingMutex<HashSet<String>>,
}

impl MockInputSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a notification to every matching subscriber
    pub fn emit(&self, raw: RawNotification) {
        let sinks = match raw {
            RawNotification::Key { .. } => self.keyboard_sinks.lock().clone(),
            RawNotification::Button { .. } => self.mouse_sinks.lock().clone(),
        };
        for sink in sinks {
            sink.send(raw.clone());
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription_count() > 0
    }

    /// Number of live keyboard and mouse subscriptions
    pub fn subscription_count(&self) -> usize {
        self.keyboard_sinks.lock().len() + self.mouse_sinks.lock().len()
    }

    pub fn synthesized(&self) -> Vec<SynthesizedInput> {
        self.synthesized.lock().clone()
    }

    /// Make the next keyboard subscription fail with a platform error
    pub fn fail_next_subscribe(&self) {
        self.fail_subscribe.store(true, Ordering::SeqCst);
    }

    /// Make synthesis of `key` fail
    pub fn fail_synthesis_for(&self, key: &str) {
        self.failing_keys.lock().insert(key.to_string());
    }
}

impl InputListener for MockInputSource {
    fn subscribe_keyboard(&self, sink: NotificationSink) -> MacroResult<()> {
        if self.fail_subscribe.swap(false, Ordering::SeqCst) {
            return Err(MacroError::Platform("mock keyboard hook unavailable".to_string()));
        }
        self.keyboard_sinks.lock().push(sink);
        Ok(())
    }

    fn subscribe_mouse(&self, sink: NotificationSink) -> MacroResult<()> {
        self.mouse_sinks.lock().push(sink);
        Ok(())
    }

    fn unsubscribe_all(&self) {
        self.keyboard_sinks.lock().clear();
        self.mouse_sinks.lock().clear();
    }
}

impl InputSynthesizer for MockInputSource {
    fn press_and_release(&self, key: &str) -> MacroResult<()> {
        if self.failing_keys.lock().contains(key) {
            return Err(MacroError::Synthesis(format!("unsupported key {:?}", key)));
        }
        self.synthesized
            .lock()
            .push(SynthesizedInput::KeyPressAndRelease(key.to_string()));
        Ok(())
    }

    fn press_button(&self, button: MouseButton) -> MacroResult<()> {
        self.synthesized.lock().push(SynthesizedInput::ButtonPress(button));
        Ok(())
    }

    fn release_button(&self, button: MouseButton) -> MacroResult<()> {
        self.synthesized
            .lock()
            .push(SynthesizedInput::ButtonRelease(button));
        Ok(())
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: ParkingMutex<f64>,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self {
            now: ParkingMutex::new(start),
        }
    }

    pub fn advance(&self, secs: f64) {
        *self.now.lock() += secs;
    }

    pub fn set(&self, secs: f64) {
        *self.now.lock() = secs;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        *self.now.lock()
    }
}

/// Sleeper that returns immediately and remembers every requested wait
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    waits: ParkingMutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.waits.lock().push(duration);
    }
}
