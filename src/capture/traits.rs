//! Contract between the recorder and the platform input layer
//!
//! The platform layer is split in two halves: an [`InputListener`] that
//! pushes classified notifications into a [`NotificationSink`], and an
//! [`InputSynthesizer`] that injects key and button presses during playback.

use crate::capture::input::types::{MouseButton, RawNotification};
use crate::recorder::error::MacroResult;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// Source of capture timestamps, in seconds
pub trait Clock: Send + Sync {
    fn now(&self) -> f64;
}

/// Wall clock: seconds since the Unix epoch
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
    }
}

/// Message consumed by the capture worker
#[derive(Debug)]
pub(crate) enum CaptureMessage {
    Notification { raw: RawNotification, at: f64 },
    Stop,
}

/// Sending half of the capture queue, handed to listeners on subscribe.
///
/// Each notification is stamped with the recorder's clock as it is queued,
/// so queueing latency never shifts the recorded timeline.
#[derive(Clone)]
pub struct NotificationSink {
    tx: UnboundedSender<CaptureMessage>,
    clock: Arc<dyn Clock>,
}

impl NotificationSink {
    pub(crate) fn new(tx: UnboundedSender<CaptureMessage>, clock: Arc<dyn Clock>) -> Self {
        Self { tx, clock }
    }

    /// Queue a notification. Returns `false` once the recording session
    /// that owns this sink has gone away.
    pub fn send(&self, raw: RawNotification) -> bool {
        let at = self.clock.now();
        self.tx.send(CaptureMessage::Notification { raw, at }).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl std::fmt::Debug for NotificationSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationSink")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

/// Global keyboard and mouse-button notifications
pub trait InputListener: Send + Sync {
    /// Start delivering key down/up notifications to `sink`
    fn subscribe_keyboard(&self, sink: NotificationSink) -> MacroResult<()>;

    /// Start delivering mouse button down/up notifications to `sink`
    fn subscribe_mouse(&self, sink: NotificationSink) -> MacroResult<()>;

    /// Stop delivering notifications to every subscribed sink
    fn unsubscribe_all(&self);
}

/// Synthetic input injection
pub trait InputSynthesizer: Send + Sync {
    /// Press and release the key named by `key`
    fn press_and_release(&self, key: &str) -> MacroResult<()>;

    fn press_button(&self, button: MouseButton) -> MacroResult<()>;

    fn release_button(&self, button: MouseButton) -> MacroResult<()>;
}

/// A complete platform input layer
pub trait InputSource: InputListener + InputSynthesizer {}

impl<T: InputListener + InputSynthesizer> InputSource for T {}
