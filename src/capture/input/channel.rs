use crate::capture::input::filter::EventFilter;
use crate::capture::traits::{CaptureMessage, Clock, InputListener, NotificationSink};
use crate::config::CaptureConfig;
use crate::recorder::error::{MacroError, MacroResult};
use crate::recorder::log::EventLog;
use parking_lot::Mutex as ParkingMutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Filter state and the log it appends to, shared with the capture worker
struct CaptureState {
    filter: EventFilter,
    log: EventLog,
}

/// Records global input into an [`EventLog`].
///
/// While recording, the listener pushes notifications into a queue that a
/// single worker thread drains through the [`EventFilter`]. Readers take the
/// state lock only to copy the log out.
pub struct InputRecorder {
    listener: Arc<dyn InputListener>,
    clock: Arc<dyn Clock>,
    is_recording: AtomicBool,
    state: Arc<ParkingMutex<CaptureState>>,
    control: Option<UnboundedSender<CaptureMessage>>,
    thread_handle: Option<std::thread::JoinHandle<()>>,
}

impl InputRecorder {
    pub fn new(
        listener: Arc<dyn InputListener>,
        clock: Arc<dyn Clock>,
        config: CaptureConfig,
    ) -> Self {
        Self {
            listener,
            clock,
            is_recording: AtomicBool::new(false),
            state: Arc::new(ParkingMutex::new(CaptureState {
                filter: EventFilter::new(config),
                log: EventLog::new(),
            })),
            control: None,
            thread_handle: None,
        }
    }

    /// Begin a new recording, discarding the previous log.
    ///
    /// Returns `Ok(false)` without touching anything if a recording is
    /// already in progress.
    pub fn start(&mut self) -> MacroResult<bool> {
        if self.is_recording.load(Ordering::SeqCst) {
            tracing::debug!("Recording already active, ignoring start");
            return Ok(false);
        }

        {
            let mut state = self.state.lock();
            state.log.clear();
            state.filter.reset();
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let state = self.state.clone();
        let handle = std::thread::Builder::new()
            .name("input-capture".to_string())
            .spawn(move || run_capture_worker(rx, state))?;

        let sink = NotificationSink::new(tx.clone(), self.clock.clone());
        let subscribed = self
            .listener
            .subscribe_keyboard(sink.clone())
            .and_then(|_| self.listener.subscribe_mouse(sink));

        if let Err(e) = subscribed {
            self.listener.unsubscribe_all();
            let _ = tx.send(CaptureMessage::Stop);
            let _ = handle.join();
            return Err(e);
        }

        self.control = Some(tx);
        self.thread_handle = Some(handle);
        self.is_recording.store(true, Ordering::SeqCst);

        tracing::info!("Input recording started");
        Ok(true)
    }

    /// End the current recording and freeze its log.
    ///
    /// Returns `Ok(false)` if nothing was being recorded.
    pub fn stop(&mut self) -> MacroResult<bool> {
        if !self.is_recording.load(Ordering::SeqCst) {
            return Ok(false);
        }

        self.listener.unsubscribe_all();
        self.is_recording.store(false, Ordering::SeqCst);

        if let Some(control) = self.control.take() {
            let _ = control.send(CaptureMessage::Stop);
        }
        if let Some(handle) = self.thread_handle.take() {
            handle
                .join()
                .map_err(|_| MacroError::Platform("input capture thread panicked".to_string()))?;
        }

        tracing::info!(
            "Input recording stopped ({} events)",
            self.state.lock().log.len()
        );
        Ok(true)
    }

    pub fn is_recording(&self) -> bool {
        self.is_recording.load(Ordering::SeqCst)
    }

    /// Copy of the log as recorded so far
    pub fn events(&self) -> EventLog {
        self.state.lock().log.clone()
    }

    pub fn event_count(&self) -> usize {
        self.state.lock().log.len()
    }

    /// Mouse buttons currently held down, as seen by the active recording
    pub fn pressed_buttons(&self) -> HashSet<String> {
        self.state.lock().filter.session().pressed_buttons().clone()
    }

    /// Replace the log wholesale. Only valid while not recording.
    pub fn replace_log(&mut self, log: EventLog) -> MacroResult<()> {
        if self.is_recording() {
            return Err(MacroError::Configuration(
                "cannot replace the log while recording".to_string(),
            ));
        }
        self.state.lock().log = log;
        Ok(())
    }
}

impl Drop for InputRecorder {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            tracing::warn!("Failed to stop input recording on drop: {}", e);
        }
    }
}

fn run_capture_worker(
    mut rx: UnboundedReceiver<CaptureMessage>,
    state: Arc<ParkingMutex<CaptureState>>,
) {
    tracing::debug!("Input capture worker started");

    while let Some(message) = rx.blocking_recv() {
        match message {
            CaptureMessage::Stop => break,
            CaptureMessage::Notification { raw, at } => {
                let mut guard = state.lock();
                let CaptureState { filter, log } = &mut *guard;
                if let Err(e) = filter.on_notification(raw, at, log) {
                    tracing::warn!("Skipping input notification: {}", e);
                }
            }
        }
    }

    tracing::debug!("Input capture worker stopped");
}
