use crate::capture::input::types::{Action, MouseButton, RawNotification};
use crate::capture::traits::{InputListener, InputSynthesizer, NotificationSink};
use crate::recorder::error::{MacroError, MacroResult};
use enigo::{Direction, Enigo, Keyboard, Mouse, Settings};
use parking_lot::Mutex as ParkingMutex;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

type Sinks = Arc<ParkingMutex<Vec<NotificationSink>>>;

/// `rdev::listen` fails fast when the hook cannot be installed and blocks
/// forever once it is, so surviving this long counts as a successful start.
const HOOK_STARTUP_GRACE: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HookState {
    Idle,
    Running,
}

/// Global hooks via `rdev`, synthesis via `enigo`.
///
/// `rdev::listen` never returns and cannot be torn down, so the hook thread
/// is started on first subscription and afterwards only forwards to
/// whichever sinks are currently subscribed. A hook that fails to start
/// leaves the source idle, and the next subscription tries again.
pub struct NativeInputSource {
    keyboard_sinks: Sinks,
    mouse_sinks: Sinks,
    hook: Arc<ParkingMutex<HookState>>,
    enigo: ParkingMutex<Enigo>,
}

impl NativeInputSource {
    pub fn new() -> MacroResult<Self> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| MacroError::Platform(format!("input synthesis unavailable: {}", e)))?;

        Ok(Self {
            keyboard_sinks: Arc::new(ParkingMutex::new(Vec::new())),
            mouse_sinks: Arc::new(ParkingMutex::new(Vec::new())),
            hook: Arc::new(ParkingMutex::new(HookState::Idle)),
            enigo: ParkingMutex::new(enigo),
        })
    }

    fn ensure_hook(&self) -> MacroResult<()> {
        // Held across the start-up wait so concurrent subscriptions share one hook
        let mut state = self.hook.lock();
        if *state == HookState::Running {
            return Ok(());
        }

        let keyboard_sinks = self.keyboard_sinks.clone();
        let mouse_sinks = self.mouse_sinks.clone();
        let hook = self.hook.clone();
        let (failure_tx, failure_rx) = mpsc::channel::<String>();

        std::thread::Builder::new()
            .name("input-hook".to_string())
            .spawn(move || {
                let result = rdev::listen(move |event| {
                    let Some(raw) = classify(&event.event_type) else {
                        return;
                    };
                    let sinks = match raw {
                        RawNotification::Key { .. } => &keyboard_sinks,
                        RawNotification::Button { .. } => &mouse_sinks,
                    };
                    sinks.lock().retain(|sink| sink.send(raw.clone()));
                });

                let reason = match result {
                    Err(e) => format!("{:?}", e),
                    Ok(()) => "listener exited".to_string(),
                };
                tracing::error!("Global input hook stopped: {}", reason);
                // Nobody waiting means start-up already succeeded
                if failure_tx.send(reason).is_err() {
                    *hook.lock() = HookState::Idle;
                }
            })
            .map_err(|e| {
                MacroError::Platform(format!("could not spawn input hook thread: {}", e))
            })?;

        await_hook_startup(&failure_rx, HOOK_STARTUP_GRACE)?;
        tracing::info!("Global input hook started");
        *state = HookState::Running;
        Ok(())
    }
}

/// Wait out the start-up grace period for a failure report from the hook thread
fn await_hook_startup(failures: &mpsc::Receiver<String>, grace: Duration) -> MacroResult<()> {
    match failures.recv_timeout(grace) {
        Err(mpsc::RecvTimeoutError::Timeout) => Ok(()),
        Ok(reason) => Err(MacroError::Platform(format!(
            "global input hook failed to start: {}",
            reason
        ))),
        Err(mpsc::RecvTimeoutError::Disconnected) => Err(MacroError::Platform(
            "global input hook thread exited during start-up".to_string(),
        )),
    }
}

impl InputListener for NativeInputSource {
    fn subscribe_keyboard(&self, sink: NotificationSink) -> MacroResult<()> {
        self.ensure_hook()?;
        self.keyboard_sinks.lock().push(sink);
        Ok(())
    }

    fn subscribe_mouse(&self, sink: NotificationSink) -> MacroResult<()> {
        self.ensure_hook()?;
        self.mouse_sinks.lock().push(sink);
        Ok(())
    }

    fn unsubscribe_all(&self) {
        self.keyboard_sinks.lock().clear();
        self.mouse_sinks.lock().clear();
    }
}

impl InputSynthesizer for NativeInputSource {
    fn press_and_release(&self, key: &str) -> MacroResult<()> {
        let enigo_key = enigo_key(key)?;
        self.enigo
            .lock()
            .key(enigo_key, Direction::Click)
            .map_err(|e| MacroError::Synthesis(format!("key {:?}: {}", key, e)))
    }

    fn press_button(&self, button: MouseButton) -> MacroResult<()> {
        self.enigo
            .lock()
            .button(enigo_button(button), Direction::Press)
            .map_err(|e| MacroError::Synthesis(format!("press {}: {}", button, e)))
    }

    fn release_button(&self, button: MouseButton) -> MacroResult<()> {
        self.enigo
            .lock()
            .button(enigo_button(button), Direction::Release)
            .map_err(|e| MacroError::Synthesis(format!("release {}: {}", button, e)))
    }
}

/// Map a hook event onto the notification model. Pointer motion and wheel
/// events are not part of it.
fn classify(event_type: &rdev::EventType) -> Option<RawNotification> {
    match event_type {
        rdev::EventType::KeyPress(key) => Some(RawNotification::Key {
            key: key_identifier(key),
            action: Action::Down,
        }),
        rdev::EventType::KeyRelease(key) => Some(RawNotification::Key {
            key: key_identifier(key),
            action: Action::Up,
        }),
        rdev::EventType::ButtonPress(button) => {
            Some(RawNotification::button(button_identifier(button), Action::Down))
        }
        rdev::EventType::ButtonRelease(button) => {
            Some(RawNotification::button(button_identifier(button), Action::Up))
        }
        _ => None,
    }
}

fn button_identifier(button: &rdev::Button) -> String {
    match button {
        rdev::Button::Left => "left".to_string(),
        rdev::Button::Right => "right".to_string(),
        rdev::Button::Middle => "middle".to_string(),
        rdev::Button::Unknown(code) => format!("button{}", code),
    }
}

fn key_identifier(key: &rdev::Key) -> String {
    use rdev::Key;

    let name = match key {
        Key::Alt => "alt",
        Key::AltGr => "alt gr",
        Key::Backspace => "backspace",
        Key::CapsLock => "caps lock",
        Key::ControlLeft | Key::ControlRight => "ctrl",
        Key::Delete | Key::KpDelete => "delete",
        Key::DownArrow => "down",
        Key::End => "end",
        Key::Escape => "esc",
        Key::Home => "home",
        Key::Insert => "insert",
        Key::LeftArrow => "left",
        Key::MetaLeft | Key::MetaRight => "meta",
        Key::PageDown => "page down",
        Key::PageUp => "page up",
        Key::Return | Key::KpReturn => "enter",
        Key::RightArrow => "right",
        Key::ShiftLeft | Key::ShiftRight => "shift",
        Key::Space => "space",
        Key::Tab => "tab",
        Key::UpArrow => "up",
        Key::PrintScreen => "print screen",
        Key::ScrollLock => "scroll lock",
        Key::Pause => "pause",
        Key::NumLock => "num lock",
        Key::Function => "fn",
        Key::BackQuote => "`",
        Key::Minus | Key::KpMinus => "-",
        Key::Equal => "=",
        Key::KpPlus => "+",
        Key::KpMultiply => "*",
        Key::KpDivide | Key::Slash => "/",
        Key::LeftBracket => "[",
        Key::RightBracket => "]",
        Key::SemiColon => ";",
        Key::Quote => "'",
        Key::BackSlash | Key::IntlBackslash => "\\",
        Key::Comma => ",",
        Key::Dot => ".",
        Key::Unknown(code) => return format!("unknown{}", code),
        // KeyA.., Num0.., Kp0.., F1..
        other => {
            let debug = format!("{:?}", other);
            let short = debug
                .strip_prefix("Key")
                .or_else(|| debug.strip_prefix("Num"))
                .or_else(|| debug.strip_prefix("Kp"))
                .unwrap_or(&debug);
            return short.to_lowercase();
        }
    };
    name.to_string()
}

fn enigo_key(identifier: &str) -> MacroResult<enigo::Key> {
    use enigo::Key;

    let key = match identifier {
        "alt" => Key::Alt,
        "backspace" => Key::Backspace,
        "caps lock" => Key::CapsLock,
        "ctrl" => Key::Control,
        "delete" => Key::Delete,
        "down" => Key::DownArrow,
        "end" => Key::End,
        "enter" => Key::Return,
        "esc" => Key::Escape,
        "home" => Key::Home,
        "left" => Key::LeftArrow,
        "meta" => Key::Meta,
        "page down" => Key::PageDown,
        "page up" => Key::PageUp,
        "right" => Key::RightArrow,
        "shift" => Key::Shift,
        "space" => Key::Space,
        "tab" => Key::Tab,
        "up" => Key::UpArrow,
        other => {
            if let Some(function_key) = function_key(other) {
                function_key
            } else if let Some(code) = platform_key_code(other) {
                Key::Other(code)
            } else if let Some(code) = other.strip_prefix("unknown").and_then(|c| c.parse().ok()) {
                // Raw code reported by the hook, replayed as-is
                Key::Other(code)
            } else {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Unicode(c),
                    _ => {
                        return Err(MacroError::Synthesis(format!(
                            "no synthesis mapping for key {:?}",
                            identifier
                        )))
                    }
                }
            }
        }
    };
    Ok(key)
}

/// Native codes for keys `enigo` has no portable variant for.
/// Virtual-key codes on Windows.
#[cfg(target_os = "windows")]
fn platform_key_code(identifier: &str) -> Option<u32> {
    let code = match identifier {
        "insert" => 0x2D,
        "print screen" => 0x2C,
        "scroll lock" => 0x91,
        "pause" => 0x13,
        "num lock" => 0x90,
        "alt gr" => 0xA5,
        _ => return None,
    };
    Some(code)
}

/// Carbon virtual key codes on macOS, which has no Insert or lock keys:
/// those land on Help and F13..F15 like Apple's extended keyboards.
#[cfg(target_os = "macos")]
fn platform_key_code(identifier: &str) -> Option<u32> {
    let code = match identifier {
        "insert" => 0x72,
        "print screen" => 0x69,
        "scroll lock" => 0x6B,
        "pause" => 0x71,
        "num lock" => 0x47,
        "alt gr" => 0x3D,
        "fn" => 0x3F,
        _ => return None,
    };
    Some(code)
}

/// X keysyms elsewhere
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn platform_key_code(identifier: &str) -> Option<u32> {
    let code = match identifier {
        "insert" => 0xFF63,
        "print screen" => 0xFF61,
        "scroll lock" => 0xFF14,
        "pause" => 0xFF13,
        "num lock" => 0xFF7F,
        "alt gr" => 0xFE03,
        _ => return None,
    };
    Some(code)
}

fn function_key(identifier: &str) -> Option<enigo::Key> {
    use enigo::Key;

    let number: u8 = identifier.strip_prefix('f')?.parse().ok()?;
    let key = match number {
        1 => Key::F1,
        2 => Key::F2,
        3 => Key::F3,
        4 => Key::F4,
        5 => Key::F5,
        6 => Key::F6,
        7 => Key::F7,
        8 => Key::F8,
        9 => Key::F9,
        10 => Key::F10,
        11 => Key::F11,
        12 => Key::F12,
        _ => return None,
    };
    Some(key)
}

fn enigo_button(button: MouseButton) -> enigo::Button {
    match button {
        MouseButton::Left => enigo::Button::Left,
        MouseButton::Right => enigo::Button::Right,
        MouseButton::Middle => enigo::Button::Middle,
    }
}
