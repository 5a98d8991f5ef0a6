/// Terminal input: a reader thread plus a key-hold tracker.
///
/// Discrete events (quit, confirm, fire) come from key presses.  Left/right
/// are continuous.  On terminals that report releases a key is held from its
/// press until its release, however long that is.  Classic terminals only
/// send repeated presses, so there a key counts as held while its last press
/// or repeat arrived within `HOLD_WINDOW`.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::warn;

use crate::error::PlatformError;
use crate::platform::{HeldKeys, InputEvent, InputSource};

pub const HOLD_WINDOW: Duration = Duration::from_millis(140);

const LEFT_KEYS: [KeyCode; 3] = [KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const RIGHT_KEYS: [KeyCode; 3] = [KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];

/// Translate one key event into a discrete game event.
pub fn map_key(key: &KeyEvent) -> InputEvent {
    if key.kind != KeyEventKind::Press {
        return InputEvent::Other;
    }
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => InputEvent::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => InputEvent::Quit,
        KeyCode::Char(' ') => InputEvent::Fire,
        KeyCode::Enter => InputEvent::Confirm,
        _ => InputEvent::Other,
    }
}

// ── Hold tracking ─────────────────────────────────────────────────────────────

/// Last time each key was pressed or repeated.
#[derive(Debug, Default)]
pub struct KeyTracker {
    last_seen: HashMap<KeyCode, Instant>,
    release_reporting: bool,
}

impl KeyTracker {
    /// `release_reporting`: the terminal sends release events, so keys stay
    /// held until released instead of expiring after `HOLD_WINDOW`.
    pub fn new(release_reporting: bool) -> Self {
        KeyTracker {
            last_seen: HashMap::new(),
            release_reporting,
        }
    }

    pub fn record(&mut self, key: &KeyEvent, now: Instant) {
        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                self.last_seen.insert(key.code, now);
            }
            KeyEventKind::Release => {
                self.last_seen.remove(&key.code);
            }
        }
    }

    pub fn is_held(&self, code: &KeyCode, now: Instant) -> bool {
        self.last_seen
            .get(code)
            .map(|&last| {
                self.release_reporting || now.saturating_duration_since(last) <= HOLD_WINDOW
            })
            .unwrap_or(false)
    }

    pub fn held(&self, now: Instant) -> HeldKeys {
        HeldKeys {
            left: LEFT_KEYS.iter().any(|k| self.is_held(k, now)),
            right: RIGHT_KEYS.iter().any(|k| self.is_held(k, now)),
        }
    }
}

// ── Terminal source ───────────────────────────────────────────────────────────

pub struct TerminalInput {
    rx: Receiver<Event>,
    keys: KeyTracker,
}

impl TerminalInput {
    pub fn new(rx: Receiver<Event>, release_reporting: bool) -> Self {
        TerminalInput {
            rx,
            keys: KeyTracker::new(release_reporting),
        }
    }

    /// Dedicate a thread to blocking event reads so the game loop never
    /// blocks on I/O.
    pub fn spawn(release_reporting: bool) -> Self {
        let (tx, rx) = mpsc::channel::<Event>();
        thread::spawn(move || loop {
            match event::read() {
                Ok(ev) => {
                    if tx.send(ev).is_err() {
                        break; // receiver dropped → program exiting
                    }
                }
                Err(err) => {
                    warn!("terminal event read failed: {err}");
                    break;
                }
            }
        });
        TerminalInput::new(rx, release_reporting)
    }
}

impl InputSource for TerminalInput {
    fn next_event(&mut self) -> Result<Option<InputEvent>, PlatformError> {
        match self.rx.try_recv() {
            Ok(Event::Key(key)) => {
                self.keys.record(&key, Instant::now());
                Ok(Some(map_key(&key)))
            }
            Ok(_) => Ok(Some(InputEvent::Other)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(PlatformError::InputClosed),
        }
    }

    fn held(&self) -> HeldKeys {
        self.keys.held(Instant::now())
    }
}
