/// Held-key tracking.
///
/// Terminals report key events asynchronously; the frame driver feeds them
/// into an `InputTracker` and samples a `HeldKeys` snapshot once per frame.

use std::collections::{HashMap, HashSet};

use crossterm::event::KeyCode;

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// 8 frames @ 60 FPS ≈ 133 ms, shorter than the OS key-repeat interval.
pub const HOLD_WINDOW: u64 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Control {
    Up,
    Down,
    Left,
    Right,
    Fire,
}

impl Control {
    /// Arrow keys and WASD (either case) steer, space fires.  Everything
    /// else is not a control.
    pub fn from_key(code: KeyCode) -> Option<Control> {
        match code {
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Control::Up),
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Control::Down),
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Control::Left),
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Control::Right),
            KeyCode::Char(' ') => Some(Control::Fire),
            _ => None,
        }
    }
}

/// Snapshot of the controls held during one simulation tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeldKeys(HashSet<Control>);

impl HeldKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, control: Control) -> Self {
        self.0.insert(control);
        self
    }

    pub fn is_held(&self, control: Control) -> bool {
        self.0.contains(&control)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Control> for HeldKeys {
    fn from_iter<I: IntoIterator<Item = Control>>(iter: I) -> Self {
        HeldKeys(iter.into_iter().collect())
    }
}

/// Maps each held key → the frame it was last seen (press or repeat).
///
/// Keys are tracked individually, so a control stays held while any of its
/// bindings is down.  Works on two classes of terminal:
/// * **Keyboard-enhancement capable**: proper `Press` / `Repeat` / `Release`
///   events.  A key is held until its release arrives.
/// * **Classic terminals**: only `Press` events.  Keys expire after
///   `HOLD_WINDOW` frames of silence.
#[derive(Debug, Default)]
pub struct InputTracker {
    last_seen: HashMap<KeyCode, u64>,
    release_events: bool,
}

/// Letters are stored lowercase so a release with shift down still matches.
fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

impl InputTracker {
    /// `release_events` says whether the terminal reports key releases.
    pub fn new(release_events: bool) -> Self {
        Self {
            last_seen: HashMap::new(),
            release_events,
        }
    }

    /// Record a press or repeat.  Returns the control, if the key was one.
    pub fn press(&mut self, code: KeyCode, frame: u64) -> Option<Control> {
        let control = Control::from_key(code)?;
        self.last_seen.insert(normalize(code), frame);
        Some(control)
    }

    pub fn release(&mut self, code: KeyCode) {
        self.last_seen.remove(&normalize(code));
    }

    pub fn clear(&mut self) {
        self.last_seen.clear();
    }

    pub fn held(&self, frame: u64) -> HeldKeys {
        self.last_seen
            .iter()
            .filter(|(_, last)| {
                self.release_events || frame.saturating_sub(**last) <= HOLD_WINDOW
            })
            .filter_map(|(&code, _)| Control::from_key(code))
            .collect()
    }
}
