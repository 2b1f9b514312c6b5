//! Keyboard state tracking
//!
//! Hosts forward raw key events; the tracker folds them into held levels
//! and once-per-press edges, then hands the simulation a [`TickInput`]
//! snapshot each frame.

use std::collections::HashSet;

use crate::sim::TickInput;

/// Logical game keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Thrust,
    RotateLeft,
    RotateRight,
    Fire,
    Shield,
    Pause,
    Restart,
    Mute,
    Start,
}

impl Key {
    /// Map a host key name (as in DOM `KeyboardEvent.key`) to a game key
    pub fn from_name(name: &str) -> Option<Self> {
        let key = match name.to_ascii_lowercase().as_str() {
            "w" | "arrowup" => Self::Thrust,
            "a" | "arrowleft" => Self::RotateLeft,
            "d" | "arrowright" => Self::RotateRight,
            " " | "space" => Self::Fire,
            "s" | "arrowdown" => Self::Shield,
            "p" | "escape" => Self::Pause,
            "r" => Self::Restart,
            "m" => Self::Mute,
            "enter" => Self::Start,
            _ => return None,
        };
        Some(key)
    }
}

#[derive(Debug, Clone, Default)]
pub struct KeyTracker {
    held: HashSet<Key>,
    /// Pressed since the last snapshot
    pressed: HashSet<Key>,
    /// Ignored until unlocked
    locked: HashSet<Key>,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// A key went down. Auto-repeat while already held is not a new press.
    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    /// Convenience for hosts that deliver key names
    pub fn key_down_named(&mut self, name: &str) -> bool {
        let Some(key) = Key::from_name(name) else {
            return false;
        };
        self.key_down(key);
        true
    }

    pub fn key_up_named(&mut self, name: &str) -> bool {
        let Some(key) = Key::from_name(name) else {
            return false;
        };
        self.key_up(key);
        true
    }

    pub fn lock(&mut self, key: Key) {
        self.locked.insert(key);
    }

    pub fn unlock(&mut self, key: Key) {
        self.locked.remove(&key);
    }

    pub fn is_locked(&self, key: Key) -> bool {
        self.locked.contains(&key)
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key) && !self.is_locked(key)
    }

    fn take_press(&mut self, key: Key) -> bool {
        self.pressed.remove(&key) && !self.is_locked(key)
    }

    /// Sample the current input and consume pending presses
    pub fn snapshot(&mut self) -> TickInput {
        let input = TickInput {
            thrust: self.is_held(Key::Thrust),
            rotate_left: self.is_held(Key::RotateLeft),
            rotate_right: self.is_held(Key::RotateRight),
            fire: self.take_press(Key::Fire),
            shield: self.take_press(Key::Shield),
            pause: self.take_press(Key::Pause),
            restart: self.take_press(Key::Restart),
            mute: self.take_press(Key::Mute),
            start: self.take_press(Key::Start),
        };
        self.pressed.clear();
        input
    }

    /// Forget everything held, e.g. when the window loses focus
    pub fn release_all(&mut self) {
        self.held.clear();
        self.pressed.clear();
    }
}
