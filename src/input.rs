//! Keyboard model
//!
//! Backends translate their native events into `InputEvent`s. `KeyState`
//! tracks which keys are held so movement can be polled every tick.

use std::collections::HashSet;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Down,
    Space,
    Enter,
    Escape,
}

impl Key {
    /// Space and Enter both confirm on menus
    pub fn is_confirm(self) -> bool {
        matches!(self, Key::Space | Key::Enter)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Window closed / process asked to stop
    Quit,
    KeyDown(Key),
    KeyUp(Key),
}

/// Currently held keys
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    held: HashSet<Key>,
}

impl KeyState {
    pub fn apply(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::KeyDown(key) => {
                self.held.insert(key);
            }
            InputEvent::KeyUp(key) => {
                self.held.remove(&key);
            }
            InputEvent::Quit => {}
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn controls(&self) -> Controls {
        Controls {
            left: self.is_held(Key::Left),
            right: self.is_held(Key::Right),
        }
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }
}

/// Continuous movement intent for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
}

impl Controls {
    /// Right wins when both are held
    pub fn horizontal_speed(&self, speed: f32) -> f32 {
        if self.right {
            speed
        } else if self.left {
            -speed
        } else {
            0.0
        }
    }
}
