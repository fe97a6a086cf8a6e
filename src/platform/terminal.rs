//! Terminal session and keyboard input via crossterm
//!
//! Terminals that support the keyboard enhancement protocol report real key
//! releases. Classic terminals only send presses (plus OS auto-repeat), so a
//! key counts as held until no press or repeat has arrived for a short window;
//! the release is synthesized when that window runs out.

use std::collections::HashMap;
use std::io::{self, Write};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};

use super::InputSource;
use crate::error::GameError;
use crate::input::{InputEvent, Key};

/// Hold window before the first auto-repeat arrives (OS repeat delay)
const INITIAL_HOLD_MS: u64 = 550;
/// Hold window once auto-repeat is flowing
const REPEAT_HOLD_MS: u64 = 150;

/// Raw mode + alternate screen for the lifetime of the value
pub struct TerminalSession {
    enhanced: bool,
}

impl TerminalSession {
    pub fn start() -> Result<Self, GameError> {
        let fail = |e: io::Error| GameError::startup("terminal", e.to_string());

        terminal::enable_raw_mode().map_err(fail)?;
        let mut out = io::stdout();
        execute!(out, EnterAlternateScreen, cursor::Hide).map_err(fail)?;

        let enhanced = matches!(terminal::supports_keyboard_enhancement(), Ok(true));
        if enhanced {
            execute!(
                out,
                PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                        | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                )
            )
            .map_err(fail)?;
        }
        log::info!("Terminal session started (key release events: {enhanced})");
        Ok(Self { enhanced })
    }

    /// True if the terminal reports key releases itself
    pub fn reports_releases(&self) -> bool {
        self.enhanced
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let mut out = io::stdout();
        if self.enhanced {
            let _ = execute!(out, PopKeyboardEnhancementFlags);
        }
        let _ = execute!(out, cursor::Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        let _ = out.flush();
        log::info!("Terminal restored");
    }
}

#[derive(Debug, Clone, Copy)]
struct Held {
    last_seen_ms: u64,
    repeating: bool,
}

/// Turns raw presses, repeats and releases into clean down/up pairs
#[derive(Debug, Default)]
pub struct HoldTracker {
    held: HashMap<Key, Held>,
}

impl HoldTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// A press or repeat. Only the first one of a hold emits `KeyDown`.
    pub fn press(&mut self, key: Key, now_ms: u64) -> Option<InputEvent> {
        match self.held.get_mut(&key) {
            Some(held) => {
                held.last_seen_ms = now_ms;
                held.repeating = true;
                None
            }
            None => {
                self.held.insert(
                    key,
                    Held {
                        last_seen_ms: now_ms,
                        repeating: false,
                    },
                );
                Some(InputEvent::KeyDown(key))
            }
        }
    }

    pub fn release(&mut self, key: Key) -> Option<InputEvent> {
        self.held.remove(&key).map(|_| InputEvent::KeyUp(key))
    }

    /// Synthesize releases for keys that went quiet
    pub fn expire(&mut self, now_ms: u64) -> Vec<InputEvent> {
        let mut released: Vec<Key> = self
            .held
            .iter()
            .filter(|(_, held)| {
                let window = if held.repeating {
                    REPEAT_HOLD_MS
                } else {
                    INITIAL_HOLD_MS
                };
                now_ms.saturating_sub(held.last_seen_ms) > window
            })
            .map(|(&key, _)| key)
            .collect();
        released.sort_by_key(|k| *k as u8);
        released
            .into_iter()
            .filter_map(|key| self.release(key))
            .collect()
    }
}

fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Left => Some(Key::Left),
        KeyCode::Right => Some(Key::Right),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Char(' ') => Some(Key::Space),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Escape),
        _ => None,
    }
}

/// Keyboard input from the attached terminal
pub struct TerminalInput {
    tracker: HoldTracker,
    reports_releases: bool,
}

impl TerminalInput {
    pub fn new(reports_releases: bool) -> Self {
        Self {
            tracker: HoldTracker::new(),
            reports_releases,
        }
    }

    /// Translate one crossterm key event
    pub fn translate(&mut self, key: KeyEvent, now_ms: u64) -> Option<InputEvent> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(InputEvent::Quit);
        }
        let mapped = map_key(key.code)?;
        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => self.tracker.press(mapped, now_ms),
            KeyEventKind::Release => self.tracker.release(mapped),
        }
    }
}

impl InputSource for TerminalInput {
    fn poll(&mut self, now_ms: u64) -> Result<Vec<InputEvent>, GameError> {
        let mut events = Vec::new();
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                events.extend(self.translate(key, now_ms));
            }
        }
        if !self.reports_releases {
            events.extend(self.tracker.expire(now_ms));
        }
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, kind)
    }

    #[test]
    fn test_repeats_do_not_retrigger_key_down() {
        let mut input = TerminalInput::new(false);
        assert_eq!(
            input.translate(key(KeyCode::Char(' '), KeyEventKind::Press), 0),
            Some(InputEvent::KeyDown(Key::Space))
        );
        assert_eq!(input.translate(key(KeyCode::Char(' '), KeyEventKind::Press), 30), None);
        assert_eq!(input.translate(key(KeyCode::Char(' '), KeyEventKind::Repeat), 60), None);
    }

    #[test]
    fn test_real_release_ends_hold() {
        let mut input = TerminalInput::new(true);
        input.translate(key(KeyCode::Right, KeyEventKind::Press), 0);
        assert_eq!(
            input.translate(key(KeyCode::Right, KeyEventKind::Release), 10),
            Some(InputEvent::KeyUp(Key::Right))
        );
        assert_eq!(input.translate(key(KeyCode::Right, KeyEventKind::Release), 20), None);
    }

    #[test]
    fn test_quiet_key_is_released() {
        let mut tracker = HoldTracker::new();
        tracker.press(Key::Right, 0);
        assert!(tracker.expire(INITIAL_HOLD_MS).is_empty(), "covers the OS repeat delay");

        tracker.press(Key::Right, 500);
        assert!(tracker.expire(500 + REPEAT_HOLD_MS).is_empty());
        assert_eq!(
            tracker.expire(501 + REPEAT_HOLD_MS),
            vec![InputEvent::KeyUp(Key::Right)]
        );
        assert!(tracker.expire(10_000).is_empty());
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut input = TerminalInput::new(false);
        let ev = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(input.translate(ev, 0), Some(InputEvent::Quit));
    }

    #[test]
    fn test_unmapped_keys_ignored() {
        let mut input = TerminalInput::new(false);
        assert_eq!(input.translate(key(KeyCode::Char('x'), KeyEventKind::Press), 0), None);
    }
}
