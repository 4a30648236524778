//! Key event model shared by the interpreter and its hosts.
//!
//! The host surfaces each keystroke as `(keycode, characters, shift_pressed)`;
//! this crate normalizes that triple into a `KeyEvent` the dispatchers can
//! pattern-match on. Printable input is carried as `KeyCode::Char` with the
//! already-shifted character (the host resolves keyboard layout), so the
//! `SHIFT` modifier bit exists for auditing and logging rather than for
//! re-deriving case.
//!
//! Timing-sensitive sequences (`gg`, the `j`/`k` acceleration ramp) do not
//! stamp the event itself; the interpreter entry points accept an explicit
//! `Instant` so tests can replay sequences at exact intervals.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const SHIFT = 0b0000_0001;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyEvent {
    /// Printable key. The shift bit is inferred from the character so call
    /// sites that only know the resolved character stay faithful to the
    /// host's `(keycode, characters, shift_pressed)` shape.
    pub fn char(c: char) -> Self {
        let mods = if c.is_uppercase() {
            KeyModifiers::SHIFT
        } else {
            KeyModifiers::empty()
        };
        Self {
            code: KeyCode::Char(c),
            mods,
        }
    }

    pub fn esc() -> Self {
        Self {
            code: KeyCode::Esc,
            mods: KeyModifiers::empty(),
        }
    }

    pub fn enter() -> Self {
        Self {
            code: KeyCode::Enter,
            mods: KeyModifiers::empty(),
        }
    }

    pub fn backspace() -> Self {
        Self {
            code: KeyCode::Backspace,
            mods: KeyModifiers::empty(),
        }
    }

    /// The character payload, when the event carries one.
    pub fn character(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c) => Some(c),
            _ => None,
        }
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            KeyCode::Char(c) => write!(f, "{c:?}{:?}", self.mods),
            other => write!(f, "{other:?}{:?}", self.mods),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_constructor_infers_shift() {
        assert_eq!(KeyEvent::char('a').mods, KeyModifiers::empty());
        assert_eq!(KeyEvent::char('A').mods, KeyModifiers::SHIFT);
        assert_eq!(KeyEvent::char('$').mods, KeyModifiers::empty());
    }

    #[test]
    fn character_payload() {
        assert_eq!(KeyEvent::char('x').character(), Some('x'));
        assert_eq!(KeyEvent::esc().character(), None);
        assert_eq!(KeyEvent::enter().character(), None);
    }

    #[test]
    fn key_event_display() {
        let s = format!("{}", KeyEvent::char('W'));
        assert!(s.contains('W'));
        assert!(s.contains("SHIFT"));
    }
}
