//! Command-line dispatch: composing `:` ex commands and `/` `?` searches.
//!
//! The buffer keeps its prefix character, which doubles as the mode marker
//! (the status line shows the literal buffer). Ex input accepts letters,
//! digits, and space; search input accepts anything printable. Backspacing
//! the prefix itself cancels back to Normal, as does Escape. Enter hands
//! the finished buffer to the ex processor or the search engine.

use crate::{ex, search};
use core_events::{KeyCode, KeyEvent};
use core_keymap::Keymap;
use core_state::{EditorState, Mode};
use core_text::Host;
use tracing::trace;

pub(crate) fn handle<H: Host + ?Sized>(
    state: &mut EditorState,
    keymap: &Keymap,
    host: &mut H,
    key: &KeyEvent,
) -> bool {
    match key.code {
        KeyCode::Esc => {
            state.cmdline.clear();
            state.enter_mode(Mode::Normal);
            true
        }
        KeyCode::Enter => {
            let raw = std::mem::take(&mut state.cmdline);
            state.enter_mode(Mode::Normal);
            if raw.starts_with(':') {
                ex::execute(keymap, host, &raw)
            } else {
                search::commence(state, host, &raw)
            }
        }
        KeyCode::Backspace => {
            if state.cmdline.chars().count() <= 1 {
                state.cmdline.clear();
                state.enter_mode(Mode::Normal);
            } else {
                state.cmdline.pop();
            }
            true
        }
        KeyCode::Char(c) => {
            if permitted(&state.cmdline, c) {
                state.cmdline.push(c);
            } else {
                trace!(target: "dispatch.command", key = %c, "rejected_char");
            }
            true
        }
    }
}

fn permitted(buffer: &str, c: char) -> bool {
    if buffer.starts_with(':') {
        c.is_ascii_alphanumeric() || c == ' '
    } else {
        !c.is_control()
    }
}
