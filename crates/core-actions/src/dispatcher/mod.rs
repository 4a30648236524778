//! Per-mode key dispatch.
//!
//! Split by mode to keep the precedence ladders readable:
//! * `normal`  - count digits, pending-character consumers, operator
//!   composition, then the command table
//! * `visual`  - selection extension and the visual operators
//! * `command` - ex / search line editing
//!
//! Insert mode needs no table: the interpreter consumes Escape and lets the
//! host's default handling type everything else.

pub(crate) mod command;
pub(crate) mod normal;
pub(crate) mod visual;

use core_events::{KeyCode, KeyEvent};
use core_state::{EditorState, Mode};
use core_text::{Host, Span};

pub(crate) fn insert_mode(state: &mut EditorState, key: &KeyEvent) -> bool {
    if matches!(key.code, KeyCode::Esc) {
        state.enter_mode(Mode::Normal);
        true
    } else {
        false
    }
}

/// Collapse the selection to a caret at `idx`, clamped into the buffer.
pub(crate) fn move_caret<H: Host + ?Sized>(host: &mut H, idx: usize) {
    let idx = idx.min(host.len_units());
    host.set_selection(Span::caret(idx));
}
