//! The keystroke interpreter.
//!
//! `Interpreter` is a composite state machine: key events go in, guarded
//! edits and selection changes come out through the host traits of
//! `core-text`. It owns only the `core-state` fields; the buffer, undo
//! stack, clipboard, and caret rendering stay with the host.
//!
//! Routing is per-mode:
//! * Normal      - the full command grammar (`dispatcher::normal`)
//! * Visual(s)   - selection extension plus `y`/`d` (`dispatcher::visual`)
//! * Command     - ex / search line editing (`dispatcher::command`)
//! * Insert      - only Escape; every other key falls through to the host's
//!   default handling, which is how Insert-mode typing happens without the
//!   interpreter touching it
//!
//! Every handler returns a bool (consumed / not consumed) and is fully
//! synchronous. After each consumed key the presentation hooks push a fresh
//! caret width and status line. Timing-sensitive state (`gg`, `j`/`k`
//! acceleration) keys off the `Instant` passed to `handle_key_at`, so tests
//! drive exact clocks; `handle_key` stamps the wall clock.

mod dispatcher;
mod ex;
mod operator;
mod paste;
mod present;
mod search;

use core_events::KeyEvent;
use core_keymap::Keymap;
use core_state::{EditorState, Mode};
use core_text::Host;
use std::time::Instant;
use tracing::trace;

pub struct Interpreter {
    state: EditorState,
    keymap: Keymap,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self {
            state: EditorState::new(),
            keymap: Keymap::new(),
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    /// Process one key event against the host. Returns whether the event
    /// was consumed; unconsumed events belong to the host's default path.
    pub fn handle_key<H: Host + ?Sized>(&mut self, host: &mut H, key: &KeyEvent) -> bool {
        self.handle_key_at(host, key, Instant::now())
    }

    /// As `handle_key`, with an explicit clock for the `gg` window and the
    /// `j`/`k` acceleration ramp.
    pub fn handle_key_at<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        key: &KeyEvent,
        now: Instant,
    ) -> bool {
        trace!(target: "dispatch", mode = ?self.state.mode, key = %key, "key_in");
        let consumed = match self.state.mode {
            Mode::Insert => dispatcher::insert_mode(&mut self.state, key),
            Mode::Normal => dispatcher::normal::handle(&mut self.state, &self.keymap, host, key, now),
            Mode::Visual | Mode::VisualLine => {
                dispatcher::visual::handle(&mut self.state, &self.keymap, host, key)
            }
            Mode::Command => dispatcher::command::handle(&mut self.state, &self.keymap, host, key),
        };
        if consumed {
            present::refresh(&self.state, host);
        }
        consumed
    }

    /// Timer callback for the pending-`g` window. Safe to invoke from a
    /// stale timer: it re-checks the flag against `now` and only refreshes
    /// presentation when something actually expired.
    pub fn expire_pending<H: Host + ?Sized>(&mut self, host: &mut H, now: Instant) {
        if self.state.expire_g(now) {
            present::refresh(&self.state, host);
        }
    }
}
