#![allow(dead_code)] // Shared across several integration suites; each binary uses a subset.

use core_actions::Interpreter;
use core_events::KeyEvent;
use core_text::ScratchHost;
use std::time::{Duration, Instant};

/// One editing session against the in-memory host, with a test-owned clock.
pub struct Session {
    pub interp: Interpreter,
    pub host: ScratchHost,
    epoch: Instant,
    elapsed: Duration,
}

impl Session {
    pub fn new(text: &str) -> Self {
        Self {
            interp: Interpreter::new(),
            host: ScratchHost::from_str(text),
            epoch: Instant::now(),
            elapsed: Duration::ZERO,
        }
    }

    pub fn at(text: &str, cursor: usize) -> Self {
        let mut s = Self::new(text);
        s.host.place_cursor(cursor);
        s
    }

    /// Feed printable keys. Presses are spaced inside the `gg` window but
    /// past the acceleration window, so two-key sequences compose while the
    /// scroll multiplier stays at 1; timing tests drive the clock themselves
    /// via `press_at_ms`.
    pub fn keys(&mut self, keys: &str) -> &mut Self {
        for c in keys.chars() {
            self.press(&KeyEvent::char(c));
        }
        self
    }

    pub fn press(&mut self, key: &KeyEvent) -> bool {
        self.elapsed += Duration::from_millis(200);
        let at = self.epoch + self.elapsed;
        self.interp.handle_key_at(&mut self.host, key, at)
    }

    /// Press a printable key at an absolute offset from the session epoch.
    pub fn press_at_ms(&mut self, c: char, ms: u64) -> bool {
        self.elapsed = self.elapsed.max(Duration::from_millis(ms));
        let at = self.epoch + Duration::from_millis(ms);
        self.interp
            .handle_key_at(&mut self.host, &KeyEvent::char(c), at)
    }

    pub fn expire_at_ms(&mut self, ms: u64) {
        let at = self.epoch + Duration::from_millis(ms);
        self.interp.expire_pending(&mut self.host, at);
    }

    pub fn esc(&mut self) -> &mut Self {
        self.press(&KeyEvent::esc());
        self
    }

    pub fn enter(&mut self) -> &mut Self {
        self.press(&KeyEvent::enter());
        self
    }

    pub fn backspace(&mut self) -> &mut Self {
        self.press(&KeyEvent::backspace());
        self
    }

    pub fn text(&self) -> String {
        self.host.contents()
    }

    pub fn cursor(&self) -> usize {
        use core_text::TextQuery;
        self.host.selection().start
    }
}
