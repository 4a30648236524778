//! Editor state: mode, pending prefixes, counts, and timing trackers.
//!
//! The interpreter owns no text; this crate is the entirety of its mutable
//! state. Two rules shape the API:
//!
//! * At most one pending prefix (operator, `g`, or a character consumer for
//!   `r`/`f`/`F`) may be armed at a time. Arming one disarms the others, and
//!   `armed()` exposes the live count so tests can assert the invariant over
//!   arbitrary input.
//! * The count prefix survives prefix keys (`3` then `d` keeps 3) and is
//!   consumed exactly once by the completing command via `take_count`.
//!
//! The `gg` window is a soft timeout: the armed flag stores its arm instant
//! and is considered dead once `G_WINDOW` has elapsed, so a stale timer
//! callback that re-checks the flag observes it already cleared. No input is
//! blocked while the window is open.

use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// How long a lone `g` stays armed.
pub const G_WINDOW: Duration = Duration::from_millis(500);
/// Maximum interval between `j`/`k` presses that still counts as a streak.
pub const ACCEL_WINDOW: Duration = Duration::from_millis(150);
/// Ceiling for the `j`/`k` repeat multiplier.
pub const ACCEL_CAP: u32 = 5;
/// Count prefixes clamp here; prevents overflow on held digit keys.
pub const COUNT_MAX: u32 = 999_999;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Insert,
    Visual,
    VisualLine,
    Command,
}

impl Mode {
    pub fn is_visual(self) -> bool {
        matches!(self, Mode::Visual | Mode::VisualLine)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Delete,
    Yank,
    Change,
}

impl Operator {
    /// The key that arms this operator; a repeat of it selects the linewise
    /// form (`dd`, `yy`, `cc`).
    pub fn key(self) -> char {
        match self {
            Operator::Delete => 'd',
            Operator::Yank => 'y',
            Operator::Change => 'c',
        }
    }
}

/// What the next keystroke will be consumed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharWait {
    Replace,
    FindForward,
    FindBackward,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMemory {
    pub pattern: String,
    pub forward: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FindMemory {
    pub target: char,
    pub forward: bool,
}

/// Streak tracker for the `j`/`k` scroll acceleration.
#[derive(Debug, Clone, Copy, Default)]
pub struct JkAccel {
    last: Option<Instant>,
    streak: u32,
}

impl JkAccel {
    /// Register one `j`/`k` press and return the effective multiplier:
    /// `1 + min(streak / 2, cap - 1)`, ramping 1,1,2,2,3,3,4,4,5.
    pub fn bump(&mut self, now: Instant) -> u32 {
        match self.last {
            Some(prev) if now.saturating_duration_since(prev) < ACCEL_WINDOW => {
                self.streak += 1;
            }
            _ => self.streak = 0,
        }
        self.last = Some(now);
        1 + (self.streak / 2).min(ACCEL_CAP - 1)
    }

    pub fn reset(&mut self) {
        self.last = None;
        self.streak = 0;
    }
}

#[derive(Debug, Clone)]
pub struct EditorState {
    pub mode: Mode,
    pending_op: Option<Operator>,
    pending_g: Option<Instant>,
    pending_char: Option<CharWait>,
    count: u32,
    /// Fixed end of the active visual selection; meaningful only while
    /// `mode.is_visual()`.
    pub visual_anchor: usize,
    /// The moving end of the visual selection (the caret side).
    pub visual_cursor: usize,
    /// Ex or search text under composition, including its `:`/`/`/`?` prefix.
    pub cmdline: String,
    pub search: Option<SearchMemory>,
    pub last_find: Option<FindMemory>,
    pub accel: JkAccel,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorState {
    pub fn new() -> Self {
        Self {
            mode: Mode::Normal,
            pending_op: None,
            pending_g: None,
            pending_char: None,
            count: 0,
            visual_anchor: 0,
            visual_cursor: 0,
            cmdline: String::new(),
            search: None,
            last_find: None,
            accel: JkAccel::default(),
        }
    }

    // --- count prefix -------------------------------------------------------

    pub fn push_digit(&mut self, digit: u32) {
        debug_assert!(digit < 10);
        self.count = self
            .count
            .saturating_mul(10)
            .saturating_add(digit)
            .min(COUNT_MAX);
        trace!(target: "state", count = self.count, "count_extend");
    }

    pub fn has_count(&self) -> bool {
        self.count > 0
    }

    pub fn pending_count(&self) -> u32 {
        self.count
    }

    /// Effective count `max(1, prefix)`; clears the accumulator.
    pub fn take_count(&mut self) -> u32 {
        let n = self.count.max(1);
        self.count = 0;
        n
    }

    pub fn clear_count(&mut self) {
        self.count = 0;
    }

    // --- pending prefixes ---------------------------------------------------

    pub fn arm_operator(&mut self, op: Operator) {
        self.disarm_all();
        self.pending_op = Some(op);
        debug!(target: "state", op = ?op, "operator_pending");
    }

    pub fn pending_operator(&self) -> Option<Operator> {
        self.pending_op
    }

    pub fn take_operator(&mut self) -> Option<Operator> {
        self.pending_op.take()
    }

    pub fn arm_g(&mut self, now: Instant) {
        self.disarm_all();
        self.pending_g = Some(now);
        debug!(target: "state", "g_pending");
    }

    /// True while a `g` is armed and its window has not elapsed.
    pub fn g_is_live(&self, now: Instant) -> bool {
        self.pending_g
            .is_some_and(|armed| now.saturating_duration_since(armed) <= G_WINDOW)
    }

    pub fn disarm_g(&mut self) {
        self.pending_g = None;
    }

    /// Clear a stale `g`. Returns true when the flag was dropped; the timer
    /// callback uses this to decide whether anything changed.
    pub fn expire_g(&mut self, now: Instant) -> bool {
        if self.pending_g.is_some() && !self.g_is_live(now) {
            self.pending_g = None;
            trace!(target: "state", "g_expired");
            true
        } else {
            false
        }
    }

    pub fn arm_char(&mut self, wait: CharWait) {
        self.disarm_all();
        self.pending_char = Some(wait);
        debug!(target: "state", wait = ?wait, "char_pending");
    }

    pub fn take_char_wait(&mut self) -> Option<CharWait> {
        self.pending_char.take()
    }

    fn disarm_all(&mut self) {
        self.pending_op = None;
        self.pending_g = None;
        self.pending_char = None;
    }

    /// Drop every pending prefix (mode transitions, Esc).
    pub fn clear_pending(&mut self) {
        self.disarm_all();
    }

    /// Number of armed pending prefixes; the dispatch invariant keeps this
    /// at most 1.
    pub fn armed(&self) -> usize {
        usize::from(self.pending_op.is_some())
            + usize::from(self.pending_g.is_some())
            + usize::from(self.pending_char.is_some())
    }

    // --- mode ---------------------------------------------------------------

    /// Switch mode. Every transition clears pending prefixes and the count,
    /// and breaks any `j`/`k` streak.
    pub fn enter_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            debug!(target: "state", from = ?self.mode, to = ?mode, "mode_change");
        }
        self.mode = mode;
        self.disarm_all();
        self.count = 0;
        self.accel.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> Instant {
        Instant::now()
    }

    #[test]
    fn count_accumulates_and_clamps() {
        let mut s = EditorState::new();
        assert!(!s.has_count());
        assert_eq!(s.take_count(), 1); // implicit 1
        s.push_digit(1);
        s.push_digit(2);
        assert_eq!(s.take_count(), 12);
        assert!(!s.has_count());
        for _ in 0..10 {
            s.push_digit(9);
        }
        assert_eq!(s.take_count(), COUNT_MAX);
    }

    #[test]
    fn arming_one_prefix_disarms_the_others() {
        let mut s = EditorState::new();
        s.arm_operator(Operator::Delete);
        assert_eq!(s.armed(), 1);
        s.arm_g(t0());
        assert_eq!(s.armed(), 1);
        assert!(s.pending_operator().is_none());
        s.arm_char(CharWait::Replace);
        assert_eq!(s.armed(), 1);
        assert!(!s.g_is_live(t0()));
        s.clear_pending();
        assert_eq!(s.armed(), 0);
    }

    #[test]
    fn g_window_expires() {
        let mut s = EditorState::new();
        let armed = t0();
        s.arm_g(armed);
        assert!(s.g_is_live(armed + Duration::from_millis(499)));
        assert!(s.g_is_live(armed + G_WINDOW));
        assert!(!s.g_is_live(armed + Duration::from_millis(501)));
        // stale timer path: expire reports the drop exactly once
        assert!(s.expire_g(armed + Duration::from_millis(501)));
        assert!(!s.expire_g(armed + Duration::from_millis(501)));
        assert_eq!(s.armed(), 0);
    }

    #[test]
    fn expire_leaves_live_flag_alone() {
        let mut s = EditorState::new();
        let armed = t0();
        s.arm_g(armed);
        assert!(!s.expire_g(armed + Duration::from_millis(100)));
        assert!(s.g_is_live(armed + Duration::from_millis(100)));
    }

    #[test]
    fn accel_ramp_and_cap() {
        let mut a = JkAccel::default();
        let base = t0();
        let mut observed = Vec::new();
        for i in 0..10 {
            observed.push(a.bump(base + Duration::from_millis(50 * i)));
        }
        assert_eq!(observed, vec![1, 1, 2, 2, 3, 3, 4, 4, 5, 5]);
    }

    #[test]
    fn accel_resets_on_slow_interval() {
        let mut a = JkAccel::default();
        let base = t0();
        a.bump(base);
        a.bump(base + Duration::from_millis(50));
        a.bump(base + Duration::from_millis(100));
        assert_eq!(a.bump(base + Duration::from_millis(120)), 2);
        // a gap at or beyond the window restarts the ramp
        assert_eq!(a.bump(base + Duration::from_millis(400)), 1);
    }

    #[test]
    fn mode_change_clears_transient_state() {
        let mut s = EditorState::new();
        s.push_digit(4);
        s.arm_operator(Operator::Yank);
        s.enter_mode(Mode::Insert);
        assert_eq!(s.armed(), 0);
        assert!(!s.has_count());
        assert_eq!(s.mode, Mode::Insert);
    }
}
