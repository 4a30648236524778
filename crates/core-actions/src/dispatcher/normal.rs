//! Normal-mode dispatch.
//!
//! Keys are classified in a fixed precedence order; the first matching rule
//! fires:
//!
//! 1. pending character consumers (`r`, `f`, `F` targets) - these swallow
//!    the key unconditionally, so `r3` replaces with `'3'` instead of
//!    extending a count;
//! 2. count digits (`1`-`9` always, `0` only once a count is open);
//! 3. operator composition when `d`/`y`/`c` is armed;
//! 4. the live `gg` window;
//! 5. the command table.
//!
//! Prefix keys (`g`, `d`, `y`, `c`, `r`, `f`, `F`) preserve the count
//! accumulator; completing commands consume it via `take_count`. Every
//! non-`j`/`k` key breaks the scroll acceleration streak.

use super::{move_caret, visual};
use crate::{operator, paste, search};
use core_events::{KeyCode, KeyEvent};
use core_keymap::{Keymap, NormalCmd};
use core_state::{CharWait, EditorState, FindMemory, Mode};
use core_text::{Host, Span, cursor, encode_units, line_content_end, line_has_terminator, motion};
use std::time::Instant;
use tracing::debug;

pub(crate) fn handle<H: Host + ?Sized>(
    state: &mut EditorState,
    keymap: &Keymap,
    host: &mut H,
    key: &KeyEvent,
    now: Instant,
) -> bool {
    state.expire_g(now);
    match key.code {
        KeyCode::Esc => {
            state.clear_pending();
            state.clear_count();
            state.accel.reset();
            true
        }
        KeyCode::Char(c) => handle_char(state, keymap, host, c, now),
        _ => false,
    }
}

fn handle_char<H: Host + ?Sized>(
    state: &mut EditorState,
    keymap: &Keymap,
    host: &mut H,
    c: char,
    now: Instant,
) -> bool {
    if let Some(wait) = state.take_char_wait() {
        state.accel.reset();
        return consume_pending_char(state, host, wait, c);
    }

    if c.is_ascii_digit() && (c != '0' || state.has_count()) {
        state.accel.reset();
        state.push_digit(c as u32 - '0' as u32);
        return true;
    }

    if let Some(op) = state.take_operator() {
        state.accel.reset();
        return operator::compose(state, keymap, host, op, c);
    }

    if state.g_is_live(now) {
        state.disarm_g();
        if c == 'g' {
            state.take_count();
            state.accel.reset();
            move_caret(host, 0);
            debug!(target: "dispatch.normal", "goto_document_start");
            return true;
        }
        // any other key runs normally; the armed flag is already gone
    }

    let Some(cmd) = keymap.normal(c) else {
        // Unmapped printable keys are swallowed so Normal mode never leaks
        // text into the buffer.
        debug!(target: "dispatch.normal", key = %c, "unmapped");
        state.accel.reset();
        return true;
    };
    exec(state, host, cmd, now)
}

fn consume_pending_char<H: Host + ?Sized>(
    state: &mut EditorState,
    host: &mut H,
    wait: CharWait,
    c: char,
) -> bool {
    let n = state.take_count();
    match wait {
        CharWait::Replace => replace_units(host, c, n),
        CharWait::FindForward => find(state, host, c, true, n),
        CharWait::FindBackward => find(state, host, c, false, n),
    }
}

/// `r<c>`: overwrite `n` code units in place. Refuses (beep) when the line
/// has fewer than `n` units left under the cursor.
fn replace_units<H: Host + ?Sized>(host: &mut H, c: char, n: u32) -> bool {
    let cur = cursor(host);
    let content_end = line_content_end(host, cur);
    let end = cur + n as usize;
    if end > content_end {
        host.beep();
        return true;
    }
    let replacement: String = std::iter::repeat_n(c, n as usize).collect();
    if host.try_replace(Span::new(cur, end), &replacement) {
        let written = encode_units(&replacement).len();
        move_caret(host, cur + written.saturating_sub(1));
    }
    true
}

fn find<H: Host + ?Sized>(
    state: &mut EditorState,
    host: &mut H,
    target: char,
    forward: bool,
    n: u32,
) -> bool {
    state.last_find = Some(FindMemory { target, forward });
    let mut idx = cursor(host);
    for _ in 0..n {
        match motion::find_in_line(host, idx, target, forward) {
            Some(hit) => idx = hit,
            None => {
                host.beep();
                return true;
            }
        }
    }
    move_caret(host, idx);
    true
}

fn exec<H: Host + ?Sized>(
    state: &mut EditorState,
    host: &mut H,
    cmd: NormalCmd,
    now: Instant,
) -> bool {
    if !matches!(cmd, NormalCmd::LineDown | NormalCmd::LineUp) {
        state.accel.reset();
    }
    match cmd {
        NormalCmd::Left => {
            let n = state.take_count() as usize;
            let cur = cursor(host);
            move_caret(host, cur.saturating_sub(n));
        }
        NormalCmd::Right => {
            let n = state.take_count() as usize;
            let cur = cursor(host);
            move_caret(host, (cur + n).min(host.len_units()));
        }
        NormalCmd::LineDown => {
            let n = state.take_count();
            let mult = state.accel.bump(now);
            for _ in 0..n.saturating_mul(mult) {
                host.move_line_down();
            }
        }
        NormalCmd::LineUp => {
            let n = state.take_count();
            let mult = state.accel.bump(now);
            for _ in 0..n.saturating_mul(mult) {
                host.move_line_up();
            }
        }
        NormalCmd::LineStart => {
            state.take_count();
            let line = host.line_span(cursor(host));
            move_caret(host, line.start);
        }
        NormalCmd::FirstNonBlank => {
            state.take_count();
            let target = motion::first_non_blank(host, cursor(host));
            move_caret(host, target);
        }
        NormalCmd::LineEnd => {
            state.take_count();
            let target = motion::last_content_unit(host, cursor(host));
            move_caret(host, target);
        }
        NormalCmd::WordForward { big } => {
            let n = state.take_count();
            let mut idx = cursor(host);
            for _ in 0..n {
                idx = motion::word_forward(host, idx, big);
            }
            move_caret(host, idx);
        }
        NormalCmd::WordBackward { big } => {
            let n = state.take_count();
            let mut idx = cursor(host);
            for _ in 0..n {
                idx = motion::word_backward(host, idx, big);
            }
            move_caret(host, idx);
        }
        NormalCmd::WordEnd { big } => {
            let n = state.take_count();
            let mut idx = cursor(host);
            for _ in 0..n {
                idx = motion::word_end(host, idx, big);
            }
            move_caret(host, idx);
        }
        NormalCmd::GoPrefix => {
            state.arm_g(now);
        }
        NormalCmd::DocumentEnd => {
            state.take_count();
            move_caret(host, host.len_units());
        }
        NormalCmd::Insert => {
            state.take_count();
            state.enter_mode(Mode::Insert);
        }
        NormalCmd::InsertAtFirstNonBlank => {
            state.take_count();
            let target = motion::first_non_blank(host, cursor(host));
            move_caret(host, target);
            state.enter_mode(Mode::Insert);
        }
        NormalCmd::Append => {
            state.take_count();
            let cur = cursor(host);
            let target = (cur + 1).min(line_content_end(host, cur));
            move_caret(host, target);
            state.enter_mode(Mode::Insert);
        }
        NormalCmd::AppendAtLineEnd => {
            state.take_count();
            let target = line_content_end(host, cursor(host));
            move_caret(host, target);
            state.enter_mode(Mode::Insert);
        }
        NormalCmd::OpenBelow => open_line(state, host, true),
        NormalCmd::OpenAbove => open_line(state, host, false),
        NormalCmd::DeleteUnder => {
            let n = state.take_count() as usize;
            let cur = cursor(host);
            let end = (cur + n).min(line_content_end(host, cur));
            if end > cur && host.try_replace(Span::new(cur, end), "") {
                move_caret(host, cur);
            }
        }
        NormalCmd::DeleteToLineEnd => {
            state.take_count();
            let cur = cursor(host);
            let content_end = line_content_end(host, cur);
            if content_end > cur && host.try_replace(Span::new(cur, content_end), "") {
                move_caret(host, cur);
            }
        }
        NormalCmd::ChangeToLineEnd => {
            state.take_count();
            let cur = cursor(host);
            let content_end = line_content_end(host, cur);
            if content_end > cur && !host.try_replace(Span::new(cur, content_end), "") {
                return true;
            }
            move_caret(host, cur);
            state.enter_mode(Mode::Insert);
        }
        NormalCmd::PasteAfter => {
            let n = state.take_count();
            paste::paste(host, true, n);
        }
        NormalCmd::PasteBefore => {
            let n = state.take_count();
            paste::paste(host, false, n);
        }
        NormalCmd::ReplaceChar => {
            state.arm_char(CharWait::Replace);
        }
        NormalCmd::Undo => {
            state.take_count();
            host.undo();
        }
        NormalCmd::JoinLines => {
            let n = state.take_count();
            for _ in 0..n {
                let cur = cursor(host);
                match motion::join_span(host, cur) {
                    Some(span) => {
                        if host.try_replace(span, " ") {
                            move_caret(host, span.start);
                        } else {
                            break;
                        }
                    }
                    None => {
                        host.beep();
                        break;
                    }
                }
            }
        }
        NormalCmd::FindForward => {
            state.arm_char(CharWait::FindForward);
        }
        NormalCmd::FindBackward => {
            state.arm_char(CharWait::FindBackward);
        }
        NormalCmd::SearchForward => {
            state.enter_mode(Mode::Command);
            state.cmdline = "/".to_string();
        }
        NormalCmd::SearchBackward => {
            state.enter_mode(Mode::Command);
            state.cmdline = "?".to_string();
        }
        NormalCmd::RepeatSearch => {
            let n = state.take_count();
            search::repeat(state, host, false, n);
        }
        NormalCmd::RepeatSearchReversed => {
            let n = state.take_count();
            search::repeat(state, host, true, n);
        }
        NormalCmd::SearchWordForward => {
            state.take_count();
            search::word_search(state, host, true);
        }
        NormalCmd::SearchWordBackward => {
            state.take_count();
            search::word_search(state, host, false);
        }
        NormalCmd::ExCommand => {
            state.enter_mode(Mode::Command);
            state.cmdline = ":".to_string();
        }
        NormalCmd::VisualChar => visual::enter(state, host, false),
        NormalCmd::VisualLine => visual::enter(state, host, true),
        NormalCmd::Operator(op) => {
            state.arm_operator(op);
        }
    }
    true
}

fn open_line<H: Host + ?Sized>(state: &mut EditorState, host: &mut H, below: bool) {
    state.take_count();
    let cur = cursor(host);
    let line = host.line_span(cur);
    if below {
        let had_terminator = line_has_terminator(host, cur);
        if host.try_replace(Span::caret(line.end), "\n") {
            let target = if had_terminator { line.end } else { line.end + 1 };
            move_caret(host, target);
            state.enter_mode(Mode::Insert);
        }
    } else if host.try_replace(Span::caret(line.start), "\n") {
        move_caret(host, line.start);
        state.enter_mode(Mode::Insert);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Interpreter;
    use core_events::KeyEvent;
    use core_text::{ScratchHost, TextQuery};

    fn feed(interp: &mut Interpreter, host: &mut ScratchHost, keys: &str) {
        for c in keys.chars() {
            interp.handle_key(host, &KeyEvent::char(c));
        }
    }

    #[test]
    fn horizontal_motion_clamps() {
        let mut interp = Interpreter::new();
        let mut host = ScratchHost::from_str("abc");
        feed(&mut interp, &mut host, "h");
        assert_eq!(host.selection().start, 0);
        feed(&mut interp, &mut host, "9l");
        assert_eq!(host.selection().start, 3);
        feed(&mut interp, &mut host, "l");
        assert_eq!(host.selection().start, 3);
    }

    #[test]
    fn zero_is_motion_without_count_and_digit_with() {
        let mut interp = Interpreter::new();
        let mut host = ScratchHost::from_str("aaaaaaaaaaaaaa");
        feed(&mut interp, &mut host, "l");
        assert_eq!(host.selection().start, 1);
        feed(&mut interp, &mut host, "0");
        assert_eq!(host.selection().start, 0);
        feed(&mut interp, &mut host, "10l");
        assert_eq!(host.selection().start, 10);
    }

    #[test]
    fn replace_consumes_digit_as_target() {
        let mut interp = Interpreter::new();
        let mut host = ScratchHost::from_str("abc");
        feed(&mut interp, &mut host, "r3");
        assert_eq!(host.contents(), "3bc");
        assert_eq!(host.selection().start, 0);
    }

    #[test]
    fn counted_replace_overwrites_run() {
        let mut interp = Interpreter::new();
        let mut host = ScratchHost::from_str("abcd");
        feed(&mut interp, &mut host, "3rx");
        assert_eq!(host.contents(), "xxxd");
        assert_eq!(host.selection().start, 2);
    }

    #[test]
    fn replace_past_line_end_beeps() {
        let mut interp = Interpreter::new();
        let mut host = ScratchHost::from_str("ab\ncd");
        feed(&mut interp, &mut host, "5rx");
        assert_eq!(host.contents(), "ab\ncd");
        assert_eq!(host.beeps, 1);
    }

    #[test]
    fn open_below_and_above() {
        let mut interp = Interpreter::new();
        let mut host = ScratchHost::from_str("abc\ndef");
        feed(&mut interp, &mut host, "o");
        assert_eq!(host.contents(), "abc\n\ndef");
        assert_eq!(host.selection().start, 4);
        assert_eq!(interp.mode(), Mode::Insert);

        let mut interp = Interpreter::new();
        let mut host = ScratchHost::from_str("abc");
        feed(&mut interp, &mut host, "O");
        assert_eq!(host.contents(), "\nabc");
        assert_eq!(host.selection().start, 0);
        assert_eq!(interp.mode(), Mode::Insert);
    }

    #[test]
    fn open_below_on_last_line() {
        let mut interp = Interpreter::new();
        let mut host = ScratchHost::from_str("abc");
        feed(&mut interp, &mut host, "o");
        assert_eq!(host.contents(), "abc\n");
        assert_eq!(host.selection().start, 4);
    }

    #[test]
    fn append_variants_position_cursor() {
        let mut interp = Interpreter::new();
        let mut host = ScratchHost::from_str("  word\nnext");
        feed(&mut interp, &mut host, "A");
        assert_eq!(host.selection().start, 6);
        assert_eq!(interp.mode(), Mode::Insert);

        let mut interp = Interpreter::new();
        let mut host = ScratchHost::from_str("  word\nnext");
        feed(&mut interp, &mut host, "I");
        assert_eq!(host.selection().start, 2);
        assert_eq!(interp.mode(), Mode::Insert);
    }

    #[test]
    fn unmapped_key_is_swallowed() {
        let mut interp = Interpreter::new();
        let mut host = ScratchHost::from_str("abc");
        assert!(interp.handle_key(&mut host, &KeyEvent::char('z')));
        assert_eq!(host.contents(), "abc");
        assert_eq!(interp.mode(), Mode::Normal);
    }
}
