//! Visual and visual-line dispatch.
//!
//! The interpreter tracks the selection as anchor + moving end
//! (`visual_anchor` / `visual_cursor` in `EditorState`) and keeps the host's
//! single selection in sync after every motion:
//!
//! * charwise: `[min(anchor, cursor), max(anchor, cursor) + 1)` - the span
//!   includes both endpoint units, so entering Visual yields a one-unit
//!   selection and motions visibly extend it;
//! * linewise: the union of the line spans containing the anchor and the
//!   cursor, so the selection always covers whole lines anchored at the
//!   line Visual-Line mode was entered on.
//!
//! Vertical extension in charwise mode goes through the host's visual-line
//! primitives (the host owns wrapping); linewise mode steps logical lines,
//! since whole-line spans are wrap-independent.

use super::move_caret;
use core_events::{KeyCode, KeyEvent};
use core_keymap::{Keymap, VisualCmd};
use core_state::{EditorState, Mode};
use core_text::{Host, Span, cursor};
use tracing::debug;

/// Enter Visual (`v`) or VisualLine (`V`) from Normal mode.
pub(crate) fn enter<H: Host + ?Sized>(state: &mut EditorState, host: &mut H, linewise: bool) {
    let len = host.len_units();
    let cur = cursor(host).min(len.saturating_sub(1));
    if linewise {
        state.enter_mode(Mode::VisualLine);
        let line = host.line_span(cur);
        state.visual_anchor = line.start;
        state.visual_cursor = cur;
        host.set_selection(line);
    } else {
        state.enter_mode(Mode::Visual);
        state.visual_anchor = cur;
        state.visual_cursor = cur;
        host.set_selection(Span {
            start: cur,
            end: (cur + 1).min(len),
        });
    }
}

pub(crate) fn handle<H: Host + ?Sized>(
    state: &mut EditorState,
    keymap: &Keymap,
    host: &mut H,
    key: &KeyEvent,
) -> bool {
    match key.code {
        KeyCode::Esc => {
            let caret = state.visual_cursor.min(host.len_units());
            host.set_selection(Span::caret(caret));
            state.enter_mode(Mode::Normal);
            true
        }
        KeyCode::Char(c) => handle_char(state, keymap, host, c),
        _ => false,
    }
}

fn handle_char<H: Host + ?Sized>(
    state: &mut EditorState,
    keymap: &Keymap,
    host: &mut H,
    c: char,
) -> bool {
    if c.is_ascii_digit() && (c != '0' || state.has_count()) {
        state.push_digit(c as u32 - '0' as u32);
        return true;
    }
    let Some(cmd) = keymap.visual(c) else {
        debug!(target: "dispatch.visual", key = %c, "unmapped");
        state.clear_count();
        return true;
    };
    let linewise = state.mode == Mode::VisualLine;
    match cmd {
        VisualCmd::Left => {
            let n = state.take_count() as usize;
            if !linewise {
                state.visual_cursor = state.visual_cursor.saturating_sub(n);
                reselect(state, host);
            }
        }
        VisualCmd::Right => {
            let n = state.take_count() as usize;
            if !linewise {
                let max = host.len_units().saturating_sub(1);
                state.visual_cursor = (state.visual_cursor + n).min(max);
                reselect(state, host);
            }
        }
        VisualCmd::Down => extend_vertically(state, host, true),
        VisualCmd::Up => extend_vertically(state, host, false),
        VisualCmd::Yank => {
            state.take_count();
            let span = selection_span(state, host);
            let mut text = host.text(span);
            if linewise && !text.ends_with(['\n', '\r']) {
                text.push('\n');
            }
            host.clipboard_write(&text);
            move_caret(host, span.start);
            state.enter_mode(Mode::Normal);
            debug!(target: "dispatch.visual", units = span.len(), linewise, "yank");
        }
        VisualCmd::Delete => {
            state.take_count();
            let span = selection_span(state, host);
            if !span.is_empty() {
                host.try_replace(span, "");
            }
            move_caret(host, span.start);
            state.enter_mode(Mode::Normal);
        }
    }
    true
}

fn extend_vertically<H: Host + ?Sized>(state: &mut EditorState, host: &mut H, down: bool) {
    let n = state.take_count();
    if state.mode == Mode::VisualLine {
        for _ in 0..n {
            let line = host.line_span(state.visual_cursor);
            if down {
                if line.end < host.len_units() {
                    state.visual_cursor = line.end;
                }
            } else if line.start > 0 {
                state.visual_cursor = host.line_span(line.start - 1).start;
            }
        }
    } else {
        // let the host resolve visual lines for the moving end
        host.set_selection(Span::caret(state.visual_cursor));
        for _ in 0..n {
            if down {
                host.move_line_down();
            } else {
                host.move_line_up();
            }
        }
        state.visual_cursor = cursor(host).min(host.len_units().saturating_sub(1));
    }
    reselect(state, host);
}

fn reselect<H: Host + ?Sized>(state: &EditorState, host: &mut H) {
    let span = selection_span(state, host);
    host.set_selection(span);
}

/// The authoritative selection for the current anchor/cursor pair.
fn selection_span<H: Host + ?Sized>(state: &EditorState, host: &H) -> Span {
    let len = host.len_units();
    if state.mode == Mode::VisualLine {
        let a = host.line_span(state.visual_anchor);
        let c = host.line_span(state.visual_cursor);
        Span {
            start: a.start.min(c.start),
            end: a.end.max(c.end),
        }
    } else {
        let lo = state.visual_anchor.min(state.visual_cursor).min(len);
        let hi = (state.visual_anchor.max(state.visual_cursor) + 1).min(len);
        Span {
            start: lo,
            end: hi.max(lo),
        }
    }
}
