//! Operator engine: delete / yank / change over a resolved range.
//!
//! Ranges arrive from three places: an armed operator composing with an
//! operand motion, the doubled linewise forms (`dd`, `yy`, `cc`), or the
//! visual dispatcher handing over the live selection. Composition rules:
//!
//! * the operand grammar is the restricted set in `core-keymap`
//!   (`$ ^ w W b B G`); anything else beeps and disarms;
//! * charwise operands produce `[min(start, target), max(start, target))`
//!   with the cursor as `start`; `$` extends to the line-content end so
//!   `d$` matches `D`;
//! * `G` and the doubled forms snap to whole lines, terminators included.
//!
//! Mutations go through the host's guarded replace; a refusal leaves the
//! cursor and all interpreter state untouched.

use crate::dispatcher::move_caret;
use core_keymap::{Keymap, Operand};
use core_state::{EditorState, Mode, Operator};
use core_text::{Host, Span, cursor, is_line_terminator, line_content_end, motion};
use tracing::debug;

/// Second key after an armed operator.
pub(crate) fn compose<H: Host + ?Sized>(
    state: &mut EditorState,
    keymap: &Keymap,
    host: &mut H,
    op: Operator,
    key: char,
) -> bool {
    if key == op.key() {
        let n = state.take_count();
        return linewise(state, host, op, n);
    }
    if let Some(operand) = keymap.operand(key) {
        let n = state.take_count();
        return with_motion(state, host, op, operand, n);
    }
    debug!(target: "operator", op = ?op, key = %key, "unmapped_operand");
    state.clear_count();
    host.beep();
    true
}

fn with_motion<H: Host + ?Sized>(
    state: &mut EditorState,
    host: &mut H,
    op: Operator,
    operand: Operand,
    n: u32,
) -> bool {
    let cur = cursor(host);
    let range = match operand {
        Operand::LineEnd => Span::new(cur, line_content_end(host, cur)),
        Operand::FirstNonBlank => Span::new(cur, motion::first_non_blank(host, cur)),
        Operand::WordForward { big } => {
            let mut idx = cur;
            for _ in 0..n {
                idx = motion::word_forward(host, idx, big);
            }
            Span::new(cur, idx)
        }
        Operand::WordBackward { big } => {
            let mut idx = cur;
            for _ in 0..n {
                idx = motion::word_backward(host, idx, big);
            }
            Span::new(cur, idx)
        }
        // linewise: current line start through end of document
        Operand::DocumentEnd => Span {
            start: host.line_span(cur).start,
            end: host.len_units(),
        },
    };
    apply(state, host, op, range)
}

/// Apply an operator to an already-resolved range.
pub(crate) fn apply<H: Host + ?Sized>(
    state: &mut EditorState,
    host: &mut H,
    op: Operator,
    range: Span,
) -> bool {
    if range.is_empty() {
        debug!(target: "operator", op = ?op, "empty_range");
        host.beep();
        return true;
    }
    match op {
        Operator::Delete => {
            if host.try_replace(range, "") {
                move_caret(host, range.start);
            }
        }
        Operator::Yank => {
            let text = host.text(range);
            host.clipboard_write(&text);
            // cursor unchanged
        }
        Operator::Change => {
            if host.try_replace(range, "") {
                move_caret(host, range.start);
                state.enter_mode(Mode::Insert);
            }
        }
    }
    true
}

/// The doubled forms: `dd` / `yy` / `cc` over `n` whole lines.
pub(crate) fn linewise<H: Host + ?Sized>(
    state: &mut EditorState,
    host: &mut H,
    op: Operator,
    n: u32,
) -> bool {
    let cur = cursor(host);
    let first = host.line_span(cur);
    let mut last = first;
    for _ in 1..n {
        if last.end >= host.len_units() {
            break;
        }
        last = host.line_span(last.end);
    }
    let range = Span {
        start: first.start,
        end: last.end,
    };
    debug!(target: "operator", op = ?op, lines = n, units = range.len(), "linewise");
    match op {
        Operator::Delete => {
            if range.is_empty() {
                host.beep();
            } else if host.try_replace(range, "") {
                move_caret(host, range.start);
            }
        }
        Operator::Yank => {
            if range.is_empty() {
                host.beep();
                return true;
            }
            let mut text = host.text(range);
            if !text.ends_with(['\n', '\r']) {
                // keep the payload linewise even on a terminator-less final line
                text.push('\n');
            }
            host.clipboard_write(&text);
            move_caret(host, range.start);
        }
        Operator::Change => {
            // keep the first line's indent, and the final terminator
            let mut indent_end = first.start;
            let first_content_end = line_content_end(host, first.start);
            while indent_end < first_content_end
                && host.unit(indent_end).is_some_and(|u| u == 0x20 || u == 0x09)
            {
                indent_end += 1;
            }
            let mut content_end = range.end;
            if content_end > indent_end
                && host.unit(content_end - 1).is_some_and(is_line_terminator)
            {
                content_end -= 1;
            }
            if content_end > indent_end {
                if host.try_replace(Span::new(indent_end, content_end), "") {
                    move_caret(host, indent_end);
                    state.enter_mode(Mode::Insert);
                }
            } else {
                move_caret(host, indent_end);
                state.enter_mode(Mode::Insert);
            }
        }
    }
    true
}
