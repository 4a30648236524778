//! Clipboard paste.
//!
//! The clipboard is register-less: the payload's own shape decides the
//! granularity. Content ending in a line terminator pastes linewise (onto a
//! line of its own, before or after the current line); anything else pastes
//! charwise at/after the cursor. Cursor placement keeps the caret inside
//! the pasted region: first non-blank of the last pasted line for linewise,
//! the last inserted code unit for charwise. An empty clipboard is a silent
//! no-op.

use crate::dispatcher::move_caret;
use core_text::{Host, Span, cursor, encode_units, is_line_terminator, line_has_terminator};
use tracing::{debug, trace};

pub(crate) fn paste<H: Host + ?Sized>(host: &mut H, after: bool, n: u32) -> bool {
    let Some(text) = host.clipboard_read() else {
        trace!(target: "paste", "clipboard_empty");
        return true;
    };
    // hosts may report an empty string rather than nothing; same no-op
    if text.is_empty() {
        trace!(target: "paste", "clipboard_empty");
        return true;
    }
    let linewise = text.ends_with(['\n', '\r']);
    let payload = text.repeat(n as usize);
    debug!(target: "paste", linewise, after, repeat = n, "paste");
    if linewise {
        paste_linewise(host, after, &payload);
    } else {
        paste_charwise(host, after, &payload);
    }
    true
}

fn paste_linewise<H: Host + ?Sized>(host: &mut H, after: bool, payload: &str) {
    let cur = cursor(host);
    let line = host.line_span(cur);
    let (at, body) = if !after {
        (line.start, payload.to_string())
    } else if line_has_terminator(host, cur) {
        (line.end, payload.to_string())
    } else {
        // final line lacks a terminator: open a line below it instead
        let mut body = String::from("\n");
        body.push_str(payload.trim_end_matches(['\n', '\r']));
        (line.end, body)
    };
    if !host.try_replace(Span::caret(at), &body) {
        return;
    }
    // caret: first non-blank of the last pasted line
    let units = encode_units(&body);
    let mut tail = units.len();
    if tail > 0 && is_line_terminator(units[tail - 1]) {
        tail -= 1;
    }
    let mut last_line = 0;
    for i in (0..tail).rev() {
        if is_line_terminator(units[i]) {
            last_line = i + 1;
            break;
        }
    }
    let mut off = last_line;
    while off < tail && (units[off] == 0x20 || units[off] == 0x09) {
        off += 1;
    }
    move_caret(host, at + off);
}

fn paste_charwise<H: Host + ?Sized>(host: &mut H, after: bool, payload: &str) {
    let cur = cursor(host);
    let at = if after {
        (cur + 1).min(host.len_units())
    } else {
        cur
    };
    if !host.try_replace(Span::caret(at), payload) {
        return;
    }
    let inserted = encode_units(payload).len();
    move_caret(host, at + inserted - 1);
}
