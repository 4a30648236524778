//! Literal substring search with wrap-around.
//!
//! Patterns are plain code-unit sequences (no regex). A forward search
//! starts at `cursor + 1`, a backward one at `cursor - 1`; either wraps to
//! the other end of the buffer on a miss and beeps only when the pattern
//! occurs nowhere. `n` repeats in the remembered direction, `N` in the
//! opposite one. `*` / `#` seed the pattern from the word under the cursor.

use crate::dispatcher::move_caret;
use core_state::{EditorState, SearchMemory};
use core_text::{Host, cursor, encode_units, motion};
use tracing::debug;

/// Dispatch a finished `/` or `?` buffer (prefix still attached).
pub(crate) fn commence<H: Host + ?Sized>(
    state: &mut EditorState,
    host: &mut H,
    raw: &str,
) -> bool {
    let forward = raw.starts_with('/');
    let pattern = raw[1..].to_string();
    if pattern.is_empty() {
        host.beep();
        return true;
    }
    debug!(target: "search", pattern = %pattern, forward, "set_pattern");
    state.search = Some(SearchMemory {
        pattern: pattern.clone(),
        forward,
    });
    if !jump(host, &pattern, forward) {
        host.beep();
    }
    true
}

/// `n` / `N`: effective direction is the remembered one, flipped when
/// `reversed`.
pub(crate) fn repeat<H: Host + ?Sized>(
    state: &EditorState,
    host: &mut H,
    reversed: bool,
    n: u32,
) -> bool {
    let Some(mem) = state.search.as_ref() else {
        host.beep();
        return true;
    };
    let forward = if reversed { !mem.forward } else { mem.forward };
    for _ in 0..n {
        if !jump(host, &mem.pattern, forward) {
            host.beep();
            break;
        }
    }
    true
}

/// `*` / `#`: search for the word under the cursor.
pub(crate) fn word_search<H: Host + ?Sized>(
    state: &mut EditorState,
    host: &mut H,
    forward: bool,
) -> bool {
    let cur = cursor(host);
    let Some(span) = motion::word_under(host, cur) else {
        host.beep();
        return true;
    };
    let pattern = host.text(span);
    debug!(target: "search", pattern = %pattern, forward, "word_under_cursor");
    state.search = Some(SearchMemory {
        pattern: pattern.clone(),
        forward,
    });
    if !jump(host, &pattern, forward) {
        host.beep();
    }
    true
}

/// Move to the next match; false when the pattern occurs nowhere reachable.
fn jump<H: Host + ?Sized>(host: &mut H, pattern: &str, forward: bool) -> bool {
    let pat = encode_units(pattern);
    let len = host.len_units();
    if pat.is_empty() || pat.len() > len {
        return false;
    }
    let cur = cursor(host);
    let last_start = len - pat.len();
    let hit = if forward {
        let ahead = if cur + 1 <= last_start {
            scan(host, &pat, cur + 1, last_start)
        } else {
            None
        };
        ahead.or_else(|| scan(host, &pat, 0, cur.min(last_start)))
    } else {
        let behind = if cur > 0 {
            rscan(host, &pat, 0, (cur - 1).min(last_start))
        } else {
            None
        };
        behind.or_else(|| rscan(host, &pat, cur.min(last_start), last_start))
    };
    match hit {
        Some(at) => {
            move_caret(host, at);
            true
        }
        None => false,
    }
}

fn matches_at<H: Host + ?Sized>(host: &H, at: usize, pat: &[u16]) -> bool {
    pat.iter()
        .enumerate()
        .all(|(k, &u)| host.unit(at + k) == Some(u))
}

fn scan<H: Host + ?Sized>(host: &H, pat: &[u16], lo: usize, hi: usize) -> Option<usize> {
    (lo..=hi).find(|&s| matches_at(host, s, pat))
}

fn rscan<H: Host + ?Sized>(host: &H, pat: &[u16], lo: usize, hi: usize) -> Option<usize> {
    (lo..=hi).rev().find(|&s| matches_at(host, s, pat))
}
