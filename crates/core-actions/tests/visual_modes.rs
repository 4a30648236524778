//! Visual and visual-line selection scenarios.

mod common;

use common::Session;
use core_state::Mode;
use core_text::{Frontend, Span, TextQuery};

#[test]
fn visual_line_delete_spans_whole_lines() {
    let mut s = Session::at("abc\ndef\nghi\n", 4);
    s.keys("Vjd");
    assert_eq!(s.text(), "abc\n");
    assert_eq!(s.cursor(), 4);
    assert_eq!(s.interp.mode(), Mode::Normal);
}

#[test]
fn visual_extension_keeps_selection_normalized() {
    let mut s = Session::at("abcdef", 3);
    s.keys("v");
    assert_eq!(s.host.selection(), Span { start: 3, end: 4 });
    s.keys("h");
    assert_eq!(s.host.selection(), Span { start: 2, end: 4 });
    s.keys("lll");
    assert_eq!(s.host.selection(), Span { start: 3, end: 6 });
}

#[test]
fn visual_vertical_extension_uses_host_lines() {
    let mut s = Session::at("abc\ndef\nghi", 1);
    s.keys("vj");
    assert_eq!(s.host.selection(), Span { start: 1, end: 6 });
    s.keys("j");
    assert_eq!(s.host.selection(), Span { start: 1, end: 10 });
    s.keys("k");
    assert_eq!(s.host.selection(), Span { start: 1, end: 6 });
}

#[test]
fn visual_yank_returns_cursor_to_selection_start() {
    let mut s = Session::at("one two three", 4);
    s.keys("vlly");
    assert_eq!(s.host.clipboard_read().as_deref(), Some("two"));
    assert_eq!(s.cursor(), 4);
    assert_eq!(s.text(), "one two three");
}

#[test]
fn visual_line_yank_then_paste_duplicates_block() {
    let mut s = Session::at("a\nb\nc\n", 2);
    s.keys("Vjy");
    assert_eq!(s.host.clipboard_read().as_deref(), Some("b\nc\n"));
    assert_eq!(s.cursor(), 2);
    s.keys("p");
    assert_eq!(s.text(), "a\nb\nb\nc\nc\n");
}

#[test]
fn counted_visual_motion() {
    let mut s = Session::at("abcdefgh", 0);
    s.keys("v3l");
    assert_eq!(s.host.selection(), Span { start: 0, end: 4 });
}

#[test]
fn visual_line_shrink_below_anchor_line() {
    let mut s = Session::at("l1\nl2\nl3\nl4\n", 3);
    s.keys("Vjj");
    assert_eq!(s.host.selection(), Span { start: 3, end: 12 });
    s.keys("k");
    assert_eq!(s.host.selection(), Span { start: 3, end: 9 });
}

#[test]
fn visual_entry_at_buffer_end_clamps_to_last_unit() {
    let mut s = Session::new("ab");
    s.keys("G");
    assert_eq!(s.cursor(), 2);
    s.keys("v");
    assert_eq!(s.host.selection(), Span { start: 1, end: 2 });
}

#[test]
fn escape_from_visual_preserves_buffer() {
    let mut s = Session::at("abc\ndef", 2);
    s.keys("vjl");
    s.esc();
    assert_eq!(s.text(), "abc\ndef");
    assert_eq!(s.interp.mode(), Mode::Normal);
    assert!(s.host.selection().is_empty());
}

#[test]
fn visual_rejected_delete_leaves_buffer() {
    let mut s = Session::at("abcdef", 1);
    s.keys("vll");
    s.host.set_permit_edits(false);
    s.keys("d");
    assert_eq!(s.text(), "abcdef");
    assert_eq!(s.interp.mode(), Mode::Normal);
}

#[test]
fn mode_transitions_clear_count_and_pendings() {
    let mut s = Session::new("abc def");
    s.keys("3v");
    assert!(!s.interp.state().has_count());
    assert_eq!(s.interp.state().armed(), 0);
    s.esc();
    s.keys("2i");
    assert!(!s.interp.state().has_count());
    assert_eq!(s.interp.mode(), Mode::Insert);
}
