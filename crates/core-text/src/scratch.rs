//! In-memory host implementation.
//!
//! `ScratchHost` stands in for the real editor surface: it stores the buffer
//! as raw UTF-16 units (the same alphabet the production host indexes by),
//! runs the permission gate on every replace, and records the observable
//! side effects (status pushes, beeps, caret width, saves, close) so tests
//! can assert on them. The driver binary uses it as the actual buffer.
//!
//! Vertical motion is logical-line based with column clamping; the
//! production host resolves visual wrapping instead, which is exactly why
//! the interpreter reaches these moves only through the `Frontend` trait.

use crate::{
    CARRIAGE_RETURN, Frontend, LINE_FEED, Span, TextMutate, TextQuery, encode_units,
    is_line_terminator,
};
use tracing::{debug, trace};

#[derive(Debug, Clone)]
pub struct ScratchHost {
    units: Vec<u16>,
    selection: Span,
    clipboard: Option<String>,
    permit_edits: bool,
    undo_stack: Vec<(Vec<u16>, Span)>,
    /// Every status line pushed, newest last.
    pub statuses: Vec<String>,
    pub beeps: usize,
    pub caret_width: f64,
    /// Reported width of the glyph `W`; adjustable per test.
    pub glyph_width: f64,
    pub saves: usize,
    pub closed: bool,
}

impl ScratchHost {
    pub fn from_str(text: &str) -> Self {
        Self {
            units: encode_units(text),
            selection: Span::caret(0),
            clipboard: None,
            permit_edits: true,
            undo_stack: Vec::new(),
            statuses: Vec::new(),
            beeps: 0,
            caret_width: 1.0,
            glyph_width: 8.0,
            saves: 0,
            closed: false,
        }
    }

    pub fn contents(&self) -> String {
        String::from_utf16_lossy(&self.units)
    }

    /// Flip the permission gate; with edits denied every `try_replace`
    /// refuses and the buffer stays byte-identical.
    pub fn set_permit_edits(&mut self, permit: bool) {
        self.permit_edits = permit;
    }

    pub fn place_cursor(&mut self, idx: usize) {
        let idx = idx.min(self.units.len());
        self.selection = Span::caret(idx);
    }

    pub fn last_status(&self) -> Option<&str> {
        self.statuses.last().map(String::as_str)
    }

    pub fn set_clipboard(&mut self, text: Option<&str>) {
        self.clipboard = text.map(str::to_string);
    }

    /// The host's default Insert-mode path for keystrokes the interpreter
    /// does not consume: replace the selection with the typed text, caret
    /// after it.
    pub fn type_text(&mut self, text: &str) {
        let span = self.selection;
        self.try_replace(span, text);
    }

    /// Host default for Backspace in Insert mode.
    pub fn delete_backward(&mut self) {
        let caret = self.selection.start;
        if self.selection.is_empty() && caret > 0 {
            self.try_replace(Span::new(caret - 1, caret), "");
        } else if !self.selection.is_empty() {
            let span = self.selection;
            self.try_replace(span, "");
        }
    }

    fn clamp(&self, span: Span) -> Span {
        let len = self.units.len();
        Span {
            start: span.start.min(len),
            end: span.end.min(len),
        }
    }
}

impl TextQuery for ScratchHost {
    fn len_units(&self) -> usize {
        self.units.len()
    }

    fn unit(&self, idx: usize) -> Option<u16> {
        self.units.get(idx).copied()
    }

    fn text(&self, span: Span) -> String {
        let span = self.clamp(span);
        String::from_utf16_lossy(&self.units[span.start..span.end])
    }

    fn line_span(&self, idx: usize) -> Span {
        let len = self.units.len();
        let mut idx = idx.min(len);
        // an index on the LF of a CRLF pair addresses the line the pair ends
        if idx < len
            && self.units[idx] == LINE_FEED
            && idx > 0
            && self.units[idx - 1] == CARRIAGE_RETURN
        {
            idx -= 1;
        }
        let mut start = idx;
        while start > 0 && !is_line_terminator(self.units[start - 1]) {
            start -= 1;
        }
        let mut end = idx;
        while end < len && !is_line_terminator(self.units[end]) {
            end += 1;
        }
        if end < len {
            end += 1; // include the terminator
            // CRLF is a single terminator, not two lines
            if self.units[end - 1] == CARRIAGE_RETURN && end < len && self.units[end] == LINE_FEED {
                end += 1;
            }
        }
        Span { start, end }
    }

    fn selection(&self) -> Span {
        self.selection
    }
}

impl TextMutate for ScratchHost {
    fn try_replace(&mut self, span: Span, replacement: &str) -> bool {
        if !self.permit_edits {
            debug!(target: "host.scratch", ?span, "edit_rejected");
            return false;
        }
        let span = self.clamp(span);
        self.undo_stack.push((self.units.clone(), self.selection));
        let new_units = encode_units(replacement);
        let caret = span.start + new_units.len();
        self.units.splice(span.start..span.end, new_units);
        self.selection = Span::caret(caret);
        trace!(
            target: "host.scratch",
            ?span,
            inserted = replacement.len(),
            len = self.units.len(),
            "replace"
        );
        true
    }

    fn set_selection(&mut self, span: Span) {
        self.selection = self.clamp(span);
    }

    fn undo(&mut self) {
        if let Some((units, selection)) = self.undo_stack.pop() {
            self.units = units;
            self.selection = selection;
            debug!(target: "host.scratch", len = self.units.len(), "undo");
        }
    }
}

impl Frontend for ScratchHost {
    fn move_line_up(&mut self) {
        let caret = self.selection.start;
        let line = self.line_span(caret);
        if line.start == 0 {
            return;
        }
        let col = caret - line.start;
        let prev = self.line_span(line.start - 1);
        let prev_content = crate::line_content_end(self, prev.start);
        self.selection = Span::caret((prev.start + col).min(prev_content));
    }

    fn move_line_down(&mut self) {
        let caret = self.selection.start;
        let line = self.line_span(caret);
        if line.end >= self.units.len() && !crate::line_has_terminator(self, caret) {
            return;
        }
        let col = caret - line.start;
        let next = self.line_span(line.end);
        let next_content = crate::line_content_end(self, next.start);
        self.selection = Span::caret((next.start + col).min(next_content));
    }

    fn clipboard_read(&self) -> Option<String> {
        self.clipboard.clone().filter(|s| !s.is_empty())
    }

    fn clipboard_write(&mut self, text: &str) {
        self.clipboard = Some(text.to_string());
    }

    fn beep(&mut self) {
        self.beeps += 1;
    }

    fn set_caret_width(&mut self, px: f64) {
        self.caret_width = px;
    }

    fn standard_glyph_width(&self) -> f64 {
        self.glyph_width
    }

    fn set_status(&mut self, line: &str) {
        self.statuses.push(line.to_string());
    }

    fn save(&mut self) {
        self.saves += 1;
    }

    fn close(&mut self) {
        self.closed = true;
    }
}
