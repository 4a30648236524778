//! Presentation hooks: caret width and status line.
//!
//! Runs after every consumed key. The block caret is the width of the glyph
//! `W` in the current typing font, clamped to `[6, 18]` px; Insert and
//! Command modes use a 1 px bar. The status line is the mode tag (with the
//! open count while one is accumulating) or, in Command mode, the literal
//! command buffer including its prefix.

use core_state::{EditorState, Mode};
use core_text::Host;

const BLOCK_CARET_MIN: f64 = 6.0;
const BLOCK_CARET_MAX: f64 = 18.0;
const BAR_CARET: f64 = 1.0;

pub(crate) fn refresh<H: Host + ?Sized>(state: &EditorState, host: &mut H) {
    let width = if matches!(state.mode, Mode::Normal | Mode::Visual | Mode::VisualLine) {
        host.standard_glyph_width()
            .clamp(BLOCK_CARET_MIN, BLOCK_CARET_MAX)
    } else {
        BAR_CARET
    };
    host.set_caret_width(width);

    let status = match state.mode {
        Mode::Insert => "INSERT".to_string(),
        Mode::Normal => {
            if state.has_count() {
                format!("NORMAL [{}]", state.pending_count())
            } else {
                "NORMAL".to_string()
            }
        }
        Mode::Visual => "VISUAL".to_string(),
        Mode::VisualLine => "VISUAL LINE".to_string(),
        Mode::Command => state.cmdline.clone(),
    };
    host.set_status(&status);
}
