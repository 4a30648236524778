//! Per-mode key tables.
//!
//! One table per concern, built once and queried by the dispatchers:
//! Normal-mode commands, the visual-mode subset, the operand motions an
//! armed operator accepts, and the ex-command names. Keeping these as data
//! rather than nested conditionals makes the command set auditable: each
//! table below is the authoritative list of what the interpreter answers to.
//!
//! Precedence (count digits, pending character consumers, operator
//! composition) is not encoded here; the dispatcher applies it before
//! consulting a table.

use ahash::AHashMap;
use core_state::Operator;
use tracing::trace;

/// Normal-mode commands. `GoPrefix` and `Operator` arm pending state; the
/// rest execute immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalCmd {
    Left,
    Right,
    LineDown,
    LineUp,
    LineStart,
    FirstNonBlank,
    LineEnd,
    WordForward { big: bool },
    WordBackward { big: bool },
    WordEnd { big: bool },
    GoPrefix,
    DocumentEnd,
    Insert,
    InsertAtFirstNonBlank,
    Append,
    AppendAtLineEnd,
    OpenBelow,
    OpenAbove,
    DeleteUnder,
    DeleteToLineEnd,
    ChangeToLineEnd,
    PasteAfter,
    PasteBefore,
    ReplaceChar,
    Undo,
    JoinLines,
    FindForward,
    FindBackward,
    SearchForward,
    SearchBackward,
    RepeatSearch,
    RepeatSearchReversed,
    SearchWordForward,
    SearchWordBackward,
    ExCommand,
    VisualChar,
    VisualLine,
    Operator(Operator),
}

/// Visual / visual-line commands. Vertical motions double as the line-span
/// grow/shrink keys in linewise mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualCmd {
    Left,
    Right,
    Down,
    Up,
    Yank,
    Delete,
}

/// Motions an armed operator composes with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    LineEnd,
    FirstNonBlank,
    WordForward { big: bool },
    WordBackward { big: bool },
    DocumentEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExCmd {
    Write,
    WriteQuit,
    Quit,
}

#[derive(Debug)]
pub struct Keymap {
    normal: AHashMap<char, NormalCmd>,
    visual: AHashMap<char, VisualCmd>,
    operand: AHashMap<char, Operand>,
    ex: AHashMap<&'static str, ExCmd>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new()
    }
}

impl Keymap {
    pub fn new() -> Self {
        let normal: AHashMap<char, NormalCmd> = [
            ('h', NormalCmd::Left),
            ('l', NormalCmd::Right),
            ('j', NormalCmd::LineDown),
            ('k', NormalCmd::LineUp),
            ('0', NormalCmd::LineStart),
            ('^', NormalCmd::FirstNonBlank),
            ('$', NormalCmd::LineEnd),
            ('w', NormalCmd::WordForward { big: false }),
            ('W', NormalCmd::WordForward { big: true }),
            ('b', NormalCmd::WordBackward { big: false }),
            ('B', NormalCmd::WordBackward { big: true }),
            ('e', NormalCmd::WordEnd { big: false }),
            ('E', NormalCmd::WordEnd { big: true }),
            ('g', NormalCmd::GoPrefix),
            ('G', NormalCmd::DocumentEnd),
            ('i', NormalCmd::Insert),
            ('I', NormalCmd::InsertAtFirstNonBlank),
            ('a', NormalCmd::Append),
            ('A', NormalCmd::AppendAtLineEnd),
            ('o', NormalCmd::OpenBelow),
            ('O', NormalCmd::OpenAbove),
            ('x', NormalCmd::DeleteUnder),
            ('D', NormalCmd::DeleteToLineEnd),
            ('C', NormalCmd::ChangeToLineEnd),
            ('p', NormalCmd::PasteAfter),
            ('P', NormalCmd::PasteBefore),
            ('r', NormalCmd::ReplaceChar),
            ('u', NormalCmd::Undo),
            ('J', NormalCmd::JoinLines),
            ('f', NormalCmd::FindForward),
            ('F', NormalCmd::FindBackward),
            ('/', NormalCmd::SearchForward),
            ('?', NormalCmd::SearchBackward),
            ('n', NormalCmd::RepeatSearch),
            ('N', NormalCmd::RepeatSearchReversed),
            ('*', NormalCmd::SearchWordForward),
            ('#', NormalCmd::SearchWordBackward),
            (':', NormalCmd::ExCommand),
            ('v', NormalCmd::VisualChar),
            ('V', NormalCmd::VisualLine),
            ('d', NormalCmd::Operator(Operator::Delete)),
            ('y', NormalCmd::Operator(Operator::Yank)),
            ('c', NormalCmd::Operator(Operator::Change)),
        ]
        .into_iter()
        .collect();

        let visual: AHashMap<char, VisualCmd> = [
            ('h', VisualCmd::Left),
            ('l', VisualCmd::Right),
            ('j', VisualCmd::Down),
            ('k', VisualCmd::Up),
            ('y', VisualCmd::Yank),
            ('d', VisualCmd::Delete),
        ]
        .into_iter()
        .collect();

        let operand: AHashMap<char, Operand> = [
            ('$', Operand::LineEnd),
            ('^', Operand::FirstNonBlank),
            ('w', Operand::WordForward { big: false }),
            ('W', Operand::WordForward { big: true }),
            ('b', Operand::WordBackward { big: false }),
            ('B', Operand::WordBackward { big: true }),
            ('G', Operand::DocumentEnd),
        ]
        .into_iter()
        .collect();

        let ex: AHashMap<&'static str, ExCmd> = [
            ("w", ExCmd::Write),
            ("wq", ExCmd::WriteQuit),
            ("x", ExCmd::WriteQuit),
            ("q", ExCmd::Quit),
        ]
        .into_iter()
        .collect();

        Self {
            normal,
            visual,
            operand,
            ex,
        }
    }

    pub fn normal(&self, key: char) -> Option<NormalCmd> {
        let cmd = self.normal.get(&key).copied();
        trace!(target: "keymap", key = %key, found = cmd.is_some(), "normal_lookup");
        cmd
    }

    pub fn visual(&self, key: char) -> Option<VisualCmd> {
        self.visual.get(&key).copied()
    }

    pub fn operand(&self, key: char) -> Option<Operand> {
        self.operand.get(&key).copied()
    }

    pub fn ex(&self, name: &str) -> Option<ExCmd> {
        self.ex.get(name).copied()
    }
}
