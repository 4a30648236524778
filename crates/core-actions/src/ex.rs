//! Ex-command processor.
//!
//! The surface is deliberately tiny: `w`, `wq`, `x`, `q`. Names are trimmed
//! and lowercased, then matched exactly against the keymap's ex table;
//! anything else beeps. No ranges, no arguments, no flags.

use core_keymap::{ExCmd, Keymap};
use core_text::Host;
use tracing::{debug, info};

pub(crate) fn execute<H: Host + ?Sized>(keymap: &Keymap, host: &mut H, raw: &str) -> bool {
    let name = raw
        .strip_prefix(':')
        .unwrap_or(raw)
        .trim()
        .to_ascii_lowercase();
    match keymap.ex(name.as_str()) {
        Some(ExCmd::Write) => {
            info!(target: "ex", "write");
            host.save();
        }
        Some(ExCmd::WriteQuit) => {
            info!(target: "ex", "write_quit");
            host.save();
            host.close();
        }
        Some(ExCmd::Quit) => {
            info!(target: "ex", "quit");
            host.close();
        }
        None => {
            debug!(target: "ex", cmd = %name, "unknown");
            host.beep();
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use crate::Interpreter;
    use core_events::KeyEvent;
    use core_state::Mode;
    use core_text::ScratchHost;

    fn run(host: &mut ScratchHost, line: &str) -> Interpreter {
        let mut interp = Interpreter::new();
        for c in line.chars() {
            interp.handle_key(host, &KeyEvent::char(c));
        }
        interp.handle_key(host, &KeyEvent::enter());
        interp
    }

    #[test]
    fn write_saves() {
        let mut host = ScratchHost::from_str("text");
        let interp = run(&mut host, ":w");
        assert_eq!(host.saves, 1);
        assert!(!host.closed);
        assert_eq!(interp.mode(), Mode::Normal);
    }

    #[test]
    fn write_quit_and_x_save_then_close() {
        let mut host = ScratchHost::from_str("text");
        run(&mut host, ":wq");
        assert_eq!(host.saves, 1);
        assert!(host.closed);

        let mut host = ScratchHost::from_str("text");
        run(&mut host, ":x");
        assert_eq!(host.saves, 1);
        assert!(host.closed);
    }

    #[test]
    fn quit_closes_without_saving() {
        let mut host = ScratchHost::from_str("text");
        run(&mut host, ":q");
        assert_eq!(host.saves, 0);
        assert!(host.closed);
    }

    #[test]
    fn names_are_trimmed_and_lowercased() {
        let mut host = ScratchHost::from_str("text");
        run(&mut host, ":W ");
        assert_eq!(host.saves, 1);
    }

    #[test]
    fn unknown_command_beeps() {
        let mut host = ScratchHost::from_str("text");
        let interp = run(&mut host, ":blah");
        assert_eq!(host.beeps, 1);
        assert_eq!(host.saves, 0);
        assert!(!host.closed);
        assert_eq!(interp.mode(), Mode::Normal);
    }
}
