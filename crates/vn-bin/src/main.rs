//! vn: headless keystroke driver.
//!
//! Loads a file (or an empty buffer) into the in-memory host, replays a
//! keystroke script through the interpreter, and prints the resulting
//! buffer. `:w` / `:wq` write back to the file (or `--output`). Useful for
//! exercising the interpreter from the command line and for reproducing
//! key-sequence bugs outside the host application:
//!
//! ```text
//! vn --keys 'dw:wq<cr>' notes.txt
//! echo 'abc' | vn --keys 'A!<esc>'      # no file: read stdin, print stdout
//! ```
//!
//! Script notation is the literal keys plus `<esc>`, `<cr>`, `<bs>`, and
//! `<sp>`. Keys the interpreter does not consume take the host's default
//! path: in Insert mode they type into the buffer, elsewhere they are
//! dropped.

use anyhow::{Context, Result, bail};
use clap::Parser;
use core_actions::Interpreter;
use core_events::KeyEvent;
use core_state::Mode;
use core_text::ScratchHost;
use std::io::Read;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "vn", version, about = "Replay vi keystrokes against a note buffer")]
struct Args {
    /// File to load; stdin when omitted.
    pub path: Option<PathBuf>,
    /// Keystroke script, e.g. 'ggdw:wq<cr>'.
    #[arg(short, long, default_value = "")]
    pub keys: String,
    /// Where `:w` writes; defaults to the input path.
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// Log at debug level when RUST_LOG is unset.
    #[arg(long)]
    pub verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let default_filter = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let text = match &args.path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    info!(target: "runtime", units = text.encode_utf16().count(), "buffer_loaded");

    let keys = parse_script(&args.keys)?;
    let mut host = ScratchHost::from_str(&text);
    let mut interp = Interpreter::new();
    run_script(&mut interp, &mut host, &keys);

    if host.saves > 0 {
        let target = args.output.as_ref().or(args.path.as_ref());
        match target {
            Some(path) => {
                std::fs::write(path, host.contents())
                    .with_context(|| format!("cannot write {}", path.display()))?;
                info!(target: "runtime", file = %path.display(), "buffer_written");
            }
            None => bail!("script saved the buffer but no file or --output was given"),
        }
    }
    print!("{}", host.contents());
    Ok(())
}

/// Replay keys until the script ends or the host window closes. Unconsumed
/// keys go through the host's default handling.
fn run_script(interp: &mut Interpreter, host: &mut ScratchHost, keys: &[KeyEvent]) {
    for key in keys {
        if host.closed {
            debug!(target: "runtime", "window_closed");
            break;
        }
        let consumed = interp.handle_key(host, key);
        if !consumed {
            host_default(host, interp.mode(), key);
        }
    }
}

fn host_default(host: &mut ScratchHost, mode: Mode, key: &KeyEvent) {
    if mode != Mode::Insert {
        return;
    }
    match key.code {
        core_events::KeyCode::Char(c) if !c.is_control() => {
            host.type_text(&c.to_string());
        }
        core_events::KeyCode::Enter => host.type_text("\n"),
        core_events::KeyCode::Backspace => host.delete_backward(),
        _ => {}
    }
}

/// Literal characters plus the `<esc>` / `<cr>` / `<bs>` / `<sp>` tokens.
fn parse_script(script: &str) -> Result<Vec<KeyEvent>> {
    let mut keys = Vec::new();
    let mut chars = script.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '<' {
            keys.push(KeyEvent::char(c));
            continue;
        }
        let mut name = String::new();
        loop {
            match chars.next() {
                Some('>') => break,
                Some(t) => name.push(t),
                None => bail!("unterminated key token '<{name}'"),
            }
        }
        match name.to_ascii_lowercase().as_str() {
            "esc" => keys.push(KeyEvent::esc()),
            "cr" | "enter" => keys.push(KeyEvent::enter()),
            "bs" => keys.push(KeyEvent::backspace()),
            "sp" => keys.push(KeyEvent::char(' ')),
            other => bail!("unknown key token '<{other}>'"),
        }
    }
    Ok(keys)
}
