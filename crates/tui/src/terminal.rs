//! Exclusive use of the terminal while the picker is shown.
//!
//! [`TerminalGuard::acquire`] enables raw mode and enters the alternate
//! screen; dropping the guard restores both. The guard is the viewport lock
//! of the picker, so every exit path (normal close, `?` error, panic unwind)
//! hands the terminal back in its original state.

use std::io::{self, Stdout};

use anyhow::{Context, Result};
use crossterm::{
    cursor, execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::warn;

pub type TerminalBackend = CrosstermBackend<Stdout>;

pub struct TerminalGuard {
    terminal: Terminal<TerminalBackend>,
}

impl TerminalGuard {
    pub fn acquire() -> Result<Self> {
        enable_raw_mode().context("enable raw mode")?;
        let mut stdout = io::stdout();
        if let Err(error) = execute!(stdout, EnterAlternateScreen, cursor::Hide) {
            let _ = disable_raw_mode();
            return Err(error).context("enter alternate screen");
        }
        let terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => terminal,
            Err(error) => {
                restore(&mut io::stdout());
                return Err(error).context("create terminal");
            }
        };
        Ok(Self { terminal })
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<TerminalBackend> {
        &mut self.terminal
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore(self.terminal.backend_mut());
    }
}

fn restore<W: io::Write>(writer: &mut W) {
    if let Err(error) = disable_raw_mode() {
        warn!(%error, "failed to disable raw mode");
    }
    if let Err(error) = execute!(writer, LeaveAlternateScreen, cursor::Show) {
        warn!(%error, "failed to leave alternate screen");
    }
}
