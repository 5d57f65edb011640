//! Raw-mode terminal handling for the interactive timer.
//!
//! [`Terminal`] enters raw mode and the alternate screen on creation and
//! restores both on drop. [`install_panic_hook`] does the same restoration
//! before a panic message is printed, so the message stays readable.

use std::io::{self, Stdout, Write};
use std::panic;

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute, queue,
    style::Print,
    terminal::{
        disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};

use crate::logging;

/// Installs a panic hook that restores terminal state before displaying panic messages.
///
/// Call once, before creating a [`Terminal`].
pub fn install_panic_hook() {
    let previous_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        // Best effort: the terminal may already be half torn down.
        let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
        previous_hook(panic_info);
    }));
}

/// Alternate-screen, raw-mode terminal restored on drop.
pub struct Terminal {
    out: Stdout,
    /// Raw mode is currently off (config menu prompts read whole lines).
    suspended: bool,
    restored: bool,
}

impl Terminal {
    /// # Errors
    ///
    /// Returns an error if raw mode or the alternate screen cannot be entered.
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut out = io::stdout();
        if let Err(e) = execute!(out, EnterAlternateScreen, Hide) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        logging::set_screen_active(true);
        Ok(Self {
            out,
            suspended: false,
            restored: false,
        })
    }

    /// Replace the screen contents with `lines`, top-left aligned.
    pub fn draw(&mut self, lines: &[String]) -> io::Result<()> {
        queue!(self.out, MoveTo(0, 0), Clear(ClearType::All))?;
        for (row, line) in lines.iter().enumerate() {
            let row = u16::try_from(row).unwrap_or(u16::MAX);
            queue!(self.out, MoveTo(0, row), Print(line))?;
        }
        self.out.flush()
    }

    /// Leave raw mode and show the cursor so line-based prompts work.
    pub fn suspend(&mut self) -> io::Result<()> {
        if self.suspended {
            return Ok(());
        }
        execute!(self.out, MoveTo(0, 0), Clear(ClearType::All), Show)?;
        disable_raw_mode()?;
        self.suspended = true;
        Ok(())
    }

    pub fn resume(&mut self) -> io::Result<()> {
        if !self.suspended {
            return Ok(());
        }
        enable_raw_mode()?;
        execute!(self.out, Hide)?;
        self.suspended = false;
        Ok(())
    }

    /// Give the terminal back to the shell.
    ///
    /// # Errors
    ///
    /// Unlike the [`Drop`] implementation, errors are propagated.
    pub fn restore(&mut self) -> io::Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        logging::set_screen_active(false);
        execute!(self.out, Show, LeaveAlternateScreen)?;
        if !self.suspended {
            disable_raw_mode()?;
        }
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}
