//! Raw-mode terminal bridge between the host and the console port.

use std::io::{self, Stdout, Write};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal;
use mos6502_core::Console;

/// What the input pump observed.
#[derive(Debug, PartialEq, Eq)]
pub enum Pump {
    Continue,
    Quit,
}

/// Keyboard-to-console pump and output writer; holds the terminal in
/// raw mode for its lifetime when a tty is attached.
pub struct Terminal {
    stdout: Stdout,
    raw: bool,
}

impl Terminal {
    pub fn new() -> Self {
        // piped stdin/stdout has no raw mode; run cooked instead
        let raw = terminal::enable_raw_mode().is_ok();
        Self {
            stdout: io::stdout(),
            raw,
        }
    }

    pub const fn is_raw(&self) -> bool {
        self.raw
    }

    /// Drains pending key events into the console input queue.
    ///
    /// Ctrl-C and Escape request shutdown instead of being forwarded.
    pub fn pump_input(&mut self, console: &mut Console) -> io::Result<Pump> {
        if !self.raw {
            return Ok(Pump::Continue);
        }
        while event::poll(Duration::ZERO)? {
            if let Event::Key(KeyEvent { code, modifiers }) = event::read()? {
                match code {
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(Pump::Quit);
                    }
                    KeyCode::Esc => return Ok(Pump::Quit),
                    KeyCode::Char(c) => {
                        if let Ok(byte) = u8::try_from(c) {
                            console.push_input(byte);
                        }
                    }
                    KeyCode::Enter => console.push_input(b'\n'),
                    _ => {}
                }
            }
        }
        Ok(Pump::Continue)
    }

    /// Writes program output, translating newlines while raw.
    pub fn flush_output(&mut self, bytes: &[u8]) -> io::Result<()> {
        if bytes.is_empty() {
            return Ok(());
        }
        for &byte in bytes {
            if byte == b'\n' && self.raw {
                self.stdout.write_all(b"\r\n")?;
            } else {
                self.stdout.write_all(&[byte])?;
            }
        }
        self.stdout.flush()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.raw {
            let _ = terminal::disable_raw_mode();
        }
    }
}
