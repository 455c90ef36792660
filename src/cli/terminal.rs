use std::{
    io::{self, Write},
    sync::Mutex,
};

use ansi_term::Colour;

use crate::tracker::display::{Notifier, StatusDisplay};

#[derive(Debug, Default)]
struct StatusLine {
    text: String,
    running: bool,
}

/// Keeps a single status line at the bottom of stderr, redrawn on every change.
#[derive(Debug, Default)]
pub struct TerminalStatus {
    line: Mutex<StatusLine>,
}

impl TerminalStatus {
    pub fn new() -> Self {
        Self::default()
    }

    fn redraw(line: &StatusLine) {
        let control = if line.running {
            Colour::Red.paint("■ Stop")
        } else {
            Colour::Green.paint("▶ Start")
        };
        let mut stderr = io::stderr().lock();
        // Status output is cosmetic, a closed stderr shouldn't take the session down
        let _ = write!(stderr, "\r\x1b[2K[{control}] {}", line.text);
        let _ = stderr.flush();
    }

    /// Clears the status line so regular output doesn't get mixed with it.
    pub fn clear(&self) {
        let mut stderr = io::stderr().lock();
        let _ = write!(stderr, "\r\x1b[2K");
        let _ = stderr.flush();
    }

    pub fn refresh(&self) {
        if let Ok(line) = self.line.lock() {
            Self::redraw(&line);
        }
    }
}

impl StatusDisplay for TerminalStatus {
    fn show_time(&self, text: &str) {
        if let Ok(mut line) = self.line.lock() {
            line.text = text.to_string();
            Self::redraw(&line);
        }
    }

    fn show_control(&self, running: bool) {
        if let Ok(mut line) = self.line.lock() {
            line.running = running;
            Self::redraw(&line);
        }
    }
}

/// Prints notices on their own line above the status line.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, message: &str) {
        eprint!("\r\x1b[2K");
        println!("{message}");
    }
}
