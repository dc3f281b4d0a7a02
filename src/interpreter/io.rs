//! Host capabilities used by `.` and `,`
//!
//! The engine never touches stdin or stdout directly. It calls an [`OutputSink`] for `.`
//! and an [`InputSource`] for `,`; the host decides what sits behind them (a terminal in
//! raw mode, a pipe, a fixed script, an in-memory log).

use std::collections::VecDeque;
use std::io;

/// Receives one character per `.` instruction
pub trait OutputSink {
    /// Emit `ch`. It must be visible to the user before this returns.
    fn emit(&mut self, ch: char) -> io::Result<()>;
}

/// Supplies one character per `,` instruction
pub trait InputSource {
    /// Block until one character is available. `Ok(None)` means the source is closed.
    fn read_char(&mut self) -> io::Result<Option<char>>;
}

impl OutputSink for String {
    fn emit(&mut self, ch: char) -> io::Result<()> {
        self.push(ch);
        Ok(())
    }
}

/// Input from a fixed string, closed once every character has been read
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    pending: VecDeque<char>,
}

impl ScriptedInput {
    pub fn new(text: &str) -> Self {
        ScriptedInput {
            pending: text.chars().collect(),
        }
    }

    /// A source that is closed from the start
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl InputSource for ScriptedInput {
    fn read_char(&mut self) -> io::Result<Option<char>> {
        Ok(self.pending.pop_front())
    }
}
