//! Console adapters for the engine's I/O capabilities
//!
//! - [`WriteSink`]: writes and flushes every character (stdout in the CLI)
//! - [`TerminalInput`]: one key press per `,`, read with the terminal in raw mode
//! - [`StreamInput`]: UTF-8 characters decoded from a byte stream (piped stdin, files)

mod console;

pub use console::{StreamInput, TerminalInput, WriteSink};
