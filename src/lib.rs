//! # Introduction
//!
//! tapetty runs Brainfuck programs: eight single-character instructions over a tape of
//! 8-bit cells. Programs run either straight through on the console or recorded step by
//! step and browsed forward and backward in a terminal UI built with
//! [ratatui](https://docs.rs/ratatui).
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Loader → Program → Engine → (console | Timeline → TUI)
//! ```
//!
//! 1. [`program`] — filters source text to instructions and precomputes bracket jumps.
//! 2. [`interpreter`] — the fetch-execute [`interpreter::engine::Engine`], its errors,
//!    the I/O capabilities it calls, and the recorded [`interpreter::timeline::Timeline`].
//! 3. [`memory`] — the growable [`memory::Tape`].
//! 4. [`snapshot`] — snapshots with a memory budget and the [`snapshot::OutputLog`] sink.
//! 5. [`host`] — console adapters: flushing stdout, raw-mode key input, stream input.
//! 6. [`ui`] — ratatui-based TUI; not part of the stable library API.
//!
//! ## Example
//!
//! ```
//! use tapetty::interpreter::engine::Engine;
//! use tapetty::interpreter::io::ScriptedInput;
//! use tapetty::program::Program;
//!
//! let program = Program::load("++++++++[>++++++++<-]>+.").unwrap();
//! let mut engine = Engine::new(program);
//! let mut output = String::new();
//! engine.run(&mut ScriptedInput::empty(), &mut output).unwrap();
//! assert_eq!(output, "A");
//! ```

pub mod host;
pub mod interpreter;
pub mod logging;
pub mod memory;
pub mod program;
pub mod snapshot;
pub mod ui;
