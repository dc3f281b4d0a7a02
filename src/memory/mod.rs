//! Memory model for the interpreter
//!
//! - [`tape`]: the growable cell tape and its data pointer
//!
//! # Cell Semantics
//!
//! Cells are unsigned 8-bit values. `+` and `-` wrap modulo 256:
//! ```text
//! 255 + 1  →  0
//!   0 - 1  →  255
//! ```

pub mod tape;

pub use tape::{Tape, TapeFault};
