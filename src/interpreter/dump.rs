//! Plain-text dump of the engine state, printed by `--dump`

use crate::interpreter::engine::Engine;
use std::fmt;

/// Borrowing view of an [`Engine`] that renders its tape, program and cursor
pub struct StateDump<'a> {
    engine: &'a Engine,
}

impl<'a> StateDump<'a> {
    pub fn new(engine: &'a Engine) -> Self {
        StateDump { engine }
    }
}

impl fmt::Display for StateDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tape = self.engine.tape();
        writeln!(f, "Memory:")?;
        for (index, cell) in tape.cells().iter().enumerate() {
            let marker = if index == tape.pointer() { " <" } else { "" };
            writeln!(f, "\t{}{}", cell, marker)?;
        }

        writeln!(f, "Program:")?;
        for instruction in self.engine.program().instructions() {
            writeln!(f, "\t{}", instruction)?;
        }

        write!(
            f,
            "Program pointer: {}",
            self.engine.instruction_pointer()
        )
    }
}
