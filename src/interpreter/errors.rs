//! Runtime error types for the interpreter
//!
//! This module defines [`ExecutionError`], which represents all errors that can occur
//! while a program runs (as opposed to load errors or host errors).
//!
//! All execution errors are fatal. The faulting instruction has no partial effect, and
//! the engine moves to its terminal `Faulted` state.

use crate::memory::TapeFault;
use crate::program::Instruction;
use std::io;
use thiserror::Error;

/// Runtime errors that can occur during execution.
///
/// Every variant records `index`, the position of the faulting instruction in the
/// program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// `>` would move the data pointer onto the tape ceiling
    #[error("memory limit exceeded: the tape holds at most {limit} cells (instruction {index})")]
    MemoryLimitExceeded { limit: usize, index: usize },

    /// `<` at cell 0
    #[error("data pointer moved left of cell 0 (instruction {index})")]
    NegativePointer { index: usize },

    /// `,` received a character that does not fit in a cell
    #[error("input character U+{code_point:04X} does not fit in a cell (instruction {index})")]
    NonAsciiInput { code_point: u32, index: usize },

    /// A bracket jump found no partner
    #[error("unmatched '{bracket}' (instruction {index})")]
    UnmatchedBracket { bracket: Instruction, index: usize },

    /// `,` on a closed input source
    #[error("input source closed while reading (instruction {index})")]
    InputExhausted { index: usize },

    /// The host I/O capability failed
    #[error("I/O error: {message} (instruction {index})")]
    Io {
        kind: io::ErrorKind,
        message: String,
        index: usize,
    },
}

impl ExecutionError {
    /// Index of the instruction that faulted
    pub fn instruction_index(&self) -> usize {
        match self {
            ExecutionError::MemoryLimitExceeded { index, .. } => *index,
            ExecutionError::NegativePointer { index } => *index,
            ExecutionError::NonAsciiInput { index, .. } => *index,
            ExecutionError::UnmatchedBracket { index, .. } => *index,
            ExecutionError::InputExhausted { index } => *index,
            ExecutionError::Io { index, .. } => *index,
        }
    }

    pub(crate) fn from_tape(fault: TapeFault, index: usize) -> Self {
        match fault {
            TapeFault::LimitExceeded { limit } => {
                ExecutionError::MemoryLimitExceeded { limit, index }
            }
            TapeFault::NegativePointer => ExecutionError::NegativePointer { index },
        }
    }

    pub(crate) fn from_io(error: io::Error, index: usize) -> Self {
        ExecutionError::Io {
            kind: error.kind(),
            message: error.to_string(),
            index,
        }
    }
}
