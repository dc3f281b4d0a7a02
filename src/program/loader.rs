//! Source filtering and the loaded [`Program`]

use super::instruction::Instruction;
use super::jumps::JumpTable;
use thiserror::Error;
use tracing::debug;

/// Line and column (both 1-based) of an instruction in the original source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Errors raised while loading source text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// Filtering left no instructions
    #[error("no instructions found in the source")]
    EmptyProgram,
}

/// An ordered, non-empty instruction sequence with its bracket jump table
#[derive(Debug, Clone)]
pub struct Program {
    instructions: Vec<Instruction>,
    locations: Vec<SourceLocation>,
    jumps: JumpTable,
}

impl Program {
    /// Filter `source` down to the instruction alphabet, preserving order
    pub fn load(source: &str) -> Result<Self, LoadError> {
        let mut instructions = Vec::new();
        let mut locations = Vec::new();

        for (line_index, line) in source.split('\n').enumerate() {
            for (column_index, c) in line.chars().enumerate() {
                if let Some(instruction) = Instruction::from_char(c) {
                    instructions.push(instruction);
                    locations.push(SourceLocation::new(line_index + 1, column_index + 1));
                }
            }
        }

        if instructions.is_empty() {
            return Err(LoadError::EmptyProgram);
        }

        let jumps = JumpTable::build(&instructions);
        debug!(
            instructions = instructions.len(),
            bracket_pairs = jumps.pairs(),
            "program loaded"
        );

        Ok(Program {
            instructions,
            locations,
            jumps,
        })
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Always false for a loaded program; kept for the `len`/`is_empty` pair
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Instruction> {
        self.instructions.get(index).copied()
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Source location of the instruction at `index`
    pub fn location(&self, index: usize) -> Option<SourceLocation> {
        self.locations.get(index).copied()
    }

    /// Matching bracket for the bracket at `index`, if it has one
    pub fn partner(&self, index: usize) -> Option<usize> {
        self.jumps.partner(index)
    }
}

// Locations are metadata: two programs are the same program when they execute the
// same instruction stream.
impl PartialEq for Program {
    fn eq(&self, other: &Self) -> bool {
        self.instructions == other.instructions
    }
}

impl Eq for Program {}
