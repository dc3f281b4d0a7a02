//! The data tape
//!
//! A right-growing sequence of 8-bit cells with a single data pointer. The tape starts
//! with one zero cell and is extended lazily as the pointer moves right, so its length is
//! always `max pointer reached + 1`. It never shrinks and never grows leftward: moving
//! left from cell 0 is a fault.
//!
//! Every operation checks before it mutates, so a faulting call leaves the tape as it was.

use crate::interpreter::constants::TAPE_LIMIT;
use thiserror::Error;
use tracing::trace;

/// Tape boundary violations, converted to execution errors by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TapeFault {
    #[error("data pointer would exceed the {limit}-cell tape limit")]
    LimitExceeded { limit: usize },

    #[error("data pointer would move left of cell 0")]
    NegativePointer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<u8>,
    pointer: usize,
    limit: usize,
}

impl Tape {
    pub fn new() -> Self {
        Self::with_limit(TAPE_LIMIT)
    }

    /// A tape with a custom cell ceiling (at least one cell)
    pub fn with_limit(limit: usize) -> Self {
        Tape {
            cells: vec![0],
            pointer: 0,
            limit: limit.max(1),
        }
    }

    /// `>`
    pub fn move_right(&mut self) -> Result<(), TapeFault> {
        let next = self.pointer + 1;
        if next >= self.limit {
            return Err(TapeFault::LimitExceeded { limit: self.limit });
        }
        if next >= self.cells.len() {
            self.cells.resize(next + 1, 0);
            trace!(len = self.cells.len(), "tape grown");
        }
        self.pointer = next;
        Ok(())
    }

    /// `<`
    pub fn move_left(&mut self) -> Result<(), TapeFault> {
        if self.pointer == 0 {
            return Err(TapeFault::NegativePointer);
        }
        self.pointer -= 1;
        Ok(())
    }

    /// `+`, wrapping 255 to 0
    pub fn increment(&mut self) {
        let cell = &mut self.cells[self.pointer];
        *cell = cell.wrapping_add(1);
    }

    /// `-`, wrapping 0 to 255
    pub fn decrement(&mut self) {
        let cell = &mut self.cells[self.pointer];
        *cell = cell.wrapping_sub(1);
    }

    /// Value of the current cell
    pub fn get(&self) -> u8 {
        self.cells[self.pointer]
    }

    /// Overwrite the current cell
    pub fn set(&mut self, value: u8) {
        self.cells[self.pointer] = value;
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Never true: the tape always holds at least cell 0
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }
}

impl Default for Tape {
    fn default() -> Self {
        Self::new()
    }
}
