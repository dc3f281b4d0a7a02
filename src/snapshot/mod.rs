// Snapshot management for reverse execution

use crate::interpreter::engine::{Engine, EngineState};
use crate::interpreter::io::OutputSink;
use std::io;
use std::mem;
use thiserror::Error;

/// In-memory output sink that records everything a program prints
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputLog {
    text: String,
}

impl OutputLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Output split into lines, without a trailing empty line
    pub fn lines(&self) -> Vec<&str> {
        let mut lines: Vec<&str> = self.text.split('\n').collect();
        if lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }
        lines
    }
}

impl OutputSink for OutputLog {
    fn emit(&mut self, ch: char) -> io::Result<()> {
        self.text.push(ch);
        Ok(())
    }
}

/// Errors from recording or navigating history
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("snapshot memory limit exceeded: {current} + {requested} > {limit} bytes")]
    LimitExceeded {
        current: usize,
        requested: usize,
        limit: usize,
    },

    #[error("already at the beginning of execution")]
    AtStart,

    #[error("no more snapshots available (execution finished)")]
    AtEnd,
}

/// Snapshot of execution state
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub cells: Vec<u8>,
    pub data_pointer: usize,
    pub instruction_pointer: usize,
    pub state: EngineState,
    pub steps: u64,
    pub output: OutputLog,
}

impl Snapshot {
    pub fn capture(engine: &Engine, output: &OutputLog) -> Self {
        Snapshot {
            cells: engine.tape().cells().to_vec(),
            data_pointer: engine.data_pointer(),
            instruction_pointer: engine.instruction_pointer(),
            state: engine.state(),
            steps: engine.steps(),
            output: output.clone(),
        }
    }

    /// Estimate the memory usage of this snapshot in bytes
    pub fn estimated_size(&self) -> usize {
        mem::size_of::<Self>() + self.cells.len() + self.output.text.len()
    }
}

/// Manages execution history for reverse execution
#[derive(Debug)]
pub struct SnapshotManager {
    snapshots: Vec<Snapshot>,
    max_memory: usize,
    current_memory: usize,
}

impl SnapshotManager {
    pub fn new(max_memory: usize) -> Self {
        SnapshotManager {
            snapshots: Vec::new(),
            max_memory,
            current_memory: 0,
        }
    }

    /// Add a snapshot to history
    pub fn push(&mut self, snapshot: Snapshot) -> Result<(), HistoryError> {
        let snapshot_size = snapshot.estimated_size();

        if self.current_memory + snapshot_size > self.max_memory {
            return Err(HistoryError::LimitExceeded {
                current: self.current_memory,
                requested: snapshot_size,
                limit: self.max_memory,
            });
        }

        self.current_memory += snapshot_size;
        self.snapshots.push(snapshot);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn memory_usage(&self) -> usize {
        self.current_memory
    }

    pub fn memory_limit(&self) -> usize {
        self.max_memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::Program;

    fn snapshot() -> Snapshot {
        let engine = Engine::new(Program::load("+").unwrap());
        Snapshot::capture(&engine, &OutputLog::new())
    }

    #[test]
    fn output_log_splits_lines() {
        let mut log = OutputLog::new();
        for ch in "hi\nthere\n".chars() {
            log.emit(ch).unwrap();
        }
        assert_eq!(log.lines(), vec!["hi", "there"]);
        assert_eq!(log.text(), "hi\nthere\n");
    }

    #[test]
    fn capture_copies_engine_state() {
        let snap = snapshot();
        assert_eq!(snap.cells, vec![0]);
        assert_eq!(snap.instruction_pointer, 0);
        assert_eq!(snap.state, EngineState::Idle);
    }

    #[test]
    fn push_respects_the_memory_limit() {
        let size = snapshot().estimated_size();
        let mut manager = SnapshotManager::new(size * 2);
        manager.push(snapshot()).unwrap();
        manager.push(snapshot()).unwrap();
        assert_eq!(manager.memory_usage(), size * 2);

        let err = manager.push(snapshot()).unwrap_err();
        assert_eq!(
            err,
            HistoryError::LimitExceeded {
                current: size * 2,
                requested: size,
                limit: size * 2
            }
        );
        assert_eq!(manager.len(), 2);
    }
}
