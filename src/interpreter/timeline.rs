//! Recorded execution history
//!
//! [`Timeline::record`] runs a program to the end on a fresh engine, keeping a
//! [`Snapshot`] before the first instruction and after every step. The debugger then
//! moves back and forth through that history without re-executing anything.
//!
//! Recording stops early when the snapshot memory budget is spent, which also bounds
//! programs that never halt.

use crate::interpreter::engine::{Engine, EngineState};
use crate::interpreter::errors::ExecutionError;
use crate::interpreter::io::InputSource;
use crate::program::Program;
use crate::snapshot::{HistoryError, OutputLog, Snapshot, SnapshotManager};
use tracing::{info, warn};

/// How a recording ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Halted,
    Faulted(ExecutionError),
    /// The memory budget ran out before the program finished
    Truncated { limit: usize },
}

pub struct Timeline {
    program: Program,
    snapshots: SnapshotManager,

    /// Current position in execution history
    position: usize,

    outcome: Outcome,
}

impl Timeline {
    pub fn record(program: Program, input: &mut dyn InputSource, memory_limit: usize) -> Self {
        let mut engine = Engine::new(program.clone());
        let mut output = OutputLog::new();
        let mut snapshots = SnapshotManager::new(memory_limit);

        let outcome = Self::record_steps(&mut engine, input, &mut output, &mut snapshots);
        match &outcome {
            Outcome::Halted => info!(snapshots = snapshots.len(), "recording complete"),
            Outcome::Faulted(fault) => warn!(%fault, snapshots = snapshots.len(), "recorded run faulted"),
            Outcome::Truncated { limit } => {
                warn!(limit, snapshots = snapshots.len(), "history budget spent, recording truncated")
            }
        }

        Timeline {
            program,
            snapshots,
            position: 0,
            outcome,
        }
    }

    fn record_steps(
        engine: &mut Engine,
        input: &mut dyn InputSource,
        output: &mut OutputLog,
        snapshots: &mut SnapshotManager,
    ) -> Outcome {
        if snapshots.push(Snapshot::capture(engine, output)).is_err() {
            return Outcome::Truncated {
                limit: snapshots.memory_limit(),
            };
        }

        loop {
            let result = engine.step(input, output);

            // A state that could not be stored truncates the history, even a final one
            if snapshots.push(Snapshot::capture(engine, output)).is_err() {
                return Outcome::Truncated {
                    limit: snapshots.memory_limit(),
                };
            }

            match result {
                Err(fault) => return Outcome::Faulted(fault),
                Ok(EngineState::Halted) => return Outcome::Halted,
                Ok(_) => {}
            }
        }
    }

    /// Step backward in execution (restore previous snapshot)
    pub fn step_backward(&mut self) -> Result<(), HistoryError> {
        if self.position == 0 {
            return Err(HistoryError::AtStart);
        }
        self.position -= 1;
        Ok(())
    }

    /// Step forward in execution (move to the next recorded snapshot)
    pub fn step_forward(&mut self) -> Result<(), HistoryError> {
        if self.position + 1 >= self.snapshots.len() {
            return Err(HistoryError::AtEnd);
        }
        self.position += 1;
        Ok(())
    }

    /// Rewind to the beginning of execution history
    pub fn rewind_to_start(&mut self) {
        self.position = 0;
    }

    pub fn jump_to_end(&mut self) {
        self.position = self.snapshots.len().saturating_sub(1);
    }

    // ========== Getter methods for UI ==========

    /// Snapshot at the current position; `None` only if nothing could be recorded
    pub fn current(&self) -> Option<&Snapshot> {
        self.snapshots.get(self.position)
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn total_snapshots(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_at_end(&self) -> bool {
        self.position + 1 >= self.snapshots.len()
    }

    pub fn memory_usage(&self) -> usize {
        self.snapshots.memory_usage()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::constants::DEFAULT_HISTORY_LIMIT;
    use crate::interpreter::io::ScriptedInput;

    fn record(source: &str, input: &str, limit: usize) -> Timeline {
        let program = Program::load(source).unwrap();
        Timeline::record(program, &mut ScriptedInput::new(input), limit)
    }

    #[test]
    fn records_one_snapshot_per_step_plus_initial() {
        let timeline = record("++.", "", DEFAULT_HISTORY_LIMIT);
        assert_eq!(timeline.outcome(), &Outcome::Halted);
        assert_eq!(timeline.total_snapshots(), 4);

        let first = timeline.current().unwrap();
        assert_eq!(first.state, EngineState::Idle);
        assert_eq!(first.cells, vec![0]);
    }

    #[test]
    fn navigation_moves_through_history() {
        let mut timeline = record(",.", "x", DEFAULT_HISTORY_LIMIT);
        assert_eq!(timeline.step_backward(), Err(HistoryError::AtStart));

        timeline.step_forward().unwrap();
        assert_eq!(timeline.current().unwrap().cells, vec![b'x']);
        assert_eq!(timeline.current().unwrap().output.text(), "");

        timeline.step_forward().unwrap();
        assert_eq!(timeline.current().unwrap().output.text(), "x");
        assert!(timeline.is_at_end());
        assert_eq!(timeline.step_forward(), Err(HistoryError::AtEnd));

        timeline.rewind_to_start();
        assert_eq!(timeline.position(), 0);
        timeline.jump_to_end();
        assert_eq!(timeline.position(), 2);
        assert_eq!(timeline.current().unwrap().state, EngineState::Halted);
    }

    #[test]
    fn faults_end_the_recording() {
        let timeline = record("+<", "", DEFAULT_HISTORY_LIMIT);
        assert_eq!(
            timeline.outcome(),
            &Outcome::Faulted(ExecutionError::NegativePointer { index: 1 })
        );
        let last = timeline.snapshots.get(timeline.total_snapshots() - 1).unwrap();
        assert_eq!(last.state, EngineState::Faulted);
        assert_eq!(last.cells, vec![1]);
    }

    #[test]
    fn unrecorded_final_state_truncates_the_history() {
        let program = Program::load("++").unwrap();
        let size = Snapshot::capture(&Engine::new(program), &OutputLog::new()).estimated_size();

        let mut timeline = record("++", "", 2 * size);
        assert_eq!(timeline.outcome(), &Outcome::Truncated { limit: 2 * size });
        assert_eq!(timeline.total_snapshots(), 2);
        timeline.jump_to_end();
        assert_eq!(timeline.current().unwrap().state, EngineState::Running);

        let timeline = record("++", "", 3 * size);
        assert_eq!(timeline.outcome(), &Outcome::Halted);
        let last = timeline.snapshots.get(2).unwrap();
        assert_eq!(last.state, EngineState::Halted);
    }

    #[test]
    fn endless_programs_are_truncated_by_the_budget() {
        let timeline = record("+[]", "", 64 * 1024);
        assert_eq!(timeline.outcome(), &Outcome::Truncated { limit: 64 * 1024 });
        assert!(timeline.total_snapshots() > 1);
        assert!(timeline.memory_usage() <= 64 * 1024);
    }
}
