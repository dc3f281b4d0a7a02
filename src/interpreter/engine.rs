// Execution engine for the interpreter

use crate::interpreter::constants::TAPE_LIMIT;
use crate::interpreter::errors::ExecutionError;
use crate::interpreter::io::{InputSource, OutputSink};
use crate::memory::Tape;
use crate::program::{Instruction, Program};
use tracing::{debug, info, trace};

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Loaded, nothing executed yet
    Idle,
    /// Inside the fetch-execute loop
    Running,
    /// The instruction pointer ran past the last instruction
    Halted,
    /// An instruction faulted; terminal
    Faulted,
}

#[derive(Debug, Clone)]
enum Status {
    Idle,
    Running,
    Halted,
    Faulted(ExecutionError),
}

/// Executes one program over one tape. Single use: once halted or faulted it stays
/// that way.
#[derive(Debug, Clone)]
pub struct Engine {
    program: Program,
    tape: Tape,

    /// Index of the next instruction to execute
    instruction_pointer: usize,

    status: Status,

    /// Instructions executed so far
    steps: u64,
}

impl Engine {
    pub fn new(program: Program) -> Self {
        Self::with_tape_limit(program, TAPE_LIMIT)
    }

    pub fn with_tape_limit(program: Program, tape_limit: usize) -> Self {
        Engine {
            program,
            tape: Tape::with_limit(tape_limit),
            instruction_pointer: 0,
            status: Status::Idle,
            steps: 0,
        }
    }

    /// Run the program until it halts or faults.
    ///
    /// Calling this again on a halted engine does nothing and returns `Ok(())`; on a
    /// faulted engine it returns the same fault again.
    pub fn run(
        &mut self,
        input: &mut dyn InputSource,
        output: &mut dyn OutputSink,
    ) -> Result<(), ExecutionError> {
        while self.step(input, output)? == EngineState::Running {}

        info!(steps = self.steps, tape_cells = self.tape.len(), "program halted");
        Ok(())
    }

    /// Execute exactly one instruction and report the resulting state
    pub fn step(
        &mut self,
        input: &mut dyn InputSource,
        output: &mut dyn OutputSink,
    ) -> Result<EngineState, ExecutionError> {
        if let Some(fault) = self.fault() {
            return Err(fault.clone());
        }
        match self.state() {
            EngineState::Halted => return Ok(EngineState::Halted),
            EngineState::Idle => {
                debug!(instructions = self.program.len(), "engine running");
                self.status = Status::Running;
            }
            EngineState::Running | EngineState::Faulted => {}
        }

        let index = self.instruction_pointer;
        let Some(instruction) = self.program.get(index) else {
            self.status = Status::Halted;
            return Ok(EngineState::Halted);
        };

        if let Err(fault) = self.execute(instruction, index, input, output) {
            debug!(%fault, "engine faulted");
            self.status = Status::Faulted(fault.clone());
            return Err(fault);
        }

        self.instruction_pointer += 1;
        self.steps += 1;

        if self.instruction_pointer == self.program.len() {
            self.status = Status::Halted;
        }

        Ok(self.state())
    }

    /// Dispatch a single instruction. On error nothing has been modified.
    fn execute(
        &mut self,
        instruction: Instruction,
        index: usize,
        input: &mut dyn InputSource,
        output: &mut dyn OutputSink,
    ) -> Result<(), ExecutionError> {
        match instruction {
            Instruction::MoveRight => self
                .tape
                .move_right()
                .map_err(|fault| ExecutionError::from_tape(fault, index)),

            Instruction::MoveLeft => self
                .tape
                .move_left()
                .map_err(|fault| ExecutionError::from_tape(fault, index)),

            Instruction::Increment => {
                self.tape.increment();
                Ok(())
            }

            Instruction::Decrement => {
                self.tape.decrement();
                Ok(())
            }

            Instruction::Output => output
                .emit(char::from(self.tape.get()))
                .map_err(|e| ExecutionError::from_io(e, index)),

            Instruction::Input => {
                let ch = input
                    .read_char()
                    .map_err(|e| ExecutionError::from_io(e, index))?
                    .ok_or(ExecutionError::InputExhausted { index })?;
                let value = u8::try_from(u32::from(ch)).map_err(|_| {
                    ExecutionError::NonAsciiInput {
                        code_point: u32::from(ch),
                        index,
                    }
                })?;
                self.tape.set(value);
                Ok(())
            }

            Instruction::LoopStart => {
                if self.tape.get() == 0 {
                    self.instruction_pointer = self.jump_target(instruction, index)?;
                }
                Ok(())
            }

            Instruction::LoopEnd => {
                if self.tape.get() != 0 {
                    self.instruction_pointer = self.jump_target(instruction, index)?;
                }
                Ok(())
            }
        }
    }

    fn jump_target(&self, bracket: Instruction, index: usize) -> Result<usize, ExecutionError> {
        let target = self
            .program
            .partner(index)
            .ok_or(ExecutionError::UnmatchedBracket { bracket, index })?;
        trace!(from = index, to = target, "jump");
        Ok(target)
    }

    // ========== Getter methods for UI ==========

    pub fn state(&self) -> EngineState {
        match self.status {
            Status::Idle => EngineState::Idle,
            Status::Running => EngineState::Running,
            Status::Halted => EngineState::Halted,
            Status::Faulted(_) => EngineState::Faulted,
        }
    }

    /// The fault that ended the run, if any
    pub fn fault(&self) -> Option<&ExecutionError> {
        match &self.status {
            Status::Faulted(fault) => Some(fault),
            _ => None,
        }
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn instruction_pointer(&self) -> usize {
        self.instruction_pointer
    }

    pub fn data_pointer(&self) -> usize {
        self.tape.pointer()
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::io::ScriptedInput;

    fn engine(source: &str) -> Engine {
        Engine::new(Program::load(source).expect("program should load"))
    }

    fn run(source: &str, input: &str) -> (Engine, String, Result<(), ExecutionError>) {
        let mut engine = engine(source);
        let mut output = String::new();
        let result = engine.run(&mut ScriptedInput::new(input), &mut output);
        (engine, output, result)
    }

    #[test]
    fn starts_idle_and_halts_at_the_end() {
        let mut engine = engine("++");
        assert_eq!(engine.state(), EngineState::Idle);

        let mut input = ScriptedInput::empty();
        let mut output = String::new();
        assert_eq!(
            engine.step(&mut input, &mut output),
            Ok(EngineState::Running)
        );
        assert_eq!(engine.step(&mut input, &mut output), Ok(EngineState::Halted));
        assert_eq!(engine.tape().get(), 2);
        assert_eq!(engine.instruction_pointer(), 2);
        assert_eq!(engine.steps(), 2);
    }

    #[test]
    fn run_after_halt_is_a_no_op() {
        let (mut engine, _, result) = run("+", "");
        assert!(result.is_ok());
        let mut output = String::new();
        assert!(engine.run(&mut ScriptedInput::empty(), &mut output).is_ok());
        assert_eq!(engine.tape().get(), 1);
        assert_eq!(engine.steps(), 1);
    }

    #[test]
    fn run_after_fault_repeats_the_fault() {
        let (mut engine, _, result) = run("<", "");
        let fault = result.unwrap_err();
        assert_eq!(engine.state(), EngineState::Faulted);
        assert_eq!(engine.fault(), Some(&fault));
        let mut output = String::new();
        assert_eq!(
            engine.run(&mut ScriptedInput::empty(), &mut output),
            Err(fault)
        );
    }

    #[test]
    fn output_emits_the_cell_as_a_code_point() {
        let (_, output, result) = run("++.", "");
        assert!(result.is_ok());
        assert_eq!(output, "\u{2}");

        let (_, output, _) = run("-.", "");
        assert_eq!(output, "\u{ff}");
    }

    #[test]
    fn input_overwrites_the_current_cell() {
        let (engine, output, result) = run("+++,.", "A");
        assert!(result.is_ok());
        assert_eq!(engine.tape().get(), b'A');
        assert_eq!(output, "A");
    }

    #[test]
    fn latin1_input_fits_in_a_cell() {
        let (engine, _, result) = run(",", "ÿ");
        assert!(result.is_ok());
        assert_eq!(engine.tape().get(), 255);
    }

    #[test]
    fn wide_input_faults_and_leaves_the_cell() {
        let (engine, _, result) = run("+,", "☺");
        assert_eq!(
            result,
            Err(ExecutionError::NonAsciiInput {
                code_point: 0x263A,
                index: 1
            })
        );
        assert_eq!(engine.tape().get(), 1);
    }

    #[test]
    fn closed_input_faults() {
        let (_, _, result) = run(",", "");
        assert_eq!(result, Err(ExecutionError::InputExhausted { index: 0 }));
    }

    #[test]
    fn loop_runs_until_cell_is_zero() {
        let (engine, _, result) = run("+[-]", "");
        assert!(result.is_ok());
        assert_eq!(engine.tape().get(), 0);
        assert_eq!(engine.state(), EngineState::Halted);
        // +, [, -, ] once each
        assert_eq!(engine.steps(), 4);
    }

    #[test]
    fn zero_cell_skips_the_loop_body() {
        let (engine, output, result) = run("[.+]+", "");
        assert!(result.is_ok());
        assert_eq!(output, "");
        assert_eq!(engine.tape().get(), 1);
    }

    #[test]
    fn inner_loop_finishes_before_outer_decrement() {
        // 0:+ 1:[ 2:[ 3:+ 4:] 5:- 6:]
        let mut engine = engine("+[[+]-]");
        let mut input = ScriptedInput::empty();
        let mut output = String::new();
        let mut visited = Vec::new();

        while engine.instruction_pointer() != 5 {
            visited.push(engine.instruction_pointer());
            engine.step(&mut input, &mut output).unwrap();
            assert!(visited.len() < 1000, "outer `-` never reached");
        }

        assert_eq!(visited.last(), Some(&4));
        assert!(visited.iter().all(|&ip| ip < 5));
        assert_eq!(engine.tape().get(), 0);

        engine.step(&mut input, &mut output).unwrap();
        assert_eq!(engine.tape().get(), 255);

        // The outer `]` goes back to the outer `[`, landing on the inner one
        engine.step(&mut input, &mut output).unwrap();
        assert_eq!(engine.instruction_pointer(), 2);
    }

    #[test]
    fn nested_multiplication_loop() {
        let (engine, _, result) = run("+++++[>+++++<-]", "");
        assert!(result.is_ok());
        assert_eq!(engine.tape().cells(), &[0, 25]);
    }

    #[test]
    fn lone_open_bracket_is_unmatched() {
        let (_, _, result) = run("[", "");
        assert_eq!(
            result,
            Err(ExecutionError::UnmatchedBracket {
                bracket: Instruction::LoopStart,
                index: 0
            })
        );
    }

    #[test]
    fn stray_close_bracket_is_unmatched_only_when_taken() {
        let (_, _, result) = run("]", "");
        assert!(result.is_ok());

        let (_, _, result) = run("+]", "");
        assert_eq!(
            result,
            Err(ExecutionError::UnmatchedBracket {
                bracket: Instruction::LoopEnd,
                index: 1
            })
        );
    }

    #[test]
    fn loop_at_program_start_can_jump_back() {
        let mut engine = engine("[-]");
        engine.tape.set(3);
        let result = engine.run(&mut ScriptedInput::empty(), &mut String::new());
        assert!(result.is_ok());
        assert_eq!(engine.tape().get(), 0);
    }

    #[test]
    fn move_left_of_zero_faults() {
        let (engine, _, result) = run("><<", "");
        assert_eq!(result, Err(ExecutionError::NegativePointer { index: 2 }));
        assert_eq!(engine.data_pointer(), 0);
        assert_eq!(engine.instruction_pointer(), 2);
    }

    #[test]
    fn custom_tape_limit() {
        let mut engine = Engine::with_tape_limit(Program::load(">>>").unwrap(), 3);
        let result = engine.run(&mut ScriptedInput::empty(), &mut String::new());
        assert_eq!(
            result,
            Err(ExecutionError::MemoryLimitExceeded { limit: 3, index: 2 })
        );
        assert_eq!(engine.tape().len(), 3);
    }
}
