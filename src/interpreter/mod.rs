//! Interpreter execution engine
//!
//! This module provides the core execution logic:
//! - [`engine`]: the fetch-execute loop and instruction dispatch
//! - [`errors`]: runtime error types
//! - [`io`]: the output and input capabilities the engine calls for `.` and `,`
//! - [`timeline`]: recorded execution history for the time-travel debugger
//! - [`dump`]: plain-text state dump
//!
//! # Execution Model
//!
//! The engine executes one instruction per step, advancing the instruction pointer by
//! one after every instruction. A taken bracket first moves the pointer onto its
//! partner, so the advance lands just past it.
//!
//! ```text
//! Idle → Running → Halted
//!                ↘ Faulted
//! ```

pub mod constants;
pub mod dump;
pub mod engine;
pub mod errors;
pub mod io;
pub mod timeline;
