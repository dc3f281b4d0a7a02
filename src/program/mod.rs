//! Program loading
//!
//! This module turns raw source text into an executable [`Program`]:
//! - [`instruction`]: the closed [`Instruction`] set
//! - [`loader`]: source filtering and the [`Program`] value
//! - [`jumps`]: precomputed bracket partners
//!
//! # Source Format
//!
//! Only the eight characters `><+-.,[]` carry meaning. Every other character,
//! including whitespace and newlines, is a comment and is dropped during loading.
//!
//! Bracket balance is not checked here. An unmatched bracket faults only when the
//! engine actually needs its partner.

pub mod instruction;
pub mod jumps;
pub mod loader;

pub use instruction::Instruction;
pub use loader::{LoadError, Program, SourceLocation};
