// Constants for the interpreter

/// Maximum number of tape cells; the data pointer may never reach this index
pub const TAPE_LIMIT: usize = 30_000;

/// Default memory budget for recorded debugger history (256 MiB)
pub const DEFAULT_HISTORY_LIMIT: usize = 256 * 1024 * 1024;
