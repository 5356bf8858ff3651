//! Errors and diagnostics.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything the core can report.
///
/// `UnknownOpcode` is advisory: the run loop skips the byte and carries on,
/// handing the error to the diagnostic hook instead of returning it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("program is {len} bytes but only {capacity} fit at the load address")]
    ProgramTooLarge { len: usize, capacity: usize },

    #[error("unknown opcode ${opcode:02X} at ${address:04X}")]
    UnknownOpcode { opcode: u8, address: u16 },

    #[error("no BRK within {limit} instructions")]
    StepLimitExceeded { limit: u64 },
}

impl Error {
    /// True for conditions that do not stop execution.
    #[must_use]
    pub const fn is_advisory(&self) -> bool {
        matches!(self, Error::UnknownOpcode { .. })
    }
}
