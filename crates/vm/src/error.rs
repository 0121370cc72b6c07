//! Error types for the Neo Virtual Machine.

use thiserror::Error;

/// Errors raised while decoding or executing a script.
///
/// Any error returned from an instruction faults the engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VmError {
    #[error("stack underflow: needed {needed}, available {available}")]
    StackUnderflow { needed: usize, available: usize },

    #[error("stack overflow: limit {limit}")]
    StackOverflow { limit: usize },

    #[error("invocation stack exceeded limit {limit}")]
    InvocationDepthExceeded { limit: usize },

    #[error("invalid opcode 0x{0:02X}")]
    InvalidOpcode(u8),

    #[error("unsupported opcode {0}")]
    UnsupportedOpcode(&'static str),

    #[error("truncated {opcode} operand at position {position}")]
    TruncatedInstruction {
        opcode: &'static str,
        position: usize,
    },

    #[error("jump target {target} outside script of length {length}")]
    InvalidJump { target: i64, length: usize },

    #[error("invalid type: expected {expected}, got {actual}")]
    InvalidType {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("{slot} slot is not initialized")]
    SlotNotInitialized { slot: &'static str },

    #[error("{slot} slot index {index} out of range (size {size})")]
    SlotIndexOutOfRange {
        slot: &'static str,
        index: usize,
        size: usize,
    },

    #[error("integer exceeds {max_bytes} bytes")]
    IntegerOverflow { max_bytes: usize },

    #[error("execution aborted")]
    Abort,

    #[error("assertion failed")]
    AssertFailed,

    #[error("no script loaded")]
    NoContext,

    #[error("interop fault: {0}")]
    Interop(String),
}

impl VmError {
    pub fn underflow(needed: usize, available: usize) -> Self {
        Self::StackUnderflow { needed, available }
    }

    pub fn invalid_type(expected: &'static str, actual: &'static str) -> Self {
        Self::InvalidType { expected, actual }
    }

    pub fn interop<S: Into<String>>(message: S) -> Self {
        Self::Interop(message.into())
    }
}

pub type VmResult<T> = Result<T, VmError>;
