//! VM state implementation.

/// Indicates the status of the VM.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VMState {
    /// Indicates that the execution is in progress or has not yet begun.
    NONE = 0,

    /// Indicates that the execution has been completed successfully.
    HALT = 1 << 0,

    /// Indicates that the execution has ended, and an exception that cannot be caught is thrown.
    FAULT = 1 << 1,

    /// Indicates that a breakpoint is currently being hit.
    BREAK = 1 << 2,
}

impl VMState {
    #[inline]
    pub fn is_halt(self) -> bool {
        self == VMState::HALT
    }

    #[inline]
    pub fn is_fault(self) -> bool {
        self == VMState::FAULT
    }

    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, VMState::HALT | VMState::FAULT)
    }
}

impl std::fmt::Display for VMState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            VMState::NONE => "NONE",
            VMState::HALT => "HALT",
            VMState::FAULT => "FAULT",
            VMState::BREAK => "BREAK",
        };
        f.write_str(name)
    }
}
