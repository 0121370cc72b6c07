//! Error types for contract resolution and invocation.

use crate::nef::NefError;
use neo_core::{ContractParameterType, UInt160};
use neo_vm::{CallFlags, VmError};
use thiserror::Error;

/// Classification of runtime faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultKind {
    /// The module is malformed or references something that does not exist.
    ModuleCorruption,
    /// Flags were insufficient; the call was rejected before any side effect.
    Permission,
    /// The stack did not hold the declared number of arguments.
    Arity,
    /// The callee itself failed, including argument conversion and gas exhaustion.
    Callee,
    /// The subsystem broke one of its own guarantees.
    InvariantViolation,
}

impl std::fmt::Display for FaultKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FaultKind::ModuleCorruption => "module corruption",
            FaultKind::Permission => "permission",
            FaultKind::Arity => "arity",
            FaultKind::Callee => "callee",
            FaultKind::InvariantViolation => "invariant violation",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while resolving or invoking a method token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractError {
    #[error("token index {index} out of range (table has {len} entries)")]
    TokenIndexOutOfRange { index: usize, len: usize },

    #[error("invalid module: {0}")]
    InvalidModule(#[from] NefError),

    #[error("contract not found: {hash}")]
    ContractNotFound { hash: UInt160 },

    #[error("method {method}/{arity} not found on {contract}")]
    MethodNotFound {
        contract: String,
        method: String,
        arity: usize,
    },

    #[error("token for {method} declares has_return_value={declared}, callee returns {actual}")]
    ReturnValueMismatch {
        method: String,
        declared: bool,
        actual: ContractParameterType,
    },

    #[error("calling context flags {granted:?} do not allow CALLT")]
    CallNotAllowed { granted: CallFlags },

    #[error("permission denied for {method}: requires {required:?}, effective {effective:?}")]
    PermissionDenied {
        method: String,
        required: CallFlags,
        effective: CallFlags,
    },

    #[error("{method} expects {expected} arguments, stack holds {available}")]
    ArityFault {
        method: String,
        expected: usize,
        available: usize,
    },

    #[error("argument {index} of {method}: cannot convert {actual} to {expected}")]
    ArgumentConversion {
        method: String,
        index: usize,
        expected: ContractParameterType,
        actual: &'static str,
    },

    #[error("insufficient gas: required {required}, available {available}")]
    InsufficientGas { required: i64, available: i64 },

    #[error("{method} failed: {message}")]
    CalleeFailed { method: String, message: String },

    #[error("{method} produced {actual} return values, expected {expected}")]
    ReturnCountMismatch {
        method: String,
        expected: usize,
        actual: usize,
    },

    #[error("illegal call state transition {from} -> {to}")]
    IllegalTransition {
        from: &'static str,
        to: &'static str,
    },

    #[error("vm fault: {0}")]
    Vm(#[from] VmError),
}

impl ContractError {
    pub fn callee<M: Into<String>, S: Into<String>>(method: M, message: S) -> Self {
        Self::CalleeFailed {
            method: method.into(),
            message: message.into(),
        }
    }

    /// Classifies the error into the runtime fault taxonomy.
    pub fn kind(&self) -> FaultKind {
        match self {
            ContractError::TokenIndexOutOfRange { .. }
            | ContractError::InvalidModule(_)
            | ContractError::ContractNotFound { .. }
            | ContractError::MethodNotFound { .. }
            | ContractError::ReturnValueMismatch { .. } => FaultKind::ModuleCorruption,
            ContractError::CallNotAllowed { .. } | ContractError::PermissionDenied { .. } => {
                FaultKind::Permission
            }
            ContractError::ArityFault { .. } => FaultKind::Arity,
            ContractError::ArgumentConversion { .. }
            | ContractError::InsufficientGas { .. }
            | ContractError::CalleeFailed { .. }
            | ContractError::Vm(_) => FaultKind::Callee,
            ContractError::ReturnCountMismatch { .. } | ContractError::IllegalTransition { .. } => {
                FaultKind::InvariantViolation
            }
        }
    }

    /// Only permission faults may be retried with a different context.
    pub fn is_retriable(&self) -> bool {
        self.kind() == FaultKind::Permission
    }
}

/// Result type for contract operations.
pub type ContractResult<T> = std::result::Result<T, ContractError>;
