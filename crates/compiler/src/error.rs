use neo_core::ContractParameterType;
use neo_smart_contract::NefError;
use thiserror::Error;

/// Compile-time failures. Any of these aborts compilation; no module is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("{target}: {detail}")]
    SignatureMismatch { target: String, detail: String },

    #[error("unknown native interface {0:?}")]
    UnknownInterface(String),

    #[error("{interface} has no method {method:?}")]
    UnknownNativeMethod { interface: String, method: String },

    #[error("token table has {count} entries, the module format allows {max}")]
    TableOverflow { count: usize, max: usize },

    #[error("call to undefined method {0:?}")]
    UnknownMethod(String),

    #[error("method {0:?} is defined more than once")]
    DuplicateMethod(String),

    #[error("{callee} returns nothing but its result is used in {method}")]
    VoidValue { method: String, callee: String },

    #[error("{method} has no parameter named {name:?}")]
    UnknownArgument { method: String, name: String },

    #[error("{method} has {count} parameters, at most 255 are supported")]
    TooManyParameters { method: String, count: usize },

    #[error("{method} must return {expected}, found {found}")]
    ReturnMismatch {
        method: String,
        expected: ContractParameterType,
        found: String,
    },

    #[error("script too large to address local call at {position}")]
    OffsetOverflow { position: usize },

    #[error("invalid module: {0}")]
    Module(#[from] NefError),
}

pub type CompileResult<T> = std::result::Result<T, CompileError>;
