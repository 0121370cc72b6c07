use neo_io::DecodeError;
use thiserror::Error;

/// Failures raised while building, encoding or decoding a NEF module.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NefError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("bad magic 0x{0:08X}")]
    InvalidMagic(u32),

    #[error("compiler name is {len} bytes, limit is {max}")]
    CompilerTooLong { len: usize, max: usize },

    #[error("source url is {len} bytes, must be below {max}")]
    SourceTooLong { len: usize, max: usize },

    #[error("token table has {count} entries, limit is {max}")]
    TooManyTokens { count: usize, max: usize },

    #[error("invalid method name {name:?}: {reason}")]
    InvalidMethodName { name: String, reason: &'static str },

    #[error("script is empty")]
    EmptyScript,

    #[error("script is {len} bytes, limit is {max}")]
    ScriptTooLarge { len: usize, max: usize },

    #[error("reserved field {0} is not zero")]
    ReservedNotZero(&'static str),

    #[error("checksum mismatch: stored {stored:#010x}, computed {computed:#010x}")]
    ChecksumMismatch { stored: u32, computed: u32 },
}
