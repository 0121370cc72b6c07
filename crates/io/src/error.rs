use thiserror::Error;

/// Failures raised while decoding the Neo binary format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unexpected end of input: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },

    #[error("non-canonical var-int with tag 0x{0:02X}")]
    InvalidVarIntTag(u8),

    #[error("length {len} out of range (max {max})")]
    LengthOutOfRange { len: u64, max: u64 },

    #[error("invalid value for {0}")]
    InvalidValue(&'static str),

    #[error("invalid utf-8 in {0}")]
    InvalidUtf8(&'static str),

    #[error("{0} trailing bytes after payload")]
    TrailingBytes(usize),
}

pub type DecodeResult<T> = Result<T, DecodeError>;
