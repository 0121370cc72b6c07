//! NEF3 executable module format.
//!
//! Layout (all integers little-endian):
//!
//! | field    | encoding                                  |
//! |----------|-------------------------------------------|
//! | magic    | `u32` `0x3346454E` ("NEF3")               |
//! | compiler | 64 bytes, zero padded                     |
//! | source   | var-string, at most 255 bytes             |
//! | reserved | `u8`, zero                                |
//! | tokens   | var-int count followed by [`MethodToken`] |
//! | reserved | `u16`, zero                               |
//! | script   | var-bytes, non-empty                      |
//! | checksum | `u32`, first 4 bytes of hash256           |

mod codec;
mod error;
mod file;
mod json;
mod method_token;

pub use error::NefError;
pub use file::NefFile;
pub use method_token::MethodToken;

pub const NEF_MAGIC: u32 = 0x3346_454E;
pub const COMPILER_FIELD_SIZE: usize = 64;
pub const METHOD_NAME_MAX: usize = 32;
/// Exclusive bound on the source URL length.
pub const SOURCE_URL_MAX: usize = 256;
pub const TOKENS_MAX: usize = 128;
pub const MAX_SCRIPT_SIZE: usize = 1_048_576;
