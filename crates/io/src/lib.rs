//! # Neo IO
//!
//! Binary wire format used by Neo modules: little-endian fixed-width integers,
//! variable-length integers, length-prefixed byte strings and the hashing
//! helpers the NEF checksum is built on.
//!
//! ```rust
//! use neo_io::{NeoDecode, NeoEncode, SliceReader};
//!
//! let bytes = "transfer".to_vec();
//! let mut reader = SliceReader::new(&bytes);
//! assert_eq!(String::neo_decode(&mut reader).unwrap(), "transfer");
//! ```

mod error;
mod hash;
mod primitives;
mod reader;
mod traits;
mod varint;


pub use error::{DecodeError, DecodeResult};
pub use hash::{checksum, hash256, sha256};
pub use primitives::{read_fixed_string, read_limited_string, write_fixed_string};
pub use reader::SliceReader;
pub use traits::{NeoDecode, NeoEncode, NeoRead, NeoWrite};
pub use varint::{read_varint, var_size, write_varint};
