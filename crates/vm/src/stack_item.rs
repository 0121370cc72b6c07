//! Stack item implementation for the Neo Virtual Machine.

use crate::error::{VmError, VmResult};
use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};
use std::fmt;

/// Largest integer size in bytes the VM accepts.
pub const MAX_INTEGER_SIZE: usize = 32;

/// Type tag of a stack item.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackItemType {
    Any = 0x00,
    Pointer = 0x10,
    Boolean = 0x20,
    Integer = 0x21,
    ByteString = 0x28,
    Buffer = 0x30,
    Array = 0x40,
    Struct = 0x41,
    Map = 0x48,
    InteropInterface = 0x60,
}

impl StackItemType {
    pub fn name(self) -> &'static str {
        match self {
            StackItemType::Any => "Any",
            StackItemType::Pointer => "Pointer",
            StackItemType::Boolean => "Boolean",
            StackItemType::Integer => "Integer",
            StackItemType::ByteString => "ByteString",
            StackItemType::Buffer => "Buffer",
            StackItemType::Array => "Array",
            StackItemType::Struct => "Struct",
            StackItemType::Map => "Map",
            StackItemType::InteropInterface => "InteropInterface",
        }
    }
}

/// Represents a value in the Neo VM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackItem {
    Null,
    Boolean(bool),
    Integer(BigInt),
    /// Immutable byte string.
    ByteString(Vec<u8>),
    /// Mutable byte buffer.
    Buffer(Vec<u8>),
    Array(Vec<StackItem>),
    Struct(Vec<StackItem>),
}

impl StackItem {
    #[inline]
    pub fn null() -> Self {
        StackItem::Null
    }

    #[inline]
    pub fn from_bool(value: bool) -> Self {
        StackItem::Boolean(value)
    }

    #[inline]
    pub fn from_int<T: Into<BigInt>>(value: T) -> Self {
        StackItem::Integer(value.into())
    }

    #[inline]
    pub fn from_byte_string<T: Into<Vec<u8>>>(value: T) -> Self {
        StackItem::ByteString(value.into())
    }

    #[inline]
    pub fn from_array<T: Into<Vec<StackItem>>>(value: T) -> Self {
        StackItem::Array(value.into())
    }

    pub fn stack_item_type(&self) -> StackItemType {
        match self {
            StackItem::Null => StackItemType::Any,
            StackItem::Boolean(_) => StackItemType::Boolean,
            StackItem::Integer(_) => StackItemType::Integer,
            StackItem::ByteString(_) => StackItemType::ByteString,
            StackItem::Buffer(_) => StackItemType::Buffer,
            StackItem::Array(_) => StackItemType::Array,
            StackItem::Struct(_) => StackItemType::Struct,
        }
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.stack_item_type().name()
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, StackItem::Null)
    }

    /// Converts the stack item to a boolean.
    pub fn as_bool(&self) -> VmResult<bool> {
        match self {
            StackItem::Null => Ok(false),
            StackItem::Boolean(b) => Ok(*b),
            StackItem::Integer(i) => Ok(!i.is_zero()),
            StackItem::ByteString(b) | StackItem::Buffer(b) => {
                if b.len() > MAX_INTEGER_SIZE {
                    return Err(VmError::invalid_type("Boolean", self.type_name()));
                }
                Ok(b.iter().any(|&byte| byte != 0))
            }
            StackItem::Array(_) | StackItem::Struct(_) => Ok(true),
        }
    }

    /// Converts the stack item to an integer.
    ///
    /// Byte strings are read as two's-complement little-endian.
    pub fn as_int(&self) -> VmResult<BigInt> {
        match self {
            StackItem::Boolean(b) => Ok(BigInt::from(u8::from(*b))),
            StackItem::Integer(i) => Ok(i.clone()),
            StackItem::ByteString(b) | StackItem::Buffer(b) => {
                if b.len() > MAX_INTEGER_SIZE {
                    return Err(VmError::IntegerOverflow {
                        max_bytes: MAX_INTEGER_SIZE,
                    });
                }
                Ok(BigInt::from_signed_bytes_le(b))
            }
            _ => Err(VmError::invalid_type("Integer", self.type_name())),
        }
    }

    /// Converts to `i64`, failing for values out of range.
    pub fn as_i64(&self) -> VmResult<i64> {
        self.as_int()?
            .to_i64()
            .ok_or(VmError::IntegerOverflow { max_bytes: 8 })
    }

    /// Converts the stack item to a byte array.
    pub fn as_bytes(&self) -> VmResult<Vec<u8>> {
        match self {
            StackItem::Boolean(b) => Ok(vec![u8::from(*b)]),
            StackItem::Integer(i) => {
                if i.is_zero() {
                    Ok(Vec::new())
                } else {
                    Ok(i.to_signed_bytes_le())
                }
            }
            StackItem::ByteString(b) | StackItem::Buffer(b) => Ok(b.clone()),
            _ => Err(VmError::invalid_type("ByteString", self.type_name())),
        }
    }

    pub fn as_array(&self) -> VmResult<&[StackItem]> {
        match self {
            StackItem::Array(a) | StackItem::Struct(a) => Ok(a),
            _ => Err(VmError::invalid_type("Array", self.type_name())),
        }
    }
}

impl From<bool> for StackItem {
    fn from(value: bool) -> Self {
        StackItem::Boolean(value)
    }
}

impl From<i64> for StackItem {
    fn from(value: i64) -> Self {
        StackItem::Integer(BigInt::from(value))
    }
}

impl From<BigInt> for StackItem {
    fn from(value: BigInt) -> Self {
        StackItem::Integer(value)
    }
}

impl From<&str> for StackItem {
    fn from(value: &str) -> Self {
        StackItem::ByteString(value.as_bytes().to_vec())
    }
}

impl From<Vec<u8>> for StackItem {
    fn from(value: Vec<u8>) -> Self {
        StackItem::ByteString(value)
    }
}

impl fmt::Display for StackItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackItem::Null => f.write_str("null"),
            StackItem::Boolean(b) => write!(f, "{b}"),
            StackItem::Integer(i) => write!(f, "{i}"),
            StackItem::ByteString(b) | StackItem::Buffer(b) => {
                f.write_str("0x")?;
                for byte in b {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
            StackItem::Array(items) | StackItem::Struct(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_byte_conversions_are_twos_complement() {
        for value in [-129i64, -1, 0, 1, 127, 128, 255, 65_536, i64::MIN] {
            let item = StackItem::from(value);
            let bytes = item.as_bytes().unwrap();
            let back = StackItem::ByteString(bytes).as_int().unwrap();
            assert_eq!(back, BigInt::from(value));
        }
        assert_eq!(StackItem::from(-1i64).as_bytes().unwrap(), vec![0xff]);
        assert_eq!(StackItem::from(128i64).as_bytes().unwrap(), vec![0x80, 0x00]);
    }

    #[test]
    fn truthiness() {
        assert!(!StackItem::Null.as_bool().unwrap());
        assert!(!StackItem::ByteString(vec![0, 0]).as_bool().unwrap());
        assert!(StackItem::ByteString(vec![0, 1]).as_bool().unwrap());
        assert!(StackItem::Array(vec![]).as_bool().unwrap());
    }

    #[test]
    fn null_is_not_an_integer() {
        assert_eq!(
            StackItem::Null.as_int(),
            Err(VmError::invalid_type("Integer", "Any"))
        );
    }
}
