//! ContractParameterType, the type vocabulary of contract method signatures.

use crate::error::CoreError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// Represents the type of a contract method parameter or return value.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContractParameterType {
    /// Indicates that the parameter can be of any type
    #[default]
    Any = 0x00,

    Boolean = 0x10,

    Integer = 0x11,

    ByteArray = 0x12,

    String = 0x13,

    Hash160 = 0x14,

    Hash256 = 0x15,

    PublicKey = 0x16,

    Signature = 0x17,

    Array = 0x20,

    Map = 0x22,

    InteropInterface = 0x30,

    /// It can be only used as the return type of a method, meaning that the method has no return value
    Void = 0xff,
}

impl ContractParameterType {
    /// Returns the canonical manifest name for this parameter type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractParameterType::Any => "Any",
            ContractParameterType::Boolean => "Boolean",
            ContractParameterType::Integer => "Integer",
            ContractParameterType::ByteArray => "ByteArray",
            ContractParameterType::String => "String",
            ContractParameterType::Hash160 => "Hash160",
            ContractParameterType::Hash256 => "Hash256",
            ContractParameterType::PublicKey => "PublicKey",
            ContractParameterType::Signature => "Signature",
            ContractParameterType::Array => "Array",
            ContractParameterType::Map => "Map",
            ContractParameterType::InteropInterface => "InteropInterface",
            ContractParameterType::Void => "Void",
        }
    }

    pub fn try_from_u8(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(ContractParameterType::Any),
            0x10 => Some(ContractParameterType::Boolean),
            0x11 => Some(ContractParameterType::Integer),
            0x12 => Some(ContractParameterType::ByteArray),
            0x13 => Some(ContractParameterType::String),
            0x14 => Some(ContractParameterType::Hash160),
            0x15 => Some(ContractParameterType::Hash256),
            0x16 => Some(ContractParameterType::PublicKey),
            0x17 => Some(ContractParameterType::Signature),
            0x20 => Some(ContractParameterType::Array),
            0x22 => Some(ContractParameterType::Map),
            0x30 => Some(ContractParameterType::InteropInterface),
            0xff => Some(ContractParameterType::Void),
            _ => None,
        }
    }

    /// Primitive types cannot hold `null`.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            ContractParameterType::Boolean | ContractParameterType::Integer
        )
    }

    /// Whether a value of type `value` may be passed where `self` is expected.
    ///
    /// Equal types match, `Any` matches in both directions and `Void` is
    /// never a value.
    pub fn accepts(&self, value: ContractParameterType) -> bool {
        if value == ContractParameterType::Void || *self == ContractParameterType::Void {
            return false;
        }
        *self == value || *self == ContractParameterType::Any || value == ContractParameterType::Any
    }
}

impl std::fmt::Display for ContractParameterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContractParameterType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "any" => Ok(ContractParameterType::Any),
            "boolean" | "bool" => Ok(ContractParameterType::Boolean),
            "integer" | "int" => Ok(ContractParameterType::Integer),
            "bytearray" | "bytes" => Ok(ContractParameterType::ByteArray),
            "string" => Ok(ContractParameterType::String),
            "hash160" => Ok(ContractParameterType::Hash160),
            "hash256" => Ok(ContractParameterType::Hash256),
            "publickey" => Ok(ContractParameterType::PublicKey),
            "signature" => Ok(ContractParameterType::Signature),
            "array" => Ok(ContractParameterType::Array),
            "map" => Ok(ContractParameterType::Map),
            "interopinterface" => Ok(ContractParameterType::InteropInterface),
            "void" => Ok(ContractParameterType::Void),
            _ => Err(CoreError::UnknownParameterType(s.to_string())),
        }
    }
}

impl Serialize for ContractParameterType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ContractParameterType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_values_match_manifest_encoding() {
        assert_eq!(ContractParameterType::Hash160 as u8, 0x14);
        assert_eq!(
            ContractParameterType::try_from_u8(0x22),
            Some(ContractParameterType::Map)
        );
        assert_eq!(ContractParameterType::try_from_u8(0x01), None);
    }

    #[test]
    fn assignability() {
        use ContractParameterType::*;
        assert!(Integer.accepts(Integer));
        assert!(Any.accepts(Hash160));
        assert!(String.accepts(Any));
        assert!(!Integer.accepts(String));
        assert!(!Any.accepts(Void));
    }

    #[test]
    fn names_parse_case_insensitively() {
        assert_eq!(
            "hash160".parse::<ContractParameterType>().unwrap(),
            ContractParameterType::Hash160
        );
        assert!("float".parse::<ContractParameterType>().is_err());
        let json = serde_json::to_string(&ContractParameterType::ByteArray).unwrap();
        assert_eq!(json, "\"ByteArray\"");
    }
}
