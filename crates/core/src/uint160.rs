//! Implementation of `UInt160`, a 160-bit unsigned integer used as a contract script hash.

use crate::error::{CoreError, CoreResult};
use neo_io::{DecodeError, NeoDecode, NeoEncode, NeoRead, NeoWrite};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The length of `UInt160` values in bytes.
pub const UINT160_SIZE: usize = 20;

/// Represents a 160-bit unsigned integer.
///
/// Bytes are stored little-endian, the order they take on the wire. The textual
/// form is `0x` followed by the big-endian hex digits.
#[derive(Clone, Copy, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct UInt160([u8; UINT160_SIZE]);

impl UInt160 {
    pub const LENGTH: usize = UINT160_SIZE;

    pub const ZERO: UInt160 = UInt160([0u8; UINT160_SIZE]);

    /// Creates a `UInt160` from little-endian bytes.
    #[inline]
    #[must_use]
    pub const fn from_le_array(bytes: [u8; UINT160_SIZE]) -> Self {
        Self(bytes)
    }

    /// Parses big-endian hex at compile time.
    ///
    /// Accepts an optional `0x` prefix. Invalid input fails const evaluation, so
    /// this is meant for well-known constants; use [`UInt160::parse`] for user input.
    #[must_use]
    pub const fn from_be_hex(s: &str) -> Self {
        let raw = s.as_bytes();
        let start = if raw.len() >= 2 && raw[0] == b'0' && (raw[1] == b'x' || raw[1] == b'X') {
            2
        } else {
            0
        };
        assert!(raw.len() - start == UINT160_SIZE * 2, "UInt160 hex must be 40 digits");

        let mut out = [0u8; UINT160_SIZE];
        let mut i = 0;
        while i < UINT160_SIZE {
            let hi = hex_nibble(raw[start + i * 2]);
            let lo = hex_nibble(raw[start + i * 2 + 1]);
            out[UINT160_SIZE - 1 - i] = (hi << 4) | lo;
            i += 1;
        }
        Self(out)
    }

    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; UINT160_SIZE]
    }

    /// Little-endian bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; UINT160_SIZE] {
        &self.0
    }

    #[inline]
    #[must_use]
    pub fn to_array(&self) -> [u8; UINT160_SIZE] {
        self.0
    }

    /// Creates a new `UInt160` from a little-endian byte slice.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidLength` if the input is not exactly 20 bytes.
    pub fn from_bytes(value: &[u8]) -> CoreResult<Self> {
        let bytes: [u8; UINT160_SIZE] =
            value.try_into().map_err(|_| CoreError::InvalidLength {
                expected: UINT160_SIZE,
                actual: value.len(),
            })?;
        Ok(Self(bytes))
    }

    /// Parses a `UInt160` from big-endian hex with an optional `0x` prefix.
    pub fn parse(s: &str) -> CoreResult<Self> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);

        if digits.len() != UINT160_SIZE * 2 {
            return Err(CoreError::invalid_format(format!(
                "expected 40 hex digits, got {}",
                digits.len()
            )));
        }

        let mut bytes = hex::decode(digits).map_err(|e| CoreError::invalid_format(e.to_string()))?;
        bytes.reverse();
        Self::from_bytes(&bytes)
    }

    /// Converts the `UInt160` to its `0x`-prefixed big-endian hex string.
    #[must_use]
    pub fn to_hex_string(&self) -> String {
        let mut bytes = self.0;
        bytes.reverse();
        format!("0x{}", hex::encode(bytes))
    }
}

const fn hex_nibble(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => panic!("invalid hex digit in UInt160 literal"),
    }
}

impl FromStr for UInt160 {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for UInt160 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex_string())
    }
}

impl fmt::Debug for UInt160 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UInt160({})", self.to_hex_string())
    }
}

impl From<[u8; UINT160_SIZE]> for UInt160 {
    fn from(data: [u8; UINT160_SIZE]) -> Self {
        Self(data)
    }
}

impl AsRef<[u8]> for UInt160 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for UInt160 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex_string())
    }
}

impl<'de> Deserialize<'de> for UInt160 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

impl NeoEncode for UInt160 {
    #[inline]
    fn neo_encode<W: NeoWrite>(&self, writer: &mut W) {
        writer.write_bytes(&self.0);
    }
}

impl NeoDecode for UInt160 {
    #[inline]
    fn neo_decode<R: NeoRead>(reader: &mut R) -> Result<Self, DecodeError> {
        let mut buf = [0u8; UINT160_SIZE];
        reader.read_into(&mut buf)?;
        Ok(Self(buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAS: &str = "0xd2a4cff31913016155e38e474a2c06d08be276cf";

    #[test]
    fn const_and_runtime_parse_agree() {
        const HASH: UInt160 = UInt160::from_be_hex(GAS);
        assert_eq!(HASH, UInt160::parse(GAS).unwrap());
        assert_eq!(HASH.to_string(), GAS);
        // little-endian storage: last display byte first
        assert_eq!(HASH.as_bytes()[0], 0xcf);
        assert_eq!(HASH.as_bytes()[19], 0xd2);
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(UInt160::parse("0x1234").is_err());
        assert!(UInt160::parse(&"zz".repeat(20)).is_err());
        assert!(UInt160::from_bytes(&[0u8; 19]).is_err());
    }

    #[test]
    fn serde_uses_hex_string() {
        let hash = UInt160::parse(GAS).unwrap();
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, format!("\"{GAS}\""));
        let back: UInt160 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, hash);
    }

    #[test]
    fn wire_form_is_little_endian() {
        let hash = UInt160::parse(GAS).unwrap();
        let bytes = hash.to_vec();
        assert_eq!(bytes.len(), UINT160_SIZE);
        assert_eq!(&bytes[..], hash.as_bytes());
        assert_eq!(UInt160::from_slice(&bytes).unwrap(), hash);
        assert!(UInt160::ZERO.is_zero());
    }
}
