use neo_core::UInt160;
use neo_io::{read_limited_string, DecodeError, NeoDecode, NeoEncode, NeoRead, NeoWrite};
use neo_vm::CallFlags;
use serde::{Deserialize, Serialize};

use super::{NefError, METHOD_NAME_MAX};

/// One entry of a module's token table: a statically bound reference to a
/// method of another contract, invoked through `CALLT`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodToken {
    pub hash: UInt160,
    pub method: String,
    #[serde(rename = "paramcount")]
    pub parameters_count: u16,
    #[serde(rename = "hasreturnvalue")]
    pub has_return_value: bool,
    #[serde(rename = "callflags")]
    pub call_flags: CallFlags,
}

impl MethodToken {
    pub fn new(
        hash: UInt160,
        method: impl Into<String>,
        parameters_count: u16,
        has_return_value: bool,
        call_flags: CallFlags,
    ) -> Result<Self, NefError> {
        let method = method.into();
        validate_method_name(&method)?;
        Ok(Self {
            hash,
            method,
            parameters_count,
            has_return_value,
            call_flags,
        })
    }

    /// Checks the invariants the decoder enforces on every entry.
    pub fn validate(&self) -> Result<(), NefError> {
        validate_method_name(&self.method)
    }
}

pub(crate) fn validate_method_name(name: &str) -> Result<(), NefError> {
    let reason = if name.is_empty() {
        "empty"
    } else if name.len() > METHOD_NAME_MAX {
        "longer than 32 bytes"
    } else if name.starts_with('_') {
        "starts with '_'"
    } else {
        return Ok(());
    };
    Err(NefError::InvalidMethodName {
        name: name.to_string(),
        reason,
    })
}

impl std::fmt::Display for MethodToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{}/{} flags={} returns={}",
            self.hash,
            self.method,
            self.parameters_count,
            self.call_flags.describe(),
            self.has_return_value
        )
    }
}

impl NeoEncode for MethodToken {
    fn neo_encode<W: NeoWrite>(&self, writer: &mut W) {
        self.hash.neo_encode(writer);
        writer.write_var_bytes(self.method.as_bytes());
        writer.write_u16(self.parameters_count);
        self.has_return_value.neo_encode(writer);
        writer.write_u8(self.call_flags.bits());
    }
}

impl NeoDecode for MethodToken {
    fn neo_decode<R: NeoRead>(reader: &mut R) -> Result<Self, DecodeError> {
        let hash = UInt160::neo_decode(reader)?;
        let method = read_limited_string(reader, METHOD_NAME_MAX, "MethodToken.method")?;
        if validate_method_name(&method).is_err() {
            return Err(DecodeError::InvalidValue("MethodToken.method"));
        }
        let parameters_count = reader.read_u16()?;
        let has_return_value = bool::neo_decode(reader)?;
        let call_flags = CallFlags::from_byte(reader.read_u8()?)
            .ok_or(DecodeError::InvalidValue("MethodToken.callflags"))?;
        Ok(Self {
            hash,
            method,
            parameters_count,
            has_return_value,
            call_flags,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MethodToken {
        MethodToken::new(
            UInt160::from_le_array([0x11; 20]),
            "balanceOf",
            1,
            true,
            CallFlags::READ_ONLY,
        )
        .unwrap()
    }

    #[test]
    fn record_layout() {
        let bytes = sample().to_vec();
        assert_eq!(&bytes[..20], &[0x11; 20]);
        assert_eq!(bytes[20], 9);
        assert_eq!(&bytes[21..30], b"balanceOf");
        assert_eq!(&bytes[30..32], &[1, 0]);
        assert_eq!(bytes[32], 1);
        assert_eq!(bytes[33], 0x05);
        assert_eq!(bytes.len(), 34);
        assert_eq!(MethodToken::from_slice(&bytes).unwrap(), sample());
    }

    #[test]
    fn rejects_bad_names() {
        let hash = UInt160::ZERO;
        assert!(MethodToken::new(hash, "", 0, false, CallFlags::NONE).is_err());
        assert!(MethodToken::new(hash, "_deploy", 0, false, CallFlags::NONE).is_err());
        assert!(MethodToken::new(hash, "a".repeat(33), 0, false, CallFlags::NONE).is_err());
        assert!(MethodToken::new(hash, "a".repeat(32), 0, false, CallFlags::NONE).is_ok());
    }

    #[test]
    fn rejects_bad_flag_and_bool_bytes() {
        let mut bytes = sample().to_vec();
        bytes[33] = 0x10;
        assert_eq!(
            MethodToken::from_slice(&bytes),
            Err(DecodeError::InvalidValue("MethodToken.callflags"))
        );

        let mut bytes = sample().to_vec();
        bytes[32] = 2;
        assert!(MethodToken::from_slice(&bytes).is_err());
    }

    #[test]
    fn json_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["method"], "balanceOf");
        assert_eq!(json["paramcount"], 1);
        assert_eq!(json["hasreturnvalue"], true);
        assert_eq!(json["callflags"], 5);
        let back: MethodToken = serde_json::from_value(json).unwrap();
        assert_eq!(back, sample());
    }
}
