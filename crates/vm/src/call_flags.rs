//! Call flags for the Neo Virtual Machine.
//!
//! Call flags bound what a called contract may do: read or write state,
//! call further contracts and emit notifications.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags! {
    /// Flags that control what operations a contract can perform.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
    pub struct CallFlags: u8 {
        const NONE = 0;
        const READ_STATES = 0b0000_0001;
        const WRITE_STATES = 0b0000_0010;
        const ALLOW_CALL = 0b0000_0100;
        const ALLOW_NOTIFY = 0b0000_1000;
        const STATES = Self::READ_STATES.bits() | Self::WRITE_STATES.bits();
        const READ_ONLY = Self::READ_STATES.bits() | Self::ALLOW_CALL.bits();
        const ALL = Self::STATES.bits() | Self::ALLOW_CALL.bits() | Self::ALLOW_NOTIFY.bits();
    }
}

impl CallFlags {
    /// Checks if all bits of `flag` are set.
    #[inline]
    pub fn has_flag(&self, flag: Self) -> bool {
        self.contains(flag)
    }

    /// Converts a raw byte, rejecting bits outside [`CallFlags::ALL`].
    #[inline]
    pub fn from_byte(bits: u8) -> Option<Self> {
        Self::from_bits(bits)
    }

    /// Flag names joined with `", "`; `"None"` when empty.
    pub fn describe(&self) -> String {
        if self.is_empty() {
            return "None".to_string();
        }
        if *self == Self::ALL {
            return "All".to_string();
        }
        let mut parts = Vec::new();
        for (flag, name) in [
            (Self::READ_STATES, "ReadStates"),
            (Self::WRITE_STATES, "WriteStates"),
            (Self::ALLOW_CALL, "AllowCall"),
            (Self::ALLOW_NOTIFY, "AllowNotify"),
        ] {
            if self.contains(flag) {
                parts.push(name);
            }
        }
        parts.join(", ")
    }
}

impl Serialize for CallFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bits())
    }
}

impl<'de> Deserialize<'de> for CallFlags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits = u8::deserialize(deserializer)?;
        Self::from_byte(bits)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid call flags 0x{bits:02X}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_flags() {
        assert_eq!(CallFlags::NONE.bits(), 0);
        assert_eq!(CallFlags::READ_STATES.bits(), 0x01);
        assert_eq!(CallFlags::WRITE_STATES.bits(), 0x02);
        assert_eq!(CallFlags::ALLOW_CALL.bits(), 0x04);
        assert_eq!(CallFlags::ALLOW_NOTIFY.bits(), 0x08);
        assert_eq!(CallFlags::STATES.bits(), 0x03);
        assert_eq!(CallFlags::READ_ONLY.bits(), 0x05);
        assert_eq!(CallFlags::ALL.bits(), 0x0F);
    }

    #[test]
    fn test_has_flag() {
        assert!(CallFlags::ALL.has_flag(CallFlags::STATES));
        assert!(CallFlags::READ_ONLY.has_flag(CallFlags::ALLOW_CALL));
        assert!(!CallFlags::READ_ONLY.has_flag(CallFlags::WRITE_STATES));
        assert!(!CallFlags::NONE.has_flag(CallFlags::READ_STATES));
        assert!(CallFlags::NONE.has_flag(CallFlags::NONE));
    }

    #[test]
    fn test_from_byte_rejects_unknown_bits() {
        assert_eq!(CallFlags::from_byte(0x0F), Some(CallFlags::ALL));
        assert_eq!(CallFlags::from_byte(0x10), None);
        assert_eq!(CallFlags::from_byte(0x85), None);
    }

    #[test]
    fn test_describe_and_serde() {
        assert_eq!(CallFlags::READ_ONLY.describe(), "ReadStates, AllowCall");
        assert_eq!(CallFlags::ALL.describe(), "All");
        assert_eq!(serde_json::to_string(&CallFlags::STATES).unwrap(), "3");
        assert!(serde_json::from_str::<CallFlags>("16").is_err());
    }
}
