//! Opcode table for the Neo N3 virtual machine.

use std::fmt;

/// Describes how the operand following an opcode is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandSize {
    /// Operand of a fixed number of bytes (zero for none).
    Fixed(usize),
    /// Little-endian length prefix of this many bytes, followed by that many bytes.
    Prefix(usize),
}

macro_rules! opcodes {
    ($($name:ident = $value:literal),* $(,)?) => {
        /// Represents an opcode in the Neo VM.
        #[allow(non_camel_case_types)]
        #[repr(u8)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum OpCode {
            $($name = $value),*
        }

        impl OpCode {
            /// Converts a raw byte, returning `None` for unassigned values.
            pub fn from_u8(value: u8) -> Option<Self> {
                match value {
                    $($value => Some(OpCode::$name),)*
                    _ => None,
                }
            }

            /// Mnemonic as printed by disassemblers.
            pub fn name(self) -> &'static str {
                match self {
                    $(OpCode::$name => stringify!($name),)*
                }
            }
        }
    };
}

opcodes! {
    // Constants
    PUSHINT8 = 0x00,
    PUSHINT16 = 0x01,
    PUSHINT32 = 0x02,
    PUSHINT64 = 0x03,
    PUSHINT128 = 0x04,
    PUSHINT256 = 0x05,
    PUSHT = 0x08,
    PUSHF = 0x09,
    PUSHA = 0x0A,
    PUSHNULL = 0x0B,
    PUSHDATA1 = 0x0C,
    PUSHDATA2 = 0x0D,
    PUSHDATA4 = 0x0E,
    PUSHM1 = 0x0F,
    PUSH0 = 0x10,
    PUSH1 = 0x11,
    PUSH2 = 0x12,
    PUSH3 = 0x13,
    PUSH4 = 0x14,
    PUSH5 = 0x15,
    PUSH6 = 0x16,
    PUSH7 = 0x17,
    PUSH8 = 0x18,
    PUSH9 = 0x19,
    PUSH10 = 0x1A,
    PUSH11 = 0x1B,
    PUSH12 = 0x1C,
    PUSH13 = 0x1D,
    PUSH14 = 0x1E,
    PUSH15 = 0x1F,
    PUSH16 = 0x20,

    // Flow control
    NOP = 0x21,
    JMP = 0x22,
    JMP_L = 0x23,
    JMPIF = 0x24,
    JMPIF_L = 0x25,
    JMPIFNOT = 0x26,
    JMPIFNOT_L = 0x27,
    JMPEQ = 0x28,
    JMPEQ_L = 0x29,
    JMPNE = 0x2A,
    JMPNE_L = 0x2B,
    JMPGT = 0x2C,
    JMPGT_L = 0x2D,
    JMPGE = 0x2E,
    JMPGE_L = 0x2F,
    JMPLT = 0x30,
    JMPLT_L = 0x31,
    JMPLE = 0x32,
    JMPLE_L = 0x33,
    CALL = 0x34,
    CALL_L = 0x35,
    CALLA = 0x36,
    CALLT = 0x37,
    ABORT = 0x38,
    ASSERT = 0x39,
    THROW = 0x3A,
    TRY = 0x3B,
    TRY_L = 0x3C,
    ENDTRY = 0x3D,
    ENDTRY_L = 0x3E,
    ENDFINALLY = 0x3F,
    RET = 0x40,
    SYSCALL = 0x41,

    // Stack
    DEPTH = 0x43,
    DROP = 0x45,
    NIP = 0x46,
    XDROP = 0x48,
    CLEAR = 0x49,
    DUP = 0x4A,
    OVER = 0x4B,
    PICK = 0x4D,
    TUCK = 0x4E,
    SWAP = 0x50,
    ROT = 0x51,
    ROLL = 0x52,
    REVERSE3 = 0x53,
    REVERSE4 = 0x54,
    REVERSEN = 0x55,

    // Slot
    INITSSLOT = 0x56,
    INITSLOT = 0x57,
    LDSFLD0 = 0x58,
    LDSFLD1 = 0x59,
    LDSFLD2 = 0x5A,
    LDSFLD3 = 0x5B,
    LDSFLD4 = 0x5C,
    LDSFLD5 = 0x5D,
    LDSFLD6 = 0x5E,
    LDSFLD = 0x5F,
    STSFLD0 = 0x60,
    STSFLD1 = 0x61,
    STSFLD2 = 0x62,
    STSFLD3 = 0x63,
    STSFLD4 = 0x64,
    STSFLD5 = 0x65,
    STSFLD6 = 0x66,
    STSFLD = 0x67,
    LDLOC0 = 0x68,
    LDLOC1 = 0x69,
    LDLOC2 = 0x6A,
    LDLOC3 = 0x6B,
    LDLOC4 = 0x6C,
    LDLOC5 = 0x6D,
    LDLOC6 = 0x6E,
    LDLOC = 0x6F,
    STLOC0 = 0x70,
    STLOC1 = 0x71,
    STLOC2 = 0x72,
    STLOC3 = 0x73,
    STLOC4 = 0x74,
    STLOC5 = 0x75,
    STLOC6 = 0x76,
    STLOC = 0x77,
    LDARG0 = 0x78,
    LDARG1 = 0x79,
    LDARG2 = 0x7A,
    LDARG3 = 0x7B,
    LDARG4 = 0x7C,
    LDARG5 = 0x7D,
    LDARG6 = 0x7E,
    LDARG = 0x7F,
    STARG0 = 0x80,
    STARG1 = 0x81,
    STARG2 = 0x82,
    STARG3 = 0x83,
    STARG4 = 0x84,
    STARG5 = 0x85,
    STARG6 = 0x86,
    STARG = 0x87,

    // Splice
    NEWBUFFER = 0x88,
    MEMCPY = 0x89,
    CAT = 0x8B,
    SUBSTR = 0x8C,
    LEFT = 0x8D,
    RIGHT = 0x8E,

    // Bitwise logic
    INVERT = 0x90,
    AND = 0x91,
    OR = 0x92,
    XOR = 0x93,
    EQUAL = 0x97,
    NOTEQUAL = 0x98,

    // Arithmetic
    SIGN = 0x99,
    ABS = 0x9A,
    NEGATE = 0x9B,
    INC = 0x9C,
    DEC = 0x9D,
    ADD = 0x9E,
    SUB = 0x9F,
    MUL = 0xA0,
    DIV = 0xA1,
    MOD = 0xA2,
    POW = 0xA3,
    SQRT = 0xA4,
    MODMUL = 0xA5,
    MODPOW = 0xA6,
    SHL = 0xA8,
    SHR = 0xA9,
    NOT = 0xAA,
    BOOLAND = 0xAB,
    BOOLOR = 0xAC,
    NZ = 0xB1,
    NUMEQUAL = 0xB3,
    NUMNOTEQUAL = 0xB4,
    LT = 0xB5,
    LE = 0xB6,
    GT = 0xB7,
    GE = 0xB8,
    MIN = 0xB9,
    MAX = 0xBA,
    WITHIN = 0xBB,

    // Compound types
    PACKMAP = 0xBE,
    PACKSTRUCT = 0xBF,
    PACK = 0xC0,
    UNPACK = 0xC1,
    NEWARRAY0 = 0xC2,
    NEWARRAY = 0xC3,
    NEWARRAY_T = 0xC4,
    NEWSTRUCT0 = 0xC5,
    NEWSTRUCT = 0xC6,
    NEWMAP = 0xC8,
    SIZE = 0xCA,
    HASKEY = 0xCB,
    KEYS = 0xCC,
    VALUES = 0xCD,
    PICKITEM = 0xCE,
    APPEND = 0xCF,
    SETITEM = 0xD0,
    REVERSEITEMS = 0xD1,
    REMOVE = 0xD2,
    CLEARITEMS = 0xD3,
    POPITEM = 0xD4,

    // Types
    ISNULL = 0xD8,
    ISTYPE = 0xD9,
    CONVERT = 0xDB,

    // Extensions
    ABORTMSG = 0xE0,
    ASSERTMSG = 0xE1,
}

impl OpCode {
    /// Operand layout for this opcode.
    pub fn operand_size(self) -> OperandSize {
        use OpCode::*;
        match self {
            PUSHINT8 => OperandSize::Fixed(1),
            PUSHINT16 => OperandSize::Fixed(2),
            PUSHINT32 => OperandSize::Fixed(4),
            PUSHINT64 => OperandSize::Fixed(8),
            PUSHINT128 => OperandSize::Fixed(16),
            PUSHINT256 => OperandSize::Fixed(32),
            PUSHA => OperandSize::Fixed(4),
            PUSHDATA1 => OperandSize::Prefix(1),
            PUSHDATA2 => OperandSize::Prefix(2),
            PUSHDATA4 => OperandSize::Prefix(4),
            JMP | JMPIF | JMPIFNOT | JMPEQ | JMPNE | JMPGT | JMPGE | JMPLT | JMPLE | CALL
            | ENDTRY => OperandSize::Fixed(1),
            JMP_L | JMPIF_L | JMPIFNOT_L | JMPEQ_L | JMPNE_L | JMPGT_L | JMPGE_L | JMPLT_L
            | JMPLE_L | CALL_L | ENDTRY_L => OperandSize::Fixed(4),
            CALLT => OperandSize::Fixed(2),
            TRY => OperandSize::Fixed(2),
            TRY_L => OperandSize::Fixed(8),
            SYSCALL => OperandSize::Fixed(4),
            INITSSLOT => OperandSize::Fixed(1),
            INITSLOT => OperandSize::Fixed(2),
            LDSFLD | STSFLD | LDLOC | STLOC | LDARG | STARG => OperandSize::Fixed(1),
            NEWARRAY_T | ISTYPE | CONVERT => OperandSize::Fixed(1),
            _ => OperandSize::Fixed(0),
        }
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for OpCode {
    type Error = crate::VmError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_u8(value).ok_or(crate::VmError::InvalidOpcode(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_values() {
        assert_eq!(OpCode::PUSHDATA1 as u8, 0x0C);
        assert_eq!(OpCode::PUSH0 as u8, 0x10);
        assert_eq!(OpCode::PUSH16 as u8, 0x20);
        assert_eq!(OpCode::CALL_L as u8, 0x35);
        assert_eq!(OpCode::CALLT as u8, 0x37);
        assert_eq!(OpCode::RET as u8, 0x40);
        assert_eq!(OpCode::SWAP as u8, 0x50);
        assert_eq!(OpCode::REVERSEN as u8, 0x55);
        assert_eq!(OpCode::INITSLOT as u8, 0x57);
        assert_eq!(OpCode::LDARG0 as u8, 0x78);
        assert_eq!(OpCode::STARG as u8, 0x87);
        assert_eq!(OpCode::NEWBUFFER as u8, 0x88);
    }

    #[test]
    fn test_from_u8_roundtrip_and_gaps() {
        for byte in 0u8..=255 {
            if let Some(op) = OpCode::from_u8(byte) {
                assert_eq!(op as u8, byte);
            }
        }
        assert_eq!(OpCode::from_u8(0x06), None);
        assert_eq!(OpCode::from_u8(0x42), None);
        assert!(OpCode::try_from(0xFF).is_err());
    }

    #[test]
    fn test_operand_sizes() {
        assert_eq!(OpCode::CALLT.operand_size(), OperandSize::Fixed(2));
        assert_eq!(OpCode::CALL_L.operand_size(), OperandSize::Fixed(4));
        assert_eq!(OpCode::PUSHDATA2.operand_size(), OperandSize::Prefix(2));
        assert_eq!(OpCode::SWAP.operand_size(), OperandSize::Fixed(0));
        assert_eq!(OpCode::CALLT.to_string(), "CALLT");
    }
}
