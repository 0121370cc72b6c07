//! Instruction decoding for the Neo Virtual Machine.

use crate::error::{VmError, VmResult};
use crate::op_code::{OpCode, OperandSize};
use std::fmt;

/// A decoded instruction: opcode plus raw operand bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    position: usize,
    opcode: OpCode,
    /// Length of the size prefix for `PUSHDATA*`, zero otherwise.
    prefix_len: usize,
    operand: Vec<u8>,
}

impl Instruction {
    /// Decodes the instruction starting at `position`.
    pub fn decode(script: &[u8], position: usize) -> VmResult<Self> {
        let byte = *script.get(position).ok_or(VmError::InvalidJump {
            target: position as i64,
            length: script.len(),
        })?;
        let opcode = OpCode::try_from(byte)?;
        let truncated = || VmError::TruncatedInstruction {
            opcode: opcode.name(),
            position,
        };

        let start = position + 1;
        let (prefix_len, operand_len) = match opcode.operand_size() {
            OperandSize::Fixed(size) => (0, size),
            OperandSize::Prefix(prefix) => {
                let raw = script.get(start..start + prefix).ok_or_else(truncated)?;
                let mut len = [0u8; 4];
                len[..prefix].copy_from_slice(raw);
                (prefix, u32::from_le_bytes(len) as usize)
            }
        };

        let begin = start + prefix_len;
        let operand = script
            .get(begin..begin.checked_add(operand_len).ok_or_else(truncated)?)
            .ok_or_else(truncated)?
            .to_vec();

        Ok(Self {
            position,
            opcode,
            prefix_len,
            operand,
        })
    }

    /// Decodes a whole script into instructions.
    pub fn decode_all(script: &[u8]) -> VmResult<Vec<Self>> {
        let mut out = Vec::new();
        let mut position = 0;
        while position < script.len() {
            let instruction = Self::decode(script, position)?;
            position += instruction.size();
            out.push(instruction);
        }
        Ok(out)
    }

    #[inline]
    pub fn opcode(&self) -> OpCode {
        self.opcode
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub fn operand(&self) -> &[u8] {
        &self.operand
    }

    /// Encoded size in bytes, including opcode and any size prefix.
    #[inline]
    pub fn size(&self) -> usize {
        1 + self.prefix_len + self.operand.len()
    }

    pub fn operand_u8(&self) -> u8 {
        self.operand.first().copied().unwrap_or_default()
    }

    pub fn operand_i8(&self) -> i8 {
        self.operand_u8() as i8
    }

    pub fn operand_u16(&self) -> u16 {
        let mut buf = [0u8; 2];
        let len = self.operand.len().min(2);
        buf[..len].copy_from_slice(&self.operand[..len]);
        u16::from_le_bytes(buf)
    }

    pub fn operand_i32(&self) -> i32 {
        let mut buf = [0u8; 4];
        let len = self.operand.len().min(4);
        buf[..len].copy_from_slice(&self.operand[..len]);
        i32::from_le_bytes(buf)
    }

    /// Relative offset for short and long jump and call forms.
    pub fn jump_offset(&self) -> i32 {
        match self.operand.len() {
            1 => self.operand_i8() as i32,
            _ => self.operand_i32(),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04} {}", self.position, self.opcode)?;
        match self.opcode {
            OpCode::CALLT => write!(f, " {}", self.operand_u16()),
            OpCode::CALL | OpCode::CALL_L => {
                write!(f, " {}", self.position as i64 + self.jump_offset() as i64)
            }
            _ if !self.operand.is_empty() => {
                f.write_str(" ")?;
                for byte in &self.operand {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}
