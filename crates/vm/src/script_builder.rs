//! Script builder module for the Neo Virtual Machine.
//!
//! This module provides a way to programmatically construct scripts for the Neo VM.

use crate::op_code::OpCode;
use num_bigint::BigInt;

/// Helps construct VM scripts programmatically.
#[derive(Debug, Clone, Default)]
pub struct ScriptBuilder {
    script: Vec<u8>,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self { script: Vec::new() }
    }

    /// Current script length, i.e. the offset of the next emitted byte.
    #[inline]
    pub fn len(&self) -> usize {
        self.script.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.script.is_empty()
    }

    /// Emits an opcode to the script.
    pub fn emit_opcode(&mut self, op: OpCode) -> &mut Self {
        self.script.push(op as u8);
        self
    }

    /// Emits an opcode followed by a raw operand.
    pub fn emit_with_operand(&mut self, op: OpCode, operand: &[u8]) -> &mut Self {
        self.script.push(op as u8);
        self.script.extend_from_slice(operand);
        self
    }

    /// Emits a push operation with the given data.
    pub fn emit_push_bytes(&mut self, data: &[u8]) -> &mut Self {
        let len = data.len();
        if len <= u8::MAX as usize {
            self.emit_with_operand(OpCode::PUSHDATA1, &[len as u8]);
        } else if len <= u16::MAX as usize {
            self.emit_with_operand(OpCode::PUSHDATA2, &(len as u16).to_le_bytes());
        } else {
            self.emit_with_operand(OpCode::PUSHDATA4, &(len as u32).to_le_bytes());
        }
        self.script.extend_from_slice(data);
        self
    }

    /// Emits a push operation for a string.
    pub fn emit_push_string(&mut self, value: &str) -> &mut Self {
        self.emit_push_bytes(value.as_bytes())
    }

    /// Emits a push operation for a boolean.
    pub fn emit_push_bool(&mut self, value: bool) -> &mut Self {
        self.emit_opcode(if value { OpCode::PUSHT } else { OpCode::PUSHF })
    }

    pub fn emit_push_null(&mut self) -> &mut Self {
        self.emit_opcode(OpCode::PUSHNULL)
    }

    /// Emits a push operation for an integer.
    pub fn emit_push_int(&mut self, value: i64) -> &mut Self {
        self.emit_push_bigint(&BigInt::from(value))
    }

    /// Emits the shortest push for `value`.
    ///
    /// Values that do not fit in 32 bytes are emitted as `PUSHINT256` with the
    /// low 32 bytes; callers bound integers beforehand.
    pub fn emit_push_bigint(&mut self, value: &BigInt) -> &mut Self {
        if let Ok(small) = i8::try_from(value) {
            if (-1..=16).contains(&small) {
                let op = (OpCode::PUSH0 as i16 + small as i16) as u8;
                self.script.push(op);
                return self;
            }
        }

        let bytes = value.to_signed_bytes_le();
        let (op, width) = match bytes.len() {
            0..=1 => (OpCode::PUSHINT8, 1),
            2 => (OpCode::PUSHINT16, 2),
            3..=4 => (OpCode::PUSHINT32, 4),
            5..=8 => (OpCode::PUSHINT64, 8),
            9..=16 => (OpCode::PUSHINT128, 16),
            _ => (OpCode::PUSHINT256, 32),
        };
        let pad = if value.sign() == num_bigint::Sign::Minus {
            0xFF
        } else {
            0x00
        };
        let mut operand = vec![pad; width];
        let len = bytes.len().min(width);
        operand[..len].copy_from_slice(&bytes[..len]);
        self.emit_with_operand(op, &operand)
    }

    /// Emits the frame-entry reversal for a call site with `count` pushed arguments.
    ///
    /// Arguments are pushed first to last; after this the first argument is on top.
    pub fn emit_reverse_args(&mut self, count: usize) -> &mut Self {
        match count {
            0 | 1 => self,
            2 => self.emit_opcode(OpCode::SWAP),
            3 => self.emit_opcode(OpCode::REVERSE3),
            4 => self.emit_opcode(OpCode::REVERSE4),
            n => self
                .emit_push_int(n as i64)
                .emit_opcode(OpCode::REVERSEN),
        }
    }

    /// Emits `CALLT` with a method-token index.
    pub fn emit_callt(&mut self, token: u16) -> &mut Self {
        self.emit_with_operand(OpCode::CALLT, &token.to_le_bytes())
    }

    /// Emits `CALL_L` with a relative offset; see [`ScriptBuilder::patch_i32`].
    pub fn emit_call_l(&mut self, offset: i32) -> &mut Self {
        self.emit_with_operand(OpCode::CALL_L, &offset.to_le_bytes())
    }

    /// Emits `INITSLOT locals args`.
    pub fn emit_init_slot(&mut self, locals: u8, args: u8) -> &mut Self {
        self.emit_with_operand(OpCode::INITSLOT, &[locals, args])
    }

    /// Emits the shortest argument load for `index`.
    pub fn emit_ldarg(&mut self, index: u8) -> &mut Self {
        if index <= 6 {
            self.script.push(OpCode::LDARG0 as u8 + index);
            self
        } else {
            self.emit_with_operand(OpCode::LDARG, &[index])
        }
    }

    /// Overwrites four bytes at `position` with `value`.
    ///
    /// Returns `false` if the range is outside the script.
    pub fn patch_i32(&mut self, position: usize, value: i32) -> bool {
        match self.script.get_mut(position..position + 4) {
            Some(slot) => {
                slot.copy_from_slice(&value.to_le_bytes());
                true
            }
            None => false,
        }
    }

    /// Converts the builder to a byte array.
    pub fn to_array(&self) -> Vec<u8> {
        self.script.clone()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.script
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_push_int() {
        let mut builder = ScriptBuilder::new();
        builder
            .emit_push_int(-1)
            .emit_push_int(0)
            .emit_push_int(10)
            .emit_push_int(16)
            .emit_push_int(17)
            .emit_push_int(-100)
            .emit_push_int(1000);

        assert_eq!(
            builder.to_array(),
            vec![
                OpCode::PUSHM1 as u8,
                OpCode::PUSH0 as u8,
                OpCode::PUSH10 as u8,
                OpCode::PUSH16 as u8,
                OpCode::PUSHINT8 as u8,
                17,
                OpCode::PUSHINT8 as u8,
                0x9c,
                OpCode::PUSHINT16 as u8,
                0xe8,
                0x03,
            ]
        );
    }

    #[test]
    fn test_push_int_pads_to_width() {
        let mut builder = ScriptBuilder::new();
        builder.emit_push_int(-70_000);
        let script = builder.to_array();
        assert_eq!(script[0], OpCode::PUSHINT32 as u8);
        assert_eq!(i32::from_le_bytes([script[1], script[2], script[3], script[4]]), -70_000);
    }

    #[test]
    fn test_emit_push_bytes() {
        let mut builder = ScriptBuilder::new();
        builder.emit_push_bytes(&[1, 2, 3]);
        builder.emit_push_bytes(&[0; 300]);
        let script = builder.to_array();
        assert_eq!(&script[..5], &[OpCode::PUSHDATA1 as u8, 3, 1, 2, 3]);
        assert_eq!(&script[5..8], &[OpCode::PUSHDATA2 as u8, 0x2c, 0x01]);
        assert_eq!(script.len(), 5 + 3 + 300);
    }

    #[test]
    fn test_emit_reverse_args() {
        let shape = |n| {
            let mut b = ScriptBuilder::new();
            b.emit_reverse_args(n);
            b.to_array()
        };
        assert!(shape(0).is_empty());
        assert!(shape(1).is_empty());
        assert_eq!(shape(2), vec![OpCode::SWAP as u8]);
        assert_eq!(shape(3), vec![OpCode::REVERSE3 as u8]);
        assert_eq!(shape(4), vec![OpCode::REVERSE4 as u8]);
        assert_eq!(shape(5), vec![OpCode::PUSH5 as u8, OpCode::REVERSEN as u8]);
    }

    #[test]
    fn test_emit_callt_and_patch() {
        let mut builder = ScriptBuilder::new();
        builder.emit_callt(0x0102).emit_call_l(0);
        assert!(builder.patch_i32(4, -3));
        assert!(!builder.patch_i32(6, 1));
        assert_eq!(
            builder.to_array(),
            vec![OpCode::CALLT as u8, 0x02, 0x01, OpCode::CALL_L as u8, 0xfd, 0xff, 0xff, 0xff]
        );
    }

    #[test]
    fn test_emit_ldarg() {
        let mut builder = ScriptBuilder::new();
        builder.emit_ldarg(0).emit_ldarg(6).emit_ldarg(7);
        assert_eq!(
            builder.to_array(),
            vec![OpCode::LDARG0 as u8, OpCode::LDARG6 as u8, OpCode::LDARG as u8, 7]
        );
    }
}
