//! Bytecode emission for method bodies and call sites.

use neo_core::UInt160;
use neo_vm::{OpCode, ScriptBuilder};
use serde::Serialize;
use tracing::trace;

use crate::{CompileError, CompileResult};

/// A `CALLT` written into the script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CallSite {
    /// Script offset of the `CALLT` instruction.
    pub offset: usize,
    pub token: u16,
    pub arity: usize,
}

#[derive(Debug, Clone)]
struct LocalCallFixup {
    position: usize,
    method: String,
}

/// Appends instructions to a script under construction.
///
/// Only reads token indices; interning happens before a call site is emitted.
#[derive(Debug, Default)]
pub struct Emitter {
    builder: ScriptBuilder,
    call_sites: Vec<CallSite>,
    fixups: Vec<LocalCallFixup>,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offset of the next instruction.
    pub fn offset(&self) -> usize {
        self.builder.len()
    }

    pub fn call_sites(&self) -> &[CallSite] {
        &self.call_sites
    }

    /// `INITSLOT 0 n` for methods that take parameters.
    pub fn emit_prologue(&mut self, params: u8) {
        if params > 0 {
            self.builder.emit_init_slot(0, params);
        }
    }

    pub fn emit_int(&mut self, value: i64) {
        self.builder.emit_push_int(value);
    }

    pub fn emit_bool(&mut self, value: bool) {
        self.builder.emit_push_bool(value);
    }

    pub fn emit_str(&mut self, value: &str) {
        self.builder.emit_push_string(value);
    }

    pub fn emit_bytes(&mut self, value: &[u8]) {
        self.builder.emit_push_bytes(value);
    }

    pub fn emit_null(&mut self) {
        self.builder.emit_push_null();
    }

    /// Pushes a contract hash in its little-endian wire order.
    pub fn emit_hash(&mut self, hash: &UInt160) {
        self.builder.emit_push_bytes(hash.as_bytes());
    }

    pub fn emit_load_arg(&mut self, index: u8) {
        self.builder.emit_ldarg(index);
    }

    pub fn emit_drop(&mut self) {
        self.builder.emit_opcode(OpCode::DROP);
    }

    pub fn emit_ret(&mut self) {
        self.builder.emit_opcode(OpCode::RET);
    }

    /// Completes a native call whose `arity` arguments were pushed first to last:
    /// the reversal marking the arity, then `CALLT token`.
    pub fn emit_native_call(&mut self, token: usize, arity: usize) -> CompileResult<CallSite> {
        let token = u16::try_from(token).map_err(|_| CompileError::TableOverflow {
            count: token + 1,
            max: u16::MAX as usize + 1,
        })?;
        self.builder.emit_reverse_args(arity);
        let site = CallSite {
            offset: self.offset(),
            token,
            arity,
        };
        self.builder.emit_callt(token);
        trace!(target: "neo::compiler", offset = site.offset, token, arity, "emitted CALLT");
        self.call_sites.push(site);
        Ok(site)
    }

    /// Completes a call to a method of the same contract; the target offset is
    /// filled in by [`Emitter::link_local_calls`].
    pub fn emit_local_call(&mut self, method: &str, arity: usize) {
        self.builder.emit_reverse_args(arity);
        self.fixups.push(LocalCallFixup {
            position: self.offset(),
            method: method.to_string(),
        });
        self.builder.emit_call_l(0);
    }

    /// Patches every `CALL_L` with the offset of its target method.
    pub fn link_local_calls<F>(&mut self, entry_of: F) -> CompileResult<()>
    where
        F: Fn(&str) -> Option<usize>,
    {
        for fixup in std::mem::take(&mut self.fixups) {
            let target = entry_of(&fixup.method)
                .ok_or_else(|| CompileError::UnknownMethod(fixup.method.clone()))?;
            let relative = i32::try_from(target as i64 - fixup.position as i64)
                .map_err(|_| CompileError::OffsetOverflow {
                    position: fixup.position,
                })?;
            if !self.builder.patch_i32(fixup.position + 1, relative) {
                return Err(CompileError::OffsetOverflow {
                    position: fixup.position,
                });
            }
        }
        Ok(())
    }

    pub fn into_script(self) -> (Vec<u8>, Vec<CallSite>) {
        (self.builder.into_bytes(), self.call_sites)
    }
}
