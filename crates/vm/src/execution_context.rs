//! Execution context: one frame on the invocation stack.

use crate::error::VmResult;
use crate::instruction::Instruction;
use crate::slot::Slot;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ExecutionContext {
    script: Arc<[u8]>,
    instruction_pointer: usize,
    local_variables: Option<Slot>,
    arguments: Option<Slot>,
}

impl ExecutionContext {
    pub fn new(script: Arc<[u8]>, instruction_pointer: usize) -> Self {
        Self {
            script,
            instruction_pointer,
            local_variables: None,
            arguments: None,
        }
    }

    #[inline]
    pub fn script(&self) -> &[u8] {
        &self.script
    }

    #[inline]
    pub fn script_arc(&self) -> Arc<[u8]> {
        Arc::clone(&self.script)
    }

    #[inline]
    pub fn instruction_pointer(&self) -> usize {
        self.instruction_pointer
    }

    #[inline]
    pub fn set_instruction_pointer(&mut self, position: usize) {
        self.instruction_pointer = position;
    }

    /// Decodes the instruction at the instruction pointer, `None` at end of script.
    pub fn current_instruction(&self) -> VmResult<Option<Instruction>> {
        if self.instruction_pointer >= self.script.len() {
            return Ok(None);
        }
        Instruction::decode(&self.script, self.instruction_pointer).map(Some)
    }

    pub fn local_variables(&self) -> Option<&Slot> {
        self.local_variables.as_ref()
    }

    pub fn arguments(&self) -> Option<&Slot> {
        self.arguments.as_ref()
    }

    /// True once `INITSLOT` has run in this frame.
    pub fn slots_initialized(&self) -> bool {
        self.local_variables.is_some() || self.arguments.is_some()
    }

    pub fn init_slots(&mut self, locals: Slot, arguments: Slot) {
        self.local_variables = Some(locals);
        self.arguments = Some(arguments);
    }
}
