//! Execution engine for the Neo VM.
//!
//! Runs the instruction subset the compiler emits, one instruction at a time.
//! `CALLT` is handed to an [`InteropHost`]; any other opcode faults.

use crate::error::{VmError, VmResult};
use crate::evaluation_stack::EvaluationStack;
use crate::execution_context::ExecutionContext;
use crate::instruction::Instruction;
use crate::op_code::OpCode;
use crate::slot::Slot;
use crate::stack_item::StackItem;
use crate::vm_state::VMState;
use num_bigint::BigInt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Restrictions on the VM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionEngineLimits {
    /// The maximum number of items on the evaluation stack.
    pub max_stack_size: usize,

    /// The maximum number of frames on the invocation stack.
    pub max_invocation_stack_size: usize,
}

impl ExecutionEngineLimits {
    pub const DEFAULT: Self = Self {
        max_stack_size: 2 * 1024,
        max_invocation_stack_size: 1024,
    };
}

impl Default for ExecutionEngineLimits {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Receives the instructions that reach outside the VM.
pub trait InteropHost {
    /// Handles `CALLT token`. Arguments are on the evaluation stack, first argument on top.
    fn on_callt(&mut self, engine: &mut ExecutionEngine, token: u16) -> VmResult<()>;

    /// Called before each instruction runs; an error faults the engine.
    fn pre_execute(&mut self, engine: &ExecutionEngine, instruction: &Instruction) -> VmResult<()> {
        let _ = (engine, instruction);
        Ok(())
    }
}

/// Host for scripts that make no external calls.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInterop;

impl InteropHost for NoInterop {
    fn on_callt(&mut self, _engine: &mut ExecutionEngine, token: u16) -> VmResult<()> {
        Err(VmError::interop(format!("no host to resolve CALLT {token}")))
    }
}

/// The execution engine for the Neo VM.
#[derive(Debug)]
pub struct ExecutionEngine {
    state: VMState,
    limits: ExecutionEngineLimits,
    invocation_stack: Vec<ExecutionContext>,
    evaluation_stack: EvaluationStack,
    result_stack: EvaluationStack,
    fault: Option<VmError>,
    instructions_executed: u64,
}

impl Default for ExecutionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionEngine {
    pub fn new() -> Self {
        Self::with_limits(ExecutionEngineLimits::default())
    }

    pub fn with_limits(limits: ExecutionEngineLimits) -> Self {
        Self {
            state: VMState::BREAK,
            limits,
            invocation_stack: Vec::new(),
            evaluation_stack: EvaluationStack::new(),
            result_stack: EvaluationStack::new(),
            fault: None,
            instructions_executed: 0,
        }
    }

    #[inline]
    pub fn state(&self) -> VMState {
        self.state
    }

    /// The error that faulted the engine, if any.
    pub fn fault(&self) -> Option<&VmError> {
        self.fault.as_ref()
    }

    pub fn limits(&self) -> &ExecutionEngineLimits {
        &self.limits
    }

    pub fn instructions_executed(&self) -> u64 {
        self.instructions_executed
    }

    pub fn current_context(&self) -> Option<&ExecutionContext> {
        self.invocation_stack.last()
    }

    pub fn invocation_depth(&self) -> usize {
        self.invocation_stack.len()
    }

    pub fn evaluation_stack(&self) -> &EvaluationStack {
        &self.evaluation_stack
    }

    pub fn evaluation_stack_mut(&mut self) -> &mut EvaluationStack {
        &mut self.evaluation_stack
    }

    /// Items left by the script when it halted.
    pub fn result_stack(&self) -> &EvaluationStack {
        &self.result_stack
    }

    /// Loads a script with execution starting at offset 0.
    pub fn load_script(&mut self, script: impl Into<Arc<[u8]>>) -> VmResult<()> {
        self.load_script_at(script, 0)
    }

    /// Loads a script with execution starting at `position`.
    pub fn load_script_at(&mut self, script: impl Into<Arc<[u8]>>, position: usize) -> VmResult<()> {
        let script = script.into();
        if position > script.len() {
            return Err(VmError::InvalidJump {
                target: position as i64,
                length: script.len(),
            });
        }
        self.load_context(ExecutionContext::new(script, position))?;
        self.state = VMState::NONE;
        Ok(())
    }

    /// Pushes an item, enforcing the stack size limit.
    pub fn push(&mut self, item: StackItem) -> VmResult<()> {
        if self.evaluation_stack.len() >= self.limits.max_stack_size {
            return Err(VmError::StackOverflow {
                limit: self.limits.max_stack_size,
            });
        }
        self.evaluation_stack.push(item);
        Ok(())
    }

    pub fn pop(&mut self) -> VmResult<StackItem> {
        self.evaluation_stack.pop()
    }

    pub fn peek(&self, n: usize) -> VmResult<&StackItem> {
        self.evaluation_stack.peek(n)
    }

    /// Runs until the engine halts or faults.
    pub fn execute(&mut self, host: &mut dyn InteropHost) -> VMState {
        if self.state == VMState::BREAK {
            self.state = VMState::NONE;
        }

        while !self.state.is_terminal() {
            if let Err(err) = self.execute_next(host) {
                self.on_fault(err);
            }
        }

        self.state
    }

    /// Executes the next instruction.
    pub fn execute_next(&mut self, host: &mut dyn InteropHost) -> VmResult<()> {
        if self.state.is_terminal() {
            return Ok(());
        }

        let context = self.invocation_stack.last().ok_or(VmError::NoContext)?;
        let instruction = match context.current_instruction()? {
            Some(instruction) => instruction,
            // Running off the end of a script is an implicit RET.
            None => return self.execute_ret(),
        };

        host.pre_execute(self, &instruction)?;
        trace!(target: "neo::vm", op = %instruction.opcode(), ip = instruction.position(), "execute");

        let jumped = self.execute_instruction(host, &instruction)?;
        self.instructions_executed += 1;

        if !jumped {
            if let Some(context) = self.invocation_stack.last_mut() {
                context.set_instruction_pointer(instruction.position() + instruction.size());
            }
        }
        Ok(())
    }

    fn on_fault(&mut self, err: VmError) {
        debug!(target: "neo::vm", error = %err, "vm fault");
        self.fault = Some(err);
        self.state = VMState::FAULT;
    }

    fn load_context(&mut self, context: ExecutionContext) -> VmResult<()> {
        if self.invocation_stack.len() >= self.limits.max_invocation_stack_size {
            return Err(VmError::InvocationDepthExceeded {
                limit: self.limits.max_invocation_stack_size,
            });
        }
        self.invocation_stack.push(context);
        Ok(())
    }

    fn context_mut(&mut self) -> VmResult<&mut ExecutionContext> {
        self.invocation_stack.last_mut().ok_or(VmError::NoContext)
    }

    fn execute_ret(&mut self) -> VmResult<()> {
        self.invocation_stack.pop();
        if self.invocation_stack.is_empty() {
            self.result_stack = std::mem::take(&mut self.evaluation_stack);
            self.state = VMState::HALT;
        }
        Ok(())
    }

    fn call_target(&self, instruction: &Instruction) -> VmResult<usize> {
        let context = self.current_context().ok_or(VmError::NoContext)?;
        let target = instruction.position() as i64 + instruction.jump_offset() as i64;
        if target < 0 || target >= context.script().len() as i64 {
            return Err(VmError::InvalidJump {
                target,
                length: context.script().len(),
            });
        }
        Ok(target as usize)
    }

    fn pop_bool(&mut self) -> VmResult<bool> {
        self.pop()?.as_bool()
    }

    fn pop_count(&mut self) -> VmResult<usize> {
        let value = self.pop()?.as_i64()?;
        if value < 0 || value as usize > self.limits.max_stack_size {
            return Err(VmError::invalid_type("count", "Integer"));
        }
        Ok(value as usize)
    }

    fn load_arg(&mut self, index: usize) -> VmResult<()> {
        let item = self
            .current_context()
            .and_then(|c| c.arguments())
            .ok_or(VmError::SlotNotInitialized { slot: "argument" })?
            .get(index)?
            .clone();
        self.push(item)
    }

    /// Executes one instruction. Returns `true` if the instruction pointer was moved.
    fn execute_instruction(
        &mut self,
        host: &mut dyn InteropHost,
        instruction: &Instruction,
    ) -> VmResult<bool> {
        use OpCode::*;

        let op = instruction.opcode();
        match op {
            // Constants
            PUSHINT8 | PUSHINT16 | PUSHINT32 | PUSHINT64 | PUSHINT128 | PUSHINT256 => {
                self.push(StackItem::Integer(BigInt::from_signed_bytes_le(
                    instruction.operand(),
                )))?;
            }
            PUSHT => self.push(StackItem::Boolean(true))?,
            PUSHF => self.push(StackItem::Boolean(false))?,
            PUSHNULL => self.push(StackItem::Null)?,
            PUSHDATA1 | PUSHDATA2 | PUSHDATA4 => {
                self.push(StackItem::ByteString(instruction.operand().to_vec()))?;
            }
            PUSHM1 | PUSH0 | PUSH1 | PUSH2 | PUSH3 | PUSH4 | PUSH5 | PUSH6 | PUSH7 | PUSH8
            | PUSH9 | PUSH10 | PUSH11 | PUSH12 | PUSH13 | PUSH14 | PUSH15 | PUSH16 => {
                let value = op as i16 - PUSH0 as i16;
                self.push(StackItem::from(value as i64))?;
            }

            // Flow control
            NOP => {}
            CALL | CALL_L => {
                let target = self.call_target(instruction)?;
                let return_to = instruction.position() + instruction.size();
                let script = {
                    let context = self.context_mut()?;
                    context.set_instruction_pointer(return_to);
                    context.script_arc()
                };
                self.load_context(ExecutionContext::new(script, target))?;
                return Ok(true);
            }
            CALLT => {
                host.on_callt(self, instruction.operand_u16())?;
            }
            ABORT => return Err(VmError::Abort),
            ASSERT => {
                if !self.pop_bool()? {
                    return Err(VmError::AssertFailed);
                }
            }
            RET => {
                self.execute_ret()?;
                return Ok(true);
            }

            // Stack
            DROP => {
                self.pop()?;
            }
            DUP => {
                let item = self.peek(0)?.clone();
                self.push(item)?;
            }
            SWAP => {
                let item = self.evaluation_stack.remove(1)?;
                self.push(item)?;
            }
            REVERSE3 => self.evaluation_stack.reverse(3)?,
            REVERSE4 => self.evaluation_stack.reverse(4)?,
            REVERSEN => {
                let n = self.pop_count()?;
                self.evaluation_stack.reverse(n)?;
            }

            // Slot
            INITSLOT => {
                if self.current_context().is_some_and(|c| c.slots_initialized()) {
                    return Err(VmError::interop("INITSLOT cannot be executed twice"));
                }
                let operand = instruction.operand();
                let (locals, args) = (operand[0] as usize, operand[1] as usize);
                if locals == 0 && args == 0 {
                    return Err(VmError::interop("INITSLOT requires a non-zero operand"));
                }
                let arguments = self.evaluation_stack.pop_many(args)?;
                self.context_mut()?.init_slots(
                    Slot::new("local", locals),
                    Slot::with_items("argument", arguments),
                );
            }
            LDARG0 | LDARG1 | LDARG2 | LDARG3 | LDARG4 | LDARG5 | LDARG6 => {
                self.load_arg((op as u8 - LDARG0 as u8) as usize)?;
            }
            LDARG => self.load_arg(instruction.operand_u8() as usize)?,

            _ => return Err(VmError::UnsupportedOpcode(op.name())),
        }
        Ok(false)
    }
}
