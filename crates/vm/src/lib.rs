//! # Neo Virtual Machine (NeoVM)
//!
//! A stack-based interpreter for the subset of Neo N3 bytecode produced by the
//! devpack compiler, plus the pieces the compiler uses to produce it.
//!
//! ## Architecture
//!
//! - **OpCode / Instruction**: opcode table and instruction decoding
//! - **ScriptBuilder**: bytecode emission, including the CALLT call-site shape
//! - **ExecutionEngine**: the execution loop; `CALLT` is routed to an
//!   [`InteropHost`] supplied by the caller, any opcode outside the emitted
//!   subset faults
//! - **EvaluationStack / Slot / StackItem**: runtime values
//!
//! ## Example
//!
//! ```rust
//! use neo_vm::{ExecutionEngine, NoInterop, OpCode, ScriptBuilder, StackItem, VMState};
//!
//! let mut builder = ScriptBuilder::new();
//! builder.emit_push_int(2).emit_push_int(5).emit_opcode(OpCode::SWAP).emit_opcode(OpCode::RET);
//!
//! let mut engine = ExecutionEngine::new();
//! engine.load_script(builder.to_array()).unwrap();
//! assert_eq!(engine.execute(&mut NoInterop), VMState::HALT);
//! assert_eq!(engine.result_stack().peek(0).unwrap(), &StackItem::from_int(2));
//! ```

pub mod call_flags;
pub mod error;
pub mod evaluation_stack;
pub mod execution_context;
pub mod execution_engine;
pub mod instruction;
pub mod op_code;
pub mod script_builder;
pub mod slot;
pub mod stack_item;
pub mod vm_state;

pub use call_flags::CallFlags;
pub use error::{VmError, VmResult};
pub use evaluation_stack::EvaluationStack;
pub use execution_context::ExecutionContext;
pub use execution_engine::{ExecutionEngine, ExecutionEngineLimits, InteropHost, NoInterop};
pub use instruction::Instruction;
pub use op_code::{OpCode, OperandSize};
pub use script_builder::ScriptBuilder;
pub use slot::Slot;
pub use stack_item::{StackItem, StackItemType, MAX_INTEGER_SIZE};
pub use vm_state::VMState;
