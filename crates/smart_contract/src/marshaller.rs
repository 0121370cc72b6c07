//! Moves arguments off the VM stack into a callee and the result back.

use neo_core::ContractParameterType as T;
use neo_vm::{ExecutionEngine, StackItem, MAX_INTEGER_SIZE};
use tracing::trace;

use crate::{
    native::NativeCall, CallContext, ContractError, ContractResult, ResolvedBinding,
};

/// Arguments of one call, converted to the callee's declared types.
///
/// `args[0]` is the first source-level argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationFrame {
    pub arity: usize,
    pub args: Vec<StackItem>,
}

/// Performs the stack side of a resolved call.
#[derive(Debug, Default, Clone, Copy)]
pub struct InvocationMarshaller;

impl InvocationMarshaller {
    pub fn new() -> Self {
        Self
    }

    /// Pops exactly `arity` arguments, first argument on top.
    ///
    /// The stack is left untouched when a check or a conversion fails.
    pub fn prepare_frame(
        &self,
        engine: &mut ExecutionEngine,
        binding: &ResolvedBinding,
    ) -> ContractResult<InvocationFrame> {
        let arity = binding.arity();
        let available = engine.evaluation_stack().len();
        if available < arity {
            return Err(ContractError::ArityFault {
                method: binding.method.name.to_string(),
                expected: arity,
                available,
            });
        }

        let mut args = Vec::with_capacity(arity);
        for (index, param) in binding.method.parameters.iter().enumerate() {
            let item = engine.peek(index)?;
            args.push(convert(item, *param).ok_or_else(|| ContractError::ArgumentConversion {
                method: binding.method.name.to_string(),
                index,
                expected: *param,
                actual: item.type_name(),
            })?);
        }
        for _ in 0..arity {
            engine.pop()?;
        }
        Ok(InvocationFrame { arity, args })
    }

    /// Runs the whole call: frame, fee, callee, result push.
    pub fn invoke(
        &self,
        engine: &mut ExecutionEngine,
        binding: &ResolvedBinding,
        ctx: &mut CallContext,
    ) -> ContractResult<Option<StackItem>> {
        let frame = self.prepare_frame(engine, binding)?;
        ctx.gas_mut().charge(binding.method.cpu_fee)?;

        let call = NativeCall {
            caller: ctx.caller(),
            flags: binding.effective_flags,
            method: &binding.method,
        };
        let result = binding.contract.invoke(&call, &frame.args)?;

        let expected = usize::from(binding.has_return_value());
        let actual = usize::from(result.is_some());
        if expected != actual {
            return Err(ContractError::ReturnCountMismatch {
                method: binding.method.name.to_string(),
                expected,
                actual,
            });
        }
        if let Some(value) = &result {
            engine.push(value.clone())?;
        }
        trace!(
            target: "neo::vm",
            method = binding.method.name,
            arity = frame.arity,
            returned = actual,
            "native call returned"
        );
        Ok(result)
    }
}

/// Converts a stack item to the representation a parameter of type `param` expects.
pub fn convert(item: &StackItem, param: T) -> Option<StackItem> {
    match param {
        T::Any => Some(item.clone()),
        T::Boolean => match item {
            StackItem::Boolean(_) | StackItem::Integer(_) | StackItem::ByteString(_) => {
                item.as_bool().ok().map(StackItem::Boolean)
            }
            _ => None,
        },
        T::Integer => match item {
            StackItem::Integer(_) | StackItem::Boolean(_) => item.as_int().ok().map(StackItem::Integer),
            StackItem::ByteString(bytes) if bytes.len() <= MAX_INTEGER_SIZE => {
                item.as_int().ok().map(StackItem::Integer)
            }
            _ => None,
        },
        _ if item.is_null() => Some(StackItem::Null),
        T::ByteArray => match item {
            StackItem::ByteString(bytes) | StackItem::Buffer(bytes) => {
                Some(StackItem::ByteString(bytes.clone()))
            }
            _ => None,
        },
        T::String => match item {
            StackItem::ByteString(bytes) if std::str::from_utf8(bytes).is_ok() => Some(item.clone()),
            _ => None,
        },
        T::Hash160 => fixed_length(item, 20),
        T::Hash256 => fixed_length(item, 32),
        T::PublicKey => fixed_length(item, 33),
        T::Signature => fixed_length(item, 64),
        T::Array => match item {
            StackItem::Array(_) | StackItem::Struct(_) => Some(item.clone()),
            _ => None,
        },
        // The VM has no dedicated items for these; compounds pass through.
        T::Map | T::InteropInterface => match item {
            StackItem::Array(_) | StackItem::Struct(_) => Some(item.clone()),
            _ => None,
        },
        T::Void => None,
    }
}

fn fixed_length(item: &StackItem, len: usize) -> Option<StackItem> {
    match item {
        StackItem::ByteString(bytes) if bytes.len() == len => Some(item.clone()),
        _ => None,
    }
}
