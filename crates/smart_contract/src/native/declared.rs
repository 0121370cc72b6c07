use std::collections::HashMap;
use std::sync::Arc;

use neo_core::UInt160;
use neo_vm::StackItem;

use super::{MethodSignature, NativeCall, NativeContract, NativeInterface};
use crate::{ContractError, ContractResult};

/// Handler servicing one method overload.
pub type NativeHandler =
    Arc<dyn Fn(&NativeCall<'_>, &[StackItem]) -> ContractResult<Option<StackItem>> + Send + Sync>;

/// A native contract described by its declared interface, with the business
/// logic of individual methods plugged in by the host.
///
/// Methods without a handler fail as callee faults.
pub struct DeclaredContract {
    name: String,
    hash: UInt160,
    methods: Vec<MethodSignature>,
    handlers: HashMap<(String, usize), NativeHandler>,
}

impl DeclaredContract {
    pub fn new(name: impl Into<String>, hash: UInt160, methods: Vec<MethodSignature>) -> Self {
        Self {
            name: name.into(),
            hash,
            methods,
            handlers: HashMap::new(),
        }
    }

    pub fn from_interface(interface: NativeInterface) -> Self {
        Self::new(interface.name(), interface.hash(), interface.methods().to_vec())
    }

    /// Installs the handler for `method` with `arity` parameters.
    pub fn with_handler<F>(mut self, method: &str, arity: usize, handler: F) -> Self
    where
        F: Fn(&NativeCall<'_>, &[StackItem]) -> ContractResult<Option<StackItem>>
            + Send
            + Sync
            + 'static,
    {
        self.handlers
            .insert((method.to_string(), arity), Arc::new(handler));
        self
    }

    /// Installs a handler that always returns `value`.
    pub fn with_constant(self, method: &str, arity: usize, value: StackItem) -> Self {
        self.with_handler(method, arity, move |_, _| Ok(Some(value.clone())))
    }
}

impl NativeContract for DeclaredContract {
    fn hash(&self) -> UInt160 {
        self.hash
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn methods(&self) -> &[MethodSignature] {
        &self.methods
    }

    fn invoke(
        &self,
        call: &NativeCall<'_>,
        args: &[StackItem],
    ) -> ContractResult<Option<StackItem>> {
        let key = (call.method.name.to_string(), call.method.arity());
        match self.handlers.get(&key) {
            Some(handler) => handler(call, args),
            None => Err(ContractError::callee(
                call.method.name,
                format!("{} has no implementation for this method", self.name),
            )),
        }
    }
}

impl std::fmt::Debug for DeclaredContract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeclaredContract")
            .field("name", &self.name)
            .field("hash", &self.hash)
            .field("methods", &self.methods.len())
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neo_vm::CallFlags;

    #[test]
    fn dispatches_by_name_and_arity() {
        let contract = DeclaredContract::from_interface(NativeInterface::StdLib)
            .with_handler("itoa", 1, |_, args| {
                Ok(Some(StackItem::from(args[0].as_int()?.to_string().as_str())))
            });

        let itoa = *contract.find_method("itoa", 1).unwrap();
        let call = NativeCall {
            caller: UInt160::ZERO,
            flags: CallFlags::NONE,
            method: &itoa,
        };
        let out = contract.invoke(&call, &[StackItem::from(42i64)]).unwrap();
        assert_eq!(out, Some(StackItem::from("42")));

        let itoa2 = *contract.find_method("itoa", 2).unwrap();
        let call = NativeCall { method: &itoa2, ..call };
        let err = contract.invoke(&call, &[]).unwrap_err();
        assert_eq!(err.kind(), crate::FaultKind::Callee);
    }
}
