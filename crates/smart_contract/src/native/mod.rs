//! Native contracts: interface declarations and in-process implementations.

mod declared;
mod interface;
mod registry;

pub use declared::{DeclaredContract, NativeHandler};
pub use interface::{MethodSignature, NativeInterface};
pub use registry::NativeRegistry;

use crate::ContractResult;
use neo_core::UInt160;
use neo_vm::{CallFlags, StackItem};

/// Per-invocation facts handed to a native method.
#[derive(Debug, Clone, Copy)]
pub struct NativeCall<'a> {
    /// Script hash of the calling contract.
    pub caller: UInt160,
    /// Effective flags after intersecting caller and token flags.
    pub flags: CallFlags,
    pub method: &'a MethodSignature,
}

/// A contract that can service `CALLT` in-process.
pub trait NativeContract: Send + Sync {
    fn hash(&self) -> UInt160;

    fn name(&self) -> &str;

    /// Declared method table, overloads distinguished by arity.
    fn methods(&self) -> &[MethodSignature];

    fn find_method(&self, name: &str, arity: usize) -> Option<&MethodSignature> {
        self.methods()
            .iter()
            .find(|m| m.name == name && m.arity() == arity)
    }

    /// Runs the method with already converted arguments.
    ///
    /// Returns `Some` exactly when the method declares a return value.
    fn invoke(&self, call: &NativeCall<'_>, args: &[StackItem])
        -> ContractResult<Option<StackItem>>;
}
