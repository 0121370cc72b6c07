//! Decides which calls target native contracts.

use neo_core::UInt160;
use neo_smart_contract::{MethodSignature, MethodToken, NativeInterface};
use neo_vm::CallFlags;
use tracing::trace;

use crate::ast::{CallExpr, Callee};
use crate::typing::ExprType;
use crate::{CompileError, CompileResult};

/// Pseudo-method every native interface exposes; it compiles to a constant.
pub const GET_HASH: &str = "getHash";

/// A call that statically resolves to a declared native method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeCandidate {
    pub interface: NativeInterface,
    pub signature: &'static MethodSignature,
    pub call_flags: CallFlags,
}

impl NativeCandidate {
    pub fn hash(&self) -> UInt160 {
        self.interface.hash()
    }

    pub fn arity(&self) -> usize {
        self.signature.arity()
    }

    /// The token this call site needs in the module's table.
    pub fn to_token(&self) -> CompileResult<MethodToken> {
        Ok(MethodToken::new(
            self.hash(),
            self.signature.name,
            self.signature.arity() as u16,
            self.signature.has_return_value(),
            self.call_flags,
        )?)
    }
}

/// Outcome of looking at one call expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recognition {
    /// Ordinary call into the contract being compiled.
    Local,
    Native(NativeCandidate),
    /// `getHash()` on a native interface.
    ContractHash(UInt160),
}

/// Matches call expressions against the closed set of native interfaces.
#[derive(Debug, Default, Clone, Copy)]
pub struct CallSiteRecognizer;

impl CallSiteRecognizer {
    pub fn new() -> Self {
        Self
    }

    /// Classifies `call`, whose argument types are `arg_types`.
    ///
    /// A call naming a native interface must match one declared overload in
    /// arity and argument types; anything else is a compile error.
    pub fn recognize(&self, call: &CallExpr, arg_types: &[ExprType]) -> CompileResult<Recognition> {
        let (interface_name, method) = match &call.target {
            Callee::Local { .. } => return Ok(Recognition::Local),
            Callee::Native { interface, method } => (interface, method),
        };
        let interface = NativeInterface::from_name(interface_name)
            .ok_or_else(|| CompileError::UnknownInterface(interface_name.clone()))?;

        if method == GET_HASH {
            if !arg_types.is_empty() {
                return Err(CompileError::SignatureMismatch {
                    target: format!("{interface}.{GET_HASH}"),
                    detail: format!("takes no arguments, {} given", arg_types.len()),
                });
            }
            return Ok(Recognition::ContractHash(interface.hash()));
        }

        let mut declared: Vec<usize> = interface.overloads(method).map(|m| m.arity()).collect();
        if declared.is_empty() {
            return Err(CompileError::UnknownNativeMethod {
                interface: interface.name().to_string(),
                method: method.clone(),
            });
        }
        let signature = interface.find(method, arg_types.len()).ok_or_else(|| {
            declared.sort_unstable();
            CompileError::SignatureMismatch {
                target: format!("{interface}.{method}"),
                detail: format!(
                    "{} arguments given, declared arity {:?}",
                    arg_types.len(),
                    declared
                ),
            }
        })?;

        for (index, (actual, expected)) in arg_types.iter().zip(signature.parameters).enumerate() {
            if !actual.assignable_to(*expected) {
                return Err(CompileError::SignatureMismatch {
                    target: format!("{interface}.{method}"),
                    detail: format!("argument {index} is {actual}, expected {expected}"),
                });
            }
        }

        let call_flags = call
            .call_flags
            .unwrap_or_else(|| signature.default_token_flags());
        trace!(
            target: "neo::compiler",
            interface = interface.name(),
            method = signature.name,
            arity = signature.arity(),
            flags = %call_flags.describe(),
            "recognized native call"
        );
        Ok(Recognition::Native(NativeCandidate {
            interface,
            signature,
            call_flags,
        }))
    }
}
