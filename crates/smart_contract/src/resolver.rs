//! Maps a `CALLT` token index to a live, permission-checked binding.

use std::sync::Arc;

use neo_vm::CallFlags;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::{
    native::{MethodSignature, NativeContract},
    CallContext, ContractError, ContractProvider, ContractResult, MethodToken, NefFile,
};

/// Tuning knobs for [`TokenResolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverOptions {
    /// Reuse bindings within a single [`CallContext`].
    pub cache_bindings: bool,
}

/// A token turned into a callable target. Lives for one call.
#[derive(Clone)]
pub struct ResolvedBinding {
    pub token_index: u16,
    pub token: MethodToken,
    pub contract: Arc<dyn NativeContract>,
    pub method: MethodSignature,
    /// Caller flags intersected with token flags, narrowed further for safe methods.
    pub effective_flags: CallFlags,
}

impl ResolvedBinding {
    pub fn arity(&self) -> usize {
        self.method.arity()
    }

    pub fn has_return_value(&self) -> bool {
        self.token.has_return_value
    }
}

impl std::fmt::Debug for ResolvedBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedBinding")
            .field("token_index", &self.token_index)
            .field("contract", &self.contract.name())
            .field("method", &self.method.name)
            .field("arity", &self.method.arity())
            .field("effective_flags", &self.effective_flags)
            .finish()
    }
}

/// Resolves tokens against an authoritative [`ContractProvider`].
///
/// Resolution reads the module and the provider and nothing else; a failed
/// resolution leaves no trace.
pub struct TokenResolver {
    provider: Arc<dyn ContractProvider>,
    options: ResolverOptions,
}

impl TokenResolver {
    pub fn new(provider: Arc<dyn ContractProvider>) -> Self {
        Self::with_options(provider, ResolverOptions::default())
    }

    pub fn with_options(provider: Arc<dyn ContractProvider>, options: ResolverOptions) -> Self {
        Self { provider, options }
    }

    pub fn options(&self) -> ResolverOptions {
        self.options
    }

    /// Resolves token `index` of `module` for a caller holding `caller_flags`.
    pub fn resolve(
        &self,
        module: &NefFile,
        index: usize,
        caller_flags: CallFlags,
    ) -> ContractResult<ResolvedBinding> {
        let out_of_range = || ContractError::TokenIndexOutOfRange {
            index,
            len: module.tokens.len(),
        };
        let token = module.token(index).ok_or_else(out_of_range)?;
        // CALLT operands are u16; a wider index cannot name a call site.
        let token_index = u16::try_from(index).map_err(|_| out_of_range())?;

        let contract = self
            .provider
            .contract(&token.hash)
            .ok_or(ContractError::ContractNotFound { hash: token.hash })?;

        let method = *contract
            .find_method(&token.method, token.parameters_count as usize)
            .ok_or_else(|| ContractError::MethodNotFound {
                contract: contract.name().to_string(),
                method: token.method.clone(),
                arity: token.parameters_count as usize,
            })?;
        if token.has_return_value != method.has_return_value() {
            return Err(ContractError::ReturnValueMismatch {
                method: token.method.clone(),
                declared: token.has_return_value,
                actual: method.return_type,
            });
        }

        let mut effective = caller_flags & token.call_flags;
        if method.safe {
            effective.remove(CallFlags::WRITE_STATES | CallFlags::ALLOW_NOTIFY);
        }
        if !effective.contains(method.required_flags) {
            warn!(
                target: "neo::resolver",
                token = index,
                method = method.name,
                required = %method.required_flags.describe(),
                effective = %effective.describe(),
                "permission denied"
            );
            return Err(ContractError::PermissionDenied {
                method: token.method.clone(),
                required: method.required_flags,
                effective,
            });
        }

        trace!(
            target: "neo::resolver",
            token = index,
            contract = contract.name(),
            method = method.name,
            flags = %effective.describe(),
            "resolved"
        );
        Ok(ResolvedBinding {
            token_index,
            token: token.clone(),
            contract,
            method,
            effective_flags: effective,
        })
    }

    /// Resolves within `ctx`, consulting its cache when caching is enabled.
    pub fn resolve_in(
        &self,
        module: &NefFile,
        index: u16,
        ctx: &mut CallContext,
    ) -> ContractResult<ResolvedBinding> {
        if self.options.cache_bindings {
            if let Some(binding) = ctx.cache().get(index) {
                return Ok(binding.clone());
            }
        }
        let binding = self.resolve(module, index as usize, ctx.granted())?;
        if self.options.cache_bindings {
            ctx.cache_mut().insert(index, binding.clone());
        }
        Ok(binding)
    }

    /// Resolves every token of `module`, in table order.
    pub fn resolve_all(
        &self,
        module: &NefFile,
        caller_flags: CallFlags,
    ) -> Vec<ContractResult<ResolvedBinding>> {
        (0..module.tokens.len())
            .map(|index| self.resolve(module, index, caller_flags))
            .collect()
    }
}

impl std::fmt::Debug for TokenResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResolver")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FaultKind, NativeInterface, NativeRegistry};
    use neo_core::UInt160;
    use proptest::prelude::*;

    fn token(iface: NativeInterface, method: &str, params: u16, ret: bool, flags: CallFlags) -> MethodToken {
        MethodToken::new(iface.hash(), method, params, ret, flags).unwrap()
    }

    fn module() -> NefFile {
        NefFile::new(
            "test",
            "",
            vec![
                token(NativeInterface::Policy, "getFeePerByte", 0, true, CallFlags::READ_ONLY),
                token(NativeInterface::Gas, "totalSupply", 0, true, CallFlags::READ_ONLY),
                token(NativeInterface::Neo, "transfer", 4, true, CallFlags::ALL),
            ],
            vec![0x40],
        )
        .unwrap()
    }

    fn resolver() -> TokenResolver {
        TokenResolver::new(Arc::new(NativeRegistry::with_declared_natives()))
    }

    #[test]
    fn resolves_declared_tokens() {
        let binding = resolver().resolve(&module(), 1, CallFlags::ALL).unwrap();
        assert_eq!(binding.contract.name(), "GasToken");
        assert_eq!(binding.method.name, "totalSupply");
        assert_eq!(binding.effective_flags, CallFlags::READ_ONLY);
        assert!(binding.has_return_value());
    }

    #[test]
    fn out_of_range_is_module_corruption() {
        let err = resolver().resolve(&module(), 5, CallFlags::ALL).unwrap_err();
        assert_eq!(err, ContractError::TokenIndexOutOfRange { index: 5, len: 3 });
        assert_eq!(err.kind(), FaultKind::ModuleCorruption);
    }

    #[test]
    fn index_beyond_callt_operand_is_rejected() {
        let mut nef = module();
        let filler = nef.tokens[0].clone();
        nef.tokens.resize(usize::from(u16::MAX) + 2, filler);
        let len = nef.tokens.len();

        let err = resolver().resolve(&nef, len - 1, CallFlags::ALL).unwrap_err();
        assert_eq!(err, ContractError::TokenIndexOutOfRange { index: len - 1, len });
        let binding = resolver()
            .resolve(&nef, usize::from(u16::MAX), CallFlags::ALL)
            .unwrap();
        assert_eq!(binding.token_index, u16::MAX);
    }

    #[test]
    fn missing_contract_and_method() {
        let mut nef = module();
        nef.tokens[0].hash = UInt160::from_le_array([9; 20]);
        let err = resolver().resolve(&nef, 0, CallFlags::ALL).unwrap_err();
        assert!(matches!(err, ContractError::ContractNotFound { .. }));

        let mut nef = module();
        nef.tokens[0].parameters_count = 1;
        let err = resolver().resolve(&nef, 0, CallFlags::ALL).unwrap_err();
        assert!(matches!(err, ContractError::MethodNotFound { arity: 1, .. }));
        assert_eq!(err.kind(), FaultKind::ModuleCorruption);

        let mut nef = module();
        nef.tokens[0].has_return_value = false;
        let err = resolver().resolve(&nef, 0, CallFlags::ALL).unwrap_err();
        assert!(matches!(err, ContractError::ReturnValueMismatch { .. }));
    }

    #[test]
    fn write_call_needs_write_flags() {
        let err = resolver()
            .resolve(&module(), 2, CallFlags::READ_ONLY)
            .unwrap_err();
        assert_eq!(err.kind(), FaultKind::Permission);
        assert!(resolver().resolve(&module(), 2, CallFlags::ALL).is_ok());
    }

    #[test]
    fn safe_methods_never_gain_write_flags() {
        let mut nef = module();
        nef.tokens[0].call_flags = CallFlags::ALL;
        let binding = resolver().resolve(&nef, 0, CallFlags::ALL).unwrap();
        assert_eq!(binding.effective_flags, CallFlags::READ_ONLY);
    }

    #[test]
    fn cache_is_opt_in_and_per_context() {
        let nef = module();
        let plain = resolver();
        let mut ctx = CallContext::new(UInt160::ZERO, CallFlags::ALL);
        plain.resolve_in(&nef, 0, &mut ctx).unwrap();
        assert!(ctx.cache().is_empty());

        let cached = TokenResolver::with_options(
            Arc::new(NativeRegistry::with_declared_natives()),
            ResolverOptions { cache_bindings: true },
        );
        cached.resolve_in(&nef, 2, &mut ctx).unwrap();
        assert_eq!(ctx.cache().len(), 1);

        ctx.set_granted(CallFlags::READ_ONLY);
        assert!(ctx.cache().is_empty());
        let err = cached.resolve_in(&nef, 2, &mut ctx).unwrap_err();
        assert_eq!(err.kind(), FaultKind::Permission);

        let mut other = CallContext::new(UInt160::ZERO, CallFlags::READ_ONLY);
        assert!(cached.resolve_in(&nef, 2, &mut other).is_err());
    }

    proptest! {
        #[test]
        fn never_resolves_outside_the_table(index in 3usize..10_000, caller in 0u8..16) {
            let flags = CallFlags::from_byte(caller).unwrap();
            let err = resolver().resolve(&module(), index, flags).unwrap_err();
            prop_assert_eq!(err, ContractError::TokenIndexOutOfRange { index, len: 3 });
        }

        #[test]
        fn effective_flags_stay_within_both_sets(caller in 0u8..16, declared in 0u8..16) {
            let caller = CallFlags::from_byte(caller).unwrap();
            let mut nef = module();
            nef.tokens[2].call_flags = CallFlags::from_byte(declared).unwrap();
            match resolver().resolve(&nef, 2, caller) {
                Ok(binding) => {
                    prop_assert!(caller.contains(binding.effective_flags));
                    prop_assert!(nef.tokens[2].call_flags.contains(binding.effective_flags));
                    prop_assert_eq!(binding.effective_flags, CallFlags::ALL);
                }
                Err(err) => prop_assert_eq!(err.kind(), FaultKind::Permission),
            }
        }
    }
}
