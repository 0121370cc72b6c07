//! Per-invocation state: granted flags, gas and the optional binding cache.

use std::collections::HashMap;

use neo_core::UInt160;
use neo_vm::CallFlags;

use crate::{ContractError, ContractResult, ResolvedBinding};

/// Default execution fee factor, as set by the policy contract at genesis.
pub const DEFAULT_EXEC_FEE_FACTOR: i64 = 30;

/// Gas accounting for one execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasMeter {
    consumed: i64,
    limit: i64,
    exec_fee_factor: i64,
}

impl GasMeter {
    pub fn new(limit: i64) -> Self {
        Self::with_fee_factor(limit, DEFAULT_EXEC_FEE_FACTOR)
    }

    pub fn with_fee_factor(limit: i64, exec_fee_factor: i64) -> Self {
        Self {
            consumed: 0,
            limit,
            exec_fee_factor,
        }
    }

    /// A meter that never runs out.
    pub fn unlimited() -> Self {
        Self::with_fee_factor(i64::MAX, DEFAULT_EXEC_FEE_FACTOR)
    }

    pub fn consumed(&self) -> i64 {
        self.consumed
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn remaining(&self) -> i64 {
        self.limit - self.consumed
    }

    pub fn exec_fee_factor(&self) -> i64 {
        self.exec_fee_factor
    }

    /// Charges `cpu_fee` scaled by the fee factor. Nothing is consumed on failure.
    pub fn charge(&mut self, cpu_fee: i64) -> ContractResult<()> {
        let required = cpu_fee.saturating_mul(self.exec_fee_factor);
        if required > self.remaining() {
            return Err(ContractError::InsufficientGas {
                required,
                available: self.remaining(),
            });
        }
        self.consumed += required;
        Ok(())
    }
}

impl Default for GasMeter {
    fn default() -> Self {
        Self::unlimited()
    }
}

/// Bindings resolved within one context, keyed by token index.
///
/// Entries embed the owning context's permission intersection, so a cache is
/// never moved or copied to another context.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    bindings: HashMap<u16, ResolvedBinding>,
}

impl ResolutionCache {
    pub fn get(&self, token: u16) -> Option<&ResolvedBinding> {
        self.bindings.get(&token)
    }

    pub fn insert(&mut self, token: u16, binding: ResolvedBinding) {
        self.bindings.insert(token, binding);
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn clear(&mut self) {
        self.bindings.clear();
    }
}

/// The executing context's identity and capabilities.
#[derive(Debug)]
pub struct CallContext {
    caller: UInt160,
    granted: CallFlags,
    gas: GasMeter,
    cache: ResolutionCache,
}

impl CallContext {
    pub fn new(caller: UInt160, granted: CallFlags) -> Self {
        Self {
            caller,
            granted,
            gas: GasMeter::unlimited(),
            cache: ResolutionCache::default(),
        }
    }

    pub fn with_gas(mut self, gas: GasMeter) -> Self {
        self.gas = gas;
        self
    }

    pub fn caller(&self) -> UInt160 {
        self.caller
    }

    pub fn granted(&self) -> CallFlags {
        self.granted
    }

    /// Replaces the granted flags and drops bindings computed under the old ones.
    pub fn set_granted(&mut self, granted: CallFlags) {
        if granted != self.granted {
            self.cache.clear();
        }
        self.granted = granted;
    }

    pub fn gas(&self) -> &GasMeter {
        &self.gas
    }

    pub fn gas_mut(&mut self) -> &mut GasMeter {
        &mut self.gas
    }

    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    pub(crate) fn cache_mut(&mut self) -> &mut ResolutionCache {
        &mut self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charge_scales_and_refuses_without_consuming() {
        let mut gas = GasMeter::with_fee_factor(1_000, 10);
        gas.charge(60).unwrap();
        assert_eq!(gas.consumed(), 600);

        let err = gas.charge(50).unwrap_err();
        assert_eq!(
            err,
            ContractError::InsufficientGas {
                required: 500,
                available: 400
            }
        );
        assert_eq!(gas.consumed(), 600);
        gas.charge(40).unwrap();
        assert_eq!(gas.remaining(), 0);
    }

    #[test]
    fn huge_fees_saturate_instead_of_wrapping() {
        let mut gas = GasMeter::with_fee_factor(100, 30);
        assert!(gas.charge(i64::MAX).is_err());
        assert_eq!(gas.consumed(), 0);

        let mut gas = GasMeter::unlimited();
        gas.charge(1 << 17).unwrap();
        assert_eq!(gas.consumed(), (1 << 17) * DEFAULT_EXEC_FEE_FACTOR);
    }
}
