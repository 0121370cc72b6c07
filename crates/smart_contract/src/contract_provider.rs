//! Lookup seam between the resolver and the host's deployment registry.

use std::sync::Arc;

use neo_core::UInt160;

use crate::native::NativeContract;

/// Authoritative source of live contracts.
///
/// Queried synchronously on every resolution; implementations must not hand
/// out state that depends on the caller.
pub trait ContractProvider: Send + Sync {
    fn contract(&self, hash: &UInt160) -> Option<Arc<dyn NativeContract>>;
}

impl<P: ContractProvider + ?Sized> ContractProvider for Arc<P> {
    fn contract(&self, hash: &UInt160) -> Option<Arc<dyn NativeContract>> {
        (**self).contract(hash)
    }
}
