use std::sync::Arc;

use dashmap::DashMap;
use neo_core::UInt160;
use tracing::debug;

use super::{DeclaredContract, NativeContract, NativeInterface};
use crate::ContractProvider;

/// In-memory registry of the contracts reachable through `CALLT`.
#[derive(Default)]
pub struct NativeRegistry {
    contracts: DashMap<UInt160, Arc<dyn NativeContract>>,
}

impl NativeRegistry {
    pub fn new() -> Self {
        Self {
            contracts: DashMap::new(),
        }
    }

    /// Registry holding every declared native contract without business logic.
    ///
    /// Enough to verify modules; invocations fail as callee faults until a
    /// contract with handlers replaces the declaration.
    pub fn with_declared_natives() -> Self {
        let registry = Self::new();
        for interface in NativeInterface::ALL {
            registry.register(DeclaredContract::from_interface(interface));
        }
        registry
    }

    /// Registers `contract`, replacing any previous one with the same hash.
    pub fn register<C>(&self, contract: C)
    where
        C: NativeContract + 'static,
    {
        let hash = contract.hash();
        debug!(target: "neo::resolver", contract = contract.name(), %hash, "registered contract");
        self.contracts.insert(hash, Arc::new(contract));
    }

    pub fn unregister(&self, hash: &UInt160) -> bool {
        self.contracts.remove(hash).is_some()
    }

    pub fn get(&self, hash: &UInt160) -> Option<Arc<dyn NativeContract>> {
        self.contracts.get(hash).map(|c| Arc::clone(&c))
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }
}

impl ContractProvider for NativeRegistry {
    fn contract(&self, hash: &UInt160) -> Option<Arc<dyn NativeContract>> {
        self.get(hash)
    }
}

impl std::fmt::Debug for NativeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeRegistry")
            .field("contracts", &self.contracts.len())
            .finish()
    }
}
