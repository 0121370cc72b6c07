//! # Neo Smart Contract
//!
//! Runtime half of the method-token subsystem:
//!
//! - [`nef`]: the NEF3 module format, including the method-token table
//! - [`native`]: the closed set of native-contract interface declarations and
//!   the in-process contract registry
//! - [`TokenResolver`]: maps a `CALLT` token index to a permission-checked binding
//! - [`InvocationMarshaller`]: moves arguments and results between the VM stack
//!   and the callee
//! - [`ApplicationEngine`]: drives a script in `neo-vm` and services its `CALLT`s

pub mod application_engine;
pub mod context;
pub mod contract_provider;
pub mod error;
pub mod marshaller;
pub mod native;
pub mod nef;
pub mod resolver;

pub use application_engine::{ApplicationEngine, CallRecord, CallState, ExecutionOutcome};
pub use context::{CallContext, GasMeter, ResolutionCache};
pub use contract_provider::ContractProvider;
pub use error::{ContractError, ContractResult, FaultKind};
pub use marshaller::{InvocationFrame, InvocationMarshaller};
pub use native::{
    DeclaredContract, MethodSignature, NativeCall, NativeContract, NativeInterface,
    NativeRegistry,
};
pub use nef::{MethodToken, NefError, NefFile};
pub use resolver::{ResolvedBinding, ResolverOptions, TokenResolver};
