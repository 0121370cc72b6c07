//! # neo-devpack
//!
//! Compiler and runtime halves of Neo N3 method tokens.
//!
//! A contract calls another contract's method through a *method token*: the
//! compiler records the callee (hash, method, arity, return flag, call flags)
//! once in the module's token table and emits `CALLT <index>` at each call
//! site. At run time the engine resolves the index back to a live native
//! method, checks permissions and marshals the arguments.
//!
//! ## Architecture
//!
//! - [`neo_io`] - binary wire format primitives
//! - [`neo_core`] - `UInt160` and contract parameter types
//! - [`neo_vm`] - opcodes, script builder, call flags, execution engine
//! - [`neo_smart_contract`] - NEF modules, native interfaces, resolver,
//!   marshaller and `ApplicationEngine`
//! - [`neo_compiler`] - call-site recognition, token table, emission
//!
//! ## Quick Start
//!
//! ```rust
//! use neo_devpack::prelude::*;
//! use std::sync::Arc;
//!
//! let source = ContractSource::new("Fees").with_method(
//!     MethodDecl::new("fee", ContractParameterType::Integer)
//!         .returning(Expr::native("PolicyContract", "getFeePerByte", vec![])),
//! );
//! let unit = Compiler::default().compile(&source)?;
//!
//! let registry = NativeRegistry::with_declared_natives();
//! registry.register(
//!     DeclaredContract::from_interface(NativeInterface::Policy)
//!         .with_constant("getFeePerByte", 0, StackItem::from(1000i64)),
//! );
//! let mut engine = ApplicationEngine::new(
//!     Arc::new(unit.nef),
//!     Arc::new(registry),
//!     CallContext::new(UInt160::ZERO, CallFlags::ALL),
//! )?;
//! let outcome = engine.execute(0, Vec::new());
//! assert!(outcome.is_halt());
//! assert_eq!(outcome.stack, vec![StackItem::from(1000i64)]);
//! # Ok::<(), neo_devpack::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub use neo_compiler as compiler;
pub use neo_core as core;
pub use neo_io as io;
pub use neo_smart_contract as smart_contract;
pub use neo_vm as vm;

use thiserror::Error;

/// Common imports for contract tooling
pub mod prelude {
    pub use crate::compiler::ast::{ContractSource, Expr, MethodDecl, Statement};
    pub use crate::compiler::{CompilationUnit, Compiler, CompilerConfig};
    pub use crate::core::{ContractParameterType, UInt160};
    pub use crate::smart_contract::{
        ApplicationEngine, CallContext, DeclaredContract, ExecutionOutcome, GasMeter,
        MethodToken, NativeInterface, NativeRegistry, NefFile, ResolverOptions, TokenResolver,
    };
    pub use crate::vm::{CallFlags, StackItem, VMState};
    pub use crate::{Error, Result};
}

/// Any error raised across the toolkit.
#[derive(Debug, Error)]
pub enum Error {
    /// Compilation failed.
    #[error(transparent)]
    Compile(#[from] neo_compiler::CompileError),

    /// Module layout or checksum violation.
    #[error(transparent)]
    Module(#[from] neo_smart_contract::NefError),

    /// Runtime fault while resolving or invoking a token.
    #[error(transparent)]
    Contract(#[from] neo_smart_contract::ContractError),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] neo_compiler::ConfigError),
}

/// Result type for toolkit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Toolkit version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
