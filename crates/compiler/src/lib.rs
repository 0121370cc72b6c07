//! # Neo Compiler
//!
//! Compile-time half of the method-token subsystem. Takes a contract in the
//! serde IR of [`ast`] and produces a [`NefFile`](neo_smart_contract::NefFile):
//!
//! 1. [`CallSiteRecognizer`] decides whether a call targets a native contract
//!    and checks it against the declared signature.
//! 2. [`TokenTableBuilder`] interns each distinct token in first-seen order.
//! 3. [`Emitter`] writes the argument pushes, the reversal that marks the
//!    call's arity and the `CALLT` carrying the token index.
//! 4. [`Compiler`] lays out methods, patches local calls and serializes the
//!    module.
//!
//! ```rust
//! use neo_compiler::{ast::*, Compiler};
//!
//! let source = ContractSource::new("Fees").with_method(
//!     MethodDecl::new("fee", ContractParameterType::Integer)
//!         .returning(Expr::native("PolicyContract", "getFeePerByte", vec![])),
//! );
//! let unit = Compiler::default().compile(&source).unwrap();
//! assert_eq!(unit.nef.tokens.len(), 1);
//! assert_eq!(unit.nef.tokens[0].method, "getFeePerByte");
//! ```

pub mod ast;
pub mod compiler;
pub mod config;
pub mod emitter;
pub mod error;
pub mod recognizer;
pub mod token_table;
pub mod typing;

pub use compiler::{CompilationUnit, Compiler, MethodInfo};
pub use config::{CompilerConfig, ConfigError, LoggingConfig};
pub use emitter::{CallSite, Emitter};
pub use error::{CompileError, CompileResult};
pub use recognizer::{CallSiteRecognizer, NativeCandidate, Recognition};
pub use token_table::TokenTableBuilder;
pub use typing::ExprType;
