//! Core primitive types for Neo modules.
//!
//! Exposes the 160-bit script hash used to address contracts and the
//! contract parameter type vocabulary shared by the compiler and the runtime.

pub mod contract_parameter_type;
pub mod error;
pub mod uint160;

pub use contract_parameter_type::ContractParameterType;
pub use error::{CoreError, CoreResult};
pub use uint160::{UInt160, UINT160_SIZE};
