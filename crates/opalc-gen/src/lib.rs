//! opalc-gen - LLVM IR code generation for the Opal compiler.
//!
//! Walks the AST once and emits LLVM IR through a single module and a
//! single IR builder, both owned by the [`CodeGen`] context value together
//! with the two symbol tables (per-function named values, module-global
//! struct types). Generation runs two ordered passes: declarations first so
//! forward references resolve, then definitions.
//!
//! The module is serialized to text only after it is fully built; the
//! output file handle is never opened earlier.

pub mod error;
pub mod llvm;
pub mod types;

pub use error::{CodeGenError, Result};
pub use llvm::CodeGen;
