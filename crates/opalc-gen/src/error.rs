//! Error types for LLVM code generation.

use thiserror::Error;

/// Error type for LLVM code generation
#[derive(Debug, Error)]
pub enum CodeGenError {
    /// Identifier not bound in the current function
    #[error("unknown variable name '{0}'")]
    UnknownVariable(String),

    /// Callee missing from the module
    #[error("function '{0}' not found")]
    FunctionNotFound(String),

    /// Call with the wrong number of arguments
    #[error("function '{name}' expects {expected} arguments, got {found}")]
    ArityMismatch {
        name: String,
        expected: u32,
        found: u32,
    },

    /// Type name with no LLVM translation
    #[error("unknown type name '{0}'")]
    UnknownType(String),

    /// Operator with no lowering
    #[error("unsupported operator `{0}`")]
    UnsupportedOperator(&'static str),

    /// Integer/float operand mix without a conversion rule
    #[error("operands of `{0}` have mismatched types")]
    MixedOperands(&'static str),

    /// Return lists hold at most one value
    #[error("a function may declare at most one return value")]
    MultiValueReturn,

    /// `else` and multi-arm chains are reserved
    #[error("else branches are not supported yet")]
    ElseNotSupported,

    /// Builder used outside a function body
    #[error("no insertion block for expression")]
    MissingInsertBlock,

    /// Expression produced no usable value
    #[error("no value produced for {0}")]
    NoValue(String),

    /// LLVM builder failure
    #[error("llvm builder error: {0}")]
    Builder(#[from] inkwell::builder::BuilderError),

    /// Internal error - indicates a bug
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias for code generation operations
pub type Result<T> = std::result::Result<T, CodeGenError>;
