//! opalc-util - Foundation types shared by every compiler phase.
//!
//! This crate holds the pieces that do not belong to any single phase:
//! source spans, the diagnostic infrastructure, and the hash map flavor
//! used for compiler-internal tables.

pub mod diagnostic;
pub mod span;

pub use diagnostic::{Diagnostic, DiagnosticBuilder, DiagnosticCode, Handler, Level};
pub use span::Span;

// Re-export commonly used types
pub use rustc_hash::FxHashMap;
pub use rustc_hash::FxHashSet;
