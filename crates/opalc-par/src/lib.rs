//! opalc-par - Recursive-descent parser for the Opal language.
//!
//! The parser consumes the token stream left to right with a single cursor
//! and builds an AST whose nodes live in an arena owned by the resulting
//! [`Ast`]; children are [`NodeId`] index handles, never owning pointers.
//!
//! Infix operators are recognized *after* their left operand has already
//! been parsed: when the dispatch loop lands on an operator token it pops
//! the most recently allocated node and wraps it in a `Binary` node. This
//! gives strict left-to-right grouping with no operator precedence, which
//! is the language's defined behavior.
//!
//! Running out of tokens mid-production is an ordinary condition: the
//! cursor primitives return an end-of-stream sentinel that unwinds to
//! [`Parser::parse`], which returns the roots accumulated so far. A
//! malformed required shape (missing `(`, missing function name, ...) is a
//! fatal [`ParseError`] instead.

pub mod ast;
pub mod parser;
pub mod print;

pub use ast::{Ast, IfArm, Node, NodeId, NumberValue};
pub use parser::{ParseError, Parser};
pub use print::render;
