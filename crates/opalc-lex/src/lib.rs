//! opalc-lex - Lexical analyzer for the Opal language.
//!
//! The lexer is a single forward pass over the source bytes producing a
//! flat, ordered token stream. Each token carries its kind, its lexeme
//! (the matched substring; for strings, the content between the quotes)
//! and a byte span with a 0-based line number.
//!
//! Whitespace is never tokenized. Line comments become `COMMENT` tokens so
//! downstream dumps can show them; the parser skips them. Unrecognized
//! bytes produce one diagnostic each and are skipped, so lexing is total.
//!
//! Module layout:
//! - `cursor` - byte cursor with line tracking
//! - `token` - token kinds, keyword tables
//! - `lexer` - the scanner, split by token family

pub mod chars;
pub mod cursor;
pub mod lexer;
pub mod token;

pub use lexer::Lexer;
pub use token::{keyword_from_ident, Token, TokenKind};

use opalc_util::Handler;

/// Lexes the entire source into a token vector.
///
/// Never fails: lexical problems are reported through the handler and the
/// offending bytes skipped.
///
/// # Example
///
/// ```
/// use opalc_util::Handler;
///
/// let handler = Handler::new();
/// let tokens = opalc_lex::tokenize("fn main() i32 { return 0 }", &handler);
/// assert!(!tokens.is_empty());
/// assert!(!handler.has_errors());
/// ```
pub fn tokenize(source: &str, handler: &Handler) -> Vec<Token> {
    let mut lexer = Lexer::new(source, handler);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token() {
        tokens.push(token);
    }
    tokens
}
