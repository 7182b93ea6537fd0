//! Lexer module.
//!
//! The scanner is split into focused components:
//! - `core` - main `Lexer` struct and dispatch
//! - `identifier` - identifier and keyword lexing
//! - `number` - numeric literal lexing and suffix classification
//! - `string` - string literal lexing
//! - `operator` - compound and single-character operator lexing
//! - `comment` - line comment lexing

mod comment;
mod core;
mod identifier;
mod number;
mod operator;
mod string;

pub use core::Lexer;

#[cfg(test)]
mod props {
    use crate::token::TokenKind;
    use opalc_util::Handler;
    use proptest::prelude::*;

    proptest! {
        // Token starts are strictly increasing and each lexeme matches the
        // source slice it claims, except string literals whose span excludes
        // the surrounding quotes by construction (the lexeme still equals
        // the slice) and may be empty.
        #[test]
        fn spans_are_ordered_and_faithful(source in "[ -~\n\t]{0,120}") {
            let handler = Handler::new();
            let tokens = crate::tokenize(&source, &handler);

            let mut prev_start = None;
            for token in &tokens {
                prop_assert!(token.span.start <= token.span.end);
                prop_assert!(token.span.end <= source.len());
                prop_assert_eq!(
                    &source[token.span.start..token.span.end],
                    token.lexeme.as_str()
                );
                if token.kind != TokenKind::Str {
                    prop_assert!(!token.lexeme.is_empty());
                }
                if let Some(prev) = prev_start {
                    prop_assert!(token.span.start > prev);
                }
                prev_start = Some(token.span.start);
            }
        }

        // A line counter that increments exactly on `\n` and `\r` agrees
        // with the line recorded on each token.
        #[test]
        fn line_numbers_match_breaks(source in "[a-z0-9+\n ]{0,80}") {
            let handler = Handler::new();
            let tokens = crate::tokenize(&source, &handler);

            for token in &tokens {
                let expected = source[..token.span.start]
                    .bytes()
                    .filter(|&b| b == b'\n' || b == b'\r')
                    .count() as u32;
                prop_assert_eq!(token.span.line, expected);
            }
        }
    }
}
