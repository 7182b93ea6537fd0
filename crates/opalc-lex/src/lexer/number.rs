//! Numeric literal lexing.
//!
//! Only decimal literals exist. The scanned run covers digits, the decimal
//! point, and the suffix letters `f`, `u`, `i`; classification looks at the
//! run as text. Conversion to a value happens in the parser.

use crate::chars::continues_digit;
use crate::token::{Token, TokenKind};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes a numeric literal.
    ///
    /// Classification rules, applied in order so later matches override:
    /// a `.` anywhere or an `f32` suffix makes a `FLOAT32`, an `f64` suffix
    /// a `FLOAT64`; `u64`/`i64` suffixes make an `INTEGER64`; every other
    /// suffix (and no suffix) stays `INTEGER32`.
    pub(crate) fn lex_number(&mut self) -> Token {
        while let Some(b) = self.cursor.current() {
            if !continues_digit(b) {
                break;
            }
            self.cursor.advance();
        }

        let text = self.cursor.slice_from(self.span().start);

        let mut kind = TokenKind::Integer32;
        if text.contains('.') {
            kind = TokenKind::Float32;
        }
        if text.ends_with("f32") {
            kind = TokenKind::Float32;
        }
        if text.ends_with("f64") {
            kind = TokenKind::Float64;
        }
        if text.ends_with("u8") || text.ends_with("u16") || text.ends_with("u32") {
            kind = TokenKind::Integer32;
        }
        if text.ends_with("u64") {
            kind = TokenKind::Integer64;
        }
        if text.ends_with("i8") || text.ends_with("i16") || text.ends_with("i32") {
            kind = TokenKind::Integer32;
        }
        if text.ends_with("i64") {
            kind = TokenKind::Integer64;
        }

        self.token(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opalc_util::Handler;

    fn lex_num(source: &str) -> Token {
        let handler = Handler::new();
        let mut lexer = Lexer::new(source, &handler);
        lexer.next_token().expect("expected a token")
    }

    #[test]
    fn test_bare_integer() {
        let token = lex_num("42");
        assert_eq!(token.kind, TokenKind::Integer32);
        assert_eq!(token.lexeme, "42");
    }

    #[test]
    fn test_float_by_decimal_point() {
        assert_eq!(lex_num("3.14").kind, TokenKind::Float32);
    }

    #[test]
    fn test_float_suffixes() {
        assert_eq!(lex_num("1f32").kind, TokenKind::Float32);
        assert_eq!(lex_num("1f64").kind, TokenKind::Float64);
        assert_eq!(lex_num("2.5f64").kind, TokenKind::Float64);
    }

    #[test]
    fn test_wide_integer_suffixes() {
        assert_eq!(lex_num("7u64").kind, TokenKind::Integer64);
        assert_eq!(lex_num("7i64").kind, TokenKind::Integer64);
    }

    #[test]
    fn test_narrow_integer_suffixes() {
        assert_eq!(lex_num("7u8").kind, TokenKind::Integer32);
        assert_eq!(lex_num("7u16").kind, TokenKind::Integer32);
        assert_eq!(lex_num("7u32").kind, TokenKind::Integer32);
        assert_eq!(lex_num("7i8").kind, TokenKind::Integer32);
        assert_eq!(lex_num("7i16").kind, TokenKind::Integer32);
        assert_eq!(lex_num("7i32").kind, TokenKind::Integer32);
    }

    #[test]
    fn test_suffix_is_part_of_lexeme() {
        assert_eq!(lex_num("10u64").lexeme, "10u64");
        assert_eq!(lex_num("1.5f32").lexeme, "1.5f32");
    }
}
