//! Identifier and keyword lexing.

use crate::chars::continues_identifier;
use crate::token::{keyword_from_ident, Token, TokenKind};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes an identifier or a full-lexeme keyword.
    ///
    /// Consumes the maximal run of letters, digits and underscores. If the
    /// whole run matches an entry in the keyword table (type keywords,
    /// `struct`, `else`, ...) the keyword kind is emitted, otherwise
    /// `IDENTIFIER`.
    pub(crate) fn lex_identifier(&mut self) -> Token {
        while let Some(b) = self.cursor.current() {
            if !continues_identifier(b) {
                break;
            }
            self.cursor.advance();
        }

        let text = self.cursor.slice_from(self.span().start);
        let kind = keyword_from_ident(text).unwrap_or(TokenKind::Identifier);
        self.token(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opalc_util::Handler;

    fn lex_one(source: &str) -> Token {
        let handler = Handler::new();
        let mut lexer = Lexer::new(source, &handler);
        lexer.next_token().expect("expected a token")
    }

    #[test]
    fn test_simple_identifier() {
        let token = lex_one("main");
        assert_eq!(token.kind, TokenKind::Identifier);
        assert_eq!(token.lexeme, "main");
    }

    #[test]
    fn test_identifier_with_underscore_and_digits() {
        let token = lex_one("_foo_123");
        assert_eq!(token.kind, TokenKind::Identifier);
        assert_eq!(token.lexeme, "_foo_123");
    }

    #[test]
    fn test_type_keywords() {
        assert_eq!(lex_one("u8").kind, TokenKind::KeywordUint8);
        assert_eq!(lex_one("u64").kind, TokenKind::KeywordUint64);
        assert_eq!(lex_one("i8").kind, TokenKind::KeywordInt8);
        assert_eq!(lex_one("i64").kind, TokenKind::KeywordInt64);
        assert_eq!(lex_one("f32").kind, TokenKind::KeywordFloat32);
        assert_eq!(lex_one("f64").kind, TokenKind::KeywordFloat64);
        assert_eq!(lex_one("bool").kind, TokenKind::KeywordBool);
        assert_eq!(lex_one("string").kind, TokenKind::KeywordString);
        assert_eq!(lex_one("void").kind, TokenKind::KeywordVoid);
    }

    #[test]
    fn test_item_keywords() {
        assert_eq!(lex_one("struct").kind, TokenKind::KeywordStruct);
        assert_eq!(lex_one("enum").kind, TokenKind::KeywordEnum);
        assert_eq!(lex_one("var").kind, TokenKind::KeywordVar);
        assert_eq!(lex_one("while").kind, TokenKind::KeywordWhile);
        assert_eq!(lex_one("else").kind, TokenKind::KeywordElse);
        assert_eq!(lex_one("sizeof").kind, TokenKind::KeywordSizeof);
    }

    #[test]
    fn test_prefix_keywords() {
        assert_eq!(lex_one("fn").kind, TokenKind::KeywordFn);
        assert_eq!(lex_one("return").kind, TokenKind::KeywordReturn);
        assert_eq!(lex_one("if").kind, TokenKind::KeywordIf);
        assert_eq!(lex_one("extern").kind, TokenKind::KeywordExtern);
        assert_eq!(lex_one("true").kind, TokenKind::KeywordTrue);
        assert_eq!(lex_one("false").kind, TokenKind::KeywordFalse);
    }
}
