//! String literal lexing.
//!
//! Strings are double-quoted with no escape sequences: the content is
//! everything up to the next `"`. The token's lexeme and span cover the
//! content only, not the quotes.

use crate::token::{Token, TokenKind};
use crate::Lexer;
use opalc_util::{DiagnosticCode, Span};

impl<'a> Lexer<'a> {
    /// Lexes a string literal, cursor positioned at the opening quote.
    pub(crate) fn lex_string(&mut self) -> Token {
        let line = self.span().line;

        self.cursor.advance(); // opening quote
        let content_start = self.cursor.position();

        while let Some(b) = self.cursor.current() {
            if b == b'"' {
                break;
            }
            self.cursor.advance();
        }

        let content = self.cursor.slice_from(content_start).to_string();
        let span = Span::new(content_start, self.cursor.position(), line);

        if self.cursor.is_at_end() {
            self.report_error(
                "unterminated string literal".to_string(),
                DiagnosticCode::E_LEXER_UNTERMINATED_STRING,
            );
        } else {
            self.cursor.advance(); // closing quote
        }

        Token::new(TokenKind::Str, content, span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opalc_util::Handler;

    fn lex_str(source: &str) -> Token {
        let handler = Handler::new();
        let mut lexer = Lexer::new(source, &handler);
        lexer.next_token().expect("expected a token")
    }

    #[test]
    fn test_simple_string() {
        let token = lex_str("\"hello\"");
        assert_eq!(token.kind, TokenKind::Str);
        assert_eq!(token.lexeme, "hello");
    }

    #[test]
    fn test_span_excludes_quotes() {
        let token = lex_str("\"hi\"");
        assert_eq!(token.span.start, 1);
        assert_eq!(token.span.end, 3);
    }

    #[test]
    fn test_empty_string() {
        let token = lex_str("\"\"");
        assert_eq!(token.lexeme, "");
        assert!(token.span.is_empty());
    }

    #[test]
    fn test_no_escape_processing() {
        let token = lex_str("\"a\\n\"");
        assert_eq!(token.lexeme, "a\\n");
    }

    #[test]
    fn test_unterminated_string() {
        let handler = Handler::new();
        let mut lexer = Lexer::new("\"oops", &handler);
        let token = lexer.next_token().expect("expected a token");
        assert_eq!(token.lexeme, "oops");
        assert!(handler.has_errors());
    }

    #[test]
    fn test_tokens_continue_after_string() {
        let handler = Handler::new();
        let tokens = crate::tokenize("\"hi\" x", &handler);
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
    }
}
