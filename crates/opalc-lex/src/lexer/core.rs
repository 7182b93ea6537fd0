//! Core lexer implementation.
//!
//! This module contains the main `Lexer` struct and the per-byte dispatch.

use opalc_util::{DiagnosticBuilder, DiagnosticCode, Handler, Span};

use crate::chars;
use crate::cursor::Cursor;
use crate::token::{Token, TokenKind, PREFIX_KEYWORDS};

/// Lexer for the Opal language.
///
/// Transforms source text into a stream of tokens via [`Lexer::next_token`].
/// Dispatch order matters and mirrors the scanner's historical behavior:
/// line breaks, inline whitespace, comments, strings, the prefix keyword
/// table, identifiers, the two-character operators `==`/`!=`, single
/// punctuation, and finally numbers.
pub struct Lexer<'a> {
    /// Byte cursor over the source.
    pub cursor: Cursor<'a>,

    /// Diagnostic sink for lexical errors.
    pub handler: &'a Handler,

    /// Starting byte offset of the current token.
    token_start: usize,

    /// Line number where the current token starts (0-based).
    token_start_line: u32,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer over the given source.
    pub fn new(source: &'a str, handler: &'a Handler) -> Self {
        Self {
            cursor: Cursor::new(source),
            handler,
            token_start: 0,
            token_start_line: 0,
        }
    }

    /// Returns the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Option<Token> {
        loop {
            let b = self.cursor.current()?;

            if chars::is_line_break(b) {
                self.cursor.advance();
                continue;
            }

            if chars::is_inline_whitespace(b) {
                self.cursor.advance();
                continue;
            }

            self.token_start = self.cursor.position();
            self.token_start_line = self.cursor.line();

            if b == b'/' && self.cursor.peek(1) == Some(b'/') {
                return Some(self.lex_comment());
            }

            if b == b'"' {
                return Some(self.lex_string());
            }

            if let Some(token) = self.lex_prefix_keyword() {
                return Some(token);
            }

            if chars::starts_identifier(b) {
                return Some(self.lex_identifier());
            }

            if b == b'=' {
                return Some(self.lex_equals());
            }
            if b == b'!' {
                return Some(self.lex_bang());
            }

            if let Some(token) = self.lex_punctuation(b) {
                return Some(token);
            }

            if b.is_ascii_digit() {
                return Some(self.lex_number());
            }

            self.cursor.advance();
            self.report_error(
                format!("unrecognized character '{}' (ignoring)", b as char),
                DiagnosticCode::E_LEXER_UNEXPECTED_CHAR,
            );
        }
    }

    /// Tries the raw prefix keyword table.
    ///
    /// No boundary check follows the match: `ifoo` lexes as `if` + `oo`.
    fn lex_prefix_keyword(&mut self) -> Option<Token> {
        for &(word, kind) in PREFIX_KEYWORDS {
            if self.cursor.starts_with(word) {
                self.cursor.advance_bytes(word.len());
                return Some(self.token(kind));
            }
        }
        None
    }

    /// Builds a token whose lexeme is the source from the token start to
    /// the current cursor position.
    pub(crate) fn token(&self, kind: TokenKind) -> Token {
        let lexeme = self.cursor.slice_from(self.token_start);
        Token::new(kind, lexeme, self.span())
    }

    /// Span from the token start to the current cursor position.
    pub(crate) fn span(&self) -> Span {
        Span::new(
            self.token_start,
            self.cursor.position(),
            self.token_start_line,
        )
    }

    /// Reports a lexical error at the current token position.
    pub(crate) fn report_error(&mut self, message: String, code: DiagnosticCode) {
        DiagnosticBuilder::error(message)
            .code(code)
            .span(self.span())
            .emit(self.handler);
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let handler = Handler::new();
        tokenize(source, &handler).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_function_header() {
        assert_eq!(
            kinds("fn main() i32 {"),
            vec![
                TokenKind::KeywordFn,
                TokenKind::Identifier,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::KeywordInt32,
                TokenKind::LCurly,
            ]
        );
    }

    #[test]
    fn test_whitespace_produces_no_tokens() {
        assert!(kinds("  \t \n \r\n ").is_empty());
    }

    #[test]
    fn test_prefix_keyword_has_no_boundary() {
        // Historical pitfall: `ifoo` is `if` followed by the identifier `oo`.
        assert_eq!(kinds("ifoo"), vec![TokenKind::KeywordIf, TokenKind::Identifier]);
        assert_eq!(kinds("truex"), vec![TokenKind::KeywordTrue, TokenKind::Identifier]);
    }

    #[test]
    fn test_type_keywords_respect_boundaries() {
        assert_eq!(kinds("i32"), vec![TokenKind::KeywordInt32]);
        assert_eq!(kinds("i32x"), vec![TokenKind::Identifier]);
        assert_eq!(kinds("structs"), vec![TokenKind::Identifier]);
    }

    #[test]
    fn test_unrecognized_byte_is_skipped() {
        let handler = Handler::new();
        let tokens = tokenize("a @ b", &handler);
        assert_eq!(tokens.len(), 2);
        assert_eq!(handler.error_count(), 1);
    }

    #[test]
    fn test_token_spans_match_source() {
        let source = "fn add(a: i32)";
        let handler = Handler::new();
        for token in tokenize(source, &handler) {
            assert_eq!(&source[token.span.start..token.span.end], token.lexeme);
        }
    }

    #[test]
    fn test_line_numbers() {
        let handler = Handler::new();
        let tokens = tokenize("a\nb\nc", &handler);
        let lines: Vec<u32> = tokens.iter().map(|t| t.span.line).collect();
        assert_eq!(lines, vec![0, 1, 2]);
    }

    #[test]
    fn test_iterator() {
        let handler = Handler::new();
        let lexer = Lexer::new("a b c", &handler);
        assert_eq!(lexer.count(), 3);
    }
}
