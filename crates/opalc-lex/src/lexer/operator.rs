//! Operator and punctuation lexing.

use crate::token::{Token, TokenKind};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes `==` or `=`.
    pub(crate) fn lex_equals(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.current() == Some(b'=') {
            self.cursor.advance();
            self.token(TokenKind::EqOp)
        } else {
            self.token(TokenKind::Equals)
        }
    }

    /// Lexes `!=` or `!`.
    pub(crate) fn lex_bang(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.current() == Some(b'=') {
            self.cursor.advance();
            self.token(TokenKind::NeOp)
        } else {
            self.token(TokenKind::Exclamation)
        }
    }

    /// Lexes a single-character punctuation or operator token.
    ///
    /// Returns `None` if the byte is not in the punctuation table, leaving
    /// the cursor untouched so dispatch can fall through to numbers.
    pub(crate) fn lex_punctuation(&mut self, b: u8) -> Option<Token> {
        let kind = match b {
            b'.' => TokenKind::Dot,
            b',' => TokenKind::Comma,
            b':' => TokenKind::Colon,
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'[' => TokenKind::LBracket,
            b']' => TokenKind::RBracket,
            b'{' => TokenKind::LCurly,
            b'}' => TokenKind::RCurly,
            b'<' => TokenKind::LeftAngle,
            b'>' => TokenKind::RightAngle,
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'*' => TokenKind::Star,
            b'/' => TokenKind::Slash,
            b'%' => TokenKind::Percent,
            b'|' => TokenKind::VerticalBar,
            b'^' => TokenKind::Caret,
            b'&' => TokenKind::Ampersand,
            b'~' => TokenKind::Tilde,
            _ => return None,
        };

        self.cursor.advance();
        Some(self.token(kind))
    }
}
