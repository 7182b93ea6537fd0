//! Line comment lexing.
//!
//! Comments run from `//` to just before the next line break (or to end of
//! input) and are emitted as trivia tokens rather than skipped, so the
//! driver's token dump can show them. The parser ignores them.

use crate::chars::is_line_break;
use crate::token::{Token, TokenKind};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes a `//` comment, cursor positioned at the first slash.
    pub(crate) fn lex_comment(&mut self) -> Token {
        while let Some(b) = self.cursor.current() {
            if is_line_break(b) {
                break;
            }
            self.cursor.advance();
        }

        self.token(TokenKind::Comment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opalc_util::Handler;

    #[test]
    fn test_comment_to_end_of_line() {
        let handler = Handler::new();
        let tokens = crate::tokenize("// hello\nx", &handler);
        assert_eq!(tokens[0].kind, TokenKind::Comment);
        assert_eq!(tokens[0].lexeme, "// hello");
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].span.line, 1);
    }

    #[test]
    fn test_comment_to_end_of_file() {
        let handler = Handler::new();
        let tokens = crate::tokenize("x // trailing", &handler);
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].kind, TokenKind::Comment);
        assert_eq!(tokens[1].lexeme, "// trailing");
    }

    #[test]
    fn test_comment_does_not_eat_line_break() {
        let handler = Handler::new();
        let tokens = crate::tokenize("// a\n// b\nx", &handler);
        let lines: Vec<u32> = tokens.iter().map(|t| t.span.line).collect();
        assert_eq!(lines, vec![0, 1, 2]);
    }

    #[test]
    fn test_lone_slash_is_an_operator() {
        let handler = Handler::new();
        let tokens = crate::tokenize("a / b", &handler);
        assert_eq!(tokens[1].kind, TokenKind::Slash);
    }
}
