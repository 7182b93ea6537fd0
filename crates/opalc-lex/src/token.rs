//! Token definitions and keyword tables.

use opalc_util::Span;

/// The lexical category of a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // =========================================================================
    // SINGLE-CHARACTER PUNCTUATION AND OPERATORS
    // =========================================================================
    /// "."
    Dot,
    /// ","
    Comma,
    /// "="
    Equals,
    /// ":"
    Colon,
    /// "("
    LParen,
    /// ")"
    RParen,
    /// "["
    LBracket,
    /// "]"
    RBracket,
    /// "{"
    LCurly,
    /// "}"
    RCurly,
    /// "<"
    LeftAngle,
    /// ">"
    RightAngle,
    /// "+"
    Plus,
    /// "-"
    Minus,
    /// "*"
    Star,
    /// "/"
    Slash,
    /// "%"
    Percent,
    /// "|" - bitwise or
    VerticalBar,
    /// "^" - bitwise xor
    Caret,
    /// "&" - bitwise and
    Ampersand,
    /// "!"
    Exclamation,
    /// "~"
    Tilde,

    // =========================================================================
    // COMPOUND OPERATORS
    // =========================================================================
    /// ">="
    GeOp,
    /// "<="
    LeOp,
    /// "!="
    NeOp,
    /// "=="
    EqOp,
    /// "&&"
    AndOp,
    /// "^^"
    XorOp,
    /// "||"
    OrOp,
    /// "<<"
    LeftShift,
    /// ">>"
    RightShift,
    /// "+="
    PlusEq,
    /// "-="
    MinusEq,
    /// "*="
    StarEq,
    /// "/="
    SlashEq,
    /// "%="
    PercentEq,
    /// "&="
    AmpersandEq,
    /// "|="
    VerticalBarEq,
    /// "^="
    CaretEq,

    // =========================================================================
    // LITERALS
    // =========================================================================
    /// 32-bit integer literal
    Integer32,
    /// 64-bit integer literal (suffix `u64` or `i64`)
    Integer64,
    /// 32-bit float literal (contains `.` or suffix `f32`)
    Float32,
    /// 64-bit float literal (suffix `f64`)
    Float64,
    /// String literal; the lexeme is the content between the quotes
    Str,

    /// Identifier
    Identifier,

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    KeywordFn,
    KeywordVar,
    KeywordStruct,
    KeywordEnum,
    KeywordOperator,
    KeywordExtern,
    KeywordIf,
    KeywordElse,
    KeywordWhile,
    KeywordBreak,
    KeywordContinue,
    KeywordFor,
    KeywordSwitch,
    KeywordCase,
    KeywordDefault,
    KeywordReturn,
    KeywordVoid,
    KeywordString,
    KeywordUint8,
    KeywordUint16,
    KeywordUint32,
    KeywordUint64,
    KeywordInt8,
    KeywordInt16,
    KeywordInt32,
    KeywordInt64,
    KeywordFloat32,
    KeywordFloat64,
    KeywordBool,
    KeywordTrue,
    KeywordFalse,
    KeywordNull,
    KeywordSizeof,

    // =========================================================================
    // TRIVIA
    // =========================================================================
    /// Line comment starting with `//`; end-of-stream is implicit
    Comment,
}

impl TokenKind {
    /// Returns true for the basic type keywords (`u8`..`u64`, `i8`..`i64`,
    /// `f32`, `f64`, `bool`, `string`, `void`).
    pub fn is_basic_type(self) -> bool {
        matches!(
            self,
            TokenKind::KeywordUint8
                | TokenKind::KeywordUint16
                | TokenKind::KeywordUint32
                | TokenKind::KeywordUint64
                | TokenKind::KeywordInt8
                | TokenKind::KeywordInt16
                | TokenKind::KeywordInt32
                | TokenKind::KeywordInt64
                | TokenKind::KeywordFloat32
                | TokenKind::KeywordFloat64
                | TokenKind::KeywordBool
                | TokenKind::KeywordString
                | TokenKind::KeywordVoid
        )
    }

    /// Returns true for literal token kinds.
    pub fn is_constant(self) -> bool {
        matches!(
            self,
            TokenKind::Integer32
                | TokenKind::Integer64
                | TokenKind::Float32
                | TokenKind::Float64
                | TokenKind::Str
        )
    }

    /// Returns true for the operator group: every compound operator plus
    /// `< > * / % + - | ^ &`.
    pub fn is_operator(self) -> bool {
        matches!(
            self,
            TokenKind::GeOp
                | TokenKind::LeOp
                | TokenKind::NeOp
                | TokenKind::EqOp
                | TokenKind::AndOp
                | TokenKind::XorOp
                | TokenKind::OrOp
                | TokenKind::LeftShift
                | TokenKind::RightShift
                | TokenKind::PlusEq
                | TokenKind::MinusEq
                | TokenKind::StarEq
                | TokenKind::SlashEq
                | TokenKind::PercentEq
                | TokenKind::AmpersandEq
                | TokenKind::VerticalBarEq
                | TokenKind::CaretEq
                | TokenKind::LeftAngle
                | TokenKind::RightAngle
                | TokenKind::Star
                | TokenKind::Slash
                | TokenKind::Percent
                | TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::VerticalBar
                | TokenKind::Caret
                | TokenKind::Ampersand
        )
    }

    /// The source spelling of an operator or punctuation kind, used by the
    /// AST printer. Returns the kind name for non-punctuation kinds.
    pub fn symbol(self) -> &'static str {
        match self {
            TokenKind::Dot => ".",
            TokenKind::Comma => ",",
            TokenKind::Equals => "=",
            TokenKind::Colon => ":",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LCurly => "{",
            TokenKind::RCurly => "}",
            TokenKind::LeftAngle => "<",
            TokenKind::RightAngle => ">",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::VerticalBar => "|",
            TokenKind::Caret => "^",
            TokenKind::Ampersand => "&",
            TokenKind::Exclamation => "!",
            TokenKind::Tilde => "~",
            TokenKind::GeOp => ">=",
            TokenKind::LeOp => "<=",
            TokenKind::NeOp => "!=",
            TokenKind::EqOp => "==",
            TokenKind::AndOp => "&&",
            TokenKind::XorOp => "^^",
            TokenKind::OrOp => "||",
            TokenKind::LeftShift => "<<",
            TokenKind::RightShift => ">>",
            TokenKind::PlusEq => "+=",
            TokenKind::MinusEq => "-=",
            TokenKind::StarEq => "*=",
            TokenKind::SlashEq => "/=",
            TokenKind::PercentEq => "%=",
            TokenKind::AmpersandEq => "&=",
            TokenKind::VerticalBarEq => "|=",
            TokenKind::CaretEq => "^=",
            other => other.name(),
        }
    }

    /// Human-readable name of the kind, used by the driver's token dump.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Dot => "DOT",
            TokenKind::Comma => "COMMA",
            TokenKind::Equals => "EQUALS",
            TokenKind::Colon => "COLON",
            TokenKind::LParen => "LEFT_PAREN",
            TokenKind::RParen => "RIGHT_PAREN",
            TokenKind::LBracket => "LEFT_BRACKET",
            TokenKind::RBracket => "RIGHT_BRACKET",
            TokenKind::LCurly => "LEFT_CURLY",
            TokenKind::RCurly => "RIGHT_CURLY",
            TokenKind::LeftAngle => "LEFT_ANGLE",
            TokenKind::RightAngle => "RIGHT_ANGLE",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Star => "STAR",
            TokenKind::Slash => "SLASH",
            TokenKind::Percent => "PERCENT",
            TokenKind::VerticalBar => "VERTICAL_BAR",
            TokenKind::Caret => "CARET",
            TokenKind::Ampersand => "AMPERSAND",
            TokenKind::Exclamation => "EXCLAMATION",
            TokenKind::Tilde => "TILDE",
            TokenKind::GeOp => "GE_OP",
            TokenKind::LeOp => "LE_OP",
            TokenKind::NeOp => "NE_OP",
            TokenKind::EqOp => "EQ_OP",
            TokenKind::AndOp => "AND_OP",
            TokenKind::XorOp => "XOR_OP",
            TokenKind::OrOp => "OR_OP",
            TokenKind::LeftShift => "LEFT_SHIFT",
            TokenKind::RightShift => "RIGHT_SHIFT",
            TokenKind::PlusEq => "PLUS_EQ",
            TokenKind::MinusEq => "MINUS_EQ",
            TokenKind::StarEq => "STAR_EQ",
            TokenKind::SlashEq => "SLASH_EQ",
            TokenKind::PercentEq => "PERCENT_EQ",
            TokenKind::AmpersandEq => "AMPERSAND_EQ",
            TokenKind::VerticalBarEq => "VERTICAL_BAR_EQ",
            TokenKind::CaretEq => "CARET_EQ",
            TokenKind::Integer32 => "INTEGER32",
            TokenKind::Integer64 => "INTEGER64",
            TokenKind::Float32 => "FLOAT32",
            TokenKind::Float64 => "FLOAT64",
            TokenKind::Str => "STRING",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::KeywordFn => "KEYWORD_FN",
            TokenKind::KeywordVar => "KEYWORD_VAR",
            TokenKind::KeywordStruct => "KEYWORD_STRUCT",
            TokenKind::KeywordEnum => "KEYWORD_ENUM",
            TokenKind::KeywordOperator => "KEYWORD_OPERATOR",
            TokenKind::KeywordExtern => "KEYWORD_EXTERN",
            TokenKind::KeywordIf => "KEYWORD_IF",
            TokenKind::KeywordElse => "KEYWORD_ELSE",
            TokenKind::KeywordWhile => "KEYWORD_WHILE",
            TokenKind::KeywordBreak => "KEYWORD_BREAK",
            TokenKind::KeywordContinue => "KEYWORD_CONTINUE",
            TokenKind::KeywordFor => "KEYWORD_FOR",
            TokenKind::KeywordSwitch => "KEYWORD_SWITCH",
            TokenKind::KeywordCase => "KEYWORD_CASE",
            TokenKind::KeywordDefault => "KEYWORD_DEFAULT",
            TokenKind::KeywordReturn => "KEYWORD_RETURN",
            TokenKind::KeywordVoid => "KEYWORD_VOID",
            TokenKind::KeywordString => "KEYWORD_STRING",
            TokenKind::KeywordUint8 => "KEYWORD_UINT8",
            TokenKind::KeywordUint16 => "KEYWORD_UINT16",
            TokenKind::KeywordUint32 => "KEYWORD_UINT32",
            TokenKind::KeywordUint64 => "KEYWORD_UINT64",
            TokenKind::KeywordInt8 => "KEYWORD_INT8",
            TokenKind::KeywordInt16 => "KEYWORD_INT16",
            TokenKind::KeywordInt32 => "KEYWORD_INT32",
            TokenKind::KeywordInt64 => "KEYWORD_INT64",
            TokenKind::KeywordFloat32 => "KEYWORD_FLOAT32",
            TokenKind::KeywordFloat64 => "KEYWORD_FLOAT64",
            TokenKind::KeywordBool => "KEYWORD_BOOL",
            TokenKind::KeywordTrue => "KEYWORD_TRUE",
            TokenKind::KeywordFalse => "KEYWORD_FALSE",
            TokenKind::KeywordNull => "KEYWORD_NULL",
            TokenKind::KeywordSizeof => "KEYWORD_SIZEOF",
            TokenKind::Comment => "COMMENT",
        }
    }
}

/// A single lexical unit: kind, lexeme, and source span.
///
/// The lexeme is the matched substring of the source, except for string
/// literals where it is the content between the quotes.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }
}

/// Keywords matched as raw prefixes of the remaining input, without
/// requiring a following non-identifier byte. `ifoo` lexes as `if` + `oo`;
/// this matches the historical scanner and is relied on by existing sources.
pub const PREFIX_KEYWORDS: &[(&str, TokenKind)] = &[
    ("fn", TokenKind::KeywordFn),
    ("return", TokenKind::KeywordReturn),
    ("if", TokenKind::KeywordIf),
    ("extern", TokenKind::KeywordExtern),
    ("true", TokenKind::KeywordTrue),
    ("false", TokenKind::KeywordFalse),
];

/// Maps a full identifier run to its keyword kind, if it is one.
///
/// Unlike [`PREFIX_KEYWORDS`] this is boundary-respecting: the whole
/// identifier lexeme must match.
pub fn keyword_from_ident(text: &str) -> Option<TokenKind> {
    let kind = match text {
        "u8" => TokenKind::KeywordUint8,
        "u16" => TokenKind::KeywordUint16,
        "u32" => TokenKind::KeywordUint32,
        "u64" => TokenKind::KeywordUint64,
        "i8" => TokenKind::KeywordInt8,
        "i16" => TokenKind::KeywordInt16,
        "i32" => TokenKind::KeywordInt32,
        "i64" => TokenKind::KeywordInt64,
        "f32" => TokenKind::KeywordFloat32,
        "f64" => TokenKind::KeywordFloat64,
        "bool" => TokenKind::KeywordBool,
        "string" => TokenKind::KeywordString,
        "void" => TokenKind::KeywordVoid,
        "var" => TokenKind::KeywordVar,
        "struct" => TokenKind::KeywordStruct,
        "enum" => TokenKind::KeywordEnum,
        "operator" => TokenKind::KeywordOperator,
        "else" => TokenKind::KeywordElse,
        "while" => TokenKind::KeywordWhile,
        "break" => TokenKind::KeywordBreak,
        "continue" => TokenKind::KeywordContinue,
        "for" => TokenKind::KeywordFor,
        "switch" => TokenKind::KeywordSwitch,
        "case" => TokenKind::KeywordCase,
        "default" => TokenKind::KeywordDefault,
        "null" => TokenKind::KeywordNull,
        "sizeof" => TokenKind::KeywordSizeof,
        "fn" => TokenKind::KeywordFn,
        "return" => TokenKind::KeywordReturn,
        "if" => TokenKind::KeywordIf,
        "extern" => TokenKind::KeywordExtern,
        "true" => TokenKind::KeywordTrue,
        "false" => TokenKind::KeywordFalse,
        _ => return None,
    };
    Some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_type_predicate() {
        assert!(TokenKind::KeywordInt32.is_basic_type());
        assert!(TokenKind::KeywordString.is_basic_type());
        assert!(TokenKind::KeywordVoid.is_basic_type());
        assert!(!TokenKind::KeywordStruct.is_basic_type());
        assert!(!TokenKind::Identifier.is_basic_type());
    }

    #[test]
    fn test_constant_predicate() {
        assert!(TokenKind::Integer32.is_constant());
        assert!(TokenKind::Str.is_constant());
        assert!(!TokenKind::Identifier.is_constant());
    }

    #[test]
    fn test_operator_predicate() {
        assert!(TokenKind::Plus.is_operator());
        assert!(TokenKind::LeftAngle.is_operator());
        assert!(TokenKind::EqOp.is_operator());
        assert!(TokenKind::CaretEq.is_operator());
        // `=` is assignment, not part of the operator group
        assert!(!TokenKind::Equals.is_operator());
        assert!(!TokenKind::Exclamation.is_operator());
    }

    #[test]
    fn test_keyword_from_ident() {
        assert_eq!(keyword_from_ident("i32"), Some(TokenKind::KeywordInt32));
        assert_eq!(keyword_from_ident("struct"), Some(TokenKind::KeywordStruct));
        assert_eq!(keyword_from_ident("string"), Some(TokenKind::KeywordString));
        assert_eq!(keyword_from_ident("main"), None);
        assert_eq!(keyword_from_ident("i128"), None);
    }

    #[test]
    fn test_symbol_spelling() {
        assert_eq!(TokenKind::Plus.symbol(), "+");
        assert_eq!(TokenKind::EqOp.symbol(), "==");
        assert_eq!(TokenKind::LeftAngle.symbol(), "<");
    }
}
