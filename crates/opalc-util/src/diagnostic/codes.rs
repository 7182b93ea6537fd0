//! Diagnostic codes for categorizing compiler errors.
//!
//! Codes follow the format `{prefix}{number}` with "E" for errors and "W"
//! for warnings, so users can reference a specific diagnostic in docs or
//! bug reports.

/// A unique code identifying a diagnostic message
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DiagnosticCode {
    /// The prefix (e.g., "E" for error, "W" for warning)
    pub prefix: &'static str,
    /// The numeric identifier
    pub number: u32,
}

impl DiagnosticCode {
    /// Create a new diagnostic code
    #[inline]
    pub const fn new(prefix: &'static str, number: u32) -> Self {
        Self { prefix, number }
    }

    /// Get the full code string (e.g., "E0101")
    pub fn as_str(&self) -> String {
        format!("{}{:04}", self.prefix, self.number)
    }

    /// E0001: Generic syntax error
    pub const E0001: Self = Self::new("E", 1);

    // Lexer diagnostics (E01xx)

    /// E0101: Unrecognized character in the input
    pub const E_LEXER_UNEXPECTED_CHAR: Self = Self::new("E", 101);
    /// E0102: String literal with no closing quote
    pub const E_LEXER_UNTERMINATED_STRING: Self = Self::new("E", 102);

    // Parser diagnostics (E02xx)

    /// E0201: Token with no matching production
    pub const E_PARSER_UNDEFINED_TOKEN: Self = Self::new("E", 201);
    /// E0202: Numeric literal that does not fit its type
    pub const E_PARSER_INVALID_NUMBER: Self = Self::new("E", 202);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_as_str() {
        assert_eq!(DiagnosticCode::E0001.as_str(), "E0001");
        assert_eq!(DiagnosticCode::E_LEXER_UNEXPECTED_CHAR.as_str(), "E0101");
    }

    #[test]
    fn test_code_equality() {
        assert_eq!(DiagnosticCode::new("E", 101), DiagnosticCode::E_LEXER_UNEXPECTED_CHAR);
        assert_ne!(DiagnosticCode::E0001, DiagnosticCode::E_LEXER_UNEXPECTED_CHAR);
    }
}
