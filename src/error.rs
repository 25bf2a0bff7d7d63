//! Error types for parsing and compiling expressions.

use thiserror::Error;

use crate::parsenum::NumError;

/// Errors that abort the parsing of an expression.
///
/// Offsets are byte offsets into the source expression.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid character '{ch}' at offset {offset}")]
    InvalidCharacter { ch: char, offset: usize },

    #[error("invalid number at offset {offset}: {source}")]
    InvalidNumber { offset: usize, source: NumError },

    #[error("invalid expression, lvalue expected before offset {offset}")]
    LvalueExpected { offset: usize },

    #[error("invalid expression, rvalue expected after offset {offset}")]
    RvalueExpected { offset: usize },

    #[error("invalid expression, parentheses mismatch for '(' at offset {offset}")]
    UnmatchedOpen { offset: usize },

    #[error("invalid expression, parentheses mismatch for ')' at offset {offset}")]
    UnmatchedClose { offset: usize },

    #[error("invalid expression, remaining element found at offset {offset}")]
    RemainingElement { offset: usize },

    #[error("invalid expression, empty expression found")]
    EmptyExpression,

    #[error("internal {stack} stack exceeds the maximum size ({limit})")]
    StackOverflow { stack: &'static str, limit: usize },

    #[error("expression nesting at offset {offset} exceeds the maximum depth ({limit})")]
    TooDeep { offset: usize, limit: usize },
}

impl ParseError {
    /// Offset of the offending token, if any.
    pub fn offset(&self) -> Option<usize> {
        match *self {
            ParseError::InvalidCharacter { offset, .. }
            | ParseError::InvalidNumber { offset, .. }
            | ParseError::LvalueExpected { offset }
            | ParseError::RvalueExpected { offset }
            | ParseError::UnmatchedOpen { offset }
            | ParseError::UnmatchedClose { offset }
            | ParseError::RemainingElement { offset }
            | ParseError::TooDeep { offset, .. } => Some(offset),
            ParseError::EmptyExpression | ParseError::StackOverflow { .. } => None,
        }
    }

    /// Resource exhaustion rather than a malformed expression.
    pub fn is_resource_limit(&self) -> bool {
        matches!(self, ParseError::StackOverflow { .. } | ParseError::TooDeep { .. })
    }

    /// Error message followed by the expression and a caret under the offset.
    ///
    /// ```text
    /// invalid character 'x' at offset 2
    ///     1&x
    ///       ^
    /// ```
    pub fn render(&self, expr: &str) -> String {
        match self.offset() {
            Some(offset) => format!("{}\n    {}\n    {:>width$}", self, expr, "^", width = offset + 1),
            None => self.to_string(),
        }
    }
}

/// Errors of the compilation entry point.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("expression uses {count} distinct integers, the maximum allowed is {max}")]
    TooManySymbols { count: usize, max: usize },

    #[error("expression is known to be always false")]
    AlwaysFalse,

    #[error("expression is known to be always true")]
    AlwaysTrue,
}

impl CompileError {
    /// Resource exhaustion rather than a malformed or degenerate expression.
    pub fn is_resource_limit(&self) -> bool {
        match self {
            CompileError::Parse(e) => e.is_resource_limit(),
            CompileError::TooManySymbols { .. } => true,
            CompileError::AlwaysFalse | CompileError::AlwaysTrue => false,
        }
    }
}

/// Invalid host configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LimitsError {
    #[error("max_symbols must be in range {min}..={max}, got {value}")]
    MaxSymbolsOutOfRange { value: usize, min: usize, max: usize },
}

/// Byte strings that are not a well-formed signature.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("signature is truncated ({len} bytes)")]
    Truncated { len: usize },

    #[error("invalid collapse marker 0x{marker:02X}")]
    InvalidMarker { marker: u8 },

    #[error("signature lists {count} literals, the maximum is {max}")]
    TooManyLiterals { count: usize, max: usize },

    #[error("signature has {actual} bytes, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("literals are not strictly ascending at index {index}")]
    UnsortedLiterals { index: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            ParseError::InvalidCharacter { ch: 'x', offset: 2 }.to_string(),
            "invalid character 'x' at offset 2"
        );
        assert_eq!(
            ParseError::InvalidNumber {
                offset: 0,
                source: NumError::TooLarge
            }
            .to_string(),
            "invalid number at offset 0: number too large"
        );
        assert_eq!(
            CompileError::from(ParseError::EmptyExpression).to_string(),
            "invalid expression, empty expression found"
        );
    }

    #[test]
    fn test_render() {
        let err = ParseError::InvalidCharacter { ch: 'x', offset: 2 };
        assert_eq!(err.render("1&x"), "invalid character 'x' at offset 2\n    1&x\n      ^");
        let err = ParseError::EmptyExpression;
        assert_eq!(err.render(""), "invalid expression, empty expression found");
    }

    #[test]
    fn test_resource_limit() {
        let overflow = ParseError::StackOverflow {
            stack: "output",
            limit: 4,
        };
        assert!(overflow.is_resource_limit());
        assert!(ParseError::TooDeep { offset: 3, limit: 2 }.is_resource_limit());
        assert!(CompileError::from(overflow).is_resource_limit());
        assert!(CompileError::TooManySymbols { count: 17, max: 16 }.is_resource_limit());
        assert!(!CompileError::AlwaysTrue.is_resource_limit());
        assert!(!CompileError::from(ParseError::EmptyExpression).is_resource_limit());
    }
}
