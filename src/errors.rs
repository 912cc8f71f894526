use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpressionErrorType {
    LexerError,
    SyntaxError,
    TypeError,
    NameError,
}

impl fmt::Display for ExpressionErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpressionErrorType::LexerError => f.write_str("lexer error:"),
            ExpressionErrorType::SyntaxError => f.write_str("syntax error:"),
            ExpressionErrorType::TypeError => f.write_str("type error:"),
            ExpressionErrorType::NameError => f.write_str("name error:"),
        }
    }
}

/// A failure reported by the expression lexer or parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionError {
    pub kind: ExpressionErrorType,
    pub msg: String,
    pub span: (usize, usize),
}

impl ExpressionError {
    pub fn new(kind: ExpressionErrorType, msg: String, span: (usize, usize)) -> Self {
        Self { kind, msg, span }
    }

    pub fn lexer(msg: String, span: (usize, usize)) -> Self {
        Self::new(ExpressionErrorType::LexerError, msg, span)
    }

    pub fn syntax(msg: String, span: (usize, usize)) -> Self {
        Self::new(ExpressionErrorType::SyntaxError, msg, span)
    }

    pub fn typ(msg: String, span: (usize, usize)) -> Self {
        Self::new(ExpressionErrorType::TypeError, msg, span)
    }

    pub fn name(msg: String, span: (usize, usize)) -> Self {
        Self::new(ExpressionErrorType::NameError, msg, span)
    }
}

impl std::error::Error for ExpressionError {}

impl fmt::Display for ExpressionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}..{})",
            self.kind, self.msg, self.span.0, self.span.1
        )
    }
}

/// Failures raised while building, rendering or decoding a [`FieldPath`].
///
/// [`FieldPath`]: crate::FieldPath
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathError {
    #[error("a field path is required but the input was empty")]
    EmptyInput,

    #[error("malformed field path: {0}")]
    MalformedPath(String),

    #[error("invalid field name {name:?}: {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("array index {index} is out of range")]
    OutOfRange { index: i64 },

    #[error("unsupported path shape: {0}")]
    UnsupportedShape(String),

    #[error("expected a {expected} segment, found a {found} segment")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("failed to parse {text:?}: {source}")]
    Parse {
        text: String,
        #[source]
        source: ExpressionError,
    },
}

impl PathError {
    pub fn invalid_name(name: &str, reason: &'static str) -> Self {
        PathError::InvalidName {
            name: name.to_owned(),
            reason,
        }
    }

    /// True for every failure in the malformed-input family.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            PathError::EmptyInput | PathError::MalformedPath(_) | PathError::InvalidName { .. }
        )
    }
}
