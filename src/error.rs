use thiserror::Error;

/// Fatal import failures. Either of these aborts the whole import; no
/// partial journey is ever produced from a script we could not tokenize
/// or delimit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("lex error at line {line}, column {column}: {message}")]
    Lex {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("could not locate a journey body: {0}")]
    Structure(String),
}

/// A malformed or unrecognized locator chain.
///
/// During import this degrades the affected step to an opaque one; during an
/// interactive edit it is surfaced to the caller and the edit is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid selector at column {column}: {message}")]
pub struct LocatorSyntaxError {
    /// 1-based column within the selector text.
    pub column: usize,
    pub message: String,
    /// The offending text, for display next to the rejected field.
    pub text: String,
}

impl LocatorSyntaxError {
    pub fn new(column: usize, message: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            column,
            message: message.into(),
            text: text.into(),
        }
    }
}

/// Rejection of a single interactive selector edit. The journey is left
/// untouched in every case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("step index {0} is out of range")]
    OutOfRange(usize),

    #[error("step {0} has no selector field")]
    NoSelector(usize),

    #[error(transparent)]
    Syntax(#[from] LocatorSyntaxError),
}
