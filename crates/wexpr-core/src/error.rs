//! Error types for Wexpr encoding and decoding operations.

use thiserror::Error;

use crate::diagnostics::Diagnostic;

/// Errors that can occur during Wexpr encoding or decoding.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WexprError {
    /// A lexical or structural error in the source document. The diagnostic
    /// renders as `LINE:COL:MESSAGE`, the offending source line, and a
    /// caret indicator underneath it.
    #[error("{0}")]
    Syntax(Diagnostic),

    /// A structural error during encoding (e.g., a non-finite number).
    #[error("Encoding error: {0}")]
    Encode(String),
}

impl WexprError {
    /// Build a syntax error pointing at `length` bytes starting at `offset`.
    pub(crate) fn syntax(
        source: &[u8],
        offset: usize,
        length: usize,
        message: impl Into<String>,
    ) -> Self {
        WexprError::Syntax(Diagnostic::new(source, offset, length, message))
    }

    /// The diagnostic for syntax errors, `None` for encode errors.
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            WexprError::Syntax(diagnostic) => Some(diagnostic),
            WexprError::Encode(_) => None,
        }
    }
}

/// Convenience alias used throughout wexpr-core.
pub type Result<T> = std::result::Result<T, WexprError>;
