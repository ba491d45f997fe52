use std::fmt::{self, Debug, Display};

#[cfg(test)]
#[path = "./error_tests.rs"]
mod tests;

/// Why a parse failed.
///
/// The parser reports only the class of the first failure it hit; it does
/// not track positions.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A byte or code point not allowed where it appeared: a bad escape,
    /// malformed UTF-8, a control character, an invalid number or date.
    Lexical,

    /// Malformed nesting or a missing delimiter: an unterminated string,
    /// an unbalanced bracket, a missing `=`, trailing garbage on a line.
    Structural,

    /// Input that is well formed but violates the document rules: a duplicate
    /// key, a redefined table, integer overflow, a heterogeneous array.
    Semantic,

    /// The input ended where more bytes were required.
    Boundary,

    /// Arrays or inline tables were nested deeper than the configured limit.
    DepthLimit,

    /// The input is longer than `u32::MAX` bytes.
    InputTooLarge,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Lexical => "lexical",
            Self::Structural => "structural",
            Self::Semantic => "semantic",
            Self::Boundary => "unexpected-eof",
            Self::DepthLimit => "depth-limit",
            Self::InputTooLarge => "input-too-large",
        };
        f.write_str(text)
    }
}

impl Debug for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

/// Error returned by [`Parser::try_parse`](crate::Parser::try_parse).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Error {
    /// The error kind
    pub kind: ErrorKind,
}

impl std::error::Error for Error {}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self { kind }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ErrorKind::Lexical => f.write_str("invalid character or token"),
            ErrorKind::Structural => f.write_str("malformed document structure"),
            ErrorKind::Semantic => f.write_str("duplicate or conflicting definition"),
            ErrorKind::Boundary => f.write_str("unexpected eof encountered"),
            ErrorKind::DepthLimit => f.write_str("nesting depth limit exceeded"),
            ErrorKind::InputTooLarge => f.write_str("input is too large (maximum 4GiB)"),
        }
    }
}
