//! Error types for ZON encoding and decoding.
//!
//! Every error carries a fixed, stable code (see [`Error::code`]) so that
//! embedders can dispatch on failures without string-matching messages.
//!
//! ## Error Categories
//!
//! - **Encode errors**: unsupported host types, integer overflow, cycles
//! - **Decode syntax errors**: bad escapes, unterminated strings, malformed
//!   cells/headers, key collisions, forbidden keys
//! - **Strict-mode violations**: `E001` (row count), `E002` (field count)
//! - **Resource-limit violations**: `E301`..`E304` and `DecodeDepth`
//! - **UTF-8 errors**: invalid byte sequences or a byte order mark
//!
//! ## Examples
//!
//! ```rust
//! let err = zon::decode("__proto__:T").unwrap_err();
//! assert_eq!(err.code(), "DecodePoisonKey");
//! ```

use std::fmt;
use thiserror::Error;

/// All failures the codec can report.
///
/// Decode variants carry the 1-based line number where the problem was
/// detected; column and context are best-effort.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum Error {
    /// A host value has no representation in the ZON data model.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// A container was reached twice along one encoding path.
    #[error("cycle detected while encoding")]
    Cycle,

    /// An integer does not fit in a signed 64-bit value.
    #[error("integer overflow: {0}")]
    Overflow(String),

    /// A backslash escape outside the permitted set (`\\ \" \n \r \t`).
    #[error("invalid escape sequence '\\{escape}' at line {line}, column {column}")]
    BadEscape {
        line: usize,
        column: usize,
        escape: char,
    },

    /// A quoted scalar with no closing quote before end of line.
    #[error("unterminated string at line {line}, column {column}")]
    UnterminatedString { line: usize, column: usize },

    /// A malformed row cell, inline payload, or quoted value.
    #[error("bad cell at line {line}, column {column}: {msg}")]
    BadCell {
        line: usize,
        column: usize,
        msg: String,
    },

    /// A numeric token that cannot be represented.
    #[error("bad number {lexeme:?} at line {line}")]
    BadNumber { line: usize, lexeme: String },

    /// A malformed table header or key.
    #[error("bad header at line {line}: {msg}")]
    BadHeader { line: usize, msg: String },

    /// Two assignments landed on the same key path.
    #[error("key collision on {key:?} at line {line}")]
    KeyCollision { line: usize, key: String },

    /// A key that would enable prototype pollution. Line is 0 when the key
    /// was found on the encode side.
    #[error("forbidden object key {key:?}")]
    PoisonKey { line: usize, key: String },

    /// Strict mode: table row count does not match the declared count.
    #[error("table at line {line} declares {expected} rows, found {found}")]
    RowCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// Strict mode: a row's positional field count does not match the header.
    #[error("row at line {line} has {found} fields, expected {expected}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// Document exceeds the configured byte limit.
    #[error("document of {found} bytes exceeds limit of {limit}")]
    DocumentTooLarge { limit: usize, found: usize },

    /// A single line exceeds the configured byte limit.
    #[error("line {line} exceeds limit of {limit} bytes")]
    LineTooLong { line: usize, limit: usize },

    /// An array exceeds the configured element limit.
    #[error("array at line {line} exceeds limit of {limit} elements")]
    ArrayTooLong { line: usize, limit: usize },

    /// An object exceeds the configured key limit.
    #[error("object at line {line} exceeds limit of {limit} keys")]
    TooManyKeys { line: usize, limit: usize },

    /// Nesting exceeds the configured depth limit.
    #[error("nesting at line {line} exceeds depth limit of {limit}")]
    DepthExceeded { line: usize, limit: usize },

    /// Invalid UTF-8, or a byte order mark (rejected on decode).
    #[error("invalid UTF-8 input: {msg}")]
    BadUtf8 { line: usize, msg: String },

    /// IO error during reading or writing.
    #[error("IO error: {0}")]
    Io(String),

    /// Generic message (serde plumbing).
    #[error("{0}")]
    Message(String),
}

impl Error {
    /// The stable code for this error, matching the documented taxonomy.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use zon::Error;
    ///
    /// let err = Error::RowCount { line: 1, expected: 2, found: 1 };
    /// assert_eq!(err.code(), "E001");
    /// ```
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Error::UnsupportedType(_) => "EncodeUnsupportedType",
            Error::Cycle => "EncodeCycle",
            Error::Overflow(_) => "EncodeOverflow",
            Error::BadEscape { .. } => "DecodeBadEscape",
            Error::UnterminatedString { .. } => "DecodeUnterminatedString",
            Error::BadCell { .. } => "DecodeBadCell",
            Error::BadNumber { .. } => "DecodeBadNumber",
            Error::BadHeader { .. } => "DecodeBadHeader",
            Error::KeyCollision { .. } => "DecodeKeyCollision",
            Error::PoisonKey { .. } => "DecodePoisonKey",
            Error::RowCount { .. } => "E001",
            Error::FieldCount { .. } => "E002",
            Error::DocumentTooLarge { .. } => "E301",
            Error::LineTooLong { .. } => "E302",
            Error::ArrayTooLong { .. } => "E303",
            Error::TooManyKeys { .. } => "E304",
            Error::DepthExceeded { .. } => "DecodeDepth",
            Error::BadUtf8 { .. } => "DecodeBadUTF8",
            Error::Io(_) => "Io",
            Error::Message(_) => "Message",
        }
    }

    /// The 1-based line where a decode error was detected, when known.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        let line = match self {
            Error::BadEscape { line, .. }
            | Error::UnterminatedString { line, .. }
            | Error::BadCell { line, .. }
            | Error::BadNumber { line, .. }
            | Error::BadHeader { line, .. }
            | Error::KeyCollision { line, .. }
            | Error::PoisonKey { line, .. }
            | Error::RowCount { line, .. }
            | Error::FieldCount { line, .. }
            | Error::LineTooLong { line, .. }
            | Error::ArrayTooLong { line, .. }
            | Error::TooManyKeys { line, .. }
            | Error::DepthExceeded { line, .. }
            | Error::BadUtf8 { line, .. } => *line,
            _ => 0,
        };
        (line > 0).then_some(line)
    }

    /// The 1-based column where a decode error was detected, when known.
    #[must_use]
    pub fn column(&self) -> Option<usize> {
        match self {
            Error::BadEscape { column, .. }
            | Error::UnterminatedString { column, .. }
            | Error::BadCell { column, .. } => Some(*column),
            _ => None,
        }
    }

    pub(crate) fn bad_cell(line: usize, column: usize, msg: impl Into<String>) -> Self {
        Error::BadCell {
            line,
            column,
            msg: msg.into(),
        }
    }

    pub(crate) fn bad_header(line: usize, msg: impl Into<String>) -> Self {
        Error::BadHeader {
            line,
            msg: msg.into(),
        }
    }

    pub(crate) fn unsupported_type(name: impl Into<String>) -> Self {
        Error::UnsupportedType(name.into())
    }

    pub(crate) fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(Error::Cycle.code(), "EncodeCycle");
        assert_eq!(
            Error::FieldCount {
                line: 3,
                expected: 4,
                found: 2
            }
            .code(),
            "E002"
        );
        assert_eq!(
            Error::DepthExceeded { line: 1, limit: 100 }.code(),
            "DecodeDepth"
        );
    }

    #[test]
    fn line_and_column_are_best_effort() {
        let err = Error::BadEscape {
            line: 7,
            column: 12,
            escape: 'q',
        };
        assert_eq!(err.line(), Some(7));
        assert_eq!(err.column(), Some(12));
        assert_eq!(Error::Cycle.line(), None);

        let encode_side = Error::PoisonKey {
            line: 0,
            key: "__proto__".to_string(),
        };
        assert_eq!(encode_side.line(), None);
    }
}
