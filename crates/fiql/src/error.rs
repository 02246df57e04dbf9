//! Error types for the fiql crate.

use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

/// Broad category of a [`FiqlError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The query text itself is malformed.
    Syntax,
    /// A right-hand literal could not be interpreted for the field's type.
    Value,
}

/// Errors that can occur while evaluating a query.
///
/// Every failure aborts the whole evaluation; there is no partial result.
#[derive(Debug, Error)]
pub enum FiqlError {
    /// A `(` was never closed.
    #[error("unbalanced parentheses: unclosed opening parenthesis")]
    UnclosedParenthesis,

    /// A `)` appeared without a matching `(`.
    #[error("unbalanced parentheses: extra closing parenthesis at byte {position}")]
    ExtraClosingParenthesis { position: usize },

    /// An atomic fragment contained no recognized operator.
    #[error("unknown operator in '{fragment}'")]
    UnknownOperator { fragment: String },

    /// A `low~high` range did not have exactly two parts or had an empty bound.
    #[error("range '{literal}' for selector '{selector}' is incorrectly formatted")]
    MalformedRange { selector: String, literal: String },

    /// Literal is not a floating point number.
    #[error("'{literal}' is not a number")]
    InvalidNumber {
        literal: String,
        #[source]
        source: ParseFloatError,
    },

    /// Literal has a date prefix but the rest does not parse under that format.
    #[error("'{literal}' is not a valid date/time")]
    InvalidDate {
        literal: String,
        #[source]
        source: chrono::ParseError,
    },

    /// Literal carries none of the `L`, `DTZ`, `DT`, `D`, `T` prefixes.
    #[error("date format is missing in '{literal}'")]
    MissingDateFormat { literal: String },

    /// `L`-prefixed literal that is not an integer.
    #[error("'{literal}' is not a millisecond timestamp")]
    InvalidEpochMillis {
        literal: String,
        #[source]
        source: ParseIntError,
    },

    /// Percent-decoding failed.
    #[error("cannot percent-decode '{literal}'")]
    Decode { literal: String },

    /// A glob translated into a pattern the regex engine rejected.
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

impl FiqlError {
    /// Returns whether this is a syntax or a value error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FiqlError::UnclosedParenthesis
            | FiqlError::ExtraClosingParenthesis { .. }
            | FiqlError::UnknownOperator { .. }
            | FiqlError::MalformedRange { .. } => ErrorKind::Syntax,
            FiqlError::InvalidNumber { .. }
            | FiqlError::InvalidDate { .. }
            | FiqlError::MissingDateFormat { .. }
            | FiqlError::InvalidEpochMillis { .. }
            | FiqlError::Decode { .. }
            | FiqlError::InvalidPattern(_) => ErrorKind::Value,
        }
    }

    /// Returns `true` for [`ErrorKind::Syntax`] errors.
    pub fn is_syntax(&self) -> bool {
        self.kind() == ErrorKind::Syntax
    }

    /// Returns `true` for [`ErrorKind::Value`] errors.
    pub fn is_value(&self) -> bool {
        self.kind() == ErrorKind::Value
    }
}

/// Result type for fiql operations.
pub type Result<T> = std::result::Result<T, FiqlError>;
