//! Error types for Kinfolk operations.

use std::io;

use thiserror::Error;

use kinfolk_parser::error::ParseError;

/// The main error type for Kinfolk operations.
///
/// The `Parse` variant keeps the source text so callers can render its
/// diagnostics with labelled spans.
#[derive(Debug, Error)]
pub enum KinfolkError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(String),
}

impl From<crate::export::Error> for KinfolkError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(error.to_string())
    }
}

impl KinfolkError {
    /// Create a new `Parse` error with the associated source text.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
