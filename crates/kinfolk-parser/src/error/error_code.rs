//! Error codes for table-reading diagnostics.
//!
//! All codes live in the `E1xx` range; row-level problems are not errors and
//! are handled by the relationship store.

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Empty source.
    ///
    /// The payload was empty or contained only whitespace.
    E100,

    /// Missing required column.
    ///
    /// The header row lacks one of `ID`, `Name` or `generation`.
    E101,

    /// Malformed CSV.
    ///
    /// The CSV reader rejected the input, for example because of invalid
    /// UTF-8 or an unterminated quoted field.
    E102,

    /// No data rows.
    ///
    /// The header row was valid but no records follow it.
    E103,
}

impl ErrorCode {
    /// Returns a one-line description of this code.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "empty source",
            ErrorCode::E101 => "missing required column",
            ErrorCode::E102 => "malformed CSV",
            ErrorCode::E103 => "no data rows",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E100.to_string(), "E100");
        assert_eq!(ErrorCode::E103.to_string(), "E103");
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(ErrorCode::E101.description(), "missing required column");
    }
}
