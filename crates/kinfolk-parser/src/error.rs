//! Diagnostics produced while reading a person table.
//!
//! Every failure is a [`Diagnostic`] with an [`ErrorCode`], a primary
//! [`Label`] pointing at a byte range of the source, and optional help text.
//! [`ParseError`] wraps one or more diagnostics for the caller.
//!
//! # Example
//!
//! ```
//! # use kinfolk_parser::error::{Diagnostic, ErrorCode};
//! # use kinfolk_parser::Span;
//! let diag = Diagnostic::error("missing required column `Name`")
//!     .with_code(ErrorCode::E101)
//!     .with_label(Span::new(0..14), "header row")
//!     .with_help("add a `Name` column");
//! assert_eq!(diag.to_string(), "error[E101]: missing required column `Name`");
//! ```

mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
