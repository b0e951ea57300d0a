//! # Kinfolk Parser
//!
//! Reads a person table (CSV with a header row) into
//! [`PersonRecord`]s ready for
//! [`RelationshipStore::load`](kinfolk_core::store::RelationshipStore::load).
//!
//! The parser only fails when the table as a whole is unusable: an empty
//! source, a missing required column, unreadable CSV, or no data rows.
//! Individual malformed rows are passed through and dropped by the store.
//!
//! ## Usage
//!
//! ```
//! # use kinfolk_parser::{parse, error::ParseError};
//! fn main() -> Result<(), ParseError> {
//!     let source = "ID,Name,generation,SpouseID\n1,John,1,2\n2,Mary,1,1\n";
//!     let records = parse(source)?;
//!     assert_eq!(records.len(), 2);
//!     assert_eq!(records[0].spouse_ids, vec!["2".to_string()]);
//!     Ok(())
//! }
//! ```

pub mod error;
mod list;
mod span;
mod table;

pub use span::Span;

use kinfolk_core::record::PersonRecord;

use error::ParseError;

/// Parses CSV text into person records.
///
/// # Errors
///
/// Returns a [`ParseError`] whose diagnostics carry one of the codes
/// [`E100`](error::ErrorCode::E100) to [`E103`](error::ErrorCode::E103).
pub fn parse(source: &str) -> Result<Vec<PersonRecord>, ParseError> {
    table::read_table(source.as_bytes())
}

/// Parses raw bytes into person records.
///
/// Unlike [`parse`], invalid UTF-8 is reported as a malformed-CSV diagnostic
/// pointing at the offending record.
pub fn parse_bytes(source: &[u8]) -> Result<Vec<PersonRecord>, ParseError> {
    table::read_table(source)
}
