//! Export of positioned charts.
//!
//! This module provides the [`Exporter`] trait that turns a [`Layout`] into an
//! output format. It is the last stage of the pipeline:
//!
//! ```text
//! CSV text
//!     ↓ parse (kinfolk-parser)
//! RelationshipStore
//!     ↓ layout
//! Layout
//!     ↓ export (this module)
//! Output bytes
//! ```
//!
//! [`svg`] is the only backend. Export failures are reported as [`Error`],
//! which converts into [`KinfolkError::Export`] at the crate boundary.
//!
//! [`KinfolkError::Export`]: crate::KinfolkError::Export

/// SVG export backend.
pub mod svg;

use std::io;

use crate::layout::Layout;

/// An export backend.
pub trait Exporter {
    /// Writes `layout` to `out` in the backend's format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the layout cannot be converted, or
    /// [`Error::Io`] if writing fails.
    fn export_layout(&mut self, layout: &Layout<'_>, out: &mut dyn io::Write) -> Result<(), Error>;
}

/// Errors that can occur during export.
#[derive(Debug)]
pub enum Error {
    /// A rendering or conversion failure described by `message`.
    Render(String),
    /// An I/O error encountered while writing output.
    Io(io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}
