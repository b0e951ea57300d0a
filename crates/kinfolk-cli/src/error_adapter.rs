//! Renders a [`KinfolkError`] through miette.
//!
//! A parse error becomes one report per diagnostic, shown against the CSV
//! source. Every other variant becomes a single report tagged with a
//! `kinfolk::*` code.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, GraphicalReportHandler, LabeledSpan, SourceSpan};

use kinfolk::KinfolkError;
use kinfolk_parser::error::Diagnostic;

/// One renderable piece of a [`KinfolkError`].
pub struct Report<'a> {
    error: &'a KinfolkError,
    diagnostic: Option<&'a Diagnostic>,
}

impl<'a> Report<'a> {
    /// Splits `error` into one report per parser diagnostic, or a single
    /// report for the other variants.
    pub fn split(error: &'a KinfolkError) -> Vec<Self> {
        match error {
            KinfolkError::Parse { err, .. } => err
                .diagnostics()
                .iter()
                .map(|diagnostic| Self {
                    error,
                    diagnostic: Some(diagnostic),
                })
                .collect(),
            _ => vec![Self {
                error,
                diagnostic: None,
            }],
        }
    }

    fn kind_code(&self) -> Option<&'static str> {
        match self.error {
            KinfolkError::Io(_) => Some("kinfolk::io"),
            KinfolkError::Parse { .. } => None,
            KinfolkError::Config(_) => Some("kinfolk::config"),
            KinfolkError::Export(_) => Some("kinfolk::export"),
        }
    }
}

impl fmt::Debug for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.diagnostic {
            Some(diagnostic) => fmt::Debug::fmt(diagnostic, f),
            None => fmt::Debug::fmt(self.error, f),
        }
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.diagnostic {
            Some(diagnostic) => f.write_str(diagnostic.message()),
            None => fmt::Display::fmt(self.error, f),
        }
    }
}

impl std::error::Error for Report<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.diagnostic {
            Some(_) => None,
            None => std::error::Error::source(self.error),
        }
    }
}

impl MietteDiagnostic for Report<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self.diagnostic {
            Some(diagnostic) => diagnostic
                .code()
                .map(|code| Box::new(code) as Box<dyn fmt::Display>),
            None => self
                .kind_code()
                .map(|code| Box::new(code) as Box<dyn fmt::Display>),
        }
    }

    fn severity(&self) -> Option<miette::Severity> {
        let warning = self
            .diagnostic
            .is_some_and(|diagnostic| diagnostic.severity().is_warning());
        Some(if warning {
            miette::Severity::Warning
        } else {
            miette::Severity::Error
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diagnostic?
            .help()
            .map(|help| Box::new(help) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match (self.diagnostic, self.error) {
            (Some(_), KinfolkError::Parse { src, .. }) => Some(src as &dyn miette::SourceCode),
            _ => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = self.diagnostic?.labels();
        if labels.is_empty() {
            return None;
        }
        Some(Box::new(labels.iter().map(|label| {
            let span = SourceSpan::new(label.span().start().into(), label.span().len());
            let message = Some(label.message().to_string());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

/// Renders every report of `err` with miette's graphical handler.
pub fn render_report(err: &KinfolkError) -> String {
    let handler = GraphicalReportHandler::new();
    let mut out = String::new();
    for report in Report::split(err) {
        if handler.render_report(&mut out, &report).is_err() {
            out.push_str(&report.to_string());
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use kinfolk_parser::{
        Span,
        error::{ErrorCode, ParseError},
    };

    use super::*;

    #[test]
    fn test_missing_columns_report_separately() {
        let diags = vec![
            Diagnostic::error("missing required column `ID`")
                .with_code(ErrorCode::E101)
                .with_label(Span::new(0..10), "header row"),
            Diagnostic::error("missing required column `Name`").with_code(ErrorCode::E101),
        ];
        let err = KinfolkError::new_parse_error(ParseError::from(diags), "generation\n1\n");

        let reports = Report::split(&err);
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[1].to_string(), "missing required column `Name`");
        assert_eq!(reports[0].code().unwrap().to_string(), "E101");
        assert!(reports[0].source_code().is_some());
    }

    #[test]
    fn test_config_error_gets_kind_code() {
        let err = KinfolkError::Config("bad value".to_string());

        let reports = Report::split(&err);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].to_string(), "Configuration error: bad value");
        assert_eq!(reports[0].code().unwrap().to_string(), "kinfolk::config");
        assert!(reports[0].labels().is_none());
    }

    #[test]
    fn test_render_report_includes_code_and_help() {
        let diag = Diagnostic::error("source is empty")
            .with_code(ErrorCode::E100)
            .with_help("the table needs a header row");
        let err = KinfolkError::new_parse_error(ParseError::from(diag), "");

        let report = render_report(&err);
        assert!(report.contains("source is empty"));
        assert!(report.contains("E100"));
        assert!(report.contains("header row"));
    }
}
