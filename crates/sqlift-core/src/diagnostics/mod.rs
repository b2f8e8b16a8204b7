// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Diagnostic reports: severity, message, labelled source ranges, and notes.
//!
//! Reports are keyed by source range in the parser, so a second report at
//! the same location is suppressed (and treated as runaway recovery). The
//! [`Renderer`] turns a report into a gutter-formatted snippet.

mod render;

pub use render::Renderer;

use ecow::EcoString;

use crate::source_analysis::Span;

/// Diagnostic severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// An error that blocks downstream diff/migration use.
    Error,
    /// A warning that should be addressed but does not halt parsing.
    Warning,
}

impl Severity {
    /// Returns the lowercase name used in rendered headers.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

/// A labelled source range inside a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    /// The source range the label points at.
    pub span: Span,
    /// Short text printed next to the caret underline.
    pub note: EcoString,
}

impl Label {
    /// Creates a new label.
    #[must_use]
    pub fn new(span: Span, note: impl Into<EcoString>) -> Self {
        Self {
            span,
            note: note.into(),
        }
    }
}

/// A diagnostic report with labelled ranges and freeform notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Error or warning.
    pub severity: Severity,
    /// Numeric code shown in the header, e.g. `error[0001]`.
    pub code: u16,
    /// The headline message.
    pub message: EcoString,
    /// Labelled source ranges, rendered in order.
    pub labels: Vec<Label>,
    /// Freeform notes rendered after the labels.
    pub notes: Vec<EcoString>,
}

impl Report {
    /// Creates an error report.
    #[must_use]
    pub fn error(message: impl Into<EcoString>) -> Self {
        Self {
            severity: Severity::Error,
            code: 1,
            message: message.into(),
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Creates a warning report.
    #[must_use]
    pub fn warning(message: impl Into<EcoString>) -> Self {
        Self {
            severity: Severity::Warning,
            code: 2,
            message: message.into(),
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Sets the numeric code.
    #[must_use]
    pub fn with_code(mut self, code: u16) -> Self {
        self.code = code;
        self
    }

    /// Appends a labelled source range.
    #[must_use]
    pub fn with_label(mut self, span: Span, note: impl Into<EcoString>) -> Self {
        self.labels.push(Label::new(span, note));
        self
    }

    /// Appends a freeform note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<EcoString>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Returns the span of the first label, if any.
    #[must_use]
    pub fn primary_span(&self) -> Option<Span> {
        self.labels.first().map(|label| label.span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_builder() {
        let report = Report::error("parse error")
            .with_label(Span::new(3, 7), "expected ')'")
            .with_note("attempting to parse table definition");
        assert_eq!(report.severity, Severity::Error);
        assert_eq!(report.code, 1);
        assert_eq!(report.labels.len(), 1);
        assert_eq!(report.notes.len(), 1);
        assert_eq!(report.primary_span(), Some(Span::new(3, 7)));
    }

    #[test]
    fn warning_severity_name() {
        let report = Report::warning("unnamed table constraint");
        assert_eq!(report.severity.as_str(), "warning");
        assert_eq!(report.code, 2);
    }
}
