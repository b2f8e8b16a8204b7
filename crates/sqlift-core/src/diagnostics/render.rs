// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Gutter-formatted rendering of diagnostic reports.
//!
//! Output shape:
//!
//! ```text
//! error[0001]: parse error
//!   ┌─ schema.sql:3:21
//!   │
//! 3 │ CREATE TABLE t (id INTEGR PRIMARY KEY);
//!   │                     ^^^^^ expected type name
//!   │
//!   = note: attempting to parse column definition
//! ```

use std::fmt::Write as _;

use crate::source_analysis::{SourceFile, Span};

use super::Report;

/// One source line intersected by a labelled range.
///
/// All offsets are in code points, matching [`Span`] addressing.
struct LineInfo<'src> {
    /// 1-based line number.
    number: usize,
    /// The line content, without its newline.
    content: &'src str,
    /// 0-based code-point column of the range start within this line.
    col: usize,
    /// Code-point offset of the line start within the source.
    start: usize,
}

/// Renders [`Report`]s into gutter-formatted text.
#[derive(Debug, Default)]
pub struct Renderer;

impl Renderer {
    /// Creates a new renderer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Renders one report against its source file.
    #[must_use]
    pub fn render(&self, report: &Report, source: &SourceFile) -> String {
        let mut out = String::new();

        let _ = writeln!(
            out,
            "{}[{:04}]: {}",
            report.severity.as_str(),
            report.code,
            report.message
        );

        let mut gutter_width = 1;
        for (i, label) in report.labels.iter().enumerate() {
            let lines = lines_in_range(source, label.span);
            let Some(first) = lines.first() else {
                continue;
            };

            // Gutter sized to the widest line number in this snippet.
            let max_line = lines.last().map_or(first.number, |line| line.number);
            gutter_width = decimal_width(max_line) + 1;

            let header_col = first.col + 1;
            let _ = writeln!(
                out,
                "{} ┌─ {}:{}:{}",
                pad("", gutter_width),
                source.name,
                first.number,
                header_col
            );
            let _ = writeln!(out, "{} │", pad("", gutter_width));

            for line in &lines {
                let _ = writeln!(
                    out,
                    "{} │ {}",
                    pad(&line.number.to_string(), gutter_width),
                    line.content
                );
            }

            // Caret underline under the first line: min(range, rest of line),
            // at least one caret.
            let line_content_end = first.start + first.content.chars().count();
            let range_start = (label.span.start() as usize).min(line_content_end);
            let range_end = (label.span.end() as usize).min(line_content_end);
            let carets = range_end.saturating_sub(range_start).max(1);

            let mut pointer = format!("{} │ ", pad("", gutter_width));
            pointer.push_str(&" ".repeat(first.col));
            pointer.push_str(&"^".repeat(carets));
            if !label.note.is_empty() {
                pointer.push(' ');
                pointer.push_str(&label.note);
            }
            let _ = writeln!(out, "{pointer}");

            if i < report.labels.len() - 1 {
                let _ = writeln!(out, "{} ·", pad("", gutter_width));
            }
        }

        if !report.notes.is_empty() {
            let _ = writeln!(out, "{} │", pad("", gutter_width));
            for note in &report.notes {
                let _ = writeln!(out, "{} = note: {}", pad("", gutter_width), note);
            }
        }

        out
    }
}

/// Collects the source lines intersected by a span, walking the buffer in
/// code points.
fn lines_in_range(source: &SourceFile, span: Span) -> Vec<LineInfo<'_>> {
    let mut result = Vec::new();
    let start = span.start() as usize;
    let end = span.end() as usize;

    let mut line_start = 0usize;
    for (number, content) in source.text.split('\n').enumerate() {
        let line_chars = content.chars().count();
        let line_end = line_start + line_chars;

        if line_end >= start && line_start <= end {
            let col = start.saturating_sub(line_start).min(line_chars);
            result.push(LineInfo {
                number: number + 1,
                content,
                col,
                start: line_start,
            });
        }

        line_start = line_end + 1; // skip the newline
        if line_start > end {
            break;
        }
    }
    result
}

fn pad(s: &str, width: usize) -> String {
    format!("{s:>width$}")
}

fn decimal_width(mut n: usize) -> usize {
    let mut width = 1;
    while n >= 10 {
        n /= 10;
        width += 1;
    }
    width
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::SourceFile;

    #[test]
    fn renders_single_label_with_caret() {
        let source = SourceFile::new("schema.sql", "CREATE TABLE t (id INTEGER;\n");
        let report = Report::error("parse error")
            .with_label(Span::new(26, 27), "expected ')' got ';'")
            .with_note("attempting to parse table definition");
        let rendered = Renderer::new().render(&report, &source);

        assert!(rendered.starts_with("error[0001]: parse error\n"));
        assert!(rendered.contains("┌─ schema.sql:1:27"));
        assert!(rendered.contains("1 │ CREATE TABLE t (id INTEGER;"));
        assert!(rendered.contains("^ expected ')' got ';'"));
        assert!(rendered.contains("= note: attempting to parse table definition"));
    }

    #[test]
    fn caret_width_matches_range() {
        let source = SourceFile::new("schema.sql", "PRAGMA broken value;\n");
        let report = Report::error("parse error").with_label(Span::new(14, 19), "unexpected");
        let rendered = Renderer::new().render(&report, &source);
        assert!(rendered.contains("^^^^^ unexpected"), "got:\n{rendered}");
    }

    #[test]
    fn multiple_labels_are_separated() {
        let source = SourceFile::new("s.sql", "a\nb\n");
        let report = Report::error("two places")
            .with_label(Span::new(0, 1), "here")
            .with_label(Span::new(2, 3), "and here");
        let rendered = Renderer::new().render(&report, &source);
        assert!(rendered.contains(" ·\n"), "got:\n{rendered}");
        assert!(rendered.contains("┌─ s.sql:1:1"));
        assert!(rendered.contains("┌─ s.sql:2:1"));
    }

    #[test]
    fn columns_and_carets_count_code_points() {
        // "café" occupies code points 7..11; multi-byte characters must not
        // shift the column or the underline.
        let source = SourceFile::new("s.sql", "PRAGMA café = ON;\n");
        let report = Report::error("parse error").with_label(Span::new(7, 11), "here");
        let rendered = Renderer::new().render(&report, &source);
        assert!(rendered.contains("┌─ s.sql:1:8"), "got:\n{rendered}");
        assert!(rendered.contains("        ^^^^ here"), "got:\n{rendered}");
    }

    #[test]
    fn warning_header() {
        let source = SourceFile::new("s.sql", "x\n");
        let report = Report::warning("unnamed table constraint").with_label(Span::new(0, 1), "");
        let rendered = Renderer::new().render(&report, &source);
        assert!(rendered.starts_with("warning[0002]: unnamed table constraint\n"));
    }

    #[test]
    fn line_numbers_widen_the_gutter() {
        let mut text = String::new();
        for _ in 0..11 {
            text.push_str("x\n");
        }
        text.push_str("CREATE;\n");
        let source = SourceFile::new("s.sql", text);
        // The label sits on line 12, so the gutter must fit two digits.
        let report = Report::error("parse error").with_label(Span::new(22, 28), "here");
        let rendered = Renderer::new().render(&report, &source);
        assert!(rendered.contains("12 │ CREATE;"), "got:\n{rendered}");
    }
}
