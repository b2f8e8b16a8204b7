// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Wadler-Lindig document tree: the layout protocol the AST emits into.
//!
//! The AST declares *intent* — break points, grouping, indentation — and the
//! renderer decides horizontal vs vertical layout against a line width.
//! Nothing in the AST emission makes layout decisions itself.
//!
//! # Example
//!
//! ```
//! use sqlift_core::docvec;
//! use sqlift_core::unparse::{Document, group};
//!
//! let doc = group(docvec!["a", Document::Break, "b"]);
//! assert_eq!(doc.to_pretty_string(), "a b");
//! assert_eq!(doc.to_pretty_string_width(1), "a\nb");
//! ```

/// Indentation width for [`Document::Indent`] blocks.
pub const INDENT: isize = 4;

/// Default line width for pretty-printing (characters per line).
pub const DEFAULT_LINE_WIDTH: isize = 80;

/// A pretty-printable document tree.
///
/// Documents are composable, immutable tree structures describing output
/// layout. They are rendered to strings in a final pass with automatic
/// indentation handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document<'a> {
    /// A borrowed string literal.
    Str(&'a str),
    /// An owned string.
    String(String),
    /// A single character.
    Rune(char),
    /// A mandatory single space.
    Space,
    /// A soft break: a space when the group fits on one line, a newline
    /// (plus indentation) when it doesn't.
    Break,
    /// A mandatory newline followed by current indentation.
    Line,
    /// Increase indentation for nested content.
    Indent(Box<Document<'a>>),
    /// A group rendered flat when it fits within the line width, broken
    /// across lines otherwise.
    Group(Box<Document<'a>>),
    /// Pin the indentation of the inner document to the column where the
    /// anchor begins, aligning its break points vertically.
    Anchor(Box<Document<'a>>),
    /// A double-quoted SQL identifier.
    Identifier(String),
    /// A sequence of documents.
    Vec(Vec<Document<'a>>),
    /// Empty document.
    Nil,
}

/// Coerce a value into a `Document`.
pub trait Documentable<'a> {
    /// Converts this value into a `Document`.
    fn to_doc(self) -> Document<'a>;
}

impl<'a> Documentable<'a> for &'a str {
    fn to_doc(self) -> Document<'a> {
        Document::Str(self)
    }
}

impl<'a> Documentable<'a> for String {
    fn to_doc(self) -> Document<'a> {
        Document::String(self)
    }
}

impl<'a> Documentable<'a> for Document<'a> {
    fn to_doc(self) -> Document<'a> {
        self
    }
}

impl<'a> Documentable<'a> for Vec<Document<'a>> {
    fn to_doc(self) -> Document<'a> {
        Document::Vec(self)
    }
}

/// Join multiple documents together in a vector.
///
/// Each element is converted via [`Documentable`]; no separator is inserted.
#[macro_export]
macro_rules! docvec {
    () => {
        $crate::unparse::Document::Vec(Vec::new())
    };

    ($first:expr $(,)?) => {
        $crate::unparse::Document::Vec(
            vec![$crate::unparse::Documentable::to_doc($first)]
        )
    };

    ($first:expr, $($rest:expr),+ $(,)?) => {
        match $crate::unparse::Documentable::to_doc($first) {
            $crate::unparse::Document::Vec(mut vec) => {
                $(
                    vec.push($crate::unparse::Documentable::to_doc($rest));
                )*
                $crate::unparse::Document::Vec(vec)
            },
            first => {
                $crate::unparse::Document::Vec(
                    vec![first, $($crate::unparse::Documentable::to_doc($rest)),+]
                )
            }
        }
    };
}

/// Creates a `Line` document — a mandatory newline plus indentation.
#[must_use]
pub fn line() -> Document<'static> {
    Document::Line
}

/// Creates a `Nil` document.
#[must_use]
pub fn nil() -> Document<'static> {
    Document::Nil
}

/// Wraps a document in an `Indent` block.
#[must_use]
pub fn indent(doc: Document<'_>) -> Document<'_> {
    Document::Indent(Box::new(doc))
}

/// Wraps a document in a `Group` — flat if it fits, broken otherwise.
#[must_use]
pub fn group(doc: Document<'_>) -> Document<'_> {
    Document::Group(Box::new(doc))
}

/// Wraps a document in an `Anchor` — break points align to the column where
/// the anchor begins.
#[must_use]
pub fn anchor(doc: Document<'_>) -> Document<'_> {
    Document::Anchor(Box::new(doc))
}

/// Joins documents with a separator between each pair.
#[must_use]
pub fn join<'a>(
    docs: impl IntoIterator<Item = Document<'a>>,
    separator: &Document<'a>,
) -> Document<'a> {
    let docs: Vec<_> = docs.into_iter().collect();
    if docs.is_empty() {
        return Document::Nil;
    }
    let mut result = Vec::with_capacity(docs.len() * 2 - 1);
    let mut first = true;
    for doc in docs {
        if !first {
            result.push(separator.clone());
        }
        result.push(doc);
        first = false;
    }
    Document::Vec(result)
}

/// Concatenates documents without any separator.
#[must_use]
pub fn concat<'a>(docs: impl IntoIterator<Item = Document<'a>>) -> Document<'a> {
    Document::Vec(docs.into_iter().collect())
}

// --- Rendering ---

/// Rendering mode for break/group layout decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Soft breaks render as spaces.
    Flat,
    /// Soft breaks render as newlines.
    Break,
}

impl Document<'_> {
    /// Renders the document using the default line width.
    #[must_use]
    pub fn to_pretty_string(&self) -> String {
        self.to_pretty_string_width(DEFAULT_LINE_WIDTH)
    }

    /// Renders the document using the given line width.
    ///
    /// Uses the Wadler-Lindig algorithm iteratively with a work-list. A
    /// `Group` is rendered flat only when the group *and* its trailing
    /// siblings fit within `width` columns.
    #[must_use]
    pub fn to_pretty_string_width(&self, width: isize) -> String {
        use std::collections::VecDeque;

        let mut output = String::new();
        let mut col = 0_isize;

        let mut work: VecDeque<(isize, Mode, &Document<'_>)> = VecDeque::new();
        work.push_back((0, Mode::Break, self));

        while let Some((indent, mode, doc)) = work.pop_front() {
            match doc {
                Document::Nil => {}
                Document::Str(s) => {
                    output.push_str(s);
                    col += width_of(s);
                }
                Document::String(s) => {
                    output.push_str(s);
                    col += width_of(s);
                }
                Document::Rune(c) => {
                    output.push(*c);
                    col += 1;
                }
                Document::Space => {
                    output.push(' ');
                    col += 1;
                }
                Document::Identifier(name) => {
                    output.push('"');
                    output.push_str(name);
                    output.push('"');
                    col += width_of(name) + 2;
                }
                Document::Line => {
                    output.push('\n');
                    write_indent(&mut output, indent);
                    col = indent;
                }
                Document::Indent(inner) => {
                    work.push_front((indent + INDENT, mode, inner));
                }
                Document::Anchor(inner) => {
                    work.push_front((col, mode, inner));
                }
                Document::Vec(docs) => {
                    for d in docs.iter().rev() {
                        work.push_front((indent, mode, d));
                    }
                }
                Document::Group(inner) => {
                    let remaining = width - col;
                    let fits_flat = {
                        let mut check: VecDeque<(Mode, &Document<'_>)> = VecDeque::new();
                        check.push_back((Mode::Flat, inner.as_ref()));
                        for (_, cont_mode, cont_doc) in &work {
                            check.push_back((*cont_mode, cont_doc));
                        }
                        fits(remaining, check)
                    };
                    let child_mode = if fits_flat { Mode::Flat } else { Mode::Break };
                    work.push_front((indent, child_mode, inner));
                }
                Document::Break => match mode {
                    Mode::Break => {
                        output.push('\n');
                        write_indent(&mut output, indent);
                        col = indent;
                    }
                    Mode::Flat => {
                        output.push(' ');
                        col += 1;
                    }
                },
            }
        }

        // Strip trailing whitespace from every line.
        output
            .split('\n')
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Returns `true` if the work-list fits within `remaining` columns before
/// the next mandatory line break.
fn fits(mut remaining: isize, mut work: std::collections::VecDeque<(Mode, &Document<'_>)>) -> bool {
    while let Some((mode, current)) = work.pop_front() {
        if remaining < 0 {
            return false;
        }
        match current {
            Document::Nil => {}
            Document::Str(s) => remaining -= width_of(s),
            Document::String(s) => remaining -= width_of(s),
            Document::Rune(_) | Document::Space => remaining -= 1,
            Document::Identifier(name) => remaining -= width_of(name) + 2,
            Document::Line => return true,
            Document::Break => match mode {
                Mode::Flat => remaining -= 1,
                Mode::Break => return true,
            },
            Document::Indent(inner) | Document::Anchor(inner) => {
                work.push_front((mode, inner));
            }
            Document::Vec(docs) => {
                for d in docs.iter().rev() {
                    work.push_front((mode, d));
                }
            }
            Document::Group(inner) => work.push_front((Mode::Flat, inner)),
        }
    }
    remaining >= 0
}

fn width_of(s: &str) -> isize {
    isize::try_from(s.chars().count()).unwrap_or(isize::MAX)
}

fn write_indent(output: &mut String, indent: isize) {
    for _ in 0..indent {
        output.push(' ');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docvec;

    #[test]
    fn str_and_string_documents() {
        assert_eq!(Document::Str("hello").to_pretty_string(), "hello");
        assert_eq!(
            Document::String("world".to_string()).to_pretty_string(),
            "world"
        );
        assert_eq!(Document::Nil.to_pretty_string(), "");
    }

    #[test]
    fn rune_space_identifier() {
        let doc = docvec![
            Document::Rune('('),
            Document::Identifier("users".to_string()),
            Document::Space,
            Document::Rune(')'),
        ];
        assert_eq!(doc.to_pretty_string(), "(\"users\" )");
    }

    #[test]
    fn line_document() {
        let doc = docvec!["a", line(), "b"];
        assert_eq!(doc.to_pretty_string(), "a\nb");
    }

    #[test]
    fn indent_document() {
        let doc = docvec!["CREATE (", indent(docvec![line(), "id INTEGER"]), line(), ")"];
        assert_eq!(doc.to_pretty_string(), "CREATE (\n    id INTEGER\n)");
    }

    #[test]
    fn docvec_flattens_leading_vec() {
        let inner = docvec!["a", "b"];
        let doc = docvec![inner, "c"];
        assert_eq!(doc.to_pretty_string(), "abc");
        if let Document::Vec(v) = doc {
            assert_eq!(v.len(), 3);
        } else {
            panic!("expected Vec");
        }
    }

    #[test]
    fn join_documents() {
        let docs = vec![
            Document::Str("a"),
            Document::Str("b"),
            Document::Str("c"),
        ];
        assert_eq!(join(docs, &Document::Str(", ")).to_pretty_string(), "a, b, c");
        assert_eq!(join(Vec::new(), &Document::Str(", ")).to_pretty_string(), "");
    }

    #[test]
    fn group_fits_inline() {
        let doc = group(docvec!["a", Document::Break, "b"]);
        assert_eq!(doc.to_pretty_string(), "a b");
    }

    #[test]
    fn group_breaks_when_too_long() {
        let long = "x".repeat(79);
        let doc = group(docvec![Document::String(long.clone()), Document::Break, "y"]);
        assert_eq!(doc.to_pretty_string(), long + "\ny");
    }

    #[test]
    fn group_fit_considers_continuation_docs() {
        // group("a b") fits in 4 columns alone, but the trailing " c"
        // overflows, so the group breaks.
        let doc = docvec![group(docvec!["a", Document::Break, "b"]), " c"];
        assert_eq!(doc.to_pretty_string_width(4), "a\nb c");
    }

    #[test]
    fn anchor_pins_breaks_to_entry_column() {
        let doc = group(docvec![
            "cols: ",
            anchor(docvec!["a", Document::Break, "b", Document::Break, "c"]),
        ]);
        assert_eq!(doc.to_pretty_string_width(8), "cols: a\n      b\n      c");
    }

    #[test]
    fn break_outside_group_is_newline() {
        let doc = docvec!["a", Document::Break, "b"];
        assert_eq!(doc.to_pretty_string(), "a\nb");
    }

    #[test]
    fn trailing_whitespace_is_stripped() {
        let doc = docvec!["a", Document::Space, line(), "b"];
        assert_eq!(doc.to_pretty_string(), "a\nb");
    }

    #[test]
    fn realistic_create_table_layout() {
        let columns = join(
            vec![
                docvec![Document::Identifier("id".to_string()), " INTEGER"],
                docvec![Document::Identifier("name".to_string()), " TEXT"],
            ],
            &docvec![Document::Rune(','), Document::Break],
        );
        let doc = group(docvec![
            "CREATE TABLE ",
            Document::Identifier("t".to_string()),
            " (",
            indent(docvec![Document::Break, columns]),
            Document::Break,
            ")",
        ]);
        assert_eq!(
            doc.to_pretty_string(),
            "CREATE TABLE \"t\" ( \"id\" INTEGER, \"name\" TEXT )"
        );
        assert_eq!(
            doc.to_pretty_string_width(20),
            "CREATE TABLE \"t\" (\n    \"id\" INTEGER,\n    \"name\" TEXT\n)"
        );
    }
}
