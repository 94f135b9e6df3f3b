//! Serialization back to Markdown.
//!
//! Two surfaces with different contracts:
//!
//! - [`serialize`] is lossless: it replays the source bytes that each
//!   top-level block's span covers. Because the spans tile the source,
//!   `serialize(&parse(s)) == s` for every input, markers, indentation
//!   and blank runs included.
//! - [`write_markdown`] is the normalizing writer behind the handle's
//!   `to_markdown`: it regenerates canonical Markdown from node metadata,
//!   collapsing blank runs to one blank line and ending with a single
//!   trailing newline.

use crate::blocks::{Alignment, Block, BlockKind, ListData};
use crate::document::Document;
use crate::inline::{Inline, InlineKind};
use crate::source::slice_to_string;

/// Lossless text of the document; byte-identical to the parsed source.
pub fn serialize(doc: &Document) -> String {
    let mut out = String::with_capacity(doc.span.len());
    for block in &doc.blocks {
        out.push_str(&slice_to_string(doc.source(), block.span));
    }
    out
}

/// Canonical (normalized) Markdown for the document.
pub fn write_markdown(doc: &Document) -> String {
    let mut parts: Vec<String> = Vec::new();
    for block in &doc.blocks {
        if let Some(text) = write_block(doc, block) {
            parts.push(text);
        }
    }
    let mut out = parts.join("\n");
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// Renders one block without a trailing blank line; `BlankLines` nodes
/// render to nothing (separation is re-derived).
fn write_block(doc: &Document, block: &Block) -> Option<String> {
    let mut out = String::new();
    match &block.kind {
        BlockKind::BlankLines { .. } => return None,
        BlockKind::Paragraph { inlines } => {
            write_inlines(doc, inlines, &mut out);
            out.push('\n');
        }
        BlockKind::Heading {
            level,
            style: _,
            inlines,
        } => {
            for _ in 0..*level {
                out.push('#');
            }
            out.push(' ');
            write_inlines(doc, inlines, &mut out);
            out.push('\n');
        }
        BlockKind::FencedCode {
            fence_char,
            fence_len,
            info,
            body,
            ..
        } => {
            let fence: String = std::iter::repeat(*fence_char as char)
                .take(*fence_len)
                .collect();
            out.push_str(&fence);
            if !info.is_empty() {
                out.push_str(&slice_to_string(doc.source(), *info));
            }
            out.push('\n');
            for line in body {
                out.push_str(&slice_to_string(doc.source(), *line));
                out.push('\n');
            }
            out.push_str(&fence);
            out.push('\n');
        }
        BlockKind::IndentedCode { body } => {
            for line in body {
                out.push_str("    ");
                out.push_str(&slice_to_string(doc.source(), *line));
                out.push('\n');
            }
        }
        BlockKind::ThematicBreak { marker } => {
            for _ in 0..3 {
                out.push(*marker as char);
            }
            out.push('\n');
        }
        BlockKind::BlockQuote { children } => {
            let inner = write_children(doc, children);
            if inner.is_empty() {
                out.push_str(">\n");
            }
            for line in inner.lines() {
                if line.is_empty() {
                    out.push_str(">\n");
                } else {
                    out.push_str("> ");
                    out.push_str(line);
                    out.push('\n');
                }
            }
        }
        BlockKind::List(data) => {
            write_list(doc, data, &mut out);
        }
        BlockKind::HtmlBlock { lines } => {
            for line in lines {
                out.push_str(&slice_to_string(doc.source(), *line));
                out.push('\n');
            }
        }
        BlockKind::LinkRefDef { label, dest, title } => {
            out.push('[');
            out.push_str(&slice_to_string(doc.source(), *label));
            out.push_str("]: ");
            out.push_str(dest);
            if let Some(title) = title {
                out.push_str(" \"");
                out.push_str(title);
                out.push('"');
            }
            out.push('\n');
        }
        BlockKind::Table(data) => {
            let cell_text = |inlines: &[Inline]| {
                let mut s = String::new();
                write_inlines(doc, inlines, &mut s);
                s
            };
            out.push('|');
            for cell in &data.header {
                out.push(' ');
                out.push_str(&cell_text(&cell.inlines));
                out.push_str(" |");
            }
            out.push('\n');
            out.push('|');
            for align in &data.alignments {
                out.push_str(match align {
                    Alignment::None => " --- |",
                    Alignment::Left => " :-- |",
                    Alignment::Center => " :-: |",
                    Alignment::Right => " --: |",
                });
            }
            out.push('\n');
            for row in &data.rows {
                out.push('|');
                for cell in row {
                    out.push(' ');
                    out.push_str(&cell_text(&cell.inlines));
                    out.push_str(" |");
                }
                out.push('\n');
            }
        }
        BlockKind::FootnoteDefinition { label, children } => {
            out.push_str("[^");
            out.push_str(label);
            out.push_str("]: ");
            let inner = write_children(doc, children);
            let mut first = true;
            for line in inner.lines() {
                if first {
                    out.push_str(line);
                    first = false;
                } else {
                    out.push_str("\n    ");
                    out.push_str(line);
                }
            }
            out.push('\n');
        }
    }
    Some(out)
}

fn write_children(doc: &Document, children: &[Block]) -> String {
    let mut parts = Vec::new();
    for child in children {
        if let Some(text) = write_block(doc, child) {
            parts.push(text);
        }
    }
    parts.join("\n")
}

fn write_list(doc: &Document, data: &ListData, out: &mut String) {
    let mut number = data.start;
    for item in &data.items {
        let marker = if data.ordered {
            let m = format!("{}{}", number, data.marker as char);
            number += 1;
            m
        } else {
            (data.marker as char).to_string()
        };
        let mut content = String::new();
        if let Some(state) = item.checked {
            content.push_str(if state { "[x] " } else { "[ ] " });
        }
        content.push_str(&write_children(doc, &item.children));
        let indent = " ".repeat(marker.len() + 1);
        let mut first = true;
        for line in content.lines() {
            if first {
                out.push_str(&marker);
                out.push(' ');
                out.push_str(line);
                first = false;
            } else if line.is_empty() {
                // Blank separator inside a loose item.
            } else {
                out.push_str(&indent);
                out.push_str(line);
            }
            out.push('\n');
        }
        if first {
            // Empty item.
            out.push_str(&marker);
            out.push('\n');
        }
    }
}

/// Writes inline nodes as Markdown text. Node source slices are replayed
/// verbatim; only line breaks are re-derived so container prefixes from the
/// original do not leak through.
fn write_inlines(doc: &Document, inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        match &inline.kind {
            InlineKind::SoftBreak => out.push('\n'),
            InlineKind::HardBreak => out.push_str("\\\n"),
            _ => out.push_str(&slice_to_string(doc.source(), inline.span)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse;
    use pretty_assertions::assert_eq;

    #[test]
    fn serialize_is_identity() {
        let sources = [
            "# Hello\n",
            "# Hello\n\n\n\nWorld",
            "para one\npara one line two\n\n* a\n* b\n",
            "> quote\n>\n> more\n\n```rust\nfn x() {}\n```\n",
            "| a | b |\n|---|---|\n| 1 | 2 |\n",
            "text with **bold** and _em_\r\nand a crlf line\r\n",
        ];
        for src in sources {
            assert_eq!(serialize(&parse(src)), src, "round-trip failed for {src:?}");
        }
    }

    #[test]
    fn normalizing_writer_collapses_blank_runs() {
        let doc = parse("# Hello\n\n\n\nWorld");
        assert_eq!(write_markdown(&doc), "# Hello\n\nWorld\n");
    }

    #[test]
    fn normalizing_writer_keeps_marker_choices() {
        let doc = parse("* star\n* list\n\n~~~\nfenced\n~~~\n");
        assert_eq!(write_markdown(&doc), "* star\n* list\n\n~~~\nfenced\n~~~\n");
    }

    #[test]
    fn normalizing_writer_regenerates_quotes() {
        let doc = parse(">   spaced quote");
        assert_eq!(write_markdown(&doc), "> spaced quote\n");
    }
}
