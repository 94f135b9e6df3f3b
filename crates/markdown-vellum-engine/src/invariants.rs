//! Structural validation of a parsed tree.
//!
//! Used by tests, and non-panicking by the incremental driver to decide
//! whether a spliced document is sound or a full reparse is needed.

use crate::blocks::{Block, BlockKind};
use crate::document::Document;
use crate::inline::Inline;
use crate::source::Span;

/// Checks span bounds, child containment, sibling ordering and top-level
/// coverage. Returns a description of the first violation found.
pub fn check(doc: &Document) -> Result<(), String> {
    let len = doc.span.end;
    if doc.span.start != 0 {
        return Err(format!("document span starts at {}", doc.span.start));
    }

    // Top-level blocks must tile [0, len) exactly.
    let mut cursor = 0usize;
    for (i, b) in doc.blocks.iter().enumerate() {
        if b.span.start != cursor {
            return Err(format!(
                "block {i} starts at {} but previous coverage ends at {cursor}",
                b.span.start
            ));
        }
        if b.span.end < b.span.start || b.span.end > len {
            return Err(format!("block {i} span {:?} out of bounds (len {len})", b.span));
        }
        cursor = b.span.end;
        check_block(b, i)?;
    }
    if cursor != len {
        return Err(format!("top-level coverage ends at {cursor}, source length is {len}"));
    }
    Ok(())
}

fn check_block(block: &Block, idx: usize) -> Result<(), String> {
    match &block.kind {
        BlockKind::Paragraph { inlines } | BlockKind::Heading { inlines, .. } => {
            check_inlines(inlines, block.span, idx)
        }
        BlockKind::BlockQuote { children } | BlockKind::FootnoteDefinition { children, .. } => {
            check_children(children, block.span, idx)
        }
        BlockKind::List(data) => {
            let mut prev_end = block.span.start;
            for item in &data.items {
                if item.span.start < prev_end {
                    return Err(format!("block {idx}: list items overlap at {:?}", item.span));
                }
                if item.span.end > block.span.end {
                    return Err(format!(
                        "block {idx}: item {:?} escapes list span {:?}",
                        item.span, block.span
                    ));
                }
                check_children(&item.children, item.span, idx)?;
                prev_end = item.span.end;
            }
            Ok(())
        }
        BlockKind::Table(data) => {
            for cell in data.header.iter().chain(data.rows.iter().flatten()) {
                check_inlines(&cell.inlines, cell.span, idx)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn check_children(children: &[Block], parent: Span, idx: usize) -> Result<(), String> {
    let mut prev_end = parent.start;
    for child in children {
        if child.span.start < prev_end {
            return Err(format!(
                "block {idx}: child {:?} overlaps previous sibling ending at {prev_end}",
                child.span
            ));
        }
        if child.span.end > parent.end {
            return Err(format!(
                "block {idx}: child {:?} escapes parent {:?}",
                child.span, parent
            ));
        }
        check_block(child, idx)?;
        prev_end = child.span.end;
    }
    Ok(())
}

fn check_inlines(inlines: &[Inline], parent: Span, idx: usize) -> Result<(), String> {
    let mut prev_end = parent.start;
    for inline in inlines {
        if inline.span.start < prev_end {
            return Err(format!(
                "block {idx}: inline {:?} overlaps previous sibling ending at {prev_end}",
                inline.span
            ));
        }
        if inline.span.end > parent.end {
            return Err(format!(
                "block {idx}: inline {:?} escapes parent {:?}",
                inline.span, parent
            ));
        }
        if let Some(children) = inline.children() {
            check_inlines(children, inline.span, idx)?;
        }
        prev_end = inline.span.end;
    }
    Ok(())
}

/// Panicking wrapper for tests.
pub fn assert_valid(doc: &Document) {
    if let Err(reason) = check(doc) {
        panic!("invariant violation: {reason}");
    }
}
