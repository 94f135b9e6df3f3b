//! Block-level incremental reparsing.
//!
//! An edit maps to a damage window of top-level blocks. Only the window's
//! text is reparsed; blocks before it are reused as-is, blocks after it are
//! reused with spans shifted by the edit delta. Any doubt about the splice
//! (descriptor mismatch, a leaf left hungry at the window edge, a coverage
//! gap) falls back to a full reparse, so the result always agrees with
//! `parse(new_source)` or is `parse(new_source)`.

use xi_rope::Rope;

use crate::blocks::{parse_blocks, Block, BlockKind};
use crate::document::{parse, Document};
use crate::inline::{Inline, InlineKind};
use crate::invariants;
use crate::source::{preview, Span};

use super::edit::EditInfo;

pub fn parse_incremental(
    prev: &Document,
    old_source: &str,
    new_source: &str,
    edit: EditInfo,
) -> Document {
    if !edit.reconciles(old_source.len(), new_source.len()) || prev.span.end != old_source.len() {
        tracing::debug!(
            target: "vellum::incremental",
            ?edit,
            old_len = old_source.len(),
            new_len = new_source.len(),
            "edit does not reconcile the sources, full reparse"
        );
        return parse(new_source);
    }
    if prev.blocks.is_empty() {
        return parse(new_source);
    }

    let blocks = &prev.blocks;

    // Damage window: leftmost block ending after the edit start, rightmost
    // block starting before the old edit end.
    let mut i = blocks
        .iter()
        .position(|b| b.span.end > edit.start)
        .unwrap_or(blocks.len() - 1);
    let mut j = i;
    for (k, b) in blocks.iter().enumerate() {
        if b.span.start < edit.old_end {
            j = k;
        } else {
            break;
        }
    }
    if j < i {
        j = i;
    }

    // Damage expansion: one block each side, then widen until both window
    // boundaries sit at a blank run or a document edge. This catches
    // paragraph merges/splits, setext promotion and list continuation
    // changes next to the edit.
    i = i.saturating_sub(1);
    j = (j + 1).min(blocks.len() - 1);
    while i > 0 && !blocks[i - 1].is_blank_lines() {
        i -= 1;
    }
    while j + 1 < blocks.len() && !blocks[j + 1].is_blank_lines() {
        j += 1;
    }

    let delta = edit.delta();
    let window_start = blocks[i].span.start;
    let old_window_end = blocks[j].span.end;
    let new_window_end = old_window_end as isize + delta;
    if new_window_end < window_start as isize || new_window_end as usize > new_source.len() {
        tracing::debug!(
            target: "vellum::incremental",
            window_start,
            old_window_end,
            delta,
            "window does not map into the new source, full reparse"
        );
        return parse(new_source);
    }
    let new_window_end = new_window_end as usize;

    if tracing::enabled!(target: "vellum::incremental", tracing::Level::TRACE) {
        tracing::trace!(
            target: "vellum::incremental",
            first_block = i,
            last_block = j,
            window_start,
            new_window_end,
            old_window = %preview(prev.source(), Span::new(window_start, old_window_end), 80),
            "reparsing damage window"
        );
    }

    let window_rope = Rope::from(&new_source[window_start..new_window_end]);
    let mut window_blocks = parse_blocks(&window_rope);
    for block in &mut window_blocks {
        shift_block(block, window_start as isize);
    }

    let at_document_end = new_window_end == new_source.len();
    if let Some(last) = window_blocks.last() {
        if !at_document_end && leaf_is_hungry(last) {
            tracing::debug!(
                target: "vellum::incremental",
                "unterminated leaf at window edge, full reparse"
            );
            return parse(new_source);
        }
        if !at_document_end && changes_continuation(last, &blocks[j]) {
            tracing::debug!(
                target: "vellum::incremental",
                "window-final block changed shape, full reparse"
            );
            return parse(new_source);
        }
    }

    let mut new_blocks = Vec::with_capacity(blocks.len() + window_blocks.len());
    new_blocks.extend_from_slice(&blocks[..i]);
    new_blocks.extend(window_blocks);
    for block in &blocks[j + 1..] {
        let mut shifted = block.clone();
        shift_block(&mut shifted, delta);
        new_blocks.push(shifted);
    }

    let doc = Document::from_parts(Rope::from(new_source), new_blocks);
    if let Err(reason) = invariants::check(&doc) {
        tracing::warn!(
            target: "vellum::incremental",
            %reason,
            "spliced tree failed validation, full reparse"
        );
        return parse(new_source);
    }
    doc
}

/// A leaf that would keep consuming lines past the window edge: an
/// unterminated fence, or a raw HTML block (its end condition is not kept
/// on the node, so any trailing one is treated as hungry).
fn leaf_is_hungry(block: &Block) -> bool {
    match &block.kind {
        BlockKind::FencedCode { closed, .. } => !*closed,
        BlockKind::HtmlBlock { .. } => true,
        _ => false,
    }
}

/// Whether the reparsed window's final block could impose different
/// continuation rules on the (reused) blocks that follow it. A changed
/// kind always can; a changed list can change item content columns, which
/// decide whether later indented content belongs to it.
fn changes_continuation(new_last: &Block, old_last: &Block) -> bool {
    if std::mem::discriminant(&new_last.kind) != std::mem::discriminant(&old_last.kind) {
        return true;
    }
    matches!(new_last.kind, BlockKind::List(_)) && {
        let mut renormalized = old_last.clone();
        shift_block(&mut renormalized, new_last.span.start as isize - old_last.span.start as isize);
        renormalized != *new_last
    }
}

pub(crate) fn shift_block(block: &mut Block, delta: isize) {
    block.span = block.span.shifted(delta);
    match &mut block.kind {
        BlockKind::Paragraph { inlines } | BlockKind::Heading { inlines, .. } => {
            shift_inlines(inlines, delta);
        }
        BlockKind::FencedCode { info, body, .. } => {
            *info = info.shifted(delta);
            shift_spans(body, delta);
        }
        BlockKind::IndentedCode { body } => shift_spans(body, delta),
        BlockKind::BlockQuote { children } | BlockKind::FootnoteDefinition { children, .. } => {
            for child in children {
                shift_block(child, delta);
            }
        }
        BlockKind::List(data) => {
            for item in &mut data.items {
                item.span = item.span.shifted(delta);
                for child in &mut item.children {
                    shift_block(child, delta);
                }
            }
        }
        BlockKind::HtmlBlock { lines } => shift_spans(lines, delta),
        BlockKind::LinkRefDef { label, .. } => *label = label.shifted(delta),
        BlockKind::Table(data) => {
            for cell in data.header.iter_mut().chain(data.rows.iter_mut().flatten()) {
                cell.span = cell.span.shifted(delta);
                shift_inlines(&mut cell.inlines, delta);
            }
        }
        BlockKind::ThematicBreak { .. } | BlockKind::BlankLines { .. } => {}
    }
}

fn shift_spans(spans: &mut [Span], delta: isize) {
    for sp in spans {
        *sp = sp.shifted(delta);
    }
}

fn shift_inlines(inlines: &mut [Inline], delta: isize) {
    for inline in inlines {
        inline.span = inline.span.shifted(delta);
        match &mut inline.kind {
            InlineKind::Emphasis { children, .. }
            | InlineKind::Strong { children, .. }
            | InlineKind::Strikethrough { children }
            | InlineKind::Link { children, .. }
            | InlineKind::Image { children, .. }
            | InlineKind::RefLink { children, .. }
            | InlineKind::RefImage { children, .. } => shift_inlines(children, delta),
            _ => {}
        }
    }
}
