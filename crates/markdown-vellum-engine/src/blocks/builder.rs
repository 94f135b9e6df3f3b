use xi_rope::Rope;

use crate::inline::{parse_inline, InlineContent};
use crate::source::{slice_to_string, Span};

use super::classify::{LineClass, LinePos};
use super::kinds::{
    AtxHeading, BlockQuote, CodeFence, FootnoteDef, HtmlBlockEnd, HtmlBlockStart, ListMarker,
    RefDefLine, SetextUnderline, TableRow, ThematicBreakLine,
};
use super::types::{Alignment, Block, BlockKind, HeadingStyle, ListData, ListItem, TableCell, TableData};

/// State machine that turns classified lines into the block tree.
///
/// The open stack holds the document, currently open containers (block
/// quotes, list items, footnote definitions) and at most one open leaf on
/// top. Each line first matches container continuation prefixes, then feeds
/// the open leaf or opens new blocks. Every byte of input ends up inside
/// some block's span; blank lines that no container claims accumulate into
/// `BlankLines` nodes so the top-level spans tile the source.
pub struct BlockBuilder<'a> {
    rope: &'a Rope,
    open: Vec<OpenBlock>,
    /// Blank-line spans seen since the last content line, not yet
    /// attributed to a block.
    pending_blanks: Vec<Span>,
}

struct OpenBlock {
    kind: OpenKind,
    start: usize,
    end: usize,
    children: Vec<Block>,
    /// A blank line occurred while this list item was open.
    had_blank: bool,
    /// A blank line occurred after this block's trailing list child.
    list_blank_between: bool,
}

enum OpenKind {
    Document,
    BlockQuote,
    ListItem {
        marker: ListMarker,
        content_col: usize,
        started_blank: bool,
        checked: Option<bool>,
    },
    FootnoteDef {
        label: String,
    },
    Paragraph {
        lines: Vec<Span>,
    },
    FencedCode {
        fence_char: u8,
        fence_len: usize,
        indent: usize,
        info: Span,
        body: Vec<Span>,
        closed: bool,
    },
    IndentedCode {
        body: Vec<Span>,
    },
    HtmlBlock {
        end: HtmlBlockEnd,
        lines: Vec<Span>,
    },
    Table {
        alignments: Vec<Alignment>,
        header: Vec<Span>,
        rows: Vec<Vec<Span>>,
    },
}

impl OpenKind {
    fn is_leaf(&self) -> bool {
        matches!(
            self,
            OpenKind::Paragraph { .. }
                | OpenKind::FencedCode { .. }
                | OpenKind::IndentedCode { .. }
                | OpenKind::HtmlBlock { .. }
                | OpenKind::Table { .. }
        )
    }
}

impl OpenBlock {
    fn new(kind: OpenKind, start: usize) -> Self {
        Self {
            kind,
            start,
            end: start,
            children: Vec::new(),
            had_blank: false,
            list_blank_between: false,
        }
    }
}

impl<'a> BlockBuilder<'a> {
    pub fn new(rope: &'a Rope) -> Self {
        Self {
            rope,
            open: vec![OpenBlock::new(OpenKind::Document, 0)],
            pending_blanks: Vec::new(),
        }
    }

    pub fn push_line(&mut self, c: &LineClass) {
        let mut pos = LinePos::new(c);

        // Phase 1: match continuation prefixes of open containers.
        let (matched, _prefix_fail) = self.match_containers(c, &mut pos);

        // Leaf continuation, only when every container above the leaf matched.
        let tip = self.open.len() - 1;
        if matched == tip && self.open[tip].kind.is_leaf() {
            match &self.open[tip].kind {
                OpenKind::FencedCode {
                    fence_char,
                    fence_len,
                    indent,
                    ..
                } => {
                    let (fc, fl, ind) = (*fence_char, *fence_len, *indent);
                    self.fence_line(c, pos, fc, fl, ind);
                    return;
                }
                OpenKind::IndentedCode { .. } => {
                    if self.indented_code_line(c, &mut pos) {
                        return;
                    }
                }
                OpenKind::HtmlBlock { end, .. } => {
                    let end = *end;
                    if self.html_line(c, pos, end) {
                        return;
                    }
                }
                OpenKind::Table { .. } => {
                    if self.table_line(c, &mut pos) {
                        return;
                    }
                }
                OpenKind::Paragraph { .. } => {
                    if self.paragraph_line(c, &mut pos) {
                        return;
                    }
                }
                _ => {}
            }
        }

        // Lazy continuation: an unmatched container does not end an open
        // paragraph when the line could not start any other block.
        if !c.is_blank && matched < self.open.len() {
            let tip = self.open.len() - 1;
            if matches!(self.open[tip].kind, OpenKind::Paragraph { .. }) {
                let rest = pos.rest_after_ws();
                let ind = pos.indent_cols();
                // A marker after an unmatched list item starts the next
                // item rather than lazily continuing the paragraph, even
                // when it could not interrupt one on its own.
                let unmatched_item = self.open[matched..]
                    .iter()
                    .any(|b| matches!(b.kind, OpenKind::ListItem { .. }));
                let starts_block = ind <= 3
                    && (rest.starts_with('>')
                        || ThematicBreakLine::parse(rest).is_some()
                        || AtxHeading::parse(rest).is_some()
                        || CodeFence::open_sig(rest).is_some()
                        || HtmlBlockStart::parse(rest, true).is_some()
                        || ListMarker::parse(rest)
                            .is_some_and(|m| m.can_interrupt_paragraph() || unmatched_item));
                if !starts_block {
                    pos.skip_ws();
                    let span = Span::new(pos.abs(), c.content_end());
                    if let OpenKind::Paragraph { lines } = &mut self.open[tip].kind {
                        lines.push(span);
                    }
                    self.extend_open_ends(c.span.end);
                    return;
                }
            }
        }

        // Phase 2: close blocks the line did not continue.
        while self.open.len() > matched {
            self.close_top();
        }

        if c.is_blank {
            self.note_blank(c.span);
            return;
        }

        self.resolve_pending_blanks(&pos);
        self.open_new_blocks(c, pos);
    }

    pub fn finish(mut self) -> Vec<Block> {
        while self.open.len() > 1 {
            self.close_top();
        }
        self.flush_pending_blanks();
        self.open.pop().map(|doc| doc.children).unwrap_or_default()
    }

    // ── Phase 1 ─────────────────────────────────────────────────────

    fn match_containers(&mut self, c: &LineClass, pos: &mut LinePos) -> (usize, bool) {
        let mut matched = 1;
        let mut i = 1;
        while i < self.open.len() {
            match &self.open[i].kind {
                OpenKind::BlockQuote => {
                    if c.is_blank {
                        return (matched, true);
                    }
                    match BlockQuote::strip_prefix(pos.remainder()) {
                        Some(off) => pos.advance(off),
                        None => return (matched, true),
                    }
                }
                OpenKind::ListItem {
                    content_col,
                    started_blank,
                    ..
                } => {
                    let col = *content_col;
                    let sb = *started_blank;
                    if pos.rest_is_blank() {
                        let still_empty = sb
                            && self.open[i].children.is_empty()
                            && !self.open[i + 1..].iter().any(|b| b.kind.is_leaf());
                        if still_empty {
                            return (matched, true);
                        }
                        pos.consume_cols(col);
                    } else if pos.indent_cols() >= col {
                        pos.consume_cols(col);
                    } else {
                        return (matched, true);
                    }
                }
                OpenKind::FootnoteDef { .. } => {
                    if pos.rest_is_blank() {
                        pos.consume_cols(FootnoteDef::CONTENT_COL);
                    } else if pos.indent_cols() >= FootnoteDef::CONTENT_COL {
                        pos.consume_cols(FootnoteDef::CONTENT_COL);
                    } else {
                        return (matched, true);
                    }
                }
                _ => break,
            }
            i += 1;
            matched = i;
        }
        (matched, false)
    }

    // ── Leaf continuation ───────────────────────────────────────────

    fn fence_line(&mut self, c: &LineClass, mut pos: LinePos, fc: u8, fl: usize, ind: usize) {
        if CodeFence::closes(pos.remainder(), fc, fl) {
            let tip = self.open.len() - 1;
            if let OpenKind::FencedCode { closed, .. } = &mut self.open[tip].kind {
                *closed = true;
            }
            self.extend_open_ends(c.span.end);
            self.close_top();
            return;
        }
        pos.consume_cols(ind);
        let span = Span::new(pos.abs(), c.content_end());
        let tip = self.open.len() - 1;
        if let OpenKind::FencedCode { body, .. } = &mut self.open[tip].kind {
            body.push(span);
        }
        self.extend_open_ends(c.span.end);
    }

    fn indented_code_line(&mut self, c: &LineClass, pos: &mut LinePos) -> bool {
        if pos.rest_is_blank() {
            self.pending_blanks.push(c.span);
            return true;
        }
        if pos.indent_cols() >= 4 {
            // Interior blank lines belong to the code block.
            let blanks = std::mem::take(&mut self.pending_blanks);
            let blank_spans: Vec<Span> = blanks
                .iter()
                .map(|sp| self.code_blank_content(*sp))
                .collect();
            pos.consume_cols(4);
            let span = Span::new(pos.abs(), c.content_end());
            let tip = self.open.len() - 1;
            if let OpenKind::IndentedCode { body } = &mut self.open[tip].kind {
                body.extend(blank_spans);
                body.push(span);
            }
            self.extend_open_ends(c.span.end);
            return true;
        }
        false
    }

    /// Content span of a blank line inside an indented code block, with up
    /// to four columns of indentation stripped.
    fn code_blank_content(&self, line: Span) -> Span {
        let text = slice_to_string(self.rope, line);
        let trimmed = text.trim_end_matches(['\r', '\n']);
        let bytes = trimmed.as_bytes();
        let mut cols = 0;
        let mut off = 0;
        while off < bytes.len() && cols < 4 {
            match bytes[off] {
                b' ' => {
                    cols += 1;
                    off += 1;
                }
                b'\t' => {
                    if cols + 4 > 4 {
                        break;
                    }
                    cols += 4;
                    off += 1;
                }
                _ => break,
            }
        }
        Span::new(line.start + off, line.start + trimmed.len())
    }

    fn html_line(&mut self, c: &LineClass, pos: LinePos, end: HtmlBlockEnd) -> bool {
        if pos.rest_is_blank() && end == HtmlBlockEnd::BlankLine {
            return false;
        }
        let span = Span::new(pos.abs(), c.content_end());
        let tip = self.open.len() - 1;
        if let OpenKind::HtmlBlock { lines, .. } = &mut self.open[tip].kind {
            lines.push(span);
        }
        self.extend_open_ends(c.span.end);
        if HtmlBlockStart::line_ends(end, pos.remainder()) {
            self.close_top();
        }
        true
    }

    fn table_line(&mut self, c: &LineClass, pos: &mut LinePos) -> bool {
        if pos.rest_is_blank() || memchr::memchr(b'|', pos.remainder().as_bytes()).is_none() {
            return false;
        }
        let base = pos.abs();
        let text = pos.remainder().to_string();
        let tip = self.open.len() - 1;
        let num_cols = match &self.open[tip].kind {
            OpenKind::Table { alignments, .. } => alignments.len(),
            _ => return false,
        };
        let cells: Vec<Span> = TableRow::split_cells(&text, num_cols)
            .into_iter()
            .map(|r| Span::new(base + r.start, base + r.end))
            .collect();
        if let OpenKind::Table { rows, .. } = &mut self.open[tip].kind {
            rows.push(cells);
        }
        self.extend_open_ends(c.span.end);
        true
    }

    /// Handles a line while a paragraph is open: blank and interrupting
    /// lines return `false` (the paragraph closes in phase 2), setext
    /// underlines and table delimiter rows consume the paragraph, anything
    /// else continues it.
    fn paragraph_line(&mut self, c: &LineClass, pos: &mut LinePos) -> bool {
        if pos.rest_is_blank() {
            return false;
        }
        let ind = pos.indent_cols();
        let rest = pos.rest_after_ws();

        if ind <= 3 && self.try_table_morph(rest) {
            self.extend_open_ends(c.span.end);
            return true;
        }

        if ind <= 3 {
            if let Some(level) = SetextUnderline::parse(rest) {
                self.convert_paragraph_to_setext(level, c);
                return true;
            }
            let interrupts = ThematicBreakLine::parse(rest).is_some()
                || AtxHeading::parse(rest).is_some()
                || CodeFence::open_sig(rest).is_some()
                || HtmlBlockStart::parse(rest, true).is_some()
                || rest.starts_with('>')
                || ListMarker::parse(rest).is_some_and(|m| m.can_interrupt_paragraph());
            if interrupts {
                return false;
            }
        }

        pos.skip_ws();
        let span = Span::new(pos.abs(), c.content_end());
        let tip = self.open.len() - 1;
        if let OpenKind::Paragraph { lines } = &mut self.open[tip].kind {
            lines.push(span);
        }
        self.extend_open_ends(c.span.end);
        true
    }

    /// A single-line paragraph followed by a matching delimiter row becomes
    /// a table; the header must contain a pipe and the column counts must
    /// agree, otherwise the line is ordinary paragraph content.
    fn try_table_morph(&mut self, rest: &str) -> bool {
        let tip = self.open.len() - 1;
        let header_span = match &self.open[tip].kind {
            OpenKind::Paragraph { lines } if lines.len() == 1 => lines[0],
            _ => return false,
        };
        let Some(alignments) = TableRow::parse_delimiter(rest) else {
            return false;
        };
        let header_text = slice_to_string(self.rope, header_span);
        if !header_text.contains('|') {
            return false;
        }
        if TableRow::count_cells(&header_text) != alignments.len() {
            return false;
        }
        let header: Vec<Span> = TableRow::split_cells(&header_text, alignments.len())
            .into_iter()
            .map(|r| Span::new(header_span.start + r.start, header_span.start + r.end))
            .collect();
        let para = self.open.pop().unwrap();
        let mut table = OpenBlock::new(
            OpenKind::Table {
                alignments,
                header,
                rows: Vec::new(),
            },
            para.start,
        );
        table.end = para.end;
        self.open.push(table);
        true
    }

    fn convert_paragraph_to_setext(&mut self, level: u8, c: &LineClass) {
        let para = self.open.pop().unwrap();
        let lines = match para.kind {
            OpenKind::Paragraph { lines } => lines,
            _ => unreachable!("setext conversion requires an open paragraph"),
        };
        let inlines = parse_inline(&self.paragraph_content(&lines));
        let span = Span::new(para.start, c.span.end);
        self.append_block(Block::new(
            span,
            BlockKind::Heading {
                level,
                style: HeadingStyle::Setext,
                inlines,
            },
        ));
        self.extend_open_ends(c.span.end);
    }

    // ── Blank-line bookkeeping ──────────────────────────────────────

    /// Records a blank line nobody consumed and marks list looseness.
    fn note_blank(&mut self, span: Span) {
        self.pending_blanks.push(span);
        for i in (1..self.open.len()).rev() {
            match self.open[i].kind {
                OpenKind::ListItem { .. } => {
                    self.open[i].had_blank = true;
                    return;
                }
                OpenKind::BlockQuote => break,
                _ => {}
            }
        }
        let last = self.open.last_mut().unwrap();
        if matches!(
            last.children.last().map(|b| &b.kind),
            Some(BlockKind::List(_))
        ) {
            last.list_blank_between = true;
        }
    }

    /// Decides what happens to buffered blank lines once a content line
    /// arrives: inside a container they are interior (the container's span
    /// will grow over them); at document level they become a `BlankLines`
    /// block, unless the line continues the trailing list.
    fn resolve_pending_blanks(&mut self, pos: &LinePos) {
        if self.pending_blanks.is_empty() {
            return;
        }
        if self.open.len() > 1 {
            self.pending_blanks.clear();
            return;
        }
        let continues_list = pos.indent_cols() <= 3
            && match ListMarker::parse(pos.rest_after_ws()) {
                Some(m) => matches!(
                    self.open[0].children.last().map(|b| &b.kind),
                    Some(BlockKind::List(data)) if data.marker == m.marker && data.ordered == m.ordered
                ),
                None => false,
            };
        if continues_list {
            self.pending_blanks.clear();
        } else {
            self.flush_pending_blanks();
        }
    }

    fn flush_pending_blanks(&mut self) {
        if self.pending_blanks.is_empty() {
            return;
        }
        let spans = std::mem::take(&mut self.pending_blanks);
        let span = Span::new(spans[0].start, spans[spans.len() - 1].end);
        let count = spans.len();
        self.open[0]
            .children
            .push(Block::new(span, BlockKind::BlankLines { count }));
    }

    // ── Phase 3: opening new blocks ─────────────────────────────────

    fn open_new_blocks(&mut self, c: &LineClass, mut pos: LinePos) {
        let mut opened_any = false;
        loop {
            if pos.rest_is_blank() {
                if opened_any {
                    self.extend_open_ends(c.span.end);
                } else {
                    self.note_blank(c.span);
                }
                return;
            }

            let ind = pos.indent_cols();
            if ind <= 3 {
                let rest = pos.rest_after_ws();

                if let Some(off) = BlockQuote::strip_prefix(pos.remainder()) {
                    let start = self.block_start(c, &pos);
                    pos.advance(off);
                    self.open.push(OpenBlock::new(OpenKind::BlockQuote, start));
                    opened_any = true;
                    continue;
                }

                if let Some((level, range)) = AtxHeading::parse(rest) {
                    let rest_start = pos.content_end() - rest.len();
                    let content = Span::new(rest_start + range.start, rest_start + range.end);
                    let start = self.block_start(c, &pos);
                    let inlines = parse_inline(&InlineContent::contiguous(
                        slice_to_string(self.rope, content),
                        content,
                    ));
                    self.append_block(Block::new(
                        Span::new(start, c.span.end),
                        BlockKind::Heading {
                            level,
                            style: HeadingStyle::Atx,
                            inlines,
                        },
                    ));
                    self.extend_open_ends(c.span.end);
                    return;
                }

                if let Some(sig) = CodeFence::open_sig(rest) {
                    let rest_start = pos.content_end() - rest.len();
                    let raw_info = &rest[sig.info_start..];
                    let info_trim_start = raw_info.len() - raw_info.trim_start().len();
                    let info_text = raw_info.trim();
                    let info = Span::new(
                        rest_start + sig.info_start + info_trim_start,
                        rest_start + sig.info_start + info_trim_start + info_text.len(),
                    );
                    let start = self.block_start(c, &pos);
                    self.open.push(OpenBlock::new(
                        OpenKind::FencedCode {
                            fence_char: sig.fence_char,
                            fence_len: sig.fence_len,
                            indent: ind,
                            info,
                            body: Vec::new(),
                            closed: false,
                        },
                        start,
                    ));
                    self.extend_open_ends(c.span.end);
                    return;
                }

                if let Some(end) = HtmlBlockStart::parse(rest, false) {
                    let start = self.block_start(c, &pos);
                    let line_span = Span::new(pos.abs(), c.content_end());
                    if HtmlBlockStart::line_ends(end, rest) {
                        self.append_block(Block::new(
                            Span::new(start, c.span.end),
                            BlockKind::HtmlBlock {
                                lines: vec![line_span],
                            },
                        ));
                    } else {
                        let mut block = OpenBlock::new(
                            OpenKind::HtmlBlock {
                                end,
                                lines: vec![line_span],
                            },
                            start,
                        );
                        block.end = c.span.end;
                        self.open.push(block);
                    }
                    self.extend_open_ends(c.span.end);
                    return;
                }

                if let Some(marker) = ThematicBreakLine::parse(rest) {
                    let start = self.block_start(c, &pos);
                    self.append_block(Block::new(
                        Span::new(start, c.span.end),
                        BlockKind::ThematicBreak { marker },
                    ));
                    self.extend_open_ends(c.span.end);
                    return;
                }

                if let Some(marker) = ListMarker::parse(rest) {
                    let rest_blank = self.start_list_item(c, &mut pos, marker, ind);
                    opened_any = true;
                    if rest_blank {
                        self.extend_open_ends(c.span.end);
                        return;
                    }
                    continue;
                }

                if let Some(def) = FootnoteDef::parse(rest) {
                    let rest_start = pos.content_end() - rest.len();
                    let start = self.block_start(c, &pos);
                    self.open.push(OpenBlock::new(
                        OpenKind::FootnoteDef { label: def.label },
                        start,
                    ));
                    let skip = rest_start + def.content_start - pos.abs();
                    pos.advance(skip);
                    opened_any = true;
                    continue;
                }

                if let Some(def) = RefDefLine::parse(pos.remainder()) {
                    let base = pos.abs();
                    let start = self.block_start(c, &pos);
                    self.append_block(Block::new(
                        Span::new(start, c.span.end),
                        BlockKind::LinkRefDef {
                            label: Span::new(base + def.label.start, base + def.label.end),
                            dest: def.dest,
                            title: def.title,
                        },
                    ));
                    self.extend_open_ends(c.span.end);
                    return;
                }
            } else {
                let start = self.block_start(c, &pos);
                pos.consume_cols(4);
                self.open.push(OpenBlock::new(
                    OpenKind::IndentedCode {
                        body: vec![Span::new(pos.abs(), c.content_end())],
                    },
                    start,
                ));
                self.extend_open_ends(c.span.end);
                return;
            }

            // Default: open a paragraph.
            let start = self.block_start(c, &pos);
            pos.skip_ws();
            self.open.push(OpenBlock::new(
                OpenKind::Paragraph {
                    lines: vec![Span::new(pos.abs(), c.content_end())],
                },
                start,
            ));
            self.extend_open_ends(c.span.end);
            return;
        }
    }

    /// Top-level blocks start at the physical line start so that sibling
    /// spans tile the source; nested blocks start at the current position.
    fn block_start(&self, c: &LineClass, pos: &LinePos) -> usize {
        if self.open.len() == 1 {
            c.span.start
        } else {
            pos.abs()
        }
    }

    /// Returns true when the rest of the line after the marker is blank.
    fn start_list_item(
        &mut self,
        c: &LineClass,
        pos: &mut LinePos,
        marker: ListMarker,
        marker_indent: usize,
    ) -> bool {
        let start = self.block_start(c, pos);
        pos.skip_ws();
        pos.advance(marker.marker_len);
        let after = pos.indent_cols();
        let rest_blank = pos.rest_is_blank();
        let spaces_after = if rest_blank || after == 0 || after >= 5 {
            1
        } else {
            after
        };
        let content_col = marker_indent + marker.marker_len + spaces_after;
        if !rest_blank {
            pos.consume_cols(spaces_after);
        }

        let mut checked = None;
        if !rest_blank {
            if let Some((state, consumed)) = super::kinds::list::parse_task_marker(pos.remainder())
            {
                checked = Some(state);
                pos.advance(consumed);
            }
        }

        self.open.push(OpenBlock::new(
            OpenKind::ListItem {
                marker,
                content_col,
                started_blank: rest_blank,
                checked,
            },
            start,
        ));
        rest_blank
    }

    // ── Closing & finalizing ────────────────────────────────────────

    fn close_top(&mut self) {
        let ob = self.open.pop().expect("document frame never closes here");
        let span = Span::new(ob.start, ob.end);
        match ob.kind {
            OpenKind::Document => unreachable!("document is closed by finish()"),
            OpenKind::BlockQuote => self.append_block(Block::new(
                span,
                BlockKind::BlockQuote {
                    children: ob.children,
                },
            )),
            OpenKind::FootnoteDef { label } => self.append_block(Block::new(
                span,
                BlockKind::FootnoteDefinition {
                    label,
                    children: ob.children,
                },
            )),
            OpenKind::ListItem {
                marker, checked, ..
            } => self.finalize_list_item(ob.children, span, marker, checked, ob.had_blank),
            OpenKind::Paragraph { lines } => {
                let inlines = parse_inline(&self.paragraph_content(&lines));
                self.append_block(Block::new(span, BlockKind::Paragraph { inlines }));
            }
            OpenKind::FencedCode {
                fence_char,
                fence_len,
                indent,
                info,
                body,
                closed,
            } => self.append_block(Block::new(
                span,
                BlockKind::FencedCode {
                    fence_char,
                    fence_len,
                    indent,
                    info,
                    body,
                    closed,
                },
            )),
            OpenKind::IndentedCode { body } => {
                self.append_block(Block::new(span, BlockKind::IndentedCode { body }))
            }
            OpenKind::HtmlBlock { lines, .. } => {
                self.append_block(Block::new(span, BlockKind::HtmlBlock { lines }))
            }
            OpenKind::Table {
                alignments,
                header,
                rows,
            } => {
                let header = self.finalize_cells(header);
                let rows = rows
                    .into_iter()
                    .map(|row| self.finalize_cells(row))
                    .collect();
                self.append_block(Block::new(
                    span,
                    BlockKind::Table(Box::new(TableData {
                        alignments,
                        header,
                        rows,
                    })),
                ));
            }
        }
    }

    fn finalize_cells(&self, spans: Vec<Span>) -> Vec<TableCell> {
        spans
            .into_iter()
            .map(|span| {
                let text = slice_to_string(self.rope, span);
                let inlines = parse_inline(&InlineContent::contiguous(text, span));
                TableCell { span, inlines }
            })
            .collect()
    }

    fn paragraph_content(&self, lines: &[Span]) -> InlineContent {
        let mut content = InlineContent::new();
        let last = lines.len().saturating_sub(1);
        for (i, sp) in lines.iter().enumerate() {
            let mut text = slice_to_string(self.rope, *sp);
            let mut sp = *sp;
            if i == last {
                let trimmed_len = text.trim_end_matches([' ', '\t']).len();
                text.truncate(trimmed_len);
                sp = Span::new(sp.start, sp.start + trimmed_len);
            }
            content.push_chunk(&text, sp);
            if i < last {
                content.push_line_break(Span::new(sp.end, lines[i + 1].start));
            }
        }
        content
    }

    fn finalize_list_item(
        &mut self,
        children: Vec<Block>,
        span: Span,
        marker: ListMarker,
        checked: Option<bool>,
        had_blank: bool,
    ) {
        let item = ListItem {
            span,
            checked,
            children,
        };
        let blank_between_children = had_blank && item.children.len() >= 2;
        let parent = self.open.last_mut().unwrap();
        if had_blank
            && !blank_between_children
            && matches!(parent.kind, OpenKind::ListItem { .. })
        {
            parent.had_blank = true;
        }

        if let Some(Block {
            span: list_span,
            kind: BlockKind::List(data),
        }) = parent.children.last_mut()
        {
            if data.marker == marker.marker && data.ordered == marker.ordered {
                if parent.list_blank_between || blank_between_children {
                    data.tight = false;
                }
                list_span.end = list_span.end.max(item.span.end);
                data.items.push(item);
                if had_blank {
                    parent.list_blank_between = true;
                }
                return;
            }
        }

        parent.list_blank_between = had_blank;
        let tight = !blank_between_children;
        parent.children.push(Block::new(
            item.span,
            BlockKind::List(ListData {
                ordered: marker.ordered,
                start: marker.start,
                tight,
                marker: marker.marker,
                items: vec![item],
            }),
        ));
    }

    fn append_block(&mut self, block: Block) {
        let parent = self.open.last_mut().unwrap();
        parent.end = parent.end.max(block.span.end);
        parent.children.push(block);
    }

    fn extend_open_ends(&mut self, end: usize) {
        for ob in &mut self.open {
            ob.end = ob.end.max(end);
        }
    }
}
