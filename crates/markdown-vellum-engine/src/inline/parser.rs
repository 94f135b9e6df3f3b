//! Inline parsing: a single left-to-right scan over a block's assembled
//! content, followed by tree construction.
//!
//! The scan emits a flat item list, pushing delimiter runs and bracket
//! openers onto stacks. Brackets resolve as soon as their `]` arrives
//! (inline, reference, collapsed or shortcut form); emphasis resolves per
//! bracket scope and once more at the end. Unmatched openers demote to
//! plain text — inline parsing never fails.

use std::ops::Range;

use super::content::InlineContent;
use super::emphasis::{flanking, process_delims, Delim};
use super::links::{
    parse_autolink, parse_footnote_ref, parse_html_inline, parse_inline_suffix,
    parse_reference_suffix, LinkTarget,
};
use super::types::{Inline, InlineKind};

pub fn parse_inline(content: &InlineContent) -> Vec<Inline> {
    if content.is_empty() {
        return Vec::new();
    }
    let mut scanner = Scanner::new(&content.text);
    scanner.run();
    let Scanner {
        items,
        mut delims,
        delim_stack,
        links,
        ..
    } = scanner;
    process_delims(&mut delims, &delim_stack);
    build_tree(content, &items, &delims, &links)
}

// ── Pass 1: scanning ────────────────────────────────────────────────

struct Item {
    local: Range<usize>,
    kind: ItemKind,
}

enum ItemKind {
    Text,
    /// `\x`; the literal is the escaped character.
    Escaped,
    Code {
        tick_len: usize,
        literal: Box<str>,
    },
    Autolink {
        url: String,
        email: bool,
    },
    Html,
    SoftBreak,
    HardBreak,
    FootnoteRef {
        label: String,
    },
    Delim(usize),
    /// `[` or `![` that never resolved into a link.
    BracketOpen,
    LinkStart(usize),
    LinkEnd(usize),
}

struct LinkSpec {
    image: bool,
    target: LinkTarget,
}

#[derive(Clone)]
struct Bracket {
    item_idx: usize,
    image: bool,
    delim_bottom: usize,
    active: bool,
    /// Local offset where the bracketed text begins.
    text_pos: usize,
}

struct Scanner<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    items: Vec<Item>,
    delims: Vec<Delim>,
    /// Indices into `delims` still eligible for matching, document order.
    delim_stack: Vec<usize>,
    brackets: Vec<Bracket>,
    links: Vec<LinkSpec>,
}

static SPECIAL: [bool; 256] = {
    let mut t = [false; 256];
    t[b'\\' as usize] = true;
    t[b'`' as usize] = true;
    t[b'*' as usize] = true;
    t[b'_' as usize] = true;
    t[b'~' as usize] = true;
    t[b'!' as usize] = true;
    t[b'[' as usize] = true;
    t[b']' as usize] = true;
    t[b'<' as usize] = true;
    t[b'\n' as usize] = true;
    t
};

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
            items: Vec::new(),
            delims: Vec::new(),
            delim_stack: Vec::new(),
            brackets: Vec::new(),
            links: Vec::new(),
        }
    }

    fn run(&mut self) {
        let len = self.bytes.len();
        let mut text_start = 0;
        while self.pos < len {
            let b = self.bytes[self.pos];
            if !SPECIAL[b as usize] {
                self.pos += 1;
                continue;
            }
            match b {
                b'\\' => {
                    if self.pos + 1 < len && self.bytes[self.pos + 1] == b'\n' {
                        self.flush_text(text_start, self.pos);
                        self.items.push(Item {
                            local: self.pos..self.pos + 2,
                            kind: ItemKind::HardBreak,
                        });
                        self.pos += 2;
                        text_start = self.pos;
                    } else if self.pos + 1 < len && self.bytes[self.pos + 1].is_ascii_punctuation()
                    {
                        self.flush_text(text_start, self.pos);
                        self.items.push(Item {
                            local: self.pos..self.pos + 2,
                            kind: ItemKind::Escaped,
                        });
                        self.pos += 2;
                        text_start = self.pos;
                    } else {
                        self.pos += 1;
                    }
                }
                b'`' => {
                    self.flush_text(text_start, self.pos);
                    self.scan_code_span();
                    text_start = self.pos;
                }
                b'*' | b'_' | b'~' => {
                    let run_start = self.pos;
                    while self.pos < len && self.bytes[self.pos] == b {
                        self.pos += 1;
                    }
                    if b == b'~' && self.pos - run_start < 2 {
                        continue;
                    }
                    self.flush_text(text_start, run_start);
                    let before = char_before(self.text, run_start);
                    let after = char_at(self.text, self.pos);
                    let (can_open, can_close) = flanking(b, before, after);
                    let idx = self.delims.len();
                    self.delims.push(Delim {
                        marker: b,
                        cur_start: run_start,
                        cur_end: self.pos,
                        can_open,
                        can_close,
                        active: true,
                        open_tags: Vec::new(),
                        close_tags: Vec::new(),
                    });
                    self.delim_stack.push(idx);
                    self.items.push(Item {
                        local: run_start..self.pos,
                        kind: ItemKind::Delim(idx),
                    });
                    text_start = self.pos;
                }
                b'!' => {
                    if self.pos + 1 < len && self.bytes[self.pos + 1] == b'[' {
                        self.flush_text(text_start, self.pos);
                        self.open_bracket(true, self.pos + 2);
                        self.pos += 2;
                        text_start = self.pos;
                    } else {
                        self.pos += 1;
                    }
                }
                b'[' => {
                    if let Some((label, end)) = parse_footnote_ref(self.text, self.pos) {
                        self.flush_text(text_start, self.pos);
                        self.items.push(Item {
                            local: self.pos..end,
                            kind: ItemKind::FootnoteRef { label },
                        });
                        self.pos = end;
                        text_start = self.pos;
                    } else {
                        self.flush_text(text_start, self.pos);
                        self.open_bracket(false, self.pos + 1);
                        self.pos += 1;
                        text_start = self.pos;
                    }
                }
                b']' => {
                    self.flush_text(text_start, self.pos);
                    self.pos += 1;
                    self.close_bracket();
                    text_start = self.pos;
                }
                b'<' => {
                    if let Some((url, email, end)) = parse_autolink(self.text, self.pos) {
                        self.flush_text(text_start, self.pos);
                        self.items.push(Item {
                            local: self.pos..end,
                            kind: ItemKind::Autolink { url, email },
                        });
                        self.pos = end;
                        text_start = self.pos;
                    } else if let Some(end) = parse_html_inline(self.text, self.pos) {
                        self.flush_text(text_start, self.pos);
                        self.items.push(Item {
                            local: self.pos..end,
                            kind: ItemKind::Html,
                        });
                        self.pos = end;
                        text_start = self.pos;
                    } else {
                        self.pos += 1;
                    }
                }
                b'\n' => {
                    let mut text_end = self.pos;
                    while text_end > text_start && self.bytes[text_end - 1] == b' ' {
                        text_end -= 1;
                    }
                    let hard = self.pos - text_end >= 2;
                    self.flush_text(text_start, text_end);
                    self.items.push(Item {
                        local: text_end..self.pos + 1,
                        kind: if hard {
                            ItemKind::HardBreak
                        } else {
                            ItemKind::SoftBreak
                        },
                    });
                    self.pos += 1;
                    text_start = self.pos;
                }
                _ => unreachable!("byte {b} is not in the special table"),
            }
        }
        self.flush_text(text_start, len);
    }

    fn flush_text(&mut self, start: usize, end: usize) {
        if start < end {
            self.items.push(Item {
                local: start..end,
                kind: ItemKind::Text,
            });
        }
    }

    fn open_bracket(&mut self, image: bool, text_pos: usize) {
        let width = if image { 2 } else { 1 };
        let idx = self.items.len();
        self.items.push(Item {
            local: self.pos..self.pos + width,
            kind: ItemKind::BracketOpen,
        });
        self.brackets.push(Bracket {
            item_idx: idx,
            image,
            delim_bottom: self.delim_stack.len(),
            active: true,
            text_pos,
        });
    }

    /// Backtick-run code span: the closer is the next run of the same
    /// length; content newlines become spaces and one space of padding is
    /// stripped. An unclosed opener stays literal text.
    fn scan_code_span(&mut self) {
        let len = self.bytes.len();
        let start = self.pos;
        let mut open = 0;
        while self.pos < len && self.bytes[self.pos] == b'`' {
            open += 1;
            self.pos += 1;
        }
        let after_open = self.pos;
        loop {
            match memchr::memchr(b'`', &self.bytes[self.pos..]) {
                None => {
                    self.items.push(Item {
                        local: start..after_open,
                        kind: ItemKind::Text,
                    });
                    self.pos = after_open;
                    return;
                }
                Some(off) => {
                    self.pos += off;
                    let close_start = self.pos;
                    let mut close = 0;
                    while self.pos < len && self.bytes[self.pos] == b'`' {
                        close += 1;
                        self.pos += 1;
                    }
                    if close == open {
                        let raw = &self.text[after_open..close_start];
                        let content = raw.replace('\n', " ");
                        let bytes = content.as_bytes();
                        let stripped = if bytes.len() >= 2
                            && bytes[0] == b' '
                            && bytes[bytes.len() - 1] == b' '
                            && !bytes.iter().all(|&x| x == b' ')
                        {
                            &content[1..content.len() - 1]
                        } else {
                            content.as_str()
                        };
                        self.items.push(Item {
                            local: start..self.pos,
                            kind: ItemKind::Code {
                                tick_len: open,
                                literal: stripped.into(),
                            },
                        });
                        return;
                    }
                }
            }
        }
    }

    fn close_bracket(&mut self) {
        let close_end = self.pos;
        let Some(bracket) = self.brackets.last().cloned() else {
            self.items.push(Item {
                local: close_end - 1..close_end,
                kind: ItemKind::Text,
            });
            return;
        };
        if !bracket.active {
            self.brackets.pop();
            self.items.push(Item {
                local: close_end - 1..close_end,
                kind: ItemKind::Text,
            });
            return;
        }

        let enclosed = &self.text[bracket.text_pos..close_end - 1];
        let resolved: Option<(LinkTarget, usize)> =
            if let Some((dest, title, end)) = parse_inline_suffix(self.text, close_end) {
                Some((LinkTarget::Inline { dest, title }, end))
            } else if let Some((label, end)) = parse_reference_suffix(self.text, close_end) {
                let label = if label.is_empty() {
                    enclosed.to_string()
                } else {
                    label
                };
                if label.trim().is_empty() {
                    None
                } else {
                    Some((LinkTarget::Reference { label }, end))
                }
            } else if !enclosed.trim().is_empty() {
                Some((
                    LinkTarget::Reference {
                        label: enclosed.to_string(),
                    },
                    close_end,
                ))
            } else {
                None
            };

        let Some((target, end)) = resolved else {
            self.brackets.pop();
            self.items.push(Item {
                local: close_end - 1..close_end,
                kind: ItemKind::Text,
            });
            return;
        };

        // Links cannot nest: earlier link openers go inert.
        if !bracket.image {
            for br in &mut self.brackets {
                if !br.image {
                    br.active = false;
                }
            }
        }
        self.brackets.pop();

        let scope: Vec<usize> = self.delim_stack[bracket.delim_bottom..].to_vec();
        process_delims(&mut self.delims, &scope);
        self.delim_stack.truncate(bracket.delim_bottom);

        let link_idx = self.links.len();
        self.links.push(LinkSpec {
            image: bracket.image,
            target,
        });
        self.items[bracket.item_idx].kind = ItemKind::LinkStart(link_idx);
        self.items.push(Item {
            local: close_end - 1..end,
            kind: ItemKind::LinkEnd(link_idx),
        });
        self.pos = end;
    }
}

fn char_before(s: &str, byte_pos: usize) -> char {
    if byte_pos == 0 {
        return ' ';
    }
    s[..byte_pos].chars().next_back().unwrap_or(' ')
}

fn char_at(s: &str, byte_pos: usize) -> char {
    if byte_pos >= s.len() {
        return ' ';
    }
    s[byte_pos..].chars().next().unwrap_or(' ')
}

// ── Pass 2: tree construction ───────────────────────────────────────

enum FrameKind {
    Emphasis { marker: u8 },
    Strong { marker: u8 },
    Strikethrough,
    Link(usize),
}

struct Frame {
    kind: FrameKind,
    start_local: usize,
    children: Vec<Inline>,
}

fn build_tree(
    content: &InlineContent,
    items: &[Item],
    delims: &[Delim],
    links: &[LinkSpec],
) -> Vec<Inline> {
    let mut top: Vec<Inline> = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();

    fn push_node(top: &mut Vec<Inline>, stack: &mut Vec<Frame>, node: Inline) {
        let sink = match stack.last_mut() {
            Some(frame) => &mut frame.children,
            None => top,
        };
        // Merge adjacent plain text nodes.
        if let (
            Some(Inline {
                span,
                kind: InlineKind::Text { literal: None },
            }),
            InlineKind::Text { literal: None },
        ) = (sink.last_mut(), &node.kind)
        {
            if span.end == node.span.start {
                span.end = node.span.end;
                return;
            }
        }
        sink.push(node);
    }

    for item in items {
        let span = content.span_of(item.local.clone());
        match &item.kind {
            ItemKind::Text | ItemKind::BracketOpen => {
                push_node(&mut top, &mut stack, Inline::text(span));
            }
            ItemKind::Escaped => {
                let literal = content.text[item.local.start + 1..item.local.end].into();
                push_node(
                    &mut top,
                    &mut stack,
                    Inline::new(
                        span,
                        InlineKind::Text {
                            literal: Some(literal),
                        },
                    ),
                );
            }
            ItemKind::Code { tick_len, literal } => {
                push_node(
                    &mut top,
                    &mut stack,
                    Inline::new(
                        span,
                        InlineKind::Code {
                            tick_len: *tick_len,
                            literal: literal.clone(),
                        },
                    ),
                );
            }
            ItemKind::Autolink { url, email } => {
                push_node(
                    &mut top,
                    &mut stack,
                    Inline::new(
                        span,
                        InlineKind::Autolink {
                            url: url.clone(),
                            email: *email,
                        },
                    ),
                );
            }
            ItemKind::Html => {
                let literal = content.text[item.local.clone()].into();
                push_node(
                    &mut top,
                    &mut stack,
                    Inline::new(span, InlineKind::HtmlInline { literal }),
                );
            }
            ItemKind::SoftBreak => {
                push_node(&mut top, &mut stack, Inline::new(span, InlineKind::SoftBreak));
            }
            ItemKind::HardBreak => {
                push_node(&mut top, &mut stack, Inline::new(span, InlineKind::HardBreak));
            }
            ItemKind::FootnoteRef { label } => {
                push_node(
                    &mut top,
                    &mut stack,
                    Inline::new(
                        span,
                        InlineKind::FootnoteReference {
                            label: label.clone(),
                        },
                    ),
                );
            }
            ItemKind::LinkStart(idx) => {
                stack.push(Frame {
                    kind: FrameKind::Link(*idx),
                    start_local: item.local.start,
                    children: Vec::new(),
                });
            }
            ItemKind::LinkEnd(idx) => {
                let Some(frame) = stack.pop() else { continue };
                let node_span = content.span_of(frame.start_local..item.local.end);
                let spec = &links[*idx];
                let kind = match (&spec.target, spec.image) {
                    (LinkTarget::Inline { dest, title }, false) => InlineKind::Link {
                        dest: dest.clone(),
                        title: title.clone(),
                        children: frame.children,
                    },
                    (LinkTarget::Inline { dest, title }, true) => InlineKind::Image {
                        dest: dest.clone(),
                        title: title.clone(),
                        children: frame.children,
                    },
                    (LinkTarget::Reference { label }, false) => InlineKind::RefLink {
                        label: label.clone(),
                        children: frame.children,
                    },
                    (LinkTarget::Reference { label }, true) => InlineKind::RefImage {
                        label: label.clone(),
                        children: frame.children,
                    },
                };
                push_node(&mut top, &mut stack, Inline::new(node_span, kind));
            }
            ItemKind::Delim(di) => {
                let d = &delims[*di];
                let mut close_cursor = item.local.start;
                for &size in &d.close_tags {
                    let end_local = close_cursor + size as usize;
                    if let Some(frame) = stack.pop() {
                        let node_span = content.span_of(frame.start_local..end_local);
                        let kind = match frame.kind {
                            FrameKind::Emphasis { marker } => InlineKind::Emphasis {
                                marker,
                                children: frame.children,
                            },
                            FrameKind::Strong { marker } => InlineKind::Strong {
                                marker,
                                children: frame.children,
                            },
                            FrameKind::Strikethrough => InlineKind::Strikethrough {
                                children: frame.children,
                            },
                            FrameKind::Link(_) => {
                                // A link frame cannot close on a delimiter;
                                // restore and stop unwinding.
                                stack.push(frame);
                                break;
                            }
                        };
                        push_node(&mut top, &mut stack, Inline::new(node_span, kind));
                    }
                    close_cursor = end_local;
                }
                if d.cur_start < d.cur_end {
                    push_node(
                        &mut top,
                        &mut stack,
                        Inline::text(content.span_of(d.cur_start..d.cur_end)),
                    );
                }
                let mut open_cursor = d.cur_end;
                for &size in d.open_tags.iter().rev() {
                    let kind = match (d.marker, size) {
                        (b'~', _) => FrameKind::Strikethrough,
                        (m, 2) => FrameKind::Strong { marker: m },
                        (m, _) => FrameKind::Emphasis { marker: m },
                    };
                    stack.push(Frame {
                        kind,
                        start_local: open_cursor,
                        children: Vec::new(),
                    });
                    open_cursor += size as usize;
                }
            }
        }
    }

    // Anything still open is a bookkeeping miss; keep its children rather
    // than dropping content.
    while let Some(frame) = stack.pop() {
        let sink = match stack.last_mut() {
            Some(f) => &mut f.children,
            None => &mut top,
        };
        sink.extend(frame.children);
    }

    top
}
