//! External AST projection in the mdast shape: a discriminated record with
//! a `type` tag per node, `children` arrays, and an optional `position`
//! carrying `{start, end}` byte offsets.
//!
//! The internal CST is a superset; this projection drops CST-only metadata
//! (blank-line nodes, marker characters, fence lengths) but keeps spans.

use serde::Serialize;

use crate::blocks::{Alignment, Block, BlockKind, ListData};
use crate::document::Document;
use crate::inline::{Inline, InlineKind};
use crate::source::{slice_to_string, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub start: usize,
    pub end: usize,
}

impl From<Span> for Position {
    fn from(sp: Span) -> Self {
        Self {
            start: sp.start,
            end: sp.end,
        }
    }
}

/// One node of the external AST. Unused fields are omitted from the
/// serialized form.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct MdastNode {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<MdastNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordered: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spread: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<Vec<Option<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl MdastNode {
    fn new(kind: &str, span: Span) -> Self {
        Self {
            kind: kind.to_string(),
            position: Some(span.into()),
            ..Default::default()
        }
    }
}

/// Projects a document into the mdast shape.
pub fn to_mdast(doc: &Document) -> MdastNode {
    let mut root = MdastNode::new("root", doc.span);
    root.children = Some(
        doc.blocks
            .iter()
            .filter_map(|b| block_to_mdast(doc, b))
            .collect(),
    );
    root
}

fn block_to_mdast(doc: &Document, block: &Block) -> Option<MdastNode> {
    let node = match &block.kind {
        BlockKind::BlankLines { .. } => return None,
        BlockKind::Paragraph { inlines } => {
            let mut n = MdastNode::new("paragraph", block.span);
            n.children = Some(inlines_to_mdast(doc, inlines));
            n
        }
        BlockKind::Heading {
            level,
            style: _,
            inlines,
        } => {
            let mut n = MdastNode::new("heading", block.span);
            n.depth = Some(*level);
            n.children = Some(inlines_to_mdast(doc, inlines));
            n
        }
        BlockKind::FencedCode { info, body, .. } => {
            let mut n = MdastNode::new("code", block.span);
            let info_text = slice_to_string(doc.source(), *info);
            let lang = info_text.split_whitespace().next().unwrap_or("");
            if !lang.is_empty() {
                n.lang = Some(lang.to_string());
            }
            n.value = Some(body_value(doc, body));
            n
        }
        BlockKind::IndentedCode { body } => {
            let mut n = MdastNode::new("code", block.span);
            n.value = Some(body_value(doc, body));
            n
        }
        BlockKind::ThematicBreak { .. } => MdastNode::new("thematicBreak", block.span),
        BlockKind::BlockQuote { children } => {
            let mut n = MdastNode::new("blockquote", block.span);
            n.children = Some(
                children
                    .iter()
                    .filter_map(|b| block_to_mdast(doc, b))
                    .collect(),
            );
            n
        }
        BlockKind::List(data) => list_to_mdast(doc, block.span, data),
        BlockKind::HtmlBlock { lines } => {
            let mut n = MdastNode::new("html", block.span);
            n.value = Some(body_value(doc, lines).trim_end().to_string());
            n
        }
        BlockKind::LinkRefDef { label, dest, title } => {
            let mut n = MdastNode::new("definition", block.span);
            n.identifier = Some(crate::render::normalize_label(&slice_to_string(
                doc.source(),
                *label,
            )));
            n.url = Some(dest.clone());
            n.title = title.clone();
            n
        }
        BlockKind::Table(data) => {
            let mut n = MdastNode::new("table", block.span);
            n.align = Some(
                data.alignments
                    .iter()
                    .map(|a| match a {
                        Alignment::None => None,
                        Alignment::Left => Some("left".to_string()),
                        Alignment::Center => Some("center".to_string()),
                        Alignment::Right => Some("right".to_string()),
                    })
                    .collect(),
            );
            let mut rows = Vec::with_capacity(data.rows.len() + 1);
            let mut header_row = MdastNode::new("tableRow", block.span);
            header_row.children = Some(
                data.header
                    .iter()
                    .map(|cell| {
                        let mut c = MdastNode::new("tableCell", cell.span);
                        c.children = Some(inlines_to_mdast(doc, &cell.inlines));
                        c
                    })
                    .collect(),
            );
            rows.push(header_row);
            for row in &data.rows {
                let row_span = Span::new(
                    row.first().map(|c| c.span.start).unwrap_or(block.span.start),
                    row.last().map(|c| c.span.end).unwrap_or(block.span.end),
                );
                let mut r = MdastNode::new("tableRow", row_span);
                r.children = Some(
                    row.iter()
                        .map(|cell| {
                            let mut c = MdastNode::new("tableCell", cell.span);
                            c.children = Some(inlines_to_mdast(doc, &cell.inlines));
                            c
                        })
                        .collect(),
                );
                rows.push(r);
            }
            n.children = Some(rows);
            n
        }
        BlockKind::FootnoteDefinition { label, children } => {
            let mut n = MdastNode::new("footnoteDefinition", block.span);
            n.identifier = Some(label.clone());
            n.children = Some(
                children
                    .iter()
                    .filter_map(|b| block_to_mdast(doc, b))
                    .collect(),
            );
            n
        }
    };
    Some(node)
}

fn list_to_mdast(doc: &Document, span: Span, data: &ListData) -> MdastNode {
    let mut n = MdastNode::new("list", span);
    n.ordered = Some(data.ordered);
    if data.ordered {
        n.start = Some(data.start);
    }
    n.spread = Some(!data.tight);
    n.children = Some(
        data.items
            .iter()
            .map(|item| {
                let mut li = MdastNode::new("listItem", item.span);
                li.checked = item.checked;
                li.spread = Some(!data.tight);
                li.children = Some(
                    item.children
                        .iter()
                        .filter_map(|b| block_to_mdast(doc, b))
                        .collect(),
                );
                li
            })
            .collect(),
    );
    n
}

fn body_value(doc: &Document, body: &[Span]) -> String {
    let mut value = String::new();
    for (i, line) in body.iter().enumerate() {
        if i > 0 {
            value.push('\n');
        }
        value.push_str(&slice_to_string(doc.source(), *line));
    }
    value
}

fn inlines_to_mdast(doc: &Document, inlines: &[Inline]) -> Vec<MdastNode> {
    inlines.iter().map(|i| inline_to_mdast(doc, i)).collect()
}

fn inline_to_mdast(doc: &Document, inline: &Inline) -> MdastNode {
    match &inline.kind {
        InlineKind::Text { literal } => {
            let mut n = MdastNode::new("text", inline.span);
            n.value = Some(match literal {
                Some(l) => l.to_string(),
                None => slice_to_string(doc.source(), inline.span),
            });
            n
        }
        InlineKind::SoftBreak | InlineKind::HardBreak => MdastNode::new("break", inline.span),
        InlineKind::Code { literal, .. } => {
            let mut n = MdastNode::new("inlineCode", inline.span);
            n.value = Some(literal.to_string());
            n
        }
        InlineKind::Emphasis { children, .. } => {
            let mut n = MdastNode::new("emphasis", inline.span);
            n.children = Some(inlines_to_mdast(doc, children));
            n
        }
        InlineKind::Strong { children, .. } => {
            let mut n = MdastNode::new("strong", inline.span);
            n.children = Some(inlines_to_mdast(doc, children));
            n
        }
        InlineKind::Strikethrough { children } => {
            let mut n = MdastNode::new("delete", inline.span);
            n.children = Some(inlines_to_mdast(doc, children));
            n
        }
        InlineKind::Link {
            dest,
            title,
            children,
        } => {
            let mut n = MdastNode::new("link", inline.span);
            n.url = Some(dest.clone());
            n.title = title.clone();
            n.children = Some(inlines_to_mdast(doc, children));
            n
        }
        InlineKind::Image {
            dest,
            title,
            children,
        } => {
            let mut n = MdastNode::new("image", inline.span);
            n.url = Some(dest.clone());
            n.title = title.clone();
            let mut alt = String::new();
            for child in children {
                if let InlineKind::Text { literal } = &child.kind {
                    match literal {
                        Some(l) => alt.push_str(l),
                        None => alt.push_str(&slice_to_string(doc.source(), child.span)),
                    }
                }
            }
            n.alt = Some(alt);
            n
        }
        InlineKind::RefLink { label, children } => {
            let mut n = MdastNode::new("linkReference", inline.span);
            n.identifier = Some(label.clone());
            n.children = Some(inlines_to_mdast(doc, children));
            n
        }
        InlineKind::RefImage { label, children } => {
            let mut n = MdastNode::new("imageReference", inline.span);
            n.identifier = Some(label.clone());
            n.children = Some(inlines_to_mdast(doc, children));
            n
        }
        InlineKind::Autolink { url, .. } => {
            let mut n = MdastNode::new("link", inline.span);
            n.url = Some(url.clone());
            let mut text = MdastNode::new("text", inline.span);
            text.value = Some(url.clone());
            n.children = Some(vec![text]);
            n
        }
        InlineKind::HtmlInline { literal } => {
            let mut n = MdastNode::new("html", inline.span);
            n.value = Some(literal.to_string());
            n
        }
        InlineKind::FootnoteReference { label } => {
            let mut n = MdastNode::new("footnoteReference", inline.span);
            n.identifier = Some(label.clone());
            n
        }
    }
}
