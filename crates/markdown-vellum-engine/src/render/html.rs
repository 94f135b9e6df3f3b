use std::borrow::Cow;
use std::fmt::Write as _;

use rustc_hash::FxHashMap;

use crate::blocks::{Alignment, Block, BlockKind, ListData, TableData};
use crate::document::Document;
use crate::inline::{Inline, InlineKind};
use crate::source::slice_to_string;

use super::escape::escape_html_into;

/// Hook for fenced code blocks: `(info_string, code) -> Option<html>`.
/// Returning `None` falls back to the default escaped `<pre><code>` form.
/// This is the renderer's only extension point.
pub type CodeBlockHook = Box<dyn Fn(&str, &str) -> Option<String>>;

#[derive(Default)]
pub struct RenderOptions {
    pub code_block_hook: Option<CodeBlockHook>,
}

pub fn render_html(doc: &Document) -> String {
    render_html_with(doc, &RenderOptions::default())
}

pub fn render_html_with(doc: &Document, opts: &RenderOptions) -> String {
    let mut ctx = Ctx::collect(doc, opts);
    let mut out = String::with_capacity(doc.span.len() + doc.span.len() / 2);
    render_blocks(&mut ctx, &doc.blocks, false, &mut out);
    ctx.render_footnote_section(&mut out);
    out
}

struct LinkRef {
    dest: String,
    title: Option<String>,
}

struct Ctx<'a> {
    doc: &'a Document,
    opts: &'a RenderOptions,
    refs: FxHashMap<String, LinkRef>,
    /// Footnote labels in definition order, with their block children.
    footnotes: Vec<(String, &'a [Block])>,
    footnote_index: FxHashMap<String, usize>,
}

impl<'a> Ctx<'a> {
    fn collect(doc: &'a Document, opts: &'a RenderOptions) -> Self {
        let mut ctx = Ctx {
            doc,
            opts,
            refs: FxHashMap::default(),
            footnotes: Vec::new(),
            footnote_index: FxHashMap::default(),
        };
        collect_defs(doc, &doc.blocks, &mut ctx);
        ctx
    }

    fn render_footnote_section(&mut self, out: &mut String) {
        if self.footnotes.is_empty() {
            return;
        }
        out.push_str("<section class=\"footnotes\">\n<ol>\n");
        let footnotes = std::mem::take(&mut self.footnotes);
        for (label, children) in &footnotes {
            out.push_str("<li id=\"fn-");
            escape_html_into(out, label);
            out.push_str("\">\n");
            render_blocks(self, children, false, out);
            out.push_str("<a href=\"#fnref-");
            escape_html_into(out, label);
            out.push_str("\" class=\"footnote-backref\">\u{21a9}</a>\n</li>\n");
        }
        out.push_str("</ol>\n</section>\n");
    }
}

fn collect_defs<'a>(doc: &'a Document, blocks: &'a [Block], ctx: &mut Ctx<'a>) {
    for block in blocks {
        match &block.kind {
            BlockKind::LinkRefDef { label, dest, title } => {
                let key = normalize_label(&slice_to_string(doc.source(), *label));
                ctx.refs.entry(key).or_insert_with(|| LinkRef {
                    dest: dest.clone(),
                    title: title.clone(),
                });
            }
            BlockKind::FootnoteDefinition { label, children } => {
                let key = normalize_label(label);
                if !ctx.footnote_index.contains_key(&key) {
                    ctx.footnote_index.insert(key, ctx.footnotes.len());
                    ctx.footnotes.push((label.clone(), children));
                }
            }
            BlockKind::BlockQuote { children } => collect_defs(doc, children, ctx),
            BlockKind::List(data) => {
                for item in &data.items {
                    collect_defs(doc, &item.children, ctx);
                }
            }
            _ => {}
        }
    }
}

/// Case-folds and whitespace-normalizes a reference label for lookup.
pub(crate) fn normalize_label(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut in_space = false;
    for c in label.trim().chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
                in_space = true;
            }
        } else {
            in_space = false;
            for lc in c.to_lowercase() {
                out.push(lc);
            }
        }
    }
    out
}

fn render_blocks(ctx: &mut Ctx, blocks: &[Block], tight: bool, out: &mut String) {
    for block in blocks {
        render_block(ctx, block, tight, out);
    }
}

fn render_block(ctx: &mut Ctx, block: &Block, tight: bool, out: &mut String) {
    match &block.kind {
        BlockKind::BlankLines { .. }
        | BlockKind::LinkRefDef { .. }
        | BlockKind::FootnoteDefinition { .. } => {}
        BlockKind::Paragraph { inlines } => {
            if tight {
                render_inlines(ctx, inlines, out);
            } else {
                out.push_str("<p>");
                render_inlines(ctx, inlines, out);
                out.push_str("</p>\n");
            }
        }
        BlockKind::Heading { level, inlines, .. } => {
            let _ = write!(out, "<h{level}>");
            render_inlines(ctx, inlines, out);
            let _ = write!(out, "</h{level}>\n");
        }
        BlockKind::FencedCode { info, body, .. } => {
            let info_text = slice_to_string(ctx.doc.source(), *info);
            let code = body_text(ctx.doc, body);
            if let Some(hook) = &ctx.opts.code_block_hook {
                if let Some(html) = hook(&info_text, &code) {
                    out.push_str(&html);
                    return;
                }
            }
            out.push_str("<pre><code");
            let lang = info_text.split_whitespace().next().unwrap_or("");
            if !lang.is_empty() {
                out.push_str(" class=\"language-");
                escape_html_into(out, lang);
                out.push('"');
            }
            out.push('>');
            escape_html_into(out, &code);
            out.push_str("</code></pre>\n");
        }
        BlockKind::IndentedCode { body } => {
            out.push_str("<pre><code>");
            escape_html_into(out, &body_text(ctx.doc, body));
            out.push_str("</code></pre>\n");
        }
        BlockKind::ThematicBreak { .. } => out.push_str("<hr />\n"),
        BlockKind::BlockQuote { children } => {
            out.push_str("<blockquote>\n");
            render_blocks(ctx, children, false, out);
            out.push_str("</blockquote>\n");
        }
        BlockKind::List(data) => render_list(ctx, data, out),
        BlockKind::HtmlBlock { lines } => {
            for line in lines {
                out.push_str(&slice_to_string(ctx.doc.source(), *line));
                out.push('\n');
            }
        }
        BlockKind::Table(data) => render_table(ctx, data, out),
    }
}

fn body_text(doc: &Document, body: &[crate::source::Span]) -> String {
    let mut code = String::new();
    for line in body {
        code.push_str(&slice_to_string(doc.source(), *line));
        code.push('\n');
    }
    code
}

fn render_list(ctx: &mut Ctx, data: &ListData, out: &mut String) {
    if data.ordered {
        if data.start == 1 {
            out.push_str("<ol>\n");
        } else {
            let _ = write!(out, "<ol start=\"{}\">\n", data.start);
        }
    } else {
        out.push_str("<ul>\n");
    }
    for item in &data.items {
        out.push_str("<li>");
        match item.checked {
            Some(true) => out.push_str("<input type=\"checkbox\" checked=\"\" disabled=\"\" /> "),
            Some(false) => out.push_str("<input type=\"checkbox\" disabled=\"\" /> "),
            None => {}
        }
        if data.tight {
            for child in &item.children {
                if !matches!(child.kind, BlockKind::Paragraph { .. }) {
                    out.push('\n');
                }
                render_block(ctx, child, true, out);
            }
        } else {
            out.push('\n');
            render_blocks(ctx, &item.children, false, out);
        }
        out.push_str("</li>\n");
    }
    out.push_str(if data.ordered { "</ol>\n" } else { "</ul>\n" });
}

fn render_table(ctx: &mut Ctx, data: &TableData, out: &mut String) {
    let align_attr = |a: Alignment| match a {
        Alignment::None => "",
        Alignment::Left => " align=\"left\"",
        Alignment::Center => " align=\"center\"",
        Alignment::Right => " align=\"right\"",
    };
    out.push_str("<table>\n<thead>\n<tr>\n");
    for (i, cell) in data.header.iter().enumerate() {
        let align = data.alignments.get(i).copied().unwrap_or(Alignment::None);
        let _ = write!(out, "<th{}>", align_attr(align));
        render_inlines(ctx, &cell.inlines, out);
        out.push_str("</th>\n");
    }
    out.push_str("</tr>\n</thead>\n");
    if !data.rows.is_empty() {
        out.push_str("<tbody>\n");
        for row in &data.rows {
            out.push_str("<tr>\n");
            for (i, cell) in row.iter().enumerate() {
                let align = data.alignments.get(i).copied().unwrap_or(Alignment::None);
                let _ = write!(out, "<td{}>", align_attr(align));
                render_inlines(ctx, &cell.inlines, out);
                out.push_str("</td>\n");
            }
            out.push_str("</tr>\n");
        }
        out.push_str("</tbody>\n");
    }
    out.push_str("</table>\n");
}

fn render_inlines(ctx: &mut Ctx, inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        render_inline(ctx, inline, out);
    }
}

fn render_inline(ctx: &mut Ctx, inline: &Inline, out: &mut String) {
    match &inline.kind {
        InlineKind::Text { literal } => {
            let text = match literal {
                Some(l) => Cow::Borrowed(&**l),
                None => Cow::Owned(slice_to_string(ctx.doc.source(), inline.span)),
            };
            escape_html_into(out, &text);
        }
        InlineKind::SoftBreak => out.push('\n'),
        InlineKind::HardBreak => out.push_str("<br />\n"),
        InlineKind::Code { literal, .. } => {
            out.push_str("<code>");
            escape_html_into(out, literal);
            out.push_str("</code>");
        }
        InlineKind::Emphasis { children, .. } => {
            out.push_str("<em>");
            render_inlines(ctx, children, out);
            out.push_str("</em>");
        }
        InlineKind::Strong { children, .. } => {
            out.push_str("<strong>");
            render_inlines(ctx, children, out);
            out.push_str("</strong>");
        }
        InlineKind::Strikethrough { children } => {
            out.push_str("<del>");
            render_inlines(ctx, children, out);
            out.push_str("</del>");
        }
        InlineKind::Link {
            dest,
            title,
            children,
        } => render_link(ctx, dest, title.as_deref(), children, out),
        InlineKind::Image {
            dest,
            title,
            children,
        } => render_image(ctx, dest, title.as_deref(), children, out),
        InlineKind::RefLink { label, children } => {
            match ctx.refs.get(&normalize_label(label)) {
                Some(r) => {
                    let (dest, title) = (r.dest.clone(), r.title.clone());
                    render_link(ctx, &dest, title.as_deref(), children, out);
                }
                None => {
                    // Unresolved: fall back to the literal source text.
                    escape_html_into(out, &slice_to_string(ctx.doc.source(), inline.span));
                }
            }
        }
        InlineKind::RefImage { label, children } => {
            match ctx.refs.get(&normalize_label(label)) {
                Some(r) => {
                    let (dest, title) = (r.dest.clone(), r.title.clone());
                    render_image(ctx, &dest, title.as_deref(), children, out);
                }
                None => {
                    escape_html_into(out, &slice_to_string(ctx.doc.source(), inline.span));
                }
            }
        }
        InlineKind::Autolink { url, email } => {
            out.push_str("<a href=\"");
            if *email {
                out.push_str("mailto:");
            }
            escape_html_into(out, url);
            out.push_str("\">");
            escape_html_into(out, url);
            out.push_str("</a>");
        }
        InlineKind::HtmlInline { literal } => out.push_str(literal),
        InlineKind::FootnoteReference { label } => {
            match ctx.footnote_index.get(&normalize_label(label)) {
                Some(&idx) => {
                    out.push_str("<sup class=\"footnote-ref\"><a href=\"#fn-");
                    escape_html_into(out, label);
                    out.push_str("\" id=\"fnref-");
                    escape_html_into(out, label);
                    let _ = write!(out, "\">{}</a></sup>", idx + 1);
                }
                None => {
                    escape_html_into(out, &slice_to_string(ctx.doc.source(), inline.span));
                }
            }
        }
    }
}

fn render_link(ctx: &mut Ctx, dest: &str, title: Option<&str>, children: &[Inline], out: &mut String) {
    out.push_str("<a href=\"");
    escape_html_into(out, dest);
    out.push('"');
    if let Some(title) = title {
        out.push_str(" title=\"");
        escape_html_into(out, title);
        out.push('"');
    }
    out.push('>');
    render_inlines(ctx, children, out);
    out.push_str("</a>");
}

fn render_image(ctx: &mut Ctx, dest: &str, title: Option<&str>, children: &[Inline], out: &mut String) {
    out.push_str("<img src=\"");
    escape_html_into(out, dest);
    out.push_str("\" alt=\"");
    let mut alt = String::new();
    plain_text(ctx, children, &mut alt);
    escape_html_into(out, &alt);
    out.push('"');
    if let Some(title) = title {
        out.push_str(" title=\"");
        escape_html_into(out, title);
        out.push('"');
    }
    out.push_str(" />");
}

/// Flattens inline children to plain text, for image alt attributes.
fn plain_text(ctx: &Ctx, inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        match &inline.kind {
            InlineKind::Text { literal } => match literal {
                Some(l) => out.push_str(l),
                None => out.push_str(&slice_to_string(ctx.doc.source(), inline.span)),
            },
            InlineKind::Code { literal, .. } => out.push_str(literal),
            InlineKind::SoftBreak | InlineKind::HardBreak => out.push(' '),
            InlineKind::Autolink { url, .. } => out.push_str(url),
            _ => {
                if let Some(children) = inline.children() {
                    plain_text(ctx, children, out);
                }
            }
        }
    }
}
