use crate::source::Span;

/// An inline node. Every node carries the absolute byte span of the source
/// text it was parsed from; children spans nest within their parent's span.
#[derive(Debug, Clone, PartialEq)]
pub struct Inline {
    pub span: Span,
    pub kind: InlineKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InlineKind {
    /// Literal text. `literal` is set only when the rendered text differs
    /// from the source slice (a backslash escape); otherwise the slice of
    /// `span` is the text.
    Text { literal: Option<Box<str>> },
    SoftBreak,
    HardBreak,
    /// Backtick code span. `literal` is the content with CommonMark
    /// normalization applied (newlines to spaces, one padding space
    /// stripped); the span still covers the raw backticks and bytes.
    Code { tick_len: usize, literal: Box<str> },
    Emphasis { marker: u8, children: Vec<Inline> },
    Strong { marker: u8, children: Vec<Inline> },
    Strikethrough { children: Vec<Inline> },
    Link {
        dest: String,
        title: Option<String>,
        children: Vec<Inline>,
    },
    Image {
        dest: String,
        title: Option<String>,
        children: Vec<Inline>,
    },
    /// Reference-style link `[text][label]`, `[label][]` or `[label]`.
    /// Resolution happens at render time against the document's link
    /// reference definitions; unresolved references degrade to their
    /// literal source text.
    RefLink { label: String, children: Vec<Inline> },
    RefImage { label: String, children: Vec<Inline> },
    Autolink { url: String, email: bool },
    HtmlInline { literal: Box<str> },
    FootnoteReference { label: String },
}

impl Inline {
    pub fn new(span: Span, kind: InlineKind) -> Self {
        Self { span, kind }
    }

    pub fn text(span: Span) -> Self {
        Self::new(span, InlineKind::Text { literal: None })
    }

    pub fn children(&self) -> Option<&[Inline]> {
        match &self.kind {
            InlineKind::Emphasis { children, .. }
            | InlineKind::Strong { children, .. }
            | InlineKind::Strikethrough { children }
            | InlineKind::Link { children, .. }
            | InlineKind::Image { children, .. }
            | InlineKind::RefLink { children, .. }
            | InlineKind::RefImage { children, .. } => Some(children),
            _ => None,
        }
    }
}
