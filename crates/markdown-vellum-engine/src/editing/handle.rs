use crate::document::{parse, Document};
use crate::mdast::{to_mdast, MdastNode};
use crate::render::render_html;
use crate::serialize::write_markdown;

use super::edit::EditInfo;
use super::incremental::parse_incremental;

/// Editor-facing wrapper over a source string and its parsed document,
/// with lazily cached HTML. `update` produces a new handle via the
/// incremental driver; dropping a handle releases everything it owns.
#[derive(Debug, Clone)]
pub struct MarkdownHandle {
    source: String,
    document: Document,
    cached_html: Option<String>,
    version: u64,
}

impl MarkdownHandle {
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let document = parse(&source);
        Self {
            source,
            document,
            cached_html: None,
            version: 0,
        }
    }

    /// Builds a handle from raw bytes, validating UTF-8.
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::new(text))
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Version counter; increments on every `update`.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The external mdast-shaped AST.
    pub fn ast(&self) -> MdastNode {
        to_mdast(&self.document)
    }

    /// Rendered HTML, cached until the next update.
    pub fn to_html(&mut self) -> &str {
        if self.cached_html.is_none() {
            self.cached_html = Some(render_html(&self.document));
        }
        self.cached_html.as_deref().unwrap_or_default()
    }

    /// Normalized Markdown (the lossless text is `source()`).
    pub fn to_markdown(&self) -> String {
        write_markdown(&self.document)
    }

    /// Applies an edit, reparsing incrementally. Returns a new handle; the
    /// old one stays valid for its own source and tree.
    pub fn update(&self, new_source: impl Into<String>, edit: EditInfo) -> Self {
        let new_source = new_source.into();
        let document = parse_incremental(&self.document, &self.source, &new_source, edit);
        Self {
            source: new_source,
            document,
            cached_html: None,
            version: self.version + 1,
        }
    }
}
