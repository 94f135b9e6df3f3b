use xi_rope::Rope;

use crate::blocks::{parse_blocks, Block};
use crate::source::Span;

/// A parsed document: the concrete syntax tree plus the rope it indexes.
///
/// The document owns its source. Every node's span points into this rope,
/// so the lossless guarantee never depends on a buffer the caller might
/// mutate or drop. Cloning is cheap; the rope shares its storage.
#[derive(Debug, Clone)]
pub struct Document {
    source: Rope,
    pub span: Span,
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn source(&self) -> &Rope {
        &self.source
    }

    /// The full source text. Allocates; equal to `serialize` output.
    pub fn source_text(&self) -> String {
        self.source.to_string()
    }

    pub(crate) fn from_parts(source: Rope, blocks: Vec<Block>) -> Self {
        let span = Span::new(0, source.len());
        Self {
            source,
            span,
            blocks,
        }
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.span == other.span
            && self.blocks == other.blocks
            && self.source.to_string() == other.source.to_string()
    }
}

/// Parses source text into a [`Document`]. Never fails: any byte sequence
/// has a document, with malformed constructs degraded to paragraphs.
pub fn parse(source: &str) -> Document {
    let rope = Rope::from(source);
    let blocks = parse_blocks(&rope);
    Document::from_parts(rope, blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::BlockKind;

    #[test]
    fn empty_source_is_an_empty_document() {
        let doc = parse("");
        assert_eq!(doc.span, Span::new(0, 0));
        assert!(doc.blocks.is_empty());
    }

    #[test]
    fn heading_spans_its_line() {
        let doc = parse("# Hello\n");
        assert_eq!(doc.blocks.len(), 1);
        assert_eq!(doc.blocks[0].span, Span::new(0, 8));
        assert!(matches!(
            doc.blocks[0].kind,
            BlockKind::Heading { level: 1, .. }
        ));
    }

    #[test]
    fn blank_runs_are_their_own_blocks() {
        let doc = parse("# Hello\n\n\n\nWorld");
        let kinds: Vec<&BlockKind> = doc.blocks.iter().map(|b| &b.kind).collect();
        assert_eq!(doc.blocks.len(), 3);
        assert!(matches!(kinds[0], BlockKind::Heading { .. }));
        assert!(matches!(kinds[1], BlockKind::BlankLines { count: 3 }));
        assert!(matches!(kinds[2], BlockKind::Paragraph { .. }));
        assert_eq!(doc.blocks[1].span, Span::new(8, 11));
        assert_eq!(doc.blocks[2].span, Span::new(11, 16));
    }
}
