use crate::source::Span;

/// A block's inline region, assembled from per-line content spans.
///
/// Container prefixes (`> `, list indentation) make a block's meaningful
/// content non-contiguous in the source. The inline parser wants one flat
/// string to scan, but every node it produces must carry an absolute source
/// span, so each pushed piece records where its bytes came from. Local
/// offsets map back through `to_source` / `to_source_end`.
#[derive(Debug, Clone, Default)]
pub struct InlineContent {
    pub text: String,
    chunks: Vec<Chunk>,
}

#[derive(Debug, Clone, Copy)]
struct Chunk {
    local_start: usize,
    local_end: usize,
    source_start: usize,
    source_end: usize,
}

impl InlineContent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds content from one contiguous source span.
    pub fn contiguous(text: String, span: Span) -> Self {
        let mut c = Self::new();
        c.push_chunk(&text, span);
        c
    }

    /// Appends a piece of content text that came from `span`.
    ///
    /// For ordinary content the local and source lengths match. A line
    /// separator is pushed as a single `\n` whose span stretches from the
    /// end of one line's content to the start of the next (covering the
    /// terminator and any container prefix in between).
    pub fn push_chunk(&mut self, text: &str, span: Span) {
        let local_start = self.text.len();
        self.text.push_str(text);
        self.chunks.push(Chunk {
            local_start,
            local_end: self.text.len(),
            source_start: span.start,
            source_end: span.end,
        });
    }

    pub fn push_line_break(&mut self, span: Span) {
        self.push_chunk("\n", span);
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Maps a local byte offset to an absolute source offset.
    pub fn to_source(&self, local: usize) -> usize {
        match self.chunk_at(local) {
            Some(c) => c.source_start + (local - c.local_start).min(c.source_end - c.source_start),
            None => self.chunks.last().map(|c| c.source_end).unwrap_or(0),
        }
    }

    /// Maps an exclusive local end offset to an absolute source offset,
    /// resolving chunk-boundary positions to the end of the chunk the range
    /// actually covers.
    pub fn to_source_end(&self, local_end: usize) -> usize {
        if local_end == 0 {
            return self.chunks.first().map(|c| c.source_start).unwrap_or(0);
        }
        match self.chunk_at(local_end - 1) {
            Some(c) => {
                let within = local_end - c.local_start;
                if within >= c.local_end - c.local_start {
                    c.source_end
                } else {
                    c.source_start + within
                }
            }
            None => self.chunks.last().map(|c| c.source_end).unwrap_or(0),
        }
    }

    /// Maps a local byte range to an absolute source span.
    pub fn span_of(&self, local: std::ops::Range<usize>) -> Span {
        Span::new(self.to_source(local.start), self.to_source_end(local.end))
    }

    fn chunk_at(&self, local: usize) -> Option<Chunk> {
        let idx = self
            .chunks
            .partition_point(|c| c.local_end <= local)
            .min(self.chunks.len().saturating_sub(1));
        let c = *self.chunks.get(idx)?;
        if local >= c.local_start && local < c.local_end {
            Some(c)
        } else if local >= c.local_end {
            Some(c)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contiguous_maps_identity_plus_base() {
        let c = InlineContent::contiguous("hello".into(), Span::new(10, 15));
        assert_eq!(c.to_source(0), 10);
        assert_eq!(c.to_source(3), 13);
        assert_eq!(c.span_of(1..4), Span::new(11, 14));
        assert_eq!(c.to_source_end(5), 15);
    }

    #[test]
    fn line_break_chunk_stretches_over_prefix() {
        // Source: "> ab\n> cd" — content "ab" at 2..4, "cd" at 7..9,
        // separator covers 4..7 ("\n> ").
        let mut c = InlineContent::new();
        c.push_chunk("ab", Span::new(2, 4));
        c.push_line_break(Span::new(4, 7));
        c.push_chunk("cd", Span::new(7, 9));
        assert_eq!(c.text, "ab\ncd");
        assert_eq!(c.span_of(0..2), Span::new(2, 4));
        // The break's local byte maps to the full separator span.
        assert_eq!(c.span_of(2..3), Span::new(4, 7));
        assert_eq!(c.span_of(3..5), Span::new(7, 9));
        // A range crossing the break still maps to valid outer offsets.
        assert_eq!(c.span_of(0..5), Span::new(2, 9));
    }

    #[test]
    fn crlf_separator_is_wider_than_local_newline() {
        let mut c = InlineContent::new();
        c.push_chunk("ab", Span::new(0, 2));
        c.push_line_break(Span::new(2, 4)); // \r\n
        c.push_chunk("cd", Span::new(4, 6));
        assert_eq!(c.span_of(2..3), Span::new(2, 4));
    }
}
