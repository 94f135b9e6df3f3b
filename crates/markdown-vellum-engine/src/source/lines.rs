use xi_rope::Rope;

use super::span::Span;

/// One physical line of the source with its byte span.
///
/// The span (and `text`) include the line terminator when one is present.
/// Offsets always index the original bytes; CRLF is never normalized away,
/// the terminator width is just recorded so callers can address the
/// content and the ending separately.
#[derive(Debug, Clone)]
pub struct LineRef {
    pub span: Span,
    pub text: String,
    content_len: usize,
}

impl LineRef {
    /// The line content without its terminator.
    pub fn trimmed(&self) -> &str {
        &self.text[..self.content_len]
    }

    /// Byte length of the line terminator (0 at EOF, 1 for `\n`, 2 for `\r\n`).
    pub fn terminator_len(&self) -> usize {
        self.text.len() - self.content_len
    }
}

/// Iterates the rope's physical lines, assigning each its absolute span
/// and classifying its ending as it goes. Line breaks follow the rope's
/// own raw segmentation, so the spans tile the source exactly.
pub fn lines_with_spans(rope: &Rope) -> impl Iterator<Item = LineRef> + '_ {
    let mut next_start = 0usize;
    rope.lines_raw(..).map(move |raw| {
        let text = raw.into_owned();
        let span = Span::new(next_start, next_start + text.len());
        next_start = span.end;
        let content_len = if text.ends_with("\r\n") {
            text.len() - 2
        } else if text.ends_with('\n') {
            text.len() - 1
        } else {
            text.len()
        };
        LineRef {
            span,
            text,
            content_len,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_tile_the_source() {
        let rope = Rope::from("one\ntwo\r\nthree");
        let lines: Vec<LineRef> = lines_with_spans(&rope).collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].span, Span::new(0, 4));
        assert_eq!(lines[1].span, Span::new(4, 9));
        assert_eq!(lines[2].span, Span::new(9, 14));
        assert_eq!(lines[1].trimmed(), "two");
        assert_eq!(lines[1].terminator_len(), 2);
        assert_eq!(lines[2].terminator_len(), 0);
    }

    #[test]
    fn empty_source_yields_no_lines() {
        let rope = Rope::from("");
        assert_eq!(lines_with_spans(&rope).count(), 0);
    }

    #[test]
    fn lone_newline_is_one_empty_line() {
        let rope = Rope::from("\n");
        let lines: Vec<LineRef> = lines_with_spans(&rope).collect();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].span, Span::new(0, 1));
        assert_eq!(lines[0].trimmed(), "");
        assert_eq!(lines[0].terminator_len(), 1);
    }
}
