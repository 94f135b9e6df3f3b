use crate::source::{LineRef, Span};

/// Line-local facts computed once per physical line.
#[derive(Debug, Clone)]
pub struct LineClass {
    /// Full line span, terminator included.
    pub span: Span,
    /// Line text without its terminator.
    pub text: String,
    pub is_blank: bool,
}

impl LineClass {
    pub fn of(lr: &LineRef) -> Self {
        let text = lr.trimmed().to_string();
        let is_blank = text.trim().is_empty();
        Self {
            span: lr.span,
            text,
            is_blank,
        }
    }

    /// Where the terminator begins, as an absolute offset.
    pub fn content_end(&self) -> usize {
        self.span.start + self.text.len()
    }
}

/// A consuming position within one line, used while matching container
/// prefixes and block openers. Columns count tabs as 4; tabs are consumed
/// whole, never split.
#[derive(Debug, Clone, Copy)]
pub struct LinePos<'a> {
    text: &'a str,
    line_start: usize,
    off: usize,
}

impl<'a> LinePos<'a> {
    pub fn new(class: &'a LineClass) -> Self {
        Self {
            text: &class.text,
            line_start: class.span.start,
            off: 0,
        }
    }

    /// Remaining text from the current position.
    pub fn remainder(&self) -> &'a str {
        &self.text[self.off..]
    }

    /// Absolute source offset of the current position.
    pub fn abs(&self) -> usize {
        self.line_start + self.off
    }

    /// Absolute source offset of the end of line content (pre-terminator).
    pub fn content_end(&self) -> usize {
        self.line_start + self.text.len()
    }

    pub fn advance(&mut self, bytes: usize) {
        self.off = (self.off + bytes).min(self.text.len());
    }

    /// True when nothing but whitespace remains.
    pub fn rest_is_blank(&self) -> bool {
        self.remainder().bytes().all(|b| b == b' ' || b == b'\t')
    }

    /// Columns of leading whitespace at the current position.
    pub fn indent_cols(&self) -> usize {
        let mut cols = 0;
        for b in self.remainder().bytes() {
            match b {
                b' ' => cols += 1,
                b'\t' => cols += 4,
                _ => break,
            }
        }
        cols
    }

    /// Consumes leading whitespace up to `max` columns. A tab that would
    /// overshoot is left in place.
    pub fn consume_cols(&mut self, max: usize) {
        let bytes = self.text.as_bytes();
        let mut cols = 0;
        while self.off < bytes.len() && cols < max {
            match bytes[self.off] {
                b' ' => {
                    cols += 1;
                    self.off += 1;
                }
                b'\t' => {
                    if cols + 4 > max {
                        break;
                    }
                    cols += 4;
                    self.off += 1;
                }
                _ => break,
            }
        }
    }

    /// Consumes all leading whitespace.
    pub fn skip_ws(&mut self) {
        let bytes = self.text.as_bytes();
        while self.off < bytes.len() && (bytes[self.off] == b' ' || bytes[self.off] == b'\t') {
            self.off += 1;
        }
    }

    /// The remainder with leading whitespace skipped (without consuming).
    pub fn rest_after_ws(&self) -> &'a str {
        self.remainder().trim_start_matches([' ', '\t'])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Span;

    fn class(text: &str, start: usize) -> LineClass {
        LineClass {
            span: Span::new(start, start + text.len() + 1),
            text: text.to_string(),
            is_blank: text.trim().is_empty(),
        }
    }

    #[test]
    fn indent_and_consumption() {
        let c = class("   abc", 10);
        let mut pos = LinePos::new(&c);
        assert_eq!(pos.indent_cols(), 3);
        pos.consume_cols(2);
        assert_eq!(pos.remainder(), " abc");
        assert_eq!(pos.abs(), 12);
        pos.skip_ws();
        assert_eq!(pos.remainder(), "abc");
    }

    #[test]
    fn tab_is_not_split() {
        let c = class("\tx", 0);
        let mut pos = LinePos::new(&c);
        assert_eq!(pos.indent_cols(), 4);
        pos.consume_cols(2);
        // The tab would overshoot two columns, so it stays.
        assert_eq!(pos.remainder(), "\tx");
        pos.consume_cols(4);
        assert_eq!(pos.remainder(), "x");
    }

    #[test]
    fn blank_detection() {
        let c = class("  \t ", 0);
        let pos = LinePos::new(&c);
        assert!(pos.rest_is_blank());
    }
}
