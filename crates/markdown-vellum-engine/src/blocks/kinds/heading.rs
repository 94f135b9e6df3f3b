/// ATX heading recognizer (`#` through `######`).
pub struct AtxHeading;

impl AtxHeading {
    pub const MARKER: u8 = b'#';
    pub const MAX_LEVEL: u8 = 6;

    /// Parses an ATX heading from a line remainder. Returns the level and
    /// the byte range of the heading content within the remainder, with the
    /// optional closing hash sequence stripped.
    pub fn parse(remainder: &str) -> Option<(u8, std::ops::Range<usize>)> {
        let bytes = remainder.as_bytes();
        if bytes.first() != Some(&Self::MARKER) {
            return None;
        }
        let mut level = 0u8;
        let mut i = 0;
        while i < bytes.len() && bytes[i] == Self::MARKER {
            level += 1;
            i += 1;
            if level > Self::MAX_LEVEL {
                return None;
            }
        }
        if i < bytes.len() && bytes[i] != b' ' && bytes[i] != b'\t' {
            return None;
        }
        // Trim surrounding whitespace of the content region.
        let mut start = i;
        while start < bytes.len() && (bytes[start] == b' ' || bytes[start] == b'\t') {
            start += 1;
        }
        let mut end = bytes.len();
        while end > start && (bytes[end - 1] == b' ' || bytes[end - 1] == b'\t') {
            end -= 1;
        }
        // Optional closing sequence: a run of hashes preceded by whitespace
        // (or forming the entire content).
        let mut hash_end = end;
        while hash_end > start && bytes[hash_end - 1] == Self::MARKER {
            hash_end -= 1;
        }
        if hash_end < end {
            if hash_end == start {
                end = start;
            } else if bytes[hash_end - 1] == b' ' || bytes[hash_end - 1] == b'\t' {
                end = hash_end;
                while end > start && (bytes[end - 1] == b' ' || bytes[end - 1] == b'\t') {
                    end -= 1;
                }
            }
        }
        Some((level, start..end))
    }
}

/// Setext heading underline (`===` or `---` under a paragraph).
pub struct SetextUnderline;

impl SetextUnderline {
    /// Returns the heading level (1 for `=`, 2 for `-`) when the remainder
    /// is an underline: one marker character repeated, surrounding
    /// whitespace allowed.
    pub fn parse(remainder: &str) -> Option<u8> {
        let trimmed = remainder.trim();
        let bytes = trimmed.as_bytes();
        let ch = *bytes.first()?;
        if ch != b'=' && ch != b'-' {
            return None;
        }
        if !bytes.iter().all(|&b| b == ch) {
            return None;
        }
        Some(if ch == b'=' { 1 } else { 2 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_levels() {
        assert_eq!(AtxHeading::parse("# one"), Some((1, 2..5)));
        assert_eq!(AtxHeading::parse("###### six"), Some((6, 7..10)));
        assert_eq!(AtxHeading::parse("####### seven"), None);
    }

    #[test]
    fn requires_space_after_hashes() {
        assert_eq!(AtxHeading::parse("#nospace"), None);
        assert!(AtxHeading::parse("#").is_some());
    }

    #[test]
    fn strips_closing_hashes() {
        let (level, range) = AtxHeading::parse("## title ##").unwrap();
        assert_eq!(level, 2);
        assert_eq!(&"## title ##"[range], "title");
        // Hashes glued to text are content, not a closer.
        let (_, range) = AtxHeading::parse("# title#").unwrap();
        assert_eq!(&"# title#"[range], "title#");
    }

    #[test]
    fn setext_underlines() {
        assert_eq!(SetextUnderline::parse("==="), Some(1));
        assert_eq!(SetextUnderline::parse("---------"), Some(2));
        assert_eq!(SetextUnderline::parse("- -"), None);
        assert_eq!(SetextUnderline::parse("abc"), None);
    }
}
