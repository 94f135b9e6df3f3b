/// GFM footnote definition opener: `[^label]: content`.
#[derive(Debug, Clone, PartialEq)]
pub struct FootnoteDef {
    pub label: String,
    /// Byte offset within the remainder where the first-line content starts.
    pub content_start: usize,
}

impl FootnoteDef {
    pub const OPEN: &'static str = "[^";
    /// Continuation lines belong to the definition when indented this far.
    pub const CONTENT_COL: usize = 4;

    pub fn parse(remainder: &str) -> Option<FootnoteDef> {
        let rest = remainder.strip_prefix(Self::OPEN)?;
        let close = rest.find(']')?;
        let label = &rest[..close];
        if label.is_empty() || label.bytes().any(|b| b.is_ascii_whitespace()) {
            return None;
        }
        let after = &rest[close + 1..];
        let after = after.strip_prefix(':')?;
        let trimmed = after.trim_start_matches([' ', '\t']);
        let content_start = remainder.len() - trimmed.len();
        Some(FootnoteDef {
            label: label.to_string(),
            content_start,
        })
    }
}
