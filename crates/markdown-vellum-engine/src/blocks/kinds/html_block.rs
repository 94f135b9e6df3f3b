/// How an open HTML block ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HtmlBlockEnd {
    /// Raw-text elements (`<script>`, `<pre>`, `<style>`, `<textarea>`):
    /// ends on a line containing the matching close tag.
    EndTag(&'static str),
    /// `<!--` comment, ends on `-->`.
    Comment,
    /// `<?` processing instruction, ends on `?>`.
    ProcessingInstruction,
    /// `<!DECL`, ends on `>`.
    Declaration,
    /// `<![CDATA[`, ends on `]]>`.
    Cdata,
    /// Known block-level tag or a standalone complete tag: ends at the next
    /// blank line.
    BlankLine,
}

/// HTML block opener recognition.
pub struct HtmlBlockStart;

const RAW_TEXT_TAGS: [(&str, &str); 4] = [
    ("script", "</script>"),
    ("pre", "</pre>"),
    ("style", "</style>"),
    ("textarea", "</textarea>"),
];

// The CommonMark type-6 tag name list, abridged to the names that occur in
// real documents; anything else falls through to the type-7 standalone-tag
// rule.
const BLOCK_TAGS: [&str; 40] = [
    "address", "article", "aside", "blockquote", "body", "caption", "center", "col", "colgroup",
    "dd", "details", "dialog", "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer",
    "form", "h1", "h2", "h3", "h4", "h5", "h6", "head", "header", "hr", "li", "main", "nav", "ol",
    "p", "section", "table", "tbody", "td", "tr", "ul",
];

impl HtmlBlockStart {
    /// Detects an HTML block opener on a line remainder. When
    /// `interrupting_paragraph` is set, the type-7 standalone-tag form is
    /// not allowed (it cannot interrupt a paragraph).
    pub fn parse(remainder: &str, interrupting_paragraph: bool) -> Option<HtmlBlockEnd> {
        let bytes = remainder.as_bytes();
        if bytes.first() != Some(&b'<') {
            return None;
        }
        let rest = &remainder[1..];

        if rest.starts_with("!--") {
            return Some(HtmlBlockEnd::Comment);
        }
        if rest.starts_with("![CDATA[") {
            return Some(HtmlBlockEnd::Cdata);
        }
        if rest.starts_with('!') {
            return Some(HtmlBlockEnd::Declaration);
        }
        if rest.starts_with('?') {
            return Some(HtmlBlockEnd::ProcessingInstruction);
        }

        let (closing, rest) = match rest.strip_prefix('/') {
            Some(r) => (true, r),
            None => (false, rest),
        };
        let name_len = rest
            .bytes()
            .take_while(|b| b.is_ascii_alphanumeric() || *b == b'-')
            .count();
        if name_len == 0 {
            return None;
        }
        let name = rest[..name_len].to_ascii_lowercase();
        let after = &rest[name_len..];

        if !closing {
            for (tag, end) in RAW_TEXT_TAGS {
                if name == tag && starts_tag_boundary(after) {
                    return Some(HtmlBlockEnd::EndTag(end));
                }
            }
        }
        if BLOCK_TAGS.contains(&name.as_str()) && starts_tag_boundary(after) {
            return Some(HtmlBlockEnd::BlankLine);
        }

        // Type 7: a complete open or close tag with nothing else on the line.
        if !interrupting_paragraph && is_complete_tag_line(after, closing) {
            return Some(HtmlBlockEnd::BlankLine);
        }
        None
    }

    /// Whether a line of an open HTML block terminates it.
    pub fn line_ends(end: HtmlBlockEnd, remainder: &str) -> bool {
        match end {
            HtmlBlockEnd::EndTag(tag) => remainder.to_ascii_lowercase().contains(tag),
            HtmlBlockEnd::Comment => remainder.contains("-->"),
            HtmlBlockEnd::ProcessingInstruction => remainder.contains("?>"),
            HtmlBlockEnd::Declaration => remainder.contains('>'),
            HtmlBlockEnd::Cdata => remainder.contains("]]>"),
            HtmlBlockEnd::BlankLine => false,
        }
    }
}

fn starts_tag_boundary(after: &str) -> bool {
    matches!(
        after.as_bytes().first(),
        None | Some(b' ') | Some(b'\t') | Some(b'>') | Some(b'/')
    )
}

/// Loose check that `after` is attribute soup ending in `>` (or `/>`), with
/// nothing but whitespace following on the line.
fn is_complete_tag_line(after: &str, closing: bool) -> bool {
    let trimmed = after.trim_end();
    let Some(stripped) = trimmed.strip_suffix('>') else {
        return false;
    };
    let stripped = stripped.strip_suffix('/').unwrap_or(stripped);
    if closing {
        return stripped.trim().is_empty();
    }
    // Attributes must not contain another angle bracket.
    !stripped.contains('<') && !stripped.contains('>')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_text_openers() {
        assert_eq!(
            HtmlBlockStart::parse("<script src=\"x\">", false),
            Some(HtmlBlockEnd::EndTag("</script>"))
        );
        assert_eq!(
            HtmlBlockStart::parse("<pre>", true),
            Some(HtmlBlockEnd::EndTag("</pre>"))
        );
    }

    #[test]
    fn comment_and_declaration() {
        assert_eq!(
            HtmlBlockStart::parse("<!-- note", false),
            Some(HtmlBlockEnd::Comment)
        );
        assert_eq!(
            HtmlBlockStart::parse("<!DOCTYPE html>", false),
            Some(HtmlBlockEnd::Declaration)
        );
        assert_eq!(
            HtmlBlockStart::parse("<?php echo", false),
            Some(HtmlBlockEnd::ProcessingInstruction)
        );
    }

    #[test]
    fn block_tags_end_on_blank() {
        assert_eq!(
            HtmlBlockStart::parse("<div class=\"x\">", true),
            Some(HtmlBlockEnd::BlankLine)
        );
        assert_eq!(
            HtmlBlockStart::parse("</div>", true),
            Some(HtmlBlockEnd::BlankLine)
        );
    }

    #[test]
    fn type7_cannot_interrupt_paragraph() {
        assert_eq!(
            HtmlBlockStart::parse("<custom-tag>", false),
            Some(HtmlBlockEnd::BlankLine)
        );
        assert_eq!(HtmlBlockStart::parse("<custom-tag>", true), None);
        assert_eq!(HtmlBlockStart::parse("<custom-tag> text", false), None);
    }

    #[test]
    fn end_conditions() {
        assert!(HtmlBlockStart::line_ends(
            HtmlBlockEnd::EndTag("</script>"),
            "x();</SCRIPT>"
        ));
        assert!(HtmlBlockStart::line_ends(HtmlBlockEnd::Comment, "done -->"));
        assert!(!HtmlBlockStart::line_ends(HtmlBlockEnd::BlankLine, "<p>"));
    }
}
