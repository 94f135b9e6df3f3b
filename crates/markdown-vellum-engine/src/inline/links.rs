//! Link, autolink and inline-HTML scanning helpers.
//!
//! These operate on the assembled content text by byte position and return
//! the parsed payload together with the position just past the construct.

/// Target of a just-closed bracket pair.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkTarget {
    Inline { dest: String, title: Option<String> },
    Reference { label: String },
}

/// Tries to parse the `(destination "title")` suffix of an inline link
/// starting at `pos` (which must point at the byte after `]`).
pub fn parse_inline_suffix(text: &str, pos: usize) -> Option<(String, Option<String>, usize)> {
    let bytes = text.as_bytes();
    if bytes.get(pos) != Some(&b'(') {
        return None;
    }
    let mut i = skip_ws(bytes, pos + 1);

    if bytes.get(i) == Some(&b')') {
        return Some((String::new(), None, i + 1));
    }

    let (dest, after) = if bytes.get(i) == Some(&b'<') {
        parse_angle_dest(text, i)?
    } else {
        parse_bare_dest(text, i)?
    };
    i = skip_ws(bytes, after);

    let mut title = None;
    if matches!(bytes.get(i), Some(b'"') | Some(b'\'') | Some(b'(')) {
        let (t, after_title) = parse_title(text, i)?;
        title = Some(t);
        i = skip_ws(bytes, after_title);
    }

    if bytes.get(i) != Some(&b')') {
        return None;
    }
    Some((dest, title, i + 1))
}

/// Tries to parse a `[label]` reference suffix at `pos`. Returns the raw
/// label (empty for the collapsed `[]` form) and the end position.
pub fn parse_reference_suffix(text: &str, pos: usize) -> Option<(String, usize)> {
    let bytes = text.as_bytes();
    if bytes.get(pos) != Some(&b'[') {
        return None;
    }
    let mut i = pos + 1;
    while i < bytes.len() && bytes[i] != b']' {
        if bytes[i] == b'[' || bytes[i] == b'\n' {
            return None;
        }
        if bytes[i] == b'\\' && i + 1 < bytes.len() {
            i += 1;
        }
        i += 1;
    }
    if i >= bytes.len() {
        return None;
    }
    Some((text[pos + 1..i].to_string(), i + 1))
}

fn parse_angle_dest(text: &str, start: usize) -> Option<(String, usize)> {
    let bytes = text.as_bytes();
    let mut dest = String::new();
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'>' => return Some((dest, i + 1)),
            b'<' | b'\n' => return None,
            b'\\' if i + 1 < bytes.len() && bytes[i + 1].is_ascii_punctuation() => {
                dest.push(bytes[i + 1] as char);
                i += 2;
            }
            b => {
                let len = utf8_len(b);
                dest.push_str(&text[i..(i + len).min(text.len())]);
                i += len;
            }
        }
    }
    None
}

fn parse_bare_dest(text: &str, start: usize) -> Option<(String, usize)> {
    let bytes = text.as_bytes();
    let mut dest = String::new();
    let mut depth = 0i32;
    let mut i = start;
    while i < bytes.len() {
        let b = bytes[i];
        if b <= 0x20 {
            break;
        }
        match b {
            b'(' => {
                depth += 1;
                dest.push('(');
                i += 1;
            }
            b')' => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
                dest.push(')');
                i += 1;
            }
            b'\\' if i + 1 < bytes.len() && bytes[i + 1].is_ascii_punctuation() => {
                dest.push(bytes[i + 1] as char);
                i += 2;
            }
            _ => {
                let len = utf8_len(b);
                dest.push_str(&text[i..(i + len).min(text.len())]);
                i += len;
            }
        }
    }
    if depth != 0 || dest.is_empty() {
        None
    } else {
        Some((dest, i))
    }
}

fn parse_title(text: &str, start: usize) -> Option<(String, usize)> {
    let bytes = text.as_bytes();
    let close = match bytes[start] {
        b'"' => b'"',
        b'\'' => b'\'',
        b'(' => b')',
        _ => return None,
    };
    let mut title = String::new();
    let mut i = start + 1;
    while i < bytes.len() {
        let b = bytes[i];
        if b == close {
            return Some((title, i + 1));
        }
        if b == b'\\' && i + 1 < bytes.len() && bytes[i + 1].is_ascii_punctuation() {
            title.push(bytes[i + 1] as char);
            i += 2;
        } else {
            let len = utf8_len(b);
            title.push_str(&text[i..(i + len).min(text.len())]);
            i += len;
        }
    }
    None
}

/// `<scheme:...>` URI autolink or `<user@host>` email autolink starting at
/// a `<`. Returns (url, is_email, end).
pub fn parse_autolink(text: &str, pos: usize) -> Option<(String, bool, usize)> {
    let bytes = text.as_bytes();
    debug_assert_eq!(bytes.get(pos), Some(&b'<'));
    let inner_start = pos + 1;
    let mut i = inner_start;
    while i < bytes.len() && bytes[i] != b'>' {
        let b = bytes[i];
        if b == b'<' || b == b' ' || b == b'\t' || b == b'\n' || b < 0x20 {
            return None;
        }
        i += 1;
    }
    if i >= bytes.len() || i == inner_start {
        return None;
    }
    let inner = &text[inner_start..i];
    if is_uri(inner) {
        return Some((inner.to_string(), false, i + 1));
    }
    if is_email(inner) {
        return Some((inner.to_string(), true, i + 1));
    }
    None
}

fn is_uri(s: &str) -> bool {
    let bytes = s.as_bytes();
    let Some(colon) = s.find(':') else {
        return false;
    };
    if !(2..=32).contains(&colon) {
        return false;
    }
    if !bytes[0].is_ascii_alphabetic() {
        return false;
    }
    bytes[..colon]
        .iter()
        .all(|&b| b.is_ascii_alphanumeric() || b == b'+' || b == b'.' || b == b'-')
}

fn is_email(s: &str) -> bool {
    let Some(at) = s.find('@') else {
        return false;
    };
    let (local, domain) = (&s[..at], &s[at + 1..]);
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return false;
    }
    let local_ok = local.bytes().all(|b| {
        b.is_ascii_alphanumeric() || b".!#$%&'*+/=?^_`{|}~-".contains(&b)
    });
    let domain_ok = domain
        .split('.')
        .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-'));
    local_ok && domain_ok
}

/// Raw inline HTML at a `<`: open/close tag, comment, processing
/// instruction, declaration or CDATA section. Returns the end position.
pub fn parse_html_inline(text: &str, pos: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let rest = &text[pos + 1..];

    if let Some(after) = rest.strip_prefix("!--") {
        let end = after.find("-->")?;
        return Some(pos + 1 + 3 + end + 3);
    }
    if let Some(after) = rest.strip_prefix("![CDATA[") {
        let end = after.find("]]>")?;
        return Some(pos + 1 + 8 + end + 3);
    }
    if rest.starts_with('!') {
        let end = rest.find('>')?;
        return Some(pos + 1 + end + 1);
    }
    if let Some(after) = rest.strip_prefix('?') {
        let end = after.find("?>")?;
        return Some(pos + 1 + 1 + end + 2);
    }

    // Open or close tag.
    let mut i = pos + 1;
    let closing = bytes.get(i) == Some(&b'/');
    if closing {
        i += 1;
    }
    let name_start = i;
    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'-') {
        i += 1;
    }
    if i == name_start || !bytes[name_start].is_ascii_alphabetic() {
        return None;
    }
    // Attribute soup: anything without another angle bracket, single quotes
    // and double quotes respected.
    let mut in_quote: u8 = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if in_quote != 0 {
            if b == in_quote {
                in_quote = 0;
            }
            i += 1;
            continue;
        }
        match b {
            b'"' | b'\'' => {
                in_quote = b;
                i += 1;
            }
            b'>' => return Some(i + 1),
            b'<' => return None,
            _ => i += 1,
        }
    }
    None
}

/// `[^label]` footnote reference at a `[`. Returns (label, end).
pub fn parse_footnote_ref(text: &str, pos: usize) -> Option<(String, usize)> {
    let rest = &text[pos..];
    let rest = rest.strip_prefix("[^")?;
    let close = rest.find(']')?;
    let label = &rest[..close];
    if label.is_empty() || label.bytes().any(|b| b.is_ascii_whitespace()) {
        return None;
    }
    Some((label.to_string(), pos + 2 + close + 1))
}

fn skip_ws(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && matches!(bytes[i], b' ' | b'\t' | b'\n') {
        i += 1;
    }
    i
}

fn utf8_len(first: u8) -> usize {
    if first < 0x80 {
        1
    } else if first < 0xE0 {
        2
    } else if first < 0xF0 {
        3
    } else {
        4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_suffix_with_title() {
        let text = r#"](https://a.io "hi") rest"#;
        let (dest, title, end) = parse_inline_suffix(text, 1).unwrap();
        assert_eq!(dest, "https://a.io");
        assert_eq!(title.as_deref(), Some("hi"));
        assert_eq!(&text[end..], " rest");
    }

    #[test]
    fn inline_suffix_balanced_parens() {
        let text = "](a(b)c)";
        let (dest, _, end) = parse_inline_suffix(text, 1).unwrap();
        assert_eq!(dest, "a(b)c");
        assert_eq!(end, text.len());
    }

    #[test]
    fn empty_inline_suffix() {
        let (dest, title, end) = parse_inline_suffix("]()", 1).unwrap();
        assert_eq!(dest, "");
        assert!(title.is_none());
        assert_eq!(end, 3);
    }

    #[test]
    fn reference_suffix_forms() {
        assert_eq!(
            parse_reference_suffix("[label]", 0),
            Some(("label".to_string(), 7))
        );
        assert_eq!(parse_reference_suffix("[]", 0), Some((String::new(), 2)));
        assert_eq!(parse_reference_suffix("[a\nb]", 0), None);
    }

    #[test]
    fn autolinks() {
        assert_eq!(
            parse_autolink("<https://x.io>", 0),
            Some(("https://x.io".to_string(), false, 14))
        );
        assert_eq!(
            parse_autolink("<me@example.com>", 0),
            Some(("me@example.com".to_string(), true, 16))
        );
        assert_eq!(parse_autolink("<not a link>", 0), None);
        assert_eq!(parse_autolink("<nocolon>", 0), None);
    }

    #[test]
    fn html_inline_tags() {
        assert_eq!(parse_html_inline("<b>", 0), Some(3));
        assert_eq!(parse_html_inline("</span>", 0), Some(7));
        assert_eq!(parse_html_inline("<a href=\"x>y\">", 0), Some(14));
        assert_eq!(parse_html_inline("<!-- c -->", 0), Some(10));
        assert_eq!(parse_html_inline("<1bad>", 0), None);
    }

    #[test]
    fn footnote_refs() {
        assert_eq!(
            parse_footnote_ref("[^fn] x", 0),
            Some(("fn".to_string(), 5))
        );
        assert_eq!(parse_footnote_ref("[^a b]", 0), None);
        assert_eq!(parse_footnote_ref("[plain]", 0), None);
    }
}
