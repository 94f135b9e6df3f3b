/// Escapes `& < > "` for HTML output; `'` is left alone.
pub fn escape_html_into(out: &mut String, input: &str) {
    let bytes = input.as_bytes();
    let mut last = 0;
    for (i, &b) in bytes.iter().enumerate() {
        let replacement = match b {
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            b'"' => "&quot;",
            _ => continue,
        };
        if last < i {
            out.push_str(&input[last..i]);
        }
        out.push_str(replacement);
        last = i + 1;
    }
    if last < bytes.len() {
        out.push_str(&input[last..]);
    }
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    escape_html_into(&mut out, input);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_the_required_four() {
        assert_eq!(escape_html(r#"a < b & c > "d""#), "a &lt; b &amp; c &gt; &quot;d&quot;");
    }

    #[test]
    fn apostrophe_is_untouched() {
        assert_eq!(escape_html("it's"), "it's");
    }
}
