use xi_rope::Rope;

use super::span::Span;

/// Copies the bytes a span covers out of the rope.
///
/// Nodes hold spans, never text, so everything that needs owned text
/// (inline assembly, raw code/HTML regions, renderer fallbacks) funnels
/// through here. Allocates once per call.
pub fn slice_to_string(rope: &Rope, sp: Span) -> String {
    let mut out = String::with_capacity(sp.len());
    out.push_str(&rope.slice_to_cow(sp.start..sp.end));
    out
}

/// A shortened slice for trace output: at most `max` bytes, elided with
/// `...`. The cut backs up to a character boundary, so multi-byte text
/// never splits mid-character.
pub fn preview(rope: &Rope, sp: Span, max: usize) -> String {
    let text = slice_to_string(rope, sp);
    if text.len() <= max {
        return text;
    }
    let mut cut = max;
    while cut > 0 && !text.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &text[..cut])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_exact_bytes() {
        let rope = Rope::from("alpha beta");
        assert_eq!(slice_to_string(&rope, Span::new(6, 10)), "beta");
        assert_eq!(slice_to_string(&rope, Span::new(3, 3)), "");
    }

    #[test]
    fn preview_elides_long_text() {
        let rope = Rope::from("0123456789");
        assert_eq!(preview(&rope, Span::new(0, 10), 4), "0123...");
        assert_eq!(preview(&rope, Span::new(0, 4), 10), "0123");
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let rope = Rope::from("日本語");
        // A cut at byte 4 would split the second character; it backs up.
        assert_eq!(preview(&rope, Span::new(0, 9), 4), "日...");
    }
}
