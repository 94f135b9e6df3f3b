//! Inline parsing: cursor scan with delimiter and bracket stacks.
//!
//! A block's inline region is assembled into an [`InlineContent`] (flat
//! text plus an offset map back into the source), scanned once left to
//! right, and folded into span-carrying inline nodes. Code spans are raw
//! zones; unmatched delimiters and brackets demote to text; the stack
//! drains fully, so parsing never fails.

pub mod content;
pub mod emphasis;
pub mod links;
pub mod parser;
pub mod types;

pub use content::InlineContent;
pub use parser::parse_inline;
pub use types::{Inline, InlineKind};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Span;
    use pretty_assertions::assert_eq;

    fn parse(text: &str) -> Vec<Inline> {
        parse_inline(&InlineContent::contiguous(
            text.to_string(),
            Span::new(0, text.len()),
        ))
    }

    #[test]
    fn plain_text_is_one_node() {
        let nodes = parse("hello world");
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].span, Span::new(0, 11));
        assert!(matches!(nodes[0].kind, InlineKind::Text { literal: None }));
    }

    #[test]
    fn emphasis_and_strong() {
        let nodes = parse("a *em* and **strong**");
        assert_eq!(nodes.len(), 4);
        match &nodes[1].kind {
            InlineKind::Emphasis { marker, children } => {
                assert_eq!(*marker, b'*');
                assert_eq!(children.len(), 1);
            }
            other => panic!("expected emphasis, got {other:?}"),
        }
        assert_eq!(nodes[1].span, Span::new(2, 6));
        match &nodes[3].kind {
            InlineKind::Strong { marker, children } => {
                assert_eq!(*marker, b'*');
                assert_eq!(children[0].span, Span::new(13, 19));
            }
            other => panic!("expected strong, got {other:?}"),
        }
        assert_eq!(nodes[3].span, Span::new(11, 21));
    }

    #[test]
    fn nested_triple_emphasis() {
        let nodes = parse("***x***");
        assert_eq!(nodes.len(), 1);
        let InlineKind::Emphasis { children, .. } = &nodes[0].kind else {
            panic!("outer node should be emphasis");
        };
        assert!(matches!(children[0].kind, InlineKind::Strong { .. }));
    }

    #[test]
    fn unmatched_star_stays_text() {
        let nodes = parse("2 * 3 = 6");
        // The leftover delimiter merges back into the surrounding text.
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].span, Span::new(0, 9));
        assert!(matches!(nodes[0].kind, InlineKind::Text { literal: None }));
    }

    #[test]
    fn code_span_is_a_raw_zone() {
        let nodes = parse("`*not em*`");
        assert_eq!(nodes.len(), 1);
        match &nodes[0].kind {
            InlineKind::Code { tick_len, literal } => {
                assert_eq!(*tick_len, 1);
                assert_eq!(&**literal, "*not em*");
            }
            other => panic!("expected code, got {other:?}"),
        }
    }

    #[test]
    fn double_backtick_code_with_padding() {
        let nodes = parse("`` `tick` ``");
        match &nodes[0].kind {
            InlineKind::Code { tick_len, literal } => {
                assert_eq!(*tick_len, 2);
                assert_eq!(&**literal, "`tick`");
            }
            other => panic!("expected code, got {other:?}"),
        }
    }

    #[test]
    fn unclosed_backtick_is_text() {
        let nodes = parse("a `unclosed");
        assert_eq!(nodes.len(), 1);
        assert!(matches!(nodes[0].kind, InlineKind::Text { literal: None }));
        assert_eq!(nodes[0].span, Span::new(0, 11));
    }

    #[test]
    fn inline_link() {
        let nodes = parse("see [docs](https://d.io \"t\") now");
        assert_eq!(nodes.len(), 3);
        match &nodes[1].kind {
            InlineKind::Link {
                dest,
                title,
                children,
            } => {
                assert_eq!(dest, "https://d.io");
                assert_eq!(title.as_deref(), Some("t"));
                assert_eq!(children.len(), 1);
            }
            other => panic!("expected link, got {other:?}"),
        }
        assert_eq!(nodes[1].span, Span::new(4, 28));
    }

    #[test]
    fn image_with_alt() {
        let nodes = parse("![alt](img.png)");
        assert_eq!(nodes.len(), 1);
        match &nodes[0].kind {
            InlineKind::Image { dest, children, .. } => {
                assert_eq!(dest, "img.png");
                assert_eq!(children.len(), 1);
            }
            other => panic!("expected image, got {other:?}"),
        }
    }

    #[test]
    fn reference_link_forms() {
        let nodes = parse("[full][lbl] [collapsed][] [shortcut]");
        let labels: Vec<&str> = nodes
            .iter()
            .filter_map(|n| match &n.kind {
                InlineKind::RefLink { label, .. } => Some(label.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(labels, vec!["lbl", "collapsed", "shortcut"]);
    }

    #[test]
    fn emphasis_inside_link_text() {
        let nodes = parse("[*em* text](x)");
        let InlineKind::Link { children, .. } = &nodes[0].kind else {
            panic!("expected link");
        };
        assert!(matches!(children[0].kind, InlineKind::Emphasis { .. }));
    }

    #[test]
    fn no_links_inside_links() {
        let nodes = parse("[a [b](inner) c](outer)");
        let links: Vec<&Inline> = nodes
            .iter()
            .filter(|n| matches!(n.kind, InlineKind::Link { .. }))
            .collect();
        assert_eq!(links.len(), 1);
        match &links[0].kind {
            InlineKind::Link { dest, .. } => assert_eq!(dest, "inner"),
            _ => unreachable!(),
        }
    }

    #[test]
    fn autolink_and_email() {
        let nodes = parse("<https://x.io> and <a@b.io>");
        match &nodes[0].kind {
            InlineKind::Autolink { url, email } => {
                assert_eq!(url, "https://x.io");
                assert!(!email);
            }
            other => panic!("expected autolink, got {other:?}"),
        }
        match &nodes[2].kind {
            InlineKind::Autolink { email, .. } => assert!(email),
            other => panic!("expected email autolink, got {other:?}"),
        }
    }

    #[test]
    fn strikethrough_needs_double_tilde() {
        let nodes = parse("~~gone~~ but ~one~ stays");
        assert!(matches!(nodes[0].kind, InlineKind::Strikethrough { .. }));
        assert_eq!(nodes[0].span, Span::new(0, 8));
        assert!(nodes[1..]
            .iter()
            .all(|n| matches!(n.kind, InlineKind::Text { .. })));
    }

    #[test]
    fn breaks() {
        let nodes = parse("soft\nline");
        assert!(matches!(nodes[1].kind, InlineKind::SoftBreak));
        let nodes = parse("hard  \nline");
        assert!(matches!(nodes[1].kind, InlineKind::HardBreak));
        assert_eq!(nodes[0].span, Span::new(0, 4));
        let nodes = parse("slash\\\nline");
        assert!(matches!(nodes[1].kind, InlineKind::HardBreak));
    }

    #[test]
    fn backslash_escape() {
        let nodes = parse(r"a \* b");
        assert_eq!(nodes.len(), 3);
        match &nodes[1].kind {
            InlineKind::Text { literal } => assert_eq!(literal.as_deref(), Some("*")),
            other => panic!("expected escaped text, got {other:?}"),
        }
        assert_eq!(nodes[1].span, Span::new(2, 4));
    }

    #[test]
    fn html_inline_passthrough() {
        let nodes = parse("a <span class=\"x\">b</span>");
        assert!(matches!(nodes[1].kind, InlineKind::HtmlInline { .. }));
        match &nodes[1].kind {
            InlineKind::HtmlInline { literal } => assert_eq!(&**literal, "<span class=\"x\">"),
            _ => unreachable!(),
        }
    }

    #[test]
    fn footnote_reference() {
        let nodes = parse("fact[^1].");
        match &nodes[1].kind {
            InlineKind::FootnoteReference { label } => assert_eq!(label, "1"),
            other => panic!("expected footnote ref, got {other:?}"),
        }
    }

    #[test]
    fn stray_close_bracket_is_text() {
        let nodes = parse("a ] b");
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].span, Span::new(0, 5));
    }

    #[test]
    fn mod_three_ambiguous_run_degrades_to_text() {
        // Rule-of-three refusal: "*foo**bar" leaves everything literal.
        let nodes = parse("*foo**bar");
        assert!(nodes
            .iter()
            .all(|n| matches!(n.kind, InlineKind::Text { .. })));
    }

    #[test]
    fn spans_cover_children_in_order() {
        let nodes = parse("x **a `c` b** y");
        let InlineKind::Strong { children, .. } = &nodes[1].kind else {
            panic!("expected strong");
        };
        let mut prev_end = nodes[1].span.start;
        for child in children {
            assert!(child.span.start >= prev_end);
            assert!(child.span.end <= nodes[1].span.end);
            prev_end = child.span.end;
        }
    }
}
