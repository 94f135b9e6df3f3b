//! Round-trip identity: serializing an unedited tree reproduces the source
//! byte for byte, whatever the input looks like.

use markdown_vellum_engine::{invariants, parse, serialize, write_markdown, Span};
use pretty_assertions::assert_eq;

fn roundtrip(src: &str) {
    let doc = parse(src);
    invariants::assert_valid(&doc);
    assert_eq!(serialize(&doc), src, "lossless round-trip failed");
}

#[test]
fn empty_source() {
    let doc = parse("");
    assert_eq!(doc.span, Span::new(0, 0));
    assert!(doc.blocks.is_empty());
    assert_eq!(serialize(&doc), "");
}

#[test]
fn headings_and_paragraphs() {
    roundtrip("# One\n\nplain paragraph\nwith a second line\n");
    roundtrip("Setext\n======\n\nAnd dashes\n---\n");
    roundtrip("   ### indented heading ###\n");
}

#[test]
fn marker_choices_survive() {
    roundtrip("*star emphasis* and _underscore_\n");
    roundtrip("- dash\n- list\n\n* star\n* list\n\n+ plus\n+ list\n");
    roundtrip("```js\ncode\n```\n\n~~~~\ntilde fence, length four\n~~~~\n");
    roundtrip("***\n---\n___\n");
}

#[test]
fn blank_runs_and_trailing_newlines() {
    roundtrip("a\n\n\n\nb");
    roundtrip("a\n\n\n");
    roundtrip("\n\nleading blanks\n");
    roundtrip("no trailing newline");
    roundtrip("trailing newline\n");
}

#[test]
fn crlf_line_endings_survive() {
    roundtrip("one\r\ntwo\r\n\r\nthree\r\n");
    roundtrip("# Title\r\n\r\n- a\r\n- b\r\n");
}

#[test]
fn containers_and_leaves() {
    roundtrip("> quoted\n> more\n\n> separate quote\n");
    roundtrip("> outer\n> > inner\n");
    roundtrip("- item one\n  continued\n- item two\n\n  loose tail\n");
    roundtrip("1. first\n2. second\n10. tenth\n");
    roundtrip("    indented code\n        deeper\n");
    roundtrip("<div>\nraw html\n</div>\n");
    roundtrip("[ref]: https://example.com \"Title\"\n\nuse [ref] here\n");
}

#[test]
fn gfm_constructs() {
    roundtrip("| a | b |\n|---|---|\n| 1 | 2 |\n");
    roundtrip("| left | right |\n|:-----|------:|\n");
    roundtrip("- [ ] todo\n- [x] done\n");
    roundtrip("~~struck~~ text\n");
    roundtrip("[^note]: the note text\n\nbody with a marker[^note]\n");
}

#[test]
fn degenerate_inputs_still_tile() {
    roundtrip("``` unclosed fence\nnever closed");
    roundtrip(">\n");
    roundtrip("-\n");
    roundtrip("| not | a table\n");
    roundtrip("[broken](link\n");
    roundtrip("\\");
}

#[test]
fn unicode_content() {
    roundtrip("日本語の**段落**です\n\n- émoji 🦀 item\n");
}

#[test]
fn normalizing_writer_is_stable() {
    // Normalizing an already-normal document changes nothing.
    let src = "# Hello\n\nWorld\n";
    let doc = parse(src);
    assert_eq!(write_markdown(&doc), src);

    // Seed: collapse excess blank lines, keep lossless surface intact.
    let messy = parse("# Hello\n\n\n\nWorld");
    assert_eq!(write_markdown(&messy), "# Hello\n\nWorld\n");
    assert_eq!(serialize(&messy), "# Hello\n\n\n\nWorld");
}
