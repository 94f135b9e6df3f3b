//! HTML rendering conventions and the render-related spec scenarios.

use markdown_vellum_engine::{parse, render_html, render_html_with, serialize, RenderOptions};
use pretty_assertions::assert_eq;

fn html(src: &str) -> String {
    render_html(&parse(src))
}

#[test]
fn heading_seed() {
    assert_eq!(html("# Hello\n"), "<h1>Hello</h1>\n");
}

#[test]
fn bold_paragraph_seed() {
    assert_eq!(html("**Bold** text"), "<p><strong>Bold</strong> text</p>\n");
}

#[test]
fn heading_levels() {
    assert_eq!(
        html("# a\n## b\n### c\n"),
        "<h1>a</h1>\n<h2>b</h2>\n<h3>c</h3>\n"
    );
    assert_eq!(html("Setext\n===\n"), "<h1>Setext</h1>\n");
}

#[test]
fn paragraph_and_breaks() {
    assert_eq!(html("one\ntwo"), "<p>one\ntwo</p>\n");
    assert_eq!(html("one  \ntwo"), "<p>one<br />\ntwo</p>\n");
}

#[test]
fn code_blocks() {
    assert_eq!(
        html("```rust\nfn x() {}\n```\n"),
        "<pre><code class=\"language-rust\">fn x() {}\n</code></pre>\n"
    );
    assert_eq!(
        html("    a < b\n"),
        "<pre><code>a &lt; b\n</code></pre>\n"
    );
}

#[test]
fn code_block_hook_overrides_default() {
    let doc = parse("```viz\nraw\n```\n");
    let opts = RenderOptions {
        code_block_hook: Some(Box::new(|info, code| {
            if info == "viz" {
                Some(format!("<div class=\"viz\">{}</div>\n", code.trim()))
            } else {
                None
            }
        })),
    };
    assert_eq!(render_html_with(&doc, &opts), "<div class=\"viz\">raw</div>\n");

    let other = parse("```rust\nx\n```\n");
    assert_eq!(
        render_html_with(&other, &opts),
        "<pre><code class=\"language-rust\">x\n</code></pre>\n"
    );
}

#[test]
fn lists_and_tasks() {
    assert_eq!(
        html("- a\n- b\n"),
        "<ul>\n<li>a</li>\n<li>b</li>\n</ul>\n"
    );
    assert_eq!(
        html("3. c\n4. d\n"),
        "<ol start=\"3\">\n<li>c</li>\n<li>d</li>\n</ol>\n"
    );
    assert_eq!(
        html("- [x] done\n"),
        "<ul>\n<li><input type=\"checkbox\" checked=\"\" disabled=\"\" /> done</li>\n</ul>\n"
    );
    // A loose list wraps item content in paragraphs.
    assert_eq!(
        html("- a\n\n- b\n"),
        "<ul>\n<li>\n<p>a</p>\n</li>\n<li>\n<p>b</p>\n</li>\n</ul>\n"
    );
}

#[test]
fn blockquotes_nest() {
    assert_eq!(
        html("> quoted\n"),
        "<blockquote>\n<p>quoted</p>\n</blockquote>\n"
    );
}

#[test]
fn thematic_break_and_html_block() {
    assert_eq!(html("---\n"), "<hr />\n");
    assert_eq!(html("<div>\nraw & raw\n</div>\n"), "<div>\nraw & raw\n</div>\n");
}

#[test]
fn table_seed() {
    let doc = parse("| a | b |\n|---|---|\n| 1 | 2 |");
    let out = render_html(&doc);
    assert_eq!(
        out,
        "<table>\n<thead>\n<tr>\n<th>a</th>\n<th>b</th>\n</tr>\n</thead>\n\
         <tbody>\n<tr>\n<td>1</td>\n<td>2</td>\n</tr>\n</tbody>\n</table>\n"
    );
}

#[test]
fn table_alignment_attributes() {
    let out = html("| l | c | r |\n|:--|:-:|--:|\n");
    assert!(out.contains("<th align=\"left\">l</th>"));
    assert!(out.contains("<th align=\"center\">c</th>"));
    assert!(out.contains("<th align=\"right\">r</th>"));
}

#[test]
fn links_images_and_references() {
    assert_eq!(
        html("[text](https://x.io \"T\")"),
        "<p><a href=\"https://x.io\" title=\"T\">text</a></p>\n"
    );
    assert_eq!(
        html("![alt text](img.png)"),
        "<p><img src=\"img.png\" alt=\"alt text\" /></p>\n"
    );
    assert_eq!(
        html("[Ref] me\n\n[ref]: /dest \"Ti\"\n"),
        "<p><a href=\"/dest\" title=\"Ti\">Ref</a> me</p>\n"
    );
    // Unresolved references fall back to literal text.
    assert_eq!(html("[nothing] here"), "<p>[nothing] here</p>\n");
}

#[test]
fn autolinks() {
    assert_eq!(
        html("<https://x.io>"),
        "<p><a href=\"https://x.io\">https://x.io</a></p>\n"
    );
    assert_eq!(
        html("<a@b.io>"),
        "<p><a href=\"mailto:a@b.io\">a@b.io</a></p>\n"
    );
}

#[test]
fn strikethrough_renders_del() {
    assert_eq!(html("~~gone~~"), "<p><del>gone</del></p>\n");
}

#[test]
fn text_escaping() {
    assert_eq!(
        html("a < b & \"c\""),
        "<p>a &lt; b &amp; &quot;c&quot;</p>\n"
    );
    // Apostrophes are not escaped.
    assert_eq!(html("it's"), "<p>it's</p>\n");
}

#[test]
fn footnotes_render_a_trailing_section() {
    let out = html("fact[^1]\n\n[^1]: the footnote\n");
    assert!(out.contains("<sup class=\"footnote-ref\"><a href=\"#fn-1\" id=\"fnref-1\">1</a></sup>"));
    assert!(out.contains("<section class=\"footnotes\">"));
    assert!(out.contains("<li id=\"fn-1\">"));
    assert!(out.contains("the footnote"));
    // An unresolved marker stays literal.
    assert_eq!(html("fact[^nope]"), "<p>fact[^nope]</p>\n");
}

#[test]
fn rendering_is_idempotent_through_serialize() {
    let sources = [
        "# Hello\n\nSome **bold** and a [link](x).\n",
        "- a\n- b\n\n> quote\n\n| x | y |\n|---|---|\n",
    ];
    for src in sources {
        let doc = parse(src);
        let reparsed = parse(&serialize(&doc));
        assert_eq!(render_html(&doc), render_html(&reparsed));
    }
}
