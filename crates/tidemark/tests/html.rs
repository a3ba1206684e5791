//! Output shapes of the stock HTML renderer: block composition and the
//! `HtmlFlags` surface.

use tidemark::{to_html, Extensions, HtmlFlags};

fn html(input: &str) -> String {
    to_html(input, Extensions::empty(), HtmlFlags::empty())
}

fn html_with(input: &str, flags: HtmlFlags) -> String {
    to_html(input, Extensions::empty(), flags)
}

#[test]
fn paragraphs_are_separated_by_blank_lines() {
    assert_eq!(html("one\n\ntwo"), "<p>one</p>\n\n<p>two</p>\n");
}

#[test]
fn atx_headers() {
    assert_eq!(html("## Head ##"), "<h2>Head</h2>\n");
    assert_eq!(html("### deep"), "<h3>deep</h3>\n");
}

#[test]
fn setext_headers() {
    assert_eq!(html("Title\n=====\n\nBody"), "<h1>Title</h1>\n\n<p>Body</p>\n");
    assert_eq!(html("Sub\n---"), "<h2>Sub</h2>\n");
}

#[test]
fn a_paragraph_before_its_setext_header_stays_a_paragraph() {
    assert_eq!(
        html("lead\n\nTitle\n==="),
        "<p>lead</p>\n\n<h1>Title</h1>\n"
    );
}

#[test]
fn horizontal_rules() {
    assert_eq!(html("a\n\n* * *\n\nb"), "<p>a</p>\n\n<hr>\n\n<p>b</p>\n");
}

#[test]
fn blockquotes_recurse_into_blocks() {
    assert_eq!(
        html("> quoted\n> text"),
        "<blockquote>\n<p>quoted\ntext</p>\n</blockquote>\n"
    );
}

#[test]
fn nested_blockquotes() {
    assert_eq!(
        html("> > inner"),
        "<blockquote>\n<blockquote>\n<p>inner</p>\n</blockquote>\n</blockquote>\n"
    );
}

#[test]
fn unordered_lists() {
    assert_eq!(
        html("- one\n- two"),
        "<ul>\n<li>one</li>\n<li>two</li>\n</ul>\n"
    );
}

#[test]
fn ordered_lists() {
    assert_eq!(
        html("1. a\n2. b"),
        "<ol>\n<li>a</li>\n<li>b</li>\n</ol>\n"
    );
}

#[test]
fn loose_items_wrap_their_content_in_paragraphs() {
    assert_eq!(
        html("- a\n\n- b"),
        "<ul>\n<li><p>a</p></li>\n<li><p>b</p></li>\n</ul>\n"
    );
}

#[test]
fn indented_code_blocks_strip_the_indent() {
    assert_eq!(
        html("    x = 1\n    y = 2"),
        "<pre><code>x = 1\ny = 2\n</code></pre>\n"
    );
}

#[test]
fn code_blocks_escape_their_content() {
    assert_eq!(
        html("    a <b> & c"),
        "<pre><code>a &lt;b&gt; &amp; c\n</code></pre>\n"
    );
}

#[test]
fn raw_html_blocks_pass_through() {
    assert_eq!(
        html("<div>\nfoo\n</div>\n\nbar"),
        "<div>\nfoo\n</div>\n\n<p>bar</p>\n"
    );
}

#[test]
fn html_comments_form_blocks() {
    assert_eq!(
        html("<!-- note -->\n\nafter"),
        "<!-- note -->\n\n<p>after</p>\n"
    );
}

#[test]
fn inline_html_tags_pass_through() {
    assert_eq!(html("a <em>b</em> c"), "<p>a <em>b</em> c</p>\n");
}

#[test]
fn angle_bracket_autolinks() {
    assert_eq!(
        html("<http://x.com>"),
        "<p><a href=\"http://x.com\">http://x.com</a></p>\n"
    );
    assert_eq!(
        html("<foo@bar.com>"),
        "<p><a href=\"mailto:foo@bar.com\">foo@bar.com</a></p>\n"
    );
}

#[test]
fn inline_links_and_images() {
    assert_eq!(
        html("[text](/url)"),
        "<p><a href=\"/url\">text</a></p>\n"
    );
    assert_eq!(
        html("![alt](/img.png \"t\")"),
        "<p><img src=\"/img.png\" alt=\"alt\" title=\"t\"></p>\n"
    );
}

#[test]
fn shortcut_references() {
    assert_eq!(
        html("[x]\n\n[x]: /here"),
        "<p><a href=\"/here\">x</a></p>\n"
    );
}

#[test]
fn unresolved_references_stay_literal() {
    assert_eq!(html("[nope][missing]"), "<p>[nope][missing]</p>\n");
}

#[test]
fn hard_breaks_need_two_trailing_spaces() {
    assert_eq!(html("a  \nb"), "<p>a<br>\nb</p>\n");
    assert_eq!(html("a\nb"), "<p>a\nb</p>\n");
}

#[test]
fn entities_pass_through_whole() {
    assert_eq!(
        html("AT&amp;T & &#169;"),
        "<p>AT&amp;T &amp; &#169;</p>\n"
    );
}

#[test]
fn triple_emphasis_nests() {
    assert_eq!(
        html("***x***"),
        "<p><strong><em>x</em></strong></p>\n"
    );
    assert_eq!(html("**x**"), "<p><strong>x</strong></p>\n");
}

#[test]
fn emphasis_respects_code_spans() {
    // The star inside the code span cannot close emphasis.
    assert_eq!(
        html("*a `b*` c*"),
        "<p><em>a <code>b*</code> c</em></p>\n"
    );
}

#[test]
fn hard_wrap_renders_breaks_for_every_newline() {
    assert_eq!(
        html_with("a\nb", HtmlFlags::HARD_WRAP),
        "<p>a<br>\nb</p>\n"
    );
}

#[test]
fn xhtml_uses_self_closing_forms() {
    assert_eq!(html_with("---\n", HtmlFlags::USE_XHTML), "<hr/>\n");
    assert_eq!(
        html_with("a  \nb", HtmlFlags::USE_XHTML),
        "<p>a<br/>\nb</p>\n"
    );
}

#[test]
fn skip_html_drops_tags_but_keeps_text() {
    assert_eq!(
        html_with("a <b>x</b>", HtmlFlags::SKIP_HTML),
        "<p>a x</p>\n"
    );
    assert_eq!(html_with("<div>\nx\n</div>\n", HtmlFlags::SKIP_HTML), "");
}

#[test]
fn safe_links_reject_unknown_schemes() {
    assert_eq!(
        html_with("[x](javascript:alert(1))", HtmlFlags::SAFE_LINKS),
        "<p>[x](javascript:alert(1))</p>\n"
    );
    assert_eq!(
        html_with("[x](http://ok.com)", HtmlFlags::SAFE_LINKS),
        "<p><a href=\"http://ok.com\">x</a></p>\n"
    );
}
