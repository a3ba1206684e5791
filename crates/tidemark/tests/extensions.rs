//! Behavior of each extension flag, on and off.

use tidemark::{to_html, Extensions, HtmlFlags};

fn html(input: &str, extensions: Extensions) -> String {
    to_html(input, extensions, HtmlFlags::empty())
}

#[test]
fn strikethrough_needs_double_tildes() {
    assert_eq!(
        html("~~gone~~", Extensions::STRIKETHROUGH),
        "<p><del>gone</del></p>\n"
    );
    assert_eq!(
        html("~single~", Extensions::STRIKETHROUGH),
        "<p>~single~</p>\n"
    );
    assert_eq!(html("~~gone~~", Extensions::empty()), "<p>~~gone~~</p>\n");
}

#[test]
fn highlight_needs_double_equals() {
    assert_eq!(
        html("==marked==", Extensions::HIGHLIGHT),
        "<p><mark>marked</mark></p>\n"
    );
    assert_eq!(html("=single=", Extensions::HIGHLIGHT), "<p>=single=</p>\n");
}

#[test]
fn underline_takes_over_underscores() {
    assert_eq!(
        html("_text_", Extensions::UNDERLINE),
        "<p><u>text</u></p>\n"
    );
    assert_eq!(html("_text_", Extensions::empty()), "<p><em>text</em></p>\n");
    // Stars keep their usual meaning.
    assert_eq!(
        html("*text*", Extensions::UNDERLINE),
        "<p><em>text</em></p>\n"
    );
}

#[test]
fn quote_spans() {
    assert_eq!(html("\"hi\"", Extensions::QUOTE), "<p><q>hi</q></p>\n");
    assert_eq!(html("\"hi\"", Extensions::empty()), "<p>&quot;hi&quot;</p>\n");
}

#[test]
fn superscript_token_and_group_forms() {
    assert_eq!(
        html("x^2 and y^(n+1)", Extensions::SUPERSCRIPT),
        "<p>x<sup>2</sup> and y<sup>n+1</sup></p>\n"
    );
}

#[test]
fn space_headers_requires_the_space() {
    assert_eq!(html("#tag", Extensions::SPACE_HEADERS), "<p>#tag</p>\n");
    assert_eq!(html("#tag", Extensions::empty()), "<h1>tag</h1>\n");
    assert_eq!(html("# ok", Extensions::SPACE_HEADERS), "<h1>ok</h1>\n");
}

#[test]
fn no_intra_emphasis_suppresses_mid_word_delimiters() {
    assert_eq!(
        html("intra*word*em", Extensions::NO_INTRA_EMPHASIS),
        "<p>intra*word*em</p>\n"
    );
    assert_eq!(
        html("intra*word*em", Extensions::empty()),
        "<p>intra<em>word</em>em</p>\n"
    );
}

#[test]
fn lax_spacing_lets_a_list_interrupt_a_paragraph() {
    assert_eq!(
        html("para\n- item", Extensions::LAX_SPACING),
        "<p>para</p>\n\n<ul>\n<li>item</li>\n</ul>\n"
    );
    assert_eq!(
        html("para\n- item", Extensions::empty()),
        "<p>para\n- item</p>\n"
    );
}

#[test]
fn indented_code_can_be_disabled() {
    assert_eq!(
        html("    let x;", Extensions::empty()),
        "<pre><code>let x;\n</code></pre>\n"
    );
    assert_eq!(
        html("    let x;", Extensions::DISABLE_INDENTED_CODE),
        "<p>let x;</p>\n"
    );
}

#[test]
fn fenced_code_with_braced_info_string() {
    assert_eq!(
        html("~~~ {.rust}\nlet x;\n~~~", Extensions::FENCED_CODE),
        "<pre><code class=\"language-.rust\">let x;\n</code></pre>\n"
    );
}

#[test]
fn unterminated_fence_runs_to_the_end() {
    assert_eq!(
        html("```\ncode\nmore", Extensions::FENCED_CODE),
        "<pre><code>code\nmore\n</code></pre>\n"
    );
}

#[test]
fn fences_suppress_list_prefix_detection_inside_items() {
    let out = html("- a\n  ```\n  - b\n  ```", Extensions::FENCED_CODE);
    assert_eq!(out.matches("<li>").count(), 1);
}

#[test]
fn bare_url_autolinks() {
    assert_eq!(
        html("visit http://example.com now", Extensions::AUTOLINK),
        "<p>visit <a href=\"http://example.com\">http://example.com</a> now</p>\n"
    );
    assert_eq!(
        html("visit http://example.com now", Extensions::empty()),
        "<p>visit http://example.com now</p>\n"
    );
}

#[test]
fn www_autolinks_get_a_scheme() {
    assert_eq!(
        html("see www.example.com.", Extensions::AUTOLINK),
        "<p>see <a href=\"http://www.example.com\">www.example.com</a>.</p>\n"
    );
}

#[test]
fn email_autolinks_get_a_mailto() {
    assert_eq!(
        html("mail a@b.com ok", Extensions::AUTOLINK),
        "<p>mail <a href=\"mailto:a@b.com\">a@b.com</a> ok</p>\n"
    );
}

#[test]
fn autolinking_is_suppressed_inside_link_bodies() {
    assert_eq!(
        html("[go http://x.com there](/z)", Extensions::AUTOLINK),
        "<p><a href=\"/z\">go http://x.com there</a></p>\n"
    );
}

#[test]
fn footnotes_are_numbered_in_first_use_order() {
    let out = html(
        "first [^b] then [^a]\n\n[^a]: alpha\n\n[^b]: beta",
        Extensions::FOOTNOTES,
    );
    // `b` is referenced first, so it takes ordinal 1.
    assert!(out.contains("<sup id=\"fnref1\"><a href=\"#fn1\" rel=\"footnote\">1</a></sup> then"));
    assert!(out.contains("<li id=\"fn1\">\n<p>beta"));
    assert!(out.contains("<li id=\"fn2\">\n<p>alpha"));
}

#[test]
fn repeated_footnote_references_stay_literal() {
    let out = html("one [^a] two [^a]\n\n[^a]: note", Extensions::FOOTNOTES);
    assert!(out.contains("two [^a]"));
}

#[test]
fn unknown_footnotes_stay_literal() {
    assert_eq!(
        html("see [^missing]", Extensions::FOOTNOTES),
        "<p>see [^missing]</p>\n"
    );
}

#[test]
fn tables_pad_short_rows() {
    let out = html("| a | b |\n|---|---|\n| only |", Extensions::TABLES);
    assert!(out.contains("<td>only</td>\n<td></td>"));
}

#[test]
fn a_table_needs_its_underline() {
    assert_eq!(
        html("| a | b |\njust text", Extensions::TABLES),
        "<p>| a | b |\njust text</p>\n"
    );
}
