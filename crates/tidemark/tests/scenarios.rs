//! End-to-end rendering scenarios through the stock HTML renderer, plus the
//! boundary behaviors every input must satisfy.

use tidemark::{to_html, Buffer, Extensions, Html, HtmlFlags, Parser, Render};

fn html(input: &str, extensions: Extensions) -> String {
    to_html(input, extensions, HtmlFlags::empty())
}

#[test]
fn emphasis_in_a_paragraph() {
    assert_eq!(
        html("hello *world*", Extensions::empty()),
        "<p>hello <em>world</em></p>\n"
    );
}

#[test]
fn code_span_with_embedded_backticks() {
    // The closing run must be exactly as long as the opener, so a double
    // backtick run stays inside the span.
    assert_eq!(
        html("`a`` b`", Extensions::empty()),
        "<p><code>a`` b</code></p>\n"
    );
}

#[test]
fn reference_link_with_title() {
    assert_eq!(
        html("[x][y]\n\n[y]: http://e \"t\"", Extensions::empty()),
        "<p><a href=\"http://e\" title=\"t\">x</a></p>\n"
    );
}

#[test]
fn fenced_code_block_with_info() {
    assert_eq!(
        html("```rust\nfn main(){}\n```", Extensions::FENCED_CODE),
        "<pre><code class=\"language-rust\">fn main(){}\n</code></pre>\n"
    );
}

#[test]
fn two_column_table_with_alignment() {
    assert_eq!(
        html("| a | b |\n|---|:-:|\n| 1 | 2 |", Extensions::TABLES),
        "<table><thead>\n\
         <tr>\n<th>a</th>\n<th align=\"center\">b</th>\n</tr>\n\
         </thead><tbody>\n\
         <tr>\n<td>1</td>\n<td align=\"center\">2</td>\n</tr>\n\
         </tbody></table>\n"
    );
}

#[test]
fn footnote_reference_and_definition() {
    assert_eq!(
        html("see [^a]\n\n[^a]: note", Extensions::FOOTNOTES),
        "<p>see <sup id=\"fnref1\"><a href=\"#fn1\" rel=\"footnote\">1</a></sup></p>\n\
         \n\
         <div class=\"footnotes\">\n\
         <hr>\n\
         <ol>\n\
         \n\
         <li id=\"fn1\">\n\
         <p>note&nbsp;<a href=\"#fnref1\" rev=\"footnote\">&#8617;</a></p>\n\
         </li>\n\
         \n\
         </ol>\n\
         </div>\n"
    );
}

// Boundary behaviors.

#[test]
fn empty_document_renders_nothing() {
    assert_eq!(html("", Extensions::empty()), "");
}

#[test]
fn bom_only_document_renders_nothing() {
    assert_eq!(html("\u{FEFF}", Extensions::empty()), "");
}

#[test]
fn document_of_only_definitions_has_an_empty_body() {
    assert_eq!(html("[a]: /x\n[b]: /y\n", Extensions::empty()), "");
}

#[test]
fn reference_resolution_is_case_insensitive() {
    assert_eq!(
        html("[x][FOO]\n\n[foo]: /url", Extensions::empty()),
        "<p><a href=\"/url\">x</a></p>\n"
    );
}

#[test]
fn escaped_bytes_render_literally() {
    assert_eq!(
        html("\\*not em\\*", Extensions::empty()),
        "<p>*not em*</p>\n"
    );
    assert_eq!(html("a\\\\b", Extensions::empty()), "<p>a\\b</p>\n");
}

#[test]
fn nesting_past_the_bound_is_elided() {
    let mut parser =
        Parser::new(Html::new(HtmlFlags::empty()), Extensions::empty()).with_max_nesting(2);
    let mut out = Buffer::new();
    parser.render(b"> > > deep", &mut out);
    let rendered = String::from_utf8(out.as_slice().to_vec()).unwrap();
    // The surrounding quotes render; the over-deep subtree produces nothing.
    assert!(rendered.contains("<blockquote>"));
    assert!(!rendered.contains("deep"));
}

#[test]
fn doc_header_and_footer_fire_even_on_empty_input() {
    struct Wrapped;
    impl Render for Wrapped {
        fn doc_header(&mut self, ob: &mut Buffer) {
            ob.put_str("[header]");
        }
        fn doc_footer(&mut self, ob: &mut Buffer) {
            ob.put_str("[footer]");
        }
    }

    let mut parser = Parser::new(Wrapped, Extensions::empty());
    let mut out = Buffer::new();
    parser.render(b"", &mut out);
    assert_eq!(out.as_slice(), b"[header][footer]");
}

// The fall-through model: a renderer that declines a construct gets the
// source bytes back as literal text.

struct Passthrough;

impl Render for Passthrough {
    fn paragraph(&mut self, ob: &mut Buffer, content: &[u8]) {
        ob.put(content);
    }
}

fn passthrough(input: &str) -> String {
    let mut parser = Parser::new(Passthrough, Extensions::empty());
    let mut out = Buffer::new();
    parser.render(input.as_bytes(), &mut out);
    String::from_utf8(out.as_slice().to_vec()).unwrap()
}

#[test]
fn inline_text_without_active_characters_is_the_identity() {
    assert_eq!(
        passthrough("just words, nothing active."),
        "just words, nothing active."
    );
}

#[test]
fn declined_constructs_fall_back_to_literal_text() {
    assert_eq!(passthrough("`code`"), "`code`");
    assert_eq!(passthrough("some *emphasis* here"), "some *emphasis* here");
    assert_eq!(passthrough("[text](/link)"), "[text](/link)");
}
