//! The stock HTML renderer: an implementation of the callback set that turns
//! the parser's events into HTML, with a small flag surface for the usual
//! output variations.

use std::fmt::Write;

use bitflags::bitflags;

use crate::autolink::is_safe_link;
use crate::buffer::Buffer;
use crate::render::{AutolinkKind, ListFlags, Render, TableFlags};

pub mod escape;

use self::escape::{escape_href, escape_html};

bitflags! {
    /// Output options for [`Html`].
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct HtmlFlags: u32 {
        /// Drop raw HTML blocks and inline tags from the output.
        const SKIP_HTML = 1 << 0;
        /// Render every newline inside a paragraph as a break.
        const HARD_WRAP = 1 << 1;
        /// Emit self-closing forms (`<hr/>`, `<br/>`, `<img .../>`).
        const USE_XHTML = 1 << 2;
        /// Refuse link destinations that are not plainly safe URIs.
        const SAFE_LINKS = 1 << 3;
    }
}

/// A renderer producing HTML. Stateless apart from its flags, so one value
/// can be reused across documents and parsers.
pub struct Html {
    flags: HtmlFlags,
}

impl Html {
    pub fn new(flags: HtmlFlags) -> Self {
        Self { flags }
    }

    fn put_hrule(&self, ob: &mut Buffer) {
        if self.flags.contains(HtmlFlags::USE_XHTML) {
            ob.put_str("<hr/>\n");
        } else {
            ob.put_str("<hr>\n");
        }
    }

    fn put_linebreak(&self, ob: &mut Buffer) {
        if self.flags.contains(HtmlFlags::USE_XHTML) {
            ob.put_str("<br/>\n");
        } else {
            ob.put_str("<br>\n");
        }
    }

    /// Block-level output is separated by single newlines.
    fn block_gap(&self, ob: &mut Buffer) {
        if !ob.is_empty() {
            ob.put_byte(b'\n');
        }
    }

    fn link_is_rejected(&self, link: &[u8]) -> bool {
        self.flags.contains(HtmlFlags::SAFE_LINKS) && !is_safe_link(link)
    }
}

const HEADER_OPEN_TAGS: [&str; 6] = ["<h1>", "<h2>", "<h3>", "<h4>", "<h5>", "<h6>"];
const HEADER_CLOSE_TAGS: [&str; 6] = ["</h1>\n", "</h2>\n", "</h3>\n", "</h4>\n", "</h5>\n", "</h6>\n"];

impl Render for Html {
    fn blockcode(&mut self, ob: &mut Buffer, text: &[u8], info: &[u8]) {
        self.block_gap(ob);
        if !info.is_empty() {
            ob.put_str("<pre><code class=\"language-");
            escape_html(ob, info);
            ob.put_str("\">");
        } else {
            ob.put_str("<pre><code>");
        }
        escape_html(ob, text);
        ob.put_str("</code></pre>\n");
    }

    fn blockquote(&mut self, ob: &mut Buffer, content: &[u8]) {
        self.block_gap(ob);
        ob.put_str("<blockquote>\n");
        ob.put(content);
        ob.put_str("</blockquote>\n");
    }

    fn blockhtml(&mut self, ob: &mut Buffer, text: &[u8]) {
        if self.flags.contains(HtmlFlags::SKIP_HTML) {
            return;
        }
        // Trim the blank lines the block parser consumed around the tag.
        let mut end = text.len();
        while end > 0 && text[end - 1] == b'\n' {
            end -= 1;
        }
        let mut start = 0;
        while start < end && text[start] == b'\n' {
            start += 1;
        }
        if start >= end {
            return;
        }
        self.block_gap(ob);
        ob.put(&text[start..end]);
        ob.put_byte(b'\n');
    }

    fn header(&mut self, ob: &mut Buffer, content: &[u8], level: u32) {
        self.block_gap(ob);
        let level = level.clamp(1, 6) as usize;
        ob.put_str(HEADER_OPEN_TAGS[level - 1]);
        ob.put(content);
        ob.put_str(HEADER_CLOSE_TAGS[level - 1]);
    }

    fn hrule(&mut self, ob: &mut Buffer) {
        self.block_gap(ob);
        self.put_hrule(ob);
    }

    fn list(&mut self, ob: &mut Buffer, content: &[u8], flags: ListFlags) {
        self.block_gap(ob);
        let ordered = flags.contains(ListFlags::ORDERED);
        ob.put_str(if ordered { "<ol>\n" } else { "<ul>\n" });
        ob.put(content);
        ob.put_str(if ordered { "</ol>\n" } else { "</ul>\n" });
    }

    fn listitem(&mut self, ob: &mut Buffer, content: &[u8], _flags: ListFlags) {
        ob.put_str("<li>");
        let mut end = content.len();
        while end > 0 && content[end - 1] == b'\n' {
            end -= 1;
        }
        ob.put(&content[..end]);
        ob.put_str("</li>\n");
    }

    fn paragraph(&mut self, ob: &mut Buffer, content: &[u8]) {
        self.block_gap(ob);
        let mut i = 0;
        while i < content.len() && (content[i] == b' ' || content[i] == b'\n') {
            i += 1;
        }
        if i == content.len() {
            return;
        }
        ob.put_str("<p>");
        if self.flags.contains(HtmlFlags::HARD_WRAP) {
            while i < content.len() {
                let org = i;
                while i < content.len() && content[i] != b'\n' {
                    i += 1;
                }
                if i > org {
                    ob.put(&content[org..i]);
                }
                // No break after the final newline of the paragraph.
                if i >= content.len() - 1 {
                    break;
                }
                self.put_linebreak(ob);
                i += 1;
            }
        } else {
            ob.put(&content[i..]);
        }
        ob.put_str("</p>\n");
    }

    fn table(&mut self, ob: &mut Buffer, header: &[u8], body: &[u8]) {
        self.block_gap(ob);
        ob.put_str("<table><thead>\n");
        ob.put(header);
        ob.put_str("</thead><tbody>\n");
        ob.put(body);
        ob.put_str("</tbody></table>\n");
    }

    fn table_row(&mut self, ob: &mut Buffer, content: &[u8]) {
        ob.put_str("<tr>\n");
        ob.put(content);
        ob.put_str("</tr>\n");
    }

    fn table_cell(&mut self, ob: &mut Buffer, content: &[u8], flags: TableFlags) {
        let header = flags.contains(TableFlags::HEADER);
        ob.put_str(if header { "<th" } else { "<td" });
        if flags.contains(TableFlags::ALIGN_CENTER) {
            ob.put_str(" align=\"center\">");
        } else if flags.contains(TableFlags::ALIGN_LEFT) {
            ob.put_str(" align=\"left\">");
        } else if flags.contains(TableFlags::ALIGN_RIGHT) {
            ob.put_str(" align=\"right\">");
        } else {
            ob.put_byte(b'>');
        }
        ob.put(content);
        ob.put_str(if header { "</th>\n" } else { "</td>\n" });
    }

    fn footnotes(&mut self, ob: &mut Buffer, content: &[u8]) {
        self.block_gap(ob);
        ob.put_str("<div class=\"footnotes\">\n");
        self.put_hrule(ob);
        ob.put_str("<ol>\n");
        ob.put(content);
        ob.put_str("\n</ol>\n</div>\n");
    }

    fn footnote_def(&mut self, ob: &mut Buffer, content: &[u8], num: u32) {
        // The backlink goes at the end of the first paragraph block.
        let mut before_close = None;
        let mut i = 0;
        while i + 3 < content.len() {
            if content[i] == b'<'
                && content[i + 1] == b'/'
                && content[i + 2] == b'p'
                && content[i + 3] == b'>'
            {
                before_close = Some(i);
                break;
            }
            i += 1;
        }

        let _ = write!(ob, "\n<li id=\"fn{num}\">\n");
        match before_close {
            Some(split) => {
                ob.put(&content[..split]);
                let _ = write!(ob, "&nbsp;<a href=\"#fnref{num}\" rev=\"footnote\">&#8617;</a>");
                ob.put(&content[split..]);
            }
            None => ob.put(content),
        }
        ob.put_str("</li>\n");
    }

    fn autolink(&mut self, ob: &mut Buffer, link: &[u8], kind: AutolinkKind) -> bool {
        if link.is_empty() {
            return false;
        }
        if kind != AutolinkKind::Email && self.link_is_rejected(link) {
            return false;
        }

        ob.put_str("<a href=\"");
        if kind == AutolinkKind::Email {
            ob.put_str("mailto:");
        }
        escape_href(ob, link);
        ob.put_str("\">");
        // An explicit `mailto:` prefix is noise as display text.
        if link.starts_with(b"mailto:") {
            escape_html(ob, &link[7..]);
        } else {
            escape_html(ob, link);
        }
        ob.put_str("</a>");
        true
    }

    fn codespan(&mut self, ob: &mut Buffer, text: &[u8]) -> bool {
        ob.put_str("<code>");
        escape_html(ob, text);
        ob.put_str("</code>");
        true
    }

    fn emphasis(&mut self, ob: &mut Buffer, content: &[u8]) -> bool {
        if content.is_empty() {
            return false;
        }
        ob.put_str("<em>");
        ob.put(content);
        ob.put_str("</em>");
        true
    }

    fn double_emphasis(&mut self, ob: &mut Buffer, content: &[u8]) -> bool {
        if content.is_empty() {
            return false;
        }
        ob.put_str("<strong>");
        ob.put(content);
        ob.put_str("</strong>");
        true
    }

    fn triple_emphasis(&mut self, ob: &mut Buffer, content: &[u8]) -> bool {
        if content.is_empty() {
            return false;
        }
        ob.put_str("<strong><em>");
        ob.put(content);
        ob.put_str("</em></strong>");
        true
    }

    fn underline(&mut self, ob: &mut Buffer, content: &[u8]) -> bool {
        if content.is_empty() {
            return false;
        }
        ob.put_str("<u>");
        ob.put(content);
        ob.put_str("</u>");
        true
    }

    fn highlight(&mut self, ob: &mut Buffer, content: &[u8]) -> bool {
        if content.is_empty() {
            return false;
        }
        ob.put_str("<mark>");
        ob.put(content);
        ob.put_str("</mark>");
        true
    }

    fn strikethrough(&mut self, ob: &mut Buffer, content: &[u8]) -> bool {
        if content.is_empty() {
            return false;
        }
        ob.put_str("<del>");
        ob.put(content);
        ob.put_str("</del>");
        true
    }

    fn quote(&mut self, ob: &mut Buffer, content: &[u8]) -> bool {
        if content.is_empty() {
            return false;
        }
        ob.put_str("<q>");
        escape_html(ob, content);
        ob.put_str("</q>");
        true
    }

    fn superscript(&mut self, ob: &mut Buffer, content: &[u8]) -> bool {
        if content.is_empty() {
            return false;
        }
        ob.put_str("<sup>");
        ob.put(content);
        ob.put_str("</sup>");
        true
    }

    fn image(&mut self, ob: &mut Buffer, link: &[u8], title: &[u8], alt: &[u8]) -> bool {
        if link.is_empty() || self.link_is_rejected(link) {
            return false;
        }
        ob.put_str("<img src=\"");
        escape_href(ob, link);
        ob.put_str("\" alt=\"");
        escape_html(ob, alt);
        if !title.is_empty() {
            ob.put_str("\" title=\"");
            escape_html(ob, title);
        }
        ob.put_str(if self.flags.contains(HtmlFlags::USE_XHTML) {
            "\"/>"
        } else {
            "\">"
        });
        true
    }

    fn link(&mut self, ob: &mut Buffer, link: &[u8], title: &[u8], content: &[u8]) -> bool {
        if self.link_is_rejected(link) {
            return false;
        }
        ob.put_str("<a href=\"");
        escape_href(ob, link);
        if !title.is_empty() {
            ob.put_str("\" title=\"");
            escape_html(ob, title);
        }
        ob.put_str("\">");
        ob.put(content);
        ob.put_str("</a>");
        true
    }

    fn linebreak(&mut self, ob: &mut Buffer) -> bool {
        self.put_linebreak(ob);
        true
    }

    fn footnote_ref(&mut self, ob: &mut Buffer, num: u32) -> bool {
        let _ = write!(
            ob,
            "<sup id=\"fnref{num}\"><a href=\"#fn{num}\" rel=\"footnote\">{num}</a></sup>"
        );
        true
    }

    fn raw_html_tag(&mut self, ob: &mut Buffer, tag: &[u8]) -> bool {
        if self.flags.contains(HtmlFlags::SKIP_HTML) {
            // Consumed, but produces nothing.
            return true;
        }
        ob.put(tag);
        true
    }

    fn entity(&mut self, ob: &mut Buffer, text: &[u8]) {
        ob.put(text);
    }

    fn normal_text(&mut self, ob: &mut Buffer, text: &[u8]) {
        escape_html(ob, text);
    }
}
