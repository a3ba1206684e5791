use memchr::memchr2;

use crate::buffer::Buffer;
use crate::extensions::Extensions;
use crate::pool::{BufferClass, WorkPool};
use crate::refs::{hash_id, FootnoteList, RefTable};
use crate::render::Render;

use self::block::parse_block;
use self::inline::{build_active_chars, CharAction};

pub(crate) mod block;
pub(crate) mod code_span;
pub(crate) mod emphasis;
pub(crate) mod inline;
pub(crate) mod link;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

pub(crate) const DEFAULT_MAX_NESTING: usize = 16;

/// The Markdown parser. It owns the renderer callback set, the reference and
/// footnote tables collected during pass 1, the active-character dispatch
/// table, and the work-buffer pool that bounds recursion.
///
/// A parser is single-owner and not safe for concurrent use; distinct
/// instances are fully independent. `render` may be called any number of
/// times, each call starting from clean per-document state.
pub struct Parser<R: Render> {
    pub(crate) renderer: R,
    pub(crate) extensions: Extensions,
    pub(crate) active_chars: [CharAction; 256],
    pub(crate) pool: WorkPool,
    pub(crate) refs: RefTable,
    pub(crate) footnotes: FootnoteList,
    /// Indices into `footnotes.notes` in first-use order.
    pub(crate) used_footnotes: Vec<usize>,
    pub(crate) max_nesting: usize,
    /// True while parsing the display text of a link, to suppress nested
    /// autolinking. Restored to its previous value on every return path.
    pub(crate) in_link_body: bool,
}

impl<R: Render> Parser<R> {
    pub fn new(renderer: R, extensions: Extensions) -> Self {
        Self {
            renderer,
            extensions,
            active_chars: build_active_chars(extensions),
            pool: WorkPool::new(),
            refs: RefTable::new(),
            footnotes: FootnoteList::new(),
            used_footnotes: Vec::new(),
            max_nesting: DEFAULT_MAX_NESTING,
            in_link_body: false,
        }
    }

    /// Bound the recursion depth of nested blocks and spans. Subtrees past
    /// the bound are elided from the output rather than reported as errors.
    pub fn with_max_nesting(mut self, max_nesting: usize) -> Self {
        self.max_nesting = max_nesting;
        self
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Render `input` by appending to `out`.
    ///
    /// Pass 1 walks the document line by line, diverting link-reference and
    /// footnote definitions into their tables and normalizing everything else
    /// (tabs expanded, line endings collapsed) into a text buffer. Pass 2
    /// parses that buffer as blocks, then renders any used footnotes, with
    /// the `doc_header`/`doc_footer` callbacks around the whole document.
    pub fn render(&mut self, input: &[u8], out: &mut Buffer) {
        self.refs.clear();
        self.footnotes.clear();
        self.used_footnotes.clear();
        self.in_link_body = false;

        let text = self.prescan(input);

        #[cfg(feature = "debug-tracing")]
        eprintln!(
            "pass 1: {} input bytes -> {} normalized bytes, {} footnote definitions",
            input.len(),
            text.len(),
            self.footnotes.notes.len()
        );

        out.reserve(text.len() + (text.len() >> 1));

        self.renderer.doc_header(out);
        if !text.is_empty() {
            parse_block(self, out, text.as_slice());
        }
        if self.extensions.contains(Extensions::FOOTNOTES) {
            self.render_footnotes(out);
        }
        self.renderer.doc_footer(out);

        self.refs.clear();
        self.footnotes.clear();
        self.used_footnotes.clear();
        self.pool.teardown();
        debug_assert_eq!(
            self.pool.depth(),
            0,
            "work-buffer pool must be balanced after a render"
        );
    }

    /// Pass 1. Returns the normalized text buffer, which is either empty or
    /// ends with a newline.
    fn prescan(&mut self, input: &[u8]) -> Buffer {
        let mut text = Buffer::with_capacity(input.len());
        let size = input.len();
        let footnotes_enabled = self.extensions.contains(Extensions::FOOTNOTES);

        let mut beg = 0;
        if input.starts_with(UTF8_BOM) {
            beg = UTF8_BOM.len();
        }

        while beg < size {
            if footnotes_enabled {
                if let Some(end) = scan_footnote_def(input, beg, &mut self.footnotes) {
                    beg = end;
                    continue;
                }
            }
            if let Some(end) = scan_link_ref(input, beg, &mut self.refs) {
                beg = end;
                continue;
            }

            // An ordinary line: copy it with tabs expanded, then collapse
            // the line ending to a single newline.
            let mut end = match memchr2(b'\n', b'\r', &input[beg..]) {
                Some(index) => beg + index,
                None => size,
            };
            if end > beg {
                expand_tabs(&mut text, &input[beg..end]);
            }
            while end < size && (input[end] == b'\n' || input[end] == b'\r') {
                // One newline per source line; `\r\n` counts once.
                if input[end] == b'\n' || (end + 1 < size && input[end + 1] != b'\n') {
                    text.put_byte(b'\n');
                }
                end += 1;
            }
            beg = end;
        }

        if !text.is_empty() && !text.ends_with(b"\n") {
            text.put_byte(b'\n');
        }
        text
    }

    /// Render every used footnote, in first-use order, as a trailing block.
    fn render_footnotes(&mut self, out: &mut Buffer) {
        if self.used_footnotes.is_empty() {
            return;
        }
        let mut work = self.pool.acquire(BufferClass::Block);
        for position in 0..self.used_footnotes.len() {
            let note_index = self.used_footnotes[position];
            let contents = std::mem::take(&mut self.footnotes.notes[note_index].contents);
            let num = self.footnotes.notes[note_index].num;

            let mut def = self.pool.acquire(BufferClass::Span);
            parse_block(self, &mut def, contents.as_slice());
            self.renderer.footnote_def(&mut work, def.as_slice(), num);
            self.pool.release(BufferClass::Span, def);
        }
        self.renderer.footnotes(out, work.as_slice());
        self.pool.release(BufferClass::Block, work);
    }

    /// True when another recursive parse would exceed the nesting bound.
    #[inline]
    pub(crate) fn nesting_exceeded(&self) -> bool {
        self.pool.depth() > self.max_nesting
    }
}

/// Copy `line` (which contains no newline) into `ob` with tabs expanded to
/// the next multiple-of-4 column.
fn expand_tabs(ob: &mut Buffer, line: &[u8]) {
    let mut i = 0;
    let mut column = 0;
    while i < line.len() {
        let org = i;
        while i < line.len() && line[i] != b'\t' {
            i += 1;
            column += 1;
        }
        if i > org {
            ob.put(&line[org..i]);
        }
        if i >= line.len() {
            break;
        }
        loop {
            ob.put_byte(b' ');
            column += 1;
            if column % 4 == 0 {
                break;
            }
        }
        i += 1;
    }
}

/// Copy `src` into `ob` with backslash escapes resolved. A trailing lone
/// backslash is dropped.
pub(crate) fn unescape_text(ob: &mut Buffer, src: &[u8]) {
    let mut i = 0;
    while i < src.len() {
        let org = i;
        while i < src.len() && src[i] != b'\\' {
            i += 1;
        }
        if i > org {
            ob.put(&src[org..i]);
        }
        if i + 1 >= src.len() {
            break;
        }
        ob.put_byte(src[i + 1]);
        i += 2;
    }
}

/// Count up to three optional leading spaces at `beg`; a fourth means the
/// line is indented code and cannot open a definition.
fn leading_spaces(data: &[u8], beg: usize) -> Option<usize> {
    let mut i = 0;
    if data[beg] == b' ' {
        i = 1;
        if data[beg + 1] == b' ' {
            i = 2;
            if data[beg + 2] == b' ' {
                i = 3;
                if data[beg + 3] == b' ' {
                    return None;
                }
            }
        }
    }
    Some(i)
}

/// Try to parse a link-reference definition starting at `beg`:
/// `[id]: <link> "title"`, where the title may sit on its own line. On
/// success the entry is added to `refs` and the offset of the line end is
/// returned; the caller resumes there.
fn scan_link_ref(data: &[u8], beg: usize, refs: &mut RefTable) -> Option<usize> {
    let end = data.len();
    if beg + 3 >= end {
        return None;
    }
    let mut i = beg + leading_spaces(data, beg)?;

    // Id part: anything but a newline between brackets.
    if data[i] != b'[' {
        return None;
    }
    i += 1;
    let id_offset = i;
    while i < end && data[i] != b'\n' && data[i] != b'\r' && data[i] != b']' {
        i += 1;
    }
    if i >= end || data[i] != b']' {
        return None;
    }
    let id_end = i;

    // Spacer: colon, spaces, at most one newline, spaces.
    i += 1;
    if i >= end || data[i] != b':' {
        return None;
    }
    i += 1;
    while i < end && data[i] == b' ' {
        i += 1;
    }
    if i < end && (data[i] == b'\n' || data[i] == b'\r') {
        i += 1;
        if i < end && data[i] == b'\n' && data[i - 1] == b'\r' {
            i += 1;
        }
    }
    while i < end && data[i] == b' ' {
        i += 1;
    }
    if i >= end {
        return None;
    }

    // Link: a whitespace-free sequence, optionally between angle brackets.
    if data[i] == b'<' {
        i += 1;
    }
    let link_offset = i;
    while i < end && data[i] != b' ' && data[i] != b'\n' && data[i] != b'\r' {
        i += 1;
    }
    let link_end = if data[i - 1] == b'>' { i - 1 } else { i };

    // Only whitespace or an opening title delimiter may follow on the line.
    while i < end && data[i] == b' ' {
        i += 1;
    }
    if i < end
        && data[i] != b'\n'
        && data[i] != b'\r'
        && data[i] != b'\''
        && data[i] != b'"'
        && data[i] != b'('
    {
        return None;
    }

    let mut line_end = 0;
    if i >= end || data[i] == b'\r' || data[i] == b'\n' {
        line_end = i;
    }
    if i + 1 < end && data[i] == b'\r' && data[i + 1] == b'\n' {
        line_end = i + 1;
    }
    if line_end > 0 {
        i = line_end + 1;
        while i < end && data[i] == b' ' {
            i += 1;
        }
    }

    // Optional title, ending on its own line.
    let mut title_offset = 0;
    let mut title_end = 0;
    if i + 1 < end && (data[i] == b'\'' || data[i] == b'"' || data[i] == b'(') {
        i += 1;
        title_offset = i;
        while i < end && data[i] != b'\n' && data[i] != b'\r' {
            i += 1;
        }
        title_end = if i + 1 < end && data[i] == b'\r' && data[i + 1] == b'\n' {
            i + 1
        } else {
            i
        };
        // Step back over trailing spaces to the closing delimiter.
        let mut back = i - 1;
        while back > title_offset && data[back] == b' ' {
            back -= 1;
        }
        if back > title_offset && matches!(data[back], b'\'' | b'"' | b')') {
            line_end = title_end;
            title_end = back;
        }
    }

    // Trailing garbage or an empty link invalidates the whole definition.
    if line_end == 0 || link_end == link_offset {
        return None;
    }

    refs.add(
        hash_id(&data[id_offset..id_end]),
        &data[link_offset..link_end],
        if title_end > title_offset {
            &data[title_offset..title_end]
        } else {
            &[]
        },
    );
    Some(line_end)
}

/// Try to parse a footnote definition starting at `beg`: `[^id]:` followed
/// by indented content lines. On success the definition is appended to
/// `notes` and the offset where scanning should resume is returned.
fn scan_footnote_def(data: &[u8], beg: usize, notes: &mut FootnoteList) -> Option<usize> {
    let end = data.len();
    if beg + 3 >= end {
        return None;
    }
    let mut i = beg + leading_spaces(data, beg)?;

    // Id part: a caret followed by anything between brackets.
    if data[i] != b'[' {
        return None;
    }
    i += 1;
    if i >= end || data[i] != b'^' {
        return None;
    }
    i += 1;
    let id_offset = i;
    while i < end && data[i] != b'\n' && data[i] != b'\r' && data[i] != b']' {
        i += 1;
    }
    if i >= end || data[i] != b']' {
        return None;
    }
    let id_end = i;

    i += 1;
    if i >= end || data[i] != b':' {
        return None;
    }
    i += 1;

    // The body: lines joined like a list item, requiring one space of
    // indentation to continue. Blank lines inside the body stay blank lines;
    // a non-blank unindented line ends the definition.
    let mut contents = Buffer::with_capacity(64);
    let mut start = i;
    let mut in_empty = false;
    while i < end {
        while i < end && data[i] != b'\n' && data[i] != b'\r' {
            i += 1;
        }

        if block::is_empty(&data[start..i]) > 0 {
            in_empty = true;
            if i < end {
                i += 1;
                if i < end && data[i] == b'\n' && data[i - 1] == b'\r' {
                    i += 1;
                }
            }
            start = i;
            continue;
        }

        let mut ind = 0;
        while ind < 4 && start + ind < end && data[start + ind] == b' ' {
            ind += 1;
        }
        if ind == 0 {
            break;
        }
        if in_empty {
            contents.put_byte(b'\n');
        }
        in_empty = false;

        contents.put(&data[start + ind..i]);
        if i < end {
            contents.put_byte(b'\n');
            i += 1;
            if i < end && data[i] == b'\n' && data[i - 1] == b'\r' {
                i += 1;
            }
        }
        start = i;
    }

    notes.add(hash_id(&data[id_offset..id_end]), contents);
    Some(start)
}
