use memchr::memchr;

use crate::buffer::Buffer;
use crate::byte_lookup::is_space;
use crate::extensions::Extensions;
use crate::html_tags::find_block_tag;
use crate::pool::BufferClass;
use crate::render::{ListFlags, Render, TableFlags};

use super::inline::parse_inline;
use super::Parser;

/// Parse every block in `data`, appending the rendering of each to `ob`.
/// `data` is normalized pass-1 text: no tabs, no carriage returns, and a
/// trailing newline.
pub(crate) fn parse_block<R: Render>(doc: &mut Parser<R>, ob: &mut Buffer, data: &[u8]) {
    if doc.nesting_exceeded() {
        return;
    }

    let size = data.len();
    let mut beg = 0;
    while beg < size {
        let txt = &data[beg..];

        if is_atx_header(doc, txt) {
            beg += parse_atx_header(doc, ob, txt);
            continue;
        }
        if txt[0] == b'<' {
            let taken = parse_htmlblock(doc, ob, txt, true);
            if taken > 0 {
                beg += taken;
                continue;
            }
        }
        let blank = is_empty(txt);
        if blank > 0 {
            beg += blank;
            continue;
        }
        if is_hrule(txt) {
            doc.renderer.hrule(ob);
            beg += memchr(b'\n', txt).map_or(txt.len(), |index| index + 1);
            continue;
        }
        if doc.extensions.contains(Extensions::FENCED_CODE) {
            let taken = parse_fencedcode(doc, ob, txt);
            if taken > 0 {
                beg += taken;
                continue;
            }
        }
        if doc.extensions.contains(Extensions::TABLES) {
            let taken = parse_table(doc, ob, txt);
            if taken > 0 {
                beg += taken;
                continue;
            }
        }
        if prefix_quote(txt) > 0 {
            beg += parse_blockquote(doc, ob, txt);
            continue;
        }
        if !doc.extensions.contains(Extensions::DISABLE_INDENTED_CODE) && prefix_code(txt) {
            beg += parse_blockcode(doc, ob, txt);
            continue;
        }
        if prefix_uli(txt) > 0 {
            beg += parse_list(doc, ob, txt, ListFlags::empty());
            continue;
        }
        if prefix_oli(txt) > 0 {
            beg += parse_list(doc, ob, txt, ListFlags::ORDERED);
            continue;
        }
        beg += parse_paragraph(doc, ob, txt);
    }
}

/// Returns the length of the line (newline included) when it holds nothing
/// but spaces, 0 otherwise.
pub(crate) fn is_empty(data: &[u8]) -> usize {
    let mut i = 0;
    while i < data.len() && data[i] != b'\n' {
        if data[i] != b' ' {
            return 0;
        }
        i += 1;
    }
    i + 1
}

/// Three or more of the same `*`, `-` or `_`, with only spaces between.
fn is_hrule(data: &[u8]) -> bool {
    let size = data.len();
    if size < 3 {
        return false;
    }
    let mut i = 0;
    if data[0] == b' ' {
        i += 1;
        if data[1] == b' ' {
            i += 1;
            if data[2] == b' ' {
                i += 1;
            }
        }
    }
    if i + 2 >= size || !matches!(data[i], b'*' | b'-' | b'_') {
        return false;
    }
    let marker = data[i];
    let mut count = 0;
    while i < size && data[i] != b'\n' {
        if data[i] == marker {
            count += 1;
        } else if data[i] != b' ' {
            return false;
        }
        i += 1;
    }
    count >= 3
}

/// A setext underline: a run of `=` (level 1) or `-` (level 2) alone on the
/// line. Returns the header level, or 0.
fn is_headerline(data: &[u8]) -> u32 {
    let level = match data.first() {
        Some(b'=') => 1,
        Some(b'-') => 2,
        _ => return 0,
    };
    let marker = data[0];
    let mut i = 1;
    while i < data.len() && data[i] == marker {
        i += 1;
    }
    while i < data.len() && data[i] == b' ' {
        i += 1;
    }
    if i >= data.len() || data[i] == b'\n' {
        level
    } else {
        0
    }
}

fn is_next_headerline(data: &[u8]) -> bool {
    let mut i = 0;
    while i < data.len() && data[i] != b'\n' {
        i += 1;
    }
    i += 1;
    if i >= data.len() {
        return false;
    }
    is_headerline(&data[i..]) != 0
}

fn is_atx_header<R: Render>(doc: &Parser<R>, data: &[u8]) -> bool {
    if data.first() != Some(&b'#') {
        return false;
    }
    if doc.extensions.contains(Extensions::SPACE_HEADERS) {
        let mut level = 0;
        while level < data.len() && level < 6 && data[level] == b'#' {
            level += 1;
        }
        if level < data.len() && data[level] != b' ' {
            return false;
        }
    }
    true
}

/// A blockquote prefix: up to 3 spaces, `>`, one optional space. Returns the
/// prefix length, or 0.
fn prefix_quote(data: &[u8]) -> usize {
    let size = data.len();
    let mut i = 0;
    while i < 3 && i < size && data[i] == b' ' {
        i += 1;
    }
    if i < size && data[i] == b'>' {
        if i + 1 < size && data[i + 1] == b' ' {
            i + 2
        } else {
            i + 1
        }
    } else {
        0
    }
}

/// Four leading spaces open an indented code line.
fn prefix_code(data: &[u8]) -> bool {
    data.len() > 3 && data[..4].iter().all(|&byte| byte == b' ')
}

/// An unordered-list prefix: up to 3 spaces, a `*`, `+` or `-` marker, one
/// space. Returns the prefix length, or 0.
fn prefix_uli(data: &[u8]) -> usize {
    let size = data.len();
    let mut i = 0;
    while i < 3 && i < size && data[i] == b' ' {
        i += 1;
    }
    if i + 1 >= size || !matches!(data[i], b'*' | b'+' | b'-') || data[i + 1] != b' ' {
        return 0;
    }
    if is_next_headerline(&data[i..]) {
        return 0;
    }
    i + 2
}

/// An ordered-list prefix: up to 3 spaces, digits, `.`, one space. Returns
/// the prefix length, or 0.
fn prefix_oli(data: &[u8]) -> usize {
    let size = data.len();
    let mut i = 0;
    while i < 3 && i < size && data[i] == b' ' {
        i += 1;
    }
    if i >= size || !data[i].is_ascii_digit() {
        return 0;
    }
    while i < size && data[i].is_ascii_digit() {
        i += 1;
    }
    if i + 1 >= size || data[i] != b'.' || data[i + 1] != b' ' {
        return 0;
    }
    if is_next_headerline(&data[i..]) {
        return 0;
    }
    i + 2
}

fn parse_atx_header<R: Render>(doc: &mut Parser<R>, ob: &mut Buffer, data: &[u8]) -> usize {
    let size = data.len();
    let mut level = 0;
    while level < size && level < 6 && data[level] == b'#' {
        level += 1;
    }
    let mut i = level;
    while i < size && data[i] == b' ' {
        i += 1;
    }
    let mut end = i;
    while end < size && data[end] != b'\n' {
        end += 1;
    }
    let skip = end;

    // Strip the optional closing hash run and surrounding spaces.
    while end > 0 && data[end - 1] == b'#' {
        end -= 1;
    }
    while end > 0 && data[end - 1] == b' ' {
        end -= 1;
    }

    if end > i {
        let mut work = doc.pool.acquire(BufferClass::Span);
        parse_inline(doc, &mut work, &data[i..end]);
        doc.renderer.header(ob, work.as_slice(), level as u32);
        doc.pool.release(BufferClass::Span, work);
    }
    skip
}

/// The geometry of a code-fence line.
struct Fence {
    /// Offset just past the fence line's newline.
    end: usize,
    width: usize,
    marker: u8,
    info: (usize, usize),
}

impl Fence {
    fn is_bare(&self) -> bool {
        self.info.0 == self.info.1
    }
}

/// Check whether the line opens (or closes) a code fence: up to 3 spaces,
/// three or more `~` or backticks, an optional info string which is either a
/// bare word or a `{...}` group, and nothing else.
fn scan_codefence(data: &[u8]) -> Option<Fence> {
    let size = data.len();
    if size < 3 {
        return None;
    }
    let mut i = 0;
    if data[0] == b' ' {
        i += 1;
        if data[1] == b' ' {
            i += 1;
            if data[2] == b' ' {
                i += 1;
            }
        }
    }
    if i + 2 >= size || !matches!(data[i], b'~' | b'`') {
        return None;
    }
    let marker = data[i];
    let mut width = 0;
    while i < size && data[i] == marker {
        width += 1;
        i += 1;
    }
    if width < 3 {
        return None;
    }

    while i < size && data[i] == b' ' {
        i += 1;
    }
    let mut info_start = i;
    let mut info_end;
    if i < size && data[i] == b'{' {
        i += 1;
        info_start = i;
        while i < size && data[i] != b'}' && data[i] != b'\n' {
            i += 1;
        }
        if i >= size || data[i] != b'}' {
            return None;
        }
        info_end = i;
        // Trim whitespace just inside the braces.
        while info_start < info_end && is_space(data[info_start]) {
            info_start += 1;
        }
        while info_end > info_start && is_space(data[info_end - 1]) {
            info_end -= 1;
        }
        i += 1;
    } else {
        while i < size && !is_space(data[i]) {
            i += 1;
        }
        info_end = i;
    }

    // Nothing else may follow on the line.
    while i < size && data[i] != b'\n' {
        if data[i] != b' ' {
            return None;
        }
        i += 1;
    }

    Some(Fence {
        end: if i < size { i + 1 } else { size },
        width,
        marker,
        info: (info_start, info_end),
    })
}

fn parse_fencedcode<R: Render>(doc: &mut Parser<R>, ob: &mut Buffer, data: &[u8]) -> usize {
    let Some(fence) = scan_codefence(data) else {
        return 0;
    };

    let size = data.len();
    let mut work = doc.pool.acquire(BufferClass::Block);
    let mut beg = fence.end;
    while beg < size {
        if let Some(close) = scan_codefence(&data[beg..]) {
            if close.marker == fence.marker && close.width >= fence.width && close.is_bare() {
                beg += close.end;
                break;
            }
        }
        let mut end = beg + 1;
        while end < size && data[end - 1] != b'\n' {
            end += 1;
        }
        if is_empty(&data[beg..end]) > 0 {
            work.put_byte(b'\n');
        } else {
            work.put(&data[beg..end]);
        }
        beg = end;
    }
    if !work.is_empty() && !work.ends_with(b"\n") {
        work.put_byte(b'\n');
    }

    doc.renderer
        .blockcode(ob, work.as_slice(), &data[fence.info.0..fence.info.1]);
    doc.pool.release(BufferClass::Block, work);
    beg
}

fn parse_blockcode<R: Render>(doc: &mut Parser<R>, ob: &mut Buffer, data: &[u8]) -> usize {
    let size = data.len();
    let mut work = doc.pool.acquire(BufferClass::Block);

    let mut beg = 0;
    while beg < size {
        let mut end = beg + 1;
        while end < size && data[end - 1] != b'\n' {
            end += 1;
        }
        let line = &data[beg..end];
        if prefix_code(line) {
            beg += 4;
        } else if is_empty(line) == 0 {
            // A non-empty, non-indented line closes the block.
            break;
        }
        if beg < end {
            if is_empty(&data[beg..end]) > 0 {
                work.put_byte(b'\n');
            } else {
                work.put(&data[beg..end]);
            }
        }
        beg = end;
    }

    while work.ends_with(b"\n") {
        let len = work.len();
        work.truncate(len - 1);
    }
    work.put_byte(b'\n');

    doc.renderer.blockcode(ob, work.as_slice(), &[]);
    doc.pool.release(BufferClass::Block, work);
    beg
}

fn parse_blockquote<R: Render>(doc: &mut Parser<R>, ob: &mut Buffer, data: &[u8]) -> usize {
    let size = data.len();
    let mut out = doc.pool.acquire(BufferClass::Block);
    // The quoted body with prefixes stripped, reassembled before the
    // recursive parse.
    let mut body = Buffer::with_capacity(size);

    let mut beg = 0;
    let mut end = 0;
    while beg < size {
        end = beg + 1;
        while end < size && data[end - 1] != b'\n' {
            end += 1;
        }
        let pre = prefix_quote(&data[beg..end]);
        if pre > 0 {
            beg += pre;
        } else if is_empty(&data[beg..end]) > 0
            && (end >= size
                || (prefix_quote(&data[end..]) == 0 && is_empty(&data[end..]) == 0))
        {
            // An empty line followed by a non-quote line ends the quote.
            break;
        }
        if beg < end {
            body.put(&data[beg..end]);
        }
        beg = end;
    }

    parse_block(doc, &mut out, body.as_slice());
    doc.renderer.blockquote(ob, out.as_slice());
    doc.pool.release(BufferClass::Block, out);
    end
}

fn parse_paragraph<R: Render>(doc: &mut Parser<R>, ob: &mut Buffer, data: &[u8]) -> usize {
    let size = data.len();
    let mut i = 0;
    let mut end = 0;
    let mut level = 0;

    while i < size {
        end = i + 1;
        while end < size && data[end - 1] != b'\n' {
            end += 1;
        }

        if is_empty(&data[i..]) > 0 {
            break;
        }
        level = is_headerline(&data[i..]);
        if level != 0 {
            break;
        }
        if is_atx_header(doc, &data[i..]) || is_hrule(&data[i..]) || prefix_quote(&data[i..]) > 0 {
            end = i;
            break;
        }
        if doc.extensions.contains(Extensions::LAX_SPACING) && !data[i].is_ascii_alphanumeric() {
            if prefix_oli(&data[i..]) > 0 || prefix_uli(&data[i..]) > 0 {
                end = i;
                break;
            }
            if data[i] == b'<' && parse_htmlblock(doc, ob, &data[i..], false) > 0 {
                end = i;
                break;
            }
            if doc.extensions.contains(Extensions::FENCED_CODE)
                && scan_codefence(&data[i..]).is_some()
            {
                end = i;
                break;
            }
        }

        i = end;
    }

    let mut work_size = i;
    while work_size > 0 && data[work_size - 1] == b'\n' {
        work_size -= 1;
    }

    if level == 0 {
        let mut tmp = doc.pool.acquire(BufferClass::Block);
        parse_inline(doc, &mut tmp, &data[..work_size]);
        doc.renderer.paragraph(ob, tmp.as_slice());
        doc.pool.release(BufferClass::Block, tmp);
    } else {
        // The last line of the paragraph becomes a setext header; any lines
        // before it still form a paragraph of their own.
        let mut header_start = 0;
        let mut header_end = work_size;
        if work_size > 0 {
            let whole = work_size;
            work_size -= 1;
            while work_size > 0 && data[work_size] != b'\n' {
                work_size -= 1;
            }
            let last_line = work_size + 1;
            while work_size > 0 && data[work_size - 1] == b'\n' {
                work_size -= 1;
            }
            header_end = whole;
            if work_size > 0 {
                let mut tmp = doc.pool.acquire(BufferClass::Block);
                parse_inline(doc, &mut tmp, &data[..work_size]);
                doc.renderer.paragraph(ob, tmp.as_slice());
                doc.pool.release(BufferClass::Block, tmp);
                header_start = last_line;
            }
        }
        let mut header_work = doc.pool.acquire(BufferClass::Span);
        parse_inline(doc, &mut header_work, &data[header_start..header_end]);
        doc.renderer.header(ob, header_work.as_slice(), level);
        doc.pool.release(BufferClass::Span, header_work);
    }

    end
}

fn parse_list<R: Render>(
    doc: &mut Parser<R>,
    ob: &mut Buffer,
    data: &[u8],
    mut flags: ListFlags,
) -> usize {
    let mut work = doc.pool.acquire(BufferClass::Block);

    let mut i = 0;
    while i < data.len() {
        let (taken, ended) = parse_listitem(doc, &mut work, &data[i..], &mut flags);
        i += taken;
        if taken == 0 || ended {
            break;
        }
    }

    doc.renderer.list(ob, work.as_slice(), flags);
    doc.pool.release(BufferClass::Block, work);
    i
}

/// Parse one list item. Returns the bytes consumed and whether the item also
/// terminates the enclosing list (a marker-type switch or an unindented line
/// after a blank).
fn parse_listitem<R: Render>(
    doc: &mut Parser<R>,
    ob: &mut Buffer,
    data: &[u8],
    flags: &mut ListFlags,
) -> (usize, bool) {
    let size = data.len();
    let mut ended = false;

    // Indentation of the first line, for telling sibling items from
    // sublists later on.
    let mut orgpre = 0;
    while orgpre < 3 && orgpre < size && data[orgpre] == b' ' {
        orgpre += 1;
    }

    let mut beg = prefix_uli(data);
    if beg == 0 {
        beg = prefix_oli(data);
    }
    if beg == 0 {
        return (0, false);
    }

    let mut end = beg;
    while end < size && data[end - 1] != b'\n' {
        end += 1;
    }

    // The item body with prefixes stripped, reassembled before parsing.
    let mut body = Buffer::with_capacity(end - beg);
    body.put(&data[beg..end]);
    beg = end;

    let mut in_empty = false;
    let mut has_inside_empty = false;
    let mut in_fence = false;
    let mut sublist = 0;

    while beg < size {
        end += 1;
        while end < size && data[end - 1] != b'\n' {
            end += 1;
        }

        if is_empty(&data[beg..end]) > 0 {
            in_empty = true;
            beg = end;
            continue;
        }

        let mut indent = 0;
        while indent < 4 && beg + indent < end && data[beg + indent] == b' ' {
            indent += 1;
        }
        let line = &data[beg + indent..end];

        // A fence inside the item suppresses list-prefix detection until it
        // toggles back off.
        if doc.extensions.contains(Extensions::FENCED_CODE) && scan_codefence(line).is_some() {
            in_fence = !in_fence;
        }

        let (has_next_uli, has_next_oli) = if in_fence {
            (0, 0)
        } else {
            (prefix_uli(line), prefix_oli(line))
        };

        // Switching between ordered and unordered at the top indent ends the
        // enclosing list.
        if in_empty
            && ((flags.contains(ListFlags::ORDERED) && has_next_uli > 0)
                || (!flags.contains(ListFlags::ORDERED) && has_next_oli > 0))
        {
            ended = true;
            break;
        }

        if (has_next_uli > 0 && !is_hrule(line)) || has_next_oli > 0 {
            if in_empty {
                has_inside_empty = true;
            }
            if indent == orgpre {
                // A sibling item at the same indentation: this item is done.
                break;
            }
            if sublist == 0 {
                sublist = body.len();
            }
        } else if in_empty && indent == 0 {
            // An unindented line after a blank ends the whole list.
            ended = true;
            break;
        } else if in_empty {
            body.put_byte(b'\n');
            has_inside_empty = true;
        }
        in_empty = false;

        body.put(&data[beg + indent..end]);
        beg = end;
    }

    if has_inside_empty {
        *flags |= ListFlags::BLOCK;
    }

    let mut inter = doc.pool.acquire(BufferClass::Span);
    let body_slice = body.as_slice();
    if flags.contains(ListFlags::BLOCK) {
        if sublist > 0 && sublist < body_slice.len() {
            parse_block(doc, &mut inter, &body_slice[..sublist]);
            parse_block(doc, &mut inter, &body_slice[sublist..]);
        } else {
            parse_block(doc, &mut inter, body_slice);
        }
    } else if sublist > 0 && sublist < body_slice.len() {
        parse_inline(doc, &mut inter, &body_slice[..sublist]);
        parse_block(doc, &mut inter, &body_slice[sublist..]);
    } else {
        parse_inline(doc, &mut inter, body_slice);
    }

    doc.renderer.listitem(ob, inter.as_slice(), *flags);
    doc.pool.release(BufferClass::Span, inter);
    (beg, ended)
}

/// Match `</tag>` at the start of `data`, requiring the rest of its line to
/// be blank, and consume one optional following blank line. Returns the
/// bytes consumed, or 0.
fn htmlblock_end(tag: &str, data: &[u8]) -> usize {
    let tag = tag.as_bytes();
    let size = data.len();
    if tag.len() + 3 >= size {
        return 0;
    }
    if data[1] != b'/'
        || !data[2..2 + tag.len()].eq_ignore_ascii_case(tag)
        || data[tag.len() + 2] != b'>'
    {
        return 0;
    }

    let mut i = tag.len() + 3;
    if i < size {
        let blank = is_empty(&data[i..]);
        if blank == 0 {
            return 0;
        }
        i += blank;
    }
    if i < size {
        i += is_empty(&data[i..]);
    }
    i
}

/// Parse a raw HTML block. With `do_render` false this only probes for a
/// match, which paragraph interruption under lax spacing relies on.
fn parse_htmlblock<R: Render>(
    doc: &mut Parser<R>,
    ob: &mut Buffer,
    data: &[u8],
    do_render: bool,
) -> usize {
    let size = data.len();
    if size < 2 || data[0] != b'<' {
        return 0;
    }

    let mut i = 1;
    while i < size && data[i] != b'>' && data[i] != b' ' {
        i += 1;
    }
    let curtag = if i < size {
        find_block_tag(&data[1..i])
    } else {
        None
    };

    let Some(curtag) = curtag else {
        // An HTML comment, in its laxist form.
        if size > 5 && data[1] == b'!' && data[2] == b'-' && data[3] == b'-' {
            let mut i = 5;
            while i < size && !(data[i - 2] == b'-' && data[i - 1] == b'-' && data[i] == b'>') {
                i += 1;
            }
            i += 1;
            if i < size {
                let blank = is_empty(&data[i..]);
                if blank > 0 {
                    let block_end = i + blank;
                    if do_render {
                        doc.renderer.blockhtml(ob, &data[..block_end.min(size)]);
                    }
                    return block_end;
                }
            }
        }
        // HR, the only self-closing block tag considered.
        if size > 4 && (data[1] == b'h' || data[1] == b'H') && (data[2] == b'r' || data[2] == b'R')
        {
            let mut i = 3;
            while i < size && data[i] != b'>' {
                i += 1;
            }
            if i + 1 < size {
                i += 1;
                let blank = is_empty(&data[i..]);
                if blank > 0 {
                    let block_end = i + blank;
                    if do_render {
                        doc.renderer.blockhtml(ob, &data[..block_end.min(size)]);
                    }
                    return block_end;
                }
            }
        }
        return 0;
    };

    // First pass: a closing tag at the start of a line, followed by a blank
    // line.
    let mut found = 0;
    let mut i = 1;
    while i < size {
        i += 1;
        while i < size && !(data[i - 1] == b'\n' && data[i] == b'<') {
            i += 1;
        }
        if i + 2 + curtag.len() >= size {
            break;
        }
        if data[i + 1] == b'/' {
            let taken = htmlblock_end(curtag, &data[i..]);
            if taken > 0 {
                found = i + taken;
                break;
            }
        }
    }

    // Second pass: accept a closing tag anywhere on a line. `ins` and `del`
    // do not get this laxness, following the original dialect.
    if found == 0 && curtag != "ins" && curtag != "del" {
        let mut i = 1;
        while i < size {
            i += 1;
            while i < size && !(data[i - 1] == b'<' && data[i] == b'/') {
                i += 1;
            }
            if i + 2 + curtag.len() >= size {
                break;
            }
            let taken = htmlblock_end(curtag, &data[i - 1..]);
            if taken > 0 {
                found = i - 1 + taken;
                break;
            }
        }
    }

    if found == 0 {
        return 0;
    }
    if do_render {
        doc.renderer.blockhtml(ob, &data[..found.min(size)]);
    }
    found
}

/// Parse the header line and alignment underline of a table. On success the
/// header row is rendered into `ob` and the consumed length plus per-column
/// alignment flags are returned.
fn parse_table_header<R: Render>(
    doc: &mut Parser<R>,
    ob: &mut Buffer,
    data: &[u8],
) -> (usize, Vec<TableFlags>) {
    const FAIL: (usize, Vec<TableFlags>) = (0, Vec::new());

    let size = data.len();
    let mut i = 0;
    let mut pipes = 0usize;
    while i < size && data[i] != b'\n' {
        if data[i] == b'|' {
            pipes += 1;
        }
        i += 1;
    }
    if i == size || pipes == 0 {
        return FAIL;
    }

    let mut header_end = i;
    while header_end > 0 && data[header_end - 1] == b' ' {
        header_end -= 1;
    }
    // Bounding pipes do not open columns of their own.
    if data[0] == b'|' {
        pipes -= 1;
    }
    if header_end > 0 && data[header_end - 1] == b'|' {
        if pipes == 0 {
            return FAIL;
        }
        pipes -= 1;
    }
    let columns = pipes + 1;
    let mut col_data = vec![TableFlags::empty(); columns];

    // The underline determines the column count and alignments:
    // `|? *:?-+:? *(|...)+`.
    i += 1;
    let mut under_end = i;
    while under_end < size && data[under_end] != b'\n' {
        under_end += 1;
    }
    if i < under_end && data[i] == b'|' {
        i += 1;
    }
    let mut col = 0;
    while col < columns && i < under_end {
        let mut dashes = 0;
        while i < under_end && data[i] == b' ' {
            i += 1;
        }
        if i < under_end && data[i] == b':' {
            i += 1;
            col_data[col] |= TableFlags::ALIGN_LEFT;
            dashes += 1;
        }
        while i < under_end && data[i] == b'-' {
            i += 1;
            dashes += 1;
        }
        if i < under_end && data[i] == b':' {
            i += 1;
            col_data[col] |= TableFlags::ALIGN_RIGHT;
            dashes += 1;
        }
        while i < under_end && data[i] == b' ' {
            i += 1;
        }
        if i < under_end && data[i] != b'|' {
            break;
        }
        if dashes < 1 {
            break;
        }
        i += 1;
        col += 1;
    }
    if col < columns {
        return FAIL;
    }

    parse_table_row(doc, ob, &data[..header_end], &col_data, TableFlags::HEADER);
    (under_end + 1, col_data)
}

fn parse_table_row<R: Render>(
    doc: &mut Parser<R>,
    ob: &mut Buffer,
    data: &[u8],
    col_data: &[TableFlags],
    header_flag: TableFlags,
) {
    let size = data.len();
    let mut row_work = doc.pool.acquire(BufferClass::Span);

    let mut i = 0;
    if i < size && data[i] == b'|' {
        i += 1;
    }

    let mut col = 0;
    while col < col_data.len() && i < size {
        let mut cell_work = doc.pool.acquire(BufferClass::Span);
        while i < size && is_space(data[i]) {
            i += 1;
        }
        let cell_start = i;
        while i < size && data[i] != b'|' {
            i += 1;
        }
        let mut cell_end = i;
        while cell_end > cell_start && is_space(data[cell_end - 1]) {
            cell_end -= 1;
        }

        parse_inline(doc, &mut cell_work, &data[cell_start..cell_end]);
        doc.renderer
            .table_cell(&mut row_work, cell_work.as_slice(), col_data[col] | header_flag);
        doc.pool.release(BufferClass::Span, cell_work);
        i += 1;
        col += 1;
    }
    // Short rows are padded with empty cells.
    while col < col_data.len() {
        doc.renderer
            .table_cell(&mut row_work, &[], col_data[col] | header_flag);
        col += 1;
    }

    doc.renderer.table_row(ob, row_work.as_slice());
    doc.pool.release(BufferClass::Span, row_work);
}

fn parse_table<R: Render>(doc: &mut Parser<R>, ob: &mut Buffer, data: &[u8]) -> usize {
    let size = data.len();
    let mut header_work = doc.pool.acquire(BufferClass::Span);
    let mut body_work = doc.pool.acquire(BufferClass::Block);

    let (mut i, col_data) = parse_table_header(doc, &mut header_work, data);
    if i > 0 {
        // Rows continue up to the first line without a pipe.
        while i < size {
            let row_start = i;
            let mut pipes = 0;
            while i < size && data[i] != b'\n' {
                if data[i] == b'|' {
                    pipes += 1;
                }
                i += 1;
            }
            if pipes == 0 || i == size {
                i = row_start;
                break;
            }
            parse_table_row(
                doc,
                &mut body_work,
                &data[row_start..i],
                &col_data,
                TableFlags::empty(),
            );
            i += 1;
        }

        doc.renderer
            .table(ob, header_work.as_slice(), body_work.as_slice());
    }

    doc.pool.release(BufferClass::Block, body_work);
    doc.pool.release(BufferClass::Span, header_work);
    i
}

#[cfg(test)]
mod test {
    use super::{is_empty, is_headerline, is_hrule, prefix_oli, prefix_quote, prefix_uli};
    use test_case::test_case;

    #[test_case(b"\nrest", 1; "bare newline")]
    #[test_case(b"   \nrest", 4; "spaces then newline")]
    #[test_case(b"text\n", 0; "line with content")]
    fn empty_lines(data: &[u8], expected: usize) {
        assert_eq!(is_empty(data), expected);
    }

    #[test_case(b"***\n", true; "three stars")]
    #[test_case(b" - - -\n", true; "spaced dashes")]
    #[test_case(b"___\n", true; "underscores")]
    #[test_case(b"**\n", false; "too short")]
    #[test_case(b"*-*\n", false; "mixed markers")]
    fn hrules(data: &[u8], expected: bool) {
        assert_eq!(is_hrule(data), expected);
    }

    #[test_case(b"===\n", 1; "equals underline")]
    #[test_case(b"---  \n", 2; "dash underline with spaces")]
    #[test_case(b"--- x\n", 0; "trailing content")]
    fn headerlines(data: &[u8], expected: u32) {
        assert_eq!(is_headerline(data), expected);
    }

    #[test_case(b"> quote\n", 2; "marker and space")]
    #[test_case(b"   >tight\n", 4; "three spaces no gap")]
    #[test_case(b"not a quote\n", 0; "plain text")]
    fn quote_prefixes(data: &[u8], expected: usize) {
        assert_eq!(prefix_quote(data), expected);
    }

    #[test_case(b"- item\n", 2; "dash marker")]
    #[test_case(b"* item\n", 2; "star marker")]
    #[test_case(b"  + item\n", 4; "indented plus")]
    #[test_case(b"-tight\n", 0; "missing space")]
    fn unordered_prefixes(data: &[u8], expected: usize) {
        assert_eq!(prefix_uli(data), expected);
    }

    #[test_case(b"1. item\n", 3; "single digit")]
    #[test_case(b"12. item\n", 4; "two digits")]
    #[test_case(b"1) item\n", 0; "wrong terminator")]
    fn ordered_prefixes(data: &[u8], expected: usize) {
        assert_eq!(prefix_oli(data), expected);
    }
}
