use crate::buffer::Buffer;
use crate::byte_lookup::is_space;
use crate::extensions::Extensions;
use crate::pool::BufferClass;
use crate::render::Render;

use super::inline::parse_inline;
use super::Parser;

/// Entry point for `*`, `_`, `~` and `=` runs. Dispatches on the run length
/// at the trigger: single, double, or triple delimiters, each with its own
/// closing scan. `~` and `=` only exist in their doubled forms.
pub(super) fn char_emphasis<R: Render>(
    doc: &mut Parser<R>,
    ob: &mut Buffer,
    data: &[u8],
    offset: usize,
) -> usize {
    let cur = &data[offset..];
    let size = cur.len();
    let marker = cur[0];

    if doc.extensions.contains(Extensions::NO_INTRA_EMPHASIS) && matches!(marker, b'*' | b'_') {
        // An opener in the middle of a word never opens emphasis.
        if offset > 0 && !is_space(data[offset - 1]) && data[offset - 1] != b'>' {
            return 0;
        }
    }

    if size > 2 && cur[1] != marker {
        // Whitespace cannot follow an opening delimiter, and strikethrough
        // or highlight need both their characters.
        if marker == b'~' || marker == b'=' || is_space(cur[1]) {
            return 0;
        }
        let taken = parse_emph1(doc, ob, &cur[1..], marker);
        return if taken == 0 { 0 } else { taken + 1 };
    }

    if size > 3 && cur[1] == marker && cur[2] != marker {
        if is_space(cur[2]) {
            return 0;
        }
        let taken = parse_emph2(doc, ob, &cur[2..], marker);
        return if taken == 0 { 0 } else { taken + 2 };
    }

    if size > 4 && cur[1] == marker && cur[2] == marker && cur[3] != marker {
        if marker == b'~' || marker == b'=' || is_space(cur[3]) {
            return 0;
        }
        let taken = parse_emph3(doc, ob, cur, marker);
        return if taken == 0 { 0 } else { taken + 3 };
    }

    0
}

/// Look for the next potential closing delimiter, skipping over code spans
/// and bracketed link-like constructs so delimiters inside them cannot close
/// emphasis. Returns the offset of the candidate, or 0.
fn find_emph_char(data: &[u8], marker: u8) -> usize {
    let size = data.len();
    let mut i = 1;
    loop {
        while i < size && data[i] != marker && data[i] != b'`' && data[i] != b'[' {
            i += 1;
        }
        if i >= size {
            return 0;
        }
        // Escaped characters do not count.
        if data[i - 1] == b'\\' {
            i += 1;
            continue;
        }
        if data[i] == marker {
            return i;
        }

        if data[i] == b'`' {
            // Skip to the matching end of the code span.
            let mut open = 0;
            let mut candidate = 0;
            while i < size && data[i] == b'`' {
                i += 1;
                open += 1;
            }
            if i >= size {
                return 0;
            }
            let mut run = 0;
            while i < size && run < open {
                if candidate == 0 && data[i] == marker {
                    candidate = i;
                }
                if data[i] == b'`' {
                    run += 1;
                } else {
                    run = 0;
                }
                i += 1;
            }
            // An unterminated span falls back to the first delimiter inside.
            if i >= size && run < open {
                return candidate;
            }
        } else if data[i] == b'[' {
            // Skip the bracketed text and any trailing resource or id.
            let mut candidate = 0;
            i += 1;
            while i < size && data[i] != b']' {
                if candidate == 0 && data[i] == marker {
                    candidate = i;
                }
                i += 1;
            }
            i += 1;
            while i < size && (data[i] == b' ' || data[i] == b'\n') {
                i += 1;
            }
            if i >= size {
                return candidate;
            }
            let closer = match data[i] {
                b'[' => b']',
                b'(' => b')',
                _ => {
                    if candidate > 0 {
                        return candidate;
                    }
                    continue;
                }
            };
            i += 1;
            while i < size && data[i] != closer {
                if candidate == 0 && data[i] == marker {
                    candidate = i;
                }
                i += 1;
            }
            if i >= size {
                return candidate;
            }
            i += 1;
        }
    }
}

/// Single-delimiter emphasis. `data` starts just past the opening delimiter.
fn parse_emph1<R: Render>(doc: &mut Parser<R>, ob: &mut Buffer, data: &[u8], marker: u8) -> usize {
    let size = data.len();
    let mut i = 0;

    // Skip one delimiter when handed an unbalanced run from the triple
    // parser.
    if size > 1 && data[0] == marker && data[1] == marker {
        i = 1;
    }

    while i < size {
        let len = find_emph_char(&data[i..], marker);
        if len == 0 {
            return 0;
        }
        i += len;
        if i >= size {
            return 0;
        }

        if data[i] == marker && !is_space(data[i - 1]) {
            if doc.extensions.contains(Extensions::NO_INTRA_EMPHASIS)
                && i + 1 < size
                && data[i + 1].is_ascii_alphanumeric()
            {
                // A closer in the middle of a word does not close.
                continue;
            }

            let mut work = doc.pool.acquire(BufferClass::Span);
            parse_inline(doc, &mut work, &data[..i]);
            let rendered = if doc.extensions.contains(Extensions::UNDERLINE) && marker == b'_' {
                doc.renderer.underline(ob, work.as_slice())
            } else {
                doc.renderer.emphasis(ob, work.as_slice())
            };
            doc.pool.release(BufferClass::Span, work);
            return if rendered { i + 1 } else { 0 };
        }
    }
    0
}

/// Double-delimiter emphasis, strikethrough and highlight. `data` starts
/// just past the opening delimiters.
fn parse_emph2<R: Render>(doc: &mut Parser<R>, ob: &mut Buffer, data: &[u8], marker: u8) -> usize {
    let size = data.len();
    let mut i = 0;

    while i < size {
        let len = find_emph_char(&data[i..], marker);
        if len == 0 {
            return 0;
        }
        i += len;

        if i + 1 < size && data[i] == marker && data[i + 1] == marker && !is_space(data[i - 1]) {
            let mut work = doc.pool.acquire(BufferClass::Span);
            parse_inline(doc, &mut work, &data[..i]);
            let rendered = match marker {
                b'~' => doc.renderer.strikethrough(ob, work.as_slice()),
                b'=' => doc.renderer.highlight(ob, work.as_slice()),
                _ => doc.renderer.double_emphasis(ob, work.as_slice()),
            };
            doc.pool.release(BufferClass::Span, work);
            return if rendered { i + 2 } else { 0 };
        }
        i += 1;
    }
    0
}

/// Triple-delimiter emphasis. `cur` still includes the three opening
/// delimiters, since an unbalanced close re-enters the single or double
/// parser with part of the opening run.
fn parse_emph3<R: Render>(doc: &mut Parser<R>, ob: &mut Buffer, cur: &[u8], marker: u8) -> usize {
    let data = &cur[3..];
    let size = data.len();
    let mut i = 0;

    while i < size {
        let len = find_emph_char(&data[i..], marker);
        if len == 0 {
            return 0;
        }
        i += len;

        // Closing delimiters preceded by whitespace do not close.
        if data[i] != marker || is_space(data[i - 1]) {
            continue;
        }

        if i + 2 < size && data[i + 1] == marker && data[i + 2] == marker {
            let mut work = doc.pool.acquire(BufferClass::Span);
            parse_inline(doc, &mut work, &data[..i]);
            let mut rendered = doc.renderer.triple_emphasis(ob, work.as_slice());
            if !rendered {
                // The renderer has no triple form: reinterpret the three
                // delimiters as one nested inside two.
                let mut inner = doc.pool.acquire(BufferClass::Span);
                if doc.renderer.emphasis(&mut inner, work.as_slice()) {
                    rendered = doc.renderer.double_emphasis(ob, inner.as_slice());
                }
                doc.pool.release(BufferClass::Span, inner);
            }
            doc.pool.release(BufferClass::Span, work);
            return if rendered { i + 3 } else { 0 };
        } else if i + 1 < size && data[i + 1] == marker {
            // A double close: one opening delimiter joins the content and
            // the single parser finishes the job.
            let taken = parse_emph1(doc, ob, &cur[1..], marker);
            return if taken == 0 { 0 } else { taken - 2 };
        } else {
            // A single close: two opening delimiters join the content and
            // the double parser finishes the job.
            let taken = parse_emph2(doc, ob, &cur[2..], marker);
            return if taken == 0 { 0 } else { taken - 1 };
        }
    }
    0
}
