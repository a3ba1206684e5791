use crate::buffer::Buffer;
use crate::byte_lookup::is_space;
use crate::extensions::Extensions;
use crate::pool::BufferClass;
use crate::refs::{hash_id, hash_id_collapsed};
use crate::render::Render;

use super::inline::parse_inline;
use super::{unescape_text, Parser};

/// `[`: an explicit link, an image (when preceded by `!`), a footnote
/// reference, or a reference-style link in any of its three forms.
pub(super) fn char_link<R: Render>(
    doc: &mut Parser<R>,
    ob: &mut Buffer,
    data: &[u8],
    offset: usize,
) -> usize {
    let cur = &data[offset..];
    let size = cur.len();
    let is_img = offset > 0 && data[offset - 1] == b'!';

    // Find the matching closing bracket, tracking backslash escapes and
    // nested brackets.
    let mut level = 1u32;
    let mut i = 1;
    let mut text_has_nl = false;
    while i < size {
        if cur[i] == b'\n' {
            text_has_nl = true;
        } else if cur[i - 1] == b'\\' {
            // An escaped byte never opens or closes anything.
        } else if cur[i] == b'[' {
            level += 1;
        } else if cur[i] == b']' {
            level -= 1;
            if level == 0 {
                break;
            }
        }
        i += 1;
    }
    if i >= size {
        return 0;
    }
    let txt_e = i;
    i += 1;

    // `[^id]` resolves as a footnote reference: the first use marks the note
    // used and assigns its ordinal, later uses stay literal.
    if doc.extensions.contains(Extensions::FOOTNOTES) && cur[1] == b'^' {
        if txt_e < 3 {
            return 0;
        }
        let hash = hash_id(&cur[2..txt_e]);
        let mut rendered = false;
        if let Some(index) = doc.footnotes.find(hash) {
            let note = &mut doc.footnotes.notes[index];
            if !note.is_used {
                note.is_used = true;
                note.num = doc.used_footnotes.len() as u32 + 1;
                let num = note.num;
                doc.used_footnotes.push(index);
                rendered = doc.renderer.footnote_ref(ob, num);
            }
        }
        return if rendered { i } else { 0 };
    }

    // Any amount of whitespace may separate the text from the resource,
    // laxer than the original syntax.
    while i < size && is_space(cur[i]) {
        i += 1;
    }

    let mut link_range = None;
    let mut title_range = None;
    let mut ref_hash = None;

    if i < size && cur[i] == b'(' {
        // Inline style: destination with balanced parentheses, optional
        // quoted title.
        i += 1;
        while i < size && is_space(cur[i]) {
            i += 1;
        }
        let mut link_b = i;
        let mut open_parens = 0u32;
        while i < size {
            if cur[i] == b'\\' {
                i += 2;
            } else if cur[i] == b'(' {
                open_parens += 1;
                i += 1;
            } else if cur[i] == b')' {
                if open_parens == 0 {
                    break;
                }
                open_parens -= 1;
                i += 1;
            } else if i >= 1 && is_space(cur[i - 1]) && (cur[i] == b'\'' || cur[i] == b'"') {
                break;
            } else {
                i += 1;
            }
        }
        if i >= size {
            return 0;
        }
        let mut link_e = i;

        let mut title_b = 0;
        let mut title_e = 0;
        if cur[i] == b'\'' || cur[i] == b'"' {
            let quote = cur[i];
            let mut in_title = true;
            i += 1;
            title_b = i;
            while i < size {
                if cur[i] == b'\\' {
                    i += 2;
                } else if cur[i] == quote {
                    in_title = false;
                    i += 1;
                } else if cur[i] == b')' && !in_title {
                    break;
                } else {
                    i += 1;
                }
            }
            if i >= size {
                return 0;
            }

            // Back off over trailing whitespace to the closing quote; when
            // none is there the whole thing was part of the destination.
            title_e = i - 1;
            while title_e > title_b && is_space(cur[title_e]) {
                title_e -= 1;
            }
            if !matches!(cur[title_e], b'\'' | b'"') {
                title_b = 0;
                title_e = 0;
                link_e = i;
            }
        }

        while link_e > link_b && is_space(cur[link_e - 1]) {
            link_e -= 1;
        }
        // Strip the optional angle brackets around the destination.
        if link_b < link_e && cur[link_b] == b'<' {
            link_b += 1;
        }
        if link_b < link_e && cur[link_e - 1] == b'>' {
            link_e -= 1;
        }

        if link_e > link_b {
            link_range = Some((link_b, link_e));
        }
        if title_e > title_b {
            title_range = Some((title_b, title_e));
        }
        i += 1;
    } else if i < size && cur[i] == b'[' {
        // Reference style: `[text][id]`, where an empty id means the text is
        // the id.
        i += 1;
        let id_b = i;
        while i < size && cur[i] != b']' {
            i += 1;
        }
        if i >= size {
            return 0;
        }
        let id_e = i;

        let hash = if id_b == id_e {
            if text_has_nl {
                hash_id_collapsed(&cur[1..txt_e])
            } else {
                hash_id(&cur[1..txt_e])
            }
        } else {
            hash_id(&cur[id_b..id_e])
        };
        if doc.refs.find(hash).is_none() {
            return 0;
        }
        ref_hash = Some(hash);
        i += 1;
    } else {
        // Shortcut reference: the text is the id, and nothing after the
        // bracket is consumed.
        let hash = if text_has_nl {
            hash_id_collapsed(&cur[1..txt_e])
        } else {
            hash_id(&cur[1..txt_e])
        };
        if doc.refs.find(hash).is_none() {
            return 0;
        }
        ref_hash = Some(hash);
        i = txt_e + 1;
    }

    // Build the display content. Images take the raw bytes as alt text;
    // links parse them inline with autolinking suppressed.
    let mut content = doc.pool.acquire(BufferClass::Span);
    if txt_e > 1 {
        if is_img {
            content.put(&cur[1..txt_e]);
        } else {
            let was_in_link_body = doc.in_link_body;
            doc.in_link_body = true;
            parse_inline(doc, &mut content, &cur[1..txt_e]);
            doc.in_link_body = was_in_link_body;
        }
    }

    let mut link = doc.pool.acquire(BufferClass::Span);
    let rendered = if let Some(hash) = ref_hash {
        // Borrow the destination and title from the reference entry.
        let Some(entry) = doc.refs.find(hash) else {
            unreachable!("reference entries are never removed mid-parse");
        };
        unescape_text(&mut link, entry.link.as_slice());
        render_link_like(
            &mut doc.renderer,
            ob,
            is_img,
            link.as_slice(),
            entry.title.as_slice(),
            content.as_slice(),
        )
    } else {
        if let Some((b, e)) = link_range {
            unescape_text(&mut link, &cur[b..e]);
        }
        let title = title_range.map_or(&[][..], |(b, e)| &cur[b..e]);
        render_link_like(
            &mut doc.renderer,
            ob,
            is_img,
            link.as_slice(),
            title,
            content.as_slice(),
        )
    };
    doc.pool.release(BufferClass::Span, link);
    doc.pool.release(BufferClass::Span, content);

    if rendered {
        i
    } else {
        0
    }
}

fn render_link_like<R: Render>(
    renderer: &mut R,
    ob: &mut Buffer,
    is_img: bool,
    link: &[u8],
    title: &[u8],
    content: &[u8],
) -> bool {
    if is_img {
        // The `!` went out with the preceding text run; take it back.
        if ob.ends_with(b"!") {
            ob.truncate(ob.len() - 1);
        }
        renderer.image(ob, link, title, content)
    } else {
        renderer.link(ob, link, title, content)
    }
}
