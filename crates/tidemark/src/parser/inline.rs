use crate::autolink;
use crate::buffer::Buffer;
use crate::byte_lookup::{is_escapable, is_space};
use crate::extensions::Extensions;
use crate::pool::BufferClass;
use crate::render::{AutolinkKind, Render};

use super::code_span::{char_codespan, char_quote};
use super::emphasis::char_emphasis;
use super::link::char_link;
use super::{unescape_text, Parser};

/// What a byte may begin when encountered in inline text. Bytes mapping to
/// `None` are copied through as plain text without ever consulting a
/// handler.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum CharAction {
    #[default]
    None,
    Emphasis,
    CodeSpan,
    LineBreak,
    Link,
    Escape,
    Entity,
    AngleBracket,
    AutolinkUrl,
    AutolinkWww,
    AutolinkEmail,
    Superscript,
    Quote,
}

/// Build the 256-entry active-character table for the given extension set.
pub(crate) fn build_active_chars(extensions: Extensions) -> [CharAction; 256] {
    let mut table = [CharAction::None; 256];
    table[b'*' as usize] = CharAction::Emphasis;
    table[b'_' as usize] = CharAction::Emphasis;
    if extensions.contains(Extensions::STRIKETHROUGH) {
        table[b'~' as usize] = CharAction::Emphasis;
    }
    if extensions.contains(Extensions::HIGHLIGHT) {
        table[b'=' as usize] = CharAction::Emphasis;
    }
    table[b'`' as usize] = CharAction::CodeSpan;
    table[b'\n' as usize] = CharAction::LineBreak;
    table[b'[' as usize] = CharAction::Link;
    table[b'\\' as usize] = CharAction::Escape;
    table[b'&' as usize] = CharAction::Entity;
    table[b'<' as usize] = CharAction::AngleBracket;
    if extensions.contains(Extensions::AUTOLINK) {
        table[b':' as usize] = CharAction::AutolinkUrl;
        table[b'w' as usize] = CharAction::AutolinkWww;
        table[b'@' as usize] = CharAction::AutolinkEmail;
    }
    if extensions.contains(Extensions::SUPERSCRIPT) {
        table[b'^' as usize] = CharAction::Superscript;
    }
    if extensions.contains(Extensions::QUOTE) {
        table[b'"' as usize] = CharAction::Quote;
    }
    table
}

/// Parse a span of text as inline content, appending the rendering to `ob`.
///
/// Runs of inactive bytes go to the renderer's `normal_text`; each active
/// byte dispatches to its handler, which returns the number of bytes it
/// consumed, or 0 when the construct did not match, in which case the byte
/// joins the next plain-text run.
pub(crate) fn parse_inline<R: Render>(doc: &mut Parser<R>, ob: &mut Buffer, data: &[u8]) {
    if doc.nesting_exceeded() {
        return;
    }

    let size = data.len();
    let mut i = 0;
    let mut end = 0;
    while i < size {
        while end < size && doc.active_chars[data[end] as usize] == CharAction::None {
            end += 1;
        }
        doc.renderer.normal_text(ob, &data[i..end]);

        if end >= size {
            break;
        }
        i = end;

        let consumed = match doc.active_chars[data[i] as usize] {
            CharAction::None => 0,
            CharAction::Emphasis => char_emphasis(doc, ob, data, i),
            CharAction::CodeSpan => char_codespan(doc, ob, data, i),
            CharAction::LineBreak => char_linebreak(doc, ob, data, i),
            CharAction::Link => char_link(doc, ob, data, i),
            CharAction::Escape => char_escape(doc, ob, data, i),
            CharAction::Entity => char_entity(doc, ob, data, i),
            CharAction::AngleBracket => char_langle_tag(doc, ob, data, i),
            CharAction::AutolinkUrl => char_autolink_url(doc, ob, data, i),
            CharAction::AutolinkWww => char_autolink_www(doc, ob, data, i),
            CharAction::AutolinkEmail => char_autolink_email(doc, ob, data, i),
            CharAction::Superscript => char_superscript(doc, ob, data, i),
            CharAction::Quote => char_quote(doc, ob, data, i),
        };

        if consumed == 0 {
            end = i + 1;
        } else {
            i += consumed;
            end = i;
        }
    }
}

/// `\x` emits `x` as plain text for bytes in the escape set; any other
/// backslash stays literal.
fn char_escape<R: Render>(doc: &mut Parser<R>, ob: &mut Buffer, data: &[u8], offset: usize) -> usize {
    let cur = &data[offset..];
    if cur.len() > 1 {
        if !is_escapable(cur[1]) {
            return 0;
        }
        doc.renderer.normal_text(ob, &cur[1..2]);
    } else {
        ob.put_byte(cur[0]);
    }
    2
}

/// `&name;` or `&#123;` goes to the entity callback as one token; a lone
/// ampersand stays literal.
fn char_entity<R: Render>(doc: &mut Parser<R>, ob: &mut Buffer, data: &[u8], offset: usize) -> usize {
    let cur = &data[offset..];
    let mut end = 1;
    if end < cur.len() && cur[end] == b'#' {
        end += 1;
    }
    let body = end;
    while end < cur.len() && cur[end].is_ascii_alphanumeric() {
        end += 1;
    }
    if end == body || end >= cur.len() || cur[end] != b';' {
        return 0;
    }
    end += 1;
    doc.renderer.entity(ob, &cur[..end]);
    end
}

/// A newline after two or more trailing spaces becomes a hard break; the
/// spaces are claimed back from the output.
fn char_linebreak<R: Render>(
    doc: &mut Parser<R>,
    ob: &mut Buffer,
    data: &[u8],
    offset: usize,
) -> usize {
    if offset < 2 || data[offset - 1] != b' ' || data[offset - 2] != b' ' {
        return 0;
    }
    ob.trim_trailing_spaces();
    if doc.renderer.linebreak(ob) {
        1
    } else {
        0
    }
}

/// `<...>`: an HTML tag, or a URL/e-mail autolink in angle brackets.
fn char_langle_tag<R: Render>(
    doc: &mut Parser<R>,
    ob: &mut Buffer,
    data: &[u8],
    offset: usize,
) -> usize {
    let cur = &data[offset..];
    let (end, kind) = tag_length(cur);
    if end <= 2 {
        return 0;
    }

    let rendered = match kind {
        Some(kind) => {
            let mut link = doc.pool.acquire(BufferClass::Span);
            unescape_text(&mut link, &cur[1..end - 1]);
            let rendered = doc.renderer.autolink(ob, link.as_slice(), kind);
            doc.pool.release(BufferClass::Span, link);
            rendered
        }
        None => doc.renderer.raw_html_tag(ob, &cur[..end]),
    };

    if rendered {
        end
    } else {
        0
    }
}

/// Length of the tag or autolink starting at `data[0] == '<'`, or 0 when
/// nothing tag-shaped is there.
fn tag_length(data: &[u8]) -> (usize, Option<AutolinkKind>) {
    let size = data.len();
    if size < 3 || data[0] != b'<' {
        return (0, None);
    }
    let mut i = if data[1] == b'/' { 2 } else { 1 };
    if !data[i].is_ascii_alphanumeric() {
        return (0, None);
    }

    // Scheme test: letters, digits, `.`, `+` and `-` may precede an `@` or
    // `:` that turns the bracket contents into an autolink.
    while i < size && (data[i].is_ascii_alphanumeric() || matches!(data[i], b'.' | b'+' | b'-')) {
        i += 1;
    }

    if i > 1 && i < size && data[i] == b'@' {
        let mail = is_mail_autolink(&data[i..]);
        if mail > 0 {
            return (i + mail, Some(AutolinkKind::Email));
        }
    }

    let mut autolink = false;
    if i > 2 && i < size && data[i] == b':' {
        autolink = true;
        i += 1;
    }

    if i >= size {
        return (0, None);
    }
    if autolink {
        let scheme_end = i;
        while i < size {
            if data[i] == b'\\' {
                i += 2;
            } else if matches!(data[i], b'>' | b'\'' | b'"' | b' ' | b'\n') {
                break;
            } else {
                i += 1;
            }
        }
        if i >= size {
            return (0, None);
        }
        if i > scheme_end && data[i] == b'>' {
            return (i + 1, Some(AutolinkKind::Url));
        }
        // A forbidden byte interrupted the autolink; fall back to tag
        // matching.
    }

    while i < size && data[i] != b'>' {
        i += 1;
    }
    if i >= size {
        return (0, None);
    }
    (i + 1, None)
}

/// The address part of a bracketed e-mail autolink: `[-._a-zA-Z0-9]+` with
/// exactly one `@`, terminated by `>`. Deliberately laxer than a strict
/// address grammar.
fn is_mail_autolink(data: &[u8]) -> usize {
    let mut at_signs = 0;
    for (i, &byte) in data.iter().enumerate() {
        if byte.is_ascii_alphanumeric() {
            continue;
        }
        match byte {
            b'@' => at_signs += 1,
            b'-' | b'.' | b'_' => {}
            b'>' => {
                return if at_signs == 1 { i + 1 } else { 0 };
            }
            _ => return 0,
        }
    }
    0
}

fn char_autolink_url<R: Render>(
    doc: &mut Parser<R>,
    ob: &mut Buffer,
    data: &[u8],
    offset: usize,
) -> usize {
    if doc.in_link_body {
        return 0;
    }
    let Some(span) = autolink::url(data, offset) else {
        return 0;
    };

    let link = &data[offset - span.rewind..offset + span.len];
    ob.truncate(ob.len().saturating_sub(span.rewind));
    doc.renderer.autolink(ob, link, AutolinkKind::Url);
    span.len
}

fn char_autolink_www<R: Render>(
    doc: &mut Parser<R>,
    ob: &mut Buffer,
    data: &[u8],
    offset: usize,
) -> usize {
    if doc.in_link_body {
        return 0;
    }
    let Some(span) = autolink::www(data, offset) else {
        return 0;
    };

    let link = &data[offset..offset + span.len];
    let mut link_url = doc.pool.acquire(BufferClass::Span);
    link_url.put(b"http://");
    link_url.put(link);

    ob.truncate(ob.len().saturating_sub(span.rewind));
    let mut link_text = doc.pool.acquire(BufferClass::Span);
    doc.renderer.normal_text(&mut link_text, link);
    doc.renderer
        .link(ob, link_url.as_slice(), &[], link_text.as_slice());
    doc.pool.release(BufferClass::Span, link_text);
    doc.pool.release(BufferClass::Span, link_url);
    span.len
}

fn char_autolink_email<R: Render>(
    doc: &mut Parser<R>,
    ob: &mut Buffer,
    data: &[u8],
    offset: usize,
) -> usize {
    if doc.in_link_body {
        return 0;
    }
    let Some(span) = autolink::email(data, offset) else {
        return 0;
    };

    let link = &data[offset - span.rewind..offset + span.len];
    ob.truncate(ob.len().saturating_sub(span.rewind));
    doc.renderer.autolink(ob, link, AutolinkKind::Email);
    span.len
}

/// `^token` or `^(grouped content)`, parsed inline recursively.
fn char_superscript<R: Render>(
    doc: &mut Parser<R>,
    ob: &mut Buffer,
    data: &[u8],
    offset: usize,
) -> usize {
    let cur = &data[offset..];
    let size = cur.len();
    if size < 2 {
        return 0;
    }

    let (sup_start, sup_len) = if cur[1] == b'(' {
        let mut i = 2;
        while i < size && cur[i] != b')' {
            if cur[i] == b'\\' {
                i += 2;
            } else {
                i += 1;
            }
        }
        if i >= size {
            return 0;
        }
        (2, i)
    } else {
        let mut i = 1;
        while i < size && !is_space(cur[i]) {
            i += 1;
        }
        (1, i)
    };

    if sup_len == sup_start {
        return if sup_start == 2 { 3 } else { 0 };
    }

    let mut sup = doc.pool.acquire(BufferClass::Span);
    parse_inline(doc, &mut sup, &cur[sup_start..sup_len]);
    doc.renderer.superscript(ob, sup.as_slice());
    doc.pool.release(BufferClass::Span, sup);

    if sup_start == 2 {
        sup_len + 1
    } else {
        sup_len
    }
}
