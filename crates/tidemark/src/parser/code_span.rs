use crate::buffer::Buffer;
use crate::render::Render;

use super::Parser;

/// `` `code` ``: an opening run of n delimiters closed by the next run of
/// exactly n. Content is rendered verbatim, with one layer of surrounding
/// spaces stripped when both sides carry one.
pub(super) fn char_codespan<R: Render>(
    doc: &mut Parser<R>,
    ob: &mut Buffer,
    data: &[u8],
    offset: usize,
) -> usize {
    let cur = &data[offset..];
    let Some(span) = scan_delimited_span(cur, b'`') else {
        return 0;
    };

    if doc.renderer.codespan(ob, &cur[span.content.0..span.content.1]) {
        span.consumed
    } else {
        0
    }
}

/// `"text"`, symmetric to the code span.
pub(super) fn char_quote<R: Render>(
    doc: &mut Parser<R>,
    ob: &mut Buffer,
    data: &[u8],
    offset: usize,
) -> usize {
    let cur = &data[offset..];
    let Some(span) = scan_delimited_span(cur, b'"') else {
        return 0;
    };

    if doc.renderer.quote(ob, &cur[span.content.0..span.content.1]) {
        span.consumed
    } else {
        0
    }
}

struct DelimitedSpan {
    content: (usize, usize),
    consumed: usize,
}

/// Find the closing run for the delimiter run opening `cur`. Only a run of
/// exactly the opening length closes; longer and shorter runs are content.
fn scan_delimited_span(cur: &[u8], delim: u8) -> Option<DelimitedSpan> {
    let size = cur.len();
    let mut open = 0;
    while open < size && cur[open] == delim {
        open += 1;
    }

    let mut i = open;
    let close = loop {
        while i < size && cur[i] != delim {
            i += 1;
        }
        if i >= size {
            return None;
        }
        let run_start = i;
        while i < size && cur[i] == delim {
            i += 1;
        }
        if i - run_start == open {
            break run_start;
        }
    };

    let mut content_start = open;
    let mut content_end = close;
    if content_end > content_start + 1
        && cur[content_start] == b' '
        && cur[content_end - 1] == b' '
    {
        content_start += 1;
        content_end -= 1;
    }

    Some(DelimitedSpan {
        content: (content_start, content_end),
        consumed: i,
    })
}

#[cfg(test)]
mod test {
    use super::scan_delimited_span;
    use test_case::test_case;

    #[test_case(b"`code`", b"code", 6; "single delimiters")]
    #[test_case(b"``a`` rest", b"a", 5; "double delimiters")]
    #[test_case(b"`a`` b`", b"a`` b", 7; "embedded longer run")]
    #[test_case(b"` spaced `", b"spaced", 10; "one space stripped")]
    #[test_case(b"`  wide  `", b" wide ", 10; "only one space stripped")]
    fn scans_spans(cur: &[u8], content: &[u8], consumed: usize) {
        let span = scan_delimited_span(cur, b'`').unwrap();
        assert_eq!(&cur[span.content.0..span.content.1], content);
        assert_eq!(span.consumed, consumed);
    }

    #[test]
    fn unterminated_span_does_not_match() {
        assert!(scan_delimited_span(b"`open it", b'`').is_none());
        assert!(scan_delimited_span(b"``one`two", b'`').is_none());
    }
}
