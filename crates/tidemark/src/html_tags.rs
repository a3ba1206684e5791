use lazy_static::lazy_static;
use rustc_hash::FxHashMap;

/// The traditional Markdown block-level tag set. Raw HTML starting with one
/// of these opens an HTML block; anything else stays inline.
const BLOCK_TAGS: &[&str] = &[
    "p",
    "dl",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "ol",
    "ul",
    "del",
    "div",
    "ins",
    "pre",
    "form",
    "math",
    "table",
    "figure",
    "iframe",
    "script",
    "style",
    "fieldset",
    "noscript",
    "blockquote",
];

const MAX_TAG_LEN: usize = 10;

lazy_static! {
    static ref BLOCK_TAG_LOOKUP: FxHashMap<&'static [u8], &'static str> = {
        let mut map = FxHashMap::default();
        for tag in BLOCK_TAGS {
            map.insert(tag.as_bytes(), *tag);
        }
        map
    };
}

/// Match `name` case-insensitively against the block-tag set, returning the
/// canonical lowercase name on success.
pub(crate) fn find_block_tag(name: &[u8]) -> Option<&'static str> {
    if name.is_empty() || name.len() > MAX_TAG_LEN {
        return None;
    }
    let mut lower = [0u8; MAX_TAG_LEN];
    for (dst, src) in lower.iter_mut().zip(name) {
        *dst = src.to_ascii_lowercase();
    }
    BLOCK_TAG_LOOKUP.get(&lower[..name.len()]).copied()
}

#[cfg(test)]
mod test {
    use super::find_block_tag;
    use test_case::test_case;

    #[test_case(b"div", Some("div"); "simple tag")]
    #[test_case(b"DIV", Some("div"); "case folded")]
    #[test_case(b"blockquote", Some("blockquote"); "longest tag")]
    #[test_case(b"h7", None; "unknown heading level")]
    #[test_case(b"span", None; "inline tag")]
    #[test_case(b"", None; "empty name")]
    fn recognizes_block_tags(name: &[u8], expected: Option<&str>) {
        assert_eq!(find_block_tag(name), expected);
    }
}
