use crate::buffer::Buffer;

const REF_TABLE_BUCKETS: usize = 8;

/// Case-folded rolling hash identifying reference and footnote names.
///
/// Two names are the same identifier exactly when their hashes are equal; the
/// tables never recheck bytes. This makes resolution ASCII case-insensitive
/// and means colliding names resolve to whichever definition came first, a
/// documented property of the dialect.
pub(crate) fn hash_id(id: &[u8]) -> u32 {
    let mut hash = 0u32;
    for &byte in id {
        hash = (byte.to_ascii_lowercase() as u32)
            .wrapping_add(hash << 6)
            .wrapping_add(hash << 16)
            .wrapping_sub(hash);
    }
    hash
}

/// Hash an id that spans line breaks inside brackets. Each newline collapses
/// to a single space, except directly after a space, before hashing.
pub(crate) fn hash_id_collapsed(id: &[u8]) -> u32 {
    let mut hash = 0u32;
    let mut step = |byte: u8| {
        hash = (byte.to_ascii_lowercase() as u32)
            .wrapping_add(hash << 6)
            .wrapping_add(hash << 16)
            .wrapping_sub(hash);
    };
    for (index, &byte) in id.iter().enumerate() {
        if byte != b'\n' {
            step(byte);
        } else if index > 0 && id[index - 1] != b' ' {
            step(b' ');
        }
    }
    hash
}

/// A link-reference definition collected during pass 1.
pub(crate) struct LinkRef {
    pub(crate) hash: u32,
    pub(crate) link: Buffer,
    /// Empty when the definition carried no title.
    pub(crate) title: Buffer,
}

/// Hash-bucketed reference table with separate chaining. Entries keep their
/// insertion order within a bucket so the earliest matching definition wins.
pub(crate) struct RefTable {
    buckets: [Vec<LinkRef>; REF_TABLE_BUCKETS],
}

impl RefTable {
    pub(crate) fn new() -> Self {
        Self {
            buckets: Default::default(),
        }
    }

    pub(crate) fn add(&mut self, hash: u32, link: &[u8], title: &[u8]) {
        let bucket = (hash as usize) % REF_TABLE_BUCKETS;
        self.buckets[bucket].push(LinkRef {
            hash,
            link: Buffer::from(link),
            title: Buffer::from(title),
        });
    }

    pub(crate) fn find(&self, hash: u32) -> Option<&LinkRef> {
        let bucket = (hash as usize) % REF_TABLE_BUCKETS;
        self.buckets[bucket].iter().find(|entry| entry.hash == hash)
    }

    pub(crate) fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
    }
}

/// A footnote definition collected during pass 1. `num` stays 0 until the
/// first inline reference marks the note used and assigns its ordinal.
pub(crate) struct FootnoteDef {
    pub(crate) hash: u32,
    pub(crate) contents: Buffer,
    pub(crate) is_used: bool,
    pub(crate) num: u32,
}

/// Footnote definitions in the order they appeared in the document.
pub(crate) struct FootnoteList {
    pub(crate) notes: Vec<FootnoteDef>,
}

impl FootnoteList {
    pub(crate) fn new() -> Self {
        Self { notes: Vec::new() }
    }

    pub(crate) fn add(&mut self, hash: u32, contents: Buffer) {
        self.notes.push(FootnoteDef {
            hash,
            contents,
            is_used: false,
            num: 0,
        });
    }

    /// Index of the first definition with a matching hash.
    pub(crate) fn find(&self, hash: u32) -> Option<usize> {
        self.notes.iter().position(|note| note.hash == hash)
    }

    pub(crate) fn clear(&mut self) {
        self.notes.clear();
    }
}

#[cfg(test)]
mod test {
    use super::{hash_id, hash_id_collapsed, RefTable};

    #[test]
    fn hashing_is_ascii_case_insensitive() {
        assert_eq!(hash_id(b"Foo"), hash_id(b"foo"));
        assert_eq!(hash_id(b"REF-1"), hash_id(b"ref-1"));
        assert_ne!(hash_id(b"foo"), hash_id(b"bar"));
    }

    #[test]
    fn newlines_collapse_to_one_space() {
        assert_eq!(hash_id_collapsed(b"two\nlines"), hash_id(b"two lines"));
        assert_eq!(hash_id_collapsed(b"spaced \nout"), hash_id(b"spaced out"));
    }

    #[test]
    fn earliest_definition_wins() {
        let mut refs = RefTable::new();
        let hash = hash_id(b"id");
        refs.add(hash, b"/first", b"");
        refs.add(hash, b"/second", b"");
        assert_eq!(refs.find(hash).unwrap().link.as_slice(), b"/first");
    }
}
