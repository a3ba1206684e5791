use std::fmt;
use std::ops::Deref;

/// A growable byte buffer used for every piece of rendered output and scratch
/// text in the parser.
///
/// Renderer callbacks receive the current output as `&mut Buffer` and append
/// to it. The buffer deliberately exposes `truncate`, since some constructs
/// (hard line breaks, autolinks, images) need to claim back bytes that were
/// already emitted as plain text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Buffer {
    data: Vec<u8>,
}

impl Buffer {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn put(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    #[inline]
    pub fn put_byte(&mut self, byte: u8) {
        self.data.push(byte);
    }

    #[inline]
    pub fn put_str(&mut self, text: &str) {
        self.data.extend_from_slice(text.as_bytes());
    }

    /// Shorten the buffer to `len` bytes. Lengths at or beyond the current
    /// size leave the buffer untouched, so rewinds can never reach before the
    /// start of the buffer.
    #[inline]
    pub fn truncate(&mut self, len: usize) {
        self.data.truncate(len);
    }

    /// Drop the contents but keep the backing allocation. The work-buffer
    /// pool relies on this to amortize allocations across a document.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    #[inline]
    pub fn reserve(&mut self, additional: usize) {
        self.data.reserve(additional);
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    #[inline]
    pub fn ends_with(&self, suffix: &[u8]) -> bool {
        self.data.ends_with(suffix)
    }

    /// Remove trailing space characters, used when converting the two-space
    /// line suffix into a hard break.
    pub fn trim_trailing_spaces(&mut self) {
        while self.data.last() == Some(&b' ') {
            self.data.pop();
        }
    }
}

impl Deref for Buffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

impl From<&[u8]> for Buffer {
    fn from(bytes: &[u8]) -> Self {
        Self {
            data: bytes.to_vec(),
        }
    }
}

impl fmt::Write for Buffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.put_str(s);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::Buffer;

    #[test]
    fn truncate_clamps_at_zero() {
        let mut buf = Buffer::new();
        buf.put(b"abc");
        buf.truncate(10);
        assert_eq!(buf.as_slice(), b"abc");
        buf.truncate(0);
        assert!(buf.is_empty());
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut buf = Buffer::with_capacity(64);
        buf.put(b"some text");
        let capacity = buf.data.capacity();
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.data.capacity(), capacity);
    }

    #[test]
    fn trims_trailing_spaces_only() {
        let mut buf = Buffer::new();
        buf.put(b"line  ");
        buf.trim_trailing_spaces();
        assert_eq!(buf.as_slice(), b"line");
    }
}
