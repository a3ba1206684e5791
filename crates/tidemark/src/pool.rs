use crate::buffer::Buffer;

/// Size class of a pooled work buffer. Block-level scratch starts larger than
/// span-level scratch since block content tends to accumulate whole lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BufferClass {
    Block,
    Span,
}

const BLOCK_INITIAL_CAPACITY: usize = 256;
const SPAN_INITIAL_CAPACITY: usize = 64;

/// A per-parser pool of reusable work buffers, one stack per size class.
///
/// Parsers recurse and need scratch space whose lifetime is exactly the
/// recursion frame. `acquire` hands out an empty buffer (reusing a previously
/// released backing store when one is available) and bumps the class top;
/// `release` returns the buffer and restores it. The combined top of both
/// classes doubles as the recursion depth that `max_nesting` bounds.
pub(crate) struct WorkPool {
    block: ClassStack,
    span: ClassStack,
}

struct ClassStack {
    spare: Vec<Buffer>,
    top: usize,
    initial_capacity: usize,
}

impl ClassStack {
    fn new(initial_capacity: usize) -> Self {
        Self {
            spare: Vec::new(),
            top: 0,
            initial_capacity,
        }
    }

    fn acquire(&mut self) -> Buffer {
        self.top += 1;
        match self.spare.pop() {
            Some(mut buf) => {
                buf.clear();
                buf
            }
            None => Buffer::with_capacity(self.initial_capacity),
        }
    }

    fn release(&mut self, buf: Buffer) {
        debug_assert!(self.top > 0, "released a work buffer that was never acquired");
        self.top -= 1;
        self.spare.push(buf);
    }
}

impl WorkPool {
    pub(crate) fn new() -> Self {
        Self {
            block: ClassStack::new(BLOCK_INITIAL_CAPACITY),
            span: ClassStack::new(SPAN_INITIAL_CAPACITY),
        }
    }

    pub(crate) fn acquire(&mut self, class: BufferClass) -> Buffer {
        match class {
            BufferClass::Block => self.block.acquire(),
            BufferClass::Span => self.span.acquire(),
        }
    }

    pub(crate) fn release(&mut self, class: BufferClass, buf: Buffer) {
        match class {
            BufferClass::Block => self.block.release(buf),
            BufferClass::Span => self.span.release(buf),
        }
    }

    /// Number of outstanding buffers across both classes.
    pub(crate) fn depth(&self) -> usize {
        self.block.top + self.span.top
    }

    /// Drop every spare backing store. Called during render teardown so a
    /// parser does not pin document-sized allocations between renders.
    pub(crate) fn teardown(&mut self) {
        self.block.spare.clear();
        self.span.spare.clear();
    }
}

#[cfg(test)]
mod test {
    use super::{BufferClass, WorkPool};

    #[test]
    fn acquire_release_balances_depth() {
        let mut pool = WorkPool::new();
        assert_eq!(pool.depth(), 0);

        let a = pool.acquire(BufferClass::Block);
        let b = pool.acquire(BufferClass::Span);
        assert_eq!(pool.depth(), 2);

        pool.release(BufferClass::Span, b);
        pool.release(BufferClass::Block, a);
        assert_eq!(pool.depth(), 0);
    }

    #[test]
    fn released_buffers_are_reused_empty() {
        let mut pool = WorkPool::new();
        let mut buf = pool.acquire(BufferClass::Span);
        buf.put(b"scratch");
        pool.release(BufferClass::Span, buf);

        let again = pool.acquire(BufferClass::Span);
        assert!(again.is_empty());
        assert!(again.capacity() >= 7);
        pool.release(BufferClass::Span, again);
    }
}
