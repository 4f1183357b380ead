//! Growable buffer for decoded string literal contents.
//!
//! Growth is explicit and geometric: when an append does not fit, capacity
//! at least doubles. Every reallocation is counted so the amortized bound can
//! be checked.

/// Smallest capacity allocated on growth.
const MIN_CAPACITY: usize = 16;

#[derive(Debug, Default)]
pub struct StringAccumulator {
    buf: Vec<u8>,
    growths: u32,
}

impl StringAccumulator {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            growths: 0,
        }
    }

    /// Start a new literal. Keeps the allocation.
    #[inline]
    pub fn reset(&mut self) {
        self.buf.clear();
    }

    #[inline]
    pub fn push(&mut self, byte: u8) {
        self.reserve(1);
        self.buf.push(byte);
    }

    pub fn push_char(&mut self, c: char) {
        let mut utf8 = [0u8; 4];
        self.push_bytes(c.encode_utf8(&mut utf8).as_bytes());
    }

    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.reserve(bytes.len());
        self.buf.extend_from_slice(bytes);
    }

    fn reserve(&mut self, additional: usize) {
        let needed = self.buf.len().saturating_add(additional);
        if needed <= self.buf.capacity() {
            return;
        }
        let mut capacity = self.buf.capacity().max(MIN_CAPACITY);
        while capacity < needed {
            capacity = capacity.saturating_mul(2);
        }
        self.buf.reserve_exact(capacity - self.buf.len());
        self.growths += 1;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Number of reallocations since construction.
    #[inline]
    pub fn growths(&self) -> u32 {
        self.growths
    }

    /// Transfer the accumulated contents out and start empty again.
    ///
    /// Contents are copied from a `&str` source with ASCII escape
    /// replacements, so they are valid UTF-8; anything else is replaced
    /// rather than rejected.
    pub fn finish(&mut self) -> String {
        let contents = String::from_utf8_lossy(&self.buf).into_owned();
        self.buf.clear();
        contents
    }

    /// Free the storage.
    pub fn release(&mut self) {
        self.buf = Vec::new();
    }
}
