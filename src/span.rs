//! Byte ranges into the parsed input.

#[cfg(test)]
#[path = "./span_tests.rs"]
mod tests;

/// A byte-offset range within the input buffer.
///
/// Every scalar node stores a [`Span`] instead of an owned copy of its text,
/// so the buffer handed to [`Parser::parse`](crate::Parser::parse) must
/// outlive the tree.
///
/// Convertible to and from [`Range<u32>`](std::ops::Range) and into
/// [`Range<usize>`](std::ops::Range).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Debug)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: u32,
    /// End byte offset (exclusive).
    pub end: u32,
}

impl Span {
    /// Creates a new [`Span`] from start and end byte offsets.
    #[inline]
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Creates a span covering `length` bytes from `position`.
    #[inline]
    pub fn at(position: u32, length: u32) -> Self {
        Self {
            start: position,
            end: position + length,
        }
    }

    #[inline]
    pub(crate) fn from_offsets(start: usize, end: usize) -> Self {
        Self::new(start as u32, end as u32)
    }

    /// Offset of the first byte.
    #[inline]
    pub fn position(&self) -> u32 {
        self.start
    }

    /// Number of bytes covered.
    #[inline]
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Returns `true` if the span covers no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The covered bytes of `input`, or `None` when the span lies outside it.
    #[inline]
    pub fn slice<'de>(&self, input: &'de [u8]) -> Option<&'de [u8]> {
        input.get(self.start as usize..self.end as usize)
    }
}

impl From<Span> for (u32, u32) {
    fn from(s: Span) -> (u32, u32) {
        (s.start, s.end)
    }
}

impl From<std::ops::Range<u32>> for Span {
    fn from(s: std::ops::Range<u32>) -> Self {
        Self::new(s.start, s.end)
    }
}

impl From<Span> for std::ops::Range<u32> {
    fn from(s: Span) -> Self {
        s.start..s.end
    }
}

impl From<Span> for std::ops::Range<usize> {
    fn from(s: Span) -> Self {
        s.start as usize..s.end as usize
    }
}
