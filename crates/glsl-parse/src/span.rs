use std::ops::Range;

use derive_more::derive::{AsRef, Deref, DerefMut, From};

/// A byte range in the source text.
#[derive(Default, Clone, Debug, PartialEq, Eq, Hash, Deref, DerefMut, AsRef, From)]
pub struct Span(Range<usize>);

impl Span {
    pub fn new(range: Range<usize>) -> Self {
        Self(range)
    }
    pub fn range(&self) -> Range<usize> {
        self.0.clone()
    }
    pub fn extend(&self, other: &Span) -> Self {
        Self(self.start..other.end)
    }
    /// Empty span located at `offset`.
    pub fn at(offset: usize) -> Self {
        Self(offset..offset)
    }
}
