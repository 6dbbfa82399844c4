//! Dense index ranges for enumeration.
//!
//! Indices are produced without checking that every node exists: the walker
//! looks each one up and surfaces `InvalidChapterIndex`/`InvalidVerseIndex`
//! for the first missing node.

use std::ops::RangeInclusive;

use super::Located;
use crate::corpus::Corpus;
use crate::error::Result;
use crate::reference::Span;

/// `1..=size` for `All`, the span's own bounds otherwise.
fn span_indices(span: Span, size: u32) -> RangeInclusive<u32> {
    match span {
        Span::All => 1..=size,
        Span::Single(n) => n..=n,
        Span::Range { low, high } => low..=high,
    }
}

impl<C: Corpus> Located<'_, C> {
    /// Chapter indices selected by the reference.
    pub fn chapter_indices(&self) -> Result<RangeInclusive<u32>> {
        let size = if self.reference.chapters.is_all() { self.book_size()? } else { 0 };
        Ok(span_indices(self.reference.chapters, size))
    }

    /// Verse indices selected by the reference inside `chapter`.
    pub fn verse_indices(&self, chapter: C::Chapter) -> RangeInclusive<u32> {
        let size =
            if self.reference.verses.is_all() { self.corpus.chapter_size(chapter).unwrap_or(0) } else { 0 };
        span_indices(self.reference.verses, size)
    }
}
