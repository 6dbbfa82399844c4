//! Context windows around an anchor verse.
//!
//! `overflow(left, right)` selects `left` verses before the anchor and
//! `right` verses after it, spilling into neighbouring chapters when the
//! window leaves the anchor's chapter. It never crosses into another book.
//!
//! The walk recurses one chapter at a time:
//!
//! ```text
//!            left spill                    right spill
//!   ┌──────────────────────┐       ┌──────────────────────────┐
//!   ch c-1 (anchor = last) │ ch c  │ ch c+1 (anchor = 1)
//!   emitted first          │ then  │ buffered, emitted last
//! ```
//!
//! Spill going left never spills right again (its right lookahead is 0) and
//! vice versa, so each chapter is visited once and the output is ordered by
//! chapter without sorting.

use tracing::debug;

use super::Located;
use crate::corpus::Corpus;
use crate::error::{Error, Result};
use crate::reference::Reference;

impl<C: Corpus> Located<'_, C> {
    /// References covering the context window around the anchor verse, one
    /// per chapter, in reading order.
    ///
    /// Both lookaheads must be at least 1.
    pub fn overflow(&self, left: u32, right: u32) -> Result<Vec<Reference>> {
        if left < 1 || right < 1 {
            return Err(Error::invalid_argument("need lookahead quantities greater than 1"));
        }

        let chapter = self.chapter_node()?;
        let anchor = self.corpus.verse_index(self.verse_node()?);

        let mut out = Vec::new();
        self.spill(chapter, i64::from(anchor), i64::from(left), i64::from(right), &mut out)?;

        debug!(
            anchor = %self.reference,
            left,
            right,
            window = ?out.iter().map(ToString::to_string).collect::<Vec<_>>(),
            "context window resolved"
        );
        Ok(out)
    }

    fn spill(&self, chapter: C::Chapter, anchor: i64, left: i64, right: i64, out: &mut Vec<Reference>) -> Result<()> {
        let index = self.corpus.chapter_index(chapter);
        let size = i64::from(self.corpus.chapter_size(chapter).unwrap_or(0));

        let mut low = anchor - left;
        if low < 1 {
            // Chapter 1 is a hard stop: the remainder is dropped.
            if index > 1 {
                let previous = self.corpus.chapter(self.book_node()?, index - 1)?;
                let previous_size = i64::from(self.corpus.chapter_size(previous).unwrap_or(0));
                self.spill(previous, previous_size, -low, 0, out)?;
            }
            low = 1;
        }

        let mut high = anchor + right;
        let mut after = Vec::new();
        if high > size {
            if index < self.book_size()? {
                let next = self.corpus.chapter(self.book_node()?, index + 1)?;
                self.spill(next, 1, 0, high - size - 1, &mut after)?;
            }
            high = size;
        }

        // Empty chapters contribute nothing but still pass the spill along.
        if low <= high {
            out.push(Reference::verses_of(self.reference.book.clone(), index, low as u32, high as u32)?);
        }
        out.append(&mut after);
        Ok(())
    }
}
