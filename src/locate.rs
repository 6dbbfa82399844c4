//! Binding references to a corpus.
//!
//! A [`Reference`] is plain data. [`Located`] pairs one with a [`Corpus`] and
//! adds what needs the document tree:
//!
//! ```text
//! Reference ──Located::new──> Located
//!                               ├─ book/chapter/verse nodes   (memoized)
//!                               ├─ book size, chapter size    (memoized)
//!                               ├─ chapter_indices / verse_indices   (ranges.rs)
//!                               └─ overflow(left, right)             (overflow.rs)
//! ```
//!
//! Node lookups are resolved on first use and kept for the life of the
//! `Located`: the overflow walk asks for the same book node and sizes many
//! times. A cached value is never replaced; build a new `Located` to look
//! again.
//!
//! For node-level accessors the reference's *low* bounds are the anchor: a
//! chapter range resolves to its first chapter, a verse range to its first
//! verse.

#[path = "locate/overflow.rs"]
mod overflow;
#[path = "locate/ranges.rs"]
mod ranges;

use std::fmt;

use once_cell::unsync::OnceCell;

use crate::corpus::Corpus;
use crate::error::{Error, Result};
use crate::reference::Reference;

pub struct Located<'c, C: Corpus> {
    corpus: &'c C,
    reference: Reference,
    book: OnceCell<C::Book>,
    chapter: OnceCell<C::Chapter>,
    verse: OnceCell<C::Verse>,
    book_size: OnceCell<u32>,
    chapter_size: OnceCell<u32>,
}

impl<C: Corpus> fmt::Debug for Located<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Located")
            .field("reference", &self.reference.to_string())
            .field("corpus", &"<corpus>")
            .field("book_size", &self.book_size.get())
            .field("chapter_size", &self.chapter_size.get())
            .finish()
    }
}

impl<'c, C: Corpus> Located<'c, C> {
    pub fn new(corpus: &'c C, reference: Reference) -> Self {
        Self {
            corpus,
            reference,
            book: OnceCell::new(),
            chapter: OnceCell::new(),
            verse: OnceCell::new(),
            book_size: OnceCell::new(),
            chapter_size: OnceCell::new(),
        }
    }

    pub fn reference(&self) -> &Reference {
        &self.reference
    }

    pub fn into_reference(self) -> Reference {
        self.reference
    }

    pub fn corpus(&self) -> &'c C {
        self.corpus
    }

    pub fn book_node(&self) -> Result<C::Book> {
        self.book.get_or_try_init(|| self.corpus.book(&self.reference.book)).copied()
    }

    /// Node of the anchor chapter. Fails for a reference spanning every
    /// chapter, which has no anchor.
    pub fn chapter_node(&self) -> Result<C::Chapter> {
        self.chapter
            .get_or_try_init(|| {
                let index = self.reference.chapters.low().ok_or_else(|| {
                    Error::invalid_argument(format!("\"{}\" has no anchor chapter", self.reference))
                })?;
                self.corpus.chapter(self.book_node()?, index)
            })
            .copied()
    }

    /// Node of the anchor verse. Fails for a reference spanning every verse.
    pub fn verse_node(&self) -> Result<C::Verse> {
        self.verse
            .get_or_try_init(|| {
                let index = self.reference.verses.low().ok_or_else(|| {
                    Error::invalid_argument(format!("\"{}\" has no anchor verse", self.reference))
                })?;
                self.corpus.verse(self.chapter_node()?, index)
            })
            .copied()
    }

    /// Greatest chapter index of the book (0 when it has no chapters).
    pub fn book_size(&self) -> Result<u32> {
        self.book_size
            .get_or_try_init(|| Ok::<_, Error>(self.corpus.book_size(self.book_node()?).unwrap_or(0)))
            .copied()
    }

    /// Greatest verse index of the anchor chapter (0 when it has no verses).
    pub fn chapter_size(&self) -> Result<u32> {
        self.chapter_size
            .get_or_try_init(|| Ok::<_, Error>(self.corpus.chapter_size(self.chapter_node()?).unwrap_or(0)))
            .copied()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::corpus::{BookId, ChapterId, MemoryCorpus, VerseId};

    /// A corpus whose book `Livre` has chapters of the given sizes, followed
    /// by a second book so that book boundaries can be checked.
    pub(crate) fn corpus_with_chapters(sizes: &[u32]) -> MemoryCorpus {
        let mut corpus = MemoryCorpus::new();
        let book = corpus.push_book("Livre");
        for (i, &size) in sizes.iter().enumerate() {
            let chapter = i as u32 + 1;
            corpus.push_chapter(book, chapter, (1..=size).map(|v| Some(format!("Livre {chapter}.{v}"))));
        }
        let next = corpus.push_book("Suite");
        corpus.push_chapter(next, 1, [Some("Suite 1.1"), Some("Suite 1.2")]);
        corpus
    }

    /// Counts book lookups to observe memoization.
    pub(crate) struct CountingCorpus {
        pub inner: MemoryCorpus,
        pub book_lookups: Cell<usize>,
        pub size_lookups: Cell<usize>,
    }

    impl Corpus for CountingCorpus {
        type Book = BookId;
        type Chapter = ChapterId;
        type Verse = VerseId;

        fn books(&self) -> Vec<BookId> {
            self.inner.books()
        }
        fn book(&self, name: &str) -> Result<BookId> {
            self.book_lookups.set(self.book_lookups.get() + 1);
            self.inner.book(name)
        }
        fn book_name(&self, book: BookId) -> &str {
            self.inner.book_name(book)
        }
        fn chapters(&self, book: BookId) -> Vec<ChapterId> {
            self.inner.chapters(book)
        }
        fn chapter(&self, book: BookId, index: u32) -> Result<ChapterId> {
            self.inner.chapter(book, index)
        }
        fn chapter_index(&self, chapter: ChapterId) -> u32 {
            self.inner.chapter_index(chapter)
        }
        fn verses(&self, chapter: ChapterId) -> Vec<VerseId> {
            self.inner.verses(chapter)
        }
        fn verse(&self, chapter: ChapterId, index: u32) -> Result<VerseId> {
            self.inner.verse(chapter, index)
        }
        fn verse_index(&self, verse: VerseId) -> u32 {
            self.inner.verse_index(verse)
        }
        fn book_size(&self, book: BookId) -> Option<u32> {
            self.size_lookups.set(self.size_lookups.get() + 1);
            self.inner.book_size(book)
        }
        fn chapter_size(&self, chapter: ChapterId) -> Option<u32> {
            self.size_lookups.set(self.size_lookups.get() + 1);
            self.inner.chapter_size(chapter)
        }
        fn text(&self, verse: VerseId) -> Option<&str> {
            self.inner.text(verse)
        }
        fn parent_book(&self, chapter: ChapterId) -> BookId {
            self.inner.parent_book(chapter)
        }
    }

    #[test]
    fn node_lookups_are_memoized() {
        let corpus = CountingCorpus {
            inner: corpus_with_chapters(&[10, 8, 12]),
            book_lookups: Cell::new(0),
            size_lookups: Cell::new(0),
        };
        let located = Located::new(&corpus, Reference::verse("Livre", 2, 3));

        for _ in 0..3 {
            located.verse_node().unwrap();
            assert_eq!(located.book_size().unwrap(), 3);
            assert_eq!(located.chapter_size().unwrap(), 8);
        }
        assert_eq!(corpus.book_lookups.get(), 1);
        assert_eq!(corpus.size_lookups.get(), 2);
    }

    #[test]
    fn anchors_on_the_low_bounds() {
        let corpus = corpus_with_chapters(&[10, 8, 12]);
        let located = Located::new(&corpus, "Livre 2-3.4-6".parse().unwrap());

        let verse = located.verse_node().unwrap();
        assert_eq!(corpus.chapter_index(located.chapter_node().unwrap()), 2);
        assert_eq!(corpus.verse_index(verse), 4);

        let whole_book = Located::new(&corpus, Reference::book("Livre"));
        assert!(matches!(whole_book.chapter_node(), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn lookup_failures_are_not_cached_as_values() {
        let corpus = corpus_with_chapters(&[10]);
        let located = Located::new(&corpus, Reference::verse("Livre", 4, 1));
        assert!(matches!(located.chapter_node(), Err(Error::InvalidChapterIndex { chapter: 4, .. })));
        assert!(matches!(located.chapter_node(), Err(Error::InvalidChapterIndex { chapter: 4, .. })));

        let missing = Located::new(&corpus, Reference::book("Tobie"));
        assert!(matches!(missing.book_size(), Err(Error::InvalidBookName { .. })));
    }
}
