//! Corpus access.
//!
//! The search core never owns the document tree; it asks a [`Corpus`] for
//! node handles and sizes. [`MemoryCorpus`] is the in-memory implementation
//! used by the CLI and the tests, read from JSON or from the XML bible layout
//! (`<b n>` books holding `<c n>` chapters holding `<v n>` verses).
//!
//! Every node carries a positional index `n` (book nodes carry their name
//! instead). Sizes are the greatest child index, not the child count, so a
//! chapter numbered with gaps still reports its last verse number.

use std::fs;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde::Deserialize;

use crate::error::{Error, Result};

/// Read access to a book → chapter → verse tree.
///
/// Handles are cheap `Copy` values only meaningful to the corpus that issued
/// them.
pub trait Corpus {
    type Book: Copy;
    type Chapter: Copy;
    type Verse: Copy;

    /// All books, in document order.
    fn books(&self) -> Vec<Self::Book>;

    fn book(&self, name: &str) -> Result<Self::Book>;

    fn book_name(&self, book: Self::Book) -> &str;

    /// Chapters of `book`, in document order.
    fn chapters(&self, book: Self::Book) -> Vec<Self::Chapter>;

    fn chapter(&self, book: Self::Book, index: u32) -> Result<Self::Chapter>;

    fn chapter_index(&self, chapter: Self::Chapter) -> u32;

    /// Verses of `chapter`, in document order.
    fn verses(&self, chapter: Self::Chapter) -> Vec<Self::Verse>;

    fn verse(&self, chapter: Self::Chapter, index: u32) -> Result<Self::Verse>;

    fn verse_index(&self, verse: Self::Verse) -> u32;

    /// Greatest chapter index of `book`, `None` for a book without chapters.
    fn book_size(&self, book: Self::Book) -> Option<u32>;

    /// Greatest verse index of `chapter`, `None` for an empty chapter.
    fn chapter_size(&self, chapter: Self::Chapter) -> Option<u32>;

    fn text(&self, verse: Self::Verse) -> Option<&str>;

    fn parent_book(&self, chapter: Self::Chapter) -> Self::Book;
}

// --- In-memory corpus ---------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemoryCorpus {
    books: Vec<BookNode>,
}

#[derive(Debug, Clone, Deserialize)]
struct BookNode {
    #[serde(rename = "n")]
    name: String,
    #[serde(default)]
    chapters: Vec<ChapterNode>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChapterNode {
    n: u32,
    #[serde(default)]
    verses: Vec<VerseNode>,
}

#[derive(Debug, Clone, Deserialize)]
struct VerseNode {
    n: u32,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChapterId {
    book: usize,
    chapter: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerseId {
    book: usize,
    chapter: usize,
    verse: usize,
}

impl MemoryCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON document shaped as
    /// `{"books":[{"n":"Ruth","chapters":[{"n":1,"verses":[{"n":1,"text":"…"}]}]}]}`.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse the XML bible layout
    /// `<bible><b n="Ruth"><c n="1"><v n="1">…</v></c></b></bible>`.
    ///
    /// A verse keeps the text that precedes its first child element; an empty
    /// `<v n="…"/>` is a verse without text.
    pub fn from_xml(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text_start = true;
        reader.config_mut().trim_text_end = true;

        let mut corpus = MemoryCorpus::new();
        let mut in_verse = false;
        loop {
            match reader.read_event()? {
                Event::Start(e) => in_verse = corpus.open_xml_node(&e)?,
                Event::Empty(e) => {
                    corpus.open_xml_node(&e)?;
                    in_verse = false;
                }
                Event::Text(text) if in_verse => corpus.append_verse_text(&text.unescape()?),
                Event::End(_) => in_verse = false,
                Event::Eof => break,
                _ => {}
            }
        }
        Ok(corpus)
    }

    /// Load a corpus file: XML when the extension is `.xml`, JSON otherwise.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("xml") => Self::from_xml(&content),
            _ => Self::from_json(&content),
        }
    }

    /// Append a book; chapters are added with [`MemoryCorpus::push_chapter`].
    pub fn push_book(&mut self, name: impl Into<String>) -> BookId {
        self.books.push(BookNode { name: name.into(), chapters: Vec::new() });
        BookId(self.books.len() - 1)
    }

    /// Append chapter `n` to `book`, its verses numbered from 1 in order.
    /// `None` entries are verses present in the tree but without text.
    pub fn push_chapter<S: Into<String>>(
        &mut self,
        book: BookId,
        n: u32,
        texts: impl IntoIterator<Item = Option<S>>,
    ) -> ChapterId {
        let verses = texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| VerseNode { n: i as u32 + 1, text: text.map(Into::into) })
            .collect();
        let chapters = &mut self.books[book.0].chapters;
        chapters.push(ChapterNode { n, verses });
        ChapterId { book: book.0, chapter: chapters.len() - 1 }
    }

    /// Append the node `e` opens. Returns true for a verse, whose text
    /// follows.
    fn open_xml_node(&mut self, e: &BytesStart<'_>) -> Result<bool> {
        match e.name().as_ref() {
            b"b" => {
                self.push_book(xml_index_attribute(e)?);
                Ok(false)
            }
            b"c" => {
                let n = parse_xml_index(e)?;
                let book = self.books.last_mut().ok_or_else(|| Error::corpus_structure("<c> outside a <b>"))?;
                book.chapters.push(ChapterNode { n, verses: Vec::new() });
                Ok(false)
            }
            b"v" => {
                let n = parse_xml_index(e)?;
                let chapter = self
                    .books
                    .last_mut()
                    .and_then(|book| book.chapters.last_mut())
                    .ok_or_else(|| Error::corpus_structure("<v> outside a <c>"))?;
                chapter.verses.push(VerseNode { n, text: None });
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn append_verse_text(&mut self, text: &str) {
        let verse = self.books.last_mut().and_then(|b| b.chapters.last_mut()).and_then(|c| c.verses.last_mut());
        if let Some(verse) = verse {
            verse.text.get_or_insert_with(String::new).push_str(text);
        }
    }

    fn chapter_node(&self, id: ChapterId) -> &ChapterNode {
        &self.books[id.book].chapters[id.chapter]
    }

    fn verse_node(&self, id: VerseId) -> &VerseNode {
        &self.books[id.book].chapters[id.chapter].verses[id.verse]
    }
}

/// Value of the `n` attribute every `<b>`, `<c>` and `<v>` carries.
fn xml_index_attribute(e: &BytesStart<'_>) -> Result<String> {
    for attribute in e.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;
        if attribute.key.as_ref() == b"n" {
            return Ok(attribute.unescape_value()?.into_owned());
        }
    }
    let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    Err(Error::corpus_structure(format!("<{tag}> without an \"n\" attribute")))
}

fn parse_xml_index(e: &BytesStart<'_>) -> Result<u32> {
    let n = xml_index_attribute(e)?;
    n.trim().parse().map_err(|_| Error::corpus_structure(format!("invalid index \"{n}\"")))
}

impl Corpus for MemoryCorpus {
    type Book = BookId;
    type Chapter = ChapterId;
    type Verse = VerseId;

    fn books(&self) -> Vec<BookId> {
        (0..self.books.len()).map(BookId).collect()
    }

    fn book(&self, name: &str) -> Result<BookId> {
        self.books
            .iter()
            .position(|b| b.name == name)
            .map(BookId)
            .ok_or_else(|| Error::InvalidBookName { book: name.to_string() })
    }

    fn book_name(&self, book: BookId) -> &str {
        &self.books[book.0].name
    }

    fn chapters(&self, book: BookId) -> Vec<ChapterId> {
        (0..self.books[book.0].chapters.len()).map(|chapter| ChapterId { book: book.0, chapter }).collect()
    }

    fn chapter(&self, book: BookId, index: u32) -> Result<ChapterId> {
        self.books[book.0]
            .chapters
            .iter()
            .position(|c| c.n == index)
            .map(|chapter| ChapterId { book: book.0, chapter })
            .ok_or_else(|| Error::InvalidChapterIndex { book: self.book_name(book).to_string(), chapter: index })
    }

    fn chapter_index(&self, chapter: ChapterId) -> u32 {
        self.chapter_node(chapter).n
    }

    fn verses(&self, chapter: ChapterId) -> Vec<VerseId> {
        (0..self.chapter_node(chapter).verses.len())
            .map(|verse| VerseId { book: chapter.book, chapter: chapter.chapter, verse })
            .collect()
    }

    fn verse(&self, chapter: ChapterId, index: u32) -> Result<VerseId> {
        let node = self.chapter_node(chapter);
        node.verses
            .iter()
            .position(|v| v.n == index)
            .map(|verse| VerseId { book: chapter.book, chapter: chapter.chapter, verse })
            .ok_or_else(|| Error::InvalidVerseIndex {
                book: self.book_name(self.parent_book(chapter)).to_string(),
                chapter: node.n,
                verse: index,
            })
    }

    fn verse_index(&self, verse: VerseId) -> u32 {
        self.verse_node(verse).n
    }

    fn book_size(&self, book: BookId) -> Option<u32> {
        self.books[book.0].chapters.iter().map(|c| c.n).max()
    }

    fn chapter_size(&self, chapter: ChapterId) -> Option<u32> {
        self.chapter_node(chapter).verses.iter().map(|v| v.n).max()
    }

    fn text(&self, verse: VerseId) -> Option<&str> {
        self.verse_node(verse).text.as_deref()
    }

    fn parent_book(&self, chapter: ChapterId) -> BookId {
        BookId(chapter.book)
    }
}
