//! Error types.
//!
//! Every fallible operation in the crate returns [`Result`]. Lookup misses
//! form a chain: a verse miss carries its chapter and book, a chapter miss
//! carries its book, so callers can report where a reference went wrong.

use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Reference text that does not follow the canonical grammar, omits a
    /// chapter while giving a verse, or has a non-increasing range.
    #[error("{0}")]
    BadReferenceFormat(String),

    #[error("invalid book name \"{book}\"")]
    InvalidBookName { book: String },

    #[error("invalid chapter index \"{chapter}\" in book \"{book}\"")]
    InvalidChapterIndex { book: String, chapter: u32 },

    #[error("invalid verse index \"{verse}\" in chapter \"{chapter}\" from book \"{book}\"")]
    InvalidVerseIndex { book: String, chapter: u32, verse: u32 },

    /// Bad number range or context lookahead.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A rule produced a pattern the regex engine refused (usually a number
    /// range too large for the compiled size limit).
    #[error("pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("corpus format error: {0}")]
    CorpusFormat(#[from] serde_json::Error),

    #[error("corpus XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Well-formed corpus document whose tree does not nest books, chapters
    /// and verses as expected.
    #[error("corpus structure error: {0}")]
    CorpusStructure(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn bad_reference<S: Into<String>>(msg: S) -> Self {
        Error::BadReferenceFormat(msg.into())
    }

    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Error::InvalidArgument(msg.into())
    }

    pub fn corpus_structure<S: Into<String>>(msg: S) -> Self {
        Error::CorpusStructure(msg.into())
    }

    /// Book named by a lookup miss, whichever level of the chain failed.
    pub fn book(&self) -> Option<&str> {
        match self {
            Error::InvalidBookName { book }
            | Error::InvalidChapterIndex { book, .. }
            | Error::InvalidVerseIndex { book, .. } => Some(book),
            _ => None,
        }
    }

    /// True for the corpus lookup misses (book, chapter or verse).
    pub fn is_lookup_miss(&self) -> bool {
        self.book().is_some()
    }
}
