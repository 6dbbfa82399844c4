//! Canonical verse references.
//!
//! The canonical form is:
//!
//! ```text
//! Book[ ch1[-ch2][.vr1[-vr2]]]
//! ```
//!
//! where `Book` may start with `1 `, `2 ` or `3 ` and contain spaces, and
//! either index part may be `*`. For example `1 Rois 2-8.17-69` selects verses 17
//! to 69 of chapters 2 to 8, and `1 Rois *.17-69` verses 17 to 69 of every
//! chapter.
//!
//! [`Reference`] is plain data: it knows nothing about a corpus. Binding a
//! reference to a corpus is `locate::Located`'s job.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Selection along one level (chapters or verses).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Span {
    /// Every child (`*`, or an omitted part).
    All,
    /// One index; the low bound is the whole selection.
    Single(u32),
    /// Inclusive range, always `low < high`.
    Range { low: u32, high: u32 },
}

impl Span {
    /// Build a range, collapsing `low == high` to [`Span::Single`].
    ///
    /// Returns `None` when `low > high`.
    pub fn between(low: u32, high: u32) -> Option<Span> {
        match low.cmp(&high) {
            std::cmp::Ordering::Less => Some(Span::Range { low, high }),
            std::cmp::Ordering::Equal => Some(Span::Single(low)),
            std::cmp::Ordering::Greater => None,
        }
    }

    pub fn low(&self) -> Option<u32> {
        match *self {
            Span::All => None,
            Span::Single(n) | Span::Range { low: n, .. } => Some(n),
        }
    }

    pub fn high(&self) -> Option<u32> {
        match *self {
            Span::All => None,
            Span::Single(n) | Span::Range { high: n, .. } => Some(n),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Span::All)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Span::All => f.write_str("*"),
            Span::Single(n) => write!(f, "{n}"),
            Span::Range { low, high } => write!(f, "{low}-{high}"),
        }
    }
}

/// A book plus chapter and verse selections.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    pub book: String,
    pub chapters: Span,
    pub verses: Span,
}

impl Reference {
    /// Every verse of `book`.
    pub fn book(book: impl Into<String>) -> Self {
        Self { book: book.into(), chapters: Span::All, verses: Span::All }
    }

    /// A single verse.
    pub fn verse(book: impl Into<String>, chapter: u32, verse: u32) -> Self {
        Self { book: book.into(), chapters: Span::Single(chapter), verses: Span::Single(verse) }
    }

    /// Verses `low..=high` of one chapter.
    ///
    /// Fails when `low > high`.
    pub fn verses_of(book: impl Into<String>, chapter: u32, low: u32, high: u32) -> Result<Self> {
        let verses = Span::between(low, high).ok_or_else(|| Error::bad_reference("invalid verse range"))?;
        Ok(Self { book: book.into(), chapters: Span::Single(chapter), verses })
    }
}

impl FromStr for Reference {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        let caps = regex!(
            r"^(?P<book>(?:[123] )?[\w ]+?)(?: (?:(?P<chapter_low>\d+)(?:-(?P<chapter_high>\d+))?|(?P<any_chapter>\*))?(?:\.(?:(?P<verse_low>\d+)(?:-(?P<verse_high>\d+))?|(?P<any_verse>\*)))?)?$"
        )
        .captures(input)
        .ok_or_else(|| Error::bad_reference(format!("invalid reference \"{input}\"")))?;

        let book = caps.name("book").map(|m| m.as_str()).unwrap_or_default();
        let has_chapter = caps.name("chapter_low").is_some() || caps.name("any_chapter").is_some();
        let has_verse = caps.name("verse_low").is_some() || caps.name("any_verse").is_some();

        if !has_chapter {
            if has_verse {
                // A finer level cannot be given while a coarser one is omitted.
                return Err(Error::bad_reference("no chapter given"));
            }
            if input.len() != book.len() {
                // The separating space was consumed with nothing after it.
                return Err(Error::bad_reference(format!("invalid reference \"{input}\"")));
            }
        }

        let chapters = span_from(caps.name("chapter_low"), caps.name("chapter_high"), input)?
            .ok_or_else(|| Error::bad_reference("invalid chapter range"))?;
        let verses = span_from(caps.name("verse_low"), caps.name("verse_high"), input)?
            .ok_or_else(|| Error::bad_reference("invalid verse range"))?;

        Ok(Reference { book: book.to_string(), chapters, verses })
    }
}

/// Turn a low/high capture pair into a span. `Ok(None)` flags a range whose
/// bounds are not strictly increasing.
fn span_from(low: Option<regex::Match<'_>>, high: Option<regex::Match<'_>>, input: &str) -> Result<Option<Span>> {
    let Some(low) = low else {
        return Ok(Some(Span::All));
    };
    let low = parse_index(low.as_str(), input)?;
    match high {
        None => Ok(Some(Span::Single(low))),
        Some(high) => {
            let high = parse_index(high.as_str(), input)?;
            Ok((low < high).then_some(Span::Range { low, high }))
        }
    }
}

fn parse_index(digits: &str, input: &str) -> Result<u32> {
    digits.parse::<u32>().map_err(|_| Error::bad_reference(format!("invalid reference \"{input}\"")))
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.book)?;
        match (self.chapters, self.verses) {
            (Span::All, Span::All) => Ok(()),
            (chapters, Span::All) => write!(f, " {chapters}"),
            (chapters, verses) => write!(f, " {chapters}.{verses}"),
        }
    }
}
