//! Search sessions.
//!
//! A [`Search`] collects references and keyword rules over one corpus;
//! [`Search::verses`] walks them lazily:
//!
//! ```text
//!   references ──► Located ──► chapters ──► verses ──► RuleSet::admits ──► Hit
//!   (or every book)                                     highlight (optional)
//! ```
//!
//! Lookup errors end the walk after being yielded once.

use std::borrow::Cow;
use std::collections::HashSet;
use std::iter::FusedIterator;
use std::ops::RangeInclusive;

use tracing::{debug, trace};

use crate::corpus::Corpus;
use crate::error::Result;
use crate::locate::Located;
use crate::matching::{KeywordRule, MatchConfig, MatchFlags, RuleSet};
use crate::reference::Reference;

/// A verse that passed the keyword rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    /// Single-verse reference, book name as the corpus spells it.
    pub reference: Reference,
    /// Verse text with alternate numbering removed, highlighted when
    /// highlighting is on.
    pub text: String,
}

/// A search session over one corpus.
///
/// References and rules accumulate until [`Search::reset`]. Rules are
/// compiled when added, with the flags in effect at that moment.
///
/// # Example
/// ```
/// use versefind::{MemoryCorpus, Search};
///
/// let mut corpus = MemoryCorpus::new();
/// let ruth = corpus.push_book("Ruth");
/// corpus.push_chapter(ruth, 1, [Some("Au temps des juges"), Some("Il y eut une famine")]);
///
/// let mut search = Search::new(&corpus);
/// search.add_mandatory_keywords(["famine"]).unwrap();
/// let hits: Vec<_> = search.verses().collect::<Result<_, _>>().unwrap();
/// assert_eq!(hits.len(), 1);
/// assert_eq!(hits[0].reference.to_string(), "Ruth 1.2");
/// ```
#[derive(Debug)]
pub struct Search<'c, C: Corpus> {
    corpus: &'c C,
    references: Vec<Reference>,
    seen: HashSet<String>,
    config: MatchConfig,
    rules: RuleSet,
}

impl<'c, C: Corpus> Search<'c, C> {
    pub fn new(corpus: &'c C) -> Self {
        Self::with_config(corpus, MatchConfig::default())
    }

    pub fn with_config(corpus: &'c C, config: MatchConfig) -> Self {
        Self { corpus, references: Vec::new(), seen: HashSet::new(), config, rules: RuleSet::new() }
    }

    pub fn corpus(&self) -> &'c C {
        self.corpus
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Registered references, in insertion order.
    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    /// Register a canonical reference as is. The corpus is not consulted
    /// until enumeration.
    pub fn add_reference(&mut self, reference: &str) -> Result<()> {
        let reference = reference.parse()?;
        self.push_reference(reference);
        Ok(())
    }

    /// Register the context window of `left` verses before and `right`
    /// verses after the verse `reference` points at.
    pub fn add_contextual_reference(&mut self, reference: &str, left: u32, right: u32) -> Result<()> {
        let located = Located::new(self.corpus, reference.parse()?);
        for reference in located.overflow(left, right)? {
            self.push_reference(reference);
        }
        Ok(())
    }

    fn push_reference(&mut self, reference: Reference) {
        // Keyed by canonical form; a repeat keeps its first position.
        if self.seen.insert(reference.to_string()) {
            self.references.push(reference);
        } else {
            trace!(%reference, "duplicate reference ignored");
        }
    }

    pub fn add_mandatory_keywords<I, S>(&mut self, words: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.add_rules(words.into_iter().map(|w| KeywordRule::Mandatory(w.as_ref().to_string())))
    }

    pub fn add_one_of_keywords<I, S>(&mut self, words: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.add_rules(words.into_iter().map(|w| KeywordRule::OneOf(w.as_ref().to_string())))
    }

    pub fn add_none_of_keywords<I, S>(&mut self, words: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.add_rules(words.into_iter().map(|w| KeywordRule::Forbidden(w.as_ref().to_string())))
    }

    pub fn add_exact_expression(&mut self, phrase: &str) -> Result<()> {
        self.add_rule(KeywordRule::ExactPhrase(phrase.to_string()))
    }

    /// Match any integer of `low..=high`, or `low` alone when `high` is
    /// `None`, in digits or spelled out in French.
    pub fn add_number_in_range(&mut self, low: i64, high: Option<i64>) -> Result<()> {
        self.add_rule(KeywordRule::NumberRange { low, high })
    }

    pub fn add_rule(&mut self, rule: KeywordRule) -> Result<()> {
        self.add_rules([rule])
    }

    /// Compile every rule before registering any, so a bad one leaves the
    /// session untouched.
    fn add_rules(&mut self, rules: impl IntoIterator<Item = KeywordRule>) -> Result<()> {
        let compiler = self.config.compiler();
        let mut next = self.rules.clone();
        for rule in rules {
            next.add(&compiler, &rule)?;
        }
        self.rules = next;
        Ok(())
    }

    pub fn set_case_sensitive(&mut self, sensitive: bool) {
        self.config.flags.set(MatchFlags::CASE_SENSITIVE, sensitive);
    }

    pub fn set_accent_sensitive(&mut self, sensitive: bool) {
        self.config.flags.set(MatchFlags::ACCENT_SENSITIVE, sensitive);
    }

    pub fn set_whole_word(&mut self, whole_word: bool) {
        self.config.flags.set(MatchFlags::WHOLE_WORD, whole_word);
    }

    /// Wrap every highlighted match with `marker` on both sides.
    pub fn enable_highlighting(&mut self, marker: impl Into<String>) {
        self.config.highlight = Some(marker.into());
    }

    pub fn disable_highlighting(&mut self) {
        self.config.highlight = None;
    }

    /// Forget every reference and rule. Flags and highlighting are kept.
    pub fn reset(&mut self) {
        self.references.clear();
        self.seen.clear();
        self.rules.clear();
    }

    /// Lazily walk the selected verses and yield those the rules admit.
    ///
    /// Without references the whole corpus is walked in document order.
    /// A failed lookup is yielded once and ends the sequence.
    pub fn verses(&self) -> Verses<'_, 'c, C> {
        let books = if self.references.is_empty() { self.corpus.books() } else { Vec::new() };
        Verses {
            search: self,
            books: books.into_iter(),
            references: self.references.iter(),
            located: None,
            chapters: Cursor::Idle,
            chapter: None,
            verses: Cursor::Idle,
            done: false,
        }
    }

    fn hit(&self, chapter: C::Chapter, verse: C::Verse) -> Option<Hit> {
        let text = strip_alternate_numbering(self.corpus.text(verse)?);
        let reference = Reference::verse(
            self.corpus.book_name(self.corpus.parent_book(chapter)),
            self.corpus.chapter_index(chapter),
            self.corpus.verse_index(verse),
        );
        if !self.rules.admits(&text) {
            trace!(%reference, "verse rejected");
            return None;
        }

        let text = match &self.config.highlight {
            Some(marker) => self.rules.highlight(&text, marker),
            None => text.into_owned(),
        };
        Some(Hit { reference, text })
    }
}

/// Drop inline secondary numbering such as `(12:3) ` or `(4.5)`.
fn strip_alternate_numbering(text: &str) -> Cow<'_, str> {
    regex!(r"\(\d+[.:-]\d+\) ?").replace_all(text, "")
}

/// Position inside one level of the tree: either a list of nodes handed out
/// by the corpus, or indices still to be looked up under `parent`.
#[derive(Debug)]
enum Cursor<P, N> {
    Idle,
    Listed(std::vec::IntoIter<N>),
    Indexed { parent: P, indices: RangeInclusive<u32> },
}

impl<P: Copy, N> Cursor<P, N> {
    fn advance(&mut self, lookup: impl FnOnce(P, u32) -> Result<N>) -> Result<Option<N>> {
        match self {
            Cursor::Idle => Ok(None),
            Cursor::Listed(nodes) => Ok(nodes.next()),
            Cursor::Indexed { parent, indices } => indices.next().map(|index| lookup(*parent, index)).transpose(),
        }
    }
}

/// Iterator returned by [`Search::verses`].
pub struct Verses<'s, 'c, C: Corpus> {
    search: &'s Search<'c, C>,
    books: std::vec::IntoIter<C::Book>,
    references: std::slice::Iter<'s, Reference>,
    located: Option<Located<'c, C>>,
    chapters: Cursor<C::Book, C::Chapter>,
    chapter: Option<C::Chapter>,
    verses: Cursor<C::Chapter, C::Verse>,
    done: bool,
}

impl<C: Corpus> Verses<'_, '_, C> {
    fn next_verse(&mut self) -> Result<Option<(C::Chapter, C::Verse)>> {
        let corpus = self.search.corpus;
        loop {
            if let Some(chapter) = self.chapter {
                if let Some(verse) = self.verses.advance(|chapter, index| corpus.verse(chapter, index))? {
                    return Ok(Some((chapter, verse)));
                }
            }

            let Some(chapter) = self.next_chapter()? else {
                return Ok(None);
            };
            self.chapter = Some(chapter);
            self.verses = match &self.located {
                Some(located) => Cursor::Indexed { parent: chapter, indices: located.verse_indices(chapter) },
                None => Cursor::Listed(corpus.verses(chapter).into_iter()),
            };
        }
    }

    fn next_chapter(&mut self) -> Result<Option<C::Chapter>> {
        let corpus = self.search.corpus;
        loop {
            if let Some(chapter) = self.chapters.advance(|book, index| corpus.chapter(book, index))? {
                return Ok(Some(chapter));
            }

            if let Some(book) = self.books.next() {
                self.chapters = Cursor::Listed(corpus.chapters(book).into_iter());
            } else if let Some(reference) = self.references.next() {
                debug!(%reference, "walking reference");
                let located = Located::new(corpus, reference.clone());
                self.chapters = Cursor::Indexed { parent: located.book_node()?, indices: located.chapter_indices()? };
                self.located = Some(located);
            } else {
                return Ok(None);
            }
        }
    }
}

impl<C: Corpus> Iterator for Verses<'_, '_, C> {
    type Item = Result<Hit>;

    fn next(&mut self) -> Option<Result<Hit>> {
        while !self.done {
            match self.next_verse() {
                Ok(Some((chapter, verse))) => {
                    if let Some(hit) = self.search.hit(chapter, verse) {
                        return Some(Ok(hit));
                    }
                }
                Ok(None) => self.done = true,
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            }
        }
        None
    }
}

impl<C: Corpus> FusedIterator for Verses<'_, '_, C> {}
