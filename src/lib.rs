//! Verse lookup over a book → chapter → verse corpus.
//!
//! Canonical references (`Genèse 1.1-5`, `1 Rois *.17`) select verses,
//! context windows widen a single verse across chapter boundaries, and
//! keyword rules (mandatory, one-of, forbidden words, exact phrases and
//! number ranges matched in digits or French words) filter and highlight the
//! verse text. [`Search`] ties these together over any [`Corpus`].

#[macro_use]
mod macros;
mod api;
mod corpus;
mod error;
mod locate;
mod matching;
mod numbers;
mod reference;

pub use api::{Hit, Search, Verses};
pub use corpus::{BookId, ChapterId, Corpus, MemoryCorpus, VerseId};
pub use error::{Error, Result};
pub use locate::Located;
pub use matching::{Compiler, KeywordRule, MatchConfig, MatchFlags, Matcher, RuleSet};
pub use numbers::spell;
pub use reference::{Reference, Span};
