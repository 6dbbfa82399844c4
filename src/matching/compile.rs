//! Rule compilation.
//!
//! Every matcher's pattern wraps the matchable span in capture group 1; the
//! highlighter wraps exactly that group.
//!
//! Number ranges need negative lookbehind/lookahead ("2" must not match the
//! "deux" of "vingt-deux"), which the `regex` crate does not offer. A number
//! matcher therefore carries a `NumberGuard`: a candidate match is rejected
//! when the text before it ends with a number word and a separator, or the
//! text after it starts with a separator and a number word, and the search
//! resumes one character further.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use tracing::debug;

use super::MatchFlags;
use crate::error::{Error, Result};
use crate::numbers::{NUMBER_FRAGMENTS, spell};

/// Letters folded together when matching is accent-insensitive. Lower and
/// upper case are separate groups; case folding is the regex engine's job.
const ACCENT_GROUPS: [&str; 12] = [
    "ÀÁÂÄÆA", "àáâäæa", "ÈÉÊËE", "èéêëe", "ÌÍÎÏI", "ìíîïi", "ÑN", "ñn", "ÒÓÔÖO", "òóôöo", "ÙÚÛÜU", "ùúûüu",
];

/// Most integers a single number range may cover.
const MAX_RANGE_LEN: u64 = 10_000;

/// Space or hyphen: spelled numbers use both.
const SEPARATOR: &str = "[ -]";

/// Tails that turn a spelled number into a larger one without being number
/// words themselves ("vingt" + "-et-un"). The `before` guard covers the
/// other side ("vingt-et-" + "un").
const LIGATURE_TAILS: &[&str] = &["et[ -]un", "et[ -]onze"];

#[derive(Debug)]
struct NumberGuard {
    before: Regex,
    after: Regex,
}

impl NumberGuard {
    fn build(case_insensitive: bool) -> NumberGuard {
        let fragments = NUMBER_FRAGMENTS.join("|");
        let tails = LIGATURE_TAILS.join("|");
        // A unit right after "vingt-et-" is the tail of the compound.
        let before = format!(r"\b(?:{fragments})s?{SEPARATOR}(?:et{SEPARATOR})?$");
        let after = format!(r"^{SEPARATOR}(?:{tails}|{fragments})s?\b");
        NumberGuard {
            before: RegexBuilder::new(&before)
                .case_insensitive(case_insensitive)
                .build()
                .expect("number guard must compile"),
            after: RegexBuilder::new(&after)
                .case_insensitive(case_insensitive)
                .build()
                .expect("number guard must compile"),
        }
    }

    fn rejects(&self, text: &str, span: &Range<usize>) -> bool {
        self.before.is_match(&text[..span.start]) || self.after.is_match(&text[span.end..])
    }
}

static GUARD_CASED: Lazy<NumberGuard> = Lazy::new(|| NumberGuard::build(false));
static GUARD_FOLDED: Lazy<NumberGuard> = Lazy::new(|| NumberGuard::build(true));

/// A compiled rule.
#[derive(Debug, Clone)]
pub struct Matcher {
    pattern: Regex,
    guard: Option<&'static NumberGuard>,
}

impl Matcher {
    /// Source of the compiled pattern (without guards).
    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.next_match(text, 0).is_some()
    }

    /// Byte ranges of the non-overlapping accepted matches, left to right.
    pub fn find_spans(&self, text: &str) -> Vec<Range<usize>> {
        let mut spans = Vec::new();
        let mut at = 0;
        while let Some(span) = self.next_match(text, at) {
            at = if span.is_empty() { step(text, span.end) } else { span.end };
            spans.push(span);
        }
        spans
    }

    /// Wrap every accepted match with `marker` on both sides, in one pass.
    pub fn wrap(&self, text: &str, marker: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for span in self.find_spans(text) {
            out.push_str(&text[last..span.start]);
            out.push_str(marker);
            out.push_str(&text[span.clone()]);
            out.push_str(marker);
            last = span.end;
        }
        out.push_str(&text[last..]);
        out
    }

    fn next_match(&self, text: &str, mut at: usize) -> Option<Range<usize>> {
        while at <= text.len() {
            let caps = self.pattern.captures_at(text, at)?;
            let span = caps.get(1)?.range();
            match self.guard {
                Some(guard) if guard.rejects(text, &span) => at = step(text, span.start),
                _ => return Some(span),
            }
        }
        None
    }
}

/// Byte offset of the character after the one starting at `at`.
fn step(text: &str, at: usize) -> usize {
    at + text[at..].chars().next().map_or(1, char::len_utf8)
}

/// Builds matchers from rule literals under a fixed set of flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct Compiler {
    flags: MatchFlags,
}

impl Compiler {
    pub fn new(flags: MatchFlags) -> Self {
        Self { flags }
    }

    pub fn flags(&self) -> MatchFlags {
        self.flags
    }

    /// Matcher for a word or an exact phrase, matched literally.
    pub fn keyword(&self, literal: &str) -> Result<Matcher> {
        if literal.is_empty() {
            return Err(Error::invalid_argument("empty keyword"));
        }

        let mut body = if self.flags.contains(MatchFlags::ACCENT_SENSITIVE) {
            regex::escape(literal)
        } else {
            fold_accents(literal)
        };
        if self.flags.contains(MatchFlags::WHOLE_WORD) {
            body = format!(r"\b{body}\b");
        }

        let pattern = RegexBuilder::new(&format!("({body})"))
            .case_insensitive(!self.flags.contains(MatchFlags::CASE_SENSITIVE))
            .build()?;
        debug!(literal, pattern = pattern.as_str(), flags = ?self.flags, "compiled keyword");
        Ok(Matcher { pattern, guard: None })
    }

    /// Matcher for every integer of `low..=high` (or `low` alone), written
    /// with digits or spelled out.
    ///
    /// Number ranges always match whole words and ignore accent folding; only
    /// the case flag applies.
    pub fn number_range(&self, low: i64, high: Option<i64>) -> Result<Matcher> {
        if low < 0 || high.is_some_and(|h| h < 0) {
            return Err(Error::invalid_argument("expect non-negative integers"));
        }
        let low = low as u64;
        let high = match high {
            Some(h) if (h as u64) <= low => return Err(Error::invalid_argument("the range is not valid")),
            Some(h) => h as u64,
            None => low,
        };
        if high - low >= MAX_RANGE_LEN {
            return Err(Error::invalid_argument(format!(
                "number range too large ({low}-{high}, at most {MAX_RANGE_LEN} numbers)"
            )));
        }

        let mut alternatives: Vec<String> = Vec::new();
        for n in low..=high {
            alternatives.push(n.to_string());
            let spelled: Vec<String> = spell(n).split([' ', '-']).map(regex::escape).collect();
            alternatives.push(spelled.join(SEPARATOR));
        }
        // Longest first, so a guard rejecting "vingt" never hides "vingt-deux".
        alternatives.sort_by_key(|a| std::cmp::Reverse(a.len()));

        let case_insensitive = !self.flags.contains(MatchFlags::CASE_SENSITIVE);
        let pattern = RegexBuilder::new(&format!(r"\b({})\b", alternatives.join("|")))
            .case_insensitive(case_insensitive)
            .build()?;
        debug!(low, high, alternatives = alternatives.len(), "compiled number range");

        let guard: &'static NumberGuard = if case_insensitive { &GUARD_FOLDED } else { &GUARD_CASED };
        Ok(Matcher { pattern, guard: Some(guard) })
    }
}

/// Escape `literal`, replacing each foldable letter with its accent class.
fn fold_accents(literal: &str) -> String {
    let mut out = String::with_capacity(literal.len() * 2);
    let mut buf = [0u8; 4];
    for ch in literal.chars() {
        match ACCENT_GROUPS.iter().find(|group| group.contains(ch)) {
            Some(group) => {
                out.push('[');
                out.push_str(group);
                out.push(']');
            }
            None => out.push_str(&regex::escape(ch.encode_utf8(&mut buf))),
        }
    }
    out
}
