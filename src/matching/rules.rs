//! Rule groups and the verse admission test.

use tracing::trace;

use super::{Compiler, Matcher};
use crate::error::Result;

/// A keyword rule as registered by a caller.
///
/// Exact phrases and number ranges join the one-of group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeywordRule {
    Mandatory(String),
    OneOf(String),
    Forbidden(String),
    ExactPhrase(String),
    NumberRange { low: i64, high: Option<i64> },
}

/// Compiled rules, grouped by how they gate a verse.
///
/// Groups only grow, in registration order, until [`RuleSet::clear`].
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    mandatory: Vec<Matcher>,
    one_of: Vec<Matcher>,
    forbidden: Vec<Matcher>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile `rule` with `compiler` and append it to its group.
    pub fn add(&mut self, compiler: &Compiler, rule: &KeywordRule) -> Result<()> {
        match rule {
            KeywordRule::Mandatory(word) => self.mandatory.push(compiler.keyword(word)?),
            KeywordRule::OneOf(word) | KeywordRule::ExactPhrase(word) => self.one_of.push(compiler.keyword(word)?),
            KeywordRule::Forbidden(word) => self.forbidden.push(compiler.keyword(word)?),
            KeywordRule::NumberRange { low, high } => self.one_of.push(compiler.number_range(*low, *high)?),
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.mandatory.clear();
        self.one_of.clear();
        self.forbidden.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.mandatory.is_empty() && self.one_of.is_empty() && self.forbidden.is_empty()
    }

    /// Number of compiled rules in the (mandatory, one-of, forbidden) groups.
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.mandatory.len(), self.one_of.len(), self.forbidden.len())
    }

    /// Every mandatory rule hits, one one-of rule hits (if there are any),
    /// and no forbidden rule hits.
    pub fn admits(&self, text: &str) -> bool {
        if let Some(missing) = self.mandatory.iter().find(|m| !m.is_match(text)) {
            trace!(pattern = missing.as_str(), "mandatory rule missing");
            return false;
        }
        if !self.one_of.is_empty() && !self.one_of.iter().any(|m| m.is_match(text)) {
            trace!("no one-of rule hit");
            return false;
        }
        if let Some(hit) = self.forbidden.iter().find(|m| m.is_match(text)) {
            trace!(pattern = hit.as_str(), "forbidden rule hit");
            return false;
        }
        true
    }

    /// Wrap the matches of every mandatory, then every one-of rule with
    /// `marker`.
    ///
    /// Each rule makes one pass over the text as left by the previous rules,
    /// so a span matched by two rules is wrapped twice, and highlighting
    /// already highlighted text wraps it again.
    pub fn highlight(&self, text: &str, marker: &str) -> String {
        self.mandatory.iter().chain(&self.one_of).fold(text.to_string(), |acc, m| m.wrap(&acc, marker))
    }
}
