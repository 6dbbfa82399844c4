//! Keyword, phrase and number-range matching over verse text.
//!
//! ## How the parts work together
//!
//! ```text
//! MatchConfig.flags ──> Compiler (snapshot)      (compile.rs)
//!                          │  keyword / phrase  -> Matcher (escaped, accent
//!                          │                       classes, \b, group 1, (?i))
//!                          │  number range      -> Matcher (digit + spelled
//!                          │                       alternation, overlap guards)
//!                          v
//!                       RuleSet                  (rules.rs)
//!                          ├─ mandatory   all must hit
//!                          ├─ one-of      one must hit (words, phrases, ranges)
//!                          └─ forbidden   none may hit
//!                          │
//!                          ├─ admits(text)
//!                          └─ highlight(text, marker)
//! ```
//!
//! Compilation is a snapshot: a `Matcher` keeps the flags it was built with,
//! so changing the configuration only affects rules added afterwards.

#[path = "matching/compile.rs"]
mod compile;
#[path = "matching/rules.rs"]
mod rules;

#[cfg(test)]
#[path = "matching/tests.rs"]
mod tests;

pub use compile::{Compiler, Matcher};
pub use rules::{KeywordRule, RuleSet};

bitflags::bitflags! {
    /// Matching switches. The default is case- and accent-insensitive,
    /// whole-word matching.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MatchFlags: u8 {
        const CASE_SENSITIVE   = 1 << 0;
        const ACCENT_SENSITIVE = 1 << 1;
        const WHOLE_WORD       = 1 << 2;
    }
}

impl Default for MatchFlags {
    fn default() -> Self {
        MatchFlags::WHOLE_WORD
    }
}

/// Per-session matching configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchConfig {
    pub flags: MatchFlags,
    /// Wraps every highlighted match on both sides when set.
    pub highlight: Option<String>,
}

impl MatchConfig {
    pub fn compiler(&self) -> Compiler {
        Compiler::new(self.flags)
    }
}
