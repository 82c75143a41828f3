//! Memoized store of compiled naming patterns.
//!
//! Patterns are written by users as plain regular expressions and are matched
//! against the start of a name, so `[a-z].*` accepts `foo` and `fooBar` but
//! rejects `Foo`. Callers that need whole-name matching must end the pattern
//! with `$`.

use regex::Regex;
use std::collections::HashMap;

/// Compiled patterns keyed by their source text.
///
/// Entries are compiled on first use and live for the whole run.
#[derive(Debug, Default)]
pub struct PatternCache {
    compiled: HashMap<String, Regex>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the compiled form of `pattern`, compiling it if needed.
    pub fn get(&mut self, pattern: &str) -> Result<&Regex, regex::Error> {
        if !self.compiled.contains_key(pattern) {
            let regex = Regex::new(pattern)?;
            tracing::debug!(pattern, "compiled naming pattern");
            self.compiled.insert(pattern.to_string(), regex);
        }
        Ok(&self.compiled[pattern])
    }

    /// Check whether `pattern` matches `text` starting at its first character.
    ///
    /// Leftmost-first search reports a match at offset 0 whenever one exists.
    pub fn matches_prefix(&mut self, pattern: &str, text: &str) -> Result<bool, regex::Error> {
        Ok(self
            .get(pattern)?
            .find(text)
            .is_some_and(|m| m.start() == 0))
    }

    /// Number of distinct patterns compiled so far.
    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }
}

/// Check that `pattern` is a valid regular expression.
///
/// The text checked here is exactly the text [`PatternCache::get`] compiles.
pub fn validate(pattern: &str) -> Result<(), regex::Error> {
    Regex::new(pattern).map(|_| ())
}
