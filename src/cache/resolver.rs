//! Key Resolver Module
//!
//! Turns a delete search into the concrete keys it targets. A search is
//! either a literal key, a wildcard search, or a delimited pattern such as
//! `/^user:\d+$/i`.

use regex::Regex;
use tracing::warn;

use crate::cache::wildcard;
use crate::cache::CacheEntryDescriptor;

/// Default leading character of a delimited pattern.
pub const DEFAULT_DELIMITER: char = '/';

// == Search Pattern ==
/// Classification of a search string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPattern {
    /// Matched as an exact key name
    Literal,
    /// Contains `*` or `?`; carries the translated expression
    Wildcard(String),
    /// Starts with the delimiter; carries the raw delimited pattern
    Delimited(String),
}

// == Key Target ==
/// What a search resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyTarget {
    /// The search itself is the key
    Single(String),
    /// Keys matched by a pattern, in listing order; may be empty
    Many(Vec<String>),
}

// == Key Resolver ==
#[derive(Debug, Clone)]
pub struct KeyResolver {
    delimiter: char,
}

impl KeyResolver {
    // == Constructor ==
    pub fn new(delimiter: char) -> Self {
        Self { delimiter }
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    // == Classify ==
    /// Classifies a search. The delimiter check wins over wildcards.
    pub fn classify(&self, search: &str) -> SearchPattern {
        if search.starts_with(self.delimiter) {
            SearchPattern::Delimited(search.to_string())
        } else if wildcard::has_wildcard(search) {
            SearchPattern::Wildcard(wildcard::translate(search))
        } else {
            SearchPattern::Literal
        }
    }

    // == Resolve ==
    /// Resolves a search against an entry listing.
    ///
    /// `entries` is only called for pattern searches. A pattern that fails
    /// to compile matches nothing.
    pub fn resolve<F>(&self, search: &str, entries: F) -> KeyTarget
    where
        F: FnOnce() -> Vec<CacheEntryDescriptor>,
    {
        let regex = match self.classify(search) {
            SearchPattern::Literal => return KeyTarget::Single(search.to_string()),
            SearchPattern::Wildcard(expr) => Regex::new(&expr).ok(),
            SearchPattern::Delimited(raw) => self.compile_delimited(&raw),
        };

        let Some(regex) = regex else {
            warn!(search, "Search pattern is not a valid expression, matching nothing");
            return KeyTarget::Many(Vec::new());
        };

        let keys = entries()
            .into_iter()
            .filter(|entry| regex.is_match(&entry.key_name))
            .map(|entry| entry.key_name)
            .collect();

        KeyTarget::Many(keys)
    }

    /// Compiles `<d>body<d>flags` into a [`Regex`].
    ///
    /// Supported flags are `i`, `m`, `s`, `x`, `U` and a no-op `u`.
    pub fn compile_delimited(&self, raw: &str) -> Option<Regex> {
        let rest = raw.strip_prefix(self.delimiter)?;
        let close = rest.rfind(self.delimiter)?;
        let body = &rest[..close];
        let flags = &rest[close + self.delimiter.len_utf8()..];

        let mut inline = String::new();
        for flag in flags.chars() {
            match flag {
                'i' | 'm' | 's' | 'x' | 'U' => inline.push(flag),
                'u' => {}
                _ => return None,
            }
        }

        let expr = if inline.is_empty() {
            body.to_string()
        } else {
            format!("(?{}){}", inline, body)
        };
        Regex::new(&expr).ok()
    }
}

impl Default for KeyResolver {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER)
    }
}
