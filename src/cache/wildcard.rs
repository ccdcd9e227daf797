//! Wildcard Module
//!
//! Translates unix-style wildcard searches (`*` and `?`) into regular
//! expressions.

use regex::Regex;

/// Translates a wildcard search into an anchored regular expression.
///
/// - `*` becomes a lazy `.*?`
/// - `?` becomes exactly one character
/// - everything else is escaped and matched literally
///
/// The result is anchored at the start unless the search begins with `*`,
/// and at the end unless it ends with `*`.
pub fn translate(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() * 2 + 2);
    let mut literal = String::new();

    if !search.starts_with('*') {
        pattern.push('^');
    }

    for c in search.chars() {
        match c {
            '*' | '?' => {
                pattern.push_str(&regex::escape(&literal));
                literal.clear();
                pattern.push_str(if c == '*' { ".*?" } else { "." });
            }
            _ => literal.push(c),
        }
    }
    pattern.push_str(&regex::escape(&literal));

    if !search.ends_with('*') {
        pattern.push('$');
    }

    pattern
}

/// Compiles a wildcard search into a [`Regex`].
pub fn compile(search: &str) -> Result<Regex, regex::Error> {
    Regex::new(&translate(search))
}

/// Returns true if the search contains a wildcard character.
pub fn has_wildcard(search: &str) -> bool {
    search.contains(['*', '?'])
}
