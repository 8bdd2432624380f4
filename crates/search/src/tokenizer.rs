//! Tokenizer for indexing and query processing
//!
//! Word tokens are runs of alphanumeric characters or `_`, lowercased, at
//! least 2 characters long. The same function is used for documents and
//! queries so that both sides agree on term boundaries.

use std::collections::HashSet;

/// Minimum token length in characters
pub const MIN_TOKEN_LEN: usize = 2;

/// Longest prefix stored in the prefix postings
pub const MAX_PREFIX_LEN: usize = 4;

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Tokenize text into searchable terms
///
/// - Lowercase
/// - Split on anything that is not a word character
/// - Filter tokens shorter than 2 characters
///
/// # Example
///
/// ```
/// use compass_search::tokenizer::tokenize;
///
/// let tokens = tokenize("Primary action: Button!");
/// assert_eq!(tokens, vec!["primary", "action", "button"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !is_word_char(c))
        .filter(|s| s.chars().count() >= MIN_TOKEN_LEN)
        .map(String::from)
        .collect()
}

/// Tokenize and deduplicate, preserving first-seen order
///
/// # Example
///
/// ```
/// use compass_search::tokenizer::tokenize_unique;
///
/// let tokens = tokenize_unique("test test TEST");
/// assert_eq!(tokens, vec!["test"]);
/// ```
pub fn tokenize_unique(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    tokenize(text)
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// Split a camelCase or PascalCase name into word tokens
///
/// # Example
///
/// ```
/// use compass_search::tokenizer::camel_case_tokens;
///
/// assert_eq!(camel_case_tokens("DropdownMenuItem"), vec!["dropdown", "menu", "item"]);
/// ```
pub fn camel_case_tokens(name: &str) -> Vec<String> {
    let mut spaced = String::with_capacity(name.len() + 8);
    for c in name.chars() {
        if c.is_uppercase() {
            spaced.push(' ');
        }
        spaced.push(c);
    }
    tokenize(&spaced)
}

/// Prefixes of a token stored for partial matching (lengths 2..=4)
pub fn prefixes(token: &str) -> Vec<String> {
    let chars: Vec<char> = token.chars().collect();
    let max = MAX_PREFIX_LEN.min(chars.len());
    (MIN_TOKEN_LEN..=max)
        .map(|len| chars[..len].iter().collect())
        .collect()
}

/// Truncate a token to the longest stored prefix length
pub fn prefix_key(token: &str) -> String {
    token.chars().take(MAX_PREFIX_LEN).collect()
}
