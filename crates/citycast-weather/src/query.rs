//! Free-text query helpers shared by the resolver and the client.

/// Minimum number of characters a query needs before it is worth resolving.
pub const MIN_QUERY_LEN: usize = 2;

/// Trim and collapse every internal whitespace run to a single space.
pub fn normalize(query: &str) -> String {
    query.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Length in characters, not bytes.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// First whitespace-delimited word of a normalized query.
pub fn first_word(normalized: &str) -> &str {
    normalized.split(' ').next().unwrap_or("")
}

/// Last whitespace-delimited word of a normalized query.
pub fn last_word(normalized: &str) -> &str {
    normalized.rsplit(' ').next().unwrap_or("")
}

/// Up to `n` leading characters of `s`.
pub fn char_prefix(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
