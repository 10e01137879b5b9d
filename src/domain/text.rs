use unicode_normalization::UnicodeNormalization;

/// Keeps at most `limit` codepoints.
pub fn truncate(value: &str, limit: usize) -> String {
    value.chars().take(limit).collect()
}

/// Truncates to `limit`, strips diacritics and drops anything that has no
/// ASCII decomposition.
///
/// Compatibility decompositions can expand a character ("ﬁ" becomes "fi"), so
/// the result is truncated a second time.
pub fn to_ascii(value: &str, limit: usize) -> String {
    truncate(value, limit)
        .nfkd()
        .filter(char::is_ascii)
        .take(limit)
        .collect()
}
