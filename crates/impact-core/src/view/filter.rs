// ── Search-term filtering ──

/// Trimmed search term; `None` when there is nothing to filter on.
pub fn normalize_term(term: &str) -> Option<String> {
    let term = term.trim();
    (!term.is_empty()).then(|| term.to_lowercase())
}

/// Case-insensitive substring match against an already-normalized term.
pub fn identifier_matches(identifier: &str, normalized_term: &str) -> bool {
    identifier.to_lowercase().contains(normalized_term)
}
