use super::CatalogEntry;

/// Characters with special meaning in a regular expression
const METACHARACTERS: &[char] = &[
    '.', '*', '+', '-', '?', '^', '$', '{', '}', '(', ')', '|', '[', ']', '\\',
];

/// Strip pattern metacharacters, the result is always a literal pattern
pub fn sanitize_query(raw: &str) -> String {
    raw.chars().filter(|c| !METACHARACTERS.contains(c)).collect()
}

/// Filter the catalog by symbol or name, case-insensitive.
///
/// An empty raw query yields nothing: search is query driven. A query that
/// sanitizes down to nothing behaves like an empty pattern and matches every
/// entry.
pub fn filter(catalog: &[CatalogEntry], query: &str) -> Vec<CatalogEntry> {
    if query.is_empty() {
        return Vec::new();
    }

    let needle = sanitize_query(query).to_lowercase();
    catalog
        .iter()
        .filter(|entry| matches(entry, &needle))
        .cloned()
        .collect()
}

fn matches(entry: &CatalogEntry, needle: &str) -> bool {
    entry.symbol.as_str().to_lowercase().contains(needle)
        || entry.name.to_lowercase().contains(needle)
}
