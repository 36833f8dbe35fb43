/// Normalizes a hostname for comparison: all whitespace is removed and the
/// result is lower-cased.
pub fn sanitize(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Sanitizes each of `raw`, dropping entries that are empty or that repeat an
/// earlier entry. Declared order is preserved.
pub(crate) fn collect<'a>(raw: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut domains = Vec::new();
    for domain in raw.into_iter().map(sanitize) {
        if !domain.is_empty() && !domains.contains(&domain) {
            domains.push(domain);
        }
    }
    domains
}
