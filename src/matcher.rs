use crate::models::Mapping;

/// Canonical form of a description for mapping lookups: trimmed and
/// lowercased. Mapping keys are stored already normalized.
pub fn normalize(description: &str) -> String {
    description.trim().to_lowercase()
}

/// Test a wildcard pattern against a normalized description. Three shapes
/// are supported: `*suffix`, `prefix*` and `*substring*`. Anything without
/// a leading or trailing `*` is not a pattern and never matches here.
pub fn pattern_matches(pattern: &str, normalized: &str) -> bool {
    let pattern = pattern.to_lowercase();
    if pattern.starts_with('*') && pattern.ends_with('*') && pattern.len() >= 2 {
        let keyword = &pattern[1..pattern.len() - 1];
        normalized.contains(keyword)
    } else if let Some(suffix) = pattern.strip_prefix('*') {
        normalized.ends_with(suffix)
    } else if let Some(prefix) = pattern.strip_suffix('*') {
        normalized.starts_with(prefix)
    } else {
        false
    }
}

/// Resolve a description against the mapping table.
///
/// Exact normalized-description entries always win; wildcard entries are
/// tried in table iteration order and the first match is taken. This is
/// the single resolver used by categorization, the DRE aggregation and
/// the uncategorized listing.
pub fn resolve<'a>(description: &str, mappings: &'a [Mapping]) -> Option<&'a Mapping> {
    let normalized = normalize(description);

    if let Some(exact) = mappings
        .iter()
        .find(|m| !m.key.contains('*') && m.key == normalized)
    {
        return Some(exact);
    }

    mappings
        .iter()
        .filter(|m| m.key.contains('*'))
        .find(|m| pattern_matches(&m.key, &normalized))
}
