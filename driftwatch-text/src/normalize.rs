//! Canonical text form for fuzzy label matching.
//!
//! Pipeline, in order:
//! 1. fold unicode dashes (en, em, minus, hyphen variants) to `-`
//! 2. strip a leading run of whitespace, `-`, `•` and `*`
//! 3. collapse whitespace runs to one space and trim
//! 4. lowercase

const DASHES: &[char] = &['\u{2010}', '\u{2011}', '\u{2013}', '\u{2014}', '\u{2212}'];

fn is_bullet_prefix(c: char) -> bool {
    c.is_whitespace() || matches!(c, '-' | '•' | '*')
}

/// Normalize `text` for comparison.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .chars()
        .map(|c| if DASHES.contains(&c) { '-' } else { c })
        .collect();
    let stripped = folded.trim_start_matches(is_bullet_prefix);
    stripped.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// `true` iff `label` normalizes to something non-empty that is contained in
/// at least one normalized snippet.
pub fn matches<S: AsRef<str>>(label: &str, snippets: &[S]) -> bool {
    let needle = normalize(label);
    if needle.is_empty() {
        return false;
    }
    snippets.iter().any(|s| normalize(s.as_ref()).contains(&needle))
}

/// Expected labels with no match among `snippets`, in input order.
pub fn missing_labels<S: AsRef<str>>(expected: &[String], snippets: &[S]) -> Vec<String> {
    // Normalize the haystack once; expected lists are short, snippet lists are not.
    let haystack: Vec<String> = snippets.iter().map(|s| normalize(s.as_ref())).collect();
    expected
        .iter()
        .filter(|label| {
            let needle = normalize(label);
            needle.is_empty() || !haystack.iter().any(|s| s.contains(&needle))
        })
        .cloned()
        .collect()
}
