/// Collapse every whitespace run to a single space and trim both ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize raw label text for display.
///
/// Trims, collapses internal whitespace, and strips trailing `*` / `:`
/// (required-field markers and label colons), e.g. `" Full Name: * "` becomes
/// `"Full Name"`.
pub fn clean_label_text(text: &str) -> String {
    let collapsed = collapse_whitespace(text);
    collapsed
        .trim_end_matches(|c: char| c == '*' || c == ':' || c.is_whitespace())
        .to_string()
}

/// Character count (not bytes) used for every length bound.
pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}
