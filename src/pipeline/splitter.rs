//! Splitting a request like "clean room and reply to email" into tasks.

/// Split raw text into trimmed, capitalized task strings.
///
/// Every literal `" and "` acts as a comma. Empty segments are dropped and
/// the left-to-right order is kept.
pub fn split(text: &str) -> Vec<String> {
    text.replace(" and ", ",")
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(capitalize)
        .collect()
}

/// Upper-case the first character and lower-case the rest.
fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
