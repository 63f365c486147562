//! Structural checks on LLM output, and extraction of the step text.

use regex::Regex;
use std::sync::OnceLock;

/// Most steps a plan may contain.
pub const MAX_STEPS: usize = 8;
/// Most words in a single numbered line, numeral included.
pub const MAX_WORDS_PER_STEP: usize = 12;

fn non_empty_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|line| !line.is_empty())
}

/// Accept only a 1..=8 line list numbered "1.", "2.", ... in order, with
/// at most 12 words per line.
pub fn validate(text: &str) -> bool {
    let lines: Vec<&str> = non_empty_lines(text).collect();
    if lines.is_empty() || lines.len() > MAX_STEPS {
        return false;
    }

    lines.iter().enumerate().all(|(i, line)| {
        line.starts_with(&format!("{}.", i + 1))
            && line.split_whitespace().count() <= MAX_WORDS_PER_STEP
    })
}

fn step_marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(r"^\d+\.\s*").expect("step marker regex is valid"))
}

/// Strip the "N." marker from each numbered line.
///
/// Lines without a marker and markers with no text after them are skipped.
pub fn parse_steps(text: &str) -> Vec<String> {
    let marker = step_marker();
    non_empty_lines(text)
        .filter_map(|line| {
            let m = marker.find(line)?;
            let step = line[m.end()..].trim();
            (!step.is_empty()).then(|| step.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_list() {
        assert!(validate("1. Open laptop\n2. Check inbox"));
        assert!(validate("\n  1. Open laptop  \n\n2. Check inbox\n"));
    }

    #[test]
    fn test_numbering_must_be_sequential() {
        assert!(!validate("1. Open laptop\n3. Check inbox"));
        assert!(!validate("2. Open laptop"));
        assert!(!validate("Here are your steps:\n1. Open laptop"));
    }

    #[test]
    fn test_line_count_limits() {
        assert!(!validate(""));
        assert!(!validate("  \n \n"));
        let eight: String = (1..=8).map(|i| format!("{}. Step\n", i)).collect();
        assert!(validate(&eight));
        let nine: String = (1..=9).map(|i| format!("{}. Step\n", i)).collect();
        assert!(!validate(&nine));
    }

    #[test]
    fn test_word_limit() {
        assert!(validate("1. a b c d e f g h i j k"));
        assert!(!validate("1. a b c d e f g h i j k l"));
    }

    #[test]
    fn test_space_after_period_not_required() {
        assert!(validate("1.Open laptop"));
    }

    #[test]
    fn test_parse_steps() {
        assert_eq!(
            parse_steps("1. Open laptop\n2.Check inbox\n3.   Reply once"),
            vec!["Open laptop", "Check inbox", "Reply once"]
        );
    }

    #[test]
    fn test_parse_skips_bare_markers() {
        assert_eq!(parse_steps("1. Open laptop\n2."), vec!["Open laptop"]);
        assert!(parse_steps("1.\n2.").is_empty());
    }

    #[test]
    fn test_parse_keeps_inner_periods() {
        assert_eq!(
            parse_steps("1. Go to docs.rs. Search"),
            vec!["Go to docs.rs. Search"]
        );
    }
}
