//! Screening of raw user text before it reaches the pipeline.
//!
//! Matching is plain substring containment on the lower-cased text, so a
//! harmless word that happens to contain a blocked fragment ("whyte",
//! "feeling") is rejected too.

use std::fmt;

/// Upper bound on whitespace-separated words in an accepted request.
pub const MAX_INPUT_WORDS: usize = 10;

/// Why a blocklist rule exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    Question,
    Emotional,
    Condition,
}

/// One row of the blocklist table.
#[derive(Debug)]
pub struct BlockRule {
    pub reason: BlockReason,
    pub substrings: &'static [&'static str],
}

pub static BLOCK_RULES: &[BlockRule] = &[
    BlockRule {
        reason: BlockReason::Question,
        substrings: &["why", "what is", "how does", "explain"],
    },
    BlockRule {
        reason: BlockReason::Emotional,
        substrings: &["feel", "sad", "depressed", "anxious", "lazy", "motivation"],
    },
    BlockRule {
        reason: BlockReason::Condition,
        substrings: &["adhd", "autism"],
    },
];

/// The first check a piece of input failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    Empty,
    Blocked {
        reason: BlockReason,
        matched: &'static str,
    },
    TooLong {
        words: usize,
    },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Empty => write!(f, "empty input"),
            Rejection::Blocked { reason, matched } => {
                write!(f, "blocked {:?} keyword '{}'", reason, matched)
            }
            Rejection::TooLong { words } => {
                write!(f, "{} words exceeds limit of {}", words, MAX_INPUT_WORDS)
            }
        }
    }
}

/// Run every check and report the first failure.
pub fn check(text: &str) -> Result<(), Rejection> {
    let text = text.trim().to_lowercase();
    if text.is_empty() {
        return Err(Rejection::Empty);
    }

    for rule in BLOCK_RULES {
        if let Some(matched) = rule.substrings.iter().copied().find(|s| text.contains(s)) {
            return Err(Rejection::Blocked {
                reason: rule.reason,
                matched,
            });
        }
    }

    let words = text.split_whitespace().count();
    if words > MAX_INPUT_WORDS {
        return Err(Rejection::TooLong { words });
    }

    Ok(())
}

pub fn validate(text: &str) -> bool {
    check(text).is_ok()
}
