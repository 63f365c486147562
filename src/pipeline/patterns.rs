//! Category-specific guidance injected into the system prompt.
//!
//! Lookup walks [`PATTERN_RULES`] in order and returns the first category
//! whose keyword appears in the task. [`GENERAL`] catches everything else.

use std::fmt;

/// Task category that selects a guidance pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Cleaning,
    Studying,
    Admin,
    General,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Cleaning => "Cleaning",
            Category::Studying => "Studying",
            Category::Admin => "Admin",
            Category::General => "General",
        }
    }
}

/// Guidance bullets for one category.
#[derive(Debug, PartialEq, Eq)]
pub struct Pattern {
    pub category: Category,
    pub guidance: &'static [&'static str],
}

impl Pattern {
    /// Render as the prompt fragment, one bullet per line.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Task type: {}", self.category.as_str())?;
        for bullet in self.guidance {
            write!(f, "\n- {}", bullet)?;
        }
        Ok(())
    }
}

pub static CLEANING: Pattern = Pattern {
    category: Category::Cleaning,
    guidance: &[
        "Start with visible items",
        "One category at a time",
        "Prefer physical actions",
        "Avoid perfection",
    ],
};

pub static STUDYING: Pattern = Pattern {
    category: Category::Studying,
    guidance: &[
        "Start with materials, not thinking",
        "Review headings first",
        "Short focused actions",
        "Stop before fatigue",
    ],
};

pub static ADMIN: Pattern = Pattern {
    category: Category::Admin,
    guidance: &[
        "Open required app first",
        "Handle one item only",
        "Do not clear everything",
    ],
};

pub static GENERAL: Pattern = Pattern {
    category: Category::General,
    guidance: &["Start with the easiest action", "Keep steps very small"],
};

/// Keyword table, checked top to bottom.
pub static PATTERN_RULES: &[(&[&str], &Pattern)] = &[
    (&["clean", "organize", "room", "desk"], &CLEANING),
    (&["study", "exam", "prepare", "learn"], &STUDYING),
    (&["email", "reply", "submit", "form"], &ADMIN),
];

pub fn lookup(task: &str) -> &'static Pattern {
    let task = task.to_lowercase();
    PATTERN_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| task.contains(k)))
        .map(|(_, pattern)| *pattern)
        .unwrap_or(&GENERAL)
}
