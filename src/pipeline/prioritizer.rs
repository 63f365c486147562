//! Ordering tasks so the easiest physical ones come first.

/// Keywords for quick physical actions.
const EASY_KEYWORDS: &[&str] = &["clean", "organize", "pick", "reply", "send"];
/// Keywords for cognitively heavy work.
const HEAVY_KEYWORDS: &[&str] = &["study", "prepare", "exam", "assignment"];

/// Higher is earlier.
pub fn score(task: &str) -> i64 {
    let task = task.to_lowercase();
    let mut score = 0i64;

    if EASY_KEYWORDS.iter().any(|k| task.contains(k)) {
        score += 2;
    }
    if HEAVY_KEYWORDS.iter().any(|k| task.contains(k)) {
        score -= 1;
    }

    score - task.split_whitespace().count() as i64
}

/// Sort tasks by descending score. Equal scores keep their input order.
pub fn prioritize(mut tasks: Vec<String>) -> Vec<String> {
    // sort_by_cached_key is stable
    tasks.sort_by_cached_key(|task| std::cmp::Reverse(score(task)));
    tasks
}
