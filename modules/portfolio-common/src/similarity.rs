//! Word-overlap similarity used by dedup and portfolio comparison.
//!
//! One convention everywhere: two texts with no words at all are identical
//! (1.0), a text with words compared against one without is 0.0.

use std::collections::HashSet;

fn word_set(text: &str) -> HashSet<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// Jaccard index of the lower-cased whitespace-tokenized word sets.
pub fn jaccard(a: &str, b: &str) -> f64 {
    let words_a = word_set(a);
    let words_b = word_set(b);

    match (words_a.is_empty(), words_b.is_empty()) {
        (true, true) => 1.0,
        (true, false) | (false, true) => 0.0,
        (false, false) => {
            let intersection = words_a.intersection(&words_b).count();
            let union = words_a.union(&words_b).count();
            intersection as f64 / union as f64
        }
    }
}

/// Highest [`jaccard`] score of `text` against any of `others`. 0.0 when
/// `others` is empty.
pub fn max_similarity<'a, I>(text: &str, others: I) -> f64
where
    I: IntoIterator<Item = &'a str>,
{
    others
        .into_iter()
        .map(|other| jaccard(text, other))
        .fold(0.0, f64::max)
}
