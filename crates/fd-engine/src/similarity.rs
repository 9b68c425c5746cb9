//! Bigram Dice similarity between normalized texts.

use std::collections::HashMap;

use crate::fingerprint::bigrams;

/// Dice coefficient over bigram multisets: `2·|A∩B| / (|A| + |B|)`.
///
/// Two empty strings score 0.0. Identical non-empty strings score 1.0, even
/// a single character. Otherwise a side with no bigrams scores 0.0.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }

    let a_grams = bigrams(a);
    let b_grams = bigrams(b);
    if a_grams.is_empty() || b_grams.is_empty() {
        return 0.0;
    }

    let mut counts: HashMap<&str, usize> = HashMap::with_capacity(a_grams.len());
    for gram in &a_grams {
        *counts.entry(gram.as_str()).or_insert(0) += 1;
    }
    let mut shared = 0usize;
    for gram in &b_grams {
        if let Some(n) = counts.get_mut(gram.as_str()) {
            if *n > 0 {
                *n -= 1;
                shared += 1;
            }
        }
    }

    (2 * shared) as f64 / (a_grams.len() + b_grams.len()) as f64
}
