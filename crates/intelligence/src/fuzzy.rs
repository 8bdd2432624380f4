//! Fuzzy string similarity
//!
//! Normalized Levenshtein similarity over Unicode scalar values:
//! `(max_len - distance) / max_len`, in [0, 1], with two empty strings
//! counting as identical.

/// Edit distance (insertions, deletions, substitutions)
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Two rolling rows instead of the full matrix
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1)
                .min(curr[j - 1] + 1)
                .min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Similarity in [0, 1]; 1.0 for identical strings
///
/// # Example
///
/// ```
/// use compass_intelligence::fuzzy::fuzzy_similarity;
///
/// assert_eq!(fuzzy_similarity("", ""), 1.0);
/// assert_eq!(fuzzy_similarity("modal", "modal"), 1.0);
/// assert!((fuzzy_similarity("buton", "button") - 5.0 / 6.0).abs() < 1e-9);
/// ```
pub fn fuzzy_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    let distance = levenshtein_distance(a, b);
    (max_len - distance) as f64 / max_len as f64
}
