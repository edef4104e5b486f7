//! Column-name similarity scoring.
//!
//! The target schema family prefixes most business columns with `c`
//! (`cDepCode`, `cInvCode`), so names are compared case-insensitively with
//! one leading `c` stripped.

use crate::inference::thresholds::{cutoff, score};

/// Normalized form of a column name: lower-cased, one leading `c` removed.
pub fn normalize(name: &str) -> String {
    let lower = name.to_lowercase();
    match lower.strip_prefix('c') {
        Some(rest) => rest.to_string(),
        None => lower,
    }
}

/// Score the similarity of two column names.
///
/// 1.0 for a case-insensitive exact match, 0.8 when one normalized name
/// contains the other (so `cDepCode` vs `DepCode` scores 0.8, not 1.0),
/// otherwise a Levenshtein-derived similarity when it clears the cutoff.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a.to_lowercase() == b.to_lowercase() {
        return 1.0;
    }

    let na = normalize(a);
    let nb = normalize(b);
    if na.contains(&nb) || nb.contains(&na) {
        return score::NAME_CONTAINS;
    }

    let max_len = na.chars().count().max(nb.chars().count());
    if max_len == 0 {
        return 0.0;
    }
    let similarity = 1.0 - levenshtein(&na, &nb) as f64 / max_len as f64;
    if similarity > cutoff::LEVENSHTEIN_MIN {
        similarity
    } else {
        0.0
    }
}

/// Levenshtein edit distance over characters.
fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let m = a.len();
    let n = b.len();

    let mut dp = vec![vec![0usize; n + 1]; m + 1];
    for (i, row) in dp.iter_mut().enumerate().take(m + 1) {
        row[0] = i;
    }
    for (j, cell) in dp[0].iter_mut().enumerate().take(n + 1) {
        *cell = j;
    }

    for i in 1..=m {
        for j in 1..=n {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            dp[i][j] = (dp[i - 1][j] + 1)
                .min(dp[i][j - 1] + 1)
                .min(dp[i - 1][j - 1] + cost);
        }
    }

    dp[m][n]
}
