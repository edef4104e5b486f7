//! Sampled value-containment scoring.
//!
//! Estimates how much of a source column's value set falls inside a
//! candidate key column. Membership is judged against the key column's
//! top-10 frequent values only, so a true match outside that top-10 goes
//! uncounted. That makes the estimate lossy on purpose: it keeps sampling
//! to two bounded queries per pair, and the containment weight already
//! assumes an approximation.

use std::collections::HashSet;

use crate::inference::thresholds::sampling;
use crate::metadata::{MetadataProvider, ProviderResult};

/// Frequency-weighted containment of the source column's sampled values in
/// the key column's frequent-value set. Returns a score in [0, 1].
pub async fn score<P: MetadataProvider>(
    provider: &P,
    from_table: &str,
    from_column: &str,
    to_table: &str,
    to_column: &str,
) -> ProviderResult<f64> {
    let from_stats = provider
        .sample_column_stats(from_table, from_column, sampling::SOURCE_ROWS)
        .await?;
    let to_stats = provider
        .sample_column_stats(to_table, to_column, sampling::KEY_ROWS)
        .await?;

    let key_values: HashSet<&str> = to_stats
        .top_values
        .iter()
        .map(|v| v.value.as_str())
        .collect();

    let mut matched: i64 = 0;
    let mut total: i64 = 0;
    for value in &from_stats.top_values {
        total += value.count;
        if key_values.contains(value.value.as_str()) {
            matched += value.count;
        }
    }

    if total == 0 {
        return Ok(0.0);
    }
    Ok(matched as f64 / total as f64)
}
