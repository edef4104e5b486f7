//! Data-type compatibility scoring.

use crate::inference::thresholds::score;
use crate::metadata::ColumnMeta;

/// Types that can hold the same string keys.
const STRING_TYPES: [&str; 5] = ["varchar", "nvarchar", "char", "nchar", "text"];

/// Types that can hold the same integer keys.
const INTEGER_TYPES: [&str; 4] = ["int", "bigint", "smallint", "tinyint"];

/// Whether two data types may plausibly hold the same key values.
///
/// Equal names are always compatible; otherwise both must belong to the
/// same family. The comparison is case-insensitive.
pub fn compatible(a: &str, b: &str) -> bool {
    let ta = a.to_lowercase();
    let tb = b.to_lowercase();
    if ta == tb {
        return true;
    }

    let both_in = |family: &[&str]| {
        family.contains(&ta.as_str()) && family.contains(&tb.as_str())
    };
    both_in(&STRING_TYPES) || both_in(&INTEGER_TYPES)
}

/// Score type compatibility of two columns, factoring in declared lengths.
///
/// Incompatible types score 0. Compatible types with equal declared lengths
/// score 1.0, close lengths 0.8, anything else the 0.6 baseline.
pub fn match_score(a: &ColumnMeta, b: &ColumnMeta) -> f64 {
    if !compatible(&a.data_type, &b.data_type) {
        return 0.0;
    }

    if a.length > 0 && b.length > 0 {
        if a.length == b.length {
            return score::LENGTH_EXACT;
        }
        let ratio = a.length.min(b.length) as f64 / a.length.max(b.length) as f64;
        if ratio > score::LENGTH_RATIO_MIN {
            return score::LENGTH_CLOSE;
        }
    }

    score::COMPATIBLE_BASELINE
}
