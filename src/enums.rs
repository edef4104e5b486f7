//! Enumeration/lookup table detection.
//!
//! Small tables whose columns look like (code, name) pairs are flagged as
//! enum candidates: dictionaries such as order states or payment kinds.
//! Detection is purely structural; it never reads row values, only the
//! estimated row count and column names.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cancel::CancellationToken;
use crate::error::{ScanStage, SkippedItem};
use crate::metadata::{ColumnMeta, MetadataProvider, SchemaMetadata};

/// Scoring bands for enum detection.
pub mod bands {
    /// Tables above this estimated row count are never candidates.
    pub const MAX_ROWS: i64 = 1000;
    /// Upper bound of the highest row-count band.
    pub const TINY_ROWS: i64 = 100;
    /// Upper bound of the middle row-count band.
    pub const SMALL_ROWS: i64 = 500;
    /// Row-count contribution for tables under `TINY_ROWS`.
    pub const ROWS_TINY: f64 = 0.4;
    /// Row-count contribution for tables under `SMALL_ROWS`.
    pub const ROWS_SMALL: f64 = 0.3;
    /// Row-count contribution for everything else under the gate.
    pub const ROWS_BASE: f64 = 0.2;
    /// Contribution when both key and value columns are present.
    pub const KEY_AND_VALUE: f64 = 0.4;
    /// Contribution when only a key column is present.
    pub const KEY_ONLY: f64 = 0.2;
    /// Contribution for a compact column layout.
    pub const COMPACT: f64 = 0.2;
    /// Column count at or under which a table counts as compact.
    pub const COMPACT_COLUMNS: usize = 5;
    /// Total confidence must exceed this for a candidate to be emitted.
    pub const MIN_CONFIDENCE: f64 = 0.6;
}

/// Name stems that mark a key column.
const KEY_PATTERNS: [&str; 4] = ["code", "id", "key", "type"];

/// Name stems that mark a descriptive value column.
const VALUE_PATTERNS: [&str; 5] = ["name", "label", "desc", "description", "value"];

/// A table that looks like a code/lookup table.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumTableCandidate {
    pub name: String,
    pub row_count: i64,
    pub key_column: String,
    /// One column may serve as both key and value when its name matches
    /// both pattern sets.
    pub value_column: Option<String>,
    pub confidence: f64,
}

/// Detector result: candidates plus tables whose row-count estimate failed.
#[derive(Debug, Default)]
pub struct EnumDetectionOutcome {
    pub candidates: Vec<EnumTableCandidate>,
    pub skipped: Vec<SkippedItem>,
}

/// First column matching each pattern set, scanning in declaration order.
fn find_enum_columns(columns: &[ColumnMeta]) -> (Option<String>, Option<String>) {
    let mut key = None;
    let mut value = None;
    for column in columns {
        let lower = column.name.to_lowercase();
        if key.is_none() && KEY_PATTERNS.iter().any(|p| lower.contains(p)) {
            key = Some(column.name.clone());
        }
        if value.is_none() && VALUE_PATTERNS.iter().any(|p| lower.contains(p)) {
            value = Some(column.name.clone());
        }
    }
    (key, value)
}

/// Additive confidence from row count, column presence and compactness.
fn confidence(row_count: i64, has_value: bool, column_count: usize) -> f64 {
    let mut score = if row_count < bands::TINY_ROWS {
        bands::ROWS_TINY
    } else if row_count < bands::SMALL_ROWS {
        bands::ROWS_SMALL
    } else {
        bands::ROWS_BASE
    };

    score += if has_value {
        bands::KEY_AND_VALUE
    } else {
        bands::KEY_ONLY
    };

    if column_count <= bands::COMPACT_COLUMNS {
        score += bands::COMPACT;
    }

    score
}

/// Flags small lookup tables across a schema.
pub struct EnumDetector<P> {
    provider: Arc<P>,
}

impl<P: MetadataProvider> EnumDetector<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }

    /// Examine every table; a failed row-count estimate skips that table
    /// and records it, without failing the run.
    pub async fn detect_enum_tables(
        &self,
        meta: &SchemaMetadata,
        cancel: &CancellationToken,
    ) -> EnumDetectionOutcome {
        let mut outcome = EnumDetectionOutcome::default();

        for table in &meta.tables {
            if cancel.is_cancelled() {
                break;
            }

            let row_count = match self.provider.estimate_row_count(&table.name).await {
                Ok(count) => count,
                Err(err) => {
                    warn!(table = %table.name, error = %err, "row count estimate failed, table skipped");
                    outcome.skipped.push(SkippedItem::new(
                        ScanStage::RowCount,
                        table.name.clone(),
                        err.to_string(),
                    ));
                    continue;
                }
            };
            if row_count > bands::MAX_ROWS {
                continue;
            }

            let (key_column, value_column) = find_enum_columns(&table.columns);
            let Some(key_column) = key_column else {
                continue;
            };

            let confidence = confidence(row_count, value_column.is_some(), table.columns.len());
            if confidence > bands::MIN_CONFIDENCE {
                debug!(table = %table.name, confidence, rows = row_count, "enum candidate");
                outcome.candidates.push(EnumTableCandidate {
                    name: table.name.clone(),
                    row_count,
                    key_column,
                    value_column,
                    confidence,
                });
            }
        }

        outcome
    }
}
