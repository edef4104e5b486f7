//! Schema metadata records consumed by the analysis stages.
//!
//! Everything here is introspection output: table and column layout,
//! declared constraints and sampled per-column statistics. How the records
//! are obtained is behind [`MetadataProvider`]; the bundled
//! [`FixtureProvider`] serves canned answers from a JSON file.

pub mod fixture;
pub mod provider;

pub use fixture::{Fixture, FixtureProvider};
pub use provider::{MetadataProvider, ProviderError, ProviderResult};

use serde::{Deserialize, Serialize};

/// Full introspection result for one schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaMetadata {
    pub tables: Vec<TableMeta>,
    /// Declared foreign-key constraints, when the source exposes them.
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKeyMeta>,
}

/// One table with its column layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableMeta {
    #[serde(default)]
    pub schema: String,
    pub name: String,
    pub columns: Vec<ColumnMeta>,
}

/// One column as introspection reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnMeta {
    pub name: String,
    pub data_type: String,
    /// Declared length, 0 when the type carries none.
    #[serde(default)]
    pub length: i64,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub is_primary_key: bool,
}

/// A declared foreign-key constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyMeta {
    pub from_table: String,
    pub from_column: String,
    pub to_table: String,
    pub to_column: String,
}

/// Point-in-time sample of one column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub total_rows: i64,
    #[serde(default)]
    pub null_count: i64,
    #[serde(default)]
    pub distinct_count: i64,
    /// Most frequent sampled values, highest count first, at most ten.
    #[serde(default)]
    pub top_values: Vec<ValueCount>,
}

/// One sampled value with its frequency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCount {
    pub value: String,
    pub count: i64,
}

impl ColumnStats {
    /// Fraction of sampled rows that are NULL, if any rows were sampled.
    pub fn null_ratio(&self) -> Option<f64> {
        (self.total_rows > 0).then(|| self.null_count as f64 / self.total_rows as f64)
    }

    /// Fraction of sampled rows holding distinct values, if any rows were
    /// sampled.
    pub fn distinct_rate(&self) -> Option<f64> {
        (self.total_rows > 0).then(|| self.distinct_count as f64 / self.total_rows as f64)
    }
}
