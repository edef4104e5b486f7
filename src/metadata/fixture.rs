//! JSON-backed metadata provider for offline runs and tests.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::provider::{MetadataProvider, ProviderError, ProviderResult};
use super::{ColumnStats, SchemaMetadata};

/// On-disk shape of a fixture file.
///
/// ```json
/// {
///   "tables": [...],
///   "foreign_keys": [...],
///   "row_counts": {"t_status": 20},
///   "column_stats": {"orders.cDepCode": {"total_rows": 1000, ...}}
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(flatten)]
    pub schema: SchemaMetadata,
    /// Row counts keyed by table name.
    #[serde(default)]
    pub row_counts: HashMap<String, i64>,
    /// Column samples keyed by `"<table>.<column>"`.
    #[serde(default)]
    pub column_stats: HashMap<String, ColumnStats>,
}

/// Serves canned introspection answers from a [`Fixture`].
///
/// Tables or columns absent from the fixture's count/stats maps come back
/// as per-item errors, which the pipeline degrades on.
pub struct FixtureProvider {
    fixture: Fixture,
}

impl FixtureProvider {
    pub fn new(fixture: Fixture) -> Self {
        Self { fixture }
    }

    /// Load a fixture from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> ProviderResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let fixture: Fixture = serde_json::from_str(&content)?;
        Ok(Self::new(fixture))
    }
}

#[async_trait]
impl MetadataProvider for FixtureProvider {
    async fn introspect_schema(&self) -> ProviderResult<SchemaMetadata> {
        Ok(self.fixture.schema.clone())
    }

    async fn estimate_row_count(&self, table: &str) -> ProviderResult<i64> {
        self.fixture
            .row_counts
            .get(table)
            .copied()
            .ok_or_else(|| ProviderError::UnknownTable(table.to_string()))
    }

    async fn sample_column_stats(
        &self,
        table: &str,
        column: &str,
        _sample_size: usize,
    ) -> ProviderResult<ColumnStats> {
        self.fixture
            .column_stats
            .get(&format!("{table}.{column}"))
            .cloned()
            .ok_or_else(|| ProviderError::UnknownColumn {
                table: table.to_string(),
                column: column.to_string(),
            })
    }
}
