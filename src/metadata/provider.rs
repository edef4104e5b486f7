//! Metadata provider trait.
//!
//! Abstracts over how schema metadata and column samples are fetched. The
//! analysis stages never issue raw queries: vendor introspectors implement
//! this trait, and [`crate::metadata::FixtureProvider`] serves canned
//! answers for tests and offline runs.

use async_trait::async_trait;
use futures::future::join_all;
use thiserror::Error;

use super::{ColumnStats, SchemaMetadata};

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors reported by metadata providers.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The backing source could not be reached at all.
    #[error("provider unreachable: {0}")]
    Unreachable(String),

    /// The requested table is not known to the source.
    #[error("unknown table: {0}")]
    UnknownTable(String),

    /// The requested column is not known to the source.
    #[error("unknown column: {table}.{column}")]
    UnknownColumn { table: String, column: String },

    /// A sampling query failed.
    #[error("sampling failed for {subject}: {reason}")]
    Sampling { subject: String, reason: String },

    #[error("failed to read fixture: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse fixture: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ProviderError {
    /// Create an `Unreachable` error.
    pub fn unreachable(reason: impl Into<String>) -> Self {
        Self::Unreachable(reason.into())
    }

    /// Create a `Sampling` error.
    pub fn sampling(subject: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Sampling {
            subject: subject.into(),
            reason: reason.into(),
        }
    }

    /// Whether the failure concerns a single item rather than the provider
    /// as a whole. Per-item failures degrade; the rest abort the scan.
    pub fn is_per_item(&self) -> bool {
        matches!(
            self,
            Self::UnknownTable(_) | Self::UnknownColumn { .. } | Self::Sampling { .. }
        )
    }
}

/// Capability interface for schema introspection and sampling.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetch the full table/column layout plus declared constraints.
    async fn introspect_schema(&self) -> ProviderResult<SchemaMetadata>;

    /// Estimate the row count of a table.
    async fn estimate_row_count(&self, table: &str) -> ProviderResult<i64>;

    /// Sample statistics for one column.
    ///
    /// `sample_size` caps how many rows feed the sample. `top_values` in the
    /// result holds at most ten entries, most frequent first.
    async fn sample_column_stats(
        &self,
        table: &str,
        column: &str,
        sample_size: usize,
    ) -> ProviderResult<ColumnStats>;

    /// Sample several columns of one table, concurrently.
    ///
    /// Failures are reported per column so one bad column does not sink the
    /// whole table.
    async fn sample_columns(
        &self,
        table: &str,
        columns: &[String],
        sample_size: usize,
    ) -> Vec<(String, ProviderResult<ColumnStats>)> {
        let futures: Vec<_> = columns
            .iter()
            .map(|column| async move {
                (
                    column.clone(),
                    self.sample_column_stats(table, column, sample_size).await,
                )
            })
            .collect();
        join_all(futures).await
    }
}
