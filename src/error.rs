//! Scan-level error taxonomy.
//!
//! Only the metadata boundary aborts a scan: an unreachable provider or an
//! empty schema leaves nothing to analyze. Every failure below that boundary
//! degrades instead, recording the skipped item in the scan report while the
//! rest of the pipeline carries on. Signals that merely score below their
//! threshold are not errors at all; they simply produce no evidence.

use thiserror::Error;

use crate::graph::GraphError;
use crate::metadata::ProviderError;

/// Errors that abort a scan outright.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The metadata provider could not serve introspection.
    #[error("metadata provider failed: {0}")]
    Provider(#[from] ProviderError),

    /// Introspection succeeded but returned no tables.
    #[error("schema contains no tables")]
    EmptySchema,

    /// The graph snapshot could not be serialized.
    #[error("graph export failed: {0}")]
    Graph(#[from] GraphError),
}

/// Pipeline stage that produced a degraded item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStage {
    /// Column statistics sampling during node building.
    NodeStats,
    /// Value-containment sampling during inference.
    Containment,
    /// Row-count estimation during enum detection.
    RowCount,
    /// A standard-column explain batch during merge.
    ExplainBatch,
    /// Table-meaning explanation during merge.
    TableMeaning,
    /// Table-relationship inference during merge.
    TableRelationships,
}

impl ScanStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NodeStats => "node_stats",
            Self::Containment => "containment",
            Self::RowCount => "row_count",
            Self::ExplainBatch => "explain_batch",
            Self::TableMeaning => "table_meaning",
            Self::TableRelationships => "table_relationships",
        }
    }
}

impl std::fmt::Display for ScanStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One item a stage gave up on without failing the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedItem {
    pub stage: ScanStage,
    /// What was skipped, e.g. a table name or a column pair.
    pub subject: String,
    pub reason: String,
}

impl SkippedItem {
    pub fn new(stage: ScanStage, subject: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            stage,
            subject: subject.into(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for SkippedItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.stage, self.subject, self.reason)
    }
}
