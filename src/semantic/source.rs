//! Semantic explanation source trait.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::metadata::TableMeta;

use super::{FieldContext, FieldExplanation, RelatedField, TableExplanation, TableRelationship};

/// Result type for semantic source calls.
pub type SemanticResult<T> = Result<T, SemanticError>;

/// Errors from semantic explanation sources.
#[derive(Debug, Error)]
pub enum SemanticError {
    /// The source could not be reached.
    #[error("semantic source unavailable: {0}")]
    Unavailable(String),

    /// The source answered but refused or mangled the request.
    #[error("semantic source rejected the request: {0}")]
    Rejected(String),

    /// The source does not implement this operation.
    #[error("operation not supported by this source: {0}")]
    Unsupported(&'static str),
}

impl SemanticError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable(reason.into())
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected(reason.into())
    }
}

/// Capability interface for explanation sources.
///
/// Every operation is independently failable. The merge stage treats a
/// failure as "skip this item" and carries on, so implementations should
/// return errors rather than fabricate answers.
#[async_trait]
pub trait SemanticSource: Send + Sync {
    /// Explain a batch of standard columns. The result is keyed by column
    /// name; missing keys are normal, a source explains what it can.
    async fn explain_batch(
        &self,
        fields: &[FieldContext],
    ) -> SemanticResult<HashMap<String, FieldExplanation>>;

    /// Infer the meaning of a custom column from the fields it points at.
    async fn infer_custom_field(
        &self,
        column_name: &str,
        related: &[RelatedField],
    ) -> SemanticResult<FieldExplanation>;

    /// Explain what a whole table holds.
    async fn explain_table_meaning(&self, table: &TableMeta) -> SemanticResult<TableExplanation>;

    /// Infer table-to-table relationships across the schema.
    async fn infer_table_relationships(
        &self,
        tables: &[TableMeta],
    ) -> SemanticResult<Vec<TableRelationship>>;
}
