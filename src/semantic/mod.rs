//! Semantic explanations and the evidence-merge stage.
//!
//! Relationship inference says which columns point where; this module says
//! what columns mean. Explanations come from pluggable sources (the
//! bundled rule-based one, or an AI-backed implementation) and the merge
//! stage combines them with the inferred edge set so that custom
//! user-extension columns inherit meaning from what they point at.

pub mod merge;
pub mod rules;
pub mod source;

pub use merge::{EnhancedColumn, EnhancedSchema, EnhancedTable, HybridAnalyzer, MergeOutcome};
pub use rules::RuleBasedExplainer;
pub use source::{SemanticError, SemanticResult, SemanticSource};

use serde::{Deserialize, Serialize};

use crate::graph::EdgeKind;
use crate::metadata::ColumnStats;

/// Merge-stage constants.
pub mod limits {
    /// Maximum standard columns per explain batch.
    pub const EXPLAIN_BATCH: usize = 50;
    /// Trust decay applied when meaning is inherited through an edge.
    pub const RELATION_DECAY: f64 = 0.7;
    /// Confidence of the placeholder for custom columns with no edges.
    pub const PLACEHOLDER_CONFIDENCE: f64 = 0.1;
}

/// Where an explanation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplanationSource {
    /// Name-pattern rules, no external calls.
    RuleBased,
    /// A semantic source explained the column directly.
    AiStandard,
    /// A semantic source inferred the meaning of a custom column.
    AiInferred,
    /// Meaning inherited from a related column through an edge.
    RelationDerived,
}

impl ExplanationSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RuleBased => "rule_based",
            Self::AiStandard => "ai_standard",
            Self::AiInferred => "ai_inferred",
            Self::RelationDerived => "relation_derived",
        }
    }
}

impl std::fmt::Display for ExplanationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One explanation attached to a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldExplanation {
    pub column_name: String,
    /// Short human-facing name.
    pub localized_name: String,
    pub description: String,
    pub business_meaning: String,
    pub confidence: f64,
    pub source: ExplanationSource,
}

/// Input handed to a semantic source for one column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldContext {
    pub table_name: String,
    pub column_name: String,
    pub data_type: String,
    /// Sampled statistics, when the pipeline had them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<ColumnStats>,
}

/// A column related to a custom column through an edge.
#[derive(Debug, Clone, PartialEq)]
pub struct RelatedField {
    pub table_name: String,
    pub column_name: String,
    pub localized_name: String,
    pub relation: EdgeKind,
    pub confidence: f64,
}

/// Table-level meaning from a semantic source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableExplanation {
    pub table_name: String,
    pub localized_name: String,
    pub description: String,
    pub business_meaning: String,
    pub confidence: f64,
}

/// A table-to-table relationship from a semantic source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRelationship {
    pub from_table: String,
    pub to_table: String,
    /// one_to_many, many_to_many or one_to_one.
    pub relation_type: String,
    pub description: String,
    pub confidence: f64,
}

/// Whether a column is one of the schema family's user-extension slots.
///
/// `cFree1..` and `cDefine1..` are free-form site-configured slots; `ufts`
/// is the family's row-version column. Everything else counts as standard.
pub fn is_custom_column(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.starts_with("cfree") || lower.starts_with("cdefine") || lower == "ufts"
}
