//! Graph data model: nodes, edges and the evidence attached to them.
//!
//! Node IDs are `"<table>"` for tables and `"<table>.<column>"` for columns.
//! Column-level edge IDs are `"<from>.<col>-><to>.<col>"`, so re-deriving an
//! edge from either declared constraints or inference lands on the same slot.

pub mod evidence_graph;

pub use evidence_graph::{EvidenceGraph, GraphError};

use serde::{Deserialize, Serialize};

use crate::metadata::{ColumnMeta, ColumnStats};
use crate::semantic::ExplanationSource;

/// Kind of a graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Table,
    Column,
    Index,
    View,
}

/// Kind of a graph edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Declared foreign-key constraint.
    ForeignKey,
    /// Relationship inferred from evidence signals.
    #[serde(rename = "inferred_fk")]
    InferredForeignKey,
    /// Table-level dependency.
    Dependency,
    /// Reference into an enum/lookup table.
    EnumReference,
}

impl EdgeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ForeignKey => "foreign_key",
            Self::InferredForeignKey => "inferred_fk",
            Self::Dependency => "dependency",
            Self::EnumReference => "enum_reference",
        }
    }
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Typed node properties.
///
/// Every field is optional and absent fields are omitted from snapshots, so
/// later stages can annotate nodes without clobbering what earlier stages
/// wrote.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeProps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_primary_key: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub null_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distinct_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub localized_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_meaning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation_confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation_source: Option<ExplanationSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_key_column: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_value_column: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_confidence: Option<f64>,
}

/// Typed edge properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeProps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_table: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_column: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_table: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_column: Option<String>,
    /// Table-level cardinality: one_to_many, many_to_many or one_to_one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One scored, justified signal supporting an edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    /// Signal identifier, e.g. `naming_similarity` or `declared`.
    pub kind: String,
    /// Raw signal score in [0, 1], before weighting.
    pub score: f64,
    pub description: String,
    pub details: String,
}

/// A graph node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub name: String,
    #[serde(default)]
    pub properties: NodeProps,
}

impl Node {
    /// Canonical ID of a column node.
    pub fn column_id(table: &str, column: &str) -> String {
        format!("{table}.{column}")
    }

    /// Build a table node.
    pub fn table(name: &str, schema: &str) -> Self {
        Self {
            id: name.to_string(),
            kind: NodeKind::Table,
            name: name.to_string(),
            properties: NodeProps {
                schema: (!schema.is_empty()).then(|| schema.to_string()),
                ..NodeProps::default()
            },
        }
    }

    /// Build a column node from introspected metadata plus optional sampled
    /// statistics.
    pub fn column(table: &str, column: &ColumnMeta, stats: Option<&ColumnStats>) -> Self {
        Self {
            id: Self::column_id(table, &column.name),
            kind: NodeKind::Column,
            name: column.name.clone(),
            properties: NodeProps {
                table: Some(table.to_string()),
                data_type: Some(column.data_type.clone()),
                length: Some(column.length),
                nullable: Some(column.nullable),
                is_primary_key: Some(column.is_primary_key),
                null_ratio: stats.and_then(ColumnStats::null_ratio),
                distinct_rate: stats.and_then(ColumnStats::distinct_rate),
                ..NodeProps::default()
            },
        }
    }
}

/// A graph edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub kind: EdgeKind,
    /// ID of the source node. May reference a node not yet inserted.
    pub from: String,
    /// ID of the target node. May reference a node not yet inserted.
    pub to: String,
    pub confidence: f64,
    #[serde(default)]
    pub evidence: Vec<Evidence>,
    #[serde(default)]
    pub properties: EdgeProps,
}

impl Edge {
    /// Canonical ID of a column-level edge.
    pub fn id_for(from_table: &str, from_column: &str, to_table: &str, to_column: &str) -> String {
        format!("{from_table}.{from_column}->{to_table}.{to_column}")
    }

    /// Build a column-level edge with endpoint properties filled in.
    pub fn between_columns(
        kind: EdgeKind,
        from_table: &str,
        from_column: &str,
        to_table: &str,
        to_column: &str,
        confidence: f64,
        evidence: Vec<Evidence>,
    ) -> Self {
        Self {
            id: Self::id_for(from_table, from_column, to_table, to_column),
            kind,
            from: Node::column_id(from_table, from_column),
            to: Node::column_id(to_table, to_column),
            confidence,
            evidence,
            properties: EdgeProps {
                from_table: Some(from_table.to_string()),
                from_column: Some(from_column.to_string()),
                to_table: Some(to_table.to_string()),
                to_column: Some(to_column.to_string()),
                ..EdgeProps::default()
            },
        }
    }
}

/// A serializable copy of the graph at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: std::collections::BTreeMap<String, Node>,
    pub edges: std::collections::BTreeMap<String, Edge>,
}
