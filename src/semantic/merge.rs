//! Evidence merge stage.
//!
//! Combines the inferred edge set with a semantic source's explanations
//! into one annotated schema:
//!
//! 1. table meanings, one source call per table
//! 2. table-to-table relationships, one call for the whole schema
//! 3. standard columns, explained in bounded batches
//! 4. custom user-extension columns, explained through their edges
//!
//! Every source call is failable; a failure skips exactly the item (or
//! batch) it covered. Custom columns with edges fall back from source
//! inference to inheriting the strongest related field's meaning with an
//! explicit trust decay, and columns with no edges at all get a low-trust
//! placeholder rather than nothing.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{ScanStage, SkippedItem};
use crate::graph::Edge;
use crate::metadata::{ColumnStats, SchemaMetadata};

use super::source::SemanticSource;
use super::{
    is_custom_column, limits, ExplanationSource, FieldContext, FieldExplanation, RelatedField,
    TableExplanation, TableRelationship,
};

/// Fully annotated schema produced by the merge stage.
#[derive(Debug, Default)]
pub struct EnhancedSchema {
    pub tables: BTreeMap<String, EnhancedTable>,
    pub table_relationships: Vec<TableRelationship>,
}

#[derive(Debug)]
pub struct EnhancedTable {
    pub name: String,
    pub columns: BTreeMap<String, EnhancedColumn>,
    /// Table-level meaning. Independent of column explanations and never
    /// overwrites them.
    pub explanation: Option<TableExplanation>,
}

#[derive(Debug)]
pub struct EnhancedColumn {
    pub name: String,
    pub data_type: String,
    pub explanation: Option<FieldExplanation>,
}

/// Merge result: the annotated schema plus what was skipped.
#[derive(Debug, Default)]
pub struct MergeOutcome {
    pub schema: EnhancedSchema,
    pub skipped: Vec<SkippedItem>,
}

/// Inferred edges whose source endpoint is the given column, resolved to
/// target columns that already carry an explanation.
fn find_related_fields(
    table: &str,
    column: &str,
    edges: &[Edge],
    schema: &EnhancedSchema,
) -> Vec<RelatedField> {
    let mut related = Vec::new();
    for edge in edges {
        let props = &edge.properties;
        if props.from_table.as_deref() != Some(table)
            || props.from_column.as_deref() != Some(column)
        {
            continue;
        }
        let (Some(to_table), Some(to_column)) =
            (props.to_table.as_deref(), props.to_column.as_deref())
        else {
            continue;
        };
        let target = schema
            .tables
            .get(to_table)
            .and_then(|t| t.columns.get(to_column));
        let Some(explanation) = target.and_then(|c| c.explanation.as_ref()) else {
            continue;
        };
        related.push(RelatedField {
            table_name: to_table.to_string(),
            column_name: to_column.to_string(),
            localized_name: explanation.localized_name.clone(),
            relation: edge.kind,
            confidence: edge.confidence,
        });
    }
    related
}

/// Low-trust placeholder for custom columns with no edges.
fn placeholder_explanation(column: &str) -> FieldExplanation {
    FieldExplanation {
        column_name: column.to_string(),
        localized_name: "custom field".to_string(),
        description: "user-extension column with no discovered relationships".to_string(),
        business_meaning: "meaning depends on site-specific configuration".to_string(),
        confidence: limits::PLACEHOLDER_CONFIDENCE,
        source: ExplanationSource::RelationDerived,
    }
}

/// Inherit meaning from the strongest related field, decayed because the
/// meaning travelled through an edge rather than being observed directly.
fn relation_derived_explanation(column: &str, related: &[RelatedField]) -> FieldExplanation {
    let Some(first) = related.first() else {
        return placeholder_explanation(column);
    };
    let best = related.iter().skip(1).fold(first, |best, candidate| {
        if candidate.confidence > best.confidence {
            candidate
        } else {
            best
        }
    });

    FieldExplanation {
        column_name: column.to_string(),
        localized_name: format!("related {}", best.localized_name),
        description: format!("references {}.{}", best.table_name, best.column_name),
        business_meaning: format!(
            "appears to carry {} values for the linked {} row",
            best.localized_name, best.table_name
        ),
        confidence: best.confidence * limits::RELATION_DECAY,
        source: ExplanationSource::RelationDerived,
    }
}

/// Runs the merge against one semantic source.
pub struct HybridAnalyzer<S: ?Sized> {
    source: Arc<S>,
}

impl<S: SemanticSource + ?Sized> HybridAnalyzer<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    /// Merge the inferred edge set with source explanations.
    ///
    /// `column_stats` is keyed by `"<table>.<column>"` and feeds the field
    /// contexts handed to the source; missing entries are fine.
    pub async fn analyze(
        &self,
        meta: &SchemaMetadata,
        edges: &[Edge],
        column_stats: &HashMap<String, ColumnStats>,
    ) -> MergeOutcome {
        let mut schema = EnhancedSchema::default();
        let mut skipped = Vec::new();

        info!(tables = meta.tables.len(), "semantic merge started");

        // Skeleton plus standard/custom classification.
        let mut standard = Vec::new();
        let mut custom = Vec::new();
        for table in &meta.tables {
            let mut enhanced = EnhancedTable {
                name: table.name.clone(),
                columns: BTreeMap::new(),
                explanation: None,
            };
            for column in &table.columns {
                enhanced.columns.insert(
                    column.name.clone(),
                    EnhancedColumn {
                        name: column.name.clone(),
                        data_type: column.data_type.clone(),
                        explanation: None,
                    },
                );
                if is_custom_column(&column.name) {
                    custom.push((table.name.clone(), column.name.clone()));
                } else {
                    standard.push(FieldContext {
                        table_name: table.name.clone(),
                        column_name: column.name.clone(),
                        data_type: column.data_type.clone(),
                        stats: column_stats
                            .get(&format!("{}.{}", table.name, column.name))
                            .cloned(),
                    });
                }
            }
            schema.tables.insert(table.name.clone(), enhanced);
        }

        // Table meanings, each independently failable.
        for table in &meta.tables {
            match self.source.explain_table_meaning(table).await {
                Ok(explanation) => {
                    if let Some(enhanced) = schema.tables.get_mut(&table.name) {
                        enhanced.explanation = Some(explanation);
                    }
                }
                Err(err) => {
                    debug!(table = %table.name, error = %err, "table meaning unavailable");
                    skipped.push(SkippedItem::new(
                        ScanStage::TableMeaning,
                        table.name.clone(),
                        err.to_string(),
                    ));
                }
            }
        }

        // Table relationships in one call; a failure skips the lot.
        match self.source.infer_table_relationships(&meta.tables).await {
            Ok(relationships) => schema.table_relationships = relationships,
            Err(err) => {
                debug!(error = %err, "table relationships unavailable");
                skipped.push(SkippedItem::new(
                    ScanStage::TableRelationships,
                    "schema",
                    err.to_string(),
                ));
            }
        }

        // Standard columns in bounded batches.
        for (index, batch) in standard.chunks(limits::EXPLAIN_BATCH).enumerate() {
            match self.source.explain_batch(batch).await {
                Ok(explained) => {
                    for field in batch {
                        let Some(explanation) = explained.get(&field.column_name) else {
                            continue;
                        };
                        if let Some(column) = schema
                            .tables
                            .get_mut(&field.table_name)
                            .and_then(|t| t.columns.get_mut(&field.column_name))
                        {
                            column.explanation = Some(explanation.clone());
                        }
                    }
                }
                Err(err) => {
                    warn!(batch = index, size = batch.len(), error = %err, "explain batch failed, batch skipped");
                    skipped.push(SkippedItem::new(
                        ScanStage::ExplainBatch,
                        format!("batch {index} ({} columns)", batch.len()),
                        err.to_string(),
                    ));
                }
            }
        }

        // Custom columns inherit through their edges. Standard columns were
        // explained first, so targets already carry explanations.
        for (table_name, column_name) in &custom {
            let related = find_related_fields(table_name, column_name, edges, &schema);
            let explanation = if related.is_empty() {
                placeholder_explanation(column_name)
            } else {
                match self.source.infer_custom_field(column_name, &related).await {
                    Ok(mut explanation) => {
                        explanation.source = ExplanationSource::AiInferred;
                        explanation
                    }
                    Err(err) => {
                        debug!(column = %column_name, error = %err, "custom inference unavailable, deriving from relations");
                        relation_derived_explanation(column_name, &related)
                    }
                }
            };
            if let Some(column) = schema
                .tables
                .get_mut(table_name)
                .and_then(|t| t.columns.get_mut(column_name))
            {
                column.explanation = Some(explanation);
            }
        }

        info!(
            standard = standard.len(),
            custom = custom.len(),
            skipped = skipped.len(),
            "semantic merge complete"
        );
        MergeOutcome { schema, skipped }
    }
}
