//! Per-scan pipeline context.
//!
//! A [`ScanContext`] owns one evidence graph, one cancellation token and a
//! scan ID, and drives the stages in order:
//!
//! 1. introspect the schema (the only fatal boundary)
//! 2. build table and column nodes, sampling per-column statistics
//! 3. add declared foreign-key edges at full confidence
//! 4. infer relationships from evidence signals
//! 5. detect enum/lookup tables and annotate their nodes
//! 6. merge semantic explanations, when a source is configured
//!
//! Concurrent scans get distinct contexts, so results never mix. After a
//! run the graph remains owned by the context and queryable, including
//! after cancellation.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::cancel::CancellationToken;
use crate::enums::{EnumDetector, EnumTableCandidate};
use crate::error::{ScanError, ScanStage, SkippedItem};
use crate::graph::{Edge, EdgeKind, Evidence, EvidenceGraph, Node};
use crate::inference::thresholds::sampling;
use crate::inference::{InferenceConfig, RelationshipInferer};
use crate::metadata::{ColumnStats, MetadataProvider, SchemaMetadata};
use crate::semantic::merge::EnhancedSchema;
use crate::semantic::{ExplanationSource, HybridAnalyzer, SemanticSource, TableRelationship};

/// Options for one scan.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub inference: InferenceConfig,
    /// Rows sampled per column while building nodes.
    pub stats_sample_size: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            inference: InferenceConfig::default(),
            stats_sample_size: sampling::SOURCE_ROWS,
        }
    }
}

/// Summary of one completed scan.
#[derive(Debug)]
pub struct ScanReport {
    pub scan_id: Uuid,
    pub tables: usize,
    pub columns: usize,
    /// Edges added from declared constraints.
    pub declared_edges: usize,
    /// Inferred edges added to the graph. Pairs already covered by a
    /// declared constraint are not re-added and not counted.
    pub inferred_edges: usize,
    /// Column comparisons the inferer performed.
    pub comparisons: u64,
    pub enum_tables: Vec<EnumTableCandidate>,
    /// Explained column counts per explanation source.
    pub explained_columns: BTreeMap<ExplanationSource, usize>,
    /// Items stages gave up on without failing the scan.
    pub skipped: Vec<SkippedItem>,
    pub cancelled: bool,
}

impl std::fmt::Display for ScanReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "scan {} {}",
            self.scan_id,
            if self.cancelled { "cancelled" } else { "complete" }
        )?;
        writeln!(f, "  tables:         {}", self.tables)?;
        writeln!(f, "  columns:        {}", self.columns)?;
        writeln!(f, "  declared edges: {}", self.declared_edges)?;
        writeln!(f, "  inferred edges: {}", self.inferred_edges)?;
        writeln!(f, "  comparisons:    {}", self.comparisons)?;
        writeln!(f, "  enum tables:    {}", self.enum_tables.len())?;
        for candidate in &self.enum_tables {
            writeln!(
                f,
                "    - {} ({} rows, {:.2})",
                candidate.name, candidate.row_count, candidate.confidence
            )?;
        }
        if !self.explained_columns.is_empty() {
            writeln!(f, "  explained columns:")?;
            for (source, count) in &self.explained_columns {
                writeln!(f, "    {source}: {count}")?;
            }
        }
        write!(f, "  skipped items:  {}", self.skipped.len())?;
        Ok(())
    }
}

/// One scan: owns the graph and drives the pipeline.
pub struct ScanContext<P> {
    id: Uuid,
    provider: Arc<P>,
    graph: EvidenceGraph,
    cancel: CancellationToken,
    options: ScanOptions,
}

impl<P: MetadataProvider> ScanContext<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self::with_options(provider, ScanOptions::default())
    }

    pub fn with_options(provider: Arc<P>, options: ScanOptions) -> Self {
        Self {
            id: Uuid::new_v4(),
            provider,
            graph: EvidenceGraph::new(),
            cancel: CancellationToken::new(),
            options,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The graph built so far. Valid to query mid-run and after
    /// cancellation.
    pub fn graph(&self) -> &EvidenceGraph {
        &self.graph
    }

    /// Token callers can hold to cancel this scan from outside.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run the full pipeline.
    ///
    /// Only introspection failure and an empty schema abort; everything
    /// else degrades into the report's skipped list.
    pub async fn run(
        &self,
        source: Option<Arc<dyn SemanticSource>>,
    ) -> Result<ScanReport, ScanError> {
        let meta = self.provider.introspect_schema().await?;
        if meta.tables.is_empty() {
            return Err(ScanError::EmptySchema);
        }
        info!(scan = %self.id, tables = meta.tables.len(), "scan started");

        let mut skipped = Vec::new();

        let (columns, column_stats) = self.build_nodes(&meta, &mut skipped).await;

        let declared_edges = self.add_declared_edges(&meta).await;

        let inferer =
            RelationshipInferer::with_config(Arc::clone(&self.provider), self.options.inference.clone());
        let inference = inferer.infer_relationships(&meta, &self.cancel).await;
        skipped.extend(inference.skipped);

        let mut inferred_edges = 0usize;
        for edge in inference.edges {
            // Declared constraints outrank inferred duplicates.
            if self.graph.get_edge(&edge.id).await.is_none() {
                self.graph.add_edge(edge).await;
                inferred_edges += 1;
            }
        }

        let detector = EnumDetector::new(Arc::clone(&self.provider));
        let enums = detector.detect_enum_tables(&meta, &self.cancel).await;
        skipped.extend(enums.skipped);
        for candidate in &enums.candidates {
            self.annotate_enum_table(candidate).await;
        }

        let mut explained_columns = BTreeMap::new();
        if let Some(source) = source {
            if !self.cancel.is_cancelled() {
                let snapshot = self.graph.export_snapshot().await;
                let edges: Vec<Edge> = snapshot.edges.into_values().collect();
                let analyzer = HybridAnalyzer::new(source);
                let merge = analyzer.analyze(&meta, &edges, &column_stats).await;
                skipped.extend(merge.skipped);

                self.apply_explanations(&merge.schema, &mut explained_columns)
                    .await;
                for relationship in &merge.schema.table_relationships {
                    self.add_table_relationship_edge(relationship).await;
                }
            }
        }

        let report = ScanReport {
            scan_id: self.id,
            tables: meta.tables.len(),
            columns,
            declared_edges,
            inferred_edges,
            comparisons: inference.comparisons,
            enum_tables: enums.candidates,
            explained_columns,
            skipped,
            cancelled: self.cancel.is_cancelled(),
        };
        info!(
            scan = %self.id,
            inferred = report.inferred_edges,
            enums = report.enum_tables.len(),
            cancelled = report.cancelled,
            "scan finished"
        );
        Ok(report)
    }

    /// Insert table and column nodes, sampling statistics per column. A
    /// failed sample leaves that column's sampled props unset.
    async fn build_nodes(
        &self,
        meta: &SchemaMetadata,
        skipped: &mut Vec<SkippedItem>,
    ) -> (usize, HashMap<String, ColumnStats>) {
        let mut columns = 0usize;
        let mut all_stats = HashMap::new();

        for table in &meta.tables {
            if self.cancel.is_cancelled() {
                break;
            }
            self.graph
                .add_node(Node::table(&table.name, &table.schema))
                .await;

            let names: Vec<String> = table.columns.iter().map(|c| c.name.clone()).collect();
            let sampled = self
                .provider
                .sample_columns(&table.name, &names, self.options.stats_sample_size)
                .await;

            let mut by_name: HashMap<String, ColumnStats> = HashMap::new();
            for (column, result) in sampled {
                match result {
                    Ok(stats) => {
                        by_name.insert(column, stats);
                    }
                    Err(err) => {
                        let subject = Node::column_id(&table.name, &column);
                        debug!(column = %subject, error = %err, "column stats unavailable");
                        skipped.push(SkippedItem::new(
                            ScanStage::NodeStats,
                            subject,
                            err.to_string(),
                        ));
                    }
                }
            }

            for column in &table.columns {
                columns += 1;
                let stats = by_name.remove(&column.name);
                self.graph
                    .add_node(Node::column(&table.name, column, stats.as_ref()))
                    .await;
                if let Some(stats) = stats {
                    all_stats.insert(Node::column_id(&table.name, &column.name), stats);
                }
            }
        }

        (columns, all_stats)
    }

    /// One edge per declared constraint, full confidence.
    async fn add_declared_edges(&self, meta: &SchemaMetadata) -> usize {
        for fk in &meta.foreign_keys {
            let evidence = Evidence {
                kind: "declared".to_string(),
                score: 1.0,
                description: "declared foreign-key constraint".to_string(),
                details: format!(
                    "{}.{} -> {}.{}",
                    fk.from_table, fk.from_column, fk.to_table, fk.to_column
                ),
            };
            let edge = Edge::between_columns(
                EdgeKind::ForeignKey,
                &fk.from_table,
                &fk.from_column,
                &fk.to_table,
                &fk.to_column,
                1.0,
                vec![evidence],
            );
            self.graph.add_edge(edge).await;
        }
        meta.foreign_keys.len()
    }

    /// Mark a table node as an enum table.
    async fn annotate_enum_table(&self, candidate: &EnumTableCandidate) {
        self.graph
            .update_node(&candidate.name, |node| {
                node.properties.enum_key_column = Some(candidate.key_column.clone());
                node.properties.enum_value_column = candidate.value_column.clone();
                node.properties.enum_confidence = Some(candidate.confidence);
            })
            .await;
    }

    /// Write merged explanations into node properties and tally them per
    /// source.
    async fn apply_explanations(
        &self,
        schema: &EnhancedSchema,
        counts: &mut BTreeMap<ExplanationSource, usize>,
    ) {
        for table in schema.tables.values() {
            for column in table.columns.values() {
                let Some(explanation) = column.explanation.as_ref() else {
                    continue;
                };
                let id = Node::column_id(&table.name, &column.name);
                let updated = self
                    .graph
                    .update_node(&id, |node| {
                        node.properties.localized_name = Some(explanation.localized_name.clone());
                        node.properties.description = Some(explanation.description.clone());
                        node.properties.business_meaning =
                            Some(explanation.business_meaning.clone());
                        node.properties.explanation_confidence = Some(explanation.confidence);
                        node.properties.explanation_source = Some(explanation.source);
                    })
                    .await;
                if updated {
                    *counts.entry(explanation.source).or_insert(0) += 1;
                }
            }

            if let Some(explanation) = table.explanation.as_ref() {
                self.graph
                    .update_node(&table.name, |node| {
                        node.properties.localized_name = Some(explanation.localized_name.clone());
                        node.properties.description = Some(explanation.description.clone());
                        node.properties.business_meaning =
                            Some(explanation.business_meaning.clone());
                        node.properties.explanation_confidence = Some(explanation.confidence);
                    })
                    .await;
            }
        }
    }

    /// Table-level relationships land as dependency edges between table
    /// nodes.
    async fn add_table_relationship_edge(&self, relationship: &TableRelationship) {
        let edge = Edge {
            id: format!("{}->{}", relationship.from_table, relationship.to_table),
            kind: EdgeKind::Dependency,
            from: relationship.from_table.clone(),
            to: relationship.to_table.clone(),
            confidence: relationship.confidence,
            evidence: Vec::new(),
            properties: crate::graph::EdgeProps {
                from_table: Some(relationship.from_table.clone()),
                to_table: Some(relationship.to_table.clone()),
                relation_type: Some(relationship.relation_type.clone()),
                description: Some(relationship.description.clone()),
                ..crate::graph::EdgeProps::default()
            },
        };
        self.graph.add_edge(edge).await;
    }
}
