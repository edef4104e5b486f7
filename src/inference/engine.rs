//! Relationship inference engine.
//!
//! The engine enumerates every candidate pair up front so progress can be
//! reported against a known total, then scores pairs with the three signals.
//! Primary-key columns are never treated as the referencing side, and a
//! table is never compared against itself.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::cancel::CancellationToken;
use crate::error::{ScanStage, SkippedItem};
use crate::graph::{Edge, EdgeKind, Evidence};
use crate::metadata::{ColumnMeta, MetadataProvider, SchemaMetadata, TableMeta};

use super::signals::{containment, naming, types, SignalKind};
use super::thresholds::{cutoff, PROGRESS_INTERVAL};

/// Tunables for one inference run.
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    /// Weighted total a pair must exceed to become an edge.
    pub min_confidence: f64,
    /// Naming similarity must exceed this to contribute evidence.
    pub min_naming: f64,
    /// Containment must exceed this to contribute evidence.
    pub min_containment: f64,
    /// Upper bound on concurrent containment-sampling calls.
    pub max_concurrent_samples: usize,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            min_confidence: cutoff::EDGE_MIN,
            min_naming: cutoff::NAMING_MIN,
            min_containment: cutoff::CONTAINMENT_MIN,
            max_concurrent_samples: 1,
        }
    }
}

impl InferenceConfig {
    /// Set the edge acceptance threshold, clamped to [0, 1].
    #[must_use]
    pub fn with_min_confidence(mut self, threshold: f64) -> Self {
        self.min_confidence = threshold.clamp(0.0, 1.0);
        self
    }

    /// Set the sampling concurrency bound (at least 1).
    #[must_use]
    pub fn with_max_concurrent_samples(mut self, limit: usize) -> Self {
        self.max_concurrent_samples = limit.max(1);
        self
    }
}

/// Result of one inference run.
#[derive(Debug, Default)]
pub struct InferenceOutcome {
    /// Accepted edges.
    pub edges: Vec<Edge>,
    /// Pairs whose containment sampling failed.
    pub skipped: Vec<SkippedItem>,
    /// Column comparisons actually performed.
    pub comparisons: u64,
}

/// One candidate (referencing column, key column) pair.
struct Pair<'a> {
    from_table: &'a str,
    from_column: &'a ColumnMeta,
    to_table: &'a str,
    to_column: &'a ColumnMeta,
}

impl Pair<'_> {
    fn subject(&self) -> String {
        format!(
            "{}.{} -> {}.{}",
            self.from_table, self.from_column.name, self.to_table, self.to_column.name
        )
    }
}

/// Every non-key column paired against every other table's key columns.
fn candidate_pairs(tables: &[TableMeta]) -> Vec<Pair<'_>> {
    let mut pairs = Vec::new();
    for from_table in tables {
        for from_column in &from_table.columns {
            if from_column.is_primary_key {
                continue;
            }
            for to_table in tables {
                if to_table.name == from_table.name {
                    continue;
                }
                for to_column in &to_table.columns {
                    if !to_column.is_primary_key {
                        continue;
                    }
                    pairs.push(Pair {
                        from_table: &from_table.name,
                        from_column,
                        to_table: &to_table.name,
                        to_column,
                    });
                }
            }
        }
    }
    pairs
}

/// Scores candidate pairs and emits evidence-weighted edges.
pub struct RelationshipInferer<P> {
    provider: Arc<P>,
    config: InferenceConfig,
}

impl<P: MetadataProvider> RelationshipInferer<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self::with_config(provider, InferenceConfig::default())
    }

    pub fn with_config(provider: Arc<P>, config: InferenceConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Infer relationships across the whole schema.
    ///
    /// Cancellation is honored between comparisons; edges found so far stay
    /// in the outcome either way. Sampling failures skip the containment
    /// signal for that pair only.
    pub async fn infer_relationships(
        &self,
        meta: &SchemaMetadata,
        cancel: &CancellationToken,
    ) -> InferenceOutcome {
        let pairs = candidate_pairs(&meta.tables);
        let total = pairs.len() as u64;
        info!(
            tables = meta.tables.len(),
            pairs = total,
            "relationship inference started"
        );

        let concurrency = self.config.max_concurrent_samples.max(1);
        let mut results = stream::iter(pairs.into_iter().map(|pair| {
            let cancel = cancel.clone();
            async move {
                if cancel.is_cancelled() {
                    return None;
                }
                Some(self.score_pair(&pair).await)
            }
        }))
        .buffer_unordered(concurrency);

        let mut outcome = InferenceOutcome::default();
        while let Some(result) = results.next().await {
            let Some((edge, skipped)) = result else {
                continue;
            };

            outcome.comparisons += 1;
            if outcome.comparisons % PROGRESS_INTERVAL == 0 {
                info!(
                    completed = outcome.comparisons,
                    total,
                    pct = (outcome.comparisons as f64 / total as f64 * 100.0).round(),
                    "comparison progress"
                );
            }

            if let Some(item) = skipped {
                outcome.skipped.push(item);
            }
            if let Some(edge) = edge {
                debug!(edge = %edge.id, confidence = edge.confidence, "relationship inferred");
                outcome.edges.push(edge);
            }

            if cancel.is_cancelled() {
                info!(
                    completed = outcome.comparisons,
                    total, "inference cancelled"
                );
                break;
            }
        }
        drop(results);

        info!(
            edges = outcome.edges.len(),
            skipped = outcome.skipped.len(),
            comparisons = outcome.comparisons,
            "relationship inference complete"
        );
        outcome
    }

    /// Score one pair. Returns the accepted edge, if any, and the skipped
    /// record when containment sampling failed.
    async fn score_pair(&self, pair: &Pair<'_>) -> (Option<Edge>, Option<SkippedItem>) {
        let from = pair.from_column;
        let to = pair.to_column;
        let mut evidence = Vec::new();
        let mut confidence = 0.0;
        let mut skipped = None;

        let name_score = naming::similarity(&from.name, &to.name);
        if name_score > self.config.min_naming {
            evidence.push(Evidence {
                kind: SignalKind::Naming.as_str().to_string(),
                score: name_score,
                description: "column names are similar".to_string(),
                details: format!("{} ~ {} ({name_score:.2})", from.name, to.name),
            });
            confidence += name_score * SignalKind::Naming.weight();
        }

        let type_score = types::match_score(from, to);
        if type_score > 0.0 {
            evidence.push(Evidence {
                kind: SignalKind::TypeMatch.as_str().to_string(),
                score: type_score,
                description: "data types are compatible".to_string(),
                details: format!(
                    "{}({}) ~ {}({})",
                    from.data_type, from.length, to.data_type, to.length
                ),
            });
            confidence += type_score * SignalKind::TypeMatch.weight();
        }

        match containment::score(
            self.provider.as_ref(),
            pair.from_table,
            &from.name,
            pair.to_table,
            &to.name,
        )
        .await
        {
            Ok(containment_score) => {
                if containment_score > self.config.min_containment {
                    evidence.push(Evidence {
                        kind: SignalKind::Containment.as_str().to_string(),
                        score: containment_score,
                        description: "sampled values are contained in the target".to_string(),
                        details: format!(
                            "{:.1}% of frequent source values found in target",
                            containment_score * 100.0
                        ),
                    });
                    confidence += containment_score * SignalKind::Containment.weight();
                }
            }
            Err(err) => {
                let subject = pair.subject();
                warn!(pair = %subject, error = %err, "containment sampling failed, signal skipped");
                skipped = Some(SkippedItem::new(
                    ScanStage::Containment,
                    subject,
                    err.to_string(),
                ));
            }
        }

        if evidence.is_empty() || confidence <= self.config.min_confidence {
            return (None, skipped);
        }

        let edge = Edge::between_columns(
            EdgeKind::InferredForeignKey,
            pair.from_table,
            &from.name,
            pair.to_table,
            &to.name,
            confidence,
            evidence,
        );
        (Some(edge), skipped)
    }
}
