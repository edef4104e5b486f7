#[cfg(test)]
mod tests {
    use cartograph::cancel::CancellationToken;
    use cartograph::graph::EdgeKind;
    use cartograph::inference::{InferenceConfig, RelationshipInferer};
    use cartograph::metadata::{
        ColumnMeta, ColumnStats, MetadataProvider, ProviderResult, SchemaMetadata, TableMeta,
        ValueCount,
    };
    use std::collections::HashMap;
    use std::sync::Arc;

    struct MapProvider {
        stats: HashMap<String, ColumnStats>,
    }

    impl MapProvider {
        fn new() -> Self {
            Self {
                stats: HashMap::new(),
            }
        }

        fn with_stats(mut self, table: &str, column: &str, values: &[(&str, i64)]) -> Self {
            let total: i64 = values.iter().map(|(_, count)| count).sum();
            self.stats.insert(
                format!("{table}.{column}"),
                ColumnStats {
                    total_rows: total,
                    null_count: 0,
                    distinct_count: values.len() as i64,
                    top_values: values
                        .iter()
                        .map(|(value, count)| ValueCount {
                            value: value.to_string(),
                            count: *count,
                        })
                        .collect(),
                },
            );
            self
        }
    }

    #[async_trait::async_trait]
    impl MetadataProvider for MapProvider {
        async fn introspect_schema(&self) -> ProviderResult<SchemaMetadata> {
            Ok(SchemaMetadata::default())
        }

        async fn estimate_row_count(&self, _table: &str) -> ProviderResult<i64> {
            Ok(0)
        }

        async fn sample_column_stats(
            &self,
            table: &str,
            column: &str,
            _sample_size: usize,
        ) -> ProviderResult<ColumnStats> {
            Ok(self
                .stats
                .get(&format!("{table}.{column}"))
                .cloned()
                .unwrap_or_default())
        }
    }

    /// Cancels the shared token from inside the first sampling call.
    struct CancellingProvider {
        inner: MapProvider,
        cancel: CancellationToken,
    }

    #[async_trait::async_trait]
    impl MetadataProvider for CancellingProvider {
        async fn introspect_schema(&self) -> ProviderResult<SchemaMetadata> {
            self.inner.introspect_schema().await
        }

        async fn estimate_row_count(&self, table: &str) -> ProviderResult<i64> {
            self.inner.estimate_row_count(table).await
        }

        async fn sample_column_stats(
            &self,
            table: &str,
            column: &str,
            sample_size: usize,
        ) -> ProviderResult<ColumnStats> {
            self.cancel.cancel();
            self.inner.sample_column_stats(table, column, sample_size).await
        }
    }

    fn col(name: &str, data_type: &str, length: i64) -> ColumnMeta {
        ColumnMeta {
            name: name.to_string(),
            data_type: data_type.to_string(),
            length,
            nullable: false,
            is_primary_key: false,
        }
    }

    fn pk(name: &str, data_type: &str, length: i64) -> ColumnMeta {
        ColumnMeta {
            is_primary_key: true,
            ..col(name, data_type, length)
        }
    }

    fn table(name: &str, columns: Vec<ColumnMeta>) -> TableMeta {
        TableMeta {
            schema: String::new(),
            name: name.to_string(),
            columns,
        }
    }

    /// Orders referencing two master tables through prefixed code columns.
    fn erp_schema() -> SchemaMetadata {
        SchemaMetadata {
            tables: vec![
                table(
                    "orders",
                    vec![
                        pk("id", "int", 0),
                        col("cDepCode", "varchar", 20),
                        col("cPersonCode", "varchar", 20),
                        col("cMemo", "varchar", 200),
                    ],
                ),
                table(
                    "department",
                    vec![pk("cDepCode", "varchar", 20), col("cDepName", "varchar", 50)],
                ),
                table(
                    "person",
                    vec![
                        pk("cPersonCode", "varchar", 20),
                        col("cPersonName", "varchar", 50),
                    ],
                ),
            ],
            foreign_keys: Vec::new(),
        }
    }

    fn erp_provider() -> MapProvider {
        MapProvider::new()
            .with_stats(
                "orders",
                "cDepCode",
                &[("101", 400), ("102", 350), ("103", 250)],
            )
            .with_stats(
                "department",
                "cDepCode",
                &[("101", 1), ("102", 1), ("103", 1), ("104", 1)],
            )
            .with_stats("orders", "cPersonCode", &[("P01", 500), ("P02", 500)])
            .with_stats("person", "cPersonCode", &[("P01", 1), ("P02", 1)])
    }

    #[tokio::test]
    async fn test_multi_table_schema_yields_both_relationships() {
        let inferer = RelationshipInferer::new(Arc::new(erp_provider()));
        let outcome = inferer
            .infer_relationships(&erp_schema(), &CancellationToken::new())
            .await;

        // Three non-key orders columns against two foreign keys, plus one
        // non-key column in each master table against the two keys it does
        // not own.
        assert_eq!(outcome.comparisons, 10);
        assert!(outcome.skipped.is_empty());

        let mut ids: Vec<&str> = outcome.edges.iter().map(|e| e.id.as_str()).collect();
        ids.sort_unstable();
        assert_eq!(
            ids,
            vec![
                "orders.cDepCode->department.cDepCode",
                "orders.cPersonCode->person.cPersonCode",
            ]
        );
        for edge in &outcome.edges {
            assert_eq!(edge.kind, EdgeKind::InferredForeignKey);
            assert!((edge.confidence - 1.0).abs() < 1e-9);
        }
    }

    #[tokio::test]
    async fn test_partial_containment_weights_compose() {
        // Only two of the three frequent department codes exist in the
        // master table: containment 750/1000.
        let provider = MapProvider::new()
            .with_stats(
                "orders",
                "cDepCode",
                &[("101", 400), ("102", 350), ("999", 250)],
            )
            .with_stats("department", "cDepCode", &[("101", 1), ("102", 1)])
            .with_stats("orders", "cPersonCode", &[("P01", 1)])
            .with_stats("person", "cPersonCode", &[("X", 1)]);

        let inferer = RelationshipInferer::new(Arc::new(provider));
        let outcome = inferer
            .infer_relationships(&erp_schema(), &CancellationToken::new())
            .await;

        let edge = outcome
            .edges
            .iter()
            .find(|e| e.id == "orders.cDepCode->department.cDepCode")
            .unwrap();
        // 1.0 * 0.3 naming + 1.0 * 0.2 type + 0.75 * 0.5 containment.
        assert!((edge.confidence - 0.875).abs() < 1e-9);

        let containment = edge
            .evidence
            .iter()
            .find(|e| e.kind == "value_containment")
            .unwrap();
        assert!((containment.score - 0.75).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_containment_can_carry_unrelated_names() {
        // No naming overlap at all; type baseline plus strong containment
        // still clears the threshold.
        let meta = SchemaMetadata {
            tables: vec![
                table("audit_log", vec![col("cOperator", "varchar", 20)]),
                table("users", vec![pk("UserKey", "varchar", 20)]),
            ],
            foreign_keys: Vec::new(),
        };
        let provider = MapProvider::new()
            .with_stats("audit_log", "cOperator", &[("u1", 40), ("u2", 40), ("x", 20)])
            .with_stats("users", "UserKey", &[("u1", 1), ("u2", 1)]);

        let inferer = RelationshipInferer::new(Arc::new(provider));
        let outcome = inferer
            .infer_relationships(&meta, &CancellationToken::new())
            .await;

        assert_eq!(outcome.edges.len(), 1);
        let edge = &outcome.edges[0];
        // 1.0 * 0.2 type (equal lengths) + 0.8 * 0.5 containment.
        assert!((edge.confidence - 0.6).abs() < 1e-9);

        let kinds: Vec<&str> = edge.evidence.iter().map(|e| e.kind.as_str()).collect();
        assert_eq!(kinds, vec!["type_match", "value_containment"]);
    }

    #[tokio::test]
    async fn test_mid_run_cancellation_keeps_finished_work() {
        let cancel = CancellationToken::new();
        let provider = CancellingProvider {
            inner: erp_provider(),
            cancel: cancel.clone(),
        };

        let inferer = RelationshipInferer::new(Arc::new(provider));
        let outcome = inferer.infer_relationships(&erp_schema(), &cancel).await;

        // The comparison in flight when the token flipped still finishes
        // and keeps its edge; nothing after it starts.
        assert_eq!(outcome.comparisons, 1);
        assert_eq!(outcome.edges.len(), 1);
        assert_eq!(outcome.edges[0].id, "orders.cDepCode->department.cDepCode");
    }

    #[tokio::test]
    async fn test_single_table_has_no_candidates() {
        let meta = SchemaMetadata {
            tables: vec![table(
                "orders",
                vec![pk("id", "int", 0), col("cDepCode", "varchar", 20)],
            )],
            foreign_keys: Vec::new(),
        };
        let inferer = RelationshipInferer::new(Arc::new(MapProvider::new()));
        let outcome = inferer
            .infer_relationships(&meta, &CancellationToken::new())
            .await;

        assert_eq!(outcome.comparisons, 0);
        assert!(outcome.edges.is_empty());
    }

    #[tokio::test]
    async fn test_raised_threshold_filters_weaker_edges() {
        let config = InferenceConfig::default().with_min_confidence(0.9);
        let provider = MapProvider::new()
            .with_stats(
                "orders",
                "cDepCode",
                &[("101", 400), ("102", 350), ("999", 250)],
            )
            .with_stats("department", "cDepCode", &[("101", 1), ("102", 1)])
            .with_stats("orders", "cPersonCode", &[("P01", 500), ("P02", 500)])
            .with_stats("person", "cPersonCode", &[("P01", 1), ("P02", 1)]);

        let inferer = RelationshipInferer::with_config(Arc::new(provider), config);
        let outcome = inferer
            .infer_relationships(&erp_schema(), &CancellationToken::new())
            .await;

        // cDepCode lands at 0.875 and is filtered; cPersonCode at 1.0 stays.
        assert_eq!(outcome.edges.len(), 1);
        assert_eq!(outcome.edges[0].id, "orders.cPersonCode->person.cPersonCode");
    }
}
