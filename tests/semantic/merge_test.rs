#[cfg(test)]
mod tests {
    use cartograph::error::ScanStage;
    use cartograph::graph::{Edge, EdgeKind};
    use cartograph::metadata::{ColumnMeta, ColumnStats, SchemaMetadata, TableMeta, ValueCount};
    use cartograph::semantic::{
        limits, ExplanationSource, HybridAnalyzer, RuleBasedExplainer,
    };
    use std::collections::HashMap;
    use std::sync::Arc;

    fn col(name: &str) -> ColumnMeta {
        ColumnMeta {
            name: name.to_string(),
            data_type: "varchar".to_string(),
            length: 20,
            nullable: false,
            is_primary_key: false,
        }
    }

    fn erp_meta() -> SchemaMetadata {
        SchemaMetadata {
            tables: vec![
                TableMeta {
                    schema: String::new(),
                    name: "orders".to_string(),
                    columns: vec![
                        col("cInvCode"),
                        col("dDate"),
                        col("iQty"),
                        col("cFree1"),
                    ],
                },
                TableMeta {
                    schema: String::new(),
                    name: "department".to_string(),
                    columns: vec![col("cDepCode"), col("cDepName")],
                },
                TableMeta {
                    schema: String::new(),
                    name: "person".to_string(),
                    columns: vec![col("cPersonCode")],
                },
            ],
            foreign_keys: Vec::new(),
        }
    }

    fn edge(from_column: &str, to_table: &str, to_column: &str, confidence: f64) -> Edge {
        Edge::between_columns(
            EdgeKind::InferredForeignKey,
            "orders",
            from_column,
            to_table,
            to_column,
            confidence,
            Vec::new(),
        )
    }

    fn analyzer() -> HybridAnalyzer<RuleBasedExplainer> {
        HybridAnalyzer::new(Arc::new(RuleBasedExplainer::new()))
    }

    #[tokio::test]
    async fn test_rules_explain_standard_columns() {
        let outcome = analyzer().analyze(&erp_meta(), &[], &HashMap::new()).await;

        let orders = outcome.schema.tables.get("orders").unwrap();
        let inv = orders.columns.get("cInvCode").unwrap();
        let explanation = inv.explanation.as_ref().unwrap();
        assert_eq!(explanation.localized_name, "code");
        assert_eq!(explanation.source, ExplanationSource::RuleBased);
        assert_eq!(explanation.confidence, 0.6);

        let date = orders.columns.get("dDate").unwrap();
        assert_eq!(
            date.explanation.as_ref().unwrap().localized_name,
            "date"
        );
        let qty = orders.columns.get("iQty").unwrap();
        assert_eq!(
            qty.explanation.as_ref().unwrap().localized_name,
            "quantity"
        );
    }

    #[tokio::test]
    async fn test_unsupported_table_operations_are_recorded() {
        let outcome = analyzer().analyze(&erp_meta(), &[], &HashMap::new()).await;

        // The rule source answers neither table meanings nor relationships;
        // each miss is recorded and nothing fails.
        let meanings = outcome
            .skipped
            .iter()
            .filter(|s| s.stage == ScanStage::TableMeaning)
            .count();
        assert_eq!(meanings, 3);
        assert!(outcome
            .skipped
            .iter()
            .any(|s| s.stage == ScanStage::TableRelationships));
        assert!(outcome.schema.table_relationships.is_empty());

        for table in outcome.schema.tables.values() {
            assert!(table.explanation.is_none());
        }
    }

    #[tokio::test]
    async fn test_custom_column_inherits_through_edge() {
        let edges = vec![edge("cFree1", "department", "cDepCode", 0.9)];
        let outcome = analyzer().analyze(&erp_meta(), &edges, &HashMap::new()).await;

        let free = outcome
            .schema
            .tables
            .get("orders")
            .unwrap()
            .columns
            .get("cFree1")
            .unwrap();
        let explanation = free.explanation.as_ref().unwrap();

        // The rule source cannot infer custom fields, so the meaning comes
        // through the edge with the trust decay applied: 0.9 * 0.7.
        assert_eq!(explanation.source, ExplanationSource::RelationDerived);
        assert!((explanation.confidence - 0.63).abs() < 1e-9);
        assert!(explanation.description.contains("department.cDepCode"));
        assert!(explanation.localized_name.contains("code"));
    }

    #[tokio::test]
    async fn test_strongest_related_field_wins() {
        let edges = vec![
            edge("cFree1", "department", "cDepCode", 0.5),
            edge("cFree1", "person", "cPersonCode", 0.9),
        ];
        let outcome = analyzer().analyze(&erp_meta(), &edges, &HashMap::new()).await;

        let free = outcome
            .schema
            .tables
            .get("orders")
            .unwrap()
            .columns
            .get("cFree1")
            .unwrap();
        let explanation = free.explanation.as_ref().unwrap();
        assert!(explanation.description.contains("person.cPersonCode"));
        assert!((explanation.confidence - 0.63).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_custom_without_edges_gets_placeholder() {
        let outcome = analyzer().analyze(&erp_meta(), &[], &HashMap::new()).await;

        let free = outcome
            .schema
            .tables
            .get("orders")
            .unwrap()
            .columns
            .get("cFree1")
            .unwrap();
        let explanation = free.explanation.as_ref().unwrap();
        assert_eq!(explanation.confidence, limits::PLACEHOLDER_CONFIDENCE);
        assert_eq!(explanation.source, ExplanationSource::RelationDerived);
    }

    #[tokio::test]
    async fn test_sampled_stats_reach_the_source() {
        let mut stats = HashMap::new();
        stats.insert(
            "orders.cInvCode".to_string(),
            ColumnStats {
                total_rows: 1000,
                null_count: 0,
                distinct_count: 4,
                top_values: vec![ValueCount {
                    value: "A01".to_string(),
                    count: 700,
                }],
            },
        );

        let outcome = analyzer().analyze(&erp_meta(), &[], &stats).await;

        // The low distinct rate shows up as a cardinality hint in the
        // explanation the rules produced.
        let inv = outcome
            .schema
            .tables
            .get("orders")
            .unwrap()
            .columns
            .get("cInvCode")
            .unwrap();
        assert!(inv
            .explanation
            .as_ref()
            .unwrap()
            .business_meaning
            .contains("low cardinality"));

        // Same column name elsewhere without stats keeps the plain meaning.
        let dep = outcome
            .schema
            .tables
            .get("department")
            .unwrap()
            .columns
            .get("cDepCode")
            .unwrap();
        assert!(!dep
            .explanation
            .as_ref()
            .unwrap()
            .business_meaning
            .contains("cardinality"));
    }
}
