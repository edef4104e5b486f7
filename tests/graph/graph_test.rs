#[cfg(test)]
mod tests {
    use cartograph::graph::{
        Edge, EdgeKind, Evidence, EvidenceGraph, GraphSnapshot, Node, NodeKind,
    };
    use cartograph::metadata::ColumnMeta;
    use std::sync::Arc;

    fn dep_column() -> ColumnMeta {
        ColumnMeta {
            name: "cDepCode".to_string(),
            data_type: "varchar".to_string(),
            length: 20,
            nullable: false,
            is_primary_key: false,
        }
    }

    fn dep_edge() -> Edge {
        Edge::between_columns(
            EdgeKind::InferredForeignKey,
            "orders",
            "cDepCode",
            "department",
            "cDepCode",
            0.85,
            vec![Evidence {
                kind: "naming_similarity".to_string(),
                score: 1.0,
                description: "column names are similar".to_string(),
                details: "cDepCode ~ cDepCode (1.00)".to_string(),
            }],
        )
    }

    #[tokio::test]
    async fn test_insert_and_look_up() {
        let graph = EvidenceGraph::new();
        graph.add_node(Node::table("orders", "dbo")).await;
        graph
            .add_node(Node::column("orders", &dep_column(), None))
            .await;
        graph.add_edge(dep_edge()).await;

        assert_eq!(graph.node_count().await, 2);
        assert_eq!(graph.edge_count().await, 1);

        let node = graph.get_node("orders.cDepCode").await.unwrap();
        assert_eq!(node.kind, NodeKind::Column);
        assert_eq!(node.properties.table.as_deref(), Some("orders"));

        let edge = graph
            .get_edge("orders.cDepCode->department.cDepCode")
            .await
            .unwrap();
        assert_eq!(edge.kind, EdgeKind::InferredForeignKey);
        assert_eq!(edge.evidence.len(), 1);
    }

    #[tokio::test]
    async fn test_reinsert_replaces_in_place() {
        let graph = EvidenceGraph::new();
        graph.add_node(Node::table("orders", "")).await;
        graph.add_node(Node::table("orders", "dbo")).await;

        assert_eq!(graph.node_count().await, 1);
        let node = graph.get_node("orders").await.unwrap();
        assert_eq!(node.properties.schema.as_deref(), Some("dbo"));

        let mut stronger = dep_edge();
        stronger.confidence = 0.95;
        graph.add_edge(dep_edge()).await;
        graph.add_edge(stronger).await;

        assert_eq!(graph.edge_count().await, 1);
        let edge = graph
            .get_edge("orders.cDepCode->department.cDepCode")
            .await
            .unwrap();
        assert_eq!(edge.confidence, 0.95);
    }

    #[tokio::test]
    async fn test_update_node_annotates_existing() {
        let graph = EvidenceGraph::new();
        graph.add_node(Node::table("t_status", "")).await;

        let updated = graph
            .update_node("t_status", |node| {
                node.properties.enum_key_column = Some("cStatusCode".to_string());
                node.properties.enum_confidence = Some(1.0);
            })
            .await;
        assert!(updated);

        let node = graph.get_node("t_status").await.unwrap();
        assert_eq!(
            node.properties.enum_key_column.as_deref(),
            Some("cStatusCode")
        );

        // Unknown IDs report false and change nothing.
        let updated = graph.update_node("missing", |_| {}).await;
        assert!(!updated);
        assert_eq!(graph.node_count().await, 1);
    }

    #[tokio::test]
    async fn test_edges_from_filters_by_source_column() {
        let graph = EvidenceGraph::new();
        graph.add_edge(dep_edge()).await;
        graph
            .add_edge(Edge::between_columns(
                EdgeKind::InferredForeignKey,
                "orders",
                "cPersonCode",
                "person",
                "cPersonCode",
                0.9,
                Vec::new(),
            ))
            .await;

        let edges = graph.edges_from("orders", "cDepCode").await;
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].to, "department.cDepCode");

        assert!(graph.edges_from("orders", "cMemo").await.is_empty());
        assert!(graph.edges_from("department", "cDepCode").await.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_writers_all_land() {
        let graph = Arc::new(EvidenceGraph::new());
        let mut handles = Vec::new();
        for i in 0..16 {
            let graph = Arc::clone(&graph);
            handles.push(tokio::spawn(async move {
                graph.add_node(Node::table(&format!("t{i}"), "")).await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(graph.node_count().await, 16);
    }

    #[tokio::test]
    async fn test_snapshot_is_detached() {
        let graph = EvidenceGraph::new();
        graph.add_node(Node::table("orders", "")).await;
        let snapshot = graph.export_snapshot().await;

        graph.add_node(Node::table("department", "")).await;
        graph.add_edge(dep_edge()).await;

        assert_eq!(snapshot.nodes.len(), 1);
        assert!(snapshot.edges.is_empty());
        assert_eq!(graph.node_count().await, 2);
    }

    #[tokio::test]
    async fn test_snapshot_round_trips_through_json() {
        let graph = EvidenceGraph::new();
        graph.add_node(Node::table("orders", "dbo")).await;
        graph
            .add_node(Node::column("orders", &dep_column(), None))
            .await;
        graph.add_edge(dep_edge()).await;

        let json = graph.to_json().await.unwrap();
        let parsed: GraphSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, graph.export_snapshot().await);

        // Unset annotations never appear on the wire.
        assert!(!json.contains("enum_key_column"));
        assert!(json.contains("\"inferred_fk\""));
    }
}
