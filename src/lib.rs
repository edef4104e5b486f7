//! # Cartograph
//!
//! An evidence-based schema relationship and semantic inference engine.
//!
//! ## Architecture
//!
//! Cartograph turns raw metadata into an annotated evidence graph:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │            MetadataProvider (schema + samples)           │
//! │      (tables, columns, row counts, value histograms)     │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [scan]
//! ┌─────────────────────────────────────────────────────────┐
//! │        EvidenceGraph (column nodes, declared edges)      │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [inference + enums]
//! ┌─────────────────────────────────────────────────────────┐
//! │     Inferred FK edges (naming / type / containment)      │
//! │     + enum-table annotations on table nodes              │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [semantic merge]
//! ┌─────────────────────────────────────────────────────────┐
//! │   Column explanations, custom-field inheritance, and     │
//! │   table-level dependency edges                           │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Every stage degrades per item: a column whose samples cannot be read
//! loses its statistics, not the scan.

pub mod cancel;
pub mod config;
pub mod enums;
pub mod error;
pub mod graph;
pub mod inference;
pub mod metadata;
pub mod scan;
pub mod semantic;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::cancel::CancellationToken;
    pub use crate::config::Settings;
    pub use crate::enums::{EnumDetector, EnumTableCandidate};
    pub use crate::error::{ScanError, ScanStage, SkippedItem};
    pub use crate::graph::{
        Edge, EdgeKind, Evidence, EvidenceGraph, GraphSnapshot, Node, NodeKind,
    };
    pub use crate::inference::{InferenceConfig, InferenceOutcome, RelationshipInferer};
    pub use crate::metadata::{
        ColumnMeta, ColumnStats, FixtureProvider, MetadataProvider, SchemaMetadata, TableMeta,
    };
    pub use crate::scan::{ScanContext, ScanOptions, ScanReport};
    pub use crate::semantic::{
        ExplanationSource, FieldExplanation, HybridAnalyzer, RuleBasedExplainer, SemanticSource,
    };
}

// Also export the pipeline entry points at the crate root.
pub use error::ScanError;
pub use graph::EvidenceGraph;
pub use scan::{ScanContext, ScanReport};
