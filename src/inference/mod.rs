//! Pairwise relationship inference.
//!
//! Walks every (non-key column, key column) pair across distinct tables and
//! scores each with three independent signals. A pair whose weighted total
//! clears the acceptance threshold becomes an inferred foreign-key edge
//! carrying the contributing signals as evidence.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  candidate pair (orders.cDepCode, department.cDepCode)   │
//! └──────────────────────────────────────────────────────────┘
//!        │                  │                    │
//!        ▼                  ▼                    ▼
//!   naming (0.3)      type match (0.2)    containment (0.5)
//!        │                  │                    │
//!        └──────────────────┴────────────────────┘
//!                           │
//!                           ▼
//!          weighted total > 0.3 → inferred_fk edge
//! ```

pub mod engine;
pub mod signals;

pub use engine::{InferenceConfig, InferenceOutcome, RelationshipInferer};

/// Heuristic constants, centralized so tuning never touches algorithm code.
pub mod thresholds {
    /// Signal weights. They sum to 1.0, keeping edge confidence in [0, 1].
    pub mod weight {
        /// Naming-similarity signal.
        pub const NAMING: f64 = 0.3;
        /// Type-compatibility signal.
        pub const TYPE_MATCH: f64 = 0.2;
        /// Value-containment signal, the dominant one.
        pub const CONTAINMENT: f64 = 0.5;
    }

    /// Per-signal cutoffs and the edge acceptance threshold.
    pub mod cutoff {
        /// Weighted total must exceed this for an edge to be emitted.
        pub const EDGE_MIN: f64 = 0.3;
        /// Naming similarity must exceed this to contribute evidence.
        pub const NAMING_MIN: f64 = 0.3;
        /// Levenshtein-derived similarity below this scores zero.
        pub const LEVENSHTEIN_MIN: f64 = 0.7;
        /// Containment must exceed this to contribute evidence.
        pub const CONTAINMENT_MIN: f64 = 0.3;
    }

    /// Fixed signal scores.
    pub mod score {
        /// Naming score when one normalized name contains the other.
        pub const NAME_CONTAINS: f64 = 0.8;
        /// Type score for an exact declared-length match.
        pub const LENGTH_EXACT: f64 = 1.0;
        /// Type score when declared lengths are close.
        pub const LENGTH_CLOSE: f64 = 0.8;
        /// Minimum min/max length ratio to count as close.
        pub const LENGTH_RATIO_MIN: f64 = 0.8;
        /// Type score for compatible types with unknown or distant lengths.
        pub const COMPATIBLE_BASELINE: f64 = 0.6;
    }

    /// Sampling limits for the containment signal.
    pub mod sampling {
        /// Rows sampled from the candidate foreign-key column.
        pub const SOURCE_ROWS: usize = 1000;
        /// Rows sampled from the candidate key column.
        pub const KEY_ROWS: usize = 10000;
    }

    /// Progress is reported every this many comparisons.
    pub const PROGRESS_INTERVAL: u64 = 100;
}
