//! Individual scoring signals combined by the inference engine.
//!
//! Each signal scores one aspect of a candidate column pair in isolation
//! and knows nothing about the others; the engine weighs and sums them.

pub mod containment;
pub mod naming;
pub mod types;

use super::thresholds::weight;

/// Identifies which signal produced a piece of evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Naming,
    TypeMatch,
    Containment,
}

impl SignalKind {
    /// Stable identifier used in evidence records.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Naming => "naming_similarity",
            Self::TypeMatch => "type_match",
            Self::Containment => "value_containment",
        }
    }

    /// Aggregation weight of this signal.
    pub fn weight(self) -> f64 {
        match self {
            Self::Naming => weight::NAMING,
            Self::TypeMatch => weight::TYPE_MATCH,
            Self::Containment => weight::CONTAINMENT,
        }
    }
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
