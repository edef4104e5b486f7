//! Rule-based explanation source.
//!
//! Maps common column-name stems to fixed explanations and refines the
//! business meaning with a cardinality hint when sampled statistics are
//! available. Needs no network, so it doubles as the offline default
//! source; the operations it cannot answer return `Unsupported` and the
//! merge stage falls back to its degraded paths.

use std::collections::HashMap;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use crate::metadata::{ColumnStats, TableMeta};

use super::source::{SemanticError, SemanticResult, SemanticSource};
use super::{
    ExplanationSource, FieldContext, FieldExplanation, RelatedField, TableExplanation,
    TableRelationship,
};

/// Cardinality cutoffs for statistics hints.
mod hints {
    /// Distinct rate above this reads as an identifier-like column.
    pub const IDENTIFIER_MIN: f64 = 0.95;
    /// Distinct rate below this reads as a category-like column.
    pub const CATEGORY_MAX: f64 = 0.1;
}

/// One name-pattern rule. First matching rule wins.
struct NameRule {
    pattern: Regex,
    localized_name: &'static str,
    description: &'static str,
    confidence: f64,
}

static NAME_RULES: LazyLock<Vec<NameRule>> = LazyLock::new(|| {
    let rule = |pattern: &str, localized_name, description, confidence| NameRule {
        pattern: Regex::new(pattern).unwrap(),
        localized_name,
        description,
        confidence,
    };
    vec![
        rule(
            r"(?i)code$",
            "code",
            "business key referencing a master-data entity",
            0.6,
        ),
        rule(r"(?i)id$", "identifier", "system identifier", 0.6),
        rule(r"(?i)name$", "name", "display name", 0.6),
        rule(r"(?i)date$", "date", "calendar date of the event", 0.6),
        rule(r"(?i)time$", "timestamp", "point in time of the event", 0.5),
        rule(
            r"(?i)(money|amount|amt)$",
            "amount",
            "monetary amount",
            0.5,
        ),
        rule(r"(?i)(qty|quantity)$", "quantity", "measured quantity", 0.5),
        rule(r"(?i)price$", "unit price", "per-unit price", 0.5),
        rule(r"(?i)rate$", "rate", "ratio or percentage", 0.5),
        rule(
            r"(?i)(memo|remark|note)$",
            "remark",
            "free-text remark",
            0.5,
        ),
        rule(r"(?i)flag$", "flag", "boolean marker", 0.5),
    ]
});

/// Cardinality-based reading of a sampled column.
fn cardinality_hint(stats: &ColumnStats) -> Option<&'static str> {
    let rate = stats.distinct_rate()?;
    if rate > hints::IDENTIFIER_MIN {
        Some("near-unique across rows, likely an identifier")
    } else if rate < hints::CATEGORY_MAX {
        Some("low cardinality, likely a category value")
    } else {
        None
    }
}

fn explain_field(field: &FieldContext) -> Option<FieldExplanation> {
    let rule = NAME_RULES
        .iter()
        .find(|rule| rule.pattern.is_match(&field.column_name))?;

    let business_meaning = match field.stats.as_ref().and_then(cardinality_hint) {
        Some(hint) => format!("{}; {hint}", rule.description),
        None => rule.description.to_string(),
    };

    Some(FieldExplanation {
        column_name: field.column_name.clone(),
        localized_name: rule.localized_name.to_string(),
        description: rule.description.to_string(),
        business_meaning,
        confidence: rule.confidence,
        source: ExplanationSource::RuleBased,
    })
}

/// Offline explanation source driven by [`NAME_RULES`].
#[derive(Debug, Default)]
pub struct RuleBasedExplainer;

impl RuleBasedExplainer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SemanticSource for RuleBasedExplainer {
    async fn explain_batch(
        &self,
        fields: &[FieldContext],
    ) -> SemanticResult<HashMap<String, FieldExplanation>> {
        let mut explained = HashMap::new();
        for field in fields {
            if let Some(explanation) = explain_field(field) {
                explained.insert(field.column_name.clone(), explanation);
            }
        }
        Ok(explained)
    }

    async fn infer_custom_field(
        &self,
        _column_name: &str,
        _related: &[RelatedField],
    ) -> SemanticResult<FieldExplanation> {
        Err(SemanticError::Unsupported("infer_custom_field"))
    }

    async fn explain_table_meaning(&self, _table: &TableMeta) -> SemanticResult<TableExplanation> {
        Err(SemanticError::Unsupported("explain_table_meaning"))
    }

    async fn infer_table_relationships(
        &self,
        _tables: &[TableMeta],
    ) -> SemanticResult<Vec<TableRelationship>> {
        Err(SemanticError::Unsupported("infer_table_relationships"))
    }
}
