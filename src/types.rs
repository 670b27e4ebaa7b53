use crate::criteria::{Criterion, Direction};
use crate::data::{VariantId, VariantSnapshot};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Full comparison request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRequest {
    pub variant_ids: Vec<VariantId>,
    /// Criteria names; omitted or empty means the default criteria
    #[serde(default)]
    pub criteria: Option<Vec<String>>,
    /// Weight per criterion name; unlisted criteria weigh 1.0.
    /// Keys naming the same criterion (`price`, `PRICE`) are rejected.
    #[serde(default)]
    pub weights: Option<BTreeMap<String, f64>>,
}

impl ComparisonRequest {
    pub fn new(variant_ids: impl Into<Vec<VariantId>>) -> Self {
        Self {
            variant_ids: variant_ids.into(),
            criteria: None,
            weights: None,
        }
    }

    pub fn with_criteria<S: Into<String>>(mut self, criteria: impl IntoIterator<Item = S>) -> Self {
        self.criteria = Some(criteria.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_weight(mut self, criterion: impl Into<String>, weight: f64) -> Self {
        self.weights
            .get_or_insert_with(BTreeMap::new)
            .insert(criterion.into(), weight);
        self
    }
}

/// Criterion as it was applied in a comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedCriterion {
    pub criterion: Criterion,
    pub unit: String,
    pub direction: Direction,
    pub weight: f64,
}

/// Raw and normalized value of one criterion for one variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionScore {
    pub criterion: Criterion,
    pub raw_value: Option<f64>,
    /// 0-1, HIGH = GOOD
    pub normalized_score: f64,
}

/// One compared variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRow {
    /// 1 = best
    pub rank: usize,
    pub variant: VariantSnapshot,
    pub scores: Vec<CriterionScore>,
    /// Weighted mean of `scores`, 0-1
    pub aggregate_score: f64,
}

impl ComparisonRow {
    pub fn score(&self, criterion: Criterion) -> Option<f64> {
        self.scores
            .iter()
            .find(|s| s.criterion == criterion)
            .map(|s| s.normalized_score)
    }
}

/// Variant that scored best on a single criterion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionWinner {
    pub criterion: Criterion,
    pub variant_id: VariantId,
}

/// Outcome of a comparison call
///
/// `rows` are ordered by rank. Identifiers that did not resolve are not
/// reported here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub criteria: Vec<AppliedCriterion>,
    pub rows: Vec<ComparisonRow>,
    pub best_value_id: VariantId,
    pub criterion_winners: Vec<CriterionWinner>,
}

impl ComparisonResult {
    pub fn row(&self, id: VariantId) -> Option<&ComparisonRow> {
        self.rows.iter().find(|r| r.variant.id == id)
    }

    pub fn winner(&self, criterion: Criterion) -> Option<VariantId> {
        self.criterion_winners
            .iter()
            .find(|w| w.criterion == criterion)
            .map(|w| w.variant_id)
    }

    /// Identifiers in rank order
    pub fn ranked_ids(&self) -> Vec<VariantId> {
        self.rows.iter().map(|r| r.variant.id).collect()
    }
}
