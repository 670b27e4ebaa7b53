//! Ranking & Scoring Engine
//!
//! Combines the per-criterion normalized scores into an aggregate per variant,
//! ranks the variants, and picks a winner for each criterion and overall.
//!
//! Pure function of (snapshots, criteria, weights): inputs are borrowed and
//! never modified.

use crate::criteria::CriterionDefinition;
use crate::data::{VariantId, VariantSnapshot};
use crate::error::CompareError;
use crate::types::{
    AppliedCriterion, ComparisonResult, ComparisonRow, CriterionScore, CriterionWinner,
};
use crate::utils::normalization::{normalize_all, NormalizedColumn};
use std::cmp::Ordering;

/// A selected criterion together with the weight it carries
#[derive(Debug, Clone, Copy)]
pub struct WeightedCriterion<'a> {
    pub definition: &'a CriterionDefinition,
    pub weight: f64,
}

/// Weighted mean of normalized scores
///
/// Weights are non-negative, so raising any single score never lowers the
/// result. Returns 0.0 when the weights sum to zero.
///
/// Weights are rescaled by the largest one first: the mean is unchanged and
/// the running totals stay finite for any finite weights.
pub fn aggregate_score(scores: &[f64], weights: &[f64]) -> f64 {
    let largest = weights.iter().copied().fold(0.0_f64, f64::max);
    if largest <= 0.0 {
        return 0.0;
    }

    let (weighted, total) = scores
        .iter()
        .zip(weights)
        .map(|(s, w)| (s, w / largest))
        .fold((0.0, 0.0), |(acc, sum), (s, w)| (acc + s * w, sum + w));
    (weighted / total).clamp(0.0, 1.0)
}

/// Ranking order: higher aggregate first, then lower identifier
fn rank_order(a: (f64, VariantId), b: (f64, VariantId)) -> Ordering {
    b.0.total_cmp(&a.0).then_with(|| a.1.cmp(&b.1))
}

/// Index of the variant with the best score in `column`, ties to the lower id
fn column_winner(column: &NormalizedColumn, ids: &[VariantId]) -> Option<usize> {
    (0..ids.len()).min_by(|&a, &b| rank_order((column.scores[a], ids[a]), (column.scores[b], ids[b])))
}

/// Score and rank a set of resolved snapshots
///
/// Snapshots are expected in request order; result rows come back in rank
/// order. Fails only on an empty selection (no snapshots, no criteria, or
/// weights summing to zero).
pub fn score_comparison(
    snapshots: &[VariantSnapshot],
    criteria: &[WeightedCriterion<'_>],
) -> Result<ComparisonResult, CompareError> {
    if snapshots.is_empty() {
        return Err(CompareError::AllVariantsUnresolved { ids: Vec::new() });
    }

    let weights: Vec<f64> = criteria.iter().map(|c| c.weight).collect();
    if criteria.is_empty() || weights.iter().sum::<f64>() <= 0.0 {
        return Err(CompareError::ZeroTotalWeight);
    }

    let definitions: Vec<&CriterionDefinition> = criteria.iter().map(|c| c.definition).collect();
    let columns = normalize_all(&definitions, snapshots);
    let ids: Vec<VariantId> = snapshots.iter().map(|s| s.id).collect();

    let aggregates: Vec<f64> = (0..snapshots.len())
        .map(|i| {
            let scores: Vec<f64> = columns.iter().map(|c| c.scores[i]).collect();
            aggregate_score(&scores, &weights)
        })
        .collect();

    let mut order: Vec<usize> = (0..snapshots.len()).collect();
    order.sort_by(|&a, &b| rank_order((aggregates[a], ids[a]), (aggregates[b], ids[b])));

    let rows: Vec<ComparisonRow> = order
        .iter()
        .enumerate()
        .map(|(position, &i)| ComparisonRow {
            rank: position + 1,
            variant: snapshots[i].clone(),
            scores: columns
                .iter()
                .map(|c| CriterionScore {
                    criterion: c.criterion,
                    raw_value: c.raw[i],
                    normalized_score: c.scores[i],
                })
                .collect(),
            aggregate_score: aggregates[i],
        })
        .collect();

    let criterion_winners = columns
        .iter()
        .filter_map(|c| {
            column_winner(c, &ids).map(|i| CriterionWinner {
                criterion: c.criterion,
                variant_id: ids[i],
            })
        })
        .collect();

    let applied = criteria
        .iter()
        .map(|c| AppliedCriterion {
            criterion: c.definition.criterion,
            unit: c.definition.unit.to_string(),
            direction: c.definition.direction,
            weight: c.weight,
        })
        .collect();

    Ok(ComparisonResult {
        criteria: applied,
        best_value_id: rows[0].variant.id,
        rows,
        criterion_winners,
    })
}
