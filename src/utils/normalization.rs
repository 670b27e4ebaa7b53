//! Normalization Utilities
//!
//! Rescales raw criterion values to [0, 1] relative to the variants in one
//! comparison call (min-max). The directionally best observed value maps to
//! 1.0 and the worst to 0.0. Nothing here is global: the same variant can score
//! differently against a different set of rivals.

use crate::criteria::{Criterion, CriterionDefinition, Direction};
use crate::data::VariantSnapshot;
use rayon::prelude::*;

/// Normalized view of one criterion across the compared variants
///
/// `raw` and `scores` are aligned with the snapshot slice they were built from.
#[derive(Debug, Clone)]
pub struct NormalizedColumn {
    pub criterion: Criterion,
    pub raw: Vec<Option<f64>>,
    pub scores: Vec<f64>,
    /// Observed bounds (None when no variant has a value)
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl NormalizedColumn {
    /// True when every variant received the same score
    pub fn is_tied(&self) -> bool {
        self.scores.windows(2).all(|w| w[0] == w[1])
    }
}

/// Min-max normalize a single value against observed bounds
///
/// Algorithm:
/// 1. If min == max nobody differs on this criterion: full marks (1.0)
/// 2. HigherIsBetter: (value - min) / (max - min)
/// 3. LowerIsBetter:  (max - value) / (max - min)
pub fn min_max_normalize(value: f64, min: f64, max: f64, direction: Direction) -> f64 {
    let span = max - min;
    if span <= 0.0 {
        return 1.0;
    }

    let score = match direction {
        Direction::HigherIsBetter => (value - min) / span,
        Direction::LowerIsBetter => (max - value) / span,
    };

    score.clamp(0.0, 1.0)
}

/// Normalize one criterion across all snapshots of the call
///
/// A variant without a value for the criterion (or with a non-finite one) is
/// left out of the bounds and scores 0.0. If no variant has a value the
/// criterion cannot separate anyone and every variant scores 1.0.
pub fn normalize_criterion(
    definition: &CriterionDefinition,
    snapshots: &[VariantSnapshot],
) -> NormalizedColumn {
    let raw: Vec<Option<f64>> = snapshots
        .iter()
        .map(|s| definition.extract(s).filter(|v| v.is_finite()))
        .collect();

    let (min, max) = raw.iter().flatten().fold((None, None), |(lo, hi), &v| {
        (
            Some(lo.map_or(v, |lo: f64| lo.min(v))),
            Some(hi.map_or(v, |hi: f64| hi.max(v))),
        )
    });

    let scores = match (min, max) {
        (Some(min), Some(max)) => raw
            .iter()
            .map(|value| match value {
                Some(v) => min_max_normalize(*v, min, max, definition.direction),
                None => 0.0,
            })
            .collect(),
        _ => vec![1.0; snapshots.len()],
    };

    NormalizedColumn {
        criterion: definition.criterion,
        raw,
        scores,
        min,
        max,
    }
}

/// Normalize every selected criterion, one rayon task per criterion
///
/// Output order matches `criteria`.
pub fn normalize_all(
    criteria: &[&CriterionDefinition],
    snapshots: &[VariantSnapshot],
) -> Vec<NormalizedColumn> {
    criteria
        .par_iter()
        .map(|definition| normalize_criterion(definition, snapshots))
        .collect()
}
