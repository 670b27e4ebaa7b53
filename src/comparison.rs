//! Comparison Orchestrator
//!
//! Validates requests, fetches snapshots from the catalog collaborator, and
//! runs normalization and ranking. Every call works on its own freshly
//! fetched snapshots; the service holds no mutable state and can be shared
//! across threads as-is.

use crate::criteria::{CriteriaInfo, CriteriaList, CriteriaRegistry, Criterion};
use crate::data::{SnapshotProvider, VariantId, VariantSnapshot};
use crate::error::CompareError;
use crate::scorer::{score_comparison, WeightedCriterion};
use crate::types::{ComparisonRequest, ComparisonResult};
use rustc_hash::FxHashSet;
use std::collections::BTreeMap;
use std::sync::Arc;

const DEFAULT_WEIGHT: f64 = 1.0;

/// Entry point for all comparison operations
pub struct ComparisonService {
    registry: CriteriaRegistry,
    provider: Arc<dyn SnapshotProvider>,
}

impl ComparisonService {
    pub fn new(registry: CriteriaRegistry, provider: Arc<dyn SnapshotProvider>) -> Self {
        Self { registry, provider }
    }

    pub fn registry(&self) -> &CriteriaRegistry {
        &self.registry
    }

    /// Full compare: explicit criteria and weights
    pub fn compare(&self, request: &ComparisonRequest) -> Result<ComparisonResult, CompareError> {
        let ids = self.validate_ids(&request.variant_ids)?;

        let criteria = match request.criteria.as_deref() {
            Some(names) if !names.is_empty() => self.registry.resolve(names)?,
            _ => self.registry.defaults(),
        };
        let weighted = self.apply_weights(&criteria, request.weights.as_ref())?;

        self.run(&ids, &weighted)
    }

    /// Quick compare: default criteria, equal weights
    pub fn quick_compare(&self, variant_ids: &[VariantId]) -> Result<ComparisonResult, CompareError> {
        let ids = self.validate_ids(variant_ids)?;
        let criteria = self.registry.defaults();
        let weighted = self.apply_weights(&criteria, None)?;

        self.run(&ids, &weighted)
    }

    /// Head-to-head quick compare of two variants
    pub fn compare_two(&self, first: VariantId, second: VariantId) -> Result<ComparisonResult, CompareError> {
        self.quick_compare(&[first, second])
    }

    /// Variants eligible for comparison (in stock), no scoring
    pub fn list_available(&self) -> Result<Vec<VariantSnapshot>, CompareError> {
        let variants = self.provider.list_available()?;
        tracing::debug!("{} variants available for comparison", variants.len());
        Ok(variants)
    }

    pub fn criteria_info(&self) -> CriteriaInfo {
        self.registry.info()
    }

    /// Deduplicate (first occurrence wins) and enforce the vehicle-count limits
    fn validate_ids(&self, variant_ids: &[VariantId]) -> Result<Vec<VariantId>, CompareError> {
        let mut seen = FxHashSet::default();
        let ids: Vec<VariantId> = variant_ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();

        if ids.len() < self.registry.min_vehicles() {
            return Err(CompareError::TooFewVehicles {
                min: self.registry.min_vehicles(),
                actual: ids.len(),
            });
        }
        if ids.len() > self.registry.max_vehicles() {
            return Err(CompareError::TooManyVehicles {
                max: self.registry.max_vehicles(),
                actual: ids.len(),
            });
        }

        Ok(ids)
    }

    /// Pair each selected criterion with its weight.
    ///
    /// Every weight key must name a registered criterion; keys naming criteria
    /// outside the selection are accepted and ignored. Two keys that resolve
    /// to the same criterion (`price` and `PRICE`) are rejected.
    fn apply_weights<'a>(
        &self,
        criteria: &CriteriaList<'a>,
        weights: Option<&BTreeMap<String, f64>>,
    ) -> Result<Vec<WeightedCriterion<'a>>, CompareError> {
        let mut overrides: Vec<(Criterion, &String, f64)> = Vec::new();
        for (name, &weight) in weights.into_iter().flatten() {
            let definition = self
                .registry
                .lookup(name)
                .ok_or_else(|| CompareError::UnknownCriterion(name.clone()))?;
            if !weight.is_finite() || weight < 0.0 {
                return Err(CompareError::InvalidWeight {
                    criterion: name.clone(),
                    weight,
                });
            }
            if let Some((_, first, _)) = overrides.iter().find(|(c, _, _)| *c == definition.criterion) {
                return Err(CompareError::ConflictingWeights {
                    criterion: definition.name.to_string(),
                    first: (*first).clone(),
                    second: name.clone(),
                });
            }
            overrides.push((definition.criterion, name, weight));
        }

        let weighted: Vec<WeightedCriterion<'a>> = criteria
            .iter()
            .map(|&definition| WeightedCriterion {
                definition,
                weight: overrides
                    .iter()
                    .find(|(criterion, _, _)| *criterion == definition.criterion)
                    .map_or(DEFAULT_WEIGHT, |(_, _, w)| *w),
            })
            .collect();

        if weighted.iter().map(|c| c.weight).sum::<f64>() <= 0.0 {
            return Err(CompareError::ZeroTotalWeight);
        }

        Ok(weighted)
    }

    /// Fetch, apply the missing-identifier policy, then score
    fn run(
        &self,
        ids: &[VariantId],
        criteria: &[WeightedCriterion<'_>],
    ) -> Result<ComparisonResult, CompareError> {
        let mut outcome = self.provider.fetch(ids)?;

        if !outcome.missing.is_empty() {
            tracing::debug!("Dropping unresolved variants from comparison: {:?}", outcome.missing);
        }

        // Snapshots in request order; ranking never depends on it
        let snapshots: Vec<VariantSnapshot> = ids
            .iter()
            .filter_map(|id| outcome.resolved.remove(id))
            .collect();

        if snapshots.is_empty() {
            return Err(CompareError::AllVariantsUnresolved { ids: ids.to_vec() });
        }
        if snapshots.len() < self.registry.min_vehicles() {
            return Err(CompareError::InsufficientVariants {
                resolved: snapshots.len(),
                min: self.registry.min_vehicles(),
                missing: outcome.missing,
            });
        }

        let result = score_comparison(&snapshots, criteria)?;

        tracing::info!(
            "Compared {} variants on {} criteria, best value: {}",
            result.rows.len(),
            result.criteria.len(),
            result.best_value_id
        );

        Ok(result)
    }
}
