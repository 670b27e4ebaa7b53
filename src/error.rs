//! Error types for the comparison engine
//!
//! `CompareError` covers everything a comparison call can fail with. Validation
//! failures are client errors; collaborator failures are server errors and are
//! never retried here.

use crate::data::VariantId;

/// Failure of the catalog collaborator itself (not a missing identifier)
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Errors returned by the comparison orchestrator
#[derive(Debug, thiserror::Error)]
pub enum CompareError {
    #[error("At least {min} distinct vehicles are required for comparison, got {actual}")]
    TooFewVehicles { min: usize, actual: usize },

    #[error("Maximum {max} vehicles can be compared at once, got {actual}")]
    TooManyVehicles { max: usize, actual: usize },

    #[error("Unknown comparison criterion: '{0}'")]
    UnknownCriterion(String),

    #[error("Invalid weight {weight} for criterion '{criterion}': weights must be finite and non-negative")]
    InvalidWeight { criterion: String, weight: f64 },

    #[error("Weight keys '{first}' and '{second}' both name criterion '{criterion}'")]
    ConflictingWeights {
        criterion: String,
        first: String,
        second: String,
    },

    #[error("Weights of the selected criteria sum to zero")]
    ZeroTotalWeight,

    #[error("None of the requested vehicles were found: {ids:?}")]
    AllVariantsUnresolved { ids: Vec<VariantId> },

    #[error("Only {resolved} of the requested vehicles were found (missing: {missing:?}); at least {min} are required")]
    InsufficientVariants {
        resolved: usize,
        min: usize,
        missing: Vec<VariantId>,
    },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl CompareError {
    /// True when the caller sent a request that can never succeed as-is
    pub fn is_client_error(&self) -> bool {
        !matches!(self, CompareError::Catalog(_))
    }
}
