//! Vehicle Comparison Engine
//!
//! Compares up to five vehicle variants criterion by criterion and ranks them.
//!
//! Module layout:
//! - `criteria`: registry of comparable criteria (direction, unit, defaults)
//! - `data` / `catalog`: variant snapshots and the read-only catalog
//! - `utils`: per-call min-max normalization
//! - `scorer`: weighted aggregation, ranking, per-criterion winners
//! - `comparison`: request validation and orchestration
//! - `api_server` (feature `api`): axum REST endpoints

pub mod catalog;
pub mod comparison;
pub mod config;
pub mod criteria;
pub mod data;
pub mod error;
pub mod scorer;
pub mod types;
pub mod utils;

#[cfg(feature = "api")]
pub mod api_server;

// Re-export commonly used types
pub use catalog::VariantCatalog;
pub use comparison::ComparisonService;
pub use config::ServerConfig;
pub use criteria::{CriteriaRegistry, Criterion, CriterionDefinition, Direction, MAX_VEHICLES};
pub use data::{FetchOutcome, SnapshotProvider, VariantId, VariantSnapshot};
pub use error::{CatalogError, CompareError};
pub use types::{ComparisonRequest, ComparisonResult, ComparisonRow, CriterionScore};

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};
