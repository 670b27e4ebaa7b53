//! Utility modules for comparison scoring
//!
//! - Normalization: per-call min-max rescaling of raw criterion values

pub mod normalization;

pub use normalization::{min_max_normalize, normalize_all, normalize_criterion, NormalizedColumn};
