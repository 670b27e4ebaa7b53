//! Variant snapshots and the provider contract
//!
//! A `VariantSnapshot` is the read-only view of one vehicle variant as the
//! catalog knows it at the start of a comparison call. The engine never
//! mutates or caches snapshots; each call fetches its own set.

use crate::error::CatalogError;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Catalog identifier of a vehicle variant
pub type VariantId = i64;

/// Attribute snapshot of a single variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantSnapshot {
    pub id: VariantId,
    pub name: String,
    /// Vehicle model this variant is a trim of
    pub model_name: Option<String>,

    /// Currency amount
    pub price: Option<f64>,
    /// Kilometres per charge
    pub range_km: Option<f64>,
    /// Kilowatts
    pub power_kw: Option<f64>,
    /// Seconds, 0-100 km/h
    pub acceleration_s: Option<f64>,
    pub top_speed_kmh: Option<f64>,
    pub battery_kwh: Option<f64>,
    /// Hours, 10-80%
    pub charging_time_h: Option<f64>,

    pub in_stock: bool,
}

impl VariantSnapshot {
    /// Empty in-stock snapshot; attributes are filled with the `with_*` setters
    pub fn new(id: VariantId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            model_name: None,
            price: None,
            range_km: None,
            power_kw: None,
            acceleration_s: None,
            top_speed_kmh: None,
            battery_kwh: None,
            charging_time_h: None,
            in_stock: true,
        }
    }

    pub fn with_model(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = Some(model_name.into());
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_range(mut self, range_km: f64) -> Self {
        self.range_km = Some(range_km);
        self
    }

    pub fn with_power(mut self, power_kw: f64) -> Self {
        self.power_kw = Some(power_kw);
        self
    }

    pub fn with_acceleration(mut self, acceleration_s: f64) -> Self {
        self.acceleration_s = Some(acceleration_s);
        self
    }

    pub fn with_top_speed(mut self, top_speed_kmh: f64) -> Self {
        self.top_speed_kmh = Some(top_speed_kmh);
        self
    }

    pub fn with_battery(mut self, battery_kwh: f64) -> Self {
        self.battery_kwh = Some(battery_kwh);
        self
    }

    pub fn with_charging_time(mut self, charging_time_h: f64) -> Self {
        self.charging_time_h = Some(charging_time_h);
        self
    }

    pub fn with_in_stock(mut self, in_stock: bool) -> Self {
        self.in_stock = in_stock;
        self
    }
}

/// Result of a snapshot fetch: what resolved, and what did not
///
/// A missing identifier is not an error at this level. The orchestrator
/// decides whether enough variants resolved to run a comparison.
#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub resolved: FxHashMap<VariantId, VariantSnapshot>,
    /// Unresolved identifiers, in request order
    pub missing: Vec<VariantId>,
}

/// Read-only access to variant snapshots (the catalog collaborator)
pub trait SnapshotProvider: Send + Sync {
    /// Fetch snapshots for `ids`. Errors only when the catalog itself fails.
    fn fetch(&self, ids: &[VariantId]) -> Result<FetchOutcome, CatalogError>;

    /// Variants currently in stock, ordered by identifier
    fn list_available(&self) -> Result<Vec<VariantSnapshot>, CatalogError>;
}
