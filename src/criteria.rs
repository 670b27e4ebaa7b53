//! Criteria Registry
//!
//! Fixed, ordered table of the criteria a comparison can use. Each entry is a
//! tagged `Criterion` plus its extraction rule, direction and unit. Direction is
//! a property of the domain (lower price is always better, longer range is
//! always better) and is never inferred from data.
//!
//! The registry is built once at startup and handed to the orchestrator.

use crate::data::VariantSnapshot;
use crate::error::CompareError;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Largest number of variants accepted by one comparison call
pub const MAX_VEHICLES: usize = 5;

/// Smallest number of resolved variants that makes a comparison meaningful
pub const MIN_VEHICLES: usize = 2;

/// Ordered criteria selection for one comparison (fits inline for all 8 criteria)
pub type CriteriaList<'a> = SmallVec<[&'a CriterionDefinition; 8]>;

/// One axis of comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Price,
    Range,
    Power,
    Acceleration,
    TopSpeed,
    BatteryCapacity,
    ChargingTime,
    Availability,
}

/// Which end of the raw scale is better
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

/// Registry entry for a criterion
#[derive(Debug, Clone, Copy)]
pub struct CriterionDefinition {
    pub criterion: Criterion,
    pub name: &'static str,
    pub unit: &'static str,
    pub direction: Direction,
    /// Part of the default selection used by quick compare
    pub is_default: bool,
    extractor: fn(&VariantSnapshot) -> Option<f64>,
}

impl CriterionDefinition {
    /// Raw value of this criterion for a snapshot (None if the catalog has no value)
    pub fn extract(&self, snapshot: &VariantSnapshot) -> Option<f64> {
        (self.extractor)(snapshot)
    }
}

fn availability_value(snapshot: &VariantSnapshot) -> Option<f64> {
    Some(if snapshot.in_stock { 1.0 } else { 0.0 })
}

/// Registry order; the first four entries are the defaults, in default order.
fn standard_definitions() -> Vec<CriterionDefinition> {
    vec![
        CriterionDefinition {
            criterion: Criterion::Price,
            name: "price",
            unit: "currency",
            direction: Direction::LowerIsBetter,
            is_default: true,
            extractor: |s| s.price,
        },
        CriterionDefinition {
            criterion: Criterion::Range,
            name: "range",
            unit: "km",
            direction: Direction::HigherIsBetter,
            is_default: true,
            extractor: |s| s.range_km,
        },
        CriterionDefinition {
            criterion: Criterion::Power,
            name: "power",
            unit: "kW",
            direction: Direction::HigherIsBetter,
            is_default: true,
            extractor: |s| s.power_kw,
        },
        CriterionDefinition {
            criterion: Criterion::Acceleration,
            name: "acceleration",
            unit: "s (0-100 km/h)",
            direction: Direction::LowerIsBetter,
            is_default: true,
            extractor: |s| s.acceleration_s,
        },
        CriterionDefinition {
            criterion: Criterion::TopSpeed,
            name: "top_speed",
            unit: "km/h",
            direction: Direction::HigherIsBetter,
            is_default: false,
            extractor: |s| s.top_speed_kmh,
        },
        CriterionDefinition {
            criterion: Criterion::BatteryCapacity,
            name: "battery_capacity",
            unit: "kWh",
            direction: Direction::HigherIsBetter,
            is_default: false,
            extractor: |s| s.battery_kwh,
        },
        CriterionDefinition {
            criterion: Criterion::ChargingTime,
            name: "charging_time",
            unit: "h",
            direction: Direction::LowerIsBetter,
            is_default: false,
            extractor: |s| s.charging_time_h,
        },
        CriterionDefinition {
            criterion: Criterion::Availability,
            name: "availability",
            unit: "in stock",
            direction: Direction::HigherIsBetter,
            is_default: false,
            extractor: availability_value,
        },
    ]
}

/// `topSpeed`, `top_speed` and `Top Speed` all map to `topspeed`
fn canonical_key(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Immutable catalog of comparable criteria plus the vehicle-count limits
#[derive(Debug, Clone)]
pub struct CriteriaRegistry {
    definitions: Vec<CriterionDefinition>,
    max_vehicles: usize,
    min_vehicles: usize,
}

impl Default for CriteriaRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl CriteriaRegistry {
    /// The eight vehicle criteria with the 2..=5 vehicle limits
    pub fn standard() -> Self {
        Self {
            definitions: standard_definitions(),
            max_vehicles: MAX_VEHICLES,
            min_vehicles: MIN_VEHICLES,
        }
    }

    pub fn max_vehicles(&self) -> usize {
        self.max_vehicles
    }

    pub fn min_vehicles(&self) -> usize {
        self.min_vehicles
    }

    /// Every registered criterion, in registry order
    pub fn all(&self) -> &[CriterionDefinition] {
        &self.definitions
    }

    /// Default selection: price, range, power, acceleration
    pub fn defaults(&self) -> CriteriaList<'_> {
        self.definitions.iter().filter(|d| d.is_default).collect()
    }

    pub fn get(&self, criterion: Criterion) -> Option<&CriterionDefinition> {
        self.definitions.iter().find(|d| d.criterion == criterion)
    }

    /// Look up a criterion by name, ignoring case and `_`/`-`/space separators
    pub fn lookup(&self, name: &str) -> Option<&CriterionDefinition> {
        let key = canonical_key(name);
        self.definitions
            .iter()
            .find(|d| canonical_key(d.name) == key)
    }

    /// Resolve names to definitions, keeping request order.
    ///
    /// Repeated names collapse to their first occurrence.
    pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> Result<CriteriaList<'_>, CompareError> {
        let mut resolved = CriteriaList::new();
        for name in names {
            let name = name.as_ref();
            let def = self
                .lookup(name)
                .ok_or_else(|| CompareError::UnknownCriterion(name.to_string()))?;
            if !resolved.iter().any(|d| d.criterion == def.criterion) {
                resolved.push(def);
            }
        }
        Ok(resolved)
    }

    /// Static description of the registry for `GET /compare/criteria`
    pub fn info(&self) -> CriteriaInfo {
        CriteriaInfo {
            available_criteria: self.definitions.iter().map(|d| d.name.to_string()).collect(),
            default_criteria: self.defaults().iter().map(|d| d.name.to_string()).collect(),
            max_vehicles: self.max_vehicles,
            details: self
                .definitions
                .iter()
                .map(|d| CriterionInfo {
                    name: d.name.to_string(),
                    unit: d.unit.to_string(),
                    direction: d.direction,
                    is_default: d.is_default,
                })
                .collect(),
        }
    }
}

/// Registry listing, informational only
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriteriaInfo {
    pub available_criteria: Vec<String>,
    pub default_criteria: Vec<String>,
    pub max_vehicles: usize,
    pub details: Vec<CriterionInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionInfo {
    pub name: String,
    pub unit: String,
    pub direction: Direction,
    pub is_default: bool,
}
