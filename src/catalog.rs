//! Variant Catalog - In-memory typed storage for snapshot lookups
//!
//! Loads the variant table once (Parquet or CSV via Polars) and serves
//! snapshots by identifier with O(1) FxHashMap lookups. Read-only after load.

use crate::data::{FetchOutcome, SnapshotProvider, VariantId, VariantSnapshot};
use crate::error::CatalogError;
use anyhow::{Context, Result};
use polars::prelude::*;
use rustc_hash::FxHashMap;
use std::path::Path;

/// Read-only catalog of variant snapshots indexed by identifier
#[derive(Debug, Default)]
pub struct VariantCatalog {
    variants: FxHashMap<VariantId, VariantSnapshot>,
}

impl VariantCatalog {
    /// Build a catalog from already materialized snapshots
    pub fn from_snapshots(snapshots: impl IntoIterator<Item = VariantSnapshot>) -> Self {
        let variants = snapshots.into_iter().map(|s| (s.id, s)).collect();
        Self { variants }
    }

    /// Load the catalog from a `.parquet` or `.csv` file
    ///
    /// Expected columns: `id`, `name` (required); `model_name`, `price`,
    /// `range_km`, `power_kw`, `acceleration_s`, `top_speed_kmh`,
    /// `battery_kwh`, `charging_time_h`, `in_stock` (optional).
    pub fn load(path: &Path) -> Result<Self> {
        let is_parquet = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("parquet"));

        let frame = if is_parquet {
            LazyFrame::scan_parquet(path, Default::default())
                .with_context(|| format!("Failed to scan parquet: {:?}", path))?
        } else {
            LazyCsvReader::new(path)
                .with_has_header(true)
                .finish()
                .with_context(|| format!("Failed to scan csv: {:?}", path))?
        };

        let df = frame
            .collect()
            .with_context(|| format!("Failed to load variant catalog: {:?}", path))?;

        let catalog = Self::from_dataframe(&df)?;
        tracing::info!("Loaded {} variants from {:?}", catalog.len(), path);
        Ok(catalog)
    }

    /// Build snapshots row by row from a loaded DataFrame
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let ids = cast_column(df, "id", &DataType::Int64)
            .context("Variant catalog needs an integer `id` column")?;
        let ids = ids.i64()?;
        let names = cast_column(df, "name", &DataType::String)
            .context("Variant catalog needs a `name` column")?;
        let names = names.str()?;

        let models = cast_column(df, "model_name", &DataType::String);
        let models = models.as_ref().and_then(|c| c.str().ok());
        let in_stock = cast_column(df, "in_stock", &DataType::Boolean);
        let in_stock = in_stock.as_ref().and_then(|c| c.bool().ok());

        let price = f64_column(df, "price");
        let range = f64_column(df, "range_km");
        let power = f64_column(df, "power_kw");
        let acceleration = f64_column(df, "acceleration_s");
        let top_speed = f64_column(df, "top_speed_kmh");
        let battery = f64_column(df, "battery_kwh");
        let charging = f64_column(df, "charging_time_h");

        macro_rules! get_val {
            ($col:expr, $i:expr) => {
                $col.as_ref().and_then(|c| c.get($i))
            };
        }

        let mut variants = FxHashMap::default();
        let mut skipped = 0usize;

        for i in 0..df.height() {
            let (Some(id), Some(name)) = (ids.get(i), names.get(i)) else {
                skipped += 1;
                continue;
            };

            let snapshot = VariantSnapshot {
                id,
                name: name.to_string(),
                model_name: models.and_then(|c| c.get(i)).map(|s| s.to_string()),
                price: get_val!(price, i),
                range_km: get_val!(range, i),
                power_kw: get_val!(power, i),
                acceleration_s: get_val!(acceleration, i),
                top_speed_kmh: get_val!(top_speed, i),
                battery_kwh: get_val!(battery, i),
                charging_time_h: get_val!(charging, i),
                in_stock: in_stock.and_then(|c| c.get(i)).unwrap_or(false),
            };

            if variants.insert(id, snapshot).is_some() {
                tracing::warn!("Duplicate variant id {} in catalog; keeping the last row", id);
            }
        }

        if skipped > 0 {
            tracing::warn!("Skipped {} catalog rows without id or name", skipped);
        }

        Ok(Self { variants })
    }

    pub fn get(&self, id: VariantId) -> Option<&VariantSnapshot> {
        self.variants.get(&id)
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

impl SnapshotProvider for VariantCatalog {
    fn fetch(&self, ids: &[VariantId]) -> Result<FetchOutcome, CatalogError> {
        let mut outcome = FetchOutcome::default();
        for &id in ids {
            match self.variants.get(&id) {
                Some(snapshot) => {
                    outcome.resolved.insert(id, snapshot.clone());
                }
                None => outcome.missing.push(id),
            }
        }
        Ok(outcome)
    }

    fn list_available(&self) -> Result<Vec<VariantSnapshot>, CatalogError> {
        let mut available: Vec<VariantSnapshot> = self
            .variants
            .values()
            .filter(|v| v.in_stock)
            .cloned()
            .collect();
        available.sort_by_key(|v| v.id);
        Ok(available)
    }
}

/// Column cast to `dtype`, or None if absent or not castable
fn cast_column(df: &DataFrame, name: &str, dtype: &DataType) -> Option<Column> {
    df.column(name).ok()?.cast(dtype).ok()
}

/// Float column (integer columns are widened), or None if absent
fn f64_column(df: &DataFrame, name: &str) -> Option<Float64Chunked> {
    let column = cast_column(df, name, &DataType::Float64)?;
    column.f64().ok().cloned()
}
