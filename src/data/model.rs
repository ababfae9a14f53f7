use std::collections::BTreeSet;

use serde::Deserialize;

/// Columns every housing source must provide. Anything else is ignored.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    "longitude",
    "latitude",
    "median_income",
    "median_house_value",
    "ocean_proximity",
];

// ---------------------------------------------------------------------------
// HousingRecord – one row of the census table
// ---------------------------------------------------------------------------

/// A single census block group.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HousingRecord {
    pub longitude: f64,
    pub latitude: f64,
    /// Median household income in tens of thousands of dollars.
    pub median_income: f64,
    pub median_house_value: f64,
    /// Categorical relation to the coastline, e.g. `NEAR BAY` or `INLAND`.
    pub ocean_proximity: String,
}

// ---------------------------------------------------------------------------
// PriceBounds – observed house-value range of a dataset
// ---------------------------------------------------------------------------

/// Inclusive `[min, max]` of `median_house_value` over a whole dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBounds {
    pub min: f64,
    pub max: f64,
}

impl PriceBounds {
    /// Clamp `value` into the bounds.
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed region index and price bounds.
///
/// Built once by the loader and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// All records in source order.
    pub records: Vec<HousingRecord>,
    /// Distinct `ocean_proximity` values, sorted.
    pub regions: BTreeSet<String>,
    /// Global min/max of `median_house_value`.
    pub price_bounds: PriceBounds,
}

impl Dataset {
    /// Build the region index and price bounds from loaded records.
    ///
    /// Returns `None` when `records` is empty, since an empty table has no bounds.
    pub fn from_records(records: Vec<HousingRecord>) -> Option<Self> {
        let first = records.first()?;
        let mut bounds = PriceBounds {
            min: first.median_house_value,
            max: first.median_house_value,
        };
        let mut regions = BTreeSet::new();

        for rec in &records {
            bounds.min = bounds.min.min(rec.median_house_value);
            bounds.max = bounds.max.max(rec.median_house_value);
            regions.insert(rec.ocean_proximity.clone());
        }

        Some(Dataset {
            records,
            regions,
            price_bounds: bounds,
        })
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record(region: &str, income: f64, value: f64) -> HousingRecord {
        HousingRecord {
            longitude: -122.0,
            latitude: 37.5,
            median_income: income,
            median_house_value: value,
            ocean_proximity: region.to_string(),
        }
    }

    #[test]
    fn from_records_indexes_regions_and_bounds() {
        let ds = Dataset::from_records(vec![
            record("INLAND", 3.0, 250_000.0),
            record("NEAR BAY", 5.0, 90_000.0),
            record("INLAND", 1.0, 500_001.0),
        ])
        .unwrap();

        assert_eq!(ds.len(), 3);
        assert_eq!(
            ds.regions.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["INLAND", "NEAR BAY"]
        );
        assert_eq!(ds.price_bounds, PriceBounds { min: 90_000.0, max: 500_001.0 });
    }

    #[test]
    fn from_records_rejects_empty_table() {
        assert!(Dataset::from_records(Vec::new()).is_none());
    }

    #[test]
    fn price_bounds_clamp() {
        let b = PriceBounds { min: 10.0, max: 20.0 };
        assert_eq!(b.clamp(5.0), 10.0);
        assert_eq!(b.clamp(25.0), 20.0);
        assert_eq!(b.clamp(15.0), 15.0);
    }
}
