use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::model::{Dataset, HousingRecord, PriceBounds};

// ---------------------------------------------------------------------------
// Income band
// ---------------------------------------------------------------------------

/// Upper bound (inclusive) of the `Low` band and lower bound (exclusive) of `Medium`.
pub const LOW_INCOME_CEILING: f64 = 2.5;
/// Lower bound (inclusive) of the `High` band and upper bound (exclusive) of `Medium`.
pub const HIGH_INCOME_FLOOR: f64 = 4.5;

/// Bucketing of `median_income` (tens of thousands of dollars).
///
/// `Medium` is open on both ends, so an income of exactly 2.5 is only `Low`
/// and exactly 4.5 is only `High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IncomeBand {
    #[default]
    All,
    Low,
    Medium,
    High,
}

impl IncomeBand {
    pub const ALL: [IncomeBand; 4] = [
        IncomeBand::All,
        IncomeBand::Low,
        IncomeBand::Medium,
        IncomeBand::High,
    ];

    /// Label shown next to the radio button.
    pub fn label(self) -> &'static str {
        match self {
            IncomeBand::All => "All",
            IncomeBand::Low => "Low (≤ 2.5)",
            IncomeBand::Medium => "Medium (2.5–4.5)",
            IncomeBand::High => "High (≥ 4.5)",
        }
    }

    pub fn matches(self, income: f64) -> bool {
        match self {
            IncomeBand::All => true,
            IncomeBand::Low => income <= LOW_INCOME_CEILING,
            IncomeBand::Medium => income > LOW_INCOME_CEILING && income < HIGH_INCOME_FLOOR,
            IncomeBand::High => income >= HIGH_INCOME_FLOOR,
        }
    }
}

impl fmt::Display for IncomeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Price range
// ---------------------------------------------------------------------------

/// Inclusive `[min, max]` over `median_house_value`.
///
/// An inverted range (`min > max`) is allowed and matches nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    /// Build a range with both ends clamped into the dataset's bounds.
    pub fn clamped(min: f64, max: f64, bounds: &PriceBounds) -> Self {
        PriceRange {
            min: bounds.clamp(min),
            max: bounds.clamp(max),
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

impl From<PriceBounds> for PriceRange {
    fn from(bounds: PriceBounds) -> Self {
        PriceRange {
            min: bounds.min,
            max: bounds.max,
        }
    }
}

// ---------------------------------------------------------------------------
// Filter parameters
// ---------------------------------------------------------------------------

/// The three criteria, combined by logical AND.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterParams {
    /// Allowed `ocean_proximity` values. Empty means no region constraint.
    pub regions: BTreeSet<String>,
    pub income: IncomeBand,
    pub price: PriceRange,
}

impl FilterParams {
    /// Initial parameters: every region, every income, the full price range.
    pub fn for_dataset(dataset: &Dataset) -> Self {
        FilterParams {
            regions: dataset.regions.clone(),
            income: IncomeBand::All,
            price: dataset.price_bounds.into(),
        }
    }

    /// Whether a single record passes all three predicates.
    pub fn matches(&self, record: &HousingRecord) -> bool {
        (self.regions.is_empty() || self.regions.contains(&record.ocean_proximity))
            && self.income.matches(record.median_income)
            && self.price.contains(record.median_house_value)
    }
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// Rows of a [`Dataset`] passing a [`FilterParams`], in dataset order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    pub fn row_count(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Indices into `dataset.records` of the matching rows.
    #[cfg(test)]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn records(&self) -> impl Iterator<Item = &'a HousingRecord> + '_ {
        let dataset = self.dataset;
        self.indices.iter().map(move |&i| &dataset.records[i])
    }

    /// `(latitude, longitude)` pairs for the map.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.records().map(|r| (r.latitude, r.longitude))
    }

    /// `median_house_value` of every row, for histogram binning.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.records().map(|r| r.median_house_value)
    }

    /// Number of matching rows per region.
    pub fn region_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for rec in self.records() {
            *counts.entry(rec.ocean_proximity.clone()).or_insert(0) += 1;
        }
        counts
    }
}

/// Return the view of `dataset` passing all active filters.
///
/// A record passes when:
/// * `regions` is empty, or contains the record's `ocean_proximity`
/// * its `median_income` falls in the selected [`IncomeBand`]
/// * its `median_house_value` lies in the inclusive price range
pub fn apply<'a>(dataset: &'a Dataset, params: &FilterParams) -> FilteredView<'a> {
    let indices = dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| params.matches(rec))
        .map(|(i, _)| i)
        .collect();
    FilteredView { dataset, indices }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::data::model::tests::record;

    fn dataset(records: Vec<HousingRecord>) -> Dataset {
        Dataset::from_records(records).unwrap()
    }

    fn incomes(view: &FilteredView<'_>) -> Vec<f64> {
        view.records().map(|r| r.median_income).collect()
    }

    #[test]
    fn defaults_keep_every_row() {
        let ds = dataset(vec![
            record("INLAND", 1.0, 100_000.0),
            record("NEAR BAY", 3.0, 200_000.0),
            record("ISLAND", 6.0, 450_000.0),
        ]);
        let view = apply(&ds, &FilterParams::for_dataset(&ds));
        assert_eq!(view.indices(), &[0, 1, 2]);
    }

    #[test]
    fn region_filter_keeps_selected_regions() {
        let ds = dataset(vec![
            record("INLAND", 1.0, 100_000.0),
            record("NEAR BAY", 3.0, 200_000.0),
            record("ISLAND", 6.0, 450_000.0),
        ]);
        let mut params = FilterParams::for_dataset(&ds);
        params.regions = ["INLAND", "ISLAND"].iter().map(|s| s.to_string()).collect();

        let view = apply(&ds, &params);
        assert_eq!(view.indices(), &[0, 2]);
    }

    #[test]
    fn empty_region_selection_is_no_constraint() {
        let ds = dataset(vec![
            record("INLAND", 1.0, 100_000.0),
            record("NEAR BAY", 3.0, 200_000.0),
        ]);
        let mut params = FilterParams::for_dataset(&ds);
        params.regions.clear();

        assert_eq!(apply(&ds, &params).row_count(), 2);
    }

    #[test]
    fn low_band_includes_boundary() {
        let ds = dataset(vec![
            record("INLAND", 2.4, 100_000.0),
            record("INLAND", 2.5, 100_000.0),
            record("INLAND", 2.6, 100_000.0),
        ]);
        let mut params = FilterParams::for_dataset(&ds);
        params.income = IncomeBand::Low;
        assert_eq!(incomes(&apply(&ds, &params)), vec![2.4, 2.5]);
    }

    #[test]
    fn medium_band_excludes_both_boundaries() {
        let ds = dataset(vec![
            record("INLAND", 2.5, 100_000.0),
            record("INLAND", 3.0, 100_000.0),
            record("INLAND", 4.5, 100_000.0),
        ]);
        let mut params = FilterParams::for_dataset(&ds);
        params.income = IncomeBand::Medium;
        assert_eq!(incomes(&apply(&ds, &params)), vec![3.0]);
    }

    #[test]
    fn high_band_includes_boundary() {
        let ds = dataset(vec![
            record("INLAND", 4.4, 100_000.0),
            record("INLAND", 4.5, 100_000.0),
            record("INLAND", 4.6, 100_000.0),
        ]);
        let mut params = FilterParams::for_dataset(&ds);
        params.income = IncomeBand::High;
        assert_eq!(incomes(&apply(&ds, &params)), vec![4.5, 4.6]);
    }

    #[test]
    fn price_range_is_inclusive() {
        let ds = dataset(vec![
            record("INLAND", 1.0, 100_000.0),
            record("INLAND", 1.0, 200_000.0),
            record("INLAND", 1.0, 300_000.0),
        ]);
        let mut params = FilterParams::for_dataset(&ds);
        params.price = PriceRange::clamped(150_000.0, 300_000.0, &ds.price_bounds);

        let view = apply(&ds, &params);
        assert_eq!(view.indices(), &[1, 2]);
        assert_eq!(view.values().collect::<Vec<_>>(), vec![200_000.0, 300_000.0]);
    }

    #[test]
    fn price_range_is_clamped_to_dataset_bounds() {
        let ds = dataset(vec![
            record("INLAND", 1.0, 100_000.0),
            record("INLAND", 1.0, 300_000.0),
        ]);
        let range = PriceRange::clamped(0.0, 1_000_000.0, &ds.price_bounds);
        assert_eq!(range, PriceRange { min: 100_000.0, max: 300_000.0 });
    }

    #[test]
    fn inverted_price_range_yields_empty_view() {
        let ds = dataset(vec![record("INLAND", 1.0, 100_000.0), record("INLAND", 1.0, 300_000.0)]);
        let mut params = FilterParams::for_dataset(&ds);
        params.price = PriceRange { min: 300_000.0, max: 100_000.0 };

        let view = apply(&ds, &params);
        assert!(view.is_empty());
        assert_eq!(view.points().count(), 0);
        assert_eq!(view.values().count(), 0);
    }

    #[test]
    fn view_exposes_points_and_region_counts() {
        let mut a = record("INLAND", 1.0, 100_000.0);
        a.latitude = 36.0;
        a.longitude = -119.0;
        let ds = dataset(vec![a, record("INLAND", 3.0, 200_000.0), record("ISLAND", 3.0, 200_000.0)]);
        let view = apply(&ds, &FilterParams::for_dataset(&ds));

        assert_eq!(view.points().next(), Some((36.0, -119.0)));
        let counts = view.region_counts();
        assert_eq!(counts.get("INLAND"), Some(&2));
        assert_eq!(counts.get("ISLAND"), Some(&1));
    }

    fn arb_record() -> impl Strategy<Value = HousingRecord> {
        (
            prop::sample::select(vec!["INLAND", "NEAR BAY", "NEAR OCEAN", "ISLAND", "<1H OCEAN"]),
            0.0f64..15.0,
            15_000.0f64..500_001.0,
        )
            .prop_map(|(region, income, value)| record(region, income, value))
    }

    fn arb_params(ds: &Dataset) -> impl Strategy<Value = FilterParams> {
        let regions: Vec<String> = ds.regions.iter().cloned().collect();
        let bounds = ds.price_bounds;
        (
            prop::sample::subsequence(regions.clone(), 0..=regions.len()),
            prop::sample::select(IncomeBand::ALL.to_vec()),
            bounds.min..=bounds.max,
            bounds.min..=bounds.max,
        )
            .prop_map(move |(regions, income, a, b)| FilterParams {
                regions: regions.into_iter().collect(),
                income,
                price: PriceRange::clamped(a.min(b), a.max(b), &bounds),
            })
    }

    fn arb_case() -> impl Strategy<Value = (Dataset, FilterParams)> {
        prop::collection::vec(arb_record(), 1..60)
            .prop_map(dataset)
            .prop_flat_map(|ds| {
                let params = arb_params(&ds);
                (Just(ds), params)
            })
    }

    proptest! {
        #[test]
        fn view_is_subset_of_dataset((ds, params) in arb_case()) {
            let view = apply(&ds, &params);
            prop_assert!(view.row_count() <= ds.len());
            for rec in view.records() {
                prop_assert!(ds.records.contains(rec));
                prop_assert!(params.matches(rec));
            }
        }

        #[test]
        fn apply_is_idempotent((ds, params) in arb_case()) {
            let first = apply(&ds, &params);
            let second = apply(&ds, &params);
            prop_assert_eq!(first.indices(), second.indices());
        }

        #[test]
        fn full_region_selection_equals_no_region_filter((ds, params) in arb_case()) {
            let mut all = params.clone();
            all.regions = ds.regions.clone();
            let mut none = params;
            none.regions.clear();
            let all_view = apply(&ds, &all);
            let none_view = apply(&ds, &none);
            prop_assert_eq!(all_view.indices(), none_view.indices());
        }
    }
}
