use std::collections::BTreeMap;

use crate::data::filter::{apply, FilterParams, IncomeBand, PriceRange};
use crate::data::histogram::Histogram;
use crate::data::model::{Dataset, PriceBounds};

// ---------------------------------------------------------------------------
// Events emitted by the filter widgets
// ---------------------------------------------------------------------------

/// One user interaction that changes the filter parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterEvent {
    ToggleRegion(String),
    SelectAllRegions,
    ClearRegions,
    SetIncomeBand(IncomeBand),
    SetPriceRange { min: f64, max: f64 },
    /// Back to every region, every income and the full price range.
    Reset,
}

impl FilterEvent {
    /// Fold this event into `params`. Price bounds are re-clamped to the dataset.
    pub fn apply_to(self, params: &mut FilterParams, dataset: &Dataset) {
        match self {
            FilterEvent::ToggleRegion(region) => {
                if !params.regions.remove(&region) {
                    params.regions.insert(region);
                }
            }
            FilterEvent::SelectAllRegions => params.regions = dataset.regions.clone(),
            FilterEvent::ClearRegions => params.regions.clear(),
            FilterEvent::SetIncomeBand(band) => params.income = band,
            FilterEvent::SetPriceRange { min, max } => {
                params.price = PriceRange::clamped(min, max, &dataset.price_bounds);
            }
            FilterEvent::Reset => *params = FilterParams::for_dataset(dataset),
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot pushed to the rendering side
// ---------------------------------------------------------------------------

/// Everything the map, histogram and summary line need for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSnapshot {
    pub row_count: usize,
    /// `(latitude, longitude)` of every visible row.
    pub points: Vec<(f64, f64)>,
    /// Region of each entry in `points`, for colouring.
    pub point_regions: Vec<String>,
    pub values: Vec<f64>,
    pub histogram: Histogram,
    /// Bounds of the full dataset, for the range sliders.
    pub price_bounds: PriceBounds,
    pub region_counts: BTreeMap<String, usize>,
}

/// Receives a fresh [`ViewSnapshot`] after every recomputation.
pub trait RenderSink {
    fn render(&mut self, snapshot: ViewSnapshot);
}

/// Sink that keeps only the most recent snapshot.
#[derive(Debug, Default)]
pub struct LatestView(Option<ViewSnapshot>);

impl LatestView {
    pub fn get(&self) -> Option<&ViewSnapshot> {
        self.0.as_ref()
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }
}

impl RenderSink for LatestView {
    fn render(&mut self, snapshot: ViewSnapshot) {
        self.0 = Some(snapshot);
    }
}

impl RenderSink for Vec<ViewSnapshot> {
    fn render(&mut self, snapshot: ViewSnapshot) {
        self.push(snapshot);
    }
}

/// Filter `dataset`, bin the result and push exactly one snapshot to `sink`.
pub fn recompute(
    dataset: &Dataset,
    params: &FilterParams,
    bins: usize,
    sink: &mut impl RenderSink,
) {
    let view = apply(dataset, params);
    let values: Vec<f64> = view.values().collect();
    let snapshot = ViewSnapshot {
        row_count: view.row_count(),
        points: view.points().collect(),
        point_regions: view.records().map(|r| r.ocean_proximity.clone()).collect(),
        histogram: Histogram::compute(values.iter().copied(), bins),
        values,
        price_bounds: dataset.price_bounds,
        region_counts: view.region_counts(),
    };
    if view.is_empty() {
        log::debug!("No rows match the current filters");
    }
    log::debug!(
        "Recomputed view: {} of {} rows, {} binned ({:?}, {} regions, price {:.0}..={:.0})",
        snapshot.row_count,
        dataset.len(),
        snapshot.histogram.total(),
        params.income,
        params.regions.len(),
        params.price.min,
        params.price.max
    );
    sink.render(snapshot);
}
