use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::color::ColorMap;
use crate::data::cache::DatasetCache;
use crate::data::error::LoadError;
use crate::data::filter::FilterParams;
use crate::data::model::Dataset;
use crate::events::{recompute, FilterEvent, LatestView, ViewSnapshot};
use crate::settings::Settings;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub settings: Settings,

    cache: DatasetCache,

    /// Loaded dataset (None until a source loads successfully).
    pub dataset: Option<Arc<Dataset>>,

    /// Where `dataset` came from.
    pub source_path: Option<PathBuf>,

    /// Current filter selections.
    pub params: Option<FilterParams>,

    /// Result of the last recomputation.
    pub view: LatestView,

    /// Colour per region for the map and legend.
    pub color_map: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(settings: Settings, cache: DatasetCache) -> Self {
        Self {
            settings,
            cache,
            dataset: None,
            source_path: None,
            params: None,
            view: LatestView::default(),
            color_map: None,
            status_message: None,
        }
    }

    /// Load `path` through the cache and make it the current dataset.
    ///
    /// On failure the previous dataset and filters stay in place.
    pub fn open(&mut self, path: &Path) -> Result<(), LoadError> {
        let dataset = self.cache.get_or_load(path)?;
        self.source_path = Some(path.to_path_buf());
        self.set_dataset(dataset);
        Ok(())
    }

    /// Re-open the current source; a no-op load if it has not changed on disk.
    pub fn reload(&mut self) -> Result<(), LoadError> {
        let Some(path) = self.source_path.clone() else {
            return Ok(());
        };
        let dataset = self.cache.get_or_load(&path)?;
        let unchanged = self
            .dataset
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, &dataset));
        if !unchanged {
            self.set_dataset(dataset);
        }
        Ok(())
    }

    /// Drop the cached copy and read the current source again.
    pub fn force_reload(&mut self) -> Result<(), LoadError> {
        self.cache.invalidate();
        self.reload()
    }

    pub fn cache(&self) -> &DatasetCache {
        &self.cache
    }

    /// Ingest a newly loaded dataset, reset filters and recompute.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.params = Some(FilterParams::for_dataset(&dataset));
        self.color_map = Some(ColorMap::new(&dataset.regions));
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refresh();
    }

    /// Apply one filter event and recompute the view.
    pub fn handle(&mut self, event: FilterEvent) {
        let (Some(ds), Some(params)) = (&self.dataset, &mut self.params) else {
            return;
        };
        event.apply_to(params, ds);
        self.refresh();
    }

    /// Recompute the view from the current dataset and filters.
    fn refresh(&mut self) {
        match (&self.dataset, &self.params) {
            (Some(ds), Some(params)) => {
                recompute(ds, params, self.settings.histogram_bins, &mut self.view);
            }
            _ => self.view.clear(),
        }
    }

    pub fn snapshot(&self) -> Option<&ViewSnapshot> {
        self.view.get()
    }

    /// Open a file and report a failure in the status bar instead of returning it.
    pub fn open_reporting(&mut self, path: &Path) {
        if let Err(e) = self.open(path) {
            log::error!("Failed to load {}: {e}", path.display());
            self.status_message = Some(format!("Error: {e}"));
        }
    }
}
