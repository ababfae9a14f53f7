//! User settings, read once at startup from a TOML file.
//!
//! Lookup order for the file: `$HOUSING_EXPLORER_CONFIG`, then
//! `./housing-explorer.toml`. A missing file means defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::histogram::DEFAULT_BINS;

const CONFIG_ENV: &str = "HOUSING_EXPLORER_CONFIG";
const CONFIG_FILENAME: &str = "housing-explorer.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Source loaded at startup.
    pub data_path: PathBuf,
    /// Bins in the value-distribution chart.
    pub histogram_bins: usize,
    /// Radius of a map marker in points.
    pub point_radius: f32,
    /// Initial window size `[width, height]`.
    pub window_size: [f32; 2],
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("housing.csv"),
            histogram_bins: DEFAULT_BINS,
            point_radius: 1.5,
            window_size: [1200.0, 800.0],
        }
    }
}

/// Path of the settings file to consult.
pub fn settings_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME))
}

/// Parse settings from `path`. A missing file yields defaults.
pub fn read_settings(path: &Path) -> Result<Settings> {
    match fs::read_to_string(path) {
        Ok(content) => toml::from_str(&content)
            .with_context(|| format!("parsing settings file {}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::info!("No settings file at {}, using defaults", path.display());
            Ok(Settings::default())
        }
        Err(e) => Err(e).with_context(|| format!("reading settings file {}", path.display())),
    }
}

/// Load settings, falling back to defaults on any problem, then apply the
/// optional command-line data path override.
pub fn load_settings(cli_data_path: Option<PathBuf>) -> Settings {
    let path = settings_path();
    let mut settings = match read_settings(&path) {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!("{e:#}; using default settings");
            Settings::default()
        }
    };
    if let Some(data_path) = cli_data_path {
        settings.data_path = data_path;
    }
    settings
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let settings = read_settings(Path::new("/no/such/housing-explorer.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "data_path = \"/data/housing.csv\"\nhistogram_bins = 50\n").unwrap();

        let settings = read_settings(file.path()).unwrap();
        assert_eq!(settings.data_path, PathBuf::from("/data/housing.csv"));
        assert_eq!(settings.histogram_bins, 50);
        assert_eq!(settings.point_radius, Settings::default().point_radius);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "histogram_bins = \"many\"\n").unwrap();
        assert!(read_settings(file.path()).is_err());
    }
}
