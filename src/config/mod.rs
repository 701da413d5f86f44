use anyhow::{Context, Result, bail};
use log::warn;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domain::Level;
use crate::geometry::{DEFAULT_TOLERANCE, Projection};
use crate::series::{DEFAULT_SEED, default_years};

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}
fn default_seed() -> u64 {
    DEFAULT_SEED
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("data")
}
fn default_cache_dir() -> PathBuf {
    PathBuf::from("data").join("cache")
}

/// Settings read from `asgs-extract.toml`
///
/// ```toml
/// level = "sa3"
/// tolerance = 0.01
///
/// [projection.bounds]
/// min_lon = 113.0
/// max_lon = 154.0
/// min_lat = -44.0
/// max_lat = -10.0
///
/// [projection.viewport]
/// width = 1000.0
/// height = 760.0
/// ```
///
/// The projection table replaces the default as a whole: every bounds and
/// viewport field must be given.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub level: Option<Level>,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default)]
    pub projection: Projection,
    #[serde(default = "default_years")]
    pub years: Vec<i32>,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
    /// Override for the ABS download URL
    #[serde(default)]
    pub source_url: Option<String>,
    /// Local boundary file; skips the download entirely
    #[serde(default)]
    pub input: Option<PathBuf>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            level: None,
            tolerance: default_tolerance(),
            projection: Projection::default(),
            years: default_years(),
            seed: default_seed(),
            output_dir: default_output_dir(),
            cache_dir: default_cache_dir(),
            source_url: None,
            input: None,
        }
    }
}

impl FileConfig {
    pub fn parse(contents: &str) -> Result<Self> {
        let config: FileConfig = toml::from_str(contents).context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!("Config file not found: {}", path.display());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// First readable config from the search paths; unparseable files are
    /// reported and skipped
    pub fn load() -> Option<Self> {
        for path in get_config_paths() {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match Self::parse(&contents) {
                    Ok(config) => return Some(config),
                    Err(e) => warn!("Failed to parse config file {:?}: {:#}", path, e),
                }
            }
        }
        None
    }

    pub fn validate(&self) -> Result<()> {
        validate_tolerance(self.tolerance)?;
        if self.years.is_empty() {
            bail!("years must not be empty");
        }
        Ok(())
    }
}

pub fn validate_tolerance(tolerance: f64) -> Result<()> {
    if !tolerance.is_finite() || tolerance < 0.0 {
        bail!("tolerance must be a non-negative number, got {tolerance}");
    }
    Ok(())
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("asgs-extract.toml"));
    paths.push(PathBuf::from(".asgs-extract.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("asgs-extract").join("config.toml"));
        paths.push(config_dir.join("asgs-extract.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".asgs-extract.toml"));
    }

    paths
}
