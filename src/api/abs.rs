use anyhow::{Context, Result, bail};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::Level;

/// ABS landing page for the ASGS Edition 3 digital boundary files
pub const ASGS_DOWNLOADS_PAGE: &str = "https://www.abs.gov.au/statistics/standards/australian-statistical-geography-standard-asgs-edition-3/jul2021-jun2026/access-and-downloads/digital-boundary-files";
const USER_AGENT: &str = "asgs-extract/0.1.0";
const TIMEOUT_SECS: u64 = 60;

/// Where the boundary file came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundarySource {
    Cached(PathBuf),
    Downloaded(PathBuf),
}

impl BoundarySource {
    pub fn path(&self) -> &Path {
        match self {
            BoundarySource::Cached(p) | BoundarySource::Downloaded(p) => p,
        }
    }
}

fn file_name(level: Level) -> String {
    format!("{}_2021_AUST_GDA2020.geojson", level.code())
}

/// Published GeoJSON URL for a level
///
/// ABS moves these files between releases; when the download fails the
/// file can be fetched by hand from [`ASGS_DOWNLOADS_PAGE`] into the cache.
pub fn boundary_url(level: Level) -> String {
    format!("{}/{}", ASGS_DOWNLOADS_PAGE, file_name(level))
}

pub fn cache_path(cache_dir: &Path, level: Level) -> PathBuf {
    cache_dir.join(file_name(level))
}

/// Return the cached boundary file for `level`, downloading it first if absent.
///
/// A single attempt is made; failures tell the user where to place a
/// manually downloaded copy.
pub fn fetch_boundaries(level: Level, cache_dir: &Path, url: Option<&str>) -> Result<BoundarySource> {
    fs::create_dir_all(cache_dir)
        .with_context(|| format!("Failed to create cache directory: {}", cache_dir.display()))?;

    let target = cache_path(cache_dir, level);
    if target.exists() {
        info!("using cached geometry: {}", target.display());
        return Ok(BoundarySource::Cached(target));
    }

    let url = url.map(str::to_string).unwrap_or_else(|| boundary_url(level));
    info!("downloading {} geometry from {}", level, url);

    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(TIMEOUT_SECS))
        .build()
        .context("Failed to create HTTP client")?;

    let response = client
        .get(&url)
        .send()
        .with_context(|| manual_hint(&url, &target))?;

    if !response.status().is_success() {
        bail!(
            "ABS returned error status {}. {}",
            response.status(),
            manual_hint(&url, &target)
        );
    }

    let bytes = response
        .bytes()
        .with_context(|| format!("Failed to read response body from {url}"))?;

    // write to a sibling first so an interrupted download never looks cached
    let partial = target.with_extension("geojson.part");
    fs::write(&partial, &bytes)
        .with_context(|| format!("Failed to write {}", partial.display()))?;
    fs::rename(&partial, &target)
        .with_context(|| format!("Failed to move download into {}", target.display()))?;

    info!("downloaded {} bytes to {}", bytes.len(), target.display());
    Ok(BoundarySource::Downloaded(target))
}

fn manual_hint(url: &str, target: &Path) -> String {
    format!(
        "Failed to download {url}. Download the file manually from {ASGS_DOWNLOADS_PAGE} and save it as {}",
        target.display()
    )
}
