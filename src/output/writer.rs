use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::domain::{Feature, FeatureCollection, FeatureMetadata, Level};
use crate::series::SeriesRow;

/// The three files produced for one level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub geometry: PathBuf,
    pub metadata: PathBuf,
    pub series: PathBuf,
}

impl OutputPaths {
    /// `{level}_geometry.json`, `{level}_metadata.json`, `{level}_series.json`
    pub fn new(output_dir: &Path, level: Level) -> Self {
        let stem = level.file_stem();
        Self {
            geometry: output_dir.join(format!("{stem}_geometry.json")),
            metadata: output_dir.join(format!("{stem}_metadata.json")),
            series: output_dir.join(format!("{stem}_series.json")),
        }
    }
}

/// Write a value as pretty-printed JSON
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    Ok(())
}

/// Write geometry, metadata and series for a level into `output_dir`
pub fn write_outputs(
    output_dir: &Path,
    level: Level,
    features: &[Feature],
    series: &[SeriesRow],
) -> Result<OutputPaths> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

    let paths = OutputPaths::new(output_dir, level);
    let metadata: Vec<FeatureMetadata> = features.iter().map(Feature::metadata).collect();

    write_json(&paths.geometry, &FeatureCollection { features })?;
    write_json(&paths.metadata, &metadata)?;
    write_json(&paths.series, series)?;

    Ok(paths)
}
