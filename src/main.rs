use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, warn};
use std::path::PathBuf;
use std::time::Instant;

use asgs_extract::api::fetch_boundaries;
use asgs_extract::boundary::load_regions;
use asgs_extract::config::{FileConfig, validate_tolerance};
use asgs_extract::domain::Level;
use asgs_extract::features::FeatureBuilder;
use asgs_extract::geometry::Projector;
use asgs_extract::output::write_outputs;
use asgs_extract::series::SeriesGenerator;

/// Simplify and project ASGS SA3/SA4 boundaries into a render-ready viewport
///
/// Examples:
///   # Extract SA3 regions into ./data, downloading boundaries if not cached
///   asgs-extract --level sa3
///
///   # Use a local boundary file and a coarser tolerance
///   asgs-extract --level sa4 --input SA4_2021_AUST_GDA2020.geojson --tolerance 0.02
///
///   # Use a config file
///   asgs-extract --config my-settings.toml
#[derive(Parser, Debug)]
#[command(name = "asgs-extract")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches asgs-extract.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// ASGS level to extract
    #[arg(short = 'l', long, value_enum)]
    level: Option<Level>,

    /// Simplification tolerance in degrees
    #[arg(short = 't', long)]
    tolerance: Option<f64>,

    /// Local boundary GeoJSON (skips download and cache)
    #[arg(short = 'i', long)]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(short = 'o', long)]
    output_dir: Option<PathBuf>,

    /// Cache directory for downloaded boundary files
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Override the ABS boundary download URL
    #[arg(long)]
    source_url: Option<String>,

    /// Comma-separated years for the synthetic series
    #[arg(long, value_delimiter = ',')]
    years: Vec<i32>,

    /// Seed for the synthetic series
    #[arg(long)]
    seed: Option<u64>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    if let Err(err) = run(args) {
        error!("{err:#}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let total_start = Instant::now();

    let file_config = match args.config {
        Some(ref path) => FileConfig::from_path(path)?,
        None => FileConfig::load().unwrap_or_default(),
    };

    let Some(level) = args.level.or(file_config.level) else {
        bail!("Must provide --level (sa3 or sa4) or set `level` in the config file");
    };
    let tolerance = args.tolerance.unwrap_or(file_config.tolerance);
    validate_tolerance(tolerance)?;
    let years = if args.years.is_empty() {
        file_config.years.clone()
    } else {
        args.years.clone()
    };
    let seed = args.seed.unwrap_or(file_config.seed);
    let output_dir = args.output_dir.clone().unwrap_or(file_config.output_dir.clone());
    let cache_dir = args.cache_dir.clone().unwrap_or(file_config.cache_dir.clone());
    let input = args.input.clone().or(file_config.input.clone());
    let source_url = args.source_url.clone().or(file_config.source_url.clone());

    let projector =
        Projector::new(file_config.projection).context("Invalid projection in config file")?;

    println!("ASGS {} Extraction", level);
    println!("====================");
    println!();

    debug!("Configuration:");
    debug!("  Level: {}", level);
    debug!("  Tolerance: {}", tolerance);
    debug!("  Bounds: {:?}", projector.bounds());
    debug!("  Viewport: {:?}", projector.viewport());
    debug!("  Years: {:?}", years);
    debug!("  Seed: {}", seed);
    debug!("  Output: {}", output_dir.display());

    let boundary_path = match input {
        Some(path) => path,
        None => {
            let spinner = create_spinner(&format!("Resolving {} boundary file...", level));
            let start = Instant::now();
            let source = fetch_boundaries(level, &cache_dir, source_url.as_deref())
                .context("Failed to obtain boundary file")?;
            spinner.finish_with_message(format!(
                "Boundary file: {} [{:.1}s]",
                source.path().display(),
                start.elapsed().as_secs_f32()
            ));
            source.path().to_path_buf()
        }
    };

    let spinner = create_spinner("Loading boundary GeoJSON...");
    let start = Instant::now();
    let regions = load_regions(&boundary_path)
        .with_context(|| format!("Failed to load {}", boundary_path.display()))?;
    if regions.is_empty() {
        bail!("No regions found in {}", boundary_path.display());
    }
    spinner.finish_with_message(format!(
        "Loaded {} regions [{:.1}s]",
        regions.len(),
        start.elapsed().as_secs_f32()
    ));

    let spinner = create_spinner(&format!("Simplifying and projecting {} regions...", regions.len()));
    let start = Instant::now();
    let builder = FeatureBuilder::new(level, tolerance, projector);
    let report = builder.build_all(&regions);
    spinner.finish_with_message(format!(
        "Built {} features, skipped {} [{:.1}s]",
        report.features.len(),
        report.skipped(),
        start.elapsed().as_secs_f32()
    ));
    if report.features.is_empty() {
        bail!("Every region was empty or degenerate; nothing to write");
    }
    if report.skipped() > 0 {
        warn!(
            "{} regions skipped ({} empty geometry, {} degenerate ring, {} missing attributes)",
            report.skipped(),
            report.skipped_empty,
            report.skipped_degenerate,
            report.skipped_unidentified
        );
    }

    let spinner = create_spinner("Generating synthetic series...");
    let generator = SeriesGenerator::new(seed, years);
    let series = generator.generate(&report.features);
    spinner.finish_with_message(format!(
        "Generated {} series rows ({} regions x {} years)",
        series.len(),
        report.features.len(),
        generator.years().len()
    ));

    let spinner = create_spinner("Writing outputs...");
    let paths = write_outputs(&output_dir, level, &report.features, &series)
        .context("Failed to write outputs")?;
    spinner.finish_with_message("Wrote outputs".to_string());

    println!();
    println!(
        "Done! Total time: {:.1}s",
        total_start.elapsed().as_secs_f32()
    );
    println!();
    println!("  Geometry: {}", paths.geometry.display());
    println!("  Metadata: {}", paths.metadata.display());
    println!("  Series:   {}", paths.series.display());

    Ok(())
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
        pb.set_style(style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]));
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
