//! routenovelty CLI - Debug tool for route similarity and novelty
//!
//! Usage:
//!   routenovelty-cli compare <a.gpx> <b.gpx> [--precision <digits>]
//!   routenovelty-cli record <gpx>... --store <history.json>
//!   routenovelty-cli history --store <history.json>
//!   routenovelty-cli trend --store <history.json> [--window <n>] [--threshold <t>]
//!
//! Runs are recorded in the order given on the command line, so passing
//! a folder's files sorted by date replays a training history.

use clap::{Parser, Subcommand};
use gpx::{Gpx, read};
use std::error::Error;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use routenovelty::{
    GpsPoint, JsonFileStorage, NoveltyConfig, NoveltyTracker, RunStorage, SimilarityMetric,
    compute_novelty_trend, compute_route_metrics,
    geo_utils::{compute_bounds, route_distance},
    quantize_route,
};

#[derive(Parser)]
#[command(name = "routenovelty-cli")]
#[command(about = "Debug tool for route similarity and novelty", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON file with a NoveltyConfig (flags override its values)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Quantization precision in decimal digits
    #[arg(short, long, global = true)]
    precision: Option<u32>,

    /// Enable verbose debug output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two GPX tracks
    Compare {
        first: PathBuf,
        second: PathBuf,
    },

    /// Record GPX tracks as runs, in the order given
    Record {
        /// GPX files to record
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// History file (JSON)
        #[arg(short, long)]
        store: PathBuf,

        /// Similarity driving novelty
        #[arg(short, long, value_enum)]
        metric: Option<SimilarityMetric>,
    },

    /// List recorded runs
    History {
        /// History file (JSON)
        #[arg(short, long)]
        store: PathBuf,
    },

    /// Show the novelty trend
    Trend {
        /// History file (JSON)
        #[arg(short, long)]
        store: PathBuf,

        /// Number of recent runs checked for prolonged low novelty
        #[arg(short, long)]
        window: Option<usize>,

        /// Novelty below this counts as low
        #[arg(short, long)]
        threshold: Option<f64>,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format(|buf, record| writeln!(buf, "[{:5}] {}", record.level(), record.args()))
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(precision) = cli.precision {
        config.precision = precision;
    }

    match cli.command {
        Commands::Compare { first, second } => run_compare(&first, &second, &config, cli.verbose),
        Commands::Record {
            files,
            store,
            metric,
        } => {
            if let Some(metric) = metric {
                config.metric = metric;
            }
            run_record(&files, &store, config)
        }
        Commands::History { store } => run_history(&store),
        Commands::Trend {
            store,
            window,
            threshold,
        } => {
            if let Some(window) = window {
                config.trend_window = window;
            }
            if let Some(threshold) = threshold {
                config.low_threshold = threshold;
            }
            config.validate()?;
            run_trend(&store, &config)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<NoveltyConfig, Box<dyn Error>> {
    let Some(path) = path else {
        return Ok(NoveltyConfig::default());
    };
    let file = File::open(path)?;
    let config: NoveltyConfig = serde_json::from_reader(BufReader::new(file))?;
    log::debug!("Loaded config from {}: {:?}", path.display(), config);
    Ok(config)
}

/// Parse a GPX file into a flat list of track points
fn parse_gpx_file(path: &Path) -> Result<Vec<GpsPoint>, String> {
    let file = File::open(path).map_err(|e| e.to_string())?;
    let reader = BufReader::new(file);
    let gpx: Gpx = read(reader).map_err(|e| e.to_string())?;

    let points: Vec<GpsPoint> = gpx
        .tracks
        .iter()
        .flat_map(|track| &track.segments)
        .flat_map(|segment| &segment.points)
        .map(|pt| {
            let p = pt.point();
            GpsPoint::new(p.y(), p.x())
        })
        .collect();

    if points.is_empty() {
        return Err(format!("No track points found in {}", path.display()));
    }
    Ok(points)
}

fn run_compare(
    first: &Path,
    second: &Path,
    config: &NoveltyConfig,
    verbose: bool,
) -> Result<(), Box<dyn Error>> {
    let a = parse_gpx_file(first)?;
    let b = parse_gpx_file(second)?;

    println!("\n{}", "=".repeat(60));
    println!("Comparing routes (precision {})", config.precision);
    println!("{}", "=".repeat(60));

    for (path, points) in [(first, &a), (second, &b)] {
        println!(
            "  {} - {} points, {:.1}km, {} grid cells",
            path.display(),
            points.len(),
            route_distance(points) / 1000.0,
            quantize_route(points, config.precision).len()
        );
        if verbose {
            let bounds = compute_bounds(points);
            println!(
                "    bounds: lat [{:.5}, {:.5}] lon [{:.5}, {:.5}]",
                bounds.min_lat, bounds.max_lat, bounds.min_lng, bounds.max_lng
            );
        }
    }

    let metrics = compute_route_metrics(&a, &b, config.precision);
    println!("\n  Overlap similarity: {:.3}", metrics.overlap);
    println!("  DTW similarity:     {:.3}", metrics.dtw);
    println!("  Max similarity:     {:.3}", metrics.max);
    Ok(())
}

fn run_record(files: &[PathBuf], store: &Path, config: NoveltyConfig) -> Result<(), Box<dyn Error>> {
    let mut tracker = NoveltyTracker::with_config(JsonFileStorage::new(store), config)?;
    println!("History: {} ({} runs)", store.display(), tracker.len());

    for path in files {
        let points = match parse_gpx_file(path) {
            Ok(points) => points,
            Err(e) => {
                eprintln!("  [ERR] Failed to parse {}: {}", path.display(), e);
                continue;
            }
        };
        match tracker.record_run(&points) {
            Ok(run) => println!(
                "  [OK] {} <- {} - novelty {:.3} (overlap {:.3}, dtw {:.3})",
                run.name,
                path.display(),
                run.novelty_score,
                run.overlap_similarity,
                run.dtw_similarity
            ),
            Err(e) => eprintln!("  [ERR] {}: {}", path.display(), e),
        }
    }

    let trend = tracker.trend();
    if trend.prolonged_low {
        println!(
            "\nNovelty has stayed below {} for the last {} runs",
            tracker.config().low_threshold,
            tracker.config().trend_window
        );
    }
    Ok(())
}

fn run_history(store: &Path) -> Result<(), Box<dyn Error>> {
    let runs = JsonFileStorage::new(store).load()?;
    println!("{} runs in {}", runs.len(), store.display());
    for run in &runs {
        println!(
            "  #{:<4} {:<10} {}  {:>5} points  {:.1}km  novelty {:.3}",
            run.id,
            run.name,
            run.recorded_at.format("%Y-%m-%d %H:%M"),
            run.points.len(),
            route_distance(&run.points) / 1000.0,
            run.novelty_score
        );
    }
    Ok(())
}

fn run_trend(store: &Path, config: &NoveltyConfig) -> Result<(), Box<dyn Error>> {
    let runs = JsonFileStorage::new(store).load()?;
    let trend = compute_novelty_trend(&runs, config.trend_window, config.low_threshold);

    println!("{:<6} {:>8} {:>8}", "run", "novelty", "rolling");
    for (run, (value, rolling)) in runs.iter().zip(trend.values.iter().zip(&trend.rolling)) {
        println!("{:<6} {:>8.3} {:>8.3}", run.id, value, rolling);
    }
    println!(
        "\nProlonged low novelty (last {} below {}): {}",
        config.trend_window,
        config.low_threshold,
        if trend.prolonged_low { "yes" } else { "no" }
    );
    Ok(())
}
