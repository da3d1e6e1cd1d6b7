//! # Butterfly-roads CLI
//!
//! Command-line interface for the butterfly-roads library.
//! Extracts a road graph from an OSM dump and renders it as GeoJSON.

use anyhow::{Context, Result};
use butterfly_roads::{ExtractOptions, InputFormat};
use clap::{Parser, Subcommand};
use log::{error, info};
use std::path::PathBuf;
use std::time::Instant;

mod cli;

/// Command-line interface for butterfly-roads
#[derive(Parser)]
#[command(name = "butterfly-roads")]
#[command(about = "Extract a compact road graph from OpenStreetMap data")]
#[command(long_about = "Extracts drivable roads from an OpenStreetMap dump:
  butterfly-roads extract monaco-latest.osm.pbf monaco.json           # Roads only
  butterfly-roads extract monaco.osm monaco.json --nodes              # Roads and endpoint nodes
  butterfly-roads geojson monaco.json monaco.geojson                  # Visualize (needs --nodes)

The input is read twice: once for ways, once for the nodes they reference.")]
#[command(version = env!("BUTTERFLY_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract and transform OSM data
    Extract {
        /// OSM input data file (XML or PBF)
        input: PathBuf,

        /// Output JSON file
        output: PathBuf,

        /// Include nodes information in the export
        #[arg(long)]
        nodes: bool,

        /// Simplify road geometry (not implemented yet, has no effect)
        #[arg(long)]
        simplify: bool,

        /// Input format, guessed from the file extension when omitted
        #[arg(long, value_name = "xml|pbf")]
        format: Option<InputFormat>,
    },

    /// Create GeoJSON from extracted data
    Geojson {
        /// Input JSON file produced with `extract ... --nodes`
        input: PathBuf,

        /// Output GeoJSON file
        output: PathBuf,
    },
}

fn main() {
    if let Err(e) = run() {
        error!("❌ Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging to stderr
    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Stderr)
        .init();

    match cli.command {
        Commands::Extract {
            input,
            output,
            nodes,
            simplify,
            format,
        } => {
            let started = Instant::now();
            let progress = cli::ProgressManager::new();
            let options = ExtractOptions {
                include_nodes: nodes,
                simplify,
                progress: Some(progress.callback()),
            };

            let result = butterfly_roads::extract_file(&input, &output, format, &options);
            progress.finish();
            let stats = result.with_context(|| {
                format!("Failed to extract roads from {}", input.display())
            })?;

            info!(
                "✅ Wrote {} in {:.2?} ({} of {} ways kept)",
                output.display(),
                started.elapsed(),
                stats.ways_accepted,
                stats.ways_seen
            );
        }
        Commands::Geojson { input, output } => {
            let lines = butterfly_roads::export_geojson(&input, &output)
                .with_context(|| format!("Failed to convert {}", input.display()))?;
            info!("✅ Wrote {} lines to {}", lines, output.display());
        }
    }

    Ok(())
}
