//! # Butterfly-roads Library
//!
//! Builds a compact road graph from an OpenStreetMap dump without loading the
//! dump into memory.
//!
//! ## Features
//!
//! - **Two-pass streaming**: ways first, then only the nodes those ways use
//! - **Bounded memory**: proportional to the referenced nodes, not the input
//! - **Real lengths**: every road measured along its full polyline
//! - **Compact output**: optionally keep only the nodes used as road endpoints
//! - **XML and PBF input**: `.osm` via quick-xml, `.osm.pbf` via osmpbf
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use butterfly_roads::ExtractOptions;
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let options = ExtractOptions {
//!         include_nodes: true,
//!         ..Default::default()
//!     };
//!     butterfly_roads::extract_file(
//!         Path::new("monaco-latest.osm.pbf"),
//!         Path::new("monaco.json"),
//!         None,
//!         &options,
//!     )?;
//!
//!     butterfly_roads::export_geojson(Path::new("monaco.json"), Path::new("monaco.geojson"))?;
//!     Ok(())
//! }
//! ```

use log::info;
use std::path::Path;

pub mod core;
pub mod graph;
pub mod pipeline;

pub use crate::core::error::{Error, Result};
pub use crate::core::source::{open_source, InputFormat, MemorySource, Node, RecordSource, Way};
pub use crate::graph::export::RoadGraph;
pub use crate::pipeline::{
    extract, ExtractOptions, ExtractStats, Extraction, Pass, ProgressCallback,
};

/// Extract the road graph of an OSM file and write it as JSON
///
/// # Arguments
/// * `input` - OSM file (`.osm` XML or `.osm.pbf`)
/// * `output` - Destination graph file
/// * `format` - Input encoding, guessed from the file name when `None`
/// * `options` - Node inclusion and progress reporting
///
/// The output file is only created once the whole graph has been built.
pub fn extract_file(
    input: &Path,
    output: &Path,
    format: Option<InputFormat>,
    options: &ExtractOptions,
) -> Result<ExtractStats> {
    let source = open_source(input, format)?;
    let Extraction { graph, stats } = extract(source.as_ref(), options)?;

    match &graph.nodes {
        Some(nodes) => info!(
            "Exporting ({} roads and {} nodes)",
            graph.roads.len(),
            nodes.len()
        ),
        None => info!("Exporting ({} roads)", graph.roads.len()),
    }
    graph.write_to(output)?;

    Ok(stats)
}

/// Convert a graph file extracted with node inclusion into a GeoJSON
/// `GeometryCollection` with one line per road.
///
/// Returns the number of lines written.
pub fn export_geojson(input: &Path, output: &Path) -> Result<usize> {
    graph::geojson::convert_file(input, output)
}
