//! Two-pass extraction pipeline
//!
//! Pass 1 streams ways, keeps the roads and records which nodes they touch.
//! Pass 2 streams nodes and resolves coordinates for those IDs only. Node
//! records may come before or after the ways that use them, so the node pass
//! only starts once the way pass has reached end-of-stream.

use std::fmt;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::core::error::Result;
use crate::core::source::RecordSource;
use crate::graph::compact::retain_endpoints;
use crate::graph::distance::resolve_roads;
use crate::graph::export::RoadGraph;
use crate::graph::index::{Coordinates, NodeIndex};
use crate::graph::road::build_edge;

/// Records between two progress callbacks
const PROGRESS_INTERVAL: u64 = 1 << 16;

/// Which traversal of the source is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Ways,
    Nodes,
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pass::Ways => write!(f, "ways"),
            Pass::Nodes => write!(f, "nodes"),
        }
    }
}

/// Progress callback: current pass and number of records seen so far
pub type ProgressCallback = Arc<dyn Fn(Pass, u64) + Send + Sync>;

/// Options for an extraction run
#[derive(Clone, Default)]
pub struct ExtractOptions {
    /// Export the endpoint nodes alongside the roads
    pub include_nodes: bool,

    /// Simplify road geometry (not implemented, accepted for compatibility)
    pub simplify: bool,

    /// Optional progress callback
    pub progress: Option<ProgressCallback>,
}

/// Counters collected during a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractStats {
    pub ways_seen: u64,
    pub ways_accepted: u64,
    pub nodes_seen: u64,
    pub nodes_demanded: u64,
    pub nodes_resolved: u64,
    pub nodes_retained: u64,
}

/// Result of a successful extraction
#[derive(Debug, Clone)]
pub struct Extraction {
    pub graph: RoadGraph,
    pub stats: ExtractStats,
}

/// Run both passes over `source` and build the road graph.
///
/// Nothing is written here; a failure in either pass, or a road referencing
/// a node the node pass never saw, aborts the run before any output exists.
pub fn extract(source: &dyn RecordSource, options: &ExtractOptions) -> Result<Extraction> {
    let mut stats = ExtractStats::default();
    let mut index = NodeIndex::new();
    let mut edges = Vec::new();

    info!("First pass");
    source.for_each_way(&mut |way| {
        stats.ways_seen += 1;
        report(options, Pass::Ways, stats.ways_seen);

        if let Some(edge) = build_edge(way) {
            for &id in &edge.geometry {
                index.demand(id);
            }
            edges.push(edge);
        }
    })?;
    finish(options, Pass::Ways, stats.ways_seen);
    stats.ways_accepted = edges.len() as u64;
    stats.nodes_demanded = index.len() as u64;
    debug!(
        "{} of {} ways accepted, {} nodes referenced",
        stats.ways_accepted, stats.ways_seen, stats.nodes_demanded
    );

    info!("Second pass");
    source.for_each_node(&mut |node| {
        stats.nodes_seen += 1;
        report(options, Pass::Nodes, stats.nodes_seen);

        index.resolve(node.id, Coordinates::new(node.lon, node.lat));
    })?;
    finish(options, Pass::Nodes, stats.nodes_seen);
    stats.nodes_resolved = index.resolved_count() as u64;
    debug!(
        "{} of {} referenced nodes resolved, {} pending ({} node records read)",
        stats.nodes_resolved,
        stats.nodes_demanded,
        index.pending_count(),
        stats.nodes_seen
    );

    info!("Populating distances");
    let roads = resolve_roads(edges, &index)?;

    if options.simplify {
        warn!("Geometry simplification is not implemented, exporting roads as-is");
    }

    let nodes = if options.include_nodes {
        info!("Stripping intermediate nodes");
        let retained = retain_endpoints(&roads, &index)?;
        stats.nodes_retained = retained.len() as u64;
        Some(retained)
    } else {
        None
    };

    Ok(Extraction {
        graph: RoadGraph { roads, nodes },
        stats,
    })
}

fn report(options: &ExtractOptions, pass: Pass, count: u64) {
    if count % PROGRESS_INTERVAL == 0 {
        if let Some(progress) = &options.progress {
            progress(pass, count);
        }
    }
}

fn finish(options: &ExtractOptions, pass: Pass, count: u64) {
    if let Some(progress) = &options.progress {
        progress(pass, count);
    }
}
