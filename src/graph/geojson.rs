//! GeoJSON rendering of an exported graph
//!
//! Every road becomes a two-point `LineString` between its endpoints, all
//! wrapped in one `GeometryCollection`. Intermediate geometry is not part of
//! the graph file, so it cannot be drawn.

use geojson::{Geometry, Value};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::core::error::{Error, Result};
use crate::graph::compact::RetainedNode;
use crate::graph::export::write_json;
use crate::graph::road::Road;

/// A graph file as read back, where either section may be missing
#[derive(Debug, Deserialize)]
struct GraphDocument {
    roads: Option<Vec<Road>>,
    nodes: Option<Vec<RetainedNode>>,
}

/// Build the geometry collection for a graph that carries both roads and
/// nodes.
pub fn to_geometry_collection(roads: &[Road], nodes: &[RetainedNode]) -> Result<Geometry> {
    let lookup: FxHashMap<i64, [f64; 2]> = nodes.iter().map(|n| (n.id, n.coordinates)).collect();
    let position = |id: i64| {
        lookup.get(&id).map(|c| c.to_vec()).ok_or_else(|| {
            Error::InvalidExport(format!("road endpoint {id} is missing from the node list"))
        })
    };

    let geometries = roads
        .iter()
        .map(|road| {
            Ok(Geometry::new(Value::LineString(vec![
                position(road.p1)?,
                position(road.p2)?,
            ])))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Geometry::new(Value::GeometryCollection(geometries)))
}

/// Convert a graph file produced with node inclusion into a GeoJSON file.
///
/// Returns the number of lines written.
pub fn convert_file(input: &Path, output: &Path) -> Result<usize> {
    let document: GraphDocument = serde_json::from_reader(BufReader::new(File::open(input)?))?;

    let (roads, nodes) = match (document.roads, document.nodes) {
        (Some(roads), Some(nodes)) => (roads, nodes),
        (None, _) => {
            return Err(Error::InvalidExport(
                "graph has no roads; can only use complete extracted data".to_string(),
            ))
        }
        (_, None) => {
            return Err(Error::InvalidExport(
                "graph has no nodes; extract it again with --nodes".to_string(),
            ))
        }
    };

    let collection = to_geometry_collection(&roads, &nodes)?;

    write_json(output, &collection)?;

    Ok(roads.len())
}
