//! Road length computation
//!
//! A road's length is the sum of great-circle distances between consecutive
//! nodes of its source way, not the chord between its endpoints.

use geo::{Distance, Haversine, Point};

use crate::core::error::Result;
use crate::graph::index::{Coordinates, NodeIndex};
use crate::graph::road::{PendingEdge, Road};

/// Haversine distance in meters on a mean-Earth-radius sphere
pub fn haversine(a: Coordinates, b: Coordinates) -> f64 {
    Haversine::distance(Point::new(a.lon, a.lat), Point::new(b.lon, b.lat))
}

/// Length of a node chain in meters.
///
/// Fails with `IncompleteData` on the first node that has no coordinates.
pub fn path_length(geometry: &[i64], index: &NodeIndex) -> Result<f64> {
    let mut nodes = geometry.iter().map(|&id| index.coordinates(id));

    let mut prev = match nodes.next() {
        Some(first) => first?,
        None => return Ok(0.0),
    };

    let mut total = 0.0;
    for next in nodes {
        let next = next?;
        total += haversine(prev, next);
        prev = next;
    }

    Ok(total)
}

/// Compute the length of every pending edge, preserving order
pub fn resolve_roads(edges: Vec<PendingEdge>, index: &NodeIndex) -> Result<Vec<Road>> {
    edges
        .into_iter()
        .map(|edge| {
            let distance = path_length(&edge.geometry, index)?;
            Ok(edge.into_road(distance))
        })
        .collect()
}
