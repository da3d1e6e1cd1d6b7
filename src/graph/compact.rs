//! Node compaction
//!
//! Keeps only the nodes that some road uses as an endpoint. Intermediate
//! geometry nodes served their purpose once lengths were computed.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::graph::index::NodeIndex;
use crate::graph::road::Road;

/// A node kept in the exported graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetainedNode {
    pub id: i64,
    /// `[lon, lat]`
    pub coordinates: [f64; 2],
}

/// Collect the endpoint nodes of `roads`, each exactly once, in order of
/// first appearance (`p1` before `p2`).
///
/// The index is only read, so calling this twice yields the same list.
pub fn retain_endpoints(roads: &[Road], index: &NodeIndex) -> Result<Vec<RetainedNode>> {
    let mut seen = FxHashSet::default();
    let mut retained = Vec::new();

    for road in roads {
        for id in [road.p1, road.p2] {
            if seen.insert(id) {
                let c = index.coordinates(id)?;
                retained.push(RetainedNode {
                    id,
                    coordinates: [c.lon, c.lat],
                });
            }
        }
    }

    Ok(retained)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::index::Coordinates;
    use crate::graph::road::Sidewalks;

    fn road(p1: i64, p2: i64) -> Road {
        Road {
            p1,
            p2,
            directed: false,
            sidewalks: Sidewalks::default(),
            distance: 1.0,
        }
    }

    fn index() -> NodeIndex {
        let mut index = NodeIndex::new();
        for id in 1..=5 {
            index.demand(id);
            index.resolve(id, Coordinates::new(id as f64, -(id as f64)));
        }
        index
    }

    #[test]
    fn test_shared_endpoint_retained_once() {
        let roads = vec![road(1, 2), road(2, 3), road(3, 1)];
        let nodes = retain_endpoints(&roads, &index()).unwrap();

        let ids: Vec<i64> = nodes.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(nodes[1].coordinates, [2.0, -2.0]);
    }

    #[test]
    fn test_intermediate_nodes_not_retained() {
        // nodes 2 and 4 only appear inside way geometry
        let roads = vec![road(1, 3), road(3, 5)];
        let nodes = retain_endpoints(&roads, &index()).unwrap();

        let ids: Vec<i64> = nodes.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 3, 5]);
    }

    #[test]
    fn test_compaction_is_idempotent() {
        let roads = vec![road(5, 4), road(4, 5), road(1, 4)];
        let index = index();

        let first = retain_endpoints(&roads, &index).unwrap();
        let second = retain_endpoints(&roads, &index).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn test_no_roads_no_nodes() {
        assert!(retain_endpoints(&[], &index()).unwrap().is_empty());
    }
}
