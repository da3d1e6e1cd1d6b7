//! Node reference index
//!
//! The way pass records which node IDs are needed (the demand set); the
//! node pass attaches coordinates to exactly those IDs. Unreferenced nodes
//! are never stored, so memory tracks the road network, not the input.

use rustc_hash::FxHashMap;

use crate::core::error::{Error, Result};

/// A longitude/latitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinates {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// State of a demanded node
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeSlot {
    /// Referenced by a road, coordinates not seen yet
    Pending,
    Resolved(Coordinates),
}

#[derive(Debug, Default)]
pub struct NodeIndex {
    slots: FxHashMap<i64, NodeSlot>,
    resolved: usize,
}

impl NodeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a node as needed. Returns `true` if it was not demanded before.
    pub fn demand(&mut self, id: i64) -> bool {
        let mut inserted = false;
        self.slots.entry(id).or_insert_with(|| {
            inserted = true;
            NodeSlot::Pending
        });
        inserted
    }

    /// Attach coordinates to a demanded node.
    ///
    /// Returns `false` and stores nothing when the node was never demanded.
    /// A repeated node record overwrites the earlier coordinates.
    pub fn resolve(&mut self, id: i64, coordinates: Coordinates) -> bool {
        match self.slots.get_mut(&id) {
            Some(slot) => {
                if *slot == NodeSlot::Pending {
                    self.resolved += 1;
                }
                *slot = NodeSlot::Resolved(coordinates);
                true
            }
            None => false,
        }
    }

    /// Coordinates of a node, failing if it is pending or was never demanded
    pub fn coordinates(&self, id: i64) -> Result<Coordinates> {
        match self.slots.get(&id) {
            Some(NodeSlot::Resolved(coordinates)) => Ok(*coordinates),
            Some(NodeSlot::Pending) | None => Err(Error::IncompleteData { node_id: id }),
        }
    }

    /// Number of demanded nodes
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn resolved_count(&self) -> usize {
        self.resolved
    }

    /// Demanded nodes still waiting for coordinates
    pub fn pending_count(&self) -> usize {
        self.slots.len() - self.resolved
    }
}
