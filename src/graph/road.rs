//! Way filtering and edge construction
//!
//! One accepted way becomes one edge spanning its first and last node. The
//! full node chain is kept on the pending edge until its length is known.

use serde::{Deserialize, Serialize};

use crate::core::source::Way;

/// Road classifications that make it into the graph (`highway=*` values)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoadClass {
    Motorway,
    MotorwayLink,
    Trunk,
    TrunkLink,
    Primary,
    PrimaryLink,
    Secondary,
    SecondaryLink,
    Tertiary,
    TertiaryLink,
    Unclassified,
    Residential,
    LivingStreet,
}

impl RoadClass {
    pub const ALL: [RoadClass; 13] = [
        RoadClass::Motorway,
        RoadClass::MotorwayLink,
        RoadClass::Trunk,
        RoadClass::TrunkLink,
        RoadClass::Primary,
        RoadClass::PrimaryLink,
        RoadClass::Secondary,
        RoadClass::SecondaryLink,
        RoadClass::Tertiary,
        RoadClass::TertiaryLink,
        RoadClass::Unclassified,
        RoadClass::Residential,
        RoadClass::LivingStreet,
    ];

    /// Parse a `highway` tag value. Anything outside the whitelist is `None`.
    pub fn from_tag(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|class| class.as_str() == value)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoadClass::Motorway => "motorway",
            RoadClass::MotorwayLink => "motorway_link",
            RoadClass::Trunk => "trunk",
            RoadClass::TrunkLink => "trunk_link",
            RoadClass::Primary => "primary",
            RoadClass::PrimaryLink => "primary_link",
            RoadClass::Secondary => "secondary",
            RoadClass::SecondaryLink => "secondary_link",
            RoadClass::Tertiary => "tertiary",
            RoadClass::TertiaryLink => "tertiary_link",
            RoadClass::Unclassified => "unclassified",
            RoadClass::Residential => "residential",
            RoadClass::LivingStreet => "living_street",
        }
    }
}

/// Sidewalk presence on each side of a road, serialized as `[left, right]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[bool; 2]", into = "[bool; 2]")]
pub struct Sidewalks {
    pub left: bool,
    pub right: bool,
}

impl Sidewalks {
    /// Map a `sidewalk` tag value; unknown or absent means no sidewalk.
    pub fn from_tag(value: Option<&str>) -> Self {
        let (left, right) = match value {
            Some("both") => (true, true),
            Some("left") => (true, false),
            Some("right") => (false, true),
            _ => (false, false),
        };
        Self { left, right }
    }
}

impl From<[bool; 2]> for Sidewalks {
    fn from([left, right]: [bool; 2]) -> Self {
        Self { left, right }
    }
}

impl From<Sidewalks> for [bool; 2] {
    fn from(sidewalks: Sidewalks) -> Self {
        [sidewalks.left, sidewalks.right]
    }
}

/// An edge whose length is not known yet
#[derive(Debug, Clone, PartialEq)]
pub struct PendingEdge {
    pub p1: i64,
    pub p2: i64,
    pub directed: bool,
    pub sidewalks: Sidewalks,
    /// Every node of the source way, `p1` first and `p2` last
    pub geometry: Vec<i64>,
}

impl PendingEdge {
    /// Attach the computed length, dropping the intermediate geometry
    pub fn into_road(self, distance: f64) -> Road {
        Road {
            p1: self.p1,
            p2: self.p2,
            directed: self.directed,
            sidewalks: self.sidewalks,
            distance,
        }
    }
}

/// A resolved road as written to the graph file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Road {
    pub p1: i64,
    pub p2: i64,
    pub directed: bool,
    pub sidewalks: Sidewalks,
    /// Length along the original polyline, in meters
    pub distance: f64,
}

/// Turn a way into a pending edge, or `None` if it is not a road of
/// interest.
///
/// Only `oneway=yes` makes an edge directed; `-1` and `reverse` are treated
/// as bidirectional. Ways with fewer than two nodes cannot span an edge and
/// are skipped.
pub fn build_edge(way: Way) -> Option<PendingEdge> {
    way.tag("highway").and_then(RoadClass::from_tag)?;

    let (p1, p2) = match way.node_refs.as_slice() {
        [first, .., last] => (*first, *last),
        _ => return None,
    };

    Some(PendingEdge {
        p1,
        p2,
        directed: way.tag("oneway") == Some("yes"),
        sidewalks: Sidewalks::from_tag(way.tag("sidewalk")),
        geometry: way.node_refs,
    })
}
