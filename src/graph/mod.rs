//! Road graph construction
//!
//! Edge building, the node reference index, length computation, endpoint
//! compaction and the on-disk formats.

pub mod compact;
pub mod distance;
pub mod export;
pub mod geojson;
pub mod index;
pub mod road;

pub use compact::RetainedNode;
pub use export::RoadGraph;
pub use index::{Coordinates, NodeIndex, NodeSlot};
pub use road::{PendingEdge, Road, RoadClass, Sidewalks};
