//! Record sources for butterfly-roads
//!
//! A source turns an OSM dump into two independent streams: one of ways and
//! one of nodes. The extraction pipeline asks for each stream once, in that
//! order, over the same underlying input.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::core::error::{Error, Result};
use crate::core::pbf::PbfSource;
use crate::core::xml::XmlSource;

/// A way as delivered by the parser: an ordered chain of node references
/// plus its tags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Way {
    pub id: i64,
    pub node_refs: Vec<i64>,
    pub tags: Vec<(String, String)>,
}

impl Way {
    /// Value of the first tag with the given key
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// A node as delivered by the parser
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub id: i64,
    pub lon: f64,
    pub lat: f64,
}

/// Streaming access to the ways and nodes of one OSM input.
///
/// Each traversal visits every record once and returns `Ok(())` at
/// end-of-stream. A parser failure aborts the traversal with
/// [`Error::Parse`]. Implementations must allow both traversals to be
/// requested repeatedly.
pub trait RecordSource {
    fn for_each_way(&self, visit: &mut dyn FnMut(Way)) -> Result<()>;
    fn for_each_node(&self, visit: &mut dyn FnMut(Node)) -> Result<()>;
}

/// Encoding of an OSM input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Plain-text `.osm` XML
    Xml,
    /// Compact binary `.osm.pbf`
    Pbf,
}

impl InputFormat {
    /// Guess the format from a file name: `.osm` and `.xml` are XML,
    /// everything else is treated as PBF.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("osm") || ext.eq_ignore_ascii_case("xml") => {
                InputFormat::Xml
            }
            _ => InputFormat::Pbf,
        }
    }
}

impl FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xml" | "osm" => Ok(InputFormat::Xml),
            "pbf" => Ok(InputFormat::Pbf),
            other => Err(format!("unknown input format '{other}' (expected xml or pbf)")),
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputFormat::Xml => write!(f, "xml"),
            InputFormat::Pbf => write!(f, "pbf"),
        }
    }
}

/// Open a file-backed source. When `format` is `None` it is guessed from
/// the file name.
pub fn open_source(path: &Path, format: Option<InputFormat>) -> Result<Box<dyn RecordSource>> {
    if !path.exists() {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Input file not found: {}", path.display()),
        )));
    }

    let format = format.unwrap_or_else(|| InputFormat::from_path(path));
    log::debug!("Reading {} as {format}", path.display());

    Ok(match format {
        InputFormat::Xml => Box::new(XmlSource::new(path)),
        InputFormat::Pbf => Box::new(PbfSource::new(path)),
    })
}

/// A source holding its records in memory.
///
/// Records are replayed in insertion order on every traversal.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    ways: Vec<Way>,
    nodes: Vec<Node>,
}

impl MemorySource {
    pub fn new(ways: Vec<Way>, nodes: Vec<Node>) -> Self {
        Self { ways, nodes }
    }

    pub fn push_way(&mut self, way: Way) {
        self.ways.push(way);
    }

    pub fn push_node(&mut self, node: Node) {
        self.nodes.push(node);
    }
}

impl RecordSource for MemorySource {
    fn for_each_way(&self, visit: &mut dyn FnMut(Way)) -> Result<()> {
        for way in &self.ways {
            visit(way.clone());
        }
        Ok(())
    }

    fn for_each_node(&self, visit: &mut dyn FnMut(Node)) -> Result<()> {
        for node in &self.nodes {
            visit(*node);
        }
        Ok(())
    }
}
