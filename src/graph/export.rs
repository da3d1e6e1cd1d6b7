//! Graph file format
//!
//! One JSON document: `{"roads": [...], "nodes": [...]}`, where `nodes` is
//! only present when node inclusion was requested.

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::core::error::Result;
use crate::graph::compact::RetainedNode;
use crate::graph::road::Road;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadGraph {
    pub roads: Vec<Road>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<RetainedNode>>,
}

impl RoadGraph {
    /// Write the graph in one go.
    ///
    /// The document goes to a sibling temporary file first and is renamed
    /// over `path` once complete.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        write_json(path, self)
    }

    pub fn read_from(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Serialize `value` as JSON into a sibling temporary file, then rename it
/// over `path`. A failed write removes the temporary file and leaves `path`
/// untouched.
pub(crate) fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let tmp = temporary_path(path);

    let result = (|| -> Result<()> {
        let mut writer = BufWriter::new(File::create(&tmp)?);
        serde_json::to_writer(&mut writer, value)?;
        writer.flush()?;
        Ok(())
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }

    fs::rename(&tmp, path)?;
    Ok(())
}

fn temporary_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output.json".to_string());
    path.with_file_name(format!(".{name}.partial"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::road::Sidewalks;

    fn sample(nodes: Option<Vec<RetainedNode>>) -> RoadGraph {
        RoadGraph {
            roads: vec![Road {
                p1: 1,
                p2: 2,
                directed: true,
                sidewalks: Sidewalks {
                    left: false,
                    right: true,
                },
                distance: 42.0,
            }],
            nodes,
        }
    }

    #[test]
    fn test_nodes_omitted_when_not_requested() {
        let json = serde_json::to_value(sample(None)).unwrap();
        assert!(json.get("roads").is_some());
        assert!(json.get("nodes").is_none());
    }

    #[test]
    fn test_empty_graph_keeps_empty_lists() {
        let graph = RoadGraph {
            roads: vec![],
            nodes: Some(vec![]),
        };
        let json = serde_json::to_string(&graph).unwrap();
        assert_eq!(json, r#"{"roads":[],"nodes":[]}"#);
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");
        let graph = sample(Some(vec![
            RetainedNode {
                id: 1,
                coordinates: [7.42, 43.73],
            },
            RetainedNode {
                id: 2,
                coordinates: [7.43, 43.74],
            },
        ]));

        graph.write_to(&path).unwrap();
        assert_eq!(RoadGraph::read_from(&path).unwrap(), graph);

        let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1, "temporary file should be renamed away");
    }

    #[test]
    fn test_write_into_missing_directory_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("graph.json");

        assert!(sample(None).write_to(&path).is_err());
        assert!(!path.exists());
    }
}
