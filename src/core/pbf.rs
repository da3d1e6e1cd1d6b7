//! PBF record source backed by `osmpbf`

use osmpbf::{Element, ElementReader};
use std::path::{Path, PathBuf};

use crate::core::error::Result;
use crate::core::source::{Node, RecordSource, Way};

/// Streams ways and nodes out of an `.osm.pbf` file.
///
/// Every traversal reopens the file, so the two passes never share reader
/// state.
pub struct PbfSource {
    path: PathBuf,
}

impl PbfSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl RecordSource for PbfSource {
    fn for_each_way(&self, visit: &mut dyn FnMut(Way)) -> Result<()> {
        let reader = ElementReader::from_path(&self.path)?;

        reader.for_each(|element| {
            if let Element::Way(way) = element {
                visit(Way {
                    id: way.id(),
                    node_refs: way.refs().collect(),
                    tags: way
                        .tags()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect(),
                });
            }
        })?;

        Ok(())
    }

    fn for_each_node(&self, visit: &mut dyn FnMut(Node)) -> Result<()> {
        let reader = ElementReader::from_path(&self.path)?;

        reader.for_each(|element| match element {
            Element::Node(node) => visit(Node {
                id: node.id(),
                lon: node.lon(),
                lat: node.lat(),
            }),
            Element::DenseNode(node) => visit(Node {
                id: node.id(),
                lon: node.lon(),
                lat: node.lat(),
            }),
            _ => {}
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Error;
    use std::io::Write;

    // Minimal protobuf writer, enough to lay out one uncompressed OSMData blob

    fn varint(mut value: u64, out: &mut Vec<u8>) {
        while value >= 0x80 {
            out.push((value as u8 & 0x7f) | 0x80);
            value >>= 7;
        }
        out.push(value as u8);
    }

    fn zigzag(value: i64) -> u64 {
        ((value << 1) ^ (value >> 63)) as u64
    }

    fn uint_field(field: u64, value: u64, out: &mut Vec<u8>) {
        varint(field << 3, out);
        varint(value, out);
    }

    fn bytes_field(field: u64, bytes: &[u8], out: &mut Vec<u8>) {
        varint((field << 3) | 2, out);
        varint(bytes.len() as u64, out);
        out.extend_from_slice(bytes);
    }

    fn packed_field(field: u64, values: &[u64], out: &mut Vec<u8>) {
        let mut body = Vec::new();
        for &value in values {
            varint(value, &mut body);
        }
        bytes_field(field, &body, out);
    }

    /// Degrees to raw units at the default granularity of 100 nanodegrees
    fn raw(degrees: f64) -> i64 {
        (degrees * 1e7).round() as i64
    }

    /// One block holding node 1 as a plain node, nodes 2 and 3 as dense
    /// nodes, and way 10 (1, 2, 3) tagged `highway=primary`.
    fn sample_pbf() -> Vec<u8> {
        let mut strings = Vec::new();
        for s in ["", "highway", "primary"] {
            bytes_field(1, s.as_bytes(), &mut strings);
        }

        let mut node = Vec::new();
        uint_field(1, zigzag(1), &mut node);
        uint_field(8, zigzag(raw(43.73)), &mut node);
        uint_field(9, zigzag(raw(7.42)), &mut node);
        let mut plain_group = Vec::new();
        bytes_field(1, &node, &mut plain_group);

        let mut dense = Vec::new();
        packed_field(1, &[zigzag(2), zigzag(1)], &mut dense);
        packed_field(
            8,
            &[zigzag(raw(43.74)), zigzag(raw(43.75) - raw(43.74))],
            &mut dense,
        );
        packed_field(
            9,
            &[zigzag(raw(7.43)), zigzag(raw(7.44) - raw(7.43))],
            &mut dense,
        );
        let mut dense_group = Vec::new();
        bytes_field(2, &dense, &mut dense_group);

        let mut way = Vec::new();
        uint_field(1, 10, &mut way);
        packed_field(2, &[1], &mut way);
        packed_field(3, &[2], &mut way);
        packed_field(8, &[zigzag(1), zigzag(1), zigzag(1)], &mut way);
        let mut way_group = Vec::new();
        bytes_field(3, &way, &mut way_group);

        let mut block = Vec::new();
        bytes_field(1, &strings, &mut block);
        bytes_field(2, &plain_group, &mut block);
        bytes_field(2, &dense_group, &mut block);
        bytes_field(2, &way_group, &mut block);

        let mut blob = Vec::new();
        bytes_field(1, &block, &mut blob);
        uint_field(2, block.len() as u64, &mut blob);

        let mut header = Vec::new();
        bytes_field(1, b"OSMData", &mut header);
        uint_field(3, blob.len() as u64, &mut header);

        let mut file = Vec::new();
        file.extend_from_slice(&(header.len() as u32).to_be_bytes());
        file.extend_from_slice(&header);
        file.extend_from_slice(&blob);
        file
    }

    fn sample_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&sample_pbf()).unwrap();
        file
    }

    #[test]
    fn test_reads_ways() {
        let file = sample_file();
        let mut ways = Vec::new();
        PbfSource::new(file.path())
            .for_each_way(&mut |w| ways.push(w))
            .unwrap();

        assert_eq!(ways.len(), 1);
        assert_eq!(ways[0].id, 10);
        assert_eq!(ways[0].node_refs, vec![1, 2, 3]);
        assert_eq!(ways[0].tag("highway"), Some("primary"));
    }

    #[test]
    fn test_reads_plain_and_dense_nodes() {
        let file = sample_file();
        let mut nodes = Vec::new();
        PbfSource::new(file.path())
            .for_each_node(&mut |n| nodes.push(n))
            .unwrap();

        let ids: Vec<i64> = nodes.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let expected = [(7.42, 43.73), (7.43, 43.74), (7.44, 43.75)];
        for (node, (lon, lat)) in nodes.iter().zip(expected) {
            assert!((node.lon - lon).abs() < 1e-7, "lon of node {}", node.id);
            assert!((node.lat - lat).abs() < 1e-7, "lat of node {}", node.id);
        }
    }

    #[test]
    fn test_ways_pass_skips_nodes() {
        let file = sample_file();
        let source = PbfSource::new(file.path());

        let mut ways = 0;
        source.for_each_way(&mut |_| ways += 1).unwrap();
        let mut nodes = 0;
        source.for_each_node(&mut |_| nodes += 1).unwrap();

        assert_eq!((ways, nodes), (1, 3));
    }

    #[test]
    fn test_garbage_input_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\x00\x00\x00\x0cthis is not a pbf blob").unwrap();

        let source = PbfSource::new(file.path());
        let result = source.for_each_way(&mut |_| {});
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_parse_error() {
        let source = PbfSource::new("/definitely/not/here.osm.pbf");
        let result = source.for_each_node(&mut |_| {});
        assert!(matches!(result, Err(Error::Parse(_))));
    }
}
