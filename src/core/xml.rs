//! XML record source backed by `quick-xml`
//!
//! Only the elements the extractor needs are interpreted: `<node>` with its
//! `id`/`lat`/`lon` attributes, and `<way>` with its `<nd ref>` children and
//! `<tag k v>` children. Relations and metadata are skipped.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::core::error::{Error, Result};
use crate::core::source::{Node, RecordSource, Way};

/// Streams ways and nodes out of a plain `.osm` file.
pub struct XmlSource {
    path: PathBuf,
}

impl XmlSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn open(&self) -> Result<BufReader<File>> {
        let file = File::open(&self.path).map_err(|e| {
            Error::Parse(format!("Failed to open {}: {e}", self.path.display()))
        })?;
        Ok(BufReader::new(file))
    }
}

impl RecordSource for XmlSource {
    fn for_each_way(&self, visit: &mut dyn FnMut(Way)) -> Result<()> {
        scan(self.open()?, Target::Ways(visit))
    }

    fn for_each_node(&self, visit: &mut dyn FnMut(Node)) -> Result<()> {
        scan(self.open()?, Target::Nodes(visit))
    }
}

/// Which record kind a scan delivers
enum Target<'a> {
    Ways(&'a mut dyn FnMut(Way)),
    Nodes(&'a mut dyn FnMut(Node)),
}

/// Scan an OSM XML document, delivering one record kind to the visitor.
fn scan<R: BufRead>(input: R, mut target: Target<'_>) -> Result<()> {
    let mut reader = Reader::from_reader(input);
    reader.trim_text(true);

    let mut current_way: Option<Way> = None;
    let mut buf = Vec::new();

    loop {
        let event = reader.read_event_into(&mut buf).map_err(|e| {
            Error::Parse(format!(
                "XML error at byte {}: {e}",
                reader.buffer_position()
            ))
        })?;

        match event {
            Event::Eof => break,
            Event::Start(e) => match (&mut target, e.name().as_ref()) {
                (Target::Nodes(visit), b"node") => visit(parse_node(&e)?),
                (Target::Ways(_), b"way") => {
                    current_way = Some(Way {
                        id: required_attr(&e, b"id", "way")?,
                        ..Default::default()
                    });
                }
                (Target::Ways(_), name) => {
                    if let Some(way) = current_way.as_mut() {
                        add_way_child(way, name, &e)?;
                    }
                }
                _ => {}
            },
            Event::Empty(e) => match (&mut target, e.name().as_ref()) {
                (Target::Nodes(visit), b"node") => visit(parse_node(&e)?),
                (Target::Ways(visit), b"way") => visit(Way {
                    id: required_attr(&e, b"id", "way")?,
                    ..Default::default()
                }),
                (Target::Ways(_), name) => {
                    if let Some(way) = current_way.as_mut() {
                        add_way_child(way, name, &e)?;
                    }
                }
                _ => {}
            },
            Event::End(e) => {
                if let Target::Ways(visit) = &mut target {
                    if e.name().as_ref() == b"way" {
                        if let Some(way) = current_way.take() {
                            visit(way);
                        }
                    }
                }
            }
            _ => {}
        }
        buf.clear();
    }

    if current_way.is_some() {
        return Err(Error::Parse("Unexpected end of document inside <way>".to_string()));
    }

    Ok(())
}

fn add_way_child(way: &mut Way, name: &[u8], e: &BytesStart<'_>) -> Result<()> {
    match name {
        b"nd" => way.node_refs.push(required_attr(e, b"ref", "nd")?),
        b"tag" => {
            if let (Some(k), Some(v)) = (attr(e, b"k")?, attr(e, b"v")?) {
                way.tags.push((k, v));
            }
        }
        _ => {}
    }
    Ok(())
}

fn parse_node(e: &BytesStart<'_>) -> Result<Node> {
    Ok(Node {
        id: required_attr(e, b"id", "node")?,
        lon: coordinate_attr(e, b"lon")?,
        lat: coordinate_attr(e, b"lat")?,
    })
}

/// `f64::from_str` accepts `NaN` and `inf`, which have no place in a graph file
fn coordinate_attr(e: &BytesStart<'_>, key: &[u8]) -> Result<f64> {
    let value: f64 = required_attr(e, key, "node")?;
    if !value.is_finite() {
        return Err(Error::Parse(format!(
            "<node> has invalid '{}': {value}",
            String::from_utf8_lossy(key)
        )));
    }
    Ok(value)
}

fn attr(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes().with_checks(false) {
        let attr = attr?;
        if attr.key.as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn required_attr<T: FromStr>(e: &BytesStart<'_>, key: &[u8], element: &str) -> Result<T> {
    let key_name = String::from_utf8_lossy(key);
    let raw = attr(e, key)?
        .ok_or_else(|| Error::Parse(format!("<{element}> without '{key_name}' attribute")))?;
    raw.parse()
        .map_err(|_| Error::Parse(format!("<{element}> has invalid '{key_name}': {raw}")))
}
