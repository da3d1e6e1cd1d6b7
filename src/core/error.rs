//! Error types for butterfly-roads
//!
//! Every failure is terminal for a run: nothing here is retried or recovered
//! locally. Malformed tag values are not errors, they degrade to defaults in
//! [`crate::graph::road`].

use thiserror::Error;

/// Main error type for butterfly-roads operations
#[derive(Debug, Error)]
pub enum Error {
    /// The upstream document parser rejected the input
    #[error("Parse error: {0}")]
    Parse(String),

    /// A road references a node that the node pass never resolved
    #[error("Incomplete data: node {node_id} is referenced by a road but missing from the input")]
    IncompleteData { node_id: i64 },

    /// An exported graph cannot be converted (missing roads or nodes)
    #[error("Invalid export: {0}")]
    InvalidExport(String),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<osmpbf::Error> for Error {
    fn from(err: osmpbf::Error) -> Self {
        Error::Parse(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Parse(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::Parse(err.to_string())
    }
}

/// Convenience result type for butterfly-roads operations
pub type Result<T> = std::result::Result<T, Error>;
