use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::graph::NodeId;

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("node {} does not belong to this network", .0.index())]
    UnknownNode(NodeId),
}

/// Failures while building a network from external data. Every variant names
/// the file it came from.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}:{line}: {reason}", .path.display())]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        reason: String,
    },
    #[error("bad station data in {}: {reason}", .path.display())]
    StationData { path: PathBuf, reason: String },
    #[error("connection file {} is not named <from>-<to>", .path.display())]
    ConnectionName { path: PathBuf },
    #[error("connection file {} refers to unknown station {name:?}", .path.display())]
    UnknownStation { path: PathBuf, name: String },
    #[error("connection file {} has no capacity samples", .path.display())]
    EmptySeries { path: PathBuf },
    #[error(transparent)]
    Network(#[from] NetworkError),
}

impl ReadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ReadError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(path: impl Into<PathBuf>, line: usize, reason: impl Into<String>) -> Self {
        ReadError::MalformedRecord {
            path: path.into(),
            line,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cannot write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot load background image {}", .path.display())]
    Background { path: PathBuf },
    #[error("invalid map document: {0}")]
    Svg(#[from] usvg::Error),
    #[error("cannot encode png: {0}")]
    Png(#[from] png::EncodingError),
    #[error("cannot allocate a {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },
    #[error("network has no stations to draw")]
    EmptyNetwork,
    #[error("terminal error: {0}")]
    Terminal(#[source] io::Error),
}
