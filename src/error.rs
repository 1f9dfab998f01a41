use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::geom::GridSize;

/// Errors produced by the tile map editor core.
#[derive(Debug, Error)]
pub enum MapError {
    /// A grid cell was addressed outside `0..columns` x `0..rows`.
    #[error("cell ({x}, {y}) is outside the {}x{} grid", size.columns, size.rows)]
    OutOfBounds {
        /// Requested column
        x: i64,
        /// Requested row
        y: i64,
        /// Size of the grid that was accessed
        size: GridSize,
    },

    /// A snapshot does not fit the grid it is restored into.
    #[error("corrupt editor state: snapshot has {found} cells, grid expects {expected}")]
    CorruptState {
        /// Cell count of the grid
        expected: usize,
        /// Cell count of the snapshot
        found: usize,
    },

    /// A document is missing fields or carries inconsistent values.
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// The tileset image referenced by a document does not exist.
    #[error("tileset image not found: {}", path.display())]
    AtlasNotFound {
        /// Path that was looked up
        path: PathBuf,
    },

    /// The tileset image exists but could not be decoded.
    #[error("tileset image {} could not be read", path.display())]
    AtlasUnreadable {
        /// Path of the image
        path: PathBuf,
        /// Decoder error
        #[source]
        source: image::ImageError,
    },

    /// A view scale factor that is not a positive finite number.
    #[error("invalid scale factor {0}: must be finite and greater than zero")]
    InvalidScale(f64),

    /// File I/O error
    #[error("I/O error on {}", path.display())]
    Io {
        /// File that was read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// The file is not valid JSON.
    #[error("JSON parse error in {}", path.display())]
    Json {
        /// File that was parsed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },
}

impl MapError {
    /// Shorthand for [`MapError::MalformedDocument`].
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        MapError::MalformedDocument(msg.into())
    }
}
