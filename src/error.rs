//! The error type surfaced at the external boundary: file I/O, image
//! loading, and the hex preprocessor's record format.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image must be {} bytes, got {got}", crate::memory::IMAGE_BYTES)]
    ImageSize { got: usize },

    #[error("hex record error on line {line}: {reason}")]
    HexRecord { line: usize, reason: String },
}
