//! Error types for encoding.

use std::io;

use thiserror::Error;

/// Reasons a declared image header cannot be encoded.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeaderFault {
    #[error("invalid magic value")]
    BadMagic,

    /// `width * slots` does not fit in `usize`, so the occupancy grid cannot
    /// be sized.
    #[error("row length integer overflow (width {width}, {slots} palette slots)")]
    RowLengthOverflow { width: usize, slots: usize },
}

/// Errors that abort an encode. None of these are retried.
///
/// Palette exhaustion is not represented here; it is handled internally by
/// flushing the palette.
#[derive(Debug, Error)]
pub enum SixelError {
    #[error("malformed header: {0}")]
    MalformedHeader(#[from] HeaderFault),

    /// The source ended before the declared geometry was satisfied.
    #[error("unexpected end of file")]
    TruncatedInput,

    /// The input reported an error other than end of stream.
    #[error("read failed: {0}")]
    Io(#[source] io::Error),

    /// The output sink rejected a write.
    #[error("write failed: {0}")]
    Output(#[source] io::Error),

    #[error("failed to allocate {bytes} bytes for the occupancy grid")]
    Allocation { bytes: usize },

    #[cfg(feature = "image")]
    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),
}

impl SixelError {
    /// Classifies an input read error, separating a short read from a real
    /// I/O failure.
    pub(crate) fn from_read(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            SixelError::TruncatedInput
        } else {
            SixelError::Io(err)
        }
    }
}

/// Result type for encoding operations.
pub type Result<T> = std::result::Result<T, SixelError>;
