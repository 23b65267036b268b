use std::array::TryFromSliceError;
use thiserror::Error;

/// Errors that can occur when working with binary data.
#[derive(Error, Debug)]
pub enum BinaryError {
    /// A byte slice did not contain the range required for the read or write.
    #[error(
        "Attempt to access {expected} bytes at offset {from_offset}, but the slice does not contain that range."
    )]
    BytesSliceSizeMismatch { expected: usize, from_offset: usize },
    /// Failure to convert a slice into a fixed-size array.
    #[error("Error converting a slice")]
    SliceConversionError(#[from] TryFromSliceError),
}
