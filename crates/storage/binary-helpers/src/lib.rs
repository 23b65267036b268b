//! Helpers for reading and writing binary integer data inside fixed-size page
//! buffers. Page headers are stored as little-endian integers at fixed
//! offsets; this crate provides the bounds-checked codec for them.

/// Errors related to binary (de)serialization.
pub mod bin_error;

/// Little-endian integer reads and writes over byte slices.
pub mod le;
