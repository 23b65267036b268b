//! The buffer-pool seam of the storage engine.
//!
//! The record layer never touches files or eviction policy; it only borrows
//! pinned page frames through the [`api::BufferPool`] trait defined here.
//! This crate also ships [`mem_pool::MemPool`], an in-memory implementation
//! backing the test suites of the crates above it.

/// The `BufferPool` trait consumed by the record layer.
pub mod api;

/// Pool errors.
pub mod error;

/// Pinned page frames and the RAII pin handle.
pub mod frame;

/// In-memory buffer pool used in tests.
pub mod mem_pool;
