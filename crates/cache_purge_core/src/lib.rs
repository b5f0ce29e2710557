//! Shared cache invalidation domain primitives.
//!
//! This crate owns the deterministic parts of a purge cycle: decoding storage
//! finalize payloads, deriving public URLs and building metadata patches.
//! It intentionally excludes AWS SDK, HTTP and Lambda runtime concerns.

pub mod category;
pub mod event;
pub mod metadata;
pub mod target;
