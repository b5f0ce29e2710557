//! AWS-oriented adapters and handlers for edge cache invalidation.
//!
//! This crate owns runtime integration details (the Lambda binary, the S3
//! object store, the HTTP purge client). Domain primitives live in
//! `cache_purge_core`.

pub mod adapters;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
