pub mod http_purge;
pub mod object_store;
pub mod purge;
pub mod s3_store;
