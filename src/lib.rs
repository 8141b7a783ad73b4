pub mod api;
pub mod conf;
pub mod core;
pub mod engine;
pub mod ingest;
pub mod query;
pub mod service;
pub mod workspace;

#[cfg(feature = "testutil")]
pub mod testutil;
