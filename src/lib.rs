pub mod config;
pub mod error;
pub mod ingest;
pub mod profiling;
pub mod telemetry;
