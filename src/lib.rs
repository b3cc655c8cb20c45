//! Sparkify ETL library
//!
//! Loads song metadata files and user activity logs into a SQLite star
//! schema. The binary wires configuration and logging around `run_pipeline`;
//! everything else is exposed here for testing.

pub mod config;
pub mod error;
pub mod etl;
pub mod pipeline;
pub mod records;
pub mod sqlite_persistence;
pub mod store;

// Re-export commonly used types for convenience
pub use error::{EtlError, Result};
pub use pipeline::{run_pipeline, PipelineSummary};
pub use store::{InMemoryStore, SqliteStore, StoreGateway};
