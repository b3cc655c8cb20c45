//! Common test infrastructure
//!
//! Builds throwaway song/log data directories and a database path inside a
//! temp dir. Tests should only import from this module.

mod constants;
mod fixtures;

pub use constants::*;
pub use fixtures::{app_config, event_line, TestData};
