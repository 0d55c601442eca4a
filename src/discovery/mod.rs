//! Test discovery
//!
//! Registry of test modules and the include/exclude filtering that turns
//! them into a suite.

mod loader;
mod registry;

use std::path::PathBuf;
use thiserror::Error;

pub use loader::discover_tests;
pub use registry::{PackageInfo, Registry, TestGroup, TestModule};

/// Discovery error types
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Cannot read test directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No test module registered as {0}")]
    ModuleNotFound(String),
}
