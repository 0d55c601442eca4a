//! Parallel runtime integration
//!
//! The harness only initializes and finalizes the runtime; the tests talk
//! to it.

mod local;
mod profile;

use std::path::PathBuf;
use thiserror::Error;

use crate::models::{ProcessorInfo, RuntimeConfig};

pub use local::{LaunchEnv, LocalRuntime};
pub use profile::Profiler;

/// Runtime error types
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Runtime already initialized")]
    AlreadyInitialized,

    #[error("Runtime not initialized")]
    NotInitialized,

    #[error("Invalid value {value:?} for {var}")]
    InvalidLaunchEnv { var: String, value: String },

    #[error("Cannot write profile log {path}: {source}")]
    ProfileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot serialize profile log: {0}")]
    ProfileSerialize(#[from] serde_json::Error),
}

/// A parallel runtime the harness can bring up and tear down
pub trait Runtime {
    /// Initialize with the requested threading configuration
    fn init(&mut self, config: &RuntimeConfig) -> Result<ProcessorInfo, RuntimeError>;

    /// Profiling hook, present when the config enabled one
    fn profiler(&mut self) -> Option<&mut Profiler>;

    /// Shut down, flushing any profile log
    fn finalize(&mut self) -> Result<(), RuntimeError>;
}
