//! Harness options
//!
//! The immutable snapshot built from the command line.

use std::collections::BTreeSet;
use std::path::PathBuf;

use super::runtime::{ProfileConfig, RuntimeConfig, ThreadLevel};

/// Report verbosity
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

impl Verbosity {
    pub fn is_quiet(&self) -> bool {
        matches!(self, Verbosity::Quiet)
    }
}

impl Default for Verbosity {
    fn default() -> Self {
        Verbosity::Normal
    }
}

/// Options for one harness invocation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    pub verbosity: Verbosity,
    pub include: BTreeSet<String>,
    pub exclude: BTreeSet<String>,
    /// Extra search paths, in command-line order
    pub path: Vec<PathBuf>,
    /// Leak-check repetitions
    pub repeats: u32,
    pub threaded: bool,
    pub thread_level: ThreadLevel,
    /// Enable the MPE profiling hook
    pub mpe: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            verbosity: Verbosity::Normal,
            include: BTreeSet::new(),
            exclude: BTreeSet::new(),
            path: Vec::new(),
            repeats: 3,
            threaded: true,
            thread_level: ThreadLevel::Multiple,
            mpe: false,
        }
    }
}

#[cfg(test)]
impl Options {
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.include.insert(pattern.into());
        self
    }

    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude.insert(pattern.into());
        self
    }

    pub fn with_repeats(mut self, repeats: u32) -> Self {
        self.repeats = repeats;
        self
    }
}

impl Options {
    /// Runtime configuration for a package; the profile log is named after it
    pub fn runtime_config(&self, package: &str) -> RuntimeConfig {
        let config = RuntimeConfig::new(self.threaded, self.thread_level);
        if self.mpe {
            config.with_profile(ProfileConfig::mpe(format!("runtests-{package}")))
        } else {
            config
        }
    }
}
