//! Runtime configuration models
//!
//! Threading levels and the configuration handed to the runtime initializer.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Thread support requested from (or provided by) the parallel runtime
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ThreadLevel {
    Single,
    Funneled,
    Serialized,
    Multiple,
}

impl ThreadLevel {
    pub fn name(&self) -> &'static str {
        match self {
            ThreadLevel::Single => "single",
            ThreadLevel::Funneled => "funneled",
            ThreadLevel::Serialized => "serialized",
            ThreadLevel::Multiple => "multiple",
        }
    }

    /// Whether threads other than the main thread may call into the runtime
    pub fn allows_worker_threads(&self) -> bool {
        matches!(self, ThreadLevel::Serialized | ThreadLevel::Multiple)
    }

    pub fn all() -> Vec<ThreadLevel> {
        vec![
            ThreadLevel::Single,
            ThreadLevel::Funneled,
            ThreadLevel::Serialized,
            ThreadLevel::Multiple,
        ]
    }
}

impl Default for ThreadLevel {
    fn default() -> Self {
        ThreadLevel::Multiple
    }
}

impl fmt::Display for ThreadLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Profiling hook configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Profiler name
    pub name: String,
    /// Log file stem; the rank and extension are appended
    pub logfile: String,
}

impl ProfileConfig {
    pub fn mpe(logfile: impl Into<String>) -> Self {
        Self {
            name: "MPE".to_string(),
            logfile: logfile.into(),
        }
    }
}

/// Configuration passed to the runtime initializer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Initialize with thread support
    pub threaded: bool,
    /// Required thread level (ignored when not threaded)
    pub thread_level: ThreadLevel,
    /// Profiling hook, if enabled
    pub profile: Option<ProfileConfig>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            threaded: true,
            thread_level: ThreadLevel::Multiple,
            profile: None,
        }
    }
}

impl RuntimeConfig {
    pub fn new(threaded: bool, thread_level: ThreadLevel) -> Self {
        Self {
            threaded,
            thread_level,
            profile: None,
        }
    }

    pub fn with_profile(mut self, profile: ProfileConfig) -> Self {
        self.profile = Some(profile);
        self
    }

    /// The level the initializer should ask for
    pub fn required_level(&self) -> ThreadLevel {
        if self.threaded {
            self.thread_level
        } else {
            ThreadLevel::Single
        }
    }
}

/// Identity of this process within the parallel runtime
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorInfo {
    pub rank: u32,
    pub size: u32,
    pub processor_name: String,
    pub provided: ThreadLevel,
}

impl ProcessorInfo {
    pub fn new(rank: u32, size: u32, processor_name: impl Into<String>) -> Self {
        Self {
            rank,
            size,
            processor_name: processor_name.into(),
            provided: ThreadLevel::Single,
        }
    }

    pub fn with_provided(mut self, provided: ThreadLevel) -> Self {
        self.provided = provided;
        self
    }

    /// `rank@host` prefix used on banner and leak lines
    pub fn tag(&self) -> String {
        format!("[{}@{}]", self.rank, self.processor_name)
    }
}
