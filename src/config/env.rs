//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;
use std::path::PathBuf;

/// Environment variable prefix
const ENV_PREFIX: &str = "RUNTESTS";

/// Environment configuration from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Config file from RUNTESTS_CONFIG
    pub config_file: Option<PathBuf>,
    /// Test directory from RUNTESTS_TEST_DIR
    pub test_dir: Option<PathBuf>,
    /// Build directory from RUNTESTS_BUILD_DIR
    pub build_dir: Option<PathBuf>,
    /// Log filter from RUNTESTS_LOG
    pub log: Option<String>,
    /// Profile log stem from RUNTESTS_PROFILE_LOGFILE
    pub profile_logfile: Option<String>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            config_file: get_env("CONFIG").map(PathBuf::from),
            test_dir: get_env("TEST_DIR").map(PathBuf::from),
            build_dir: get_env("BUILD_DIR").map(PathBuf::from),
            log: get_env("LOG"),
            profile_logfile: get_env("PROFILE_LOGFILE"),
        }
    }
}

/// Get environment variable with prefix, ignoring empty values
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}"))
        .ok()
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
pub(crate) use scoped::EnvBuilder;
