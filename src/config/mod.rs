//! Configuration module
//!
//! Handles loading the ambient harness configuration and preparing the
//! module search path.

mod env;
mod paths;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub use env::EnvConfig;
pub use paths::{prepare_environment, SearchPath, SEARCH_PATH_VAR};

#[cfg(test)]
pub(crate) use env::EnvBuilder;

/// Config file looked up in the working directory when none is given
const DEFAULT_CONFIG_FILE: &str = "runtests.yaml";

/// Harness configuration that does not come from the command line
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Directory scanned for `test_*` files; the registry is used when unset
    pub test_dir: Option<PathBuf>,

    /// Build output directory prepended to the search path when present
    pub build_dir: PathBuf,

    /// Default log filter
    pub log_level: String,

    /// Overrides the profile log stem used by `--mpe`
    pub profile_logfile: Option<String>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            test_dir: None,
            build_dir: default_build_dir(),
            log_level: "warn".to_string(),
            profile_logfile: None,
        }
    }
}

impl HarnessConfig {
    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read config file")?;

        let config: Self = if path
            .as_ref()
            .extension()
            .map(|e| e == "yaml" || e == "yml")
            .unwrap_or(false)
        {
            serde_yaml::from_str(&content).context("Failed to parse YAML config")?
        } else {
            serde_json::from_str(&content).context("Failed to parse JSON config")?
        };

        Ok(config)
    }

    /// Resolve the configuration: file (explicit or default), then
    /// environment overrides
    pub fn resolve(env: &EnvConfig) -> Result<Self> {
        let mut config = match &env.config_file {
            Some(path) => Self::load(path)
                .with_context(|| format!("Loading config from {}", path.display()))?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::load(DEFAULT_CONFIG_FILE)?,
            None => Self::default(),
        };

        config.apply_env(env);
        debug!("Resolved harness config: {:?}", config);
        Ok(config)
    }

    /// Apply environment variable overrides
    pub fn apply_env(&mut self, env: &EnvConfig) {
        if let Some(dir) = &env.test_dir {
            self.test_dir = Some(dir.clone());
        }
        if let Some(dir) = &env.build_dir {
            self.build_dir = dir.clone();
        }
        if let Some(log) = &env.log {
            self.log_level = log.clone();
        }
        if let Some(logfile) = &env.profile_logfile {
            self.profile_logfile = Some(logfile.clone());
        }
    }
}

/// Build output directory matching the harness's own build profile
pub fn default_build_dir() -> PathBuf {
    let profile = if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    };
    PathBuf::from("target").join(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = HarnessConfig::default();
        assert!(config.test_dir.is_none());
        assert_eq!(config.log_level, "warn");
        assert!(config.build_dir.starts_with("target"));
    }

    #[test]
    fn test_load_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("runtests.yaml");
        std::fs::write(&path, "test_dir: suite\nlog_level: debug\n").unwrap();

        let config = HarnessConfig::load(&path).unwrap();
        assert_eq!(config.test_dir, Some(PathBuf::from("suite")));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.build_dir, default_build_dir());
    }

    #[test]
    fn test_load_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("runtests.json");
        std::fs::write(&path, r#"{"build_dir": "out/lib", "profile_logfile": "prof"}"#).unwrap();

        let config = HarnessConfig::load(&path).unwrap();
        assert_eq!(config.build_dir, PathBuf::from("out/lib"));
        assert_eq!(config.profile_logfile.as_deref(), Some("prof"));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = HarnessConfig::default();
        let env = EnvConfig {
            test_dir: Some(PathBuf::from("/srv/tests")),
            log: Some("trace".to_string()),
            ..Default::default()
        };

        config.apply_env(&env);
        assert_eq!(config.test_dir, Some(PathBuf::from("/srv/tests")));
        assert_eq!(config.log_level, "trace");
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let env = EnvConfig {
            config_file: Some(PathBuf::from("/no/such/runtests.yaml")),
            ..Default::default()
        };
        assert!(HarnessConfig::resolve(&env).is_err());
    }
}
