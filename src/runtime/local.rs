//! Local runtime
//!
//! Takes rank and size from the process launcher's environment and runs
//! everything in-process.

use std::path::PathBuf;
use tracing::{debug, info};

use super::{Profiler, Runtime, RuntimeError};
use crate::models::{ProcessorInfo, RuntimeConfig};

/// Rank and size variables exported by common launchers, in lookup order
const LAUNCHER_VARS: &[(&str, &str)] = &[
    ("PMI_RANK", "PMI_SIZE"),
    ("OMPI_COMM_WORLD_RANK", "OMPI_COMM_WORLD_SIZE"),
    ("MV2_COMM_WORLD_RANK", "MV2_COMM_WORLD_SIZE"),
    ("SLURM_PROCID", "SLURM_NTASKS"),
];

const HOSTNAME_FILE: &str = "/proc/sys/kernel/hostname";

/// Launcher-provided identity, captured once
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LaunchEnv {
    pub rank: Option<(String, String)>,
    pub size: Option<(String, String)>,
    pub hostname: Option<String>,
}

impl LaunchEnv {
    /// Capture from the process environment
    pub fn capture() -> Self {
        let mut launch = Self::from_lookup(|key| std::env::var(key).ok());
        if launch.hostname.is_none() {
            launch.hostname = std::fs::read_to_string(HOSTNAME_FILE)
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty());
        }
        launch
    }

    /// Build from an arbitrary variable lookup. Rank and size always come
    /// from the first launcher that exported either of its pair.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let entry = |var: &str| lookup(var).map(|value| (var.to_string(), value));
        let (rank, size) = LAUNCHER_VARS
            .iter()
            .map(|(rank_var, size_var)| (entry(rank_var), entry(size_var)))
            .find(|(rank, size)| rank.is_some() || size.is_some())
            .unwrap_or_default();

        Self {
            rank,
            size,
            hostname: lookup("HOSTNAME").filter(|s| !s.is_empty()),
        }
    }
}

fn parse_var(entry: &Option<(String, String)>, default: u32) -> Result<u32, RuntimeError> {
    match entry {
        None => Ok(default),
        Some((var, value)) => {
            value
                .trim()
                .parse()
                .map_err(|_| RuntimeError::InvalidLaunchEnv {
                    var: var.clone(),
                    value: value.clone(),
                })
        }
    }
}

/// In-process runtime
#[derive(Debug)]
pub struct LocalRuntime {
    launch: LaunchEnv,
    profile_dir: PathBuf,
    info: Option<ProcessorInfo>,
    profiler: Option<Profiler>,
}

impl LocalRuntime {
    pub fn new(launch: LaunchEnv) -> Self {
        Self {
            launch,
            profile_dir: PathBuf::from("."),
            info: None,
            profiler: None,
        }
    }

    /// Directory the profile log is written to
    #[cfg(test)]
    pub fn with_profile_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.profile_dir = dir.into();
        self
    }
}

impl Runtime for LocalRuntime {
    fn init(&mut self, config: &RuntimeConfig) -> Result<ProcessorInfo, RuntimeError> {
        if self.info.is_some() {
            return Err(RuntimeError::AlreadyInitialized);
        }

        let rank = parse_var(&self.launch.rank, 0)?;
        let size = parse_var(&self.launch.size, 1)?;
        let host = self
            .launch
            .hostname
            .clone()
            .unwrap_or_else(|| "localhost".to_string());

        let info = ProcessorInfo::new(rank, size, host).with_provided(config.required_level());

        debug!(
            "Runtime init: threaded={} required={} provided={}",
            config.threaded, config.thread_level, info.provided
        );

        if let Some(profile) = &config.profile {
            info!("{} profiling enabled, logfile {}", profile.name, profile.logfile);
            self.profiler = Some(Profiler::new(profile.clone(), rank));
        }

        self.info = Some(info.clone());
        Ok(info)
    }

    fn profiler(&mut self) -> Option<&mut Profiler> {
        self.profiler.as_mut()
    }

    fn finalize(&mut self) -> Result<(), RuntimeError> {
        if self.info.take().is_none() {
            return Err(RuntimeError::NotInitialized);
        }
        if let Some(profiler) = self.profiler.take() {
            profiler.write(&self.profile_dir)?;
        }
        Ok(())
    }
}
