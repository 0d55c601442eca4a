//! Profiling hook
//!
//! Records case start/end events and writes them as a per-rank JSON log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use super::RuntimeError;
use crate::models::{ProfileConfig, TestStatus};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileEventKind {
    Start,
    End,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProfileEvent {
    pub case: String,
    pub kind: ProfileEventKind,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TestStatus>,
}

/// Serialized form of a profile log
#[derive(Debug, Serialize, Deserialize)]
struct ProfileLog {
    profiler: String,
    rank: u32,
    events: Vec<ProfileEvent>,
}

/// Collects events for one rank
#[derive(Debug)]
pub struct Profiler {
    config: ProfileConfig,
    rank: u32,
    events: Vec<ProfileEvent>,
}

impl Profiler {
    pub fn new(config: ProfileConfig, rank: u32) -> Self {
        Self {
            config,
            rank,
            events: Vec::new(),
        }
    }

    pub fn case_started(&mut self, case: &str) {
        self.push(case, ProfileEventKind::Start, None);
    }

    pub fn case_finished(&mut self, case: &str, status: TestStatus) {
        self.push(case, ProfileEventKind::End, Some(status));
    }

    fn push(&mut self, case: &str, kind: ProfileEventKind, status: Option<TestStatus>) {
        self.events.push(ProfileEvent {
            case: case.to_string(),
            kind,
            timestamp: Utc::now(),
            status,
        });
    }

    #[cfg(test)]
    pub fn events(&self) -> &[ProfileEvent] {
        &self.events
    }

    /// `<logfile>.<rank>.json`
    pub fn log_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.{}.json", self.config.logfile, self.rank))
    }

    /// Write the collected events into `dir`
    pub fn write(&self, dir: &Path) -> Result<PathBuf, RuntimeError> {
        let path = self.log_path(dir);
        let log = ProfileLog {
            profiler: self.config.name.clone(),
            rank: self.rank,
            events: self.events.clone(),
        };
        let content = serde_json::to_string_pretty(&log)?;
        std::fs::write(&path, content).map_err(|source| RuntimeError::ProfileWrite {
            path: path.clone(),
            source,
        })?;

        info!(
            "{} profile: {} event(s) written to {}",
            self.config.name,
            self.events.len(),
            path.display()
        );
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_events_recorded_in_order() {
        let mut profiler = Profiler::new(ProfileConfig::mpe("runtests-mpi"), 0);
        profiler.case_started("test_comm.TestComm.testSize");
        profiler.case_finished("test_comm.TestComm.testSize", TestStatus::Pass);

        let kinds: Vec<_> = profiler.events().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![ProfileEventKind::Start, ProfileEventKind::End]);
        assert_eq!(profiler.events()[1].status, Some(TestStatus::Pass));
        assert!(profiler.events()[0].timestamp <= profiler.events()[1].timestamp);
    }

    #[test]
    fn test_write_log() {
        let dir = TempDir::new().unwrap();
        let mut profiler = Profiler::new(ProfileConfig::mpe("runtests-mpi"), 2);
        profiler.case_started("a");
        profiler.case_finished("a", TestStatus::Fail);

        let path = profiler.write(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("runtests-mpi.2.json"));

        let content = std::fs::read_to_string(path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["profiler"], "MPE");
        assert_eq!(value["rank"], 2);
        assert_eq!(value["events"][1]["status"], "fail");
        assert!(value["events"][0].get("status").is_none());
    }

    #[test]
    fn test_write_into_missing_dir_fails() {
        let profiler = Profiler::new(ProfileConfig::mpe("x"), 0);
        let err = profiler.write(Path::new("/no/such/dir")).unwrap_err();
        assert!(matches!(err, RuntimeError::ProfileWrite { .. }));
    }
}
