//! Test result models
//!
//! Defines per-case results and the outcome of a whole run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Test execution status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Pass,
    Fail,
    Skip,
    Error,
}

impl TestStatus {
    /// Single-character progress mark
    pub fn mark(&self) -> &'static str {
        match self {
            TestStatus::Pass => ".",
            TestStatus::Fail => "F",
            TestStatus::Skip => "s",
            TestStatus::Error => "E",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestStatus::Pass => write!(f, "PASS"),
            TestStatus::Fail => write!(f, "FAIL"),
            TestStatus::Skip => write!(f, "SKIP"),
            TestStatus::Error => write!(f, "ERROR"),
        }
    }
}

/// Result of a single test execution
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// Fully qualified case id
    pub id: String,
    /// `name (module.group)`
    pub description: String,
    pub status: TestStatus,
    pub duration_ms: u64,
    pub message: Option<String>,
}

impl TestResult {
    pub fn pass(id: impl Into<String>, description: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            status: TestStatus::Pass,
            duration_ms,
            message: None,
        }
    }

    pub fn fail(
        id: impl Into<String>,
        description: impl Into<String>,
        duration_ms: u64,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status: TestStatus::Fail,
            message: Some(message.into()),
            ..Self::pass(id, description, duration_ms)
        }
    }

    pub fn skip(
        id: impl Into<String>,
        description: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            status: TestStatus::Skip,
            message: Some(reason.into()),
            ..Self::pass(id, description, 0)
        }
    }

    pub fn error(
        id: impl Into<String>,
        description: impl Into<String>,
        duration_ms: u64,
        error: impl Into<String>,
    ) -> Self {
        Self {
            status: TestStatus::Error,
            message: Some(error.into()),
            ..Self::pass(id, description, duration_ms)
        }
    }
}

/// Outcome of running a suite once
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunResult {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub errors: usize,
    pub total_duration_ms: u64,
    pub results: Vec<TestResult>,
}

impl RunResult {
    pub fn new(results: Vec<TestResult>, total_duration_ms: u64) -> Self {
        let count = |status: TestStatus| results.iter().filter(|r| r.status == status).count();

        Self {
            total: results.len(),
            passed: count(TestStatus::Pass),
            failed: count(TestStatus::Fail),
            skipped: count(TestStatus::Skip),
            errors: count(TestStatus::Error),
            total_duration_ms,
            results,
        }
    }

    /// No failures and no errors; an empty run succeeds
    pub fn was_successful(&self) -> bool {
        self.failed == 0 && self.errors == 0
    }

    /// Results with a failure or error status, errors first
    pub fn problems(&self) -> impl Iterator<Item = &TestResult> {
        let errors = self
            .results
            .iter()
            .filter(|r| r.status == TestStatus::Error);
        let failures = self
            .results
            .iter()
            .filter(|r| r.status == TestStatus::Fail);
        errors.chain(failures)
    }
}

impl fmt::Display for RunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total: {} | Pass: {} | Fail: {} | Skip: {} | Error: {}",
            self.total, self.passed, self.failed, self.skipped, self.errors
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_creation() {
        let result = TestResult::pass("m.G.a", "a (m.G)", 100);
        assert_eq!(result.status, TestStatus::Pass);
        assert_eq!(result.duration_ms, 100);
        assert!(result.message.is_none());

        let result = TestResult::fail("m.G.b", "b (m.G)", 5, "1 != 2");
        assert_eq!(result.status, TestStatus::Fail);
        assert_eq!(result.message.as_deref(), Some("1 != 2"));
    }

    #[test]
    fn test_run_result_counts() {
        let results = vec![
            TestResult::pass("m.G.a", "a (m.G)", 1),
            TestResult::fail("m.G.b", "b (m.G)", 1, "nope"),
            TestResult::skip("m.G.c", "c (m.G)", "not here"),
            TestResult::error("m.G.d", "d (m.G)", 1, "panicked"),
        ];

        let run = RunResult::new(results, 4);
        assert_eq!(run.total, 4);
        assert_eq!(run.passed, 1);
        assert_eq!(run.failed, 1);
        assert_eq!(run.skipped, 1);
        assert_eq!(run.errors, 1);
        assert!(!run.was_successful());

        let order: Vec<_> = run.problems().map(|r| r.id.as_str()).collect();
        assert_eq!(order, vec!["m.G.d", "m.G.b"]);
    }

    #[test]
    fn test_empty_run_is_success() {
        let run = RunResult::new(Vec::new(), 0);
        assert_eq!(run.total, 0);
        assert!(run.was_successful());
    }

    #[test]
    fn test_skips_do_not_fail_run() {
        let run = RunResult::new(vec![TestResult::skip("m.G.a", "a (m.G)", "why")], 0);
        assert!(run.was_successful());
    }
}
