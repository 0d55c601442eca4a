//! Test case models
//!
//! A test case is a plain function registered under `module.group.name`.

use std::fmt;

use super::runtime::{ProcessorInfo, RuntimeConfig};
use crate::config::SearchPath;

/// Why a case did not pass
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CaseError {
    Failed(String),
    Skipped(String),
}

impl fmt::Display for CaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseError::Failed(msg) => write!(f, "{msg}"),
            CaseError::Skipped(reason) => write!(f, "skipped: {reason}"),
        }
    }
}

pub type CaseResult = Result<(), CaseError>;

/// Test function signature
pub type TestFn = fn(&TestContext) -> CaseResult;

/// Fail the case unless `cond` holds
pub fn ensure(cond: bool, message: impl Into<String>) -> CaseResult {
    if cond {
        Ok(())
    } else {
        Err(CaseError::Failed(message.into()))
    }
}

/// Fail the case unless both values are equal
pub fn ensure_eq<T: PartialEq + fmt::Debug>(left: T, right: T) -> CaseResult {
    if left == right {
        Ok(())
    } else {
        Err(CaseError::Failed(format!("{left:?} != {right:?}")))
    }
}

/// Skip the case
pub fn skip(reason: impl Into<String>) -> CaseResult {
    Err(CaseError::Skipped(reason.into()))
}

/// What a running case can observe about the harness
#[derive(Clone, Debug)]
pub struct TestContext {
    pub processor: ProcessorInfo,
    pub runtime: RuntimeConfig,
    pub search_path: SearchPath,
}

impl TestContext {
    pub fn new(processor: ProcessorInfo, runtime: RuntimeConfig, search_path: SearchPath) -> Self {
        Self {
            processor,
            runtime,
            search_path,
        }
    }
}

/// A single registered test
#[derive(Clone)]
pub struct TestCase {
    pub module: String,
    pub group: String,
    pub name: String,
    pub func: TestFn,
}

impl TestCase {
    pub fn new(
        module: impl Into<String>,
        group: impl Into<String>,
        name: impl Into<String>,
        func: TestFn,
    ) -> Self {
        Self {
            module: module.into(),
            group: group.into(),
            name: name.into(),
            func,
        }
    }

    /// Fully qualified `module.group.name`
    pub fn id(&self) -> String {
        format!("{}.{}.{}", self.module, self.group, self.name)
    }

    /// `name (module.group)`, as shown in reports
    pub fn description(&self) -> String {
        format!("{} ({}.{})", self.name, self.module, self.group)
    }

    pub fn run(&self, ctx: &TestContext) -> CaseResult {
        (self.func)(ctx)
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase").field("id", &self.id()).finish()
    }
}

impl fmt::Display for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Ordered collection of cases to run
#[derive(Clone, Debug, Default)]
pub struct TestSuite {
    cases: Vec<TestCase>,
}

impl TestSuite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_tests(&mut self, cases: impl IntoIterator<Item = TestCase>) {
        self.cases.extend(cases);
    }

    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    #[cfg(test)]
    pub fn ids(&self) -> Vec<String> {
        self.cases.iter().map(TestCase::id).collect()
    }
}
