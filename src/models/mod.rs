//! Data models for the test harness
//!
//! This module contains the data structures shared across the harness.

mod options;
mod runtime;
mod test_case;
mod test_result;

pub use options::{Options, Verbosity};
pub use runtime::{ProcessorInfo, ProfileConfig, RuntimeConfig, ThreadLevel};
pub use test_case::{
    ensure, ensure_eq, skip, CaseError, CaseResult, TestCase, TestContext, TestFn, TestSuite,
};
pub use test_result::{RunResult, TestResult, TestStatus};
