//! Text report for test runs
//!
//! Mirrors the classic xUnit console format: a progress mark or line per
//! case, framed failure details, then a `Ran N tests` summary.

use std::io::{self, Write};
use std::path::Path;

use crate::discovery::PackageInfo;
use crate::models::{ProcessorInfo, RunResult, TestCase, TestResult, TestStatus, Verbosity};

const SEPARATOR1: &str =
    "======================================================================";
const SEPARATOR2: &str =
    "----------------------------------------------------------------------";

/// Streams a run report to `W`, flushing after every write
pub struct TextReporter<W: Write> {
    out: W,
    verbosity: Verbosity,
}

impl<W: Write> TextReporter<W> {
    pub fn new(out: W, verbosity: Verbosity) -> Self {
        Self { out, verbosity }
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())?;
        self.out.flush()
    }

    pub fn writeln(&mut self, line: &str) -> io::Result<()> {
        self.out.flush()?;
        writeln!(self.out, "{line}")?;
        self.out.flush()
    }

    /// Announce a case before it runs
    pub fn start_test(&mut self, case: &TestCase) -> io::Result<()> {
        if self.verbosity == Verbosity::Verbose {
            self.write(&format!("{} ... ", case.description()))?;
        }
        Ok(())
    }

    /// Report a finished case
    pub fn add_result(&mut self, result: &TestResult) -> io::Result<()> {
        match self.verbosity {
            Verbosity::Quiet => Ok(()),
            Verbosity::Normal => self.write(result.status.mark()),
            Verbosity::Verbose => {
                let line = match result.status {
                    TestStatus::Pass => "ok".to_string(),
                    TestStatus::Fail => "FAIL".to_string(),
                    TestStatus::Error => "ERROR".to_string(),
                    TestStatus::Skip => {
                        format!("skipped '{}'", result.message.as_deref().unwrap_or(""))
                    }
                };
                self.writeln(&line)
            }
        }
    }

    /// Failure details, counts and the final verdict
    pub fn print_summary(&mut self, run: &RunResult) -> io::Result<()> {
        if !self.verbosity.is_quiet() {
            self.writeln("")?;
        }

        for result in run.problems() {
            let flavour = match result.status {
                TestStatus::Error => "ERROR",
                _ => "FAIL",
            };
            self.writeln(SEPARATOR1)?;
            self.writeln(&format!("{flavour}: {}", result.description))?;
            self.writeln(SEPARATOR2)?;
            self.writeln(result.message.as_deref().unwrap_or(""))?;
            self.writeln("")?;
        }

        self.writeln(SEPARATOR2)?;
        let plural = if run.total == 1 { "" } else { "s" };
        self.writeln(&format!(
            "Ran {} test{} in {:.3}s",
            run.total,
            plural,
            run.total_duration_ms as f64 / 1000.0
        ))?;
        self.writeln("")?;
        self.writeln(&format_verdict(run))
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// `OK`, `OK (skipped=1)` or `FAILED (failures=1, errors=2)`
pub fn format_verdict(run: &RunResult) -> String {
    let mut infos = Vec::new();
    if run.failed > 0 {
        infos.push(format!("failures={}", run.failed));
    }
    if run.errors > 0 {
        infos.push(format!("errors={}", run.errors));
    }
    if run.skipped > 0 {
        infos.push(format!("skipped={}", run.skipped));
    }

    let verdict = if run.was_successful() { "OK" } else { "FAILED" };
    if infos.is_empty() {
        verdict.to_string()
    } else {
        format!("{verdict} ({})", infos.join(", "))
    }
}

/// Identification line printed before the run
pub fn format_banner(info: &ProcessorInfo, package: &PackageInfo, executable: &Path) -> String {
    format!(
        "{} {} {} ({}) - {} ({})",
        info.tag(),
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        executable.display(),
        package.name,
        package.path.display()
    )
}

/// Per-repetition leak line: `(after - before) --> delta`
pub fn format_leak(info: &ProcessorInfo, before: i64, after: i64) -> String {
    format!(
        "{} refleaks:  ({} - {}) --> {}",
        info.tag(),
        after,
        before,
        after - before
    )
}
