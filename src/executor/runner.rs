//! Test execution runner
//!
//! Runs a suite case by case. Failures and panics are recorded, never
//! propagated.

use std::any::Any;
use std::cell::RefCell;
use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use crate::models::{CaseError, RunResult, TestCase, TestContext, TestResult, TestSuite};
use crate::output::TextReporter;
use crate::runtime::Profiler;
use crate::utils::Timer;

thread_local! {
    static LAST_PANIC: RefCell<Option<String>> = const { RefCell::new(None) };
}

type PanicHook = Box<dyn Fn(&panic::PanicHookInfo<'_>) + Sync + Send + 'static>;

/// Serializes swaps of the process-wide panic hook
static HOOK_LOCK: Mutex<()> = Mutex::new(());

/// Routes panic messages into `LAST_PANIC` instead of stderr while alive,
/// then puts back whatever hook was installed before
struct PanicCapture {
    previous: Option<PanicHook>,
    _lock: MutexGuard<'static, ()>,
}

impl PanicCapture {
    fn install() -> Self {
        let lock = HOOK_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let previous = panic::take_hook();
        panic::set_hook(Box::new(|info| {
            let message = info.to_string();
            LAST_PANIC.with(|slot| *slot.borrow_mut() = Some(message));
        }));
        Self {
            previous: Some(previous),
            _lock: lock,
        }
    }
}

impl Drop for PanicCapture {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            panic::set_hook(previous);
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(captured) = LAST_PANIC.with(|slot| slot.borrow_mut().take()) {
        return captured;
    }
    match payload.downcast::<String>() {
        Ok(message) => *message,
        Err(payload) => match payload.downcast::<&'static str>() {
            Ok(message) => message.to_string(),
            Err(_) => "test panicked".to_string(),
        },
    }
}

/// Test runner bound to the context of one runtime initialization
pub struct TestRunner {
    ctx: TestContext,
}

impl TestRunner {
    pub fn new(ctx: TestContext) -> Self {
        Self { ctx }
    }

    /// Run a single test case
    pub fn run_case(&self, case: &TestCase) -> TestResult {
        LAST_PANIC.with(|slot| slot.borrow_mut().take());
        let timer = Timer::start(case.id());
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| case.run(&self.ctx)));
        let duration_ms = timer.elapsed_ms();

        match outcome {
            Ok(Ok(())) => TestResult::pass(case.id(), case.description(), duration_ms),
            Ok(Err(CaseError::Failed(message))) => {
                debug!("{} failed: {}", case.id(), message);
                TestResult::fail(case.id(), case.description(), duration_ms, message)
            }
            Ok(Err(CaseError::Skipped(reason))) => {
                TestResult::skip(case.id(), case.description(), reason)
            }
            Err(payload) => {
                let message = panic_message(payload);
                debug!("{} panicked: {}", case.id(), message);
                TestResult::error(case.id(), case.description(), duration_ms, message)
            }
        }
    }

    /// Run every case in the suite once and print the report
    pub fn run<W: Write>(
        &self,
        suite: &TestSuite,
        reporter: &mut TextReporter<W>,
        mut profiler: Option<&mut Profiler>,
    ) -> io::Result<RunResult> {
        info!("Running {} test case(s)", suite.len());

        let timer = Timer::start("suite");
        let mut results = Vec::with_capacity(suite.len());
        {
            let _capture = PanicCapture::install();
            for case in suite.cases() {
                reporter.start_test(case)?;
                if let Some(profiler) = profiler.as_deref_mut() {
                    profiler.case_started(&case.id());
                }

                let result = self.run_case(case);

                if let Some(profiler) = profiler.as_deref_mut() {
                    profiler.case_finished(&result.id, result.status);
                }
                reporter.add_result(&result)?;
                results.push(result);
            }
        }

        let run = RunResult::new(results, timer.stop().as_millis() as u64);
        reporter.print_summary(&run)?;

        info!("{}", run);
        Ok(run)
    }
}
