//! runtests - test-runner harness for message-passing runtime bindings
//!
//! Discovers test modules, filters them, initializes the parallel runtime
//! with the requested threading options, runs the suite and reports the
//! outcome through the exit status.
//!
//! ## Usage
//!
//! ```bash
//! # Run everything
//! runtests
//!
//! # Only the environment tests, verbosely
//! runtests -v -i environ
//!
//! # One case, without thread support
//! runtests --no-threads TestEnviron.testThreadLevel
//!
//! # Leak check (needs `--features refcount`)
//! runtests --refleaks 5
//! ```
//!
//! Exit status is 0 when every test passed, 1 otherwise and 2 on a usage
//! error.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error, info};

mod cli;
mod config;
mod discovery;
mod executor;
mod models;
mod output;
mod runtime;
mod tests;
mod utils;

use cli::Args;
use config::{prepare_environment, EnvConfig, HarnessConfig, SearchPath};
use discovery::{discover_tests, Registry};
use executor::{run_leak_check, system_counter, AllocationCounter, TestRunner};
use models::{Options, RuntimeConfig, TestContext};
use output::{format_banner, TextReporter};
use runtime::{LaunchEnv, LocalRuntime, Runtime};

#[cfg(feature = "refcount")]
#[global_allocator]
static GLOBAL: executor::CountingAllocator = executor::CountingAllocator;

/// Package whose tests this binary carries
const PACKAGE: &str = "local";

fn main() -> ExitCode {
    let (options, tests) = Args::parse().into_parts();

    match harness_main(PACKAGE, options, tests) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {e:#}");
            ExitCode::from(1)
        }
    }
}

/// Full lifecycle for `package`; returns whether every test passed
fn harness_main(package: &str, options: Options, tests: Vec<String>) -> Result<bool> {
    let env = EnvConfig::load();
    let config = HarnessConfig::resolve(&env)?;

    utils::init_logger(&config.log_level);
    debug!("Options: {:?}", options);

    let search_path = prepare_environment(&options, Some(&config.build_dir));
    let registry = tests::builtin_registry(package);

    let mut runtime_config = options.runtime_config(package);
    if let (Some(profile), Some(logfile)) = (&mut runtime_config.profile, &config.profile_logfile)
    {
        profile.logfile = logfile.clone();
    }

    let session = Session {
        registry: &registry,
        options: &options,
        tests: &tests,
        test_dir: config.test_dir.clone(),
        search_path,
        runtime_config,
        counter: system_counter(),
    };

    let mut runtime = LocalRuntime::new(LaunchEnv::capture());
    session.run(&mut runtime, std::io::stderr())
}

/// Everything one harness run needs besides the runtime and output stream
struct Session<'a> {
    registry: &'a Registry,
    options: &'a Options,
    tests: &'a [String],
    test_dir: Option<PathBuf>,
    search_path: SearchPath,
    runtime_config: RuntimeConfig,
    counter: Option<&'a dyn AllocationCounter>,
}

impl Session<'_> {
    fn run<R: Runtime, W: Write>(self, runtime: &mut R, out: W) -> Result<bool> {
        let processor = runtime
            .init(&self.runtime_config)
            .context("Failed to initialize runtime")?;

        let mut reporter = TextReporter::new(out, self.options.verbosity);
        if !self.options.verbosity.is_quiet() {
            let executable = std::env::current_exe().unwrap_or_default();
            reporter.writeln(&format_banner(
                &processor,
                self.registry.package(),
                &executable,
            ))?;
        }

        let suite = match discover_tests(
            self.registry,
            self.options,
            self.tests,
            self.test_dir.as_deref(),
        ) {
            Ok(suite) => suite,
            Err(e) => {
                runtime.finalize().context("Failed to finalize runtime")?;
                return Err(e.into());
            }
        };

        let runner = TestRunner::new(TestContext::new(
            processor.clone(),
            self.runtime_config,
            self.search_path,
        ));
        let success = runner
            .run(&suite, &mut reporter, runtime.profiler())?
            .was_successful();

        match self.counter {
            Some(counter) => {
                run_leak_check(
                    &runner,
                    &suite,
                    &mut reporter,
                    counter,
                    self.options.repeats,
                    &processor,
                )?;
            }
            None => debug!("No allocation counter, leak check skipped"),
        }

        runtime.finalize().context("Failed to finalize runtime")?;
        info!("Finished: {}", if success { "OK" } else { "FAILED" });
        Ok(success)
    }
}
